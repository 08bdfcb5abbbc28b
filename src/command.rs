//! Commands understood by `headsetcontrol` and the capabilities that gate them.

use std::collections::BTreeSet;

/// A feature a headset reports through `headsetcontrol --capabilities -c`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Capability {
    Light,
    Battery,
    Sidetone,
}

impl Capability {
    /// Maps a capability letter to its feature. Unknown letters yield `None`.
    pub fn from_code(code: char) -> Option<Self> {
        match code {
            'l' => Some(Capability::Light),
            'b' => Some(Capability::Battery),
            's' => Some(Capability::Sidetone),
            _ => None,
        }
    }

    pub fn code(self) -> char {
        match self {
            Capability::Light => 'l',
            Capability::Battery => 'b',
            Capability::Sidetone => 's',
        }
    }
}

/// Set of capabilities parsed once from the raw capability string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Capabilities(BTreeSet<Capability>);

impl Capabilities {
    pub fn parse(raw: &str) -> Self {
        Self(raw.chars().filter_map(Capability::from_code).collect())
    }

    pub fn contains(&self, capability: Capability) -> bool {
        self.0.contains(&capability)
    }
}

/// Sidetone presets offered in the tray menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SidetoneLevel {
    Off,
    Low,
    Medium,
    High,
    Max,
}

impl SidetoneLevel {
    /// Menu order, loudest first.
    pub const MENU_ORDER: [SidetoneLevel; 5] = [
        SidetoneLevel::Max,
        SidetoneLevel::High,
        SidetoneLevel::Medium,
        SidetoneLevel::Low,
        SidetoneLevel::Off,
    ];

    pub fn value(self) -> u8 {
        match self {
            SidetoneLevel::Off => 0,
            SidetoneLevel::Low => 32,
            SidetoneLevel::Medium => 64,
            SidetoneLevel::High => 96,
            SidetoneLevel::Max => 128,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SidetoneLevel::Off => "Off",
            SidetoneLevel::Low => "Low",
            SidetoneLevel::Medium => "Medium",
            SidetoneLevel::High => "High",
            SidetoneLevel::Max => "Max",
        }
    }
}

/// A single invocation of `headsetcontrol`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeadsetCommand {
    QueryCapabilities,
    QueryBattery,
    Light(bool),
    Sidetone(SidetoneLevel),
}

impl HeadsetCommand {
    /// Argument vector passed to the binary. Every command asks for compact (`-c`) output.
    pub fn args(self) -> Vec<String> {
        let mut args: Vec<String> = match self {
            HeadsetCommand::QueryCapabilities => vec!["--capabilities".into()],
            HeadsetCommand::QueryBattery => vec!["-b".into()],
            HeadsetCommand::Light(on) => vec!["-l".into(), if on { "1" } else { "0" }.into()],
            HeadsetCommand::Sidetone(level) => vec!["-s".into(), level.value().to_string()],
        };
        args.push("-c".into());
        args
    }

    /// Capability that must be reported before this command may be sent.
    /// `None` for the capability query itself.
    pub fn required_capability(self) -> Option<Capability> {
        match self {
            HeadsetCommand::QueryCapabilities => None,
            HeadsetCommand::QueryBattery => Some(Capability::Battery),
            HeadsetCommand::Light(_) => Some(Capability::Light),
            HeadsetCommand::Sidetone(_) => Some(Capability::Sidetone),
        }
    }

    /// Whether the command may run given what is known about the headset.
    ///
    /// Until capabilities are known only the capability query passes; afterwards
    /// only commands whose capability was reported pass.
    pub fn is_permitted(self, capabilities: Option<&Capabilities>) -> bool {
        match (capabilities, self.required_capability()) {
            (None, None) => true,
            (None, Some(_)) => false,
            (Some(_), None) => false,
            (Some(caps), Some(required)) => caps.contains(required),
        }
    }
}
