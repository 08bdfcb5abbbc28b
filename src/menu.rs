//! Context menu model.
//!
//! The menu is described as plain data so it can be built and compared without
//! a tray connection; [`crate::tray`] turns it into ksni items.

use crate::command::{Capabilities, Capability, SidetoneLevel};

/// Something the user can trigger from the menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    LightOn,
    LightOff,
    Refresh,
    Sidetone(SidetoneLevel),
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuEntry {
    Action { label: String, action: Action },
    /// Read-only text.
    Label(String),
    Submenu { label: String, entries: Vec<MenuEntry> },
}

impl MenuEntry {
    fn action(label: &str, action: Action) -> Self {
        MenuEntry::Action {
            label: label.to_string(),
            action,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            MenuEntry::Action { label, .. } => label,
            MenuEntry::Label(label) => label,
            MenuEntry::Submenu { label, .. } => label,
        }
    }
}

/// Builds the menu for the given capabilities.
///
/// Unknown capabilities produce a menu with only Quit.
pub fn build_menu(
    capabilities: Option<&Capabilities>,
    charge_label: &str,
    sidetone_enabled: bool,
) -> Vec<MenuEntry> {
    let mut entries = Vec::new();

    if let Some(caps) = capabilities {
        if caps.contains(Capability::Light) {
            entries.push(MenuEntry::action("Turn Light On", Action::LightOn));
            entries.push(MenuEntry::action("Turn Light Off", Action::LightOff));
        }

        if caps.contains(Capability::Battery) {
            entries.push(MenuEntry::action("Refresh battery state", Action::Refresh));
            entries.push(MenuEntry::Label(charge_label.to_string()));
        }

        if sidetone_enabled && caps.contains(Capability::Sidetone) {
            let levels = SidetoneLevel::MENU_ORDER
                .iter()
                .map(|&level| MenuEntry::action(level.label(), Action::Sidetone(level)))
                .collect();
            entries.push(MenuEntry::Submenu {
                label: "Sidetone".to_string(),
                entries: levels,
            });
        }
    }

    entries.push(MenuEntry::action("Quit", Action::Quit));
    entries
}
