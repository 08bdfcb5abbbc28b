//! State of the headset as last reported by `headsetcontrol`.

use log::{debug, error, warn};

use crate::command::{Capabilities, HeadsetCommand};
use crate::runner::CommandRunner;

/// Battery output meaning no headset is connected.
pub const CHARGE_DISCONNECTED: i32 = -2;
/// Battery output meaning the headset is charging with no known percentage.
pub const CHARGE_CHARGING: i32 = -1;

/// Headset managed through `headsetcontrol`.
///
/// Only the output of commands sent through [`Headset::run_command`] mutates it.
pub struct Headset {
    runner: Box<dyn CommandRunner>,
    raw_capabilities: Option<String>,
    capabilities: Option<Capabilities>,
    connected: bool,
    charge: i32,
    binary_missing_reported: bool,
}

impl Headset {
    pub fn new(runner: Box<dyn CommandRunner>) -> Self {
        Self {
            runner,
            raw_capabilities: None,
            capabilities: None,
            connected: false,
            charge: 0,
            binary_missing_reported: false,
        }
    }

    /// Capability string exactly as the binary printed it, once known.
    pub fn raw_capabilities(&self) -> Option<&str> {
        self.raw_capabilities.as_deref()
    }

    pub fn capabilities(&self) -> Option<&Capabilities> {
        self.capabilities.as_ref()
    }

    pub fn connected(&self) -> bool {
        self.connected
    }

    pub fn charge(&self) -> i32 {
        self.charge
    }

    /// Queries capabilities if still unknown, then the battery.
    ///
    /// Returns `true` when this call is the one that learned the capabilities.
    pub fn refresh(&mut self) -> bool {
        let mut learned = false;
        if self.capabilities.is_none() {
            self.run_command(HeadsetCommand::QueryCapabilities);
            learned = self.capabilities.is_some();
        }
        self.run_command(HeadsetCommand::QueryBattery);
        learned
    }

    /// Sends a command unless the capability gate rejects it, then folds its
    /// output into the headset state.
    pub fn run_command(&mut self, command: HeadsetCommand) {
        if !command.is_permitted(self.capabilities.as_ref()) {
            let required = command
                .required_capability()
                .map_or_else(|| "capabilities".to_string(), |c| c.code().to_string());
            warn!("{required} not in capabilities {:?}", self.raw_capabilities);
            return;
        }

        let args = command.args();
        let output = match self.runner.run(&args) {
            Ok(output) => output,
            Err(e) => {
                if e.kind() == std::io::ErrorKind::NotFound && !self.binary_missing_reported {
                    error!("headsetcontrol binary not found: {e}");
                    self.binary_missing_reported = true;
                }
                debug!("run_headsetcontrol failed to start: {e}");
                self.connected = false;
                return;
            }
        };

        if !output.success() {
            self.connected = false;
            debug!(
                "run_headsetcontrol return code {:?} : {}",
                output.code,
                output.stderr.trim()
            );
            return;
        }

        let stdout = output.stdout.trim();
        match command {
            HeadsetCommand::QueryBattery => self.apply_battery(stdout),
            HeadsetCommand::QueryCapabilities => {
                self.capabilities = Some(Capabilities::parse(stdout));
                self.raw_capabilities = Some(stdout.to_string());
            }
            // No output; a zero exit code is all we get.
            HeadsetCommand::Light(_) | HeadsetCommand::Sidetone(_) => {}
        }
    }

    fn apply_battery(&mut self, stdout: &str) {
        match stdout.parse::<i32>() {
            // `charge` keeps its previous value here.
            Ok(CHARGE_DISCONNECTED) => self.connected = false,
            Ok(charge) => {
                self.charge = charge;
                self.connected = true;
            }
            Err(e) => {
                debug!("unexpected battery output {stdout:?}: {e}");
                self.connected = false;
            }
        }
    }

    /// Human readable charge, derived from `charge` alone.
    pub fn charge_status(&self) -> String {
        charge_label(self.charge)
    }
}

pub fn charge_label(charge: i32) -> String {
    match charge {
        CHARGE_DISCONNECTED => "Disconnected".to_string(),
        CHARGE_CHARGING => "Charging".to_string(),
        percent => format!("{percent}%"),
    }
}
