//! System tray presenter using the KDE StatusNotifierItem protocol.
//!
//! Owns the headset state. Menu callbacks on the ksni service thread and
//! refresh ticks posted through `ksni::Handle::update` both run under the tray
//! model lock, so calls into the headset never overlap.

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use ksni::menu::{MenuItem, StandardItem, SubMenu};
use ksni::{Status, ToolTip, Tray};
use log::{error, info, warn};

use crate::command::HeadsetCommand;
use crate::headset::Headset;
use crate::icon::{self, Bitmap};
use crate::menu::{self, Action, MenuEntry};

const TRAY_ID: &str = "headsetcontrol-tray";
const APP_TITLE: &str = "HeadsetControl";

/// Presentation settings that do not change while running.
#[derive(Debug, Clone)]
pub struct TrayOptions {
    /// Where to write the PNG copy of the icon. `None` disables it.
    pub icon_cache: Option<PathBuf>,
    /// Whether the sidetone submenu is offered.
    pub sidetone_enabled: bool,
}

impl Default for TrayOptions {
    fn default() -> Self {
        Self {
            icon_cache: None,
            sidetone_enabled: true,
        }
    }
}

pub struct HeadsetTray {
    headset: Headset,
    options: TrayOptions,
    icon: Bitmap,
    menu_built: bool,
    shutdown: Arc<AtomicBool>,
}

impl HeadsetTray {
    pub fn new(headset: Headset, options: TrayOptions, shutdown: Arc<AtomicBool>) -> Self {
        let icon = icon::render(headset.connected(), headset.charge());
        Self {
            headset,
            options,
            icon,
            menu_built: false,
            shutdown,
        }
    }

    pub fn headset(&self) -> &Headset {
        &self.headset
    }

    pub fn icon(&self) -> &Bitmap {
        &self.icon
    }

    /// Whether the capability-dependent menu entries have been attached.
    pub fn menu_built(&self) -> bool {
        self.menu_built
    }

    /// Polls the headset and redraws the icon.
    pub fn refresh(&mut self) {
        info!("Updating tray icon");
        if self.headset.refresh() && !self.menu_built {
            info!(
                "Headset capabilities {:?} detected, rebuilding menu",
                self.headset.raw_capabilities().unwrap_or_default()
            );
            self.menu_built = true;
        }

        self.icon = icon::render(self.headset.connected(), self.headset.charge());
        if let Some(path) = &self.options.icon_cache {
            if let Err(e) = self.icon.save_png(path) {
                warn!("Failed to write tray icon to {}: {e}", path.display());
            }
        }
    }

    /// Applies a menu action.
    pub fn dispatch(&mut self, action: Action) {
        match action {
            Action::LightOn => self.headset.run_command(HeadsetCommand::Light(true)),
            Action::LightOff => self.headset.run_command(HeadsetCommand::Light(false)),
            Action::Sidetone(level) => self.headset.run_command(HeadsetCommand::Sidetone(level)),
            Action::Refresh => self.refresh(),
            Action::Quit => {
                info!("Quit requested from tray menu");
                self.shutdown.store(true, Ordering::Relaxed);
            }
        }
    }

    /// Current menu contents.
    pub fn entries(&self) -> Vec<MenuEntry> {
        menu::build_menu(
            self.headset.capabilities(),
            &self.headset.charge_status(),
            self.options.sidetone_enabled,
        )
    }
}

fn to_menu_items(entries: Vec<MenuEntry>) -> Vec<MenuItem<HeadsetTray>> {
    entries
        .into_iter()
        .map(|entry| match entry {
            MenuEntry::Action { label, action } => StandardItem {
                label,
                activate: Box::new(move |tray: &mut HeadsetTray| tray.dispatch(action)),
                ..Default::default()
            }
            .into(),
            MenuEntry::Label(label) => StandardItem {
                label,
                enabled: false,
                ..Default::default()
            }
            .into(),
            MenuEntry::Submenu { label, entries } => SubMenu {
                label,
                submenu: to_menu_items(entries),
                ..Default::default()
            }
            .into(),
        })
        .collect()
}

impl Tray for HeadsetTray {
    fn id(&self) -> String {
        TRAY_ID.to_string()
    }

    fn title(&self) -> String {
        format!("{APP_TITLE}: {}", self.headset.charge_status())
    }

    fn status(&self) -> Status {
        Status::Active
    }

    fn icon_pixmap(&self) -> Vec<ksni::Icon> {
        vec![self.icon.to_ksni()]
    }

    fn tool_tip(&self) -> ToolTip {
        ToolTip {
            icon_name: String::new(),
            icon_pixmap: Vec::new(),
            title: APP_TITLE.to_string(),
            description: self.headset.charge_status(),
        }
    }

    fn menu(&self) -> Vec<MenuItem<Self>> {
        to_menu_items(self.entries())
    }

    /// No StatusNotifierWatcher on the bus means no tray to show in; returning
    /// `false` stops the service so the process can exit.
    fn watcher_offine(&self) -> bool {
        error!("No system tray available (StatusNotifierWatcher not running)");
        false
    }
}
