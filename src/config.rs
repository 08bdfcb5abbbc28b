//! Command line options.

use std::time::Duration;

use clap::Parser;

use crate::runner::DEFAULT_BINARY;

/// Tray icon showing headset battery state, with light and sidetone controls.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Seconds between battery checks
    #[arg(
        long,
        env = "HEADSETCONTROL_TRAY_INTERVAL",
        default_value_t = 120,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub interval: u64,

    /// Path or name of the headsetcontrol binary
    #[arg(long, env = "HEADSETCONTROL_BIN", default_value = DEFAULT_BINARY)]
    pub binary: String,

    /// Hide the sidetone submenu even if the headset supports it
    #[arg(long)]
    pub no_sidetone: bool,

    /// Do not write the icon PNG to the cache directory
    #[arg(long)]
    pub no_icon_cache: bool,

    /// Log filter (error, warn, info, debug, trace); overrides RUST_LOG
    #[arg(long)]
    pub log_level: Option<String>,
}

impl Args {
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.interval)
    }
}
