//! System tray entry point.
//!
//! Spawns the StatusNotifierItem service and posts a refresh to it on a fixed
//! interval until Quit is chosen or a termination signal arrives.

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, TryRecvError};
use std::time::Instant;

use clap::Parser;
use headsetcontrol_tray::config::Args;
use headsetcontrol_tray::headset::Headset;
use headsetcontrol_tray::icon::icon_cache_path;
use headsetcontrol_tray::runner::HeadsetControl;
use headsetcontrol_tray::tray::{HeadsetTray, TrayOptions};
use headsetcontrol_tray::TrayError;
use ksni::TrayService;
use log::{error, info};
use signal_hook::consts::signal::*;
use signal_hook::flag;

// How often the main thread wakes up to notice shutdown and due refreshes.
const TRAY_POLL_INTERVAL: std::time::Duration = std::time::Duration::from_secs(1);

fn init_logging(level: Option<&str>) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if let Some(level) = level {
        builder.parse_filters(level);
    }
    builder.init();
}

/// Reason the tray service thread is gone, if it is.
fn service_stopped(stopped_rx: &mpsc::Receiver<String>) -> Option<String> {
    match stopped_rx.try_recv() {
        Ok(reason) => Some(reason),
        // The thread dropped its sender without reporting, e.g. it panicked.
        Err(TryRecvError::Disconnected) => {
            Some("tray service thread exited unexpectedly".to_string())
        }
        Err(TryRecvError::Empty) => None,
    }
}

fn run(args: Args) -> Result<(), TrayError> {
    // Quit from the menu and SIGTERM/SIGINT both land here.
    let shutdown_flag = Arc::new(AtomicBool::new(false));
    flag::register(SIGTERM, Arc::clone(&shutdown_flag)).map_err(TrayError::Signal)?;
    flag::register(SIGINT, Arc::clone(&shutdown_flag)).map_err(TrayError::Signal)?;

    let icon_cache = if args.no_icon_cache {
        None
    } else {
        Some(icon_cache_path(
            std::env::var_os("XDG_CACHE_HOME").map(PathBuf::from),
            std::env::var_os("HOME").map(PathBuf::from),
        )?)
    };

    let headset = Headset::new(Box::new(HeadsetControl::new(&args.binary)));
    let options = TrayOptions {
        icon_cache,
        sidetone_enabled: !args.no_sidetone,
    };
    let mut tray = HeadsetTray::new(headset, options, Arc::clone(&shutdown_flag));
    tray.refresh();

    let service = TrayService::new(tray);
    let handle = service.handle();
    let (stopped_tx, stopped_rx) = mpsc::channel::<String>();
    std::thread::Builder::new()
        .name("headsetcontrol-tray".into())
        .spawn(move || {
            let reason = match service.run() {
                Ok(()) => "tray service stopped".to_string(),
                Err(e) => e.to_string(),
            };
            let _ = stopped_tx.send(reason);
        })
        .map_err(|e| TrayError::TrayUnavailable(e.to_string()))?;

    info!(
        "Tray running, checking battery every {}s",
        args.refresh_interval().as_secs()
    );

    let mut last_refresh = Instant::now();
    loop {
        std::thread::sleep(TRAY_POLL_INTERVAL);

        if shutdown_flag.load(Ordering::Relaxed) {
            info!("Shutting down");
            return Ok(());
        }

        if let Some(reason) = service_stopped(&stopped_rx) {
            return Err(TrayError::TrayUnavailable(reason));
        }

        if last_refresh.elapsed() >= args.refresh_interval() {
            handle.update(|tray: &mut HeadsetTray| tray.refresh());
            last_refresh = Instant::now();
        }
    }
}

fn main() {
    let args = Args::parse();
    init_logging(args.log_level.as_deref());

    if let Err(e) = run(args) {
        error!("{e}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn running_service_is_not_stopped() {
        let (_tx, rx) = mpsc::channel::<String>();
        assert_eq!(service_stopped(&rx), None);
    }

    #[test]
    fn reported_stop_is_returned() {
        let (tx, rx) = mpsc::channel();
        tx.send("tray service stopped".to_string()).unwrap();
        assert_eq!(service_stopped(&rx).as_deref(), Some("tray service stopped"));
    }

    #[test]
    fn panicked_service_thread_counts_as_stopped() {
        let (tx, rx) = mpsc::channel::<String>();
        let _ = std::thread::spawn(move || {
            let _tx = tx;
            panic!("service crashed");
        })
        .join();
        assert!(service_stopped(&rx).is_some());
    }
}
