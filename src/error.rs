//! Fatal error types for the tray application.

/// Errors that stop the tray from starting or running.
#[derive(Debug, thiserror::Error)]
pub enum TrayError {
    #[error("could not find environment variable HOME or XDG_CACHE_HOME")]
    MissingCacheDir,

    #[error("no system tray available: {0}")]
    TrayUnavailable(String),

    #[error("failed to register signal handler: {0}")]
    Signal(#[source] std::io::Error),

    #[error("failed to encode tray icon: {0}")]
    IconEncode(#[from] image::ImageError),

    #[error("icon buffer does not match {width}x{height}")]
    IconSize { width: u32, height: u32 },
}
