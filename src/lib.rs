//! Tray indicator for headsets supported by HeadsetControl.
//!
//! Polls `headsetcontrol` for the battery state, draws it as a tray icon and
//! offers the light and sidetone controls the headset reports it supports.

pub mod command;
pub mod config;
pub mod error;
pub mod headset;
pub mod icon;
pub mod menu;
pub mod runner;
pub mod tray;

pub use error::TrayError;
