//! Invocation of the external `headsetcontrol` binary.

use std::ffi::OsString;
use std::io;
use std::process::Command;

/// Default binary looked up on `PATH`.
pub const DEFAULT_BINARY: &str = "headsetcontrol";

/// Captured result of one finished process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code, `None` when the process was killed by a signal.
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Runs `headsetcontrol` with an argument vector and captures its output.
pub trait CommandRunner: Send {
    fn run(&self, args: &[String]) -> io::Result<CommandOutput>;
}

/// Runs the real binary synchronously.
#[derive(Debug, Clone)]
pub struct HeadsetControl {
    binary: OsString,
}

impl HeadsetControl {
    pub fn new(binary: impl Into<OsString>) -> Self {
        Self {
            binary: binary.into(),
        }
    }
}

impl CommandRunner for HeadsetControl {
    fn run(&self, args: &[String]) -> io::Result<CommandOutput> {
        let output = Command::new(&self.binary).args(args).output()?;
        Ok(CommandOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}
