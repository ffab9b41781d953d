//! Process launching seam for the command executor
//!
//! Spawning goes through the [`ProcessLauncher`] trait so tests can count
//! spawn attempts or substitute a scripted child without touching the
//! executor's stream and timeout handling.

use std::process::Stdio;
use tokio::process::{Child, Command};

/// Spawns the external tool with all three stdio streams piped.
pub trait ProcessLauncher: Send + Sync {
    /// Launch `program` with `args`, stdio fully piped.
    ///
    /// # Errors
    ///
    /// Returns the OS error when the process cannot be started (missing
    /// binary, permission denied, and so on).
    fn launch(&self, program: &str, args: &[String]) -> std::io::Result<Child>;
}

/// Production launcher backed by `tokio::process::Command`.
///
/// `kill_on_drop` is set so an abandoned child can never outlive its
/// execution, whatever exit path the executor takes.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemLauncher;

impl ProcessLauncher for SystemLauncher {
    fn launch(&self, program: &str, args: &[String]) -> std::io::Result<Child> {
        Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
    }
}
