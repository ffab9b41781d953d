//! Installation health check

use std::sync::Arc;

use colored::Colorize;

use crate::config::Config;
use crate::error::{BridgeError, Result};
use crate::executor::CommandExecutor;
use crate::logging::Logger;

/// Check that the external Copilot CLI is installed and responding.
///
/// # Errors
///
/// Returns an error (and therefore a nonzero exit) when the version probe
/// fails or times out.
pub async fn run_doctor(config: &Config) -> Result<()> {
    let logger = Arc::new(Logger::new(&config.logging));
    let executor = CommandExecutor::new(config.cli.clone(), logger);

    if executor.health_check().await {
        println!(
            "{} Copilot CLI is installed ({})",
            "ok:".green().bold(),
            config.cli.binary
        );
        Ok(())
    } else {
        println!(
            "{} Copilot CLI not found or not responding ({})",
            "error:".red().bold(),
            config.cli.binary
        );
        Err(BridgeError::Spawn(format!(
            "`{}` did not answer the version probe; is the Copilot CLI installed and on PATH?",
            config.cli.binary
        ))
        .into())
    }
}
