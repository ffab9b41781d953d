//! copilot-bridge - Session-aware command bridge for the GitHub Copilot CLI
//!
//! This library wraps the external Copilot CLI as a set of invokable
//! operations: subprocess command execution with timeout salvage and
//! failure classification, advisory model discovery, and in-process
//! session history.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - `executor`: Child-process command execution, stream handling, timeout
//!   salvage, and outcome classification
//! - `catalog`: Advisory model-identifier discovery over help output
//! - `session`: In-process session registry and recording contexts
//! - `logging`: Level-filtered structured log sink
//! - `config`: Configuration loading and validation
//! - `error`: Error types and result aliases
//! - `cli`: Command-line interface definition
//!
//! # Example
//!
//! ```no_run
//! use copilot_bridge::config::Config;
//! use copilot_bridge::executor::{CommandExecutor, CommandRequest};
//! use copilot_bridge::logging::Logger;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::default();
//!     let logger = Arc::new(Logger::new(&config.logging));
//!     let executor = CommandExecutor::new(config.cli.clone(), logger);
//!
//!     let outcome = executor.execute(&CommandRequest::new("2+2="), None).await?;
//!     println!("{}", outcome.result().text);
//!     Ok(())
//! }
//! ```

pub mod catalog;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod executor;
pub mod logging;
pub mod session;

// Re-export commonly used types
pub use catalog::{extract_model_names, CatalogSource, ModelCatalog, ModelCatalogResult};
pub use config::Config;
pub use error::{BridgeError, Result};
pub use executor::{CommandExecutor, CommandRequest, CommandResult, ExecOutcome};
pub use logging::{LogLevel, Logger};
pub use session::{HistoryEntry, Session, SessionContext, SessionStore};
