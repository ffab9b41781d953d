//! Error types for copilot-bridge
//!
//! This module defines all error types used throughout the application,
//! using `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Main error type for copilot-bridge operations
///
/// This enum covers every failure the command engine can surface:
/// pre-spawn rejection, spawn failures, authentication detection,
/// timeouts without salvageable output, and the usual configuration
/// and IO plumbing.
#[derive(Error, Debug)]
pub enum BridgeError {
    /// Prompt rejected before any process was spawned
    #[error("Prompt too large: {size} bytes exceeds the {limit} byte limit")]
    PromptTooLarge {
        /// UTF-8 byte length of the composed prompt
        size: usize,
        /// Configured maximum prompt size in bytes
        limit: usize,
    },

    /// The external process could not be started
    #[error("Failed to start Copilot CLI: {0}")]
    Spawn(String),

    /// The process ran but produced no output and its stderr indicates
    /// a missing login
    #[error("Authentication required: run `copilot /login` to authenticate, then retry")]
    AuthRequired,

    /// The command exceeded its time budget with no output to salvage
    #[error("Copilot CLI timed out after {0} ms with no output")]
    Timeout(u64),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Result type alias for copilot-bridge operations
///
/// This is a convenience alias that uses `anyhow::Error` as the error type,
/// allowing for rich error context and easy error propagation.
pub type Result<T> = anyhow::Result<T>;
