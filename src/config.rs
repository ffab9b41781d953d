//! Configuration management for copilot-bridge
//!
//! This module handles loading, parsing, validating, and managing
//! configuration from files, environment variables, and CLI overrides.
//! Precedence is file < environment < CLI flags; a missing config file is
//! not an error and simply yields the defaults.

use crate::cli::Cli;
use crate::error::{BridgeError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure for copilot-bridge
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// External Copilot CLI invocation settings
    #[serde(default)]
    pub cli: CliToolConfig,

    /// Diagnostic logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cli: CliToolConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

/// Settings for invoking the external Copilot CLI
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CliToolConfig {
    /// Path or name of the external binary
    #[serde(default = "default_binary")]
    pub binary: String,

    /// Default model identifier used when a request does not name one
    #[serde(default)]
    pub default_model: Option<String>,

    /// Pass `--allow-all-tools` by default
    #[serde(default)]
    pub allow_all_tools: bool,

    /// Command timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Maximum prompt size in UTF-8 bytes; zero or negative means unlimited
    #[serde(default = "default_max_prompt_bytes")]
    pub max_prompt_bytes: i64,
}

fn default_binary() -> String {
    "copilot".to_string()
}

fn default_timeout_ms() -> u64 {
    60_000
}

fn default_max_prompt_bytes() -> i64 {
    24_000
}

impl Default for CliToolConfig {
    fn default() -> Self {
        Self {
            binary: default_binary(),
            default_model: None,
            allow_all_tools: false,
            timeout_ms: default_timeout_ms(),
            max_prompt_bytes: default_max_prompt_bytes(),
        }
    }
}

impl CliToolConfig {
    /// Effective prompt cap in bytes, `None` when unlimited.
    pub fn prompt_byte_limit(&self) -> Option<usize> {
        if self.max_prompt_bytes > 0 {
            Some(self.max_prompt_bytes as usize)
        } else {
            None
        }
    }
}

/// Diagnostic logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Minimum severity recorded: debug, info, warn, or error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Optional file that receives one structured JSON line per record
    #[serde(default)]
    pub file: Option<PathBuf>,

    /// Mirror every record to the diagnostic stream, not just warn/error
    #[serde(default)]
    pub debug: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
            debug: false,
        }
    }
}

impl Config {
    /// Load configuration from a YAML file, then apply environment and CLI
    /// overrides.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the YAML configuration file
    /// * `cli` - Parsed CLI arguments; `--verbose` switches debug mode on
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    /// A missing file yields the defaults.
    pub fn load(path: impl AsRef<Path>, cli: &Cli) -> Result<Self> {
        let path = path.as_ref();

        let mut config = if path.exists() {
            let contents = std::fs::read_to_string(path).map_err(BridgeError::Io)?;
            serde_yaml::from_str(&contents).map_err(BridgeError::Yaml)?
        } else {
            tracing::debug!("Config file {} not found, using defaults", path.display());
            Config::default()
        };

        config.apply_env();

        if cli.verbose {
            config.logging.debug = true;
        }

        Ok(config)
    }

    /// Apply `COPILOT_BRIDGE_*` environment variable overrides.
    ///
    /// Numeric variables that fail to parse are ignored with a warning
    /// rather than aborting startup. A non-positive
    /// `COPILOT_BRIDGE_TIMEOUT_MS` is ignored as well; the timeout must
    /// stay positive.
    pub fn apply_env(&mut self) {
        if let Ok(binary) = std::env::var("COPILOT_BRIDGE_BINARY") {
            if !binary.is_empty() {
                self.cli.binary = binary;
            }
        }

        if let Ok(model) = std::env::var("COPILOT_BRIDGE_MODEL") {
            if !model.is_empty() {
                self.cli.default_model = Some(model);
            }
        }

        if let Ok(raw) = std::env::var("COPILOT_BRIDGE_ALLOW_ALL_TOOLS") {
            self.cli.allow_all_tools = parse_bool(&raw);
        }

        if let Ok(raw) = std::env::var("COPILOT_BRIDGE_TIMEOUT_MS") {
            match raw.parse::<i64>() {
                Ok(ms) if ms > 0 => self.cli.timeout_ms = ms as u64,
                _ => tracing::warn!("Ignoring invalid COPILOT_BRIDGE_TIMEOUT_MS: {}", raw),
            }
        }

        if let Ok(raw) = std::env::var("COPILOT_BRIDGE_MAX_PROMPT_BYTES") {
            match raw.parse::<i64>() {
                Ok(bytes) => self.cli.max_prompt_bytes = bytes,
                Err(_) => {
                    tracing::warn!("Ignoring invalid COPILOT_BRIDGE_MAX_PROMPT_BYTES: {}", raw)
                }
            }
        }

        if let Ok(level) = std::env::var("COPILOT_BRIDGE_LOG_LEVEL") {
            if !level.is_empty() {
                self.logging.level = level;
            }
        }

        if let Ok(file) = std::env::var("COPILOT_BRIDGE_LOG_FILE") {
            if !file.is_empty() {
                self.logging.file = Some(PathBuf::from(file));
            }
        }

        if let Ok(raw) = std::env::var("COPILOT_BRIDGE_DEBUG") {
            self.logging.debug = parse_bool(&raw);
        }
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns `BridgeError::Config` if the binary name is empty, the
    /// timeout is zero, or the log level is not one of debug/info/warn/error.
    pub fn validate(&self) -> Result<()> {
        if self.cli.binary.trim().is_empty() {
            return Err(BridgeError::Config("cli.binary must not be empty".to_string()).into());
        }

        if self.cli.timeout_ms == 0 {
            return Err(
                BridgeError::Config("cli.timeout_ms must be a positive integer".to_string()).into(),
            );
        }

        if self.logging.level.parse::<crate::logging::LogLevel>().is_err() {
            return Err(BridgeError::Config(format!(
                "logging.level must be one of debug, info, warn, error (got {:?})",
                self.logging.level
            ))
            .into());
        }

        Ok(())
    }

    /// Effective prompt cap in bytes, `None` when unlimited.
    pub fn prompt_byte_limit(&self) -> Option<usize> {
        self.cli.prompt_byte_limit()
    }
}

fn parse_bool(raw: &str) -> bool {
    matches!(raw.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}
