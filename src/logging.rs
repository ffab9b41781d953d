//! Structured diagnostic logging for copilot-bridge
//!
//! The [`Logger`] is a pure side-channel: records below the configured
//! minimum severity are dropped, the rest are appended as one JSON line to
//! an optional log file and mirrored through `tracing` when debug mode is
//! on or the severity is warn or higher. Nothing in here ever affects
//! control flow; file open and write failures degrade to a single warning.

use crate::config::LoggingConfig;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

/// Log severity, ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        };
        f.write_str(s)
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            other => Err(format!("unknown log level: {other}")),
        }
    }
}

/// Level-filtered structured log sink.
///
/// Construct one per process from [`LoggingConfig`] and share it behind an
/// `Arc`. Each record is appended to the configured file (if any) as a JSON
/// object `{timestamp, level, message, data?}` and mirrored to the
/// diagnostic stream via `tracing` when debug mode is enabled or the level
/// is warn/error.
pub struct Logger {
    min_level: LogLevel,
    debug: bool,
    file: Option<Mutex<File>>,
    write_failed: AtomicBool,
}

impl Logger {
    /// Build a logger from configuration.
    ///
    /// An unparsable level falls back to `info`. A log file that cannot be
    /// opened is reported once as a warning and the file sink is disabled;
    /// startup is never aborted over logging.
    pub fn new(config: &LoggingConfig) -> Self {
        let min_level = config.level.parse().unwrap_or(LogLevel::Info);

        let file = config.file.as_ref().and_then(|path| {
            match OpenOptions::new().create(true).append(true).open(path) {
                Ok(f) => Some(Mutex::new(f)),
                Err(e) => {
                    tracing::warn!("Cannot open log file {}: {}", path.display(), e);
                    None
                }
            }
        });

        Self {
            min_level,
            debug: config.debug,
            file,
            write_failed: AtomicBool::new(false),
        }
    }

    /// Minimum severity this logger records.
    pub fn min_level(&self) -> LogLevel {
        self.min_level
    }

    /// Record one diagnostic event.
    ///
    /// Events below the minimum severity are dropped. Everything else goes
    /// to the file sink (if configured) and, when debug mode is on or the
    /// severity is warn or higher, to the diagnostic stream.
    pub fn log(&self, level: LogLevel, message: &str, data: Option<serde_json::Value>) {
        if level < self.min_level {
            return;
        }

        self.append_line(level, message, &data);

        if self.debug || level >= LogLevel::Warn {
            match level {
                LogLevel::Debug => tracing::debug!(data = ?data, "{}", message),
                LogLevel::Info => tracing::info!(data = ?data, "{}", message),
                LogLevel::Warn => tracing::warn!(data = ?data, "{}", message),
                LogLevel::Error => tracing::error!(data = ?data, "{}", message),
            }
        }
    }

    /// Convenience wrapper for [`Self::log`] at debug level.
    pub fn debug(&self, message: &str, data: Option<serde_json::Value>) {
        self.log(LogLevel::Debug, message, data);
    }

    /// Convenience wrapper for [`Self::log`] at info level.
    pub fn info(&self, message: &str, data: Option<serde_json::Value>) {
        self.log(LogLevel::Info, message, data);
    }

    /// Convenience wrapper for [`Self::log`] at warn level.
    pub fn warn(&self, message: &str, data: Option<serde_json::Value>) {
        self.log(LogLevel::Warn, message, data);
    }

    /// Convenience wrapper for [`Self::log`] at error level.
    pub fn error(&self, message: &str, data: Option<serde_json::Value>) {
        self.log(LogLevel::Error, message, data);
    }

    fn append_line(&self, level: LogLevel, message: &str, data: &Option<serde_json::Value>) {
        let Some(file) = &self.file else {
            return;
        };

        let mut record = serde_json::json!({
            "timestamp": Utc::now().to_rfc3339(),
            "level": level.to_string(),
            "message": message,
        });
        if let Some(data) = data {
            record["data"] = data.clone();
        }

        let mut guard = match file.lock() {
            Ok(g) => g,
            Err(poisoned) => poisoned.into_inner(),
        };

        if writeln!(guard, "{}", record).is_err() && !self.write_failed.swap(true, Ordering::Relaxed)
        {
            tracing::warn!("Log file write failed; further failures are silent");
        }
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("min_level", &self.min_level)
            .field("debug", &self.debug)
            .field("file", &self.file.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    fn config_with_file(path: &std::path::Path, level: &str) -> LoggingConfig {
        LoggingConfig {
            level: level.to_string(),
            file: Some(path.to_path_buf()),
            debug: false,
        }
    }

    #[test]
    fn test_level_ordering() {
        assert!(LogLevel::Debug < LogLevel::Info);
        assert!(LogLevel::Info < LogLevel::Warn);
        assert!(LogLevel::Warn < LogLevel::Error);
    }

    #[test]
    fn test_level_parse() {
        assert_eq!("debug".parse::<LogLevel>().unwrap(), LogLevel::Debug);
        assert_eq!("INFO".parse::<LogLevel>().unwrap(), LogLevel::Info);
        assert_eq!("warning".parse::<LogLevel>().unwrap(), LogLevel::Warn);
        assert_eq!(" error ".parse::<LogLevel>().unwrap(), LogLevel::Error);
        assert!("loud".parse::<LogLevel>().is_err());
    }

    #[test]
    fn test_level_display_roundtrip() {
        for level in [
            LogLevel::Debug,
            LogLevel::Info,
            LogLevel::Warn,
            LogLevel::Error,
        ] {
            assert_eq!(level.to_string().parse::<LogLevel>().unwrap(), level);
        }
    }

    #[test]
    fn test_records_at_or_above_min_level() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bridge.log");
        let logger = Logger::new(&config_with_file(&path, "warn"));

        logger.info("dropped", None);
        logger.warn("kept", None);
        logger.error("also kept", Some(serde_json::json!({"code": 1})));

        let mut contents = String::new();
        std::fs::File::open(&path)
            .unwrap()
            .read_to_string(&mut contents)
            .unwrap();

        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);

        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["level"], "warn");
        assert_eq!(first["message"], "kept");
        assert!(first.get("data").is_none());

        let second: serde_json::Value = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(second["level"], "error");
        assert_eq!(second["data"]["code"], 1);
    }

    #[test]
    fn test_unparsable_level_falls_back_to_info() {
        let logger = Logger::new(&LoggingConfig {
            level: "bogus".to_string(),
            file: None,
            debug: false,
        });
        assert_eq!(logger.min_level(), LogLevel::Info);
    }

    #[test]
    fn test_unopenable_file_does_not_panic() {
        let config = LoggingConfig {
            level: "debug".to_string(),
            file: Some(std::path::PathBuf::from(
                "/nonexistent-dir-for-test/bridge.log",
            )),
            debug: false,
        };
        let logger = Logger::new(&config);
        // File sink is disabled; logging must still work.
        logger.error("still fine", None);
    }

    #[test]
    fn test_no_file_configured() {
        let logger = Logger::new(&LoggingConfig::default());
        logger.info("goes nowhere but must not panic", None);
    }
}
