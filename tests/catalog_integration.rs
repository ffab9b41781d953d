//! Integration tests for model discovery and the installation probe
//!
//! Runs the catalog against the stub Copilot CLI's `--help` output, and
//! the health check against its `--version` handling.

use std::sync::Arc;

use serial_test::serial;

use copilot_bridge::catalog::{CatalogSource, ModelCatalog, FALLBACK_MODELS};
use copilot_bridge::config::{CliToolConfig, LoggingConfig};
use copilot_bridge::executor::CommandExecutor;
use copilot_bridge::logging::Logger;

fn stub_executor() -> Arc<CommandExecutor> {
    let config = CliToolConfig {
        binary: env!("CARGO_BIN_EXE_copilot_stub").to_string(),
        ..CliToolConfig::default()
    };
    Arc::new(CommandExecutor::new(
        config,
        Arc::new(Logger::new(&LoggingConfig::default())),
    ))
}

fn missing_executor() -> Arc<CommandExecutor> {
    let config = CliToolConfig {
        binary: "/nonexistent/binary/that/does/not/exist".to_string(),
        ..CliToolConfig::default()
    };
    Arc::new(CommandExecutor::new(
        config,
        Arc::new(Logger::new(&LoggingConfig::default())),
    ))
}

#[tokio::test]
#[serial]
async fn discover_parses_models_from_help_output() {
    std::env::remove_var("COPILOT_STUB_HELP");

    let catalog = ModelCatalog::new(stub_executor());
    let result = catalog.discover().await;

    // The stub's default help mentions gpt-5.1 and the bare vendor name
    // "Claude"; only the versioned token survives the heuristic.
    assert_eq!(result.source, CatalogSource::Help);
    assert_eq!(result.models, vec!["gpt-5.1"]);
}

#[tokio::test]
#[serial]
async fn discover_falls_back_when_help_has_no_models() {
    std::env::set_var("COPILOT_STUB_HELP", "Usage: copilot [options]");

    let catalog = ModelCatalog::new(stub_executor());
    let result = catalog.discover().await;

    std::env::remove_var("COPILOT_STUB_HELP");

    assert_eq!(result.source, CatalogSource::Fallback);
    assert_eq!(result.models, FALLBACK_MODELS);
}

#[tokio::test]
async fn discover_falls_back_when_tool_is_missing() {
    let catalog = ModelCatalog::new(missing_executor());
    let result = catalog.discover().await;

    assert_eq!(result.source, CatalogSource::Fallback);
    assert!(!result.models.is_empty());
}

#[tokio::test]
async fn health_check_passes_against_stub() {
    assert!(stub_executor().health_check().await);
}

#[tokio::test]
async fn health_check_fails_for_missing_tool() {
    assert!(!missing_executor().health_check().await);
}

#[tokio::test]
async fn help_text_is_trimmed() {
    let help = stub_executor().help_text().await.unwrap();
    assert!(help.starts_with("Usage:"));
    assert!(!help.ends_with('\n'));
}
