//! Advisory model catalog
//!
//! Model identifiers are discovered by running the external tool's help
//! output through a text heuristic: word-boundary runs starting with a
//! known vendor prefix, keeping only tokens that carry a digit (bare vendor
//! names are not model ids). Any failure, timeout, or empty yield falls
//! back to a fixed list. The result is advisory; nothing guarantees a
//! returned identifier is actually selectable by the tool.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;

use crate::executor::CommandExecutor;

/// Hard-coded fallback when help discovery yields nothing.
///
/// Advisory only; these are ids the Copilot CLI commonly accepts, with no
/// freshness guarantee.
pub const FALLBACK_MODELS: &[&str] = &[
    "gpt-5.1",
    "gpt-5.1-codex",
    "claude-sonnet-4.5",
    "claude-haiku-4.5",
    "gemini-2.5-pro",
];

/// Where a catalog result came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CatalogSource {
    /// Parsed out of the tool's help output
    Help,
    /// The hard-coded fallback list
    Fallback,
}

/// Discovered model identifiers in first-seen order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelCatalogResult {
    pub models: Vec<String>,
    pub source: CatalogSource,
}

/// Strategy for turning help text into model identifiers.
///
/// The default is [`VendorPrefixParser`]; swapping the strategy never
/// touches the process-spawning side of discovery.
pub trait HelpParser: Send + Sync {
    fn models_from_help(&self, help: &str) -> Vec<String>;
}

/// Default heuristic: vendor-prefixed tokens that contain a digit.
#[derive(Debug)]
pub struct VendorPrefixParser {
    pattern: Regex,
}

impl VendorPrefixParser {
    pub fn new() -> Self {
        // Prefix family is fixed; tokens continue over alphanumerics,
        // dots, and dashes.
        let pattern = Regex::new(
            r"(?i)\b(?:gpt|claude|gemini|llama|grok|mistral|deepseek)[a-z0-9.\-]*",
        )
        .expect("Invalid model-name pattern");
        Self { pattern }
    }
}

impl Default for VendorPrefixParser {
    fn default() -> Self {
        Self::new()
    }
}

impl HelpParser for VendorPrefixParser {
    fn models_from_help(&self, help: &str) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut models = Vec::new();

        for token in self.pattern.find_iter(help) {
            let lowered = token.as_str().to_lowercase();

            // A bare vendor name ("Claude") is not a model id; versions
            // always carry a digit.
            if !lowered.chars().any(|c| c.is_ascii_digit()) {
                continue;
            }

            if seen.insert(lowered.clone()) {
                models.push(lowered);
            }
        }

        models
    }
}

/// Extract model identifiers from help text with the default heuristic.
///
/// Pure and deterministic; unit-testable without spawning anything.
pub fn extract_model_names(help: &str) -> Vec<String> {
    VendorPrefixParser::new().models_from_help(help)
}

/// Discovers model identifiers via the external tool's help output.
pub struct ModelCatalog {
    executor: Arc<CommandExecutor>,
    parser: Box<dyn HelpParser>,
    fallback: Vec<String>,
}

impl ModelCatalog {
    pub fn new(executor: Arc<CommandExecutor>) -> Self {
        Self {
            executor,
            parser: Box::new(VendorPrefixParser::new()),
            fallback: FALLBACK_MODELS.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Replace the parsing strategy.
    pub fn with_parser(mut self, parser: Box<dyn HelpParser>) -> Self {
        self.parser = parser;
        self
    }

    /// Discover available model identifiers.
    ///
    /// Never fails: help-probe errors, timeouts, empty help text, and an
    /// empty heuristic yield all degrade to the fallback list.
    pub async fn discover(&self) -> ModelCatalogResult {
        match self.executor.help_text().await {
            Ok(help) if !help.is_empty() => {
                let models = self.parser.models_from_help(&help);
                if !models.is_empty() {
                    tracing::debug!("Discovered {} models from help output", models.len());
                    return ModelCatalogResult {
                        models,
                        source: CatalogSource::Help,
                    };
                }
                tracing::debug!("Help output yielded no model names, using fallback");
            }
            Ok(_) => tracing::debug!("Help output was empty, using fallback"),
            Err(e) => tracing::debug!("Help discovery failed ({}), using fallback", e),
        }

        ModelCatalogResult {
            models: self.fallback.clone(),
            source: CatalogSource::Fallback,
        }
    }
}
