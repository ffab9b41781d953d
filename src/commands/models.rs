//! Model discovery command

use std::sync::Arc;

use prettytable::{row, Table};

use crate::catalog::{CatalogSource, ModelCatalog, ModelCatalogResult};
use crate::config::Config;
use crate::error::Result;
use crate::executor::CommandExecutor;
use crate::logging::Logger;

/// Discover model identifiers and print them.
///
/// The catalog is advisory: ids come from a text heuristic over the tool's
/// help output (or a fixed fallback) and are not validated.
pub async fn list_models(config: &Config, json: bool) -> Result<()> {
    let logger = Arc::new(Logger::new(&config.logging));
    let executor = Arc::new(CommandExecutor::new(config.cli.clone(), logger));
    let catalog = ModelCatalog::new(executor);

    let result = catalog.discover().await;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_models_table(&result);
    }

    Ok(())
}

fn print_models_table(result: &ModelCatalogResult) {
    let source = match result.source {
        CatalogSource::Help => "help output",
        CatalogSource::Fallback => "fallback list",
    };

    let mut table = Table::new();
    table.add_row(row!["Model"]);
    for model in &result.models {
        table.add_row(row![model]);
    }

    println!("\nDiscovered models (source: {source}, advisory):\n");
    table.printstd();
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_print_models_table_does_not_panic() {
        let result = ModelCatalogResult {
            models: vec!["gpt-5.1".to_string(), "claude-sonnet-4.5".to_string()],
            source: CatalogSource::Help,
        };
        print_models_table(&result);

        let empty = ModelCatalogResult {
            models: vec![],
            source: CatalogSource::Fallback,
        };
        print_models_table(&empty);
    }

    #[test]
    fn test_catalog_result_json_shape() {
        let result = ModelCatalogResult {
            models: vec!["gpt-5.1".to_string()],
            source: CatalogSource::Help,
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["models"][0], "gpt-5.1");
        assert_eq!(json["source"], "help");
    }
}
