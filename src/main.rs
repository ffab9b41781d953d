//! copilot-bridge - Session-aware command bridge for the GitHub Copilot CLI
//!
//! Main entry point: parses the CLI, loads configuration, and dispatches
//! to the command handlers.

use anyhow::Result;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use copilot_bridge::cli::{Cli, Commands};
use copilot_bridge::commands;
use copilot_bridge::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse_args();

    let config_path = cli.config.as_deref().unwrap_or("config/config.yaml");
    let config = Config::load(config_path, &cli)?;
    config.validate()?;

    match cli.command {
        Commands::Run {
            prompt,
            context,
            model,
            allow_all_tools,
            resume,
            extra_args,
            json,
        } => {
            tracing::debug!("Running one-shot prompt");
            let options = commands::run::RunOptions {
                context,
                model,
                allow_all_tools,
                resume,
                extra_args,
                json,
            };
            commands::run::run_prompt(config, prompt, options).await?;
            Ok(())
        }
        Commands::Chat {
            model,
            allow_all_tools,
        } => {
            tracing::debug!("Starting interactive chat");
            commands::chat::run_chat(config, model, allow_all_tools).await?;
            Ok(())
        }
        Commands::Models { json } => {
            tracing::debug!("Discovering models");
            commands::models::list_models(&config, json).await?;
            Ok(())
        }
        Commands::Doctor => {
            tracing::debug!("Running installation check");
            commands::doctor::run_doctor(&config).await?;
            Ok(())
        }
    }
}

/// Initialize tracing subscriber with environment filter
fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("copilot_bridge=info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
