//! Interactive chat session
//!
//! A readline loop that submits each input line to the command executor
//! and records the exchanges in an in-process session. Commands prefixed
//! with `/` are handled locally instead of being sent to the Copilot CLI.

use std::sync::Arc;

use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use thiserror::Error;

use crate::catalog::ModelCatalog;
use crate::config::Config;
use crate::error::Result;
use crate::executor::{CommandExecutor, CommandRequest};
use crate::logging::Logger;
use crate::session::SessionStore;

/// Errors that can occur when parsing special commands
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// Unknown command was entered
    #[error("Unknown command: {0}\n\nType '/help' to see available commands")]
    UnknownCommand(String),
}

/// Special commands handled locally during interactive chat
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecialCommand {
    /// Show the history of the active session
    History,
    /// Show the active session id and message count
    Session,
    /// List all sessions created in this process
    Sessions,
    /// Discover and list model identifiers
    Models,
    /// Display help for special commands
    Help,
    /// Leave the chat loop
    Exit,
}

/// Parse a special command from an input line.
///
/// Returns `Ok(None)` when the line is a regular prompt (no `/` prefix).
/// Commands are case-insensitive.
pub fn parse_special_command(line: &str) -> std::result::Result<Option<SpecialCommand>, CommandError> {
    if !line.starts_with('/') {
        return Ok(None);
    }

    match line.trim().to_lowercase().as_str() {
        "/history" => Ok(Some(SpecialCommand::History)),
        "/session" => Ok(Some(SpecialCommand::Session)),
        "/sessions" => Ok(Some(SpecialCommand::Sessions)),
        "/models" => Ok(Some(SpecialCommand::Models)),
        "/help" => Ok(Some(SpecialCommand::Help)),
        "/quit" | "/exit" => Ok(Some(SpecialCommand::Exit)),
        other => Err(CommandError::UnknownCommand(other.to_string())),
    }
}

fn print_help() {
    println!("\nAvailable commands:");
    println!("  /history   Show the exchanges recorded in this session");
    println!("  /session   Show the active session id");
    println!("  /sessions  List all sessions in this process");
    println!("  /models    List model identifiers from the Copilot CLI");
    println!("  /help      Show this help");
    println!("  /quit      Exit chat (also /exit, Ctrl-D)\n");
}

/// Run the interactive chat loop.
///
/// Creates a fresh session, threads its context into every execution, and
/// keeps the loop alive across command failures; only readline errors and
/// an explicit exit end the session.
pub async fn run_chat(
    config: Config,
    model: Option<String>,
    allow_all_tools: bool,
) -> Result<()> {
    let logger = Arc::new(Logger::new(&config.logging));
    let executor = Arc::new(CommandExecutor::new(config.cli.clone(), Arc::clone(&logger)));
    let catalog = ModelCatalog::new(Arc::clone(&executor));

    let store = Arc::new(SessionStore::new());
    let session_id = store.create();
    let session_ctx = store
        .current_context()
        .ok_or_else(|| anyhow::anyhow!("session {} vanished before first use", session_id))?;

    println!(
        "{} session {}",
        "Copilot Bridge chat".bold(),
        session_id.dimmed()
    );
    println!("Type '/help' for commands, '/quit' to exit.\n");

    let mut rl = DefaultEditor::new()?;

    loop {
        match rl.readline("copilot> ") {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(trimmed);

                match parse_special_command(trimmed) {
                    Ok(Some(SpecialCommand::Exit)) => break,
                    Ok(Some(SpecialCommand::Help)) => print_help(),
                    Ok(Some(SpecialCommand::Session)) => {
                        let summary = store
                            .list()
                            .into_iter()
                            .find(|s| s.id == session_id);
                        match summary {
                            Some(s) => println!(
                                "Session {} ({} messages, started {})",
                                s.id,
                                s.message_count,
                                s.start_time.format("%H:%M:%S")
                            ),
                            None => println!("Session {}", session_id),
                        }
                    }
                    Ok(Some(SpecialCommand::Sessions)) => {
                        for s in store.list() {
                            println!(
                                "{}  {} messages, last activity {}",
                                s.id,
                                s.message_count,
                                s.last_activity.format("%H:%M:%S")
                            );
                        }
                    }
                    Ok(Some(SpecialCommand::History)) => {
                        let history = store
                            .get(&session_id)
                            .map(|s| s.history)
                            .unwrap_or_default();
                        if history.is_empty() {
                            println!("No exchanges recorded yet.");
                        }
                        for (i, entry) in history.iter().enumerate() {
                            println!("{} {}", format!("[{}]", i + 1).dimmed(), entry.prompt);
                            println!("    {}", entry.response);
                        }
                    }
                    Ok(Some(SpecialCommand::Models)) => {
                        let result = catalog.discover().await;
                        println!("Models (source: {:?}):", result.source);
                        for m in result.models {
                            println!("  {m}");
                        }
                    }
                    Ok(None) => {
                        let mut request = CommandRequest::new(trimmed)
                            .with_session_id(session_id.clone());
                        if let Some(model) = &model {
                            request = request.with_model(model.clone());
                        }
                        if allow_all_tools {
                            request = request.with_allow_all_tools(true);
                        }

                        // Command failures never end the chat loop.
                        match executor.execute(&request, Some(&session_ctx)).await {
                            Ok(outcome) => {
                                if outcome.is_partial() {
                                    eprintln!(
                                        "{}",
                                        "warning: timed out, response may be truncated".yellow()
                                    );
                                }
                                println!("{}\n", outcome.result().text);
                            }
                            Err(e) => eprintln!("{}\n", format!("Error: {e:#}").red()),
                        }
                    }
                    Err(e) => eprintln!("{}", e.to_string().yellow()),
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                println!("Goodbye.");
                break;
            }
            Err(e) => return Err(e.into()),
        }
    }

    Ok(())
}
