//! One-shot prompt execution

use std::sync::Arc;

use colored::Colorize;

use crate::config::Config;
use crate::error::Result;
use crate::executor::{CommandExecutor, CommandRequest, ExecOutcome};
use crate::logging::Logger;

/// Options for a single `run` invocation, mirroring the CLI flags.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub context: Option<String>,
    pub model: Option<String>,
    pub allow_all_tools: bool,
    pub resume: Option<String>,
    pub extra_args: Vec<String>,
    pub json: bool,
}

/// Execute one prompt and print the result.
///
/// A partial (timed-out but salvaged) result still prints its text; the
/// truncation is noted on stderr so plain-text output stays pipeable.
pub async fn run_prompt(config: Config, prompt: String, options: RunOptions) -> Result<()> {
    let logger = Arc::new(Logger::new(&config.logging));
    let executor = CommandExecutor::new(config.cli.clone(), logger);

    let mut request = CommandRequest::new(prompt);
    if let Some(context) = options.context {
        request = request.with_context(context);
    }
    if let Some(model) = options.model {
        request = request.with_model(model);
    }
    if options.allow_all_tools {
        request = request.with_allow_all_tools(true);
    }
    if let Some(resume) = options.resume {
        request = request.with_session_id(resume);
    }
    request = request.with_additional_args(options.extra_args);

    let outcome = executor.execute(&request, None).await?;

    if options.json {
        print_json(&outcome)?;
    } else {
        if outcome.is_partial() {
            eprintln!(
                "{}",
                "warning: command timed out, response may be truncated".yellow()
            );
        }
        println!("{}", outcome.result().text);
    }

    Ok(())
}

fn print_json(outcome: &ExecOutcome) -> Result<()> {
    let payload = serde_json::json!({
        "text": outcome.result().text,
        "partial": outcome.is_partial(),
        "meta": outcome.result().meta,
    });
    println!("{}", serde_json::to_string_pretty(&payload)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::{CommandResult, ResultMeta};

    fn sample_result(timed_out: bool) -> CommandResult {
        CommandResult {
            text: "hello".to_string(),
            meta: ResultMeta {
                model: Some("gpt-5.1".to_string()),
                duration_ms: 42,
                exit_code: if timed_out { None } else { Some(0) },
                signal: None,
                stderr_snippet: None,
                timed_out,
            },
        }
    }

    #[test]
    fn test_print_json_completed() {
        assert!(print_json(&ExecOutcome::Completed(sample_result(false))).is_ok());
    }

    #[test]
    fn test_print_json_partial() {
        assert!(print_json(&ExecOutcome::Partial(sample_result(true))).is_ok());
    }

    #[test]
    fn test_run_options_default() {
        let options = RunOptions::default();
        assert_eq!(options.context, None);
        assert!(!options.allow_all_tools);
        assert!(!options.json);
        assert!(options.extra_args.is_empty());
    }
}
