//! Request and result types for command execution

use serde::{Deserialize, Serialize};

/// One command execution request.
///
/// Built by callers, consumed by a single
/// [`execute`](super::CommandExecutor::execute) call and not retained.
#[derive(Debug, Clone, Default)]
pub struct CommandRequest {
    /// Prompt text sent to the external tool
    pub prompt: String,
    /// Optional context appended to the prompt under a `Context:` header
    pub context: Option<String>,
    /// Model override; falls back to the configured default
    pub model: Option<String>,
    /// `--allow-all-tools` override; falls back to the configured default
    pub allow_all_tools: Option<bool>,
    /// External tool session to resume (`--resume <id>`)
    pub session_id: Option<String>,
    /// Extra arguments appended verbatim after the standard flags
    pub additional_args: Vec<String>,
}

impl CommandRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            ..Default::default()
        }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_allow_all_tools(mut self, allow: bool) -> Self {
        self.allow_all_tools = Some(allow);
        self
    }

    pub fn with_session_id(mut self, id: impl Into<String>) -> Self {
        self.session_id = Some(id.into());
        self
    }

    pub fn with_additional_args(mut self, args: Vec<String>) -> Self {
        self.additional_args = args;
        self
    }
}

/// Execution metadata attached to every result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultMeta {
    /// Model the command ran with, when one was resolved
    pub model: Option<String>,
    /// Wall-clock duration in milliseconds
    pub duration_ms: u64,
    /// Child exit code, absent on the timeout path
    pub exit_code: Option<i32>,
    /// Terminating unix signal number, when applicable
    pub signal: Option<i32>,
    /// Trailing slice of stderr, capped at the most recent characters
    pub stderr_snippet: Option<String>,
    /// Whether the timeout fired before the child exited
    pub timed_out: bool,
}

/// The text produced by one execution plus its metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandResult {
    pub text: String,
    pub meta: ResultMeta,
}

/// Terminal outcome of a successful execute call.
///
/// Salvage is a first-class case: a timeout with stdout already received
/// resolves as [`ExecOutcome::Partial`] rather than an error, trading
/// completeness for availability.
#[derive(Debug, Clone)]
pub enum ExecOutcome {
    /// The child exited within budget
    Completed(CommandResult),
    /// The timeout fired but partial stdout was salvaged
    Partial(CommandResult),
}

impl ExecOutcome {
    pub fn result(&self) -> &CommandResult {
        match self {
            ExecOutcome::Completed(r) | ExecOutcome::Partial(r) => r,
        }
    }

    pub fn into_result(self) -> CommandResult {
        match self {
            ExecOutcome::Completed(r) | ExecOutcome::Partial(r) => r,
        }
    }

    pub fn is_partial(&self) -> bool {
        matches!(self, ExecOutcome::Partial(_))
    }
}
