//! Subprocess command execution engine
//!
//! This module spawns the external Copilot CLI once per request, feeds it
//! the prompt over stdin, accumulates both output streams as they arrive,
//! and races the child's exit against a timeout. A timeout with stdout
//! already received resolves as a partial success instead of an error
//! (salvage); a timeout with nothing received fails. Exit outcomes are
//! classified into auth-required, normal, and empty-response cases.
//!
//! The prompt travels exclusively over stdin so it never appears in a
//! process argument listing.

mod launcher;
mod types;

pub use launcher::{ProcessLauncher, SystemLauncher};
pub use types::{CommandRequest, CommandResult, ExecOutcome, ResultMeta};

use std::process::ExitStatus;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::task::JoinHandle;

use crate::config::CliToolConfig;
use crate::error::{BridgeError, Result};
use crate::logging::Logger;
use crate::session::SessionContext;

/// Timeout for the help and version probes, separate from the command
/// timeout.
pub const PROBE_TIMEOUT_MS: u64 = 5_000;

/// Most recent stderr characters kept in result metadata.
const STDERR_SNIPPET_MAX: usize = 400;

const EMPTY_RESPONSE_TEXT: &str = "No response from Copilot CLI";
const PARTIAL_TIMEOUT_TEXT: &str = "Copilot CLI timed out, but partial response received";

/// Executes commands against the external Copilot CLI.
///
/// Each [`execute`](Self::execute) call owns one child process and its own
/// accumulator state; instances are cheap to share and safe to call
/// concurrently. The only shared mutable state is whatever
/// [`SessionContext`] callers choose to thread in.
pub struct CommandExecutor {
    config: CliToolConfig,
    logger: Arc<Logger>,
    launcher: Arc<dyn ProcessLauncher>,
}

impl CommandExecutor {
    /// Build an executor that spawns real processes.
    pub fn new(config: CliToolConfig, logger: Arc<Logger>) -> Self {
        Self::with_launcher(config, logger, Arc::new(SystemLauncher))
    }

    /// Build an executor with a custom [`ProcessLauncher`].
    pub fn with_launcher(
        config: CliToolConfig,
        logger: Arc<Logger>,
        launcher: Arc<dyn ProcessLauncher>,
    ) -> Self {
        Self {
            config,
            logger,
            launcher,
        }
    }

    /// Run one prompt through the external tool.
    ///
    /// When `session` is supplied, every completed or partial result is
    /// appended to that session's history; failures record nothing.
    ///
    /// # Errors
    ///
    /// Fails with [`BridgeError::PromptTooLarge`] before any spawn when the
    /// composed prompt exceeds the configured byte cap, with
    /// [`BridgeError::Spawn`] when the process cannot start, with
    /// [`BridgeError::AuthRequired`] when the tool produced no stdout and
    /// its stderr indicates a missing login, and with
    /// [`BridgeError::Timeout`] when the budget elapses with no stdout to
    /// salvage.
    pub async fn execute(
        &self,
        request: &CommandRequest,
        session: Option<&SessionContext>,
    ) -> Result<ExecOutcome> {
        let full_prompt = compose_prompt(&request.prompt, request.context.as_deref());

        if let Some(limit) = self.config.prompt_byte_limit() {
            let size = full_prompt.len();
            if size > limit {
                self.logger.warn(
                    "Prompt rejected before spawn",
                    Some(serde_json::json!({"size": size, "limit": limit})),
                );
                return Err(BridgeError::PromptTooLarge { size, limit }.into());
            }
        }

        let model = request
            .model
            .clone()
            .or_else(|| self.config.default_model.clone());
        let allow_all_tools = request
            .allow_all_tools
            .unwrap_or(self.config.allow_all_tools);

        let args = build_args(
            model.as_deref(),
            allow_all_tools,
            request.session_id.as_deref(),
            &request.additional_args,
        );

        self.logger.info(
            "Executing Copilot CLI command",
            Some(serde_json::json!({
                "model": model,
                "timeout_ms": self.config.timeout_ms,
                "prompt_bytes": full_prompt.len(),
            })),
        );

        let started = Instant::now();
        let mut child = self
            .launcher
            .launch(&self.config.binary, &args)
            .map_err(|e| BridgeError::Spawn(e.to_string()))?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| BridgeError::Spawn("child stdout unavailable after spawn".into()))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| BridgeError::Spawn("child stderr unavailable after spawn".into()))?;

        let stdout_buf = Arc::new(Mutex::new(String::new()));
        let stderr_buf = Arc::new(Mutex::new(String::new()));
        let stdout_seen = Arc::new(AtomicBool::new(false));

        let stdout_task = drain_stream(stdout, Arc::clone(&stdout_buf), Some(Arc::clone(&stdout_seen)));
        let stderr_task = drain_stream(stderr, Arc::clone(&stderr_buf), None);

        // Deliver the prompt over stdin and close the pipe. A write failure
        // is logged; the exit or timeout event still decides the outcome.
        if let Some(mut stdin) = child.stdin.take() {
            let prompt_bytes = full_prompt.clone().into_bytes();
            let logger = Arc::clone(&self.logger);
            tokio::spawn(async move {
                if let Err(e) = stdin.write_all(&prompt_bytes).await {
                    logger.warn(
                        "Failed to write prompt to Copilot CLI stdin",
                        Some(serde_json::json!({"error": e.to_string()})),
                    );
                }
                let _ = stdin.shutdown().await;
            });
        }

        let timeout = Duration::from_millis(self.config.timeout_ms);
        let waited = tokio::select! {
            status = child.wait() => Some(status),
            _ = tokio::time::sleep(timeout) => None,
        };

        match waited {
            Some(status) => {
                let status = status.map_err(|e| {
                    BridgeError::Spawn(format!("error while awaiting Copilot CLI: {e}"))
                })?;

                finish_readers(stdout_task, stderr_task, Duration::from_secs(1)).await;

                let duration_ms = started.elapsed().as_millis() as u64;
                let stdout_text = take_buffer(&stdout_buf);
                let stderr_text = take_buffer(&stderr_buf);
                let received_stdout = stdout_seen.load(Ordering::Relaxed);

                if !received_stdout && looks_like_auth_failure(&stderr_text) {
                    self.logger.error(
                        "Copilot CLI reported missing authentication",
                        Some(serde_json::json!({"exit_code": status.code()})),
                    );
                    return Err(BridgeError::AuthRequired.into());
                }

                let stdout_trimmed = stdout_text.trim();
                let stderr_trimmed = stderr_text.trim();
                let text = if !stdout_trimmed.is_empty() {
                    stdout_trimmed.to_string()
                } else if !stderr_trimmed.is_empty() {
                    stderr_trimmed.to_string()
                } else {
                    EMPTY_RESPONSE_TEXT.to_string()
                };

                let result = CommandResult {
                    text,
                    meta: ResultMeta {
                        model,
                        duration_ms,
                        exit_code: status.code(),
                        signal: signal_of(&status),
                        stderr_snippet: stderr_snippet(stderr_trimmed),
                        timed_out: false,
                    },
                };

                self.logger.info(
                    "Copilot CLI command completed",
                    Some(serde_json::json!({
                        "duration_ms": duration_ms,
                        "exit_code": status.code(),
                    })),
                );

                self.record(session, &full_prompt, &result.text);
                Ok(ExecOutcome::Completed(result))
            }
            None => {
                // Timeout won the race. Kill and reap the child, then
                // decide between salvage and failure.
                let _ = child.start_kill();
                let _ = child.wait().await;
                finish_readers(stdout_task, stderr_task, Duration::from_millis(200)).await;

                let duration_ms = started.elapsed().as_millis() as u64;
                let stdout_text = take_buffer(&stdout_buf);
                let stderr_text = take_buffer(&stderr_buf);
                let received_stdout = stdout_seen.load(Ordering::Relaxed);

                if !received_stdout {
                    self.logger.error(
                        "Copilot CLI timed out with no output",
                        Some(serde_json::json!({"timeout_ms": self.config.timeout_ms})),
                    );
                    return Err(BridgeError::Timeout(self.config.timeout_ms).into());
                }

                self.logger.warn(
                    "Copilot CLI timed out, salvaging partial output",
                    Some(serde_json::json!({
                        "timeout_ms": self.config.timeout_ms,
                        "stdout_bytes": stdout_text.len(),
                    })),
                );

                let stdout_trimmed = stdout_text.trim();
                let text = if stdout_trimmed.is_empty() {
                    PARTIAL_TIMEOUT_TEXT.to_string()
                } else {
                    stdout_trimmed.to_string()
                };

                let result = CommandResult {
                    text,
                    meta: ResultMeta {
                        model,
                        duration_ms,
                        exit_code: None,
                        signal: None,
                        stderr_snippet: stderr_snippet(stderr_text.trim()),
                        timed_out: true,
                    },
                };

                self.record(session, &full_prompt, &result.text);
                Ok(ExecOutcome::Partial(result))
            }
        }
    }

    /// Check whether the external tool is installed and responsive.
    ///
    /// Runs the version probe under [`PROBE_TIMEOUT_MS`]; any error or
    /// timeout counts as not installed.
    pub async fn health_check(&self) -> bool {
        match self.probe("--version").await {
            Ok((status, _, _)) => status.success(),
            Err(_) => false,
        }
    }

    /// Capture the external tool's help output.
    ///
    /// Returns trimmed stdout, falling back to trimmed stderr when stdout
    /// is empty.
    ///
    /// # Errors
    ///
    /// Propagates spawn failures and the probe timeout; the model catalog
    /// treats any error as a fallback trigger.
    pub async fn help_text(&self) -> Result<String> {
        let (_, stdout, stderr) = self.probe("--help").await?;
        let out = stdout.trim();
        if !out.is_empty() {
            Ok(out.to_string())
        } else {
            Ok(stderr.trim().to_string())
        }
    }

    /// Run the tool with a single flag under the short probe timeout,
    /// capturing both streams.
    async fn probe(&self, flag: &str) -> Result<(ExitStatus, String, String)> {
        let args = vec![flag.to_string()];
        let mut child = self
            .launcher
            .launch(&self.config.binary, &args)
            .map_err(|e| BridgeError::Spawn(e.to_string()))?;

        // No input for probes; close stdin right away.
        drop(child.stdin.take());

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| BridgeError::Spawn("child stdout unavailable after spawn".into()))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| BridgeError::Spawn("child stderr unavailable after spawn".into()))?;

        let stdout_buf = Arc::new(Mutex::new(String::new()));
        let stderr_buf = Arc::new(Mutex::new(String::new()));
        let stdout_task = drain_stream(stdout, Arc::clone(&stdout_buf), None);
        let stderr_task = drain_stream(stderr, Arc::clone(&stderr_buf), None);

        let waited = tokio::select! {
            status = child.wait() => Some(status),
            _ = tokio::time::sleep(Duration::from_millis(PROBE_TIMEOUT_MS)) => None,
        };

        match waited {
            Some(status) => {
                let status = status.map_err(|e| {
                    BridgeError::Spawn(format!("error while awaiting Copilot CLI: {e}"))
                })?;
                finish_readers(stdout_task, stderr_task, Duration::from_secs(1)).await;
                Ok((status, take_buffer(&stdout_buf), take_buffer(&stderr_buf)))
            }
            None => {
                let _ = child.start_kill();
                let _ = child.wait().await;
                stdout_task.abort();
                stderr_task.abort();
                Err(BridgeError::Timeout(PROBE_TIMEOUT_MS).into())
            }
        }
    }

    fn record(&self, session: Option<&SessionContext>, prompt: &str, response: &str) {
        if let Some(ctx) = session {
            ctx.append(prompt, response);
            self.logger.debug(
                "Recorded exchange in session",
                Some(serde_json::json!({"session_id": ctx.id()})),
            );
        }
    }
}

/// Compose the full prompt, appending supplied context under a header.
fn compose_prompt(prompt: &str, context: Option<&str>) -> String {
    match context {
        Some(ctx) if !ctx.is_empty() => format!("{prompt}\n\nContext:\n{ctx}"),
        _ => prompt.to_string(),
    }
}

/// Build the argument vector for one execution.
///
/// `--silent` always comes first; caller-supplied extra arguments go last,
/// verbatim.
fn build_args(
    model: Option<&str>,
    allow_all_tools: bool,
    session_id: Option<&str>,
    additional_args: &[String],
) -> Vec<String> {
    let mut args = vec!["--silent".to_string()];
    if let Some(model) = model {
        args.push("--model".to_string());
        args.push(model.to_string());
    }
    if allow_all_tools {
        args.push("--allow-all-tools".to_string());
    }
    if let Some(id) = session_id {
        args.push("--resume".to_string());
        args.push(id.to_string());
    }
    args.extend(additional_args.iter().cloned());
    args
}

/// Accumulate a child stream into a shared buffer as raw chunks.
///
/// Chunked (rather than line-based) reads matter here: a partial line that
/// arrives before a timeout must still be salvageable.
fn drain_stream<R>(
    mut stream: R,
    buf: Arc<Mutex<String>>,
    seen: Option<Arc<AtomicBool>>,
) -> JoinHandle<()>
where
    R: tokio::io::AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut chunk = [0u8; 4096];
        loop {
            match stream.read(&mut chunk).await {
                Ok(0) => break,
                Ok(n) => {
                    if let Some(flag) = &seen {
                        flag.store(true, Ordering::Relaxed);
                    }
                    let mut guard = match buf.lock() {
                        Ok(g) => g,
                        Err(poisoned) => poisoned.into_inner(),
                    };
                    guard.push_str(&String::from_utf8_lossy(&chunk[..n]));
                }
                Err(_) => break,
            }
        }
    })
}

/// Give the reader tasks a bounded window to reach EOF, then abort them.
///
/// A grandchild that inherited the pipes must never stall a terminal
/// outcome; whatever the buffers hold when the window closes is the output.
async fn finish_readers(
    stdout_task: JoinHandle<()>,
    stderr_task: JoinHandle<()>,
    grace: Duration,
) {
    let stdout_abort = stdout_task.abort_handle();
    let stderr_abort = stderr_task.abort_handle();

    let drained = tokio::time::timeout(grace, async {
        let _ = stdout_task.await;
        let _ = stderr_task.await;
    })
    .await;

    if drained.is_err() {
        stdout_abort.abort();
        stderr_abort.abort();
    }
}

fn take_buffer(buf: &Arc<Mutex<String>>) -> String {
    match buf.lock() {
        Ok(guard) => guard.clone(),
        Err(poisoned) => poisoned.into_inner().clone(),
    }
}

fn looks_like_auth_failure(stderr: &str) -> bool {
    let lowered = stderr.to_lowercase();
    lowered.contains("login") || lowered.contains("authenticate")
}

/// Trailing slice of stderr for result metadata; the most recent output is
/// the part worth keeping.
fn stderr_snippet(stderr: &str) -> Option<String> {
    if stderr.is_empty() {
        return None;
    }
    let count = stderr.chars().count();
    if count <= STDERR_SNIPPET_MAX {
        Some(stderr.to_string())
    } else {
        Some(stderr.chars().skip(count - STDERR_SNIPPET_MAX).collect())
    }
}

#[cfg(unix)]
fn signal_of(status: &ExitStatus) -> Option<i32> {
    use std::os::unix::process::ExitStatusExt;
    status.signal()
}

#[cfg(not(unix))]
fn signal_of(_status: &ExitStatus) -> Option<i32> {
    None
}
