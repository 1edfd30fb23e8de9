//! Local OS automation runner.
//!
//! Runs a named automation script (a macOS Shortcut by default) as a
//! subprocess, feeding the input on stdin and capturing stdout. The command
//! is built as an argument vector, never through a shell.

use std::io::ErrorKind;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

use crate::error::ToolError;

/// Default runner binary.
pub const DEFAULT_RUNNER: &str = "shortcuts";

const DEFAULT_RUNNER_TIMEOUT: Duration = Duration::from_secs(30);

/// Failures of a runner invocation.
#[derive(Debug, Error)]
pub enum AutomationError {
    /// The runner binary does not exist.
    #[error("runner not found: {0}")]
    NotFound(String),

    /// The runner exited with a non-zero status.
    #[error("runner failed: {0}")]
    Failed(String),

    /// The runner did not finish in time.
    #[error("runner timed out after {0:?}")]
    Timeout(Duration),

    /// Spawning or talking to the process failed.
    #[error("runner I/O error: {0}")]
    Io(String),
}

impl From<AutomationError> for ToolError {
    fn from(err: AutomationError) -> Self {
        ToolError::Runner(err.to_string())
    }
}

/// Something that can run a named automation with text input.
#[async_trait]
pub trait AutomationRunner: Send + Sync {
    /// Run `script` with `input` on stdin and return its stdout.
    async fn run(&self, script: &str, input: &str) -> Result<String, AutomationError>;
}

/// Runs `<program> run <script>`, the command-line shape of macOS Shortcuts.
#[derive(Debug, Clone)]
pub struct ShortcutsRunner {
    program: String,
    timeout: Duration,
}

impl ShortcutsRunner {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            timeout: DEFAULT_RUNNER_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

impl Default for ShortcutsRunner {
    fn default() -> Self {
        Self::new(DEFAULT_RUNNER)
    }
}

#[async_trait]
impl AutomationRunner for ShortcutsRunner {
    async fn run(&self, script: &str, input: &str) -> Result<String, AutomationError> {
        debug!("Running automation '{} run {}'", self.program, script);

        let mut child = Command::new(&self.program)
            .arg("run")
            .arg(script)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => AutomationError::NotFound(self.program.clone()),
                _ => AutomationError::Io(format!("failed to spawn {}: {}", self.program, e)),
            })?;

        let stdin = child.stdin.take();
        let exchange = async move {
            if let Some(mut stdin) = stdin {
                match stdin.write_all(input.as_bytes()).await {
                    Ok(()) => {}
                    // The runner exited without reading its input.
                    Err(e) if e.kind() == ErrorKind::BrokenPipe => {}
                    Err(e) => {
                        return Err(AutomationError::Io(format!("failed to write stdin: {}", e)))
                    }
                }
            }
            child
                .wait_with_output()
                .await
                .map_err(|e| AutomationError::Io(e.to_string()))
        };

        let output = tokio::time::timeout(self.timeout, exchange)
            .await
            .map_err(|_| AutomationError::Timeout(self.timeout))??;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            let detail = if stderr.is_empty() {
                output.status.to_string()
            } else {
                stderr
            };
            return Err(AutomationError::Failed(detail));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
