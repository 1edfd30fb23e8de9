//! Engine invocation as an isolated subprocess.

use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, warn};

use crate::error::InvokeError;

/// Runs the reasoning engine on one utterance and returns its reply text.
///
/// Implementations must be cancel-safe: dropping the returned future
/// abandons the invocation.
#[async_trait]
pub trait EngineInvoker: Send + Sync {
    async fn invoke(&self, utterance: &str) -> Result<String, InvokeError>;
}

/// Invokes `program [args..] --functions <toolset> -- <utterance>` without a shell.
///
/// The utterance is always a single argv element after `--`, so its content
/// can never be read as a flag or as command syntax. The child is killed when
/// the invocation future is dropped.
#[derive(Debug, Clone)]
pub struct CommandInvoker {
    program: String,
    args: Vec<String>,
    functions: String,
}

impl CommandInvoker {
    pub fn new(program: impl Into<String>, functions: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            functions: functions.into(),
        }
    }

    /// Fixed arguments placed before `--functions`.
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Full argv after the program name.
    pub fn argv(&self, utterance: &str) -> Vec<String> {
        let mut argv = self.args.clone();
        argv.push("--functions".to_string());
        argv.push(self.functions.clone());
        argv.push("--".to_string());
        argv.push(utterance.to_string());
        argv
    }
}

#[async_trait]
impl EngineInvoker for CommandInvoker {
    async fn invoke(&self, utterance: &str) -> Result<String, InvokeError> {
        debug!("Spawning {} with toolset {}", self.program, self.functions);

        let output = Command::new(&self.program)
            .args(self.argv(utterance))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|source| InvokeError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            warn!("Engine exited with {}", output.status);
            return Err(InvokeError::ExitStatus {
                code: output.status.code(),
                stderr,
            });
        }

        Ok(String::from_utf8(output.stdout)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_argv_shape() {
        let invoker = CommandInvoker::new("watari-assistant", "calendar").with_args(["-v"]);
        assert_eq!(
            invoker.argv("--authorize; rm -rf /"),
            vec!["-v", "--functions", "calendar", "--", "--authorize; rm -rf /"]
        );
    }

    #[tokio::test]
    async fn test_utterance_is_one_argument() {
        let invoker = CommandInvoker::new("sh", "weather")
            .with_args(["-c", "printf '%s|' \"$@\"", "sh"]);
        let out = invoker.invoke("hello $(whoami); `id`").await.unwrap();
        assert_eq!(out, "--functions|weather|--|hello $(whoami); `id`|");
    }

    #[tokio::test]
    async fn test_nonzero_exit_captures_stderr() {
        let invoker = CommandInvoker::new("sh", "calendar")
            .with_args(["-c", "echo partial; echo boom >&2; exit 3", "sh"]);
        match invoker.invoke("hi").await {
            Err(InvokeError::ExitStatus { code, stderr }) => {
                assert_eq!(code, Some(3));
                assert_eq!(stderr, "boom");
            }
            other => panic!("Expected ExitStatus, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_missing_program() {
        let invoker = CommandInvoker::new("/nonexistent/watari-assistant", "calendar");
        assert!(matches!(
            invoker.invoke("hi").await,
            Err(InvokeError::Spawn { .. })
        ));
    }

    #[tokio::test]
    async fn test_dropped_invocation_returns_promptly() {
        let invoker =
            CommandInvoker::new("sh", "calendar").with_args(["-c", "sleep 30", "sh"]);
        let started = std::time::Instant::now();
        let result = tokio::time::timeout(Duration::from_millis(200), invoker.invoke("hi")).await;
        assert!(result.is_err());
        assert!(started.elapsed() < Duration::from_secs(5));
    }
}
