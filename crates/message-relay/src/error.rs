//! Error types for the relay.

use std::time::Duration;

use discord_client::DiscordError;
use thiserror::Error;

/// Errors from a single engine invocation.
#[derive(Debug, Error)]
pub enum InvokeError {
    /// The engine process could not be started.
    #[error("failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// Reading the engine's output failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The engine exited unsuccessfully.
    #[error("engine exited with {}: {stderr}", exit_label(.code))]
    ExitStatus { code: Option<i32>, stderr: String },

    /// The engine wrote something other than UTF-8 to stdout.
    #[error("engine output is not UTF-8: {0}")]
    NonUtf8(#[from] std::string::FromUtf8Error),

    /// The engine did not finish in time.
    #[error("engine timed out after {0:?}")]
    Timeout(Duration),
}

fn exit_label(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("status {}", code),
        None => "signal".to_string(),
    }
}

/// Errors from the relay loop.
#[derive(Debug, Error)]
pub enum RelayError {
    /// Sending to or receiving from the chat transport failed.
    #[error("transport error: {0}")]
    Transport(String),

    /// Discord API failure.
    #[error("discord error: {0}")]
    Discord(#[from] DiscordError),

    /// Invalid relay configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// The inbound message stream ended.
    #[error("message stream ended")]
    StreamEnded,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_status_display() {
        let err = InvokeError::ExitStatus {
            code: Some(2),
            stderr: "LLM_API_KEY not set".to_string(),
        };
        assert_eq!(err.to_string(), "engine exited with status 2: LLM_API_KEY not set");

        let err = InvokeError::ExitStatus {
            code: None,
            stderr: String::new(),
        };
        assert!(err.to_string().starts_with("engine exited with signal"));
    }
}
