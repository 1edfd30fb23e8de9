//! Relay configuration.

use std::env;
use std::time::Duration;

use crate::error::RelayError;
use crate::invoker::CommandInvoker;

/// Default wall-clock bound on one engine invocation.
pub const DEFAULT_ENGINE_TIMEOUT: Duration = Duration::from_secs(10);

/// Default number of messages handled at once.
pub const DEFAULT_MAX_CONCURRENT: usize = 4;

/// Default engine binary name.
pub const DEFAULT_ENGINE_PROGRAM: &str = "watari-assistant";

/// Fixed reply when the engine does not finish in time.
pub const TIMEOUT_TEXT: &str = "Command timed out";

/// Fixed reply for every other failure.
pub const FAILURE_TEXT: &str = "ERROR";

/// Configuration for the relay loop.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// Wall-clock bound on one engine invocation.
    pub engine_timeout: Duration,

    /// Maximum messages dispatched concurrently.
    pub max_concurrent: usize,

    /// Discard messages from any bot account, not only our own.
    pub ignore_bots: bool,

    /// Engine program followed by fixed arguments.
    pub engine_command: Vec<String>,

    /// Toolset passed as `--functions`.
    pub functions: String,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            engine_timeout: DEFAULT_ENGINE_TIMEOUT,
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            ignore_bots: true,
            engine_command: vec![default_engine_program()],
            functions: "calendar".to_string(),
        }
    }
}

impl RelayConfig {
    /// Load configuration from environment variables.
    ///
    /// - `RELAY_ENGINE_COMMAND` - program and fixed args, whitespace-separated
    ///   (default: `watari-assistant` next to the running binary)
    /// - `RELAY_FUNCTIONS` (default: calendar)
    /// - `RELAY_TIMEOUT_SECS` (default: 10)
    /// - `RELAY_MAX_CONCURRENT` (default: 4)
    /// - `RELAY_IGNORE_BOTS` (default: true)
    pub fn from_env() -> Result<Self, RelayError> {
        let mut config = Self::default();

        if let Ok(command) = env::var("RELAY_ENGINE_COMMAND") {
            let parts: Vec<String> = command.split_whitespace().map(str::to_string).collect();
            if parts.is_empty() {
                return Err(RelayError::Config("RELAY_ENGINE_COMMAND is empty".to_string()));
            }
            config.engine_command = parts;
        }

        if let Ok(functions) = env::var("RELAY_FUNCTIONS") {
            if !functions.trim().is_empty() {
                config.functions = functions.trim().to_string();
            }
        }

        if let Ok(secs) = env::var("RELAY_TIMEOUT_SECS") {
            let secs: u64 = secs
                .parse()
                .map_err(|_| RelayError::Config(format!("invalid RELAY_TIMEOUT_SECS: {}", secs)))?;
            config.engine_timeout = Duration::from_secs(secs);
        }

        if let Ok(max) = env::var("RELAY_MAX_CONCURRENT") {
            config.max_concurrent = max
                .parse::<usize>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or_else(|| RelayError::Config(format!("invalid RELAY_MAX_CONCURRENT: {}", max)))?;
        }

        if let Ok(flag) = env::var("RELAY_IGNORE_BOTS") {
            config.ignore_bots = !matches!(flag.trim().to_ascii_lowercase().as_str(), "0" | "false" | "no");
        }

        Ok(config)
    }

    pub fn with_engine_timeout(mut self, timeout: Duration) -> Self {
        self.engine_timeout = timeout;
        self
    }

    pub fn with_max_concurrent(mut self, max: usize) -> Self {
        self.max_concurrent = max.max(1);
        self
    }

    pub fn with_ignore_bots(mut self, ignore: bool) -> Self {
        self.ignore_bots = ignore;
        self
    }

    pub fn with_functions(mut self, functions: impl Into<String>) -> Self {
        self.functions = functions.into();
        self
    }

    /// Build the subprocess invoker for this configuration.
    pub fn command_invoker(&self) -> Result<CommandInvoker, RelayError> {
        let (program, args) = self
            .engine_command
            .split_first()
            .ok_or_else(|| RelayError::Config("engine command is empty".to_string()))?;
        Ok(CommandInvoker::new(program.clone(), self.functions.clone()).with_args(args.iter().cloned()))
    }
}

fn default_engine_program() -> String {
    env::current_exe()
        .ok()
        .and_then(|exe| {
            let sibling = exe.with_file_name(DEFAULT_ENGINE_PROGRAM);
            sibling.exists().then(|| sibling.to_string_lossy().into_owned())
        })
        .unwrap_or_else(|| DEFAULT_ENGINE_PROGRAM.to_string())
}
