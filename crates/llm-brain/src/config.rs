//! Configuration for LlmBrain.

use brain_core::BrainError;
use std::env;
use std::path::Path;
use std::time::Duration;

/// Default system prompt file name.
pub const DEFAULT_PROMPT_FILE: &str = "SYSTEM_PROMPT.md";

/// Gemini's OpenAI-compatible endpoint.
pub const DEFAULT_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta/openai";

/// Default model name.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Default maximum tool-call rounds per prompt.
pub const DEFAULT_MAX_TOOL_ROUNDS: usize = 5;

const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Configuration for LlmBrain.
#[derive(Debug, Clone)]
pub struct LlmBrainConfig {
    /// Base URL; requests go to `{api_url}/chat/completions`.
    pub api_url: String,

    /// API key for authentication.
    pub api_key: String,

    /// Model name to use.
    pub model: String,

    /// Optional system prompt.
    pub system_prompt: Option<String>,

    /// Maximum tokens for response.
    pub max_tokens: Option<u32>,

    /// Temperature for generation (0.0 - 2.0).
    pub temperature: Option<f32>,

    /// Maximum rounds of tool calls before the model must answer.
    pub max_tool_rounds: usize,

    /// Per-request HTTP timeout.
    pub request_timeout: Duration,
}

impl Default for LlmBrainConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            api_key: String::new(),
            model: DEFAULT_MODEL.to_string(),
            system_prompt: None,
            max_tokens: None,
            temperature: None,
            max_tool_rounds: DEFAULT_MAX_TOOL_ROUNDS,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

impl LlmBrainConfig {
    /// Create configuration from environment variables.
    ///
    /// Required environment variables:
    /// - `LLM_API_KEY` - API key for authentication
    ///
    /// Optional environment variables:
    /// - `LLM_API_URL` - API base URL (default: Gemini OpenAI-compatible endpoint)
    /// - `LLM_MODEL` - Model name (default: gemini-2.5-flash)
    /// - `LLM_SYSTEM_PROMPT` - System prompt (overrides prompt file)
    /// - `LLM_PROMPT_FILE` - Path to system prompt file (default: SYSTEM_PROMPT.md)
    /// - `LLM_MAX_TOKENS` - Max tokens
    /// - `LLM_TEMPERATURE` - Temperature
    /// - `LLM_MAX_TOOL_ROUNDS` - Max tool-call rounds (default: 5)
    ///
    /// System prompt priority:
    /// 1. `LLM_SYSTEM_PROMPT` env var (if set)
    /// 2. Contents of prompt file (if exists)
    /// 3. None
    pub fn from_env() -> Result<Self, BrainError> {
        let api_key = env::var("LLM_API_KEY")
            .map_err(|_| BrainError::Configuration("LLM_API_KEY not set".to_string()))?;

        let api_url = env::var("LLM_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());

        let model = env::var("LLM_MODEL")
            .ok()
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let system_prompt = if let Ok(prompt) = env::var("LLM_SYSTEM_PROMPT") {
            Some(prompt)
        } else {
            let prompt_file =
                env::var("LLM_PROMPT_FILE").unwrap_or_else(|_| DEFAULT_PROMPT_FILE.to_string());
            load_prompt_file(&prompt_file)
        };

        let max_tokens = env::var("LLM_MAX_TOKENS").ok().and_then(|v| v.parse().ok());

        let temperature = env::var("LLM_TEMPERATURE").ok().and_then(|v| v.parse().ok());

        let max_tool_rounds = env::var("LLM_MAX_TOOL_ROUNDS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_MAX_TOOL_ROUNDS);

        Ok(Self {
            api_url,
            api_key,
            model,
            system_prompt,
            max_tokens,
            temperature,
            max_tool_rounds,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        })
    }

    /// Create a new config builder.
    pub fn builder() -> LlmBrainConfigBuilder {
        LlmBrainConfigBuilder::default()
    }
}

/// Builder for LlmBrainConfig.
#[derive(Debug, Default)]
pub struct LlmBrainConfigBuilder {
    config: LlmBrainConfig,
}

impl LlmBrainConfigBuilder {
    /// Set the API key.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.api_key = key.into();
        self
    }

    /// Set the API URL.
    pub fn api_url(mut self, url: impl Into<String>) -> Self {
        self.config.api_url = url.into();
        self
    }

    /// Set the model name.
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    /// Set the system prompt.
    pub fn system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.config.system_prompt = Some(prompt.into());
        self
    }

    /// Set the max tokens.
    pub fn max_tokens(mut self, tokens: u32) -> Self {
        self.config.max_tokens = Some(tokens);
        self
    }

    /// Set the temperature.
    pub fn temperature(mut self, temp: f32) -> Self {
        self.config.temperature = Some(temp);
        self
    }

    /// Set the maximum number of tool-call rounds. 0 disables tools.
    pub fn max_tool_rounds(mut self, rounds: usize) -> Self {
        self.config.max_tool_rounds = rounds;
        self
    }

    /// Set the per-request HTTP timeout.
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.config.request_timeout = timeout;
        self
    }

    /// Build the configuration.
    pub fn build(self) -> LlmBrainConfig {
        self.config
    }

    /// Load system prompt from a file, if it exists and is non-empty.
    pub fn load_prompt_file(mut self, path: impl AsRef<Path>) -> Self {
        if let Some(prompt) = load_prompt_file(path) {
            self.config.system_prompt = Some(prompt);
        }
        self
    }
}

/// Load a prompt file, returning None if not found or empty.
fn load_prompt_file(path: impl AsRef<Path>) -> Option<String> {
    match std::fs::read_to_string(path.as_ref()) {
        Ok(content) => {
            let trimmed = content.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        }
        Err(_) => None,
    }
}
