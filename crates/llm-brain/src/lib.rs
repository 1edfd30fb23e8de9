//! Chat-completions brain with function calling.
//!
//! Talks to any OpenAI-compatible `/chat/completions` endpoint (Gemini's by
//! default) and runs the tool-call loop through a [`ToolExecutor`].
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use agent_tools::{RegistryToolExecutor, ToolRegistry};
//! use llm_brain::{Brain, LlmBrain, LlmBrainConfig};
//!
//! # async fn run(registry: ToolRegistry) -> Result<(), Box<dyn std::error::Error>> {
//! let executor = RegistryToolExecutor::new(Arc::new(registry));
//! let brain = LlmBrain::with_tools(LlmBrainConfig::from_env()?, Arc::new(executor))?;
//! let reply = brain.process("What's on my calendar tomorrow?").await?;
//! println!("{}", reply);
//! # Ok(())
//! # }
//! ```

mod api_types;
mod brain;
mod config;

pub use api_types::{ChatMessage, FunctionCall, FunctionDefinition, ToolCall, ToolDefinition};
pub use brain::LlmBrain;
pub use config::{
    LlmBrainConfig, LlmBrainConfigBuilder, DEFAULT_API_URL, DEFAULT_MAX_TOOL_ROUNDS,
    DEFAULT_MODEL, DEFAULT_PROMPT_FILE,
};

// Re-export brain-core types for convenience
pub use brain_core::{async_trait, Brain, BrainError, ToolExecutor};
