//! The Brain trait definition.

use async_trait::async_trait;

use crate::error::BrainError;

/// A reasoning engine that turns a user utterance into reply text.
///
/// Implementations may call tools through a [`ToolExecutor`](crate::ToolExecutor)
/// any number of times before producing the final text.
/// This trait is object-safe and can be used with `Box<dyn Brain>`.
#[async_trait]
pub trait Brain: Send + Sync {
    /// Process a single utterance and return the final reply text.
    async fn process(&self, prompt: &str) -> Result<String, BrainError>;

    /// Get a human-readable name for this brain implementation.
    fn name(&self) -> &str;

    /// Check if the brain is ready to process prompts.
    ///
    /// Default implementation always returns true.
    async fn is_ready(&self) -> bool {
        true
    }
}
