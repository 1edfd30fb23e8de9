//! Core traits and types shared by the watari assistant crates.
//!
//! This crate defines the contract between the reasoning engine and the
//! side-effecting tools it may call:
//!
//! - [`Brain`] - The trait implemented by reasoning engines
//! - [`ToolSpec`] / [`ParamSpec`] / [`ParamType`] - Declarative tool schemas
//! - [`ToolRequest`] / [`ToolResult`] - One tool call and its result
//! - [`ToolExecutor`] - Trait for dispatching tool calls
//! - [`BrainError`] - Error types for brain operations
//!
//! # Example
//!
//! ```rust
//! use brain_core::{Brain, BrainError};
//! use async_trait::async_trait;
//!
//! struct ShoutBrain;
//!
//! #[async_trait]
//! impl Brain for ShoutBrain {
//!     async fn process(&self, prompt: &str) -> Result<String, BrainError> {
//!         Ok(prompt.to_uppercase())
//!     }
//!
//!     fn name(&self) -> &str {
//!         "ShoutBrain"
//!     }
//! }
//! ```

mod error;
mod prompt;
mod spec;
mod tools;
mod trait_def;

pub use error::BrainError;
pub use prompt::hash_prompt;
pub use spec::{ParamSpec, ParamType, ToolSpec};
pub use tools::{ToolExecutor, ToolRequest, ToolResult};
pub use trait_def::Brain;

// Re-export async_trait for convenience
pub use async_trait::async_trait;
