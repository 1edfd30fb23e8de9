//! Error types for tool operations.

use thiserror::Error;

/// Errors that can occur while registering or executing tools.
#[derive(Debug, Error)]
pub enum ToolError {
    /// Tool not found in registry.
    #[error("Tool not found: {0}")]
    NotFound(String),

    /// A tool with this name is already registered.
    #[error("Tool already registered: {0}")]
    DuplicateTool(String),

    /// Tool name does not satisfy naming rules.
    #[error("Invalid tool name '{name}': {reason}")]
    InvalidName { name: String, reason: String },

    /// Missing required parameter.
    #[error("Missing required parameter: {0}")]
    MissingParameter(String),

    /// Invalid parameter value.
    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter { name: String, reason: String },

    /// External service (calendar API) failed.
    #[error("Service error: {0}")]
    Service(String),

    /// Local automation runner failed.
    #[error("Runner error: {0}")]
    Runner(String),

    /// JSON parsing failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// General execution error.
    #[error("Execution failed: {0}")]
    ExecutionFailed(String),
}

impl ToolError {
    /// Whether the error comes from binding call arguments.
    pub fn is_binding_error(&self) -> bool {
        matches!(
            self,
            ToolError::MissingParameter(_) | ToolError::InvalidParameter { .. }
        )
    }
}

impl From<google_calendar::CalendarError> for ToolError {
    fn from(err: google_calendar::CalendarError) -> Self {
        ToolError::Service(err.to_string())
    }
}
