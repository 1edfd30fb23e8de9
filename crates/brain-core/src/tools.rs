//! Tool call types and the executor trait.
//!
//! A [`ToolRequest`] is created by the reasoning engine when it decides a
//! tool is needed, consumed exactly once by a [`ToolExecutor`], and answered
//! with a [`ToolResult`] that is fed back into the engine's context.

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::spec::ToolSpec;

/// Result of a tool execution.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolResult {
    /// The tool call ID this result corresponds to.
    pub tool_call_id: String,
    /// Structured value returned by the tool (`Null` on error).
    pub value: Value,
    /// Error marker. Present when the call could not be completed.
    pub error: Option<String>,
}

impl ToolResult {
    /// Create a successful tool result.
    pub fn success(tool_call_id: impl Into<String>, value: Value) -> Self {
        Self {
            tool_call_id: tool_call_id.into(),
            value,
            error: None,
        }
    }

    /// Create a failed tool result.
    pub fn error(tool_call_id: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            tool_call_id: tool_call_id.into(),
            value: Value::Null,
            error: Some(error.into()),
        }
    }

    /// Whether the error marker is set.
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    /// Render the result as the text handed back to the model.
    pub fn content(&self) -> String {
        match self.error {
            Some(ref error) => json!({ "error": error }).to_string(),
            None => match self.value {
                Value::String(ref s) => s.clone(),
                ref other => other.to_string(),
            },
        }
    }
}

/// A request to execute a tool.
#[derive(Debug, Clone)]
pub struct ToolRequest {
    /// Opaque unique ID for this tool call.
    pub id: String,
    /// Name of the tool to execute.
    pub name: String,
    /// Arguments as a JSON object.
    pub arguments: HashMap<String, Value>,
}

impl ToolRequest {
    /// Create a request from already-parsed arguments.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        arguments: HashMap<String, Value>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            arguments,
        }
    }

    /// Parse arguments from a JSON string.
    ///
    /// An empty string is treated as an empty argument object.
    pub fn from_call(
        id: String,
        name: String,
        arguments_json: &str,
    ) -> Result<Self, serde_json::Error> {
        let arguments: HashMap<String, Value> = if arguments_json.trim().is_empty() {
            HashMap::new()
        } else {
            serde_json::from_str(arguments_json)?
        };
        Ok(Self {
            id,
            name,
            arguments,
        })
    }

    /// Get a string argument by name.
    pub fn get_string(&self, key: &str) -> Option<&str> {
        self.arguments.get(key).and_then(|v| v.as_str())
    }
}

/// Trait for executing tools called by a Brain.
///
/// Implementations must answer every request with a [`ToolResult`]; a
/// malformed or failing call degrades to an error result instead of
/// aborting the conversation turn.
#[async_trait]
pub trait ToolExecutor: Send + Sync {
    /// Execute a tool and return the result.
    async fn execute(&self, request: ToolRequest) -> ToolResult;

    /// Schemas of the tools this executor exposes to the model.
    fn tool_specs(&self) -> Vec<ToolSpec>;

    /// Names of the tools this executor supports.
    fn supported_tools(&self) -> Vec<String> {
        self.tool_specs().into_iter().map(|spec| spec.name).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_result_success() {
        let result = ToolResult::success("call-123", json!({"temp": 21}));
        assert!(!result.is_error());
        assert_eq!(result.tool_call_id, "call-123");
        assert_eq!(result.content(), r#"{"temp":21}"#);
    }

    #[test]
    fn test_tool_result_string_content_unquoted() {
        let result = ToolResult::success("call-1", Value::String("sunny".to_string()));
        assert_eq!(result.content(), "sunny");
    }

    #[test]
    fn test_tool_result_error() {
        let result = ToolResult::error("call-456", "Something went wrong");
        assert!(result.is_error());
        assert_eq!(result.value, Value::Null);
        assert_eq!(result.content(), r#"{"error":"Something went wrong"}"#);
    }

    #[test]
    fn test_tool_request_parsing() {
        let request = ToolRequest::from_call(
            "id-1".to_string(),
            "get_weather".to_string(),
            r#"{"location": "Osaka"}"#,
        )
        .unwrap();

        assert_eq!(request.name, "get_weather");
        assert_eq!(request.get_string("location"), Some("Osaka"));
    }

    #[test]
    fn test_tool_request_empty_arguments() {
        let request =
            ToolRequest::from_call("id-1".to_string(), "list_calendars".to_string(), "").unwrap();
        assert!(request.arguments.is_empty());
    }

    #[test]
    fn test_tool_request_invalid_json() {
        let result =
            ToolRequest::from_call("id-1".to_string(), "x".to_string(), "{not json");
        assert!(result.is_err());
    }
}
