//! Tool trait definition and bound arguments.

use std::collections::HashMap;

use async_trait::async_trait;
use brain_core::ToolSpec;
use serde_json::Value;

use crate::error::ToolError;

/// Arguments after binding against a tool's [`ToolSpec`].
///
/// Defaults are already applied and values coerced to the declared types, so
/// the getters only fail when a tool asks for a parameter it never declared.
#[derive(Debug, Clone, Default)]
pub struct ToolArgs {
    /// Parameters as key-value pairs.
    pub params: HashMap<String, Value>,
}

impl ToolArgs {
    /// Create tool arguments from already-bound parameters.
    pub fn new(params: HashMap<String, Value>) -> Self {
        Self { params }
    }

    /// Get a string parameter, returning an error if missing or not a string.
    pub fn get_string(&self, key: &str) -> Result<String, ToolError> {
        self.params
            .get(key)
            .ok_or_else(|| ToolError::MissingParameter(key.to_string()))?
            .as_str()
            .map(|s| s.to_string())
            .ok_or_else(|| invalid(key, "expected string"))
    }

    /// Get an optional string parameter.
    pub fn get_string_opt(&self, key: &str) -> Option<String> {
        self.params.get(key)?.as_str().map(|s| s.to_string())
    }

    /// Get an integer parameter.
    pub fn get_i64(&self, key: &str) -> Result<i64, ToolError> {
        self.params
            .get(key)
            .ok_or_else(|| ToolError::MissingParameter(key.to_string()))?
            .as_i64()
            .ok_or_else(|| invalid(key, "expected integer"))
    }

    /// Get a boolean parameter.
    pub fn get_bool(&self, key: &str) -> Result<bool, ToolError> {
        self.params
            .get(key)
            .ok_or_else(|| ToolError::MissingParameter(key.to_string()))?
            .as_bool()
            .ok_or_else(|| invalid(key, "expected boolean"))
    }

    /// Get an optional list of strings.
    pub fn get_string_list_opt(&self, key: &str) -> Result<Option<Vec<String>>, ToolError> {
        match self.params.get(key) {
            None => Ok(None),
            Some(Value::Array(items)) => items
                .iter()
                .map(|v| {
                    v.as_str()
                        .map(|s| s.to_string())
                        .ok_or_else(|| invalid(key, "expected list of strings"))
                })
                .collect::<Result<Vec<_>, _>>()
                .map(Some),
            Some(_) => Err(invalid(key, "expected list of strings")),
        }
    }
}

fn invalid(key: &str, reason: &str) -> ToolError {
    ToolError::InvalidParameter {
        name: key.to_string(),
        reason: reason.to_string(),
    }
}

/// A callable tool the reasoning engine may invoke.
///
/// Tools describe themselves with an explicit [`ToolSpec`] and return a
/// structured JSON value. Failures of the external service a tool wraps are
/// reported inside the returned value (`{"error": ...}`); `Err` is reserved
/// for faults the registry should surface as a tool error result.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Schema published to the engine (name, description, parameters).
    fn spec(&self) -> ToolSpec;

    /// Execute the tool with bound arguments.
    async fn execute(&self, args: ToolArgs) -> Result<Value, ToolError>;
}
