//! OpenAI-compatible chat-completions request and response types.

use brain_core::ToolSpec;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A chat message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Role: "system", "user", "assistant" or "tool"
    pub role: String,
    /// Message content (null on assistant messages that only call tools)
    #[serde(default)]
    pub content: Option<String>,
    /// Tool calls requested by the assistant
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<ToolCall>>,
    /// ID of the call a tool message answers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
}

impl ChatMessage {
    fn text(role: &str, content: impl Into<String>) -> Self {
        Self {
            role: role.to_string(),
            content: Some(content.into()),
            tool_calls: None,
            tool_call_id: None,
        }
    }

    /// Create a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self::text("system", content)
    }

    /// Create a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self::text("user", content)
    }

    /// Create a tool result message.
    pub fn tool(tool_call_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            tool_call_id: Some(tool_call_id.into()),
            ..Self::text("tool", content)
        }
    }
}

/// A tool call requested by the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    pub id: String,
    #[serde(rename = "type", default = "function_type")]
    pub call_type: String,
    pub function: FunctionCall,
}

/// Function name and JSON-encoded arguments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionCall {
    pub name: String,
    #[serde(default)]
    pub arguments: String,
}

fn function_type() -> String {
    "function".to_string()
}

/// A function tool offered to the model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Tool type (always "function").
    #[serde(rename = "type")]
    pub tool_type: String,
    /// Function specification.
    pub function: FunctionDefinition,
}

/// Function definition for a tool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionDefinition {
    pub name: String,
    pub description: String,
    /// JSON Schema for the function parameters.
    pub parameters: Value,
}

impl From<&ToolSpec> for ToolDefinition {
    fn from(spec: &ToolSpec) -> Self {
        Self {
            tool_type: function_type(),
            function: FunctionDefinition {
                name: spec.name.clone(),
                description: spec.description.clone(),
                parameters: spec.input_schema(),
            },
        }
    }
}

/// Chat completion request.
#[derive(Debug, Clone, Serialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<ToolDefinition>>,
}

/// Chat completion response.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
    #[serde(default)]
    pub usage: Option<Usage>,
}

/// A response choice.
#[derive(Debug, Clone, Deserialize)]
pub struct Choice {
    pub message: ChatMessage,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Token usage information.
#[derive(Debug, Clone, Deserialize)]
pub struct Usage {
    #[serde(default)]
    pub prompt_tokens: u32,
    #[serde(default)]
    pub completion_tokens: u32,
    #[serde(default)]
    pub total_tokens: u32,
}

/// API error response. Some providers wrap it in a one-element array.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ApiError {
    Single { error: ApiErrorDetails },
    List(Vec<ApiError>),
}

impl ApiError {
    pub fn message(&self) -> Option<&str> {
        match self {
            ApiError::Single { error } => Some(error.message.as_str()),
            ApiError::List(items) => items.first().and_then(|e| e.message()),
        }
    }
}

/// API error details.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorDetails {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use brain_core::{ParamSpec, ParamType};
    use serde_json::json;

    #[test]
    fn test_tool_definition_from_spec() {
        let spec = ToolSpec::new("get_weather", "Current weather").param(ParamSpec::with_default(
            "location",
            ParamType::String,
            "City",
            "Tokyo",
        ));
        let def = ToolDefinition::from(&spec);
        let value = serde_json::to_value(&def).unwrap();
        assert_eq!(value["type"], "function");
        assert_eq!(value["function"]["name"], "get_weather");
        assert_eq!(
            value["function"]["parameters"]["properties"]["location"]["default"],
            "Tokyo"
        );
    }

    #[test]
    fn test_tool_call_message_parses() {
        let message: ChatMessage = serde_json::from_value(json!({
            "role": "assistant",
            "content": null,
            "tool_calls": [{
                "id": "call_0",
                "type": "function",
                "function": {"name": "get_schedule", "arguments": "{\"days_ahead\": 1}"}
            }]
        }))
        .unwrap();

        let calls = message.tool_calls.unwrap();
        assert_eq!(calls[0].function.name, "get_schedule");
        assert!(message.content.is_none());
    }

    #[test]
    fn test_tool_message_serializes_call_id() {
        let value = serde_json::to_value(ChatMessage::tool("call_0", "[]")).unwrap();
        assert_eq!(value, json!({"role": "tool", "content": "[]", "tool_call_id": "call_0"}));
    }

    #[test]
    fn test_api_error_shapes() {
        let single: ApiError =
            serde_json::from_str(r#"{"error": {"message": "bad key", "code": 401}}"#).unwrap();
        assert_eq!(single.message(), Some("bad key"));

        let list: ApiError =
            serde_json::from_str(r#"[{"error": {"message": "quota", "status": "RESOURCE_EXHAUSTED"}}]"#)
                .unwrap();
        assert_eq!(list.message(), Some("quota"));
    }
}
