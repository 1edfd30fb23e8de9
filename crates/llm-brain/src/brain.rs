//! LlmBrain implementation over an OpenAI-compatible chat-completions API.

use std::sync::Arc;

use brain_core::{async_trait, hash_prompt, Brain, BrainError, ToolExecutor, ToolRequest, ToolResult};
use reqwest::Client;
use tracing::{debug, info, warn};

use crate::api_types::{
    ApiError, ChatCompletionRequest, ChatCompletionResponse, ChatMessage, ToolCall, ToolDefinition,
};
use crate::config::LlmBrainConfig;

/// A brain that answers a single prompt, calling tools as the model requests.
///
/// Each `process` call is one conversation turn: the system prompt (with the
/// current local date-time appended), the user prompt, then any number of
/// assistant tool-call / tool-result exchanges bounded by
/// [`LlmBrainConfig::max_tool_rounds`].
pub struct LlmBrain {
    client: Client,
    config: LlmBrainConfig,
    tools: Option<Arc<dyn ToolExecutor>>,
    system_prompt_hash: Option<String>,
}

impl LlmBrain {
    /// Create a new LlmBrain without tools.
    pub fn new(config: LlmBrainConfig) -> Result<Self, BrainError> {
        Self::build(config, None)
    }

    /// Create a new LlmBrain that can call the executor's tools.
    pub fn with_tools(
        config: LlmBrainConfig,
        tools: Arc<dyn ToolExecutor>,
    ) -> Result<Self, BrainError> {
        Self::build(config, Some(tools))
    }

    /// Create an LlmBrain from environment variables.
    ///
    /// See [`LlmBrainConfig::from_env`] for required environment variables.
    pub fn from_env() -> Result<Self, BrainError> {
        Self::new(LlmBrainConfig::from_env()?)
    }

    fn build(
        config: LlmBrainConfig,
        tools: Option<Arc<dyn ToolExecutor>>,
    ) -> Result<Self, BrainError> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| BrainError::Configuration(format!("Failed to create HTTP client: {}", e)))?;

        let system_prompt_hash = config.system_prompt.as_deref().map(hash_prompt);
        if let Some(ref hash) = system_prompt_hash {
            info!("LlmBrain system prompt fingerprint: {}", hash);
        }

        info!(
            "LlmBrain initialized with model: {}, tools: {:?}",
            config.model,
            tools.as_ref().map(|t| t.supported_tools()).unwrap_or_default()
        );

        Ok(Self {
            client,
            config,
            tools,
            system_prompt_hash,
        })
    }

    /// Get the configuration.
    pub fn config(&self) -> &LlmBrainConfig {
        &self.config
    }

    /// Get the system prompt fingerprint, if configured.
    pub fn system_prompt_hash(&self) -> Option<&str> {
        self.system_prompt_hash.as_deref()
    }

    fn system_message(&self) -> ChatMessage {
        let now = chrono::Local::now().format("%Y-%m-%d %H:%M:%S %:z (%A)");
        match self.config.system_prompt {
            Some(ref prompt) => {
                ChatMessage::system(format!("{}\n\nCurrent date and time: {}", prompt, now))
            }
            None => ChatMessage::system(format!("Current date and time: {}", now)),
        }
    }

    fn tool_definitions(&self) -> Option<Vec<ToolDefinition>> {
        let specs = self.tools.as_ref()?.tool_specs();
        if specs.is_empty() {
            return None;
        }
        Some(specs.iter().map(ToolDefinition::from).collect())
    }

    /// Make a chat completion request.
    async fn chat_completion(
        &self,
        messages: &[ChatMessage],
        tools: Option<Vec<ToolDefinition>>,
    ) -> Result<ChatCompletionResponse, BrainError> {
        let url = format!("{}/chat/completions", self.config.api_url.trim_end_matches('/'));

        let request = ChatCompletionRequest {
            model: self.config.model.clone(),
            messages: messages.to_vec(),
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
            tools,
        };

        debug!(
            "Sending chat completion with {} messages to {}",
            request.messages.len(),
            url
        );

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    BrainError::Timeout
                } else {
                    BrainError::Network(format!("Failed to send request: {}", e))
                }
            })?;

        let status = response.status();

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiError>(&error_text)
                .ok()
                .and_then(|e| e.message().map(str::to_string))
                .unwrap_or(error_text);

            return Err(BrainError::ProcessingFailed(format!(
                "API error ({}): {}",
                status.as_u16(),
                message
            )));
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| BrainError::ProcessingFailed(format!("Failed to parse response: {}", e)))?;

        if let Some(ref usage) = completion.usage {
            debug!(
                "Token usage - prompt: {}, completion: {}, total: {}",
                usage.prompt_tokens, usage.completion_tokens, usage.total_tokens
            );
        }

        Ok(completion)
    }

    async fn run_tool_call(&self, executor: &dyn ToolExecutor, call: &ToolCall) -> ToolResult {
        match ToolRequest::from_call(
            call.id.clone(),
            call.function.name.clone(),
            &call.function.arguments,
        ) {
            Ok(request) => {
                info!("Calling tool: {}", request.name);
                let result = executor.execute(request).await;
                if let Some(ref error) = result.error {
                    warn!("Tool {} failed: {}", call.function.name, error);
                }
                result
            }
            Err(e) => {
                warn!(
                    "Invalid arguments for tool {}: {}",
                    call.function.name, e
                );
                ToolResult::error(&call.id, format!("Invalid tool arguments: {}", e))
            }
        }
    }
}

#[async_trait]
impl Brain for LlmBrain {
    async fn process(&self, prompt: &str) -> Result<String, BrainError> {
        debug!("Processing prompt: {}", prompt);

        let mut messages = vec![self.system_message(), ChatMessage::user(prompt)];
        let max_rounds = self.config.max_tool_rounds;

        for round in 0..=max_rounds {
            // The last round offers no tools so the model has to answer.
            let tools = if round < max_rounds {
                self.tool_definitions()
            } else {
                None
            };
            let offered_tools = tools.is_some();

            let completion = self.chat_completion(&messages, tools).await?;
            let choice = completion.choices.into_iter().next().ok_or_else(|| {
                BrainError::ProcessingFailed("Response contained no choices".to_string())
            })?;
            let message = choice.message;

            let calls = message.tool_calls.clone().unwrap_or_default();
            let executor = match self.tools {
                Some(ref executor) if offered_tools && !calls.is_empty() => executor,
                _ => {
                    let text = message.content.unwrap_or_default();
                    if text.trim().is_empty() {
                        warn!("Model returned an empty reply");
                    }
                    return Ok(text.trim().to_string());
                }
            };

            debug!("Round {}: model requested {} tool call(s)", round + 1, calls.len());
            messages.push(message);

            for call in &calls {
                let result = self.run_tool_call(executor.as_ref(), call).await;
                messages.push(ChatMessage::tool(&call.id, result.content()));
            }
        }

        // The final round never offers tools, so the loop always returns.
        Err(BrainError::ProcessingFailed(
            "Tool round limit exceeded".to_string(),
        ))
    }

    fn name(&self) -> &str {
        "LlmBrain"
    }

    async fn is_ready(&self) -> bool {
        !self.config.api_key.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use brain_core::{ParamSpec, ParamType, ToolSpec};
    use serde_json::{json, Value};
    use std::sync::Mutex;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    /// Records calls and answers with a fixed schedule.
    struct FakeTools {
        calls: Mutex<Vec<ToolRequest>>,
    }

    impl FakeTools {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                calls: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl ToolExecutor for FakeTools {
        async fn execute(&self, request: ToolRequest) -> ToolResult {
            let id = request.id.clone();
            self.calls.lock().unwrap().push(request);
            ToolResult::success(id, json!([{"summary": "Dentist", "start": "2026-10-18T09:00:00+09:00"}]))
        }

        fn tool_specs(&self) -> Vec<ToolSpec> {
            vec![ToolSpec::new("get_schedule", "List upcoming events").param(
                ParamSpec::with_default("days_ahead", ParamType::Integer, "Days to look ahead", 7),
            )]
        }
    }

    fn config(server: &MockServer) -> LlmBrainConfig {
        LlmBrainConfig::builder()
            .api_key("test-key")
            .api_url(format!("{}/v1", server.uri()))
            .system_prompt("You are Watari.")
            .max_tool_rounds(2)
            .build()
    }

    fn text_reply(text: &str) -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"role": "assistant", "content": text}, "finish_reason": "stop"}],
            "usage": {"prompt_tokens": 10, "completion_tokens": 5, "total_tokens": 15}
        }))
    }

    fn tool_call_reply(arguments: &str) -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{
                "message": {
                    "role": "assistant",
                    "content": null,
                    "tool_calls": [{
                        "id": "call_0",
                        "type": "function",
                        "function": {"name": "get_schedule", "arguments": arguments}
                    }]
                },
                "finish_reason": "tool_calls"
            }]
        }))
    }

    async fn request_bodies(server: &MockServer) -> Vec<Value> {
        server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .map(|r| serde_json::from_slice(&r.body).unwrap())
            .collect()
    }

    #[test]
    fn test_brain_name() {
        let config = LlmBrainConfig::builder().api_key("test-key").build();
        let brain = LlmBrain::new(config).unwrap();
        assert_eq!(brain.name(), "LlmBrain");
    }

    #[test]
    fn test_system_prompt_hash() {
        let config = LlmBrainConfig::builder()
            .api_key("test-key")
            .system_prompt("You are Watari.")
            .build();
        let brain = LlmBrain::new(config).unwrap();
        assert_eq!(
            brain.system_prompt_hash(),
            Some(hash_prompt("You are Watari.").as_str())
        );
    }

    #[tokio::test]
    async fn test_plain_reply() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("Authorization", "Bearer test-key"))
            .respond_with(text_reply("  Hello there.\n"))
            .expect(1)
            .mount(&server)
            .await;

        let brain = LlmBrain::new(config(&server)).unwrap();
        let reply = brain.process("hi").await.unwrap();
        assert_eq!(reply, "Hello there.");

        let bodies = request_bodies(&server).await;
        let system = bodies[0]["messages"][0]["content"].as_str().unwrap();
        assert!(system.starts_with("You are Watari."));
        assert!(system.contains("Current date and time:"));
        assert_eq!(bodies[0]["messages"][1], json!({"role": "user", "content": "hi"}));
        assert!(bodies[0].get("tools").is_none());
    }

    #[tokio::test]
    async fn test_tool_call_round_trip() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(tool_call_reply(r#"{"days_ahead": 1}"#))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(text_reply("You have a dentist appointment at 9."))
            .mount(&server)
            .await;

        let tools = FakeTools::new();
        let brain = LlmBrain::with_tools(config(&server), tools.clone()).unwrap();
        let reply = brain.process("What is on tomorrow?").await.unwrap();
        assert_eq!(reply, "You have a dentist appointment at 9.");

        let calls = tools.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].name, "get_schedule");
        assert_eq!(calls[0].arguments["days_ahead"], json!(1));
        drop(calls);

        let bodies = request_bodies(&server).await;
        assert_eq!(bodies.len(), 2);
        assert_eq!(bodies[0]["tools"][0]["function"]["name"], "get_schedule");
        let messages = bodies[1]["messages"].as_array().unwrap();
        assert_eq!(messages[2]["role"], "assistant");
        assert_eq!(messages[3]["role"], "tool");
        assert_eq!(messages[3]["tool_call_id"], "call_0");
        assert!(messages[3]["content"].as_str().unwrap().contains("Dentist"));
    }

    #[tokio::test]
    async fn test_invalid_arguments_become_error_result() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(tool_call_reply("{not json"))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(text_reply("Sorry, I could not read your calendar."))
            .mount(&server)
            .await;

        let tools = FakeTools::new();
        let brain = LlmBrain::with_tools(config(&server), tools.clone()).unwrap();
        let reply = brain.process("schedule?").await.unwrap();
        assert_eq!(reply, "Sorry, I could not read your calendar.");
        assert!(tools.calls.lock().unwrap().is_empty());

        let bodies = request_bodies(&server).await;
        let tool_message = &bodies[1]["messages"][3];
        assert_eq!(tool_message["tool_call_id"], "call_0");
        assert!(tool_message["content"]
            .as_str()
            .unwrap()
            .contains("Invalid tool arguments"));
    }

    #[tokio::test]
    async fn test_tool_rounds_are_bounded() {
        let server = MockServer::start().await;
        // The model keeps asking for tools; the final round withholds them.
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(tool_call_reply("{}"))
            .up_to_n_times(2)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(text_reply("Giving up on tools."))
            .mount(&server)
            .await;

        let tools = FakeTools::new();
        let brain = LlmBrain::with_tools(config(&server), tools.clone()).unwrap();
        let reply = brain.process("loop").await.unwrap();
        assert_eq!(reply, "Giving up on tools.");
        assert_eq!(tools.calls.lock().unwrap().len(), 2);

        let bodies = request_bodies(&server).await;
        assert_eq!(bodies.len(), 3);
        assert!(bodies[1].get("tools").is_some());
        assert!(bodies[2].get("tools").is_none());
    }

    #[tokio::test]
    async fn test_api_error_is_processing_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(429).set_body_json(json!([
                {"error": {"code": 429, "message": "Resource has been exhausted"}}
            ])))
            .mount(&server)
            .await;

        let brain = LlmBrain::new(config(&server)).unwrap();
        match brain.process("hi").await {
            Err(BrainError::ProcessingFailed(msg)) => {
                assert!(msg.contains("429"));
                assert!(msg.contains("Resource has been exhausted"));
            }
            other => panic!("Expected ProcessingFailed, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_no_choices_is_processing_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
            .mount(&server)
            .await;

        let brain = LlmBrain::new(config(&server)).unwrap();
        assert!(matches!(
            brain.process("hi").await,
            Err(BrainError::ProcessingFailed(_))
        ));
    }
}
