//! Registry wiring and a full engine turn against mock services.

use std::sync::Arc;

use agent_tools::{AutomationError, AutomationRunner, ToolsetSelection, WeatherConfig};
use async_trait::async_trait;
use brain_core::Brain;
use google_calendar::{GoogleCalendarClient, StaticToken};
use llm_brain::LlmBrainConfig;
use serde_json::{json, Value};
use watari::{assistant, build_registry, ToolSources, WatariError};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

struct SunnyRunner;

#[async_trait]
impl AutomationRunner for SunnyRunner {
    async fn run(&self, script: &str, input: &str) -> Result<String, AutomationError> {
        assert_eq!(script, "get-weather");
        Ok(format!("{}: sunny, 21°C", input))
    }
}

fn sources() -> ToolSources {
    ToolSources {
        calendar: None,
        weather_runner: Arc::new(SunnyRunner),
        weather: WeatherConfig::default(),
    }
}

#[test]
fn selection_controls_registered_tools() {
    let calendar = Arc::new(GoogleCalendarClient::with_base_url(
        "http://127.0.0.1:9",
        Arc::new(StaticToken("ya29.test".to_string())),
    ));
    let sources = sources().with_calendar(calendar);

    let weather_only = ToolsetSelection::parse(&["weather"]).unwrap();
    let registry = build_registry(weather_only, &sources).unwrap();
    assert_eq!(registry.list_tools(), vec!["get_weather", "get_weather_forecast"]);

    let calendar_only = ToolsetSelection::parse(&["calendar"]).unwrap();
    let registry = build_registry(calendar_only, &sources).unwrap();
    assert_eq!(
        registry.list_tools(),
        vec!["get_schedule", "create_event", "update_event", "list_calendars"]
    );

    let registry = build_registry(ToolsetSelection::all(), &sources).unwrap();
    assert_eq!(registry.len(), 6);
}

#[test]
fn calendar_selection_requires_backend() {
    let selection = ToolsetSelection::parse(&["calendar"]).unwrap();
    assert!(matches!(
        build_registry(selection, &sources()),
        Err(WatariError::Config(_))
    ));
}

#[tokio::test]
async fn weather_question_runs_tool_and_answers() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{
                "message": {
                    "role": "assistant",
                    "content": null,
                    "tool_calls": [{
                        "id": "call_w",
                        "type": "function",
                        "function": {"name": "get_weather", "arguments": "{\"location\": \"Osaka\"}"}
                    }]
                }
            }]
        })))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"role": "assistant", "content": "Osaka is sunny, 21°C."}}]
        })))
        .mount(&server)
        .await;

    let selection = ToolsetSelection::parse(&["weather"]).unwrap();
    let registry = build_registry(selection, &sources()).unwrap();
    let config = LlmBrainConfig::builder()
        .api_key("test-key")
        .api_url(server.uri())
        .build();
    let brain = assistant(config, registry).unwrap();

    let reply = brain.process("How's the weather in Osaka?").await.unwrap();
    assert_eq!(reply, "Osaka is sunny, 21°C.");

    let requests = server.received_requests().await.unwrap();
    let second: Value = serde_json::from_slice(&requests[1].body).unwrap();
    let tool_message = &second["messages"][3];
    assert_eq!(tool_message["role"], "tool");
    assert_eq!(tool_message["tool_call_id"], "call_w");
    assert!(tool_message["content"]
        .as_str()
        .unwrap()
        .contains("Osaka: sunny"));
}
