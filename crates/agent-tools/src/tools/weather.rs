//! Weather tools backed by a local automation runner.
//!
//! The runner (macOS Shortcuts by default) receives the location on stdin.
//! Its stdout is returned as-is when it parses as JSON, otherwise wrapped as
//! `{location, weather_info | forecast_info, source}`. Every failure is
//! reported as `{error, location}`; these tools never return `Err`.

use std::env;
use std::sync::Arc;

use async_trait::async_trait;
use brain_core::{ParamSpec, ParamType, ToolSpec};
use serde_json::{json, Map, Value};
use tracing::{debug, warn};

use crate::automation::{AutomationError, AutomationRunner, ShortcutsRunner, DEFAULT_RUNNER};
use crate::error::ToolError;
use crate::tool::{Tool, ToolArgs};

const DEFAULT_LOCATION: &str = "Tokyo";
const SOURCE: &str = "Mac Shortcuts";

/// Runner and shortcut names for the weather tools.
#[derive(Debug, Clone)]
pub struct WeatherConfig {
    pub runner: String,
    pub current_shortcut: String,
    pub forecast_shortcut: String,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            runner: DEFAULT_RUNNER.to_string(),
            current_shortcut: "get-weather".to_string(),
            forecast_shortcut: "get-weather-forecast".to_string(),
        }
    }
}

impl WeatherConfig {
    /// Load from `WEATHER_RUNNER`, `WEATHER_SHORTCUT` and `WEATHER_FORECAST_SHORTCUT`.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            runner: env::var("WEATHER_RUNNER").unwrap_or(defaults.runner),
            current_shortcut: env::var("WEATHER_SHORTCUT").unwrap_or(defaults.current_shortcut),
            forecast_shortcut: env::var("WEATHER_FORECAST_SHORTCUT")
                .unwrap_or(defaults.forecast_shortcut),
        }
    }

    /// Build the runner this config names.
    pub fn runner(&self) -> Arc<dyn AutomationRunner> {
        Arc::new(ShortcutsRunner::new(self.runner.clone()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Report {
    Current,
    Forecast,
}

impl Report {
    fn tool_name(self) -> &'static str {
        match self {
            Report::Current => "get_weather",
            Report::Forecast => "get_weather_forecast",
        }
    }

    fn info_key(self) -> &'static str {
        match self {
            Report::Current => "weather_info",
            Report::Forecast => "forecast_info",
        }
    }
}

/// `get_weather` / `get_weather_forecast`.
pub struct Weather {
    report: Report,
    shortcut: String,
    runner: Arc<dyn AutomationRunner>,
}

impl Weather {
    /// Current conditions.
    pub fn current(runner: Arc<dyn AutomationRunner>, shortcut: impl Into<String>) -> Self {
        Self {
            report: Report::Current,
            shortcut: shortcut.into(),
            runner,
        }
    }

    /// Multi-day forecast.
    pub fn forecast(runner: Arc<dyn AutomationRunner>, shortcut: impl Into<String>) -> Self {
        Self {
            report: Report::Forecast,
            shortcut: shortcut.into(),
            runner,
        }
    }

    fn shape_output(&self, location: &str, stdout: &str) -> Value {
        let trimmed = stdout.trim();
        match serde_json::from_str::<Value>(trimmed) {
            Ok(parsed) => parsed,
            Err(_) => {
                let mut wrapped = Map::new();
                wrapped.insert("location".to_string(), json!(location));
                wrapped.insert(self.report.info_key().to_string(), json!(trimmed));
                wrapped.insert("source".to_string(), json!(SOURCE));
                Value::Object(wrapped)
            }
        }
    }
}

fn failure_message(err: &AutomationError) -> String {
    match err {
        AutomationError::Failed(detail) => format!("Shortcuts command failed: {}", detail),
        AutomationError::NotFound(_) => "Shortcuts command not found. Make sure you're running \
             on macOS with Shortcuts app installed."
            .to_string(),
        other => format!("An error occurred: {}", other),
    }
}

#[async_trait]
impl Tool for Weather {
    fn spec(&self) -> ToolSpec {
        let description = match self.report {
            Report::Current => "Get current weather information for a location.",
            Report::Forecast => "Get the weather forecast for a location.",
        };
        ToolSpec::new(self.report.tool_name(), description).param(ParamSpec::with_default(
            "location",
            ParamType::String,
            "Location name (city, region, etc.)",
            DEFAULT_LOCATION,
        ))
    }

    async fn execute(&self, args: ToolArgs) -> Result<Value, ToolError> {
        let location = args
            .get_string_opt("location")
            .unwrap_or_else(|| DEFAULT_LOCATION.to_string());

        debug!("{} for '{}'", self.report.tool_name(), location);

        match self.runner.run(&self.shortcut, &location).await {
            Ok(stdout) => Ok(self.shape_output(&location, &stdout)),
            Err(e) => {
                warn!("{} failed for '{}': {}", self.report.tool_name(), location, e);
                Ok(json!({
                    "error": failure_message(&e),
                    "location": location,
                }))
            }
        }
    }
}
