//! Wiring for the watari assistant.
//!
//! Builds the tool registry for a toolset selection, the reasoning engine
//! over it, and the logging setup shared by both binaries.

use std::sync::Arc;

use agent_tools::{
    register_calendar_tools, register_weather_tools, AutomationRunner, RegistryToolExecutor,
    ToolError, ToolRegistry, ToolsetSelection, WeatherConfig,
};
use brain_core::BrainError;
use google_calendar::{
    Authenticator, CalendarBackend, CalendarConfig, CalendarError, GoogleCalendarClient,
};
use llm_brain::{LlmBrain, LlmBrainConfig};
use thiserror::Error;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Startup failures.
#[derive(Debug, Error)]
pub enum WatariError {
    #[error("tool error: {0}")]
    Tool(#[from] ToolError),

    #[error("calendar error: {0}")]
    Calendar(#[from] CalendarError),

    #[error("brain error: {0}")]
    Brain(#[from] BrainError),

    #[error("configuration error: {0}")]
    Config(String),
}

/// Backends the tools are built over.
pub struct ToolSources {
    /// Required when the calendar toolset is selected.
    pub calendar: Option<Arc<dyn CalendarBackend>>,
    pub weather_runner: Arc<dyn AutomationRunner>,
    pub weather: WeatherConfig,
}

impl ToolSources {
    /// Weather from the environment; no calendar yet.
    pub fn from_env() -> Self {
        let weather = WeatherConfig::from_env();
        Self {
            calendar: None,
            weather_runner: weather.runner(),
            weather,
        }
    }

    pub fn with_calendar(mut self, backend: Arc<dyn CalendarBackend>) -> Self {
        self.calendar = Some(backend);
        self
    }
}

/// Google Calendar client authenticated from the credential and token files.
pub fn google_calendar(
    config: &CalendarConfig,
) -> Result<(Arc<Authenticator>, Arc<dyn CalendarBackend>), WatariError> {
    let auth = Arc::new(Authenticator::from_config(config)?);
    let client = GoogleCalendarClient::new(config, auth.clone())?;
    Ok((auth, Arc::new(client)))
}

/// Register the selected toolsets. The registry is read-only afterwards.
pub fn build_registry(
    selection: ToolsetSelection,
    sources: &ToolSources,
) -> Result<ToolRegistry, WatariError> {
    let mut registry = ToolRegistry::new();

    if selection.calendar {
        let backend = sources.calendar.clone().ok_or_else(|| {
            WatariError::Config("calendar toolset selected without a calendar backend".to_string())
        })?;
        register_calendar_tools(&mut registry, backend)?;
    }

    if selection.weather {
        register_weather_tools(&mut registry, sources.weather_runner.clone(), &sources.weather)?;
    }

    info!("Tools available: {:?}", registry.list_tools());
    Ok(registry)
}

/// The reasoning engine over a finished registry.
pub fn assistant(config: LlmBrainConfig, registry: ToolRegistry) -> Result<LlmBrain, WatariError> {
    let executor = RegistryToolExecutor::new(Arc::new(registry));
    Ok(LlmBrain::with_tools(config, Arc::new(executor))?)
}

/// Install the `tracing` subscriber, filtered by `RUST_LOG` (default `info`).
///
/// With `to_stderr`, logs stay off stdout, which carries the engine's reply.
pub fn init_logging(to_stderr: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if to_stderr {
        builder.with_writer(std::io::stderr).init();
    } else {
        builder.init();
    }
}
