//! Tool registry and tools for the watari assistant.
//!
//! Tools are named, schema-described functions the reasoning engine may
//! call mid-response. Each tool declares an explicit [`ToolSpec`]; the
//! [`ToolRegistry`] binds call arguments against it and guarantees that
//! every call, however malformed or failing, is answered with a
//! [`brain_core::ToolResult`].
//!
//! # Built-in Tools
//!
//! ## Calendar (over [`google_calendar::CalendarBackend`])
//! - [`GetSchedule`] - Upcoming events in a half-open window.
//! - [`CreateEvent`] - Create a timed event.
//! - [`UpdateEvent`] - Read-modify-write of selected fields.
//! - [`ListCalendars`] - The user's calendar list.
//!
//! ## Weather (over a local [`AutomationRunner`])
//! - [`Weather`] - `get_weather` and `get_weather_forecast`.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use agent_tools::{register_weather_tools, AutomationRunner, ShortcutsRunner, ToolRegistry, WeatherConfig};
//!
//! # async fn example() -> Result<(), agent_tools::ToolError> {
//! let mut registry = ToolRegistry::new();
//! let runner: Arc<dyn AutomationRunner> = Arc::new(ShortcutsRunner::default());
//! register_weather_tools(&mut registry, runner, &WeatherConfig::default())?;
//!
//! let report = registry.execute_json("get_weather", r#"{"location": "Osaka"}"#).await?;
//! println!("{}", report);
//! # Ok(())
//! # }
//! ```

mod automation;
mod binding;
mod error;
mod executor;
mod registry;
mod tool;
mod toolset;
pub mod tools;

pub use automation::{AutomationError, AutomationRunner, ShortcutsRunner, DEFAULT_RUNNER};
pub use binding::bind;
pub use brain_core::{ParamSpec, ParamType, ToolSpec};
pub use error::ToolError;
pub use executor::RegistryToolExecutor;
pub use registry::ToolRegistry;
pub use tool::{Tool, ToolArgs};
pub use tools::{CreateEvent, GetSchedule, ListCalendars, UpdateEvent, Weather, WeatherConfig};
pub use toolset::{register_calendar_tools, register_weather_tools, Toolset, ToolsetSelection};

// Re-export async_trait for convenience
pub use async_trait::async_trait;
