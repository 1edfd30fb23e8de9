//! Named groups of tools selectable with `--functions`.

use std::str::FromStr;
use std::sync::Arc;

use google_calendar::CalendarBackend;

use crate::automation::AutomationRunner;
use crate::error::ToolError;
use crate::registry::ToolRegistry;
use crate::tools::{CreateEvent, GetSchedule, ListCalendars, UpdateEvent, Weather, WeatherConfig};

/// A named group of tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toolset {
    Calendar,
    Weather,
    All,
}

impl FromStr for Toolset {
    type Err = ToolError;

    /// Accepts `calendar`, `weather`, `all`, and module-style names such as
    /// `tools/google_calendar.py`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let stem = s.rsplit(['/', '\\']).next().unwrap_or(s);
        let stem = stem.split('.').next().unwrap_or(stem).to_ascii_lowercase();

        match stem.as_str() {
            "calendar" | "google_calendar" => Ok(Toolset::Calendar),
            "weather" => Ok(Toolset::Weather),
            "all" => Ok(Toolset::All),
            _ => Err(ToolError::InvalidParameter {
                name: "functions".to_string(),
                reason: format!("unknown toolset '{}' (expected calendar, weather or all)", s),
            }),
        }
    }
}

/// Union of the requested toolsets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ToolsetSelection {
    pub calendar: bool,
    pub weather: bool,
}

impl ToolsetSelection {
    /// Everything.
    pub fn all() -> Self {
        Self {
            calendar: true,
            weather: true,
        }
    }

    /// Parse toolset names. No names selects everything.
    pub fn parse<S: AsRef<str>>(names: &[S]) -> Result<Self, ToolError> {
        if names.is_empty() {
            return Ok(Self::all());
        }
        let mut selection = Self::default();
        for name in names {
            selection.add(name.as_ref().parse()?);
        }
        Ok(selection)
    }

    pub fn add(&mut self, toolset: Toolset) {
        match toolset {
            Toolset::Calendar => self.calendar = true,
            Toolset::Weather => self.weather = true,
            Toolset::All => *self = Self::all(),
        }
    }
}

/// Register `get_schedule`, `create_event`, `update_event` and `list_calendars`.
pub fn register_calendar_tools(
    registry: &mut ToolRegistry,
    backend: Arc<dyn CalendarBackend>,
) -> Result<(), ToolError> {
    registry.register(GetSchedule::new(backend.clone()))?;
    registry.register(CreateEvent::new(backend.clone()))?;
    registry.register(UpdateEvent::new(backend.clone()))?;
    registry.register(ListCalendars::new(backend))?;
    Ok(())
}

/// Register `get_weather` and `get_weather_forecast`.
pub fn register_weather_tools(
    registry: &mut ToolRegistry,
    runner: Arc<dyn AutomationRunner>,
    config: &WeatherConfig,
) -> Result<(), ToolError> {
    registry.register(Weather::current(runner.clone(), config.current_shortcut.clone()))?;
    registry.register(Weather::forecast(runner, config.forecast_shortcut.clone()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::automation::ShortcutsRunner;

    #[test]
    fn test_parse_toolsets() {
        assert_eq!("calendar".parse::<Toolset>().unwrap(), Toolset::Calendar);
        assert_eq!(
            "tools/google_calendar.py".parse::<Toolset>().unwrap(),
            Toolset::Calendar
        );
        assert_eq!("Weather".parse::<Toolset>().unwrap(), Toolset::Weather);
        assert!("stocks".parse::<Toolset>().is_err());
    }

    #[test]
    fn test_selection_union() {
        let selection = ToolsetSelection::parse(&["calendar", "weather"]).unwrap();
        assert_eq!(selection, ToolsetSelection::all());

        let selection = ToolsetSelection::parse(&["weather"]).unwrap();
        assert!(selection.weather && !selection.calendar);

        let none: [&str; 0] = [];
        assert_eq!(ToolsetSelection::parse(&none).unwrap(), ToolsetSelection::all());
    }

    #[test]
    fn test_register_weather_tools() {
        let mut registry = ToolRegistry::new();
        let runner: Arc<dyn AutomationRunner> = Arc::new(ShortcutsRunner::default());
        register_weather_tools(&mut registry, runner.clone(), &WeatherConfig::default()).unwrap();
        assert_eq!(registry.list_tools(), vec!["get_weather", "get_weather_forecast"]);

        let err = register_weather_tools(&mut registry, runner, &WeatherConfig::default());
        assert!(matches!(err, Err(ToolError::DuplicateTool(_))));
    }
}
