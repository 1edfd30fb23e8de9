//! Built-in tool implementations.

mod calendar;
mod weather;

pub use calendar::{
    flatten_calendar, flatten_event, Clock, CreateEvent, GetSchedule, ListCalendars, UpdateEvent,
    DEFAULT_TIME_ZONE,
};
pub use weather::{Weather, WeatherConfig};
