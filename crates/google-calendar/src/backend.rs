//! The calendar surface the assistant tools call through.

use async_trait::async_trait;

use crate::error::CalendarError;
use crate::types::{CalendarListEntry, Event};

/// Parameters for listing events in a time window.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventQuery {
    /// Inclusive lower bound (RFC 3339).
    pub time_min: Option<String>,
    /// Exclusive upper bound (RFC 3339).
    pub time_max: Option<String>,
    /// Zone used to render times in the response.
    pub time_zone: Option<String>,
    pub max_results: Option<u32>,
    /// Expand recurring events into instances.
    pub single_events: bool,
    /// Order by start time (requires `single_events`).
    pub order_by_start: bool,
}

/// Parameters for listing the user's calendars.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CalendarListQuery {
    pub max_results: Option<u32>,
    pub min_access_role: Option<String>,
    pub show_deleted: bool,
    pub show_hidden: bool,
}

/// Remote calendar operations.
///
/// Implemented by [`crate::GoogleCalendarClient`]; tests substitute an
/// in-memory backend.
#[async_trait]
pub trait CalendarBackend: Send + Sync {
    async fn list_events(
        &self,
        calendar_id: &str,
        query: &EventQuery,
    ) -> Result<Vec<Event>, CalendarError>;

    async fn get_event(&self, calendar_id: &str, event_id: &str) -> Result<Event, CalendarError>;

    async fn insert_event(&self, calendar_id: &str, event: &Event) -> Result<Event, CalendarError>;

    /// Replace an event with a full representation.
    async fn update_event(
        &self,
        calendar_id: &str,
        event_id: &str,
        event: &Event,
    ) -> Result<Event, CalendarError>;

    async fn list_calendars(
        &self,
        query: &CalendarListQuery,
    ) -> Result<Vec<CalendarListEntry>, CalendarError>;
}
