//! Calendar tools over a [`CalendarBackend`].
//!
//! Events and calendars are flattened into fixed record shapes where every
//! optional field has an empty default, so the model never has to handle
//! missing keys. Backend failures are logged and returned as
//! `{error, calendar_id}` values.

use std::sync::Arc;

use async_trait::async_trait;
use brain_core::{ParamSpec, ParamType, ToolSpec};
use chrono::{DateTime, Duration, NaiveTime, SecondsFormat, Utc};
use google_calendar::{
    Attendee, CalendarBackend, CalendarError, CalendarListEntry, CalendarListQuery, Event,
    EventDateTime, EventQuery, Person,
};
use serde_json::{json, Value};
use tracing::{debug, error};

use crate::error::ToolError;
use crate::tool::{Tool, ToolArgs};

/// Zone events are rendered and created in unless told otherwise.
pub const DEFAULT_TIME_ZONE: &str = "Asia/Tokyo";
const DEFAULT_CALENDAR: &str = "primary";
const UNTITLED: &str = "No title";

/// Source of the current instant.
pub type Clock = fn() -> DateTime<Utc>;

fn text(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

fn flatten_person(person: &Option<Person>) -> Value {
    match person {
        Some(p) => json!({ "email": text(&p.email), "name": text(&p.display_name) }),
        None => json!({ "email": "", "name": "" }),
    }
}

fn flatten_time(time: &Option<EventDateTime>) -> String {
    time.as_ref().map(|t| t.display_value()).unwrap_or_default()
}

/// Flatten an event into the record shape handed to the model.
pub fn flatten_event(event: &Event) -> Value {
    let attendees: Vec<Value> = event
        .attendees
        .iter()
        .map(|a| {
            json!({
                "email": text(&a.email),
                "name": text(&a.display_name),
                "status": text(&a.response_status),
            })
        })
        .collect();

    json!({
        "id": text(&event.id),
        "summary": event.summary.clone().unwrap_or_else(|| UNTITLED.to_string()),
        "description": text(&event.description),
        "start": flatten_time(&event.start),
        "end": flatten_time(&event.end),
        "location": text(&event.location),
        "attendees": attendees,
        "creator": flatten_person(&event.creator),
        "organizer": flatten_person(&event.organizer),
        "status": text(&event.status),
        "html_link": text(&event.html_link),
        "hangout_link": text(&event.hangout_link),
        "conference_data": event.conference_data.clone().unwrap_or_else(|| json!({})),
        "is_all_day": event.is_all_day(),
    })
}

/// Flatten a calendar list entry.
pub fn flatten_calendar(entry: &CalendarListEntry) -> Value {
    json!({
        "id": entry.id,
        "summary": text(&entry.summary),
        "description": text(&entry.description),
        "time_zone": text(&entry.time_zone),
        "access_role": text(&entry.access_role),
        "primary": entry.primary.unwrap_or(false),
        "background_color": text(&entry.background_color),
        "foreground_color": text(&entry.foreground_color),
        "hidden": entry.hidden.unwrap_or(false),
        "selected": entry.selected.unwrap_or(false),
    })
}

fn service_error(operation: &str, calendar_id: &str, err: CalendarError) -> Value {
    error!("{} failed for calendar '{}': {}", operation, calendar_id, err);
    json!({ "error": err.to_string(), "calendar_id": calendar_id })
}

/// Whether the event starts inside `[from, to)`.
///
/// An all-day event starts at 00:00 UTC on its date, so one dated today is
/// already past once the day has begun, and one dated on the window's last
/// day counts when that midnight falls before `to`.
fn starts_within(event: &Event, from: DateTime<Utc>, to: DateTime<Utc>) -> bool {
    let Some(ref start) = event.start else {
        return false;
    };
    let instant = start.instant().or_else(|| {
        start
            .naive_date()
            .map(|date| date.and_time(NaiveTime::MIN).and_utc())
    });
    match instant {
        Some(instant) => instant >= from && instant < to,
        // Unparseable start: trust the service's own window.
        None => true,
    }
}

fn positive(args: &ToolArgs, key: &str) -> Result<i64, ToolError> {
    let value = args.get_i64(key)?;
    if value < 1 {
        return Err(ToolError::InvalidParameter {
            name: key.to_string(),
            reason: "must be at least 1".to_string(),
        });
    }
    Ok(value)
}

/// `get_schedule`: upcoming events in `[now, now + days_ahead)`.
pub struct GetSchedule {
    backend: Arc<dyn CalendarBackend>,
    clock: Clock,
}

impl GetSchedule {
    pub fn new(backend: Arc<dyn CalendarBackend>) -> Self {
        Self {
            backend,
            clock: Utc::now,
        }
    }

    /// Replace the clock (tests pin "now").
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }
}

#[async_trait]
impl Tool for GetSchedule {
    fn spec(&self) -> ToolSpec {
        ToolSpec::new(
            "get_schedule",
            "Retrieve upcoming events from Google Calendar, ordered by start time.",
        )
        .param(ParamSpec::with_default(
            "calendar_id",
            ParamType::String,
            "The calendar ID to retrieve events from",
            DEFAULT_CALENDAR,
        ))
        .param(ParamSpec::with_default(
            "days_ahead",
            ParamType::Integer,
            "Number of days ahead to retrieve events for",
            7,
        ))
        .param(ParamSpec::with_default(
            "max_results",
            ParamType::Integer,
            "Maximum number of events to return",
            10,
        ))
    }

    async fn execute(&self, args: ToolArgs) -> Result<Value, ToolError> {
        let calendar_id = args.get_string("calendar_id")?;
        let days_ahead = positive(&args, "days_ahead")?;
        let max_results = positive(&args, "max_results")?;

        let now = (self.clock)();
        let until = Duration::try_days(days_ahead)
            .and_then(|span| now.checked_add_signed(span))
            .ok_or_else(|| ToolError::InvalidParameter {
                name: "days_ahead".to_string(),
                reason: format!("{} days is out of range", days_ahead),
            })?;

        let query = EventQuery {
            time_min: Some(now.to_rfc3339_opts(SecondsFormat::Secs, true)),
            time_max: Some(until.to_rfc3339_opts(SecondsFormat::Secs, true)),
            time_zone: Some(DEFAULT_TIME_ZONE.to_string()),
            max_results: Some(u32::try_from(max_results).unwrap_or(u32::MAX)),
            single_events: true,
            order_by_start: true,
        };

        debug!(
            "get_schedule calendar={} window={}..{}",
            calendar_id,
            now.to_rfc3339(),
            until.to_rfc3339()
        );

        match self.backend.list_events(&calendar_id, &query).await {
            Ok(events) => Ok(Value::Array(
                events
                    .iter()
                    .filter(|e| starts_within(e, now, until))
                    .map(flatten_event)
                    .collect(),
            )),
            Err(e) => Ok(service_error("get_schedule", &calendar_id, e)),
        }
    }
}

/// `create_event`: construct and submit a timed event.
pub struct CreateEvent {
    backend: Arc<dyn CalendarBackend>,
}

impl CreateEvent {
    pub fn new(backend: Arc<dyn CalendarBackend>) -> Self {
        Self { backend }
    }
}

fn non_empty(args: &ToolArgs, key: &str) -> Option<String> {
    args.get_string_opt(key).filter(|s| !s.is_empty())
}

#[async_trait]
impl Tool for CreateEvent {
    fn spec(&self) -> ToolSpec {
        ToolSpec::new(
            "create_event",
            "Create a new event in Google Calendar. Times are ISO-8601 local \
             date-times interpreted in the given timezone.",
        )
        .param(ParamSpec::required("summary", ParamType::String, "Event title"))
        .param(ParamSpec::required(
            "start_time",
            ParamType::String,
            "Start time, e.g. 2025-01-31T10:00:00",
        ))
        .param(ParamSpec::required(
            "end_time",
            ParamType::String,
            "End time, e.g. 2025-01-31T11:00:00",
        ))
        .param(ParamSpec::with_default(
            "description",
            ParamType::String,
            "Event description",
            "",
        ))
        .param(ParamSpec::with_default(
            "location",
            ParamType::String,
            "Event location",
            "",
        ))
        .param(ParamSpec::with_default(
            "calendar_id",
            ParamType::String,
            "The calendar ID to create the event in",
            DEFAULT_CALENDAR,
        ))
        .param(ParamSpec::with_default(
            "timezone",
            ParamType::String,
            "IANA timezone of start_time and end_time",
            DEFAULT_TIME_ZONE,
        ))
    }

    async fn execute(&self, args: ToolArgs) -> Result<Value, ToolError> {
        let calendar_id = args.get_string("calendar_id")?;
        let timezone = args.get_string("timezone")?;

        let event = Event {
            summary: Some(args.get_string("summary")?),
            description: non_empty(&args, "description"),
            location: non_empty(&args, "location"),
            start: Some(EventDateTime::timed(args.get_string("start_time")?, timezone.clone())),
            end: Some(EventDateTime::timed(args.get_string("end_time")?, timezone)),
            ..Default::default()
        };

        match self.backend.insert_event(&calendar_id, &event).await {
            Ok(created) => Ok(flatten_event(&created)),
            Err(e) => Ok(service_error("create_event", &calendar_id, e)),
        }
    }
}

/// `update_event`: read-modify-write of the supplied fields only.
///
/// Concurrent updates of one event are not coordinated; the last write wins.
pub struct UpdateEvent {
    backend: Arc<dyn CalendarBackend>,
}

impl UpdateEvent {
    pub fn new(backend: Arc<dyn CalendarBackend>) -> Self {
        Self { backend }
    }
}

#[async_trait]
impl Tool for UpdateEvent {
    fn spec(&self) -> ToolSpec {
        ToolSpec::new(
            "update_event",
            "Update an existing Google Calendar event. Only the supplied fields change.",
        )
        .param(ParamSpec::required("event_id", ParamType::String, "ID of the event"))
        .param(ParamSpec::optional("summary", ParamType::String, "New title"))
        .param(ParamSpec::optional("start_time", ParamType::String, "New start time"))
        .param(ParamSpec::optional("end_time", ParamType::String, "New end time"))
        .param(ParamSpec::optional("description", ParamType::String, "New description"))
        .param(ParamSpec::optional("location", ParamType::String, "New location"))
        .param(ParamSpec::optional(
            "attendees",
            ParamType::StringList,
            "Attendee email addresses (replaces the list)",
        ))
        .param(ParamSpec::with_default(
            "calendar_id",
            ParamType::String,
            "The calendar ID containing the event",
            DEFAULT_CALENDAR,
        ))
        .param(ParamSpec::with_default(
            "timezone",
            ParamType::String,
            "IANA timezone of start_time and end_time",
            DEFAULT_TIME_ZONE,
        ))
    }

    async fn execute(&self, args: ToolArgs) -> Result<Value, ToolError> {
        let calendar_id = args.get_string("calendar_id")?;
        let event_id = args.get_string("event_id")?;
        let timezone = args.get_string("timezone")?;

        let mut event = match self.backend.get_event(&calendar_id, &event_id).await {
            Ok(event) => event,
            Err(e) => return Ok(service_error("update_event", &calendar_id, e)),
        };

        if let Some(summary) = args.get_string_opt("summary") {
            event.summary = Some(summary);
        }
        if let Some(description) = args.get_string_opt("description") {
            event.description = Some(description);
        }
        if let Some(location) = args.get_string_opt("location") {
            event.location = Some(location);
        }
        if let Some(start) = args.get_string_opt("start_time") {
            event.start = Some(EventDateTime::timed(start, timezone.clone()));
        }
        if let Some(end) = args.get_string_opt("end_time") {
            event.end = Some(EventDateTime::timed(end, timezone.clone()));
        }
        if let Some(emails) = args.get_string_list_opt("attendees")? {
            event.attendees = emails.into_iter().map(Attendee::with_email).collect();
        }

        match self
            .backend
            .update_event(&calendar_id, &event_id, &event)
            .await
        {
            Ok(updated) => Ok(flatten_event(&updated)),
            Err(e) => Ok(service_error("update_event", &calendar_id, e)),
        }
    }
}

/// `list_calendars`: the user's calendar list.
pub struct ListCalendars {
    backend: Arc<dyn CalendarBackend>,
}

impl ListCalendars {
    pub fn new(backend: Arc<dyn CalendarBackend>) -> Self {
        Self { backend }
    }
}

#[async_trait]
impl Tool for ListCalendars {
    fn spec(&self) -> ToolSpec {
        ToolSpec::new("list_calendars", "List the calendars the user can access.")
            .param(ParamSpec::with_default(
                "max_results",
                ParamType::Integer,
                "Maximum number of calendars to return",
                100,
            ))
            .param(ParamSpec::optional(
                "min_access_role",
                ParamType::String,
                "Minimum access role: freeBusyReader, reader, writer or owner",
            ))
            .param(ParamSpec::with_default(
                "show_deleted",
                ParamType::Boolean,
                "Include deleted calendars",
                false,
            ))
            .param(ParamSpec::with_default(
                "show_hidden",
                ParamType::Boolean,
                "Include hidden calendars",
                false,
            ))
    }

    async fn execute(&self, args: ToolArgs) -> Result<Value, ToolError> {
        let max_results = positive(&args, "max_results")?;
        let query = CalendarListQuery {
            max_results: Some(u32::try_from(max_results).unwrap_or(u32::MAX)),
            min_access_role: args.get_string_opt("min_access_role"),
            show_deleted: args.get_bool("show_deleted")?,
            show_hidden: args.get_bool("show_hidden")?,
        };

        match self.backend.list_calendars(&query).await {
            Ok(entries) => Ok(Value::Array(entries.iter().map(flatten_calendar).collect())),
            Err(e) => Ok(service_error("list_calendars", "users/me", e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::bind;
    use chrono::TimeZone;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeBackend {
        events: Mutex<Vec<Event>>,
        queries: Mutex<Vec<EventQuery>>,
        updates: Mutex<Vec<Event>>,
        calendars: Vec<CalendarListEntry>,
        fail: bool,
    }

    impl FakeBackend {
        fn with_events(events: Vec<Event>) -> Arc<Self> {
            Arc::new(Self {
                events: Mutex::new(events),
                ..Default::default()
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                fail: true,
                ..Default::default()
            })
        }

        fn check(&self) -> Result<(), CalendarError> {
            if self.fail {
                Err(CalendarError::Api {
                    status: 503,
                    message: "Backend Error".to_string(),
                })
            } else {
                Ok(())
            }
        }
    }

    #[async_trait]
    impl CalendarBackend for FakeBackend {
        async fn list_events(
            &self,
            _calendar_id: &str,
            query: &EventQuery,
        ) -> Result<Vec<Event>, CalendarError> {
            self.check()?;
            self.queries.lock().unwrap().push(query.clone());
            Ok(self.events.lock().unwrap().clone())
        }

        async fn get_event(&self, _calendar_id: &str, event_id: &str) -> Result<Event, CalendarError> {
            self.check()?;
            self.events
                .lock()
                .unwrap()
                .iter()
                .find(|e| e.id.as_deref() == Some(event_id))
                .cloned()
                .ok_or(CalendarError::Api {
                    status: 404,
                    message: "Not Found".to_string(),
                })
        }

        async fn insert_event(&self, _calendar_id: &str, event: &Event) -> Result<Event, CalendarError> {
            self.check()?;
            let mut created = event.clone();
            created.id = Some("created1".to_string());
            Ok(created)
        }

        async fn update_event(
            &self,
            _calendar_id: &str,
            _event_id: &str,
            event: &Event,
        ) -> Result<Event, CalendarError> {
            self.check()?;
            self.updates.lock().unwrap().push(event.clone());
            Ok(event.clone())
        }

        async fn list_calendars(
            &self,
            _query: &CalendarListQuery,
        ) -> Result<Vec<CalendarListEntry>, CalendarError> {
            self.check()?;
            Ok(self.calendars.clone())
        }
    }

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 17, 3, 0, 0).unwrap()
    }

    fn timed(id: &str, start: DateTime<Utc>) -> Event {
        Event {
            id: Some(id.to_string()),
            summary: Some(format!("event {}", id)),
            start: Some(EventDateTime::timed(start.to_rfc3339(), "UTC")),
            end: Some(EventDateTime::timed(
                (start + Duration::hours(1)).to_rfc3339(),
                "UTC",
            )),
            ..Default::default()
        }
    }

    async fn run(tool: &dyn Tool, args: Value) -> Value {
        let params: HashMap<String, Value> = serde_json::from_value(args).unwrap();
        let bound = bind(&tool.spec(), params).unwrap();
        tool.execute(bound).await.unwrap()
    }

    #[tokio::test]
    async fn test_get_schedule_half_open_window() {
        let now = fixed_now();
        let backend = FakeBackend::with_events(vec![
            timed("past", now - Duration::hours(1)),
            timed("soon", now + Duration::hours(1)),
            timed("edge", now + Duration::days(7)),
            timed("late", now + Duration::days(8)),
        ]);
        let tool = GetSchedule::new(backend.clone()).with_clock(fixed_now);

        let value = run(&tool, json!({"days_ahead": 7})).await;
        let ids: Vec<&str> = value
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e["id"].as_str().unwrap())
            .collect();
        assert_eq!(ids, vec!["soon"]);

        let query = backend.queries.lock().unwrap()[0].clone();
        assert_eq!(query.time_min.as_deref(), Some("2026-10-17T03:00:00Z"));
        assert_eq!(query.time_max.as_deref(), Some("2026-10-24T03:00:00Z"));
        assert_eq!(query.time_zone.as_deref(), Some("Asia/Tokyo"));
        assert_eq!(query.max_results, Some(10));
        assert!(query.single_events && query.order_by_start);
    }

    #[tokio::test]
    async fn test_all_day_and_timed_flattening() {
        let all_day = Event {
            id: Some("holiday".to_string()),
            start: Some(EventDateTime::all_day("2026-10-19")),
            end: Some(EventDateTime::all_day("2026-10-20")),
            ..Default::default()
        };
        let backend = FakeBackend::with_events(vec![
            all_day,
            timed("meeting", fixed_now() + Duration::hours(2)),
        ]);
        let tool = GetSchedule::new(backend).with_clock(fixed_now);

        let value = run(&tool, json!({})).await;
        let events = value.as_array().unwrap();
        assert_eq!(events.len(), 2);

        assert_eq!(events[0]["is_all_day"], true);
        assert_eq!(events[0]["start"], "2026-10-19");
        assert_eq!(events[0]["end"], "2026-10-20");
        assert_eq!(events[0]["summary"], "No title");
        assert_eq!(events[0]["location"], "");
        assert_eq!(events[0]["attendees"], json!([]));
        assert_eq!(events[0]["conference_data"], json!({}));
        assert_eq!(events[0]["creator"], json!({"email": "", "name": ""}));

        assert_eq!(events[1]["is_all_day"], false);
        assert!(events[1]["start"].as_str().unwrap().starts_with("2026-10-17T05:00:00"));
    }

    #[tokio::test]
    async fn test_all_day_events_use_same_window_rule() {
        let all_day = |id: &str, date: &str| Event {
            id: Some(id.to_string()),
            start: Some(EventDateTime::all_day(date)),
            end: Some(EventDateTime::all_day(date)),
            ..Default::default()
        };
        // "now" is 2026-10-17T03:00Z; a 7-day window ends 2026-10-24T03:00Z.
        let backend = FakeBackend::with_events(vec![
            all_day("today", "2026-10-17"),
            all_day("tomorrow", "2026-10-18"),
            all_day("last-day", "2026-10-24"),
            all_day("after", "2026-10-25"),
        ]);
        let tool = GetSchedule::new(backend).with_clock(fixed_now);

        let value = run(&tool, json!({"days_ahead": 7})).await;
        let ids: Vec<&str> = value
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e["id"].as_str().unwrap())
            .collect();
        assert_eq!(ids, vec!["tomorrow", "last-day"]);
    }

    #[tokio::test]
    async fn test_huge_window_rejected() {
        let backend = FakeBackend::with_events(Vec::new());
        let tool = GetSchedule::new(backend.clone()).with_clock(fixed_now);
        let params: HashMap<String, Value> =
            serde_json::from_value(json!({"days_ahead": i64::MAX})).unwrap();
        let err = tool
            .execute(bind(&tool.spec(), params).unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::InvalidParameter { ref name, .. } if name == "days_ahead"));
        assert!(backend.queries.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_get_schedule_service_error_is_value() {
        let tool = GetSchedule::new(FakeBackend::failing()).with_clock(fixed_now);
        let value = run(&tool, json!({"calendar_id": "work"})).await;
        assert!(value["error"].as_str().unwrap().contains("Backend Error"));
        assert_eq!(value["calendar_id"], "work");
    }

    #[tokio::test]
    async fn test_create_event_builds_timed_event() {
        let tool = CreateEvent::new(FakeBackend::with_events(Vec::new()));
        let value = run(
            &tool,
            json!({
                "summary": "Dentist",
                "start_time": "2026-10-20T10:00:00",
                "end_time": "2026-10-20T11:00:00"
            }),
        )
        .await;

        assert_eq!(value["id"], "created1");
        assert_eq!(value["summary"], "Dentist");
        assert_eq!(value["start"], "2026-10-20T10:00:00");
        assert_eq!(value["description"], "");
        assert_eq!(value["is_all_day"], false);
    }

    #[tokio::test]
    async fn test_update_event_changes_only_supplied_fields() {
        let mut original = timed("ev1", fixed_now() + Duration::days(1));
        original.location = Some("Room 4".to_string());
        original
            .extra
            .insert("recurrence".to_string(), json!(["RRULE:FREQ=WEEKLY"]));
        let backend = FakeBackend::with_events(vec![original.clone()]);
        let tool = UpdateEvent::new(backend.clone());

        let value = run(&tool, json!({"event_id": "ev1", "summary": "Renamed"})).await;
        assert_eq!(value["summary"], "Renamed");

        let submitted = backend.updates.lock().unwrap()[0].clone();
        assert_eq!(submitted.start, original.start);
        assert_eq!(submitted.end, original.end);
        assert_eq!(submitted.location, original.location);
        assert_eq!(submitted.extra, original.extra);
    }

    #[tokio::test]
    async fn test_update_event_times_and_attendees() {
        let backend = FakeBackend::with_events(vec![timed("ev2", fixed_now())]);
        let tool = UpdateEvent::new(backend.clone());

        run(
            &tool,
            json!({
                "event_id": "ev2",
                "start_time": "2026-10-21T09:00:00",
                "attendees": ["a@example.com", "b@example.com"]
            }),
        )
        .await;

        let submitted = backend.updates.lock().unwrap()[0].clone();
        assert_eq!(
            submitted.start,
            Some(EventDateTime::timed("2026-10-21T09:00:00", "Asia/Tokyo"))
        );
        assert_eq!(submitted.attendees.len(), 2);
        assert_eq!(submitted.attendees[1].email.as_deref(), Some("b@example.com"));
    }

    #[tokio::test]
    async fn test_update_missing_event_is_value() {
        let tool = UpdateEvent::new(FakeBackend::with_events(Vec::new()));
        let value = run(&tool, json!({"event_id": "nope"})).await;
        assert!(value["error"].as_str().unwrap().contains("Not Found"));
    }

    #[tokio::test]
    async fn test_list_calendars_flattening() {
        let backend = Arc::new(FakeBackend {
            calendars: vec![CalendarListEntry {
                id: "me@example.com".to_string(),
                summary: Some("Me".to_string()),
                primary: Some(true),
                access_role: Some("owner".to_string()),
                ..Default::default()
            }],
            ..Default::default()
        });
        let tool = ListCalendars::new(backend);
        let value = run(&tool, json!({})).await;
        assert_eq!(
            value[0],
            json!({
                "id": "me@example.com",
                "summary": "Me",
                "description": "",
                "time_zone": "",
                "access_role": "owner",
                "primary": true,
                "background_color": "",
                "foreground_color": "",
                "hidden": false,
                "selected": false
            })
        );
    }

    #[tokio::test]
    async fn test_non_positive_window_rejected() {
        let tool = GetSchedule::new(FakeBackend::with_events(Vec::new())).with_clock(fixed_now);
        let params: HashMap<String, Value> =
            serde_json::from_value(json!({"days_ahead": 0})).unwrap();
        let err = tool
            .execute(bind(&tool.spec(), params).unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::InvalidParameter { .. }));
    }
}
