//! REST client for the Calendar v3 API.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::auth::TokenProvider;
use crate::backend::{CalendarBackend, CalendarListQuery, EventQuery};
use crate::config::CalendarConfig;
use crate::error::CalendarError;
use crate::types::{CalendarListEntry, CalendarListPage, Event, EventsPage};

/// Calendar v3 client authenticated through a [`TokenProvider`].
pub struct GoogleCalendarClient {
    http: Client,
    base_url: String,
    auth: Arc<dyn TokenProvider>,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    #[serde(default)]
    message: String,
}

impl GoogleCalendarClient {
    /// Create a client from configuration.
    pub fn new(
        config: &CalendarConfig,
        auth: Arc<dyn TokenProvider>,
    ) -> Result<Self, CalendarError> {
        if config.api_url.is_empty() {
            return Err(CalendarError::Config("calendar API URL is empty".to_string()));
        }
        Ok(Self::with_base_url(config.api_url.clone(), auth))
    }

    /// Create a client against an explicit base URL.
    pub fn with_base_url(base_url: impl Into<String>, auth: Arc<dyn TokenProvider>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            auth,
        }
    }

    fn events_url(&self, calendar_id: &str) -> String {
        format!(
            "{}/calendars/{}/events",
            self.base_url,
            urlencoding::encode(calendar_id)
        )
    }

    fn event_url(&self, calendar_id: &str, event_id: &str) -> String {
        format!(
            "{}/{}",
            self.events_url(calendar_id),
            urlencoding::encode(event_id)
        )
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, CalendarError> {
        let token = self.auth.access_token().await?;
        let response = request.bearer_auth(token).send().await?;
        Self::parse(response).await
    }

    async fn parse<T: DeserializeOwned>(response: Response) -> Result<T, CalendarError> {
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ApiErrorBody>(&body)
                .map(|b| b.error.message)
                .ok()
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| body.clone());
            warn!("Calendar API error {}: {}", status.as_u16(), message);
            return Err(CalendarError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl CalendarBackend for GoogleCalendarClient {
    async fn list_events(
        &self,
        calendar_id: &str,
        query: &EventQuery,
    ) -> Result<Vec<Event>, CalendarError> {
        let mut params: Vec<(&str, String)> = Vec::new();
        if let Some(ref min) = query.time_min {
            params.push(("timeMin", min.clone()));
        }
        if let Some(ref max) = query.time_max {
            params.push(("timeMax", max.clone()));
        }
        if let Some(ref tz) = query.time_zone {
            params.push(("timeZone", tz.clone()));
        }
        if let Some(max) = query.max_results {
            params.push(("maxResults", max.to_string()));
        }
        if query.single_events {
            params.push(("singleEvents", "true".to_string()));
        }
        if query.order_by_start {
            params.push(("orderBy", "startTime".to_string()));
        }

        debug!("Listing events for calendar {}", calendar_id);
        let page: EventsPage = self
            .send(self.http.get(self.events_url(calendar_id)).query(&params))
            .await?;
        Ok(page.items)
    }

    async fn get_event(&self, calendar_id: &str, event_id: &str) -> Result<Event, CalendarError> {
        self.send(self.http.get(self.event_url(calendar_id, event_id)))
            .await
    }

    async fn insert_event(&self, calendar_id: &str, event: &Event) -> Result<Event, CalendarError> {
        self.send(self.http.post(self.events_url(calendar_id)).json(event))
            .await
    }

    async fn update_event(
        &self,
        calendar_id: &str,
        event_id: &str,
        event: &Event,
    ) -> Result<Event, CalendarError> {
        self.send(
            self.http
                .put(self.event_url(calendar_id, event_id))
                .json(event),
        )
        .await
    }

    async fn list_calendars(
        &self,
        query: &CalendarListQuery,
    ) -> Result<Vec<CalendarListEntry>, CalendarError> {
        let mut params: Vec<(&str, String)> = Vec::new();
        if let Some(max) = query.max_results {
            params.push(("maxResults", max.to_string()));
        }
        if let Some(ref role) = query.min_access_role {
            params.push(("minAccessRole", role.clone()));
        }
        if query.show_deleted {
            params.push(("showDeleted", "true".to_string()));
        }
        if query.show_hidden {
            params.push(("showHidden", "true".to_string()));
        }

        let url = format!("{}/users/me/calendarList", self.base_url);
        let page: CalendarListPage = self.send(self.http.get(url).query(&params)).await?;
        Ok(page.items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::StaticToken;
    use crate::types::EventDateTime;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> GoogleCalendarClient {
        GoogleCalendarClient::with_base_url(
            server.uri(),
            Arc::new(StaticToken("ya29.test".to_string())),
        )
    }

    #[tokio::test]
    async fn test_list_events_sends_query() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/calendars/primary/events"))
            .and(header("authorization", "Bearer ya29.test"))
            .and(query_param("timeZone", "Asia/Tokyo"))
            .and(query_param("singleEvents", "true"))
            .and(query_param("orderBy", "startTime"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "kind": "calendar#events",
                "items": [
                    {"id": "a", "summary": "Standup", "start": {"dateTime": "2026-10-20T09:00:00+09:00"}},
                    {"id": "b", "start": {"date": "2026-10-21"}}
                ]
            })))
            .mount(&server)
            .await;

        let query = EventQuery {
            time_min: Some("2026-10-20T00:00:00Z".to_string()),
            time_max: Some("2026-10-22T00:00:00Z".to_string()),
            time_zone: Some("Asia/Tokyo".to_string()),
            single_events: true,
            order_by_start: true,
            ..Default::default()
        };
        let events = client(&server).list_events("primary", &query).await.unwrap();

        assert_eq!(events.len(), 2);
        assert_eq!(events[0].summary.as_deref(), Some("Standup"));
        assert!(events[1].is_all_day());
    }

    #[tokio::test]
    async fn test_get_event_encodes_calendar_id() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/calendars/team%40group.calendar.google.com/events/ev1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "ev1",
                "summary": "Review"
            })))
            .mount(&server)
            .await;

        let event = client(&server)
            .get_event("team@group.calendar.google.com", "ev1")
            .await
            .unwrap();
        assert_eq!(event.id.as_deref(), Some("ev1"));
    }

    #[tokio::test]
    async fn test_insert_event_posts_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/calendars/primary/events"))
            .and(body_partial_json(json!({
                "summary": "Lunch",
                "start": {"dateTime": "2026-10-20T12:00:00", "timeZone": "Asia/Tokyo"}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "new1",
                "summary": "Lunch",
                "htmlLink": "https://calendar.google.com/event?eid=new1"
            })))
            .mount(&server)
            .await;

        let event = Event {
            summary: Some("Lunch".to_string()),
            start: Some(EventDateTime::timed("2026-10-20T12:00:00", "Asia/Tokyo")),
            end: Some(EventDateTime::timed("2026-10-20T13:00:00", "Asia/Tokyo")),
            ..Default::default()
        };
        let created = client(&server).insert_event("primary", &event).await.unwrap();
        assert_eq!(
            created.html_link.as_deref(),
            Some("https://calendar.google.com/event?eid=new1")
        );
    }

    #[tokio::test]
    async fn test_api_error_message_extracted() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/calendars/primary/events/missing"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "error": {"code": 404, "message": "Not Found"}
            })))
            .mount(&server)
            .await;

        let result = client(&server).get_event("primary", "missing").await;
        match result {
            Err(CalendarError::Api { status, message }) => {
                assert_eq!(status, 404);
                assert_eq!(message, "Not Found");
            }
            other => panic!("expected Api error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_list_calendars() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users/me/calendarList"))
            .and(query_param("showHidden", "true"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": [
                    {"id": "primary@example.com", "summary": "Me", "primary": true, "accessRole": "owner"}
                ]
            })))
            .mount(&server)
            .await;

        let query = CalendarListQuery {
            show_hidden: true,
            ..Default::default()
        };
        let calendars = client(&server).list_calendars(&query).await.unwrap();
        assert_eq!(calendars.len(), 1);
        assert_eq!(calendars[0].access_role.as_deref(), Some("owner"));
        assert_eq!(calendars[0].primary, Some(true));
    }
}
