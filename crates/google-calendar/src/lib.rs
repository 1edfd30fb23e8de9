//! Google Calendar adapter for the watari assistant.
//!
//! This crate is the thin layer between the calendar tools and the remote
//! Calendar v3 API:
//!
//! - [`CalendarBackend`] - the request/response surface the tools depend on
//! - [`GoogleCalendarClient`] - REST implementation of the backend
//! - [`Authenticator`] - OAuth2 token lifecycle (load, refresh, consent)
//! - [`TokenStore`] - persisted token file with owner-only permissions
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use google_calendar::{Authenticator, CalendarBackend, CalendarConfig, GoogleCalendarClient};
//!
//! # async fn example() -> Result<(), google_calendar::CalendarError> {
//! let config = CalendarConfig::from_env();
//! let auth = Arc::new(Authenticator::from_config(&config)?);
//! let client = GoogleCalendarClient::new(&config, auth)?;
//!
//! let event = client.get_event("primary", "abc123").await?;
//! println!("{:?}", event.summary);
//! # Ok(())
//! # }
//! ```

mod auth;
mod backend;
mod callback;
mod client;
mod config;
mod error;
mod token;
mod types;

pub use auth::{Authenticator, ClientSecrets, StaticToken, TokenProvider};
pub use backend::{CalendarBackend, CalendarListQuery, EventQuery};
pub use client::GoogleCalendarClient;
pub use config::{CalendarConfig, DEFAULT_API_URL, DEFAULT_SCOPES};
pub use error::CalendarError;
pub use token::{mask_token, OAuthToken, TokenStore};
pub use types::{Attendee, CalendarListEntry, Event, EventDateTime, Person};
