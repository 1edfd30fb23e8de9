//! Error types for the calendar adapter.

use thiserror::Error;

/// Errors that can occur when talking to the calendar service.
#[derive(Debug, Error)]
pub enum CalendarError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Error response from the calendar API.
    #[error("Calendar API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Authorization could not be obtained or refreshed.
    #[error("Authorization failed: {0}")]
    Auth(String),

    /// Reading or writing a credential file failed.
    #[error("I/O error: {0}")]
    Io(String),

    /// Invalid configuration.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// The user did not complete the consent step in time.
    #[error("Timed out waiting for authorization consent")]
    ConsentTimedOut,
}
