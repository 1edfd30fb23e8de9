//! Configuration for the calendar adapter.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Calendar v3 REST base URL.
pub const DEFAULT_API_URL: &str = "https://www.googleapis.com/calendar/v3";

/// Scopes requested during consent. Covers events and the calendar list.
pub const DEFAULT_SCOPES: &[&str] = &["https://www.googleapis.com/auth/calendar"];

/// Default time allowed for the interactive consent step.
const DEFAULT_CONSENT_TIMEOUT: Duration = Duration::from_secs(180);

/// Configuration for the calendar adapter.
#[derive(Debug, Clone)]
pub struct CalendarConfig {
    /// Path to the OAuth2 client secrets file (`credential.json`).
    pub credentials_path: PathBuf,
    /// Path to the persisted token file (`token.json`).
    pub token_path: PathBuf,
    /// Calendar API base URL.
    pub api_url: String,
    /// OAuth2 scopes.
    pub scopes: Vec<String>,
    /// Loopback port for the consent redirect (0 picks a free port).
    pub redirect_port: u16,
    /// How long to wait for the user to finish consent.
    pub consent_timeout: Duration,
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            credentials_path: PathBuf::from("credential.json"),
            token_path: PathBuf::from("token.json"),
            api_url: DEFAULT_API_URL.to_string(),
            scopes: DEFAULT_SCOPES.iter().map(|s| s.to_string()).collect(),
            redirect_port: 0,
            consent_timeout: DEFAULT_CONSENT_TIMEOUT,
        }
    }
}

impl CalendarConfig {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Description | Default |
    /// |----------|-------------|---------|
    /// | `GOOGLE_CREDENTIALS_FILE` | Client secrets file | `credential.json` |
    /// | `GOOGLE_TOKEN_FILE` | Token file | `token.json` |
    /// | `GOOGLE_CALENDAR_API_URL` | API base URL | Calendar v3 |
    /// | `GOOGLE_OAUTH_REDIRECT_PORT` | Consent redirect port | `0` |
    /// | `GOOGLE_OAUTH_CONSENT_TIMEOUT_SECS` | Consent timeout | `180` |
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let credentials_path = env::var("GOOGLE_CREDENTIALS_FILE")
            .map(PathBuf::from)
            .unwrap_or(defaults.credentials_path);

        let token_path = env::var("GOOGLE_TOKEN_FILE")
            .map(PathBuf::from)
            .unwrap_or(defaults.token_path);

        let api_url = env::var("GOOGLE_CALENDAR_API_URL").unwrap_or(defaults.api_url);

        let redirect_port = env::var("GOOGLE_OAUTH_REDIRECT_PORT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.redirect_port);

        let consent_timeout = env::var("GOOGLE_OAUTH_CONSENT_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(defaults.consent_timeout);

        Self {
            credentials_path,
            token_path,
            api_url,
            scopes: defaults.scopes,
            redirect_port,
            consent_timeout,
        }
    }

    /// Set the credentials file path.
    pub fn with_credentials_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.credentials_path = path.into();
        self
    }

    /// Set the token file path.
    pub fn with_token_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.token_path = path.into();
        self
    }

    /// Set the API base URL.
    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }
}
