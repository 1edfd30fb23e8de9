//! OAuth2 authorization for the calendar API.
//!
//! [`Authenticator`] owns the token lifecycle: it loads the persisted token,
//! refreshes it when expired, and falls back to a one-time interactive
//! consent when no usable token exists. Refresh and consent run behind an
//! async mutex within the process and the token store's file lock across
//! processes, so concurrent callers never refresh twice.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use rand::distributions::Alphanumeric;
use rand::Rng;
use reqwest::Client;
use serde::Deserialize;
use tokio::net::TcpListener;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::callback::wait_for_callback;
use crate::config::CalendarConfig;
use crate::error::CalendarError;
use crate::token::{exchange_code_at, refresh_access_token_at, OAuthToken, TokenStore};

const DEFAULT_AUTH_URI: &str = "https://accounts.google.com/o/oauth2/auth";
const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// Source of bearer tokens for API calls.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// Return a currently valid access token.
    async fn access_token(&self) -> Result<String, CalendarError>;
}

/// A fixed bearer token. Useful for tests and short-lived scripts.
#[derive(Debug, Clone)]
pub struct StaticToken(pub String);

#[async_trait]
impl TokenProvider for StaticToken {
    async fn access_token(&self) -> Result<String, CalendarError> {
        Ok(self.0.clone())
    }
}

/// OAuth2 client secrets as downloaded from the Google Cloud console.
#[derive(Debug, Clone, Deserialize)]
pub struct ClientSecrets {
    pub client_id: String,
    pub client_secret: String,
    #[serde(default = "default_auth_uri")]
    pub auth_uri: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_auth_uri() -> String {
    DEFAULT_AUTH_URI.to_string()
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

#[derive(Deserialize)]
struct SecretsFile {
    installed: Option<ClientSecrets>,
    web: Option<ClientSecrets>,
}

impl ClientSecrets {
    /// Parse a client secrets document (`installed` or `web` application type).
    pub fn from_json(json: &str) -> Result<Self, CalendarError> {
        let file: SecretsFile = serde_json::from_str(json)?;
        file.installed.or(file.web).ok_or_else(|| {
            CalendarError::Config(
                "client secrets must contain an \"installed\" or \"web\" section".to_string(),
            )
        })
    }

    /// Load client secrets from a file.
    pub fn load(path: &Path) -> Result<Self, CalendarError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            CalendarError::Config(format!(
                "failed to read client secrets '{}': {}",
                path.display(),
                e
            ))
        })?;
        Self::from_json(&content)
    }
}

/// Manages the calendar OAuth2 token.
pub struct Authenticator {
    http: Client,
    secrets: ClientSecrets,
    store: TokenStore,
    scopes: Vec<String>,
    redirect_port: u16,
    consent_timeout: Duration,
    cached: Mutex<Option<OAuthToken>>,
}

impl Authenticator {
    /// Create an authenticator from explicit parts.
    pub fn new(secrets: ClientSecrets, store: TokenStore, scopes: Vec<String>) -> Self {
        let defaults = CalendarConfig::default();
        Self {
            http: Client::new(),
            secrets,
            store,
            scopes,
            redirect_port: defaults.redirect_port,
            consent_timeout: defaults.consent_timeout,
            cached: Mutex::new(None),
        }
    }

    /// Create an authenticator from configuration, reading the client secrets file.
    pub fn from_config(config: &CalendarConfig) -> Result<Self, CalendarError> {
        let secrets = ClientSecrets::load(&config.credentials_path)?;
        let mut auth = Self::new(
            secrets,
            TokenStore::new(&config.token_path),
            config.scopes.clone(),
        );
        auth.redirect_port = config.redirect_port;
        auth.consent_timeout = config.consent_timeout;
        Ok(auth)
    }

    /// Force the interactive consent flow and persist the resulting token.
    pub async fn authorize(&self) -> Result<(), CalendarError> {
        let mut cached = self.cached.lock().await;
        let _lock = self.store.lock().await?;
        let token = self.run_consent().await?;
        self.store.save(&token)?;
        *cached = Some(token);
        Ok(())
    }

    async fn obtain_token(&self) -> Result<String, CalendarError> {
        let mut cached = self.cached.lock().await;
        if let Some(access) = cached.as_ref().and_then(|t| self.usable(t)) {
            return Ok(access);
        }

        // Another process may have refreshed while we waited for the lock.
        let _lock = self.store.lock().await?;
        let stored = self.load_stored()?;
        if let Some(access) = stored.as_ref().and_then(|t| self.usable(t)) {
            *cached = stored;
            return Ok(access);
        }

        let refresh_token = stored
            .as_ref()
            .filter(|t| t.covers(&self.scopes))
            .and_then(|t| t.refresh_token.clone());

        let token = match refresh_token {
            Some(refresh_token) => {
                refresh_access_token_at(
                    &self.http,
                    &self.secrets.token_uri,
                    &self.secrets.client_id,
                    &self.secrets.client_secret,
                    &refresh_token,
                    &self.scopes,
                )
                .await?
            }
            None => {
                warn!("No usable calendar token, starting interactive consent");
                self.run_consent().await?
            }
        };

        self.store.save(&token)?;
        let access = token.access_token.clone();
        *cached = Some(token);
        Ok(access)
    }

    fn usable(&self, token: &OAuthToken) -> Option<String> {
        (!token.is_expired() && token.covers(&self.scopes)).then(|| token.access_token.clone())
    }

    /// Persisted token; an unparseable file counts as no token.
    fn load_stored(&self) -> Result<Option<OAuthToken>, CalendarError> {
        match self.store.load() {
            Err(CalendarError::Json(e)) => {
                warn!(
                    "Ignoring unreadable token file {}: {}",
                    self.store.path().display(),
                    e
                );
                Ok(None)
            }
            other => other,
        }
    }

    async fn run_consent(&self) -> Result<OAuthToken, CalendarError> {
        let listener = TcpListener::bind(("127.0.0.1", self.redirect_port))
            .await
            .map_err(|e| CalendarError::Io(format!("failed to bind consent listener: {}", e)))?;
        let port = listener
            .local_addr()
            .map_err(|e| CalendarError::Io(e.to_string()))?
            .port();
        let redirect_uri = format!("http://127.0.0.1:{}/", port);
        let state = random_state();

        let url = consent_url(&self.secrets, &self.scopes, &redirect_uri, &state)?;
        info!("Waiting for calendar consent on {}", redirect_uri);
        eprintln!("Open this URL in a browser to grant calendar access:\n\n{}\n", url);

        let params = wait_for_callback(&listener, self.consent_timeout).await?;
        if params.state != state {
            return Err(CalendarError::Auth(
                "consent redirect carried an unexpected state".to_string(),
            ));
        }

        exchange_code_at(
            &self.http,
            &self.secrets.token_uri,
            &self.secrets.client_id,
            &self.secrets.client_secret,
            &params.code,
            &redirect_uri,
            &self.scopes,
        )
        .await
    }
}

#[async_trait]
impl TokenProvider for Authenticator {
    async fn access_token(&self) -> Result<String, CalendarError> {
        self.obtain_token().await
    }
}

fn random_state() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(32)
        .map(char::from)
        .collect()
}

/// Build the consent URL the user opens in a browser.
fn consent_url(
    secrets: &ClientSecrets,
    scopes: &[String],
    redirect_uri: &str,
    state: &str,
) -> Result<url::Url, CalendarError> {
    let scope = scopes.join(" ");
    url::Url::parse_with_params(
        &secrets.auth_uri,
        &[
            ("client_id", secrets.client_id.as_str()),
            ("redirect_uri", redirect_uri),
            ("response_type", "code"),
            ("scope", scope.as_str()),
            ("access_type", "offline"),
            ("prompt", "consent"),
            ("state", state),
        ],
    )
    .map_err(|e| CalendarError::Config(format!("invalid auth_uri: {}", e)))
}
