//! OAuth2 token persistence and token-endpoint calls.

use std::ffi::OsString;
use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, Utc};
use fs2::FileExt;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::CalendarError;

/// Seconds before the recorded expiry at which a token counts as expired.
const EXPIRY_MARGIN_SECS: i64 = 60;

/// An OAuth2 token pair with expiry tracking.
///
/// Reads token files written by Google's Python client too: the access
/// token may be stored under `token` instead of `access_token`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OAuthToken {
    /// The short-lived access token for API calls.
    #[serde(alias = "token")]
    pub access_token: String,

    /// The long-lived refresh token for obtaining new access tokens.
    #[serde(default)]
    pub refresh_token: Option<String>,

    /// When the access token expires. `None` means unknown.
    #[serde(default)]
    pub expiry: Option<DateTime<Utc>>,

    /// Scopes granted to this token.
    #[serde(default)]
    pub scopes: Vec<String>,
}

impl OAuthToken {
    /// Check whether the access token has expired (with a 60-second margin).
    ///
    /// A token without a recorded expiry is treated as expired so it gets
    /// refreshed on first use.
    pub fn is_expired(&self) -> bool {
        match self.expiry {
            Some(exp) => Utc::now() >= exp - Duration::seconds(EXPIRY_MARGIN_SECS),
            None => true,
        }
    }

    /// Whether this token was granted every scope in `required`.
    ///
    /// Tokens that do not record scopes are assumed to cover them.
    pub fn covers(&self, required: &[String]) -> bool {
        self.scopes.is_empty() || required.iter().all(|s| self.scopes.contains(s))
    }
}

/// Mask a token for safe log output: show first 4 chars, then `***`.
pub fn mask_token(token: &str) -> String {
    match token.get(..4) {
        Some(prefix) if token.len() > 4 => format!("{}***", prefix),
        _ => "***".to_string(),
    }
}

impl fmt::Display for OAuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "OAuthToken(access={}, refresh={}, expiry={:?})",
            mask_token(&self.access_token),
            self.refresh_token
                .as_deref()
                .map(mask_token)
                .unwrap_or_else(|| "none".to_string()),
            self.expiry,
        )
    }
}

/// Persistent token storage backed by a JSON file with `0600` permissions.
///
/// Several engine processes may share one store. Writers hold [`TokenStore::lock`]
/// around load, refresh and save; [`TokenStore::save`] replaces the file by
/// rename so readers never see a partial write.
#[derive(Debug, Clone)]
pub struct TokenStore {
    path: PathBuf,
}

/// Exclusive advisory lock on a [`TokenStore`]. Released on drop.
#[derive(Debug)]
pub struct TokenLock {
    _file: File,
}

impl TokenStore {
    /// Create a new token store at the given path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Load the token from the store file.
    ///
    /// Returns `Ok(None)` if the file does not exist.
    pub fn load(&self) -> Result<Option<OAuthToken>, CalendarError> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&self.path).map_err(|e| {
            CalendarError::Io(format!(
                "failed to read token file '{}': {}",
                self.path.display(),
                e
            ))
        })?;

        let token: OAuthToken = serde_json::from_str(&content)?;
        debug!("Loaded calendar token from {}: {}", self.path.display(), token);
        Ok(Some(token))
    }

    /// Save the token, creating parent directories as needed.
    ///
    /// The token is written to a temporary file in the same directory and
    /// renamed over the store file.
    pub fn save(&self, token: &OAuthToken) -> Result<(), CalendarError> {
        let dir = self.ensure_dir()?;
        let content = serde_json::to_string_pretty(token)?;

        let mut tmp = tempfile::NamedTempFile::new_in(&dir).map_err(|e| {
            CalendarError::Io(format!(
                "failed to create temporary token file in '{}': {}",
                dir.display(),
                e
            ))
        })?;
        tmp.write_all(content.as_bytes())
            .and_then(|_| tmp.as_file().sync_all())
            .map_err(|e| {
                CalendarError::Io(format!(
                    "failed to write token file '{}': {}",
                    tmp.path().display(),
                    e
                ))
            })?;
        tmp.persist(&self.path).map_err(|e| {
            CalendarError::Io(format!(
                "failed to replace token file '{}': {}",
                self.path.display(),
                e.error
            ))
        })?;
        set_owner_only(&self.path)?;

        debug!("Saved calendar token to {}", self.path.display());
        Ok(())
    }

    /// Wait for the exclusive lock on this store.
    ///
    /// The lock lives on a sidecar `<file>.lock`, since saving replaces the
    /// token file itself.
    pub async fn lock(&self) -> Result<TokenLock, CalendarError> {
        self.ensure_dir()?;
        let lock_path = self.lock_path();
        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .truncate(false)
            .open(&lock_path)
            .map_err(|e| {
                CalendarError::Io(format!(
                    "failed to open token lock '{}': {}",
                    lock_path.display(),
                    e
                ))
            })?;

        let file = tokio::task::spawn_blocking(move || file.lock_exclusive().map(|_| file))
            .await
            .map_err(|e| CalendarError::Io(format!("token lock task failed: {}", e)))?
            .map_err(|e| {
                CalendarError::Io(format!(
                    "failed to lock '{}': {}",
                    lock_path.display(),
                    e
                ))
            })?;

        debug!("Locked {}", lock_path.display());
        Ok(TokenLock { _file: file })
    }

    /// Return the store file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| OsString::from("token"));
        name.push(".lock");
        self.path.with_file_name(name)
    }

    fn ensure_dir(&self) -> Result<PathBuf, CalendarError> {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => {
                std::fs::create_dir_all(parent).map_err(|e| {
                    CalendarError::Io(format!(
                        "failed to create token directory '{}': {}",
                        parent.display(),
                        e
                    ))
                })?;
                Ok(parent.to_path_buf())
            }
            _ => Ok(PathBuf::from(".")),
        }
    }
}

#[cfg(unix)]
fn set_owner_only(path: &Path) -> Result<(), CalendarError> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600)).map_err(|e| {
        CalendarError::Io(format!(
            "failed to set permissions on '{}': {}",
            path.display(),
            e
        ))
    })
}

#[cfg(not(unix))]
fn set_owner_only(_path: &Path) -> Result<(), CalendarError> {
    Ok(())
}

/// Refresh an access token at the given token endpoint.
///
/// Google may or may not rotate the refresh token; the existing one is kept
/// when the response omits it.
pub(crate) async fn refresh_access_token_at(
    client: &Client,
    endpoint: &str,
    client_id: &str,
    client_secret: &str,
    refresh_token: &str,
    scopes: &[String],
) -> Result<OAuthToken, CalendarError> {
    debug!("Refreshing calendar access token");

    let resp = client
        .post(endpoint)
        .form(&[
            ("client_id", client_id),
            ("client_secret", client_secret),
            ("refresh_token", refresh_token),
            ("grant_type", "refresh_token"),
        ])
        .send()
        .await?;

    let mut token = parse_token_response(resp, scopes).await?;
    if token.refresh_token.is_none() {
        token.refresh_token = Some(refresh_token.to_string());
    }
    Ok(token)
}

/// Exchange an authorization code for a token pair.
pub(crate) async fn exchange_code_at(
    client: &Client,
    endpoint: &str,
    client_id: &str,
    client_secret: &str,
    code: &str,
    redirect_uri: &str,
    scopes: &[String],
) -> Result<OAuthToken, CalendarError> {
    debug!("Exchanging authorization code for tokens");

    let resp = client
        .post(endpoint)
        .form(&[
            ("client_id", client_id),
            ("client_secret", client_secret),
            ("code", code),
            ("redirect_uri", redirect_uri),
            ("grant_type", "authorization_code"),
        ])
        .send()
        .await?;

    parse_token_response(resp, scopes).await
}

async fn parse_token_response(
    resp: reqwest::Response,
    requested_scopes: &[String],
) -> Result<OAuthToken, CalendarError> {
    let status = resp.status();
    let body: Value = resp.json().await?;

    if !status.is_success() {
        let description = body
            .get("error_description")
            .and_then(|v| v.as_str())
            .or_else(|| body.get("error").and_then(|v| v.as_str()))
            .unwrap_or("unknown error");
        warn!("Token endpoint returned {}: {}", status, description);
        return Err(CalendarError::Auth(format!(
            "token endpoint returned {}: {}",
            status.as_u16(),
            description
        )));
    }

    let access_token = body
        .get("access_token")
        .and_then(|v| v.as_str())
        .ok_or_else(|| CalendarError::Auth("missing access_token in token response".into()))?
        .to_string();

    let expires_in = body
        .get("expires_in")
        .and_then(|v| v.as_i64())
        .unwrap_or(3600);

    let refresh_token = body
        .get("refresh_token")
        .and_then(|v| v.as_str())
        .map(|s| s.to_string());

    let scopes = body
        .get("scope")
        .and_then(|v| v.as_str())
        .map(|s| s.split_whitespace().map(|s| s.to_string()).collect())
        .unwrap_or_else(|| requested_scopes.to_vec());

    Ok(OAuthToken {
        access_token,
        refresh_token,
        expiry: Some(Utc::now() + Duration::seconds(expires_in)),
        scopes,
    })
}
