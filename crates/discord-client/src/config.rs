//! Configuration types for discord-client.

use std::env;
use std::fmt;
use std::time::Duration;

use crate::error::DiscordError;

/// Default Discord REST API base URL.
pub const DEFAULT_API_URL: &str = "https://discord.com/api/v10";

/// Default interval between channel polls.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(2000);

/// Configuration for connecting to the Discord REST API.
#[derive(Clone)]
pub struct DiscordConfig {
    /// Base URL of the REST API (e.g., "https://discord.com/api/v10").
    pub api_url: String,
    /// Bot token, sent as `Authorization: Bot <token>`.
    pub bot_token: String,
    /// Channels to poll for messages.
    pub channel_ids: Vec<String>,
    /// Delay between polls of the channel list.
    pub poll_interval: Duration,
}

impl DiscordConfig {
    /// Create a new configuration with the given bot token.
    pub fn new(bot_token: impl Into<String>) -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            bot_token: bot_token.into(),
            channel_ids: Vec::new(),
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Required:
    /// - `DISCORD_BOT_TOKEN`
    /// - `DISCORD_CHANNEL_IDS` - comma-separated channel IDs
    ///
    /// Optional:
    /// - `DISCORD_API_URL` (default: https://discord.com/api/v10)
    /// - `DISCORD_POLL_INTERVAL_MS` (default: 2000)
    pub fn from_env() -> Result<Self, DiscordError> {
        let token = env::var("DISCORD_BOT_TOKEN")
            .ok()
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| DiscordError::Config("DISCORD_BOT_TOKEN not set".to_string()))?;

        let channel_ids = parse_channel_ids(&env::var("DISCORD_CHANNEL_IDS").unwrap_or_default());
        if channel_ids.is_empty() {
            return Err(DiscordError::Config(
                "DISCORD_CHANNEL_IDS must list at least one channel".to_string(),
            ));
        }

        let mut config = Self::new(token).with_channels(channel_ids);

        if let Ok(url) = env::var("DISCORD_API_URL") {
            config = config.with_api_url(url);
        }

        if let Some(ms) = env::var("DISCORD_POLL_INTERVAL_MS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
        {
            config = config.with_poll_interval(Duration::from_millis(ms));
        }

        Ok(config)
    }

    /// Override the API base URL.
    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the channels to poll.
    pub fn with_channels<I, S>(mut self, channels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.channel_ids = channels.into_iter().map(Into::into).collect();
        self
    }

    /// Set the poll interval.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// URL of the bot's own user object.
    pub fn me_url(&self) -> String {
        format!("{}/users/@me", self.api_url)
    }

    /// URL of a channel's message collection.
    pub fn messages_url(&self, channel_id: &str) -> String {
        format!("{}/channels/{}/messages", self.api_url, channel_id)
    }

    pub(crate) fn authorization(&self) -> String {
        format!("Bot {}", self.bot_token)
    }
}

impl fmt::Debug for DiscordConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let masked: String = self.bot_token.chars().take(4).collect();
        f.debug_struct("DiscordConfig")
            .field("api_url", &self.api_url)
            .field("bot_token", &format!("{}***", masked))
            .field("channel_ids", &self.channel_ids)
            .field("poll_interval", &self.poll_interval)
            .finish()
    }
}

fn parse_channel_ids(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .collect()
}
