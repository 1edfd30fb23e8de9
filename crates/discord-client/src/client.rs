//! Discord REST client.

use std::time::Duration;

use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::config::DiscordConfig;
use crate::error::DiscordError;
use crate::types::{snowflake_cmp, split_message, ApiErrorBody, CreateMessage, Message, User, MAX_MESSAGE_LEN};

/// Client for the Discord REST API, authenticated as a bot.
#[derive(Clone)]
pub struct DiscordClient {
    http: Client,
    config: DiscordConfig,
}

impl DiscordClient {
    /// Build a client without contacting the API.
    pub fn new(config: DiscordConfig) -> Result<Self, DiscordError> {
        if config.bot_token.trim().is_empty() {
            return Err(DiscordError::Config("bot token is empty".to_string()));
        }

        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(DiscordError::Http)?;

        Ok(Self { http, config })
    }

    /// Build a client and verify the token by fetching the bot's identity.
    pub async fn connect(config: DiscordConfig) -> Result<(Self, User), DiscordError> {
        let client = Self::new(config)?;
        let me = client.current_user().await?;
        info!("Logged in as {} ({})", me.display_name(), me.id);
        Ok((client, me))
    }

    /// Get the configuration.
    pub fn config(&self) -> &DiscordConfig {
        &self.config
    }

    /// The user the bot token belongs to.
    pub async fn current_user(&self) -> Result<User, DiscordError> {
        let response = self
            .http
            .get(self.config.me_url())
            .header("Authorization", self.config.authorization())
            .send()
            .await?;
        parse_response(response).await
    }

    /// Send text to a channel, split into as many messages as needed.
    pub async fn send_message(
        &self,
        channel_id: &str,
        content: &str,
    ) -> Result<Vec<Message>, DiscordError> {
        let url = self.config.messages_url(channel_id);
        let mut sent = Vec::new();

        for chunk in split_message(content, MAX_MESSAGE_LEN) {
            debug!("Sending {} chars to channel {}", chunk.chars().count(), channel_id);
            let response = self
                .http
                .post(&url)
                .header("Authorization", self.config.authorization())
                .json(&CreateMessage { content: &chunk })
                .send()
                .await?;
            sent.push(parse_response(response).await?);
        }

        Ok(sent)
    }

    /// Fetch messages in a channel, oldest first.
    ///
    /// With `after`, only messages newer than that ID are returned; without
    /// it, the most recent `limit` messages.
    pub async fn fetch_messages(
        &self,
        channel_id: &str,
        after: Option<&str>,
        limit: u8,
    ) -> Result<Vec<Message>, DiscordError> {
        let mut query = vec![("limit", limit.clamp(1, 100).to_string())];
        if let Some(after) = after {
            query.push(("after", after.to_string()));
        }

        let response = self
            .http
            .get(self.config.messages_url(channel_id))
            .header("Authorization", self.config.authorization())
            .query(&query)
            .send()
            .await?;

        let mut messages: Vec<Message> = parse_response(response).await?;
        messages.sort_by(|a, b| snowflake_cmp(&a.id, &b.id));
        Ok(messages)
    }
}

impl std::fmt::Debug for DiscordClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiscordClient")
            .field("config", &self.config)
            .finish()
    }
}

async fn parse_response<T: DeserializeOwned>(response: Response) -> Result<T, DiscordError> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        let message = serde_json::from_str::<ApiErrorBody>(&body)
            .ok()
            .map(|e| e.message)
            .filter(|m| !m.is_empty())
            .unwrap_or(body);
        return Err(DiscordError::Api {
            status: status.as_u16(),
            message,
        });
    }

    Ok(serde_json::from_str(&body)?)
}
