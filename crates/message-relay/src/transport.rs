//! Chat transport seam and its Discord implementation.

use async_trait::async_trait;
use discord_client::{DiscordClient, User};
use futures::stream::{Stream, StreamExt};
use tracing::debug;

use crate::error::RelayError;
use crate::message::ChatMessage;

/// Outbound side of a chat service.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// ID of the identity the relay posts as.
    fn self_id(&self) -> &str;

    /// Send text to a channel.
    async fn send(&self, channel_id: &str, text: &str) -> Result<(), RelayError>;
}

/// Discord transport backed by the REST client.
#[derive(Debug, Clone)]
pub struct DiscordTransport {
    client: DiscordClient,
    me: User,
}

impl DiscordTransport {
    pub fn new(client: DiscordClient, me: User) -> Self {
        Self { client, me }
    }

    /// The bot identity messages are posted as.
    pub fn me(&self) -> &User {
        &self.me
    }

    /// Inbound messages from the configured channels.
    pub fn messages(&self) -> impl Stream<Item = Result<ChatMessage, RelayError>> + Send + Unpin {
        discord_client::subscribe(&self.client).map(|result| {
            result.map(ChatMessage::from).map_err(RelayError::from)
        })
    }
}

#[async_trait]
impl ChatTransport for DiscordTransport {
    fn self_id(&self) -> &str {
        &self.me.id
    }

    async fn send(&self, channel_id: &str, text: &str) -> Result<(), RelayError> {
        let sent = self.client.send_message(channel_id, text).await?;
        debug!("Delivered {} message(s) to channel {}", sent.len(), channel_id);
        Ok(())
    }
}
