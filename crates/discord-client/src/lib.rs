//! Discord REST client library.
//!
//! A small bot-token client for the Discord REST API. It supports:
//!
//! - Fetching the bot's own identity
//! - Sending text to a channel (split at Discord's 2000-character limit)
//! - Receiving new messages by polling channels, with retry backoff
//!
//! The gateway (websocket) protocol is not used.
//!
//! # Example
//!
//! ```no_run
//! use discord_client::{DiscordClient, DiscordConfig};
//! use futures::StreamExt;
//!
//! # async fn example() -> Result<(), discord_client::DiscordError> {
//! let config = DiscordConfig::from_env()?;
//! let (client, me) = DiscordClient::connect(config).await?;
//!
//! let mut messages = discord_client::subscribe(&client);
//! while let Some(result) = messages.next().await {
//!     let message = result?;
//!     if message.author.id != me.id {
//!         client.send_message(&message.channel_id, "pong").await?;
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod poller;
pub mod types;

pub use client::DiscordClient;
pub use config::{DiscordConfig, DEFAULT_API_URL, DEFAULT_POLL_INTERVAL};
pub use error::DiscordError;
pub use poller::{subscribe, subscribe_with_reconnect, MessageStream, ReconnectConfig};
pub use types::{split_message, Message, User, MAX_MESSAGE_LEN};
