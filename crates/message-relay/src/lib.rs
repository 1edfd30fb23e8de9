//! Chat relay for the watari assistant.
//!
//! Each inbound chat message is handed to the reasoning engine as an
//! isolated subprocess, bounded by a wall-clock timeout, and the engine's
//! reply (or a fixed notice) is sent back to the originating channel.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use discord_client::{DiscordClient, DiscordConfig};
//! use message_relay::{DiscordTransport, Relay, RelayConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let (client, me) = DiscordClient::connect(DiscordConfig::from_env()?).await?;
//! let transport = Arc::new(DiscordTransport::new(client, me));
//! let config = RelayConfig::from_env()?;
//! let invoker = Arc::new(config.command_invoker()?);
//!
//! let messages = transport.messages();
//! let relay = Arc::new(Relay::new(transport, invoker, config));
//! relay.run(messages).await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod invoker;
pub mod message;
pub mod relay;
pub mod transport;

pub use config::{RelayConfig, DEFAULT_ENGINE_TIMEOUT, FAILURE_TEXT, TIMEOUT_TEXT};
pub use error::{InvokeError, RelayError};
pub use invoker::{CommandInvoker, EngineInvoker};
pub use message::{ChatMessage, DispatchId};
pub use relay::{Outcome, Relay};
pub use transport::{ChatTransport, DiscordTransport};
