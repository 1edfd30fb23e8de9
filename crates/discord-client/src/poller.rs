//! Polling stream of new channel messages.

use std::collections::HashMap;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;

use futures::stream::Stream;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::client::DiscordClient;
use crate::error::DiscordError;
use crate::types::Message;

const FETCH_LIMIT: u8 = 50;

/// Retry policy for failed polls.
#[derive(Debug, Clone)]
pub struct ReconnectConfig {
    /// Maximum consecutive failures (None = infinite).
    pub max_retries: Option<u32>,
    /// Initial delay before first retry.
    pub initial_delay: Duration,
    /// Maximum delay between retries.
    pub max_delay: Duration,
    /// Backoff multiplier for each retry.
    pub backoff_multiplier: f64,
}

impl Default for ReconnectConfig {
    fn default() -> Self {
        Self {
            max_retries: None,
            initial_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(30),
            backoff_multiplier: 2.0,
        }
    }
}

impl ReconnectConfig {
    /// Calculate delay for a given attempt number.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let delay_ms = self.initial_delay.as_millis() as f64
            * self.backoff_multiplier.powi(attempt as i32);
        let delay = Duration::from_millis(delay_ms as u64);
        delay.min(self.max_delay)
    }

    /// Check if we should retry after the given number of attempts.
    pub fn should_retry(&self, attempts: u32) -> bool {
        self.max_retries.map_or(true, |max| attempts < max)
    }
}

/// A stream of messages posted to the configured channels after it started.
///
/// Dropping the stream stops the background poller.
pub struct MessageStream {
    receiver: mpsc::Receiver<Result<Message, DiscordError>>,
    task: JoinHandle<()>,
}

impl MessageStream {
    fn start(client: DiscordClient, reconnect: ReconnectConfig) -> Self {
        let (sender, receiver) = mpsc::channel(64);
        let task = tokio::spawn(poll_channels(client, reconnect, sender));
        Self { receiver, task }
    }
}

impl Stream for MessageStream {
    type Item = Result<Message, DiscordError>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.receiver.poll_recv(cx)
    }
}

impl Drop for MessageStream {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Subscribe to new messages in the client's configured channels.
pub fn subscribe(client: &DiscordClient) -> MessageStream {
    subscribe_with_reconnect(client, ReconnectConfig::default())
}

/// Subscribe with a custom retry policy.
pub fn subscribe_with_reconnect(
    client: &DiscordClient,
    reconnect_config: ReconnectConfig,
) -> MessageStream {
    MessageStream::start(client.clone(), reconnect_config)
}

async fn poll_channels(
    client: DiscordClient,
    reconnect: ReconnectConfig,
    sender: mpsc::Sender<Result<Message, DiscordError>>,
) {
    let channels = client.config().channel_ids.clone();
    let interval = client.config().poll_interval;
    info!("Polling {} channel(s) every {:?}", channels.len(), interval);

    // Cursor per channel: the newest message already seen. None until the
    // channel's current tail is known, so history is never replayed.
    let mut cursors: HashMap<String, Option<String>> = HashMap::new();
    let mut failures = 0u32;

    loop {
        let mut failed = None;

        for channel in &channels {
            match poll_once(&client, channel, &mut cursors).await {
                Ok(messages) => {
                    for message in messages {
                        if sender.send(Ok(message)).await.is_err() {
                            debug!("Message stream dropped, stopping poller");
                            return;
                        }
                    }
                }
                Err(e) => {
                    failed = Some(e);
                    break;
                }
            }
        }

        let delay = match failed {
            None => {
                if failures > 0 {
                    info!("Discord polling restored");
                }
                failures = 0;
                interval
            }
            Some(e) => {
                failures += 1;
                if !reconnect.should_retry(failures) {
                    error!("Giving up polling after {} failures: {}", failures, e);
                    let _ = sender.send(Err(e)).await;
                    return;
                }
                let delay = reconnect.delay_for_attempt(failures - 1);
                warn!(
                    "Poll failed: {} (failures: {}, retrying in {:?})",
                    e, failures, delay
                );
                delay
            }
        };

        tokio::time::sleep(delay).await;
    }
}

async fn poll_once(
    client: &DiscordClient,
    channel: &str,
    cursors: &mut HashMap<String, Option<String>>,
) -> Result<Vec<Message>, DiscordError> {
    let Some(cursor) = cursors.get(channel) else {
        // First poll: remember the current tail without emitting it.
        let latest = client.fetch_messages(channel, None, 1).await?;
        let tail = latest.last().map(|m| m.id.clone());
        debug!("Channel {} starts after {:?}", channel, tail);
        cursors.insert(channel.to_string(), tail);
        return Ok(Vec::new());
    };

    let messages = client
        .fetch_messages(channel, cursor.as_deref(), FETCH_LIMIT)
        .await?;
    if let Some(newest) = messages.last() {
        cursors.insert(channel.to_string(), Some(newest.id.clone()));
    }
    Ok(messages)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delay_for_attempt() {
        let config = ReconnectConfig::default();
        assert_eq!(config.delay_for_attempt(0), Duration::from_millis(500));
        assert_eq!(config.delay_for_attempt(1), Duration::from_millis(1000));
        assert_eq!(config.delay_for_attempt(10), Duration::from_secs(30));
    }

    #[test]
    fn test_should_retry() {
        let config = ReconnectConfig {
            max_retries: Some(3),
            ..Default::default()
        };
        assert!(config.should_retry(2));
        assert!(!config.should_retry(3));
        assert!(ReconnectConfig::default().should_retry(1000));
    }
}
