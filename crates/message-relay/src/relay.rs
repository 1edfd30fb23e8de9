//! The relay state machine: one inbound message, one engine dispatch, one reply.

use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::{FutureExt, Stream, StreamExt};
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tokio::task::JoinSet;
use tokio::time::timeout;
use tracing::{debug, error, info, warn};

use crate::config::{RelayConfig, FAILURE_TEXT, TIMEOUT_TEXT};
use crate::error::{InvokeError, RelayError};
use crate::invoker::EngineInvoker;
use crate::message::{ChatMessage, DispatchId};
use crate::transport::ChatTransport;

/// How a message was settled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Discarded before dispatch; nothing was sent.
    Skipped { reason: &'static str },
    /// The engine replied and its trimmed output was sent.
    Completed { dispatch: DispatchId, reply: String },
    /// The engine was abandoned and the timeout notice was sent.
    TimedOut { dispatch: DispatchId },
    /// The engine failed and the opaque failure notice was sent.
    Failed { dispatch: DispatchId },
}

impl Outcome {
    /// The dispatch this outcome settles, if one was started.
    pub fn dispatch(&self) -> Option<DispatchId> {
        match self {
            Outcome::Skipped { .. } => None,
            Outcome::Completed { dispatch, .. }
            | Outcome::TimedOut { dispatch }
            | Outcome::Failed { dispatch } => Some(*dispatch),
        }
    }
}

/// Bridges inbound chat messages to engine invocations and back.
pub struct Relay<T, I> {
    transport: Arc<T>,
    invoker: Arc<I>,
    config: RelayConfig,
}

impl<T, I> Relay<T, I>
where
    T: ChatTransport + 'static,
    I: EngineInvoker + 'static,
{
    pub fn new(transport: Arc<T>, invoker: Arc<I>, config: RelayConfig) -> Self {
        Self {
            transport,
            invoker,
            config,
        }
    }

    pub fn config(&self) -> &RelayConfig {
        &self.config
    }

    fn should_process(&self, message: &ChatMessage) -> Result<(), &'static str> {
        if message.author_id == self.transport.self_id() {
            return Err("message from self");
        }
        if message.author_is_bot && self.config.ignore_bots {
            return Err("message from bot");
        }
        Ok(())
    }

    /// Relay one message and report how it was settled.
    ///
    /// Never fails: engine errors become fixed notices in the channel and
    /// their detail goes to the log only.
    pub async fn handle_message(&self, message: &ChatMessage) -> Outcome {
        if let Err(reason) = self.should_process(message) {
            debug!("Skipping message {}: {}", message.id, reason);
            return Outcome::Skipped { reason };
        }

        info!("[{}] {}", message.author_name, message.content);

        let dispatch = DispatchId::next();
        debug!("{} started for message {}", dispatch, message.id);

        // Dropping the invocation on timeout kills the engine, so a late
        // reply can never reach the channel.
        let invocation = AssertUnwindSafe(self.invoker.invoke(&message.content)).catch_unwind();
        let result = match timeout(self.config.engine_timeout, invocation).await {
            Ok(Ok(result)) => result,
            Ok(Err(_panic)) => Err(InvokeError::Io(std::io::Error::other("engine invoker panicked"))),
            Err(_elapsed) => Err(InvokeError::Timeout(self.config.engine_timeout)),
        };

        let (outcome, text) = match result {
            Ok(stdout) => {
                let reply = stdout.trim().to_string();
                info!("{} completed ({} chars)", dispatch, reply.chars().count());
                (
                    Outcome::Completed {
                        dispatch,
                        reply: reply.clone(),
                    },
                    reply,
                )
            }
            Err(InvokeError::Timeout(limit)) => {
                warn!("{} timed out after {:?}", dispatch, limit);
                (Outcome::TimedOut { dispatch }, TIMEOUT_TEXT.to_string())
            }
            Err(e) => {
                error!("{} failed for message {}: {}", dispatch, message.id, e);
                (Outcome::Failed { dispatch }, FAILURE_TEXT.to_string())
            }
        };

        if let Err(e) = self.transport.send(&message.channel_id, &text).await {
            error!(
                "Failed to deliver {} reply to channel {}: {}",
                dispatch, message.channel_id, e
            );
        }

        outcome
    }

    /// Relay messages until the stream ends.
    pub async fn run<S>(self: Arc<Self>, messages: S) -> Result<(), RelayError>
    where
        S: Stream<Item = Result<ChatMessage, RelayError>> + Send + Unpin,
    {
        self.run_with_shutdown(messages, std::future::pending()).await
    }

    /// Relay messages until the stream ends or the shutdown future completes.
    ///
    /// Each message is handled on its own task, at most `max_concurrent` at
    /// once. In-flight dispatches are allowed to settle before returning.
    pub async fn run_with_shutdown<S, F>(
        self: Arc<Self>,
        mut messages: S,
        shutdown_signal: F,
    ) -> Result<(), RelayError>
    where
        S: Stream<Item = Result<ChatMessage, RelayError>> + Send + Unpin,
        F: Future<Output = ()> + Send,
    {
        info!(
            "Starting relay (timeout: {:?}, max concurrent: {}, toolset: {})",
            self.config.engine_timeout, self.config.max_concurrent, self.config.functions
        );

        let permits = Arc::new(Semaphore::new(self.config.max_concurrent.max(1)));
        let mut slot: Option<OwnedSemaphorePermit> = None;
        let mut tasks = JoinSet::new();
        tokio::pin!(shutdown_signal);

        // A message is read only once a slot is held, so a full relay leaves
        // messages queued in the stream while shutdown stays observable.
        let result = loop {
            tokio::select! {
                biased;

                () = &mut shutdown_signal => {
                    info!("Shutdown signal received, stopping relay");
                    break Ok(());
                }

                Some(joined) = tasks.join_next(), if !tasks.is_empty() => {
                    log_join(joined);
                }

                acquired = Arc::clone(&permits).acquire_owned(), if slot.is_none() => {
                    match acquired {
                        Ok(permit) => slot = Some(permit),
                        Err(_) => break Ok(()),
                    }
                }

                next = messages.next(), if slot.is_some() => {
                    match next {
                        Some(Ok(message)) => {
                            if let Some(permit) = slot.take() {
                                let relay = Arc::clone(&self);
                                tasks.spawn(async move {
                                    let _permit = permit;
                                    relay.handle_message(&message).await
                                });
                            }
                        }
                        Some(Err(e)) => {
                            // Polling retries on its own; keep going.
                            error!("Stream error: {}", e);
                        }
                        None => {
                            warn!("Message stream ended");
                            break Err(RelayError::StreamEnded);
                        }
                    }
                }
            }
        };

        drop(slot);
        while let Some(joined) = tasks.join_next().await {
            log_join(joined);
        }

        result
    }
}

fn log_join(joined: Result<Outcome, tokio::task::JoinError>) {
    match joined {
        Ok(outcome) => debug!("Settled: {:?}", outcome),
        Err(e) => error!("Relay task failed: {}", e),
    }
}
