//! Inbound chat messages and dispatch identifiers.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// A chat message as seen by the relay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub id: String,
    pub channel_id: String,
    pub author_id: String,
    pub author_name: String,
    pub author_is_bot: bool,
    pub content: String,
}

impl From<discord_client::Message> for ChatMessage {
    fn from(message: discord_client::Message) -> Self {
        Self {
            author_name: message.author.display_name().to_string(),
            id: message.id,
            channel_id: message.channel_id,
            author_id: message.author.id,
            author_is_bot: message.author.bot,
            content: message.content,
        }
    }
}

/// Identifies one engine invocation; outcomes report which dispatch they settle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DispatchId(u64);

impl DispatchId {
    /// Allocate the next process-unique dispatch ID.
    pub fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    pub fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for DispatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "dispatch-{}", self.0)
    }
}
