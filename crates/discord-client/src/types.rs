//! Discord REST payloads.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// Maximum characters in one Discord message.
pub const MAX_MESSAGE_LEN: usize = 2000;

/// A Discord user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub username: String,
    /// Display name, when the user has set one.
    #[serde(default)]
    pub global_name: Option<String>,
    #[serde(default)]
    pub bot: bool,
}

impl User {
    /// Display name if set, otherwise the username.
    pub fn display_name(&self) -> &str {
        self.global_name.as_deref().unwrap_or(&self.username)
    }
}

/// A message posted in a channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Snowflake ID; increases with creation time.
    pub id: String,
    pub channel_id: String,
    pub author: User,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub timestamp: String,
}

/// Body of `POST /channels/{id}/messages`.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct CreateMessage<'a> {
    pub content: &'a str,
}

/// Error body returned by the API.
#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorBody {
    #[serde(default)]
    pub message: String,
}

/// Compare two snowflake IDs by creation order.
pub fn snowflake_cmp(a: &str, b: &str) -> Ordering {
    match (a.parse::<u64>(), b.parse::<u64>()) {
        (Ok(a), Ok(b)) => a.cmp(&b),
        _ => a.len().cmp(&b.len()).then_with(|| a.cmp(b)),
    }
}

/// Split text into chunks Discord accepts, preferring line breaks.
///
/// Empty text yields one empty chunk.
pub fn split_message(text: &str, max_len: usize) -> Vec<String> {
    let max_len = max_len.max(1);
    let mut chunks = Vec::new();
    let mut rest = text;

    while rest.chars().count() > max_len {
        let hard_end = rest
            .char_indices()
            .nth(max_len)
            .map(|(i, _)| i)
            .unwrap_or(rest.len());
        let window = &rest[..hard_end];
        let cut = match window.rfind('\n') {
            Some(i) if i > 0 => i,
            _ => hard_end,
        };
        chunks.push(rest[..cut].to_string());
        rest = rest[cut..].strip_prefix('\n').unwrap_or(&rest[cut..]);
    }

    chunks.push(rest.to_string());
    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_parses() {
        let raw = r#"{
            "id": "1290000000000000001",
            "channel_id": "42",
            "author": {"id": "7", "username": "kira", "global_name": null, "bot": false},
            "content": "What's on today?",
            "timestamp": "2026-10-17T01:02:03.000000+00:00",
            "embeds": []
        }"#;
        let message: Message = serde_json::from_str(raw).unwrap();
        assert_eq!(message.author.display_name(), "kira");
        assert_eq!(message.content, "What's on today?");
        assert!(!message.author.bot);
    }

    #[test]
    fn test_snowflake_order() {
        assert_eq!(snowflake_cmp("9", "10"), Ordering::Less);
        assert_eq!(
            snowflake_cmp("1290000000000000002", "1290000000000000001"),
            Ordering::Greater
        );
    }

    #[test]
    fn test_split_short_message() {
        assert_eq!(split_message("hello", 2000), vec!["hello"]);
        assert_eq!(split_message("", 2000), vec![""]);
    }

    #[test]
    fn test_split_prefers_newlines() {
        let text = "aaaa\nbbbb\ncc";
        assert_eq!(split_message(text, 10), vec!["aaaa\nbbbb", "cc"]);
    }

    #[test]
    fn test_split_hard_and_multibyte() {
        let text = "あいうえおかきくけこ";
        let chunks = split_message(text, 4);
        assert_eq!(chunks, vec!["あいうえ", "おかきく", "けこ"]);
        assert!(chunks.iter().all(|c| c.chars().count() <= 4));
    }
}
