//! Chat domain types.
//!
//! A conversation is an ordered, append-only list of messages. Messages are
//! never edited in place: the list only grows, or is replaced wholesale when
//! a new chat starts or history is reloaded.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use super::VoiceSelector;

/// The role of a message sender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

impl MessageRole {
    /// Parse a role from a string.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "user" => Some(Self::User),
            "assistant" => Some(Self::Assistant),
            _ => None,
        }
    }

    /// Convert role to string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

impl std::fmt::Display for MessageRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single chat message, as received from the backend.
///
/// `content` is the raw, unformatted model text; rendering happens at display
/// time via [`crate::render::render`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
    /// ISO-8601 timestamp, when the backend supplied one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

impl Message {
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
            timestamp: None,
        }
    }

    #[must_use]
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
            timestamp: None,
        }
    }

    #[must_use]
    pub fn with_timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.timestamp = Some(timestamp.into());
        self
    }

    /// Timestamp as local `HH:MM`, or `None` if absent or unparseable.
    #[must_use]
    pub fn display_time(&self) -> Option<String> {
        let raw = self.timestamp.as_deref()?;
        let parsed = DateTime::parse_from_rfc3339(raw).ok()?;
        Some(parsed.with_timezone(&Local).format("%H:%M").to_string())
    }

    /// Whether the UI should offer a speak trigger for this message.
    #[must_use]
    pub const fn is_speakable(&self, selector: &VoiceSelector) -> bool {
        matches!(self.role, MessageRole::Assistant) && !selector.is_disabled()
    }
}

/// Ordered message history for one chat session.
///
/// Insertion order is display order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Conversation {
    messages: Vec<Message>,
}

impl Conversation {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            messages: Vec::new(),
        }
    }

    /// Append a message to the end of the conversation.
    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Replace the whole history (e.g. after reloading a stored session).
    pub fn replace_all(&mut self, messages: impl IntoIterator<Item = Message>) {
        self.messages = messages.into_iter().collect();
    }

    /// Start over with an empty history.
    pub fn clear(&mut self) {
        self.messages.clear();
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Message> {
        self.messages.iter()
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.messages.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    #[must_use]
    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }
}

impl<'a> IntoIterator for &'a Conversation {
    type Item = &'a Message;
    type IntoIter = std::slice::Iter<'a, Message>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl FromIterator<Message> for Conversation {
    fn from_iter<I: IntoIterator<Item = Message>>(iter: I) -> Self {
        Self {
            messages: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_round_trips_through_str() {
        for role in [MessageRole::User, MessageRole::Assistant] {
            assert_eq!(MessageRole::parse(role.as_str()), Some(role));
        }
        assert_eq!(MessageRole::parse("system"), None);
    }

    #[test]
    fn message_serializes_with_lowercase_role() {
        let json = serde_json::to_value(Message::assistant("hi")).unwrap();
        assert_eq!(json["role"], "assistant");
        assert!(json.get("timestamp").is_none());
    }

    #[test]
    fn message_deserializes_without_timestamp() {
        let msg: Message = serde_json::from_str(r#"{"role":"user","content":"hello"}"#).unwrap();
        assert_eq!(msg, Message::user("hello"));
    }

    #[test]
    fn display_time_formats_hours_and_minutes() {
        let msg = Message::user("x").with_timestamp("2024-05-01T10:42:00Z");
        let shown = msg.display_time().unwrap();
        assert_eq!(shown.len(), 5);
        assert_eq!(&shown[2..3], ":");
        assert!(shown.chars().filter(char::is_ascii_digit).count() == 4);
    }

    #[test]
    fn display_time_ignores_garbage() {
        assert_eq!(Message::user("x").display_time(), None);
        assert_eq!(
            Message::user("x").with_timestamp("yesterday").display_time(),
            None
        );
    }

    #[test]
    fn only_assistant_messages_are_speakable() {
        let voice: VoiceSelector = "playai-tts|Fritz-PlayAI".parse().unwrap();
        assert!(Message::assistant("a").is_speakable(&voice));
        assert!(!Message::user("u").is_speakable(&voice));
        assert!(!Message::assistant("a").is_speakable(&VoiceSelector::Disabled));
    }

    #[test]
    fn conversation_keeps_insertion_order() {
        let mut conv = Conversation::new();
        conv.push(Message::user("one"));
        conv.push(Message::assistant("two"));
        conv.push(Message::user("three"));

        let contents: Vec<_> = conv.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, ["one", "two", "three"]);
        assert_eq!(conv.last().map(|m| m.role), Some(MessageRole::User));
    }

    #[test]
    fn conversation_replace_and_clear() {
        let mut conv: Conversation = [Message::user("old")].into_iter().collect();
        conv.replace_all([Message::user("a"), Message::assistant("b")]);
        assert_eq!(conv.len(), 2);
        assert_eq!(conv.iter().next().unwrap().content, "a");

        conv.clear();
        assert!(conv.is_empty());
    }

    #[test]
    fn conversation_serializes_as_plain_array() {
        let conv: Conversation = [Message::user("a")].into_iter().collect();
        let json = serde_json::to_value(&conv).unwrap();
        assert!(json.is_array());
    }
}
