//! # Messages and the Transcript
//!
//! A [`Message`] is immutable once it is in the [`Transcript`]. The
//! transcript itself only grows, or is cleared/replaced as a whole when the
//! view switches sessions. Nothing edits an entry in place.

use chrono::{DateTime, Local};

/// Fixed id of the message shown when a send fails.
pub const CONNECTION_ERROR_ID: &str = "error";
/// Fixed content of the message shown when a send fails.
pub const CONNECTION_ERROR_TEXT: &str = "Error connecting to server. Is the backend running?";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    /// Map a backend role string. Roles the view cannot show (e.g. `system`)
    /// return `None`.
    pub fn from_wire(role: &str) -> Option<Role> {
        match role.trim().to_ascii_lowercase().as_str() {
            "user" => Some(Role::User),
            "assistant" => Some(Role::Assistant),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Role::User => "You",
            Role::Assistant => "Aurora",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub id: String,
    pub content: String,
    pub role: Role,
    pub timestamp: DateTime<Local>,
}

impl Message {
    fn new(id: String, role: Role, content: String) -> Self {
        Self {
            id,
            content,
            role,
            timestamp: Local::now(),
        }
    }

    /// A message typed by the user, with a fresh unique id.
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(uuid::Uuid::new_v4().to_string(), Role::User, content.into())
    }

    /// A reply from the backend, with a fresh unique id.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(
            uuid::Uuid::new_v4().to_string(),
            Role::Assistant,
            content.into(),
        )
    }

    /// A message restored from persisted history; its id is its position
    /// in the fetched sequence.
    pub fn from_history(index: usize, role: Role, content: impl Into<String>) -> Self {
        Self::new(index.to_string(), role, content.into())
    }

    pub fn connection_error() -> Self {
        Self::new(
            CONNECTION_ERROR_ID.to_string(),
            Role::Assistant,
            CONNECTION_ERROR_TEXT.to_string(),
        )
    }

    pub fn is_error(&self) -> bool {
        self.id == CONNECTION_ERROR_ID && self.role == Role::Assistant
    }
}

/// Ordered, append-only message log of the current view.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Transcript {
    messages: Vec<Message>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: Message) -> &Message {
        self.messages.push(message);
        &self.messages[self.messages.len() - 1]
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }

    /// Replace the whole log (session switch).
    pub fn replace(&mut self, messages: Vec<Message>) {
        self.messages = messages;
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Message> {
        self.messages.iter()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Id of the first entry; together with `len` this identifies which
    /// log a layout cache was computed for.
    pub fn first_id(&self) -> Option<&str> {
        self.messages.first().map(|m| m.id.as_str())
    }
}
