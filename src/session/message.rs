//! Chat messages and the append-only log that holds them

use chrono::{DateTime, Utc};

/// Who wrote a message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

/// A single chat bubble. Immutable once created.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    role: Role,
    content: String,
    created_at: DateTime<Utc>,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            created_at: Utc::now(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    pub fn role(&self) -> Role {
        self.role
    }

    /// Raw text, possibly carrying markdown emphasis
    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Ordered message log.
///
/// Never empty. Messages are only ever appended; `restart` swaps the whole
/// log for a fresh one-message log and is the only way anything leaves it.
#[derive(Debug, Clone)]
pub struct Transcript {
    messages: Vec<Message>,
}

impl Transcript {
    pub fn new(greeting: Message) -> Self {
        Self {
            messages: vec![greeting],
        }
    }

    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn restart(&mut self, greeting: Message) {
        self.messages = vec![greeting];
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Newest message. The log is never empty.
    pub fn last(&self) -> &Message {
        let newest = self.messages.len() - 1;
        &self.messages[newest]
    }
}
