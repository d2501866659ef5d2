//! Effects produced by state transitions

use crate::session::message::Role;
use crate::session::state::Turn;

/// Effects to be executed after state transition
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Append a message to the log
    AppendMessage { role: Role, content: String },

    /// Replace the log with a single assistant greeting
    RestartLog { greeting: String },

    /// Overwrite the pending input
    SetDraft { text: String },

    /// Start the reasoning call for a turn (spawns as background task)
    AskGateway { turn: Turn, prompt: String },

    /// A reply arrived for a turn from before the last reset and was dropped
    DropStaleReply { turn: Turn },
}

impl Effect {
    pub fn append_user(content: impl Into<String>) -> Self {
        Effect::AppendMessage {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn append_assistant(content: impl Into<String>) -> Self {
        Effect::AppendMessage {
            role: Role::Assistant,
            content: content.into(),
        }
    }

    pub fn clear_draft() -> Self {
        Effect::SetDraft {
            text: String::new(),
        }
    }
}
