//! Session state types

/// Opening message of a fresh session
pub const GREETING: &str =
    "Hai! Saya **JOMRUMAHBOT** 🤖\n\nSila tanya tentang daerah pilihan anda untuk analisis NAPIC 2024.";

/// Opening message after the user resets the chat
pub const RESET_GREETING: &str = "Sembang baru dimulakan.";

/// Shown in place of a reply whenever the reasoning call fails
pub const FALLBACK_TEXT: &str = "Ralat teknikal dikesan. Sila muat semula halaman.";

/// One submit → gateway call → append cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Turn {
    /// 1-based, monotonically increasing within a session
    pub id: u64,
    /// Session generation the turn was issued in
    pub generation: u64,
}

/// Whether a gateway call is outstanding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// Ready for user input, no call in flight
    #[default]
    Idle,

    /// Exactly one gateway call in flight
    AwaitingResponse { turn: Turn },
}

/// Session state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SessionState {
    pub phase: Phase,
    /// Bumped by every reset
    pub generation: u64,
    /// Number of turns ever accepted
    pub turns_started: u64,
}

impl SessionState {
    pub fn is_busy(&self) -> bool {
        matches!(self.phase, Phase::AwaitingResponse { .. })
    }
}

/// What to do with a reply whose turn predates the latest reset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StaleReplyPolicy {
    /// Append it to the current log anyway
    #[default]
    Append,
    /// Drop it; the session still returns to idle
    Discard,
}

/// Context for a session (immutable configuration)
#[derive(Debug, Clone)]
pub struct SessionContext {
    pub session_id: String,
    pub greeting: String,
    pub reset_greeting: String,
    pub fallback_text: String,
    pub stale_reply_policy: StaleReplyPolicy,
}

impl SessionContext {
    pub fn new(stale_reply_policy: StaleReplyPolicy) -> Self {
        Self {
            session_id: uuid::Uuid::new_v4().to_string(),
            greeting: GREETING.to_string(),
            reset_greeting: RESET_GREETING.to_string(),
            fallback_text: FALLBACK_TEXT.to_string(),
            stale_reply_policy,
        }
    }
}
