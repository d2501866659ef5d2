//! Events that can occur in a session

use crate::llm::GatewayError;
use crate::session::state::Turn;

/// Events that trigger state transitions
#[derive(Debug, Clone)]
pub enum Event {
    // User events
    Submit { text: String },
    UpdateDraft { text: String },
    Reset,

    // Gateway events
    GatewayReply(Reply),
}

/// Outcome of one gateway call, tagged with the turn that issued it
#[derive(Debug, Clone)]
pub struct Reply {
    pub turn: Turn,
    pub outcome: Result<String, GatewayError>,
}
