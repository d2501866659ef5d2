//! Chat session state machine
//!
//! Implements the Elm Architecture pattern with pure state transitions. The
//! controller owns the state and executes the effects.

mod effect;
pub mod event;
mod message;
pub mod state;
pub(crate) mod transition;


pub use effect::Effect;
pub use event::{Event, Reply};
pub use message::{Message, Role, Transcript};
pub use state::{Phase, SessionContext, SessionState, StaleReplyPolicy, Turn};
pub use transition::{transition, TransitionError};
