//! Pure state transition function

use super::{Effect, Event, Phase, SessionContext, SessionState, StaleReplyPolicy};
use thiserror::Error;

/// Result of a state transition
#[derive(Debug)]
pub struct TransitionResult {
    pub new_state: SessionState,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(state: SessionState) -> Self {
        Self {
            new_state: state,
            effects: vec![],
        }
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }
}

/// Errors that can occur during transition
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("Nothing to send")]
    EmptyInput,
    #[error("Assistant is busy, cannot accept message")]
    Busy,
    #[error("Invalid transition: {0}")]
    InvalidTransition(String),
}

/// Pure transition function
///
/// Given the same inputs it always produces the same outputs, with no I/O.
/// Every rule about when a turn may start or end lives here.
pub fn transition(
    state: &SessionState,
    context: &SessionContext,
    event: Event,
) -> Result<TransitionResult, TransitionError> {
    match (state.phase, event) {
        // Draft edits are always allowed and touch nothing else
        (_, Event::UpdateDraft { text }) => {
            Ok(TransitionResult::new(*state).with_effect(Effect::SetDraft { text }))
        }

        (_, Event::Submit { text }) if text.trim().is_empty() => Err(TransitionError::EmptyInput),

        // Idle + Submit -> AwaitingResponse
        (Phase::Idle, Event::Submit { text }) => {
            let turn = super::Turn {
                id: state.turns_started + 1,
                generation: state.generation,
            };
            Ok(TransitionResult::new(SessionState {
                phase: Phase::AwaitingResponse { turn },
                turns_started: turn.id,
                ..*state
            })
            .with_effect(Effect::clear_draft())
            .with_effect(Effect::append_user(text.clone()))
            .with_effect(Effect::AskGateway { turn, prompt: text }))
        }

        // Busy + Submit -> dropped, never queued
        (Phase::AwaitingResponse { .. }, Event::Submit { .. }) => Err(TransitionError::Busy),

        // Reset never cancels the call in flight
        (_, Event::Reset) => Ok(TransitionResult::new(SessionState {
            generation: state.generation + 1,
            ..*state
        })
        .with_effect(Effect::RestartLog {
            greeting: context.reset_greeting.clone(),
        })),

        // AwaitingResponse + GatewayReply -> Idle, exactly one assistant message
        (Phase::AwaitingResponse { turn }, Event::GatewayReply(reply)) if reply.turn == turn => {
            let idle = SessionState {
                phase: Phase::Idle,
                ..*state
            };

            let stale = turn.generation != state.generation;
            if stale && context.stale_reply_policy == StaleReplyPolicy::Discard {
                return Ok(TransitionResult::new(idle).with_effect(Effect::DropStaleReply { turn }));
            }

            // Every failure kind looks the same to the user
            let content = reply
                .outcome
                .unwrap_or_else(|_| context.fallback_text.clone());
            Ok(TransitionResult::new(idle).with_effect(Effect::append_assistant(content)))
        }

        (phase, Event::GatewayReply(reply)) => Err(TransitionError::InvalidTransition(format!(
            "Reply for turn {} with no matching call in flight ({phase:?})",
            reply.turn.id
        ))),
    }
}
