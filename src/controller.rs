//! Session controller
//!
//! Owns one chat session: the log, the draft, and the state machine. All
//! mutation goes through `&mut self`, so whoever holds the controller is the
//! single writer. Gateway calls run on spawned tasks and come back as
//! `Reply` values through an internal channel.

pub mod traits;

#[cfg(test)]
pub mod testing;

pub use traits::*;

use crate::llm::GatewayError;
use crate::session::{
    transition, Effect, Event, Message, Phase, Reply, SessionContext, SessionState,
    TransitionError, Transcript, Turn,
};
use std::sync::Arc;
use tokio::sync::mpsc;

/// What a dispatched event set in motion
#[derive(Debug, Default)]
struct Applied {
    started: Option<Turn>,
    dropped_stale: bool,
}

pub struct SessionController<G>
where
    G: ReasoningGateway + 'static,
{
    context: SessionContext,
    state: SessionState,
    transcript: Transcript,
    draft: String,
    gateway: Arc<G>,
    reply_tx: mpsc::Sender<Reply>,
    reply_rx: mpsc::Receiver<Reply>,
}

impl<G> SessionController<G>
where
    G: ReasoningGateway + 'static,
{
    pub fn new(context: SessionContext, gateway: G) -> Self {
        let (reply_tx, reply_rx) = mpsc::channel(4);
        let transcript = Transcript::new(Message::assistant(context.greeting.clone()));
        tracing::info!(session_id = %context.session_id, "Session started");

        Self {
            context,
            state: SessionState::default(),
            transcript,
            draft: String::new(),
            gateway: Arc::new(gateway),
            reply_tx,
            reply_rx,
        }
    }

    // ------------------------------------------------------------------
    // Read surface
    // ------------------------------------------------------------------

    pub fn log(&self) -> &[Message] {
        self.transcript.messages()
    }

    pub fn pending_input(&self) -> &str {
        &self.draft
    }

    pub fn is_busy(&self) -> bool {
        self.state.is_busy()
    }

    // ------------------------------------------------------------------
    // Mutation surface
    // ------------------------------------------------------------------

    /// Start a turn with `text` and return it.
    ///
    /// Blank text, or any submit while a call is in flight, is dropped and
    /// reported as `Err`; nothing changes in that case.
    pub fn submit(&mut self, text: impl Into<String>) -> Result<Turn, TransitionError> {
        let result = self.dispatch(Event::Submit { text: text.into() }).and_then(|applied| {
            applied.started.ok_or_else(|| {
                TransitionError::InvalidTransition("Accepted submit started no turn".to_string())
            })
        });
        if let Err(e) = &result {
            tracing::debug!(session_id = %self.context.session_id, reason = %e, "Submit dropped");
        }
        result
    }

    /// Submit whatever is in the draft
    pub fn submit_draft(&mut self) -> Result<Turn, TransitionError> {
        let text = self.draft.clone();
        self.submit(text)
    }

    pub fn update_draft(&mut self, text: impl Into<String>) {
        self.dispatch_infallible(Event::UpdateDraft { text: text.into() });
    }

    pub fn reset_session(&mut self) {
        self.dispatch_infallible(Event::Reset);
    }

    // ------------------------------------------------------------------
    // Reply plumbing
    // ------------------------------------------------------------------

    /// Wait for the outstanding call to resolve.
    ///
    /// Cancel-safe. Pends forever while idle, which makes it usable as a
    /// `select!` branch.
    pub async fn next_reply(&mut self) -> Option<Reply> {
        self.reply_rx.recv().await
    }

    /// Fold a resolved call into the session
    pub fn apply_reply(&mut self, reply: Reply) {
        let turn = reply.turn;
        let outcome = match &reply.outcome {
            Ok(text) => Ok(text.chars().count()),
            Err(e) => Err((e.kind, e.to_string())),
        };

        let applied = match self.dispatch(Event::GatewayReply(reply)) {
            Ok(applied) => applied,
            Err(e) => {
                tracing::error!(session_id = %self.context.session_id, error = %e, "Reply not applied");
                return;
            }
        };
        // DropStaleReply already logged the discard
        if applied.dropped_stale {
            return;
        }

        match outcome {
            Ok(chars) => tracing::info!(
                session_id = %self.context.session_id,
                turn = turn.id,
                chars,
                "Assistant replied"
            ),
            Err((kind, error)) => tracing::warn!(
                session_id = %self.context.session_id,
                turn = turn.id,
                kind = ?kind,
                error = %error,
                "Reasoning call failed, showing fallback"
            ),
        }
    }

    /// Drive the session until no call is in flight
    pub async fn settle(&mut self) {
        while self.is_busy() {
            match self.next_reply().await {
                Some(reply) => self.apply_reply(reply),
                None => break,
            }
        }
    }

    fn dispatch(&mut self, event: Event) -> Result<Applied, TransitionError> {
        // Pure state transition
        let result = transition(&self.state, &self.context, event)?;
        self.state = result.new_state;

        let mut applied = Applied::default();
        for effect in result.effects {
            match &effect {
                Effect::AskGateway { turn, .. } => applied.started = Some(*turn),
                Effect::DropStaleReply { .. } => applied.dropped_stale = true,
                _ => {}
            }
            self.execute_effect(effect);
        }
        Ok(applied)
    }

    /// For events every phase accepts
    fn dispatch_infallible(&mut self, event: Event) {
        let result = self.dispatch(event);
        debug_assert!(result.is_ok(), "event rejected: {result:?}");
        if let Err(e) = result {
            tracing::error!(session_id = %self.context.session_id, error = %e, "Event rejected");
        }
    }

    fn execute_effect(&mut self, effect: Effect) {
        match effect {
            Effect::AppendMessage { role, content } => {
                self.transcript.push(Message::new(role, content));
                tracing::debug!(
                    session_id = %self.context.session_id,
                    role = ?self.transcript.last().role(),
                    messages = self.transcript.messages().len(),
                    "Message appended"
                );
            }

            Effect::RestartLog { greeting } => {
                tracing::info!(
                    session_id = %self.context.session_id,
                    generation = self.state.generation,
                    busy = self.is_busy(),
                    "Session reset"
                );
                self.transcript.restart(Message::assistant(greeting));
            }

            Effect::SetDraft { text } => {
                self.draft = text;
            }

            Effect::AskGateway { turn, prompt } => self.spawn_gateway_call(turn, prompt),

            Effect::DropStaleReply { turn } => {
                tracing::info!(
                    session_id = %self.context.session_id,
                    turn = turn.id,
                    turn_generation = turn.generation,
                    generation = self.state.generation,
                    "Discarding reply from before reset"
                );
            }
        }
    }

    fn spawn_gateway_call(&self, turn: Turn, prompt: String) {
        debug_assert!(matches!(self.state.phase, Phase::AwaitingResponse { .. }));
        tracing::info!(
            session_id = %self.context.session_id,
            turn = turn.id,
            generation = turn.generation,
            chars = prompt.chars().count(),
            "Asking reasoning gateway (background)"
        );

        let gateway = Arc::clone(&self.gateway);
        let reply_tx = self.reply_tx.clone();

        tokio::spawn(async move {
            // Run the call on its own task so a panic inside the gateway
            // still resolves the turn
            let call = tokio::spawn(async move { gateway.ask(&prompt).await });
            let outcome = match call.await {
                Ok(outcome) => outcome,
                Err(e) => Err(GatewayError::aborted(format!("Gateway task failed: {e}"))),
            };

            if reply_tx.send(Reply { turn, outcome }).await.is_err() {
                tracing::debug!(turn = turn.id, "Session closed before reply arrived");
            }
        });
    }
}
