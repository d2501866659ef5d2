//! Mock gateways for testing
//!
//! These mocks drive the controller end to end without network I/O.

use super::traits::ReasoningGateway;
use crate::llm::GatewayError;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Notify;

// ============================================================================
// Mock Gateway
// ============================================================================

/// Mock gateway that returns queued outcomes.
///
/// With nothing queued every call fails, so a bare `MockGateway::new()` is
/// the always-failing stub.
pub struct MockGateway {
    outcomes: Mutex<VecDeque<Result<String, GatewayError>>>,
    /// Record of every prompt received
    pub prompts: Mutex<Vec<String>>,
}

impl MockGateway {
    pub fn new() -> Self {
        Self {
            outcomes: Mutex::new(VecDeque::new()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Queue a successful answer
    pub fn queue_answer(&self, answer: impl Into<String>) {
        self.outcomes.lock().unwrap().push_back(Ok(answer.into()));
    }

    /// Queue a failure
    pub fn queue_error(&self, error: GatewayError) {
        self.outcomes.lock().unwrap().push_back(Err(error));
    }

    pub fn recorded_prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    fn next_outcome(&self, text: &str) -> Result<String, GatewayError> {
        self.prompts.lock().unwrap().push(text.to_string());
        self.outcomes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(GatewayError::network("No mock response queued")))
    }
}

impl Default for MockGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ReasoningGateway for MockGateway {
    async fn ask(&self, text: &str) -> Result<String, GatewayError> {
        self.next_outcome(text)
    }
}

// ============================================================================
// Delayed Mock Gateway
// ============================================================================

/// Mock gateway that holds every call open for a fixed delay
pub struct DelayedMockGateway {
    inner: MockGateway,
    delay: Duration,
    /// Notified when a call starts (for test synchronization)
    pub request_started: Arc<Notify>,
}

impl DelayedMockGateway {
    pub fn new(delay: Duration) -> Self {
        Self {
            inner: MockGateway::new(),
            delay,
            request_started: Arc::new(Notify::new()),
        }
    }

    pub fn queue_answer(&self, answer: impl Into<String>) {
        self.inner.queue_answer(answer);
    }

    pub fn recorded_prompts(&self) -> Vec<String> {
        self.inner.recorded_prompts()
    }
}

#[async_trait]
impl ReasoningGateway for DelayedMockGateway {
    async fn ask(&self, text: &str) -> Result<String, GatewayError> {
        self.request_started.notify_one();
        tokio::time::sleep(self.delay).await;
        self.inner.next_outcome(text)
    }
}

// ============================================================================
// Panicking Gateway
// ============================================================================

/// Gateway whose call task dies mid-flight
pub struct PanickingGateway;

#[async_trait]
impl ReasoningGateway for PanickingGateway {
    async fn ask(&self, _text: &str) -> Result<String, GatewayError> {
        panic!("gateway blew up");
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::SessionController;
    use crate::session::state::{FALLBACK_TEXT, GREETING, RESET_GREETING};
    use crate::session::{Event, Role, SessionContext, StaleReplyPolicy, TransitionError, Turn};

    fn controller<G: ReasoningGateway + 'static>(gateway: G) -> SessionController<G> {
        SessionController::new(SessionContext::new(StaleReplyPolicy::Append), gateway)
    }

    fn contents<G: ReasoningGateway + 'static>(ctl: &SessionController<G>) -> Vec<&str> {
        ctl.log().iter().map(|m| m.content()).collect()
    }

    #[tokio::test]
    async fn test_mock_gateway() {
        let mock = MockGateway::new();
        mock.queue_answer("Hello");

        assert_eq!(mock.ask("q1").await.unwrap(), "Hello");
        // Second call should fail (no more responses)
        assert!(mock.ask("q2").await.is_err());
        assert_eq!(mock.recorded_prompts(), vec!["q1", "q2"]);
    }

    #[tokio::test]
    async fn test_session_starts_with_greeting() {
        let ctl = controller(MockGateway::new());
        assert_eq!(ctl.log().len(), 1);
        assert_eq!(ctl.log()[0].role(), Role::Assistant);
        assert_eq!(ctl.log()[0].content(), GREETING);
        assert!(!ctl.is_busy());
        assert_eq!(ctl.pending_input(), "");
    }

    #[tokio::test]
    async fn test_simple_turn() {
        let gateway = Arc::new(MockGateway::new());
        gateway.queue_answer("Defisit terbesar di **Kota Kinabalu**.");
        let mut ctl = SessionController::new(
            SessionContext::new(StaleReplyPolicy::Append),
            gateway.clone(),
        );

        ctl.update_draft("Daerah mana paling defisit?");
        ctl.submit_draft().unwrap();

        // User message lands before the call resolves
        assert!(ctl.is_busy());
        assert_eq!(ctl.pending_input(), "");
        assert_eq!(ctl.log().len(), 2);
        assert_eq!(ctl.log()[1].role(), Role::User);

        ctl.settle().await;

        assert!(!ctl.is_busy());
        assert_eq!(
            contents(&ctl),
            vec![
                GREETING,
                "Daerah mana paling defisit?",
                "Defisit terbesar di **Kota Kinabalu**."
            ]
        );
        assert_eq!(gateway.recorded_prompts(), vec!["Daerah mana paling defisit?"]);
    }

    #[tokio::test]
    async fn test_failure_shows_fallback() {
        // Nothing queued: every call fails
        let mut ctl = controller(MockGateway::new());

        ctl.submit("test").unwrap();
        ctl.settle().await;

        assert!(!ctl.is_busy());
        let last = ctl.log().last().unwrap();
        assert_eq!(last.role(), Role::Assistant);
        assert_eq!(last.content(), FALLBACK_TEXT);
        assert_eq!(ctl.log().len(), 3);
    }

    #[tokio::test]
    async fn test_rapid_submits_only_first_accepted() {
        let gateway = Arc::new(DelayedMockGateway::new(Duration::from_millis(50)));
        gateway.queue_answer("satu");
        let mut ctl = SessionController::new(
            SessionContext::new(StaleReplyPolicy::Append),
            gateway.clone(),
        );

        assert!(ctl.submit("first").is_ok());
        for text in ["second", "third", "fourth"] {
            assert_eq!(ctl.submit(text), Err(TransitionError::Busy));
        }
        assert_eq!(ctl.log().len(), 2);

        ctl.settle().await;

        assert_eq!(contents(&ctl), vec![GREETING, "first", "satu"]);
        assert_eq!(gateway.recorded_prompts(), vec!["first"]);
    }

    #[tokio::test]
    async fn test_rejected_submit_keeps_draft() {
        let gateway = Arc::new(DelayedMockGateway::new(Duration::from_millis(20)));
        let mut ctl = SessionController::new(
            SessionContext::new(StaleReplyPolicy::Append),
            gateway,
        );

        ctl.submit("first").unwrap();
        ctl.update_draft("menunggu");
        assert!(ctl.submit_draft().is_err());
        assert_eq!(ctl.pending_input(), "menunggu");

        ctl.settle().await;
        assert_eq!(ctl.pending_input(), "menunggu");
    }

    #[tokio::test]
    async fn test_blank_submits_ignored() {
        let mut ctl = controller(MockGateway::new());

        assert_eq!(ctl.submit(""), Err(TransitionError::EmptyInput));
        assert_eq!(ctl.submit("   "), Err(TransitionError::EmptyInput));

        assert_eq!(ctl.log().len(), 1);
        assert!(!ctl.is_busy());
    }

    #[tokio::test]
    async fn test_draft_updates_only_touch_draft() {
        let mut ctl = controller(MockGateway::new());

        ctl.update_draft("x");
        ctl.update_draft("y");

        assert_eq!(ctl.pending_input(), "y");
        assert_eq!(ctl.log().len(), 1);
        assert!(!ctl.is_busy());
    }

    #[tokio::test]
    async fn test_consecutive_turns_each_add_two() {
        let gateway = Arc::new(MockGateway::new());
        gateway.queue_answer("a1");
        gateway.queue_error(GatewayError::rate_limit("slow down"));
        gateway.queue_answer("a3");
        let mut ctl = SessionController::new(
            SessionContext::new(StaleReplyPolicy::Append),
            gateway,
        );

        for (i, question) in ["q1", "q2", "q3"].into_iter().enumerate() {
            let before = ctl.log().len();
            ctl.submit(question).unwrap();
            ctl.settle().await;
            assert_eq!(ctl.log().len(), before + 2, "turn {i}");
            assert!(!ctl.is_busy());
        }

        assert_eq!(
            contents(&ctl),
            vec![GREETING, "q1", "a1", "q2", FALLBACK_TEXT, "q3", "a3"]
        );
    }

    #[tokio::test]
    async fn test_reset_yields_single_greeting() {
        let gateway = Arc::new(MockGateway::new());
        gateway.queue_answer("jawapan");
        let mut ctl = SessionController::new(
            SessionContext::new(StaleReplyPolicy::Append),
            gateway,
        );
        ctl.submit("soalan").unwrap();
        ctl.settle().await;

        ctl.reset_session();

        assert_eq!(ctl.log().len(), 1);
        assert_eq!(ctl.log()[0].role(), Role::Assistant);
        assert_eq!(ctl.log()[0].content(), RESET_GREETING);
    }

    #[tokio::test]
    async fn test_reset_mid_flight_appends_stale_reply() {
        let gateway = Arc::new(DelayedMockGateway::new(Duration::from_millis(30)));
        gateway.queue_answer("lewat");
        let started = gateway.request_started.clone();
        let mut ctl = SessionController::new(
            SessionContext::new(StaleReplyPolicy::Append),
            gateway,
        );

        ctl.submit("soalan").unwrap();
        started.notified().await;
        ctl.reset_session();

        assert_eq!(ctl.log().len(), 1);
        assert!(ctl.is_busy());
        assert!(ctl.submit("baru").is_err());

        ctl.settle().await;
        assert_eq!(contents(&ctl), vec![RESET_GREETING, "lewat"]);
        assert!(!ctl.is_busy());
    }

    #[tokio::test]
    async fn test_reset_mid_flight_discards_stale_reply() {
        let gateway = Arc::new(DelayedMockGateway::new(Duration::from_millis(30)));
        gateway.queue_answer("lewat");
        let mut ctl = SessionController::new(
            SessionContext::new(StaleReplyPolicy::Discard),
            gateway,
        );

        ctl.submit("soalan").unwrap();
        ctl.reset_session();
        ctl.settle().await;

        assert_eq!(contents(&ctl), vec![RESET_GREETING]);
        assert!(!ctl.is_busy());
        assert!(ctl.submit("baru").is_ok());
    }

    #[tokio::test]
    async fn test_panicking_gateway_still_resolves_turn() {
        let mut ctl = controller(PanickingGateway);

        ctl.submit("boom").unwrap();
        ctl.settle().await;

        assert!(!ctl.is_busy());
        assert_eq!(contents(&ctl), vec![GREETING, "boom", FALLBACK_TEXT]);
    }

    #[tokio::test]
    async fn test_submit_returns_started_turn() {
        let gateway = Arc::new(MockGateway::new());
        gateway.queue_answer("a1");
        gateway.queue_answer("a2");
        let mut ctl = SessionController::new(
            SessionContext::new(StaleReplyPolicy::Append),
            gateway,
        );

        let first = ctl.submit("q1").unwrap();
        assert_eq!(first, Turn { id: 1, generation: 0 });
        ctl.settle().await;

        ctl.reset_session();
        ctl.update_draft("q2");
        let second = ctl.submit_draft().unwrap();
        assert_eq!(second, Turn { id: 2, generation: 1 });
        ctl.settle().await;
    }

    #[tokio::test]
    async fn test_stale_failure_under_discard_is_only_dropped() {
        let gateway = Arc::new(DelayedMockGateway::new(Duration::from_millis(20)));
        // Nothing queued: the call fails
        let mut ctl = SessionController::new(
            SessionContext::new(StaleReplyPolicy::Discard),
            gateway,
        );

        ctl.submit("soalan").unwrap();
        ctl.reset_session();
        let reply = ctl.next_reply().await.unwrap();
        assert!(reply.outcome.is_err());

        let applied = ctl.dispatch(Event::GatewayReply(reply)).unwrap();
        assert!(applied.dropped_stale);
        assert!(applied.started.is_none());
        assert_eq!(contents(&ctl), vec![RESET_GREETING]);
        assert!(!ctl.is_busy());
    }

    #[tokio::test]
    async fn test_draft_and_reset_accepted_in_every_phase() {
        let gateway = Arc::new(DelayedMockGateway::new(Duration::from_millis(20)));
        gateway.queue_answer("jawapan");
        let mut ctl = SessionController::new(
            SessionContext::new(StaleReplyPolicy::Append),
            gateway,
        );

        ctl.update_draft("idle");
        ctl.reset_session();
        ctl.submit("soalan").unwrap();
        ctl.update_draft("busy");
        ctl.reset_session();
        assert_eq!(ctl.pending_input(), "busy");
        assert_eq!(ctl.log().len(), 1);

        ctl.settle().await;
        assert_eq!(contents(&ctl), vec![RESET_GREETING, "jawapan"]);
    }

    #[tokio::test]
    async fn test_next_reply_pends_while_idle() {
        let mut ctl = controller(MockGateway::new());
        let waited = tokio::time::timeout(Duration::from_millis(20), ctl.next_reply()).await;
        assert!(waited.is_err());
    }
}
