//! Trait abstraction for the reasoning call
//!
//! Lets the controller be driven by mock gateways in tests.

use crate::llm::{GatewayError, LlmRequest, LlmService};
use async_trait::async_trait;
use std::sync::Arc;

/// One question in, one answer out
#[async_trait]
pub trait ReasoningGateway: Send + Sync {
    /// Single attempt; resolves or fails, never retries
    async fn ask(&self, text: &str) -> Result<String, GatewayError>;
}

#[async_trait]
impl<T: ReasoningGateway + ?Sized> ReasoningGateway for Arc<T> {
    async fn ask(&self, text: &str) -> Result<String, GatewayError> {
        (**self).ask(text).await
    }
}

// ============================================================================
// Production Adapter
// ============================================================================

/// Adapter to use an `LlmService` as the reasoning gateway
pub struct LlmGateway {
    /// `None` when no credential is configured; every call then fails
    service: Option<Arc<dyn LlmService>>,
    system_prompt: String,
    max_tokens: Option<u32>,
}

impl LlmGateway {
    pub fn new(service: Option<Arc<dyn LlmService>>, system_prompt: String) -> Self {
        Self {
            service,
            system_prompt,
            max_tokens: Some(2048),
        }
    }
}

#[async_trait]
impl ReasoningGateway for LlmGateway {
    async fn ask(&self, text: &str) -> Result<String, GatewayError> {
        let llm = self
            .service
            .as_ref()
            .ok_or_else(|| GatewayError::auth("No Gemini API key configured"))?;

        let mut request = LlmRequest::single_turn(Some(&self.system_prompt), text);
        request.max_tokens = self.max_tokens;

        let response = llm.complete(&request).await?;
        let answer = response.text();
        if answer.trim().is_empty() {
            return Err(GatewayError::empty_response("Model returned no text"));
        }
        Ok(answer)
    }
}
