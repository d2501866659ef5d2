//! JOMRUMAH - terminal chat over NAPIC 2024 housing data
//!
//! A chat session controller driving a Gemini-backed assistant, with the
//! district deficit ranking alongside.

mod config;
mod controller;
mod dataset;
mod llm;
mod session;
mod shell;
mod system_prompt;

use config::AppConfig;
use controller::{LlmGateway, SessionController};
use llm::{GeminiService, LlmService, LoggingService};
use session::SessionContext;
use std::fs::OpenOptions;
use std::sync::{Arc, Mutex};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::from_env()?;

    // The terminal UI owns stdout, so logs go to a file
    if let Some(parent) = config.log_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_path)?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "jomrumah=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_ansi(false)
                .with_current_span(false)
                .with_span_list(false)
                .with_writer(Mutex::new(log_file)),
        )
        .init();

    let service: Option<Arc<dyn LlmService>> = if config.has_credentials() {
        let gemini = GeminiService::new(
            config.gemini_api_key.clone(),
            &config.model,
            config.gateway.as_deref(),
            config.request_timeout,
        )?;
        tracing::info!(
            model = %config.model,
            gateway = config.gateway.is_some(),
            timeout_secs = config.request_timeout.as_secs(),
            "Gemini service initialized"
        );
        let logged: Arc<dyn LlmService> = Arc::new(LoggingService::new(Arc::new(gemini)));
        Some(logged)
    } else {
        tracing::warn!("No Gemini API key configured. Set GEMINI_API_KEY or LLM_GATEWAY.");
        None
    };

    let gateway = LlmGateway::new(
        service,
        system_prompt::build_system_prompt(dataset::napic_2024()),
    );
    let mut controller = SessionController::new(
        SessionContext::new(config.stale_reply_policy),
        gateway,
    );

    shell::run(&mut controller).await?;
    Ok(())
}
