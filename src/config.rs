//! Environment-provided configuration

use crate::session::StaleReplyPolicy;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
const DEFAULT_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("JOMRUMAH_REQUEST_TIMEOUT_SECS must be a positive integer, got {0:?}")]
    InvalidTimeout(String),
    #[error("JOMRUMAH_STALE_REPLIES must be \"append\" or \"discard\", got {0:?}")]
    InvalidStaleReplyPolicy(String),
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub gemini_api_key: Option<String>,
    /// Proxy base URL that holds the credential itself
    pub gateway: Option<String>,
    pub model: String,
    pub request_timeout: Duration,
    pub stale_reply_policy: StaleReplyPolicy,
    pub log_path: PathBuf,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from any variable source. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let request_timeout = match var("JOMRUMAH_REQUEST_TIMEOUT_SECS") {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => return Err(ConfigError::InvalidTimeout(raw)),
            },
            None => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };

        let stale_reply_policy = match var("JOMRUMAH_STALE_REPLIES") {
            Some(raw) => match raw.trim().to_ascii_lowercase().as_str() {
                "append" => StaleReplyPolicy::Append,
                "discard" => StaleReplyPolicy::Discard,
                _ => return Err(ConfigError::InvalidStaleReplyPolicy(raw)),
            },
            None => StaleReplyPolicy::default(),
        };

        let log_path = var("JOMRUMAH_LOG_PATH").map_or_else(
            || {
                let home = var("HOME").unwrap_or_else(|| "/tmp".to_string());
                PathBuf::from(format!("{home}/.jomrumah/jomrumah.log"))
            },
            PathBuf::from,
        );

        Ok(Self {
            gemini_api_key: var("GEMINI_API_KEY").or_else(|| var("API_KEY")),
            gateway: var("LLM_GATEWAY"),
            model: var("JOMRUMAH_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            request_timeout,
            stale_reply_policy,
            log_path,
        })
    }

    /// Whether any route to the model exists
    pub fn has_credentials(&self) -> bool {
        self.gemini_api_key.is_some() || self.gateway.is_some()
    }
}
