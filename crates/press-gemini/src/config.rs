//! Gemini client configuration.

use std::time::Duration;

use crate::error::{AnalysisError, AnalysisResult};

/// Default Gemini API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
/// Fast model for video analysis.
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";
/// Delay between remote state checks.
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 2;
/// Upper bound on the generation call (10 minutes).
pub const DEFAULT_GENERATION_TIMEOUT_SECS: u64 = 600;

/// Configuration for the Gemini client and analysis orchestrator.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// API key for the remote service
    pub api_key: String,
    /// Base URL of the Gemini API (overridable for tests)
    pub base_url: String,
    /// Model used for generation
    pub model: String,
    /// Delay between remote state checks
    pub poll_interval: Duration,
    /// Timeout applied to the generation call only
    pub generation_timeout: Duration,
    /// Optional ceiling on the polling phase. The upstream behavior is
    /// unbounded; leave `None` to preserve it.
    pub poll_timeout: Option<Duration>,
}

impl GeminiConfig {
    /// Create a config with defaults for everything but the key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            poll_interval: Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS),
            generation_timeout: Duration::from_secs(DEFAULT_GENERATION_TIMEOUT_SECS),
            poll_timeout: None,
        }
    }

    /// Create config from environment variables.
    ///
    /// `GEMINI_API_KEY` is required; everything else falls back to
    /// defaults.
    pub fn from_env() -> AnalysisResult<Self> {
        let api_key = std::env::var("GEMINI_API_KEY")
            .map_err(|_| AnalysisError::Config("GEMINI_API_KEY not set".to_string()))?;

        Ok(Self {
            api_key,
            base_url: std::env::var("GEMINI_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            model: std::env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            poll_interval: Duration::from_secs(
                std::env::var("GEMINI_POLL_INTERVAL")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(DEFAULT_POLL_INTERVAL_SECS),
            ),
            generation_timeout: Duration::from_secs(
                std::env::var("GEMINI_TIMEOUT")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(DEFAULT_GENERATION_TIMEOUT_SECS),
            ),
            poll_timeout: std::env::var("GEMINI_POLL_TIMEOUT")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(Duration::from_secs),
        })
    }
}
