//! Application state.

use std::sync::Arc;

use anyhow::Context;
use press_gemini::{GeminiClient, VideoAnalyzer};
use press_media::ensure_dir;

use crate::config::ApiConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    pub analyzer: Arc<VideoAnalyzer>,
}

impl AppState {
    /// Create new application state.
    pub async fn new(config: ApiConfig) -> anyhow::Result<Self> {
        ensure_dir(&config.upload_dir)
            .await
            .context("failed to create upload directory")?;
        ensure_dir(&config.processed_dir)
            .await
            .context("failed to create processed directory")?;

        let client = GeminiClient::from_env().context("failed to configure Gemini client")?;
        let analyzer = VideoAnalyzer::new(client, config.upload_dir.clone());

        Ok(Self {
            config,
            analyzer: Arc::new(analyzer),
        })
    }
}
