//! Video analysis orchestrator.
//!
//! Drives one video through buffer -> upload -> poll -> generate ->
//! extract, then releases both the local temp file and the remote
//! object on every exit path.

use std::path::{Path, PathBuf};

use press_models::{format_bytes, AnalysisPayload};
use tokio::fs;
use tracing::{info, warn};
use uuid::Uuid;

use crate::client::{FileState, GeminiClient, RemoteFile};
use crate::error::{AnalysisError, AnalysisResult};

/// Fixed prompt submitted with every analysis request.
pub const ANALYSIS_PROMPT: &str = r#"Watch this video carefully.
1. Generate a catchy, viral-worthy Title (max 60 characters).
2. Write an engaging SEO description (2-3 sentences).
3. Suggest 5 relevant hashtags for social media.

Return your response in valid JSON format:
{ "title": "", "description": "", "hashtags": [] }
"#;

/// Result of a completed analysis.
#[derive(Debug, Clone)]
pub struct AnalysisReport {
    /// Extracted response text with code fences removed
    pub text: String,
    /// Parsed payload
    pub payload: AnalysisPayload,
    /// Wall-clock seconds spent waiting for remote processing
    pub waited_secs: u64,
}

/// Orchestrates single-video analysis jobs.
pub struct VideoAnalyzer {
    client: GeminiClient,
    upload_dir: PathBuf,
}

impl VideoAnalyzer {
    /// Create a new analyzer buffering uploads under `upload_dir`.
    pub fn new(client: GeminiClient, upload_dir: impl Into<PathBuf>) -> Self {
        Self {
            client,
            upload_dir: upload_dir.into(),
        }
    }

    /// Analyze one uploaded video.
    ///
    /// The job-private temp file never outlives this call, and a remote
    /// handle, once obtained, gets exactly one delete attempt before
    /// returning, no matter which stage failed.
    pub async fn analyze(&self, bytes: &[u8], filename: &str) -> AnalysisResult<AnalysisReport> {
        let local_path = self.upload_dir.join(format!(
            "analyze_{}_{}",
            Uuid::new_v4(),
            sanitize_filename(filename)
        ));

        let mut remote: Option<RemoteFile> = None;
        let result = self.run(&local_path, bytes, filename, &mut remote).await;

        // Cleanup: both sides, regardless of outcome
        cleanup_local(&local_path).await;
        if let Some(file) = remote {
            match self.client.delete_file(&file.name).await {
                Ok(()) => info!("Cleaned up remote file {}", file.name),
                Err(e) => warn!("Failed to cleanup remote file {}: {}", file.name, e),
            }
        }

        result
    }

    async fn run(
        &self,
        local_path: &Path,
        bytes: &[u8],
        filename: &str,
        remote: &mut Option<RemoteFile>,
    ) -> AnalysisResult<AnalysisReport> {
        // 1. Buffer the upload to a job-private path
        fs::write(local_path, bytes).await?;
        info!(
            "AI analysis requested: {} ({})",
            filename,
            format_bytes(bytes.len() as u64)
        );

        // 2. Upload to the remote service
        let mut file = self.client.upload_file(local_path, filename).await?;
        info!("Upload complete, remote handle: {}", file.name);
        *remote = Some(file.clone());

        // 3. Poll until a terminal state
        let poll_interval = self.client.config().poll_interval;
        let poll_timeout = self.client.config().poll_timeout;
        let mut waited = std::time::Duration::ZERO;

        while !file.state.is_terminal() {
            info!(
                "Remote service is processing video... ({}s elapsed)",
                waited.as_secs()
            );
            tokio::time::sleep(poll_interval).await;
            waited += poll_interval;

            if let Some(limit) = poll_timeout {
                if waited > limit {
                    return Err(AnalysisError::PollTimeout(limit.as_secs()));
                }
            }

            file = self.client.get_file(&file.name).await?;
        }
        let waited_secs = waited.as_secs();

        // 4. Terminal check
        if file.state == FileState::Failed {
            return Err(AnalysisError::RemoteProcessing(
                "remote service marked the video as failed".to_string(),
            ));
        }
        info!("Video processing complete, total wait time: {}s", waited_secs);

        // 5. Generate the analysis
        let raw = self.client.generate(&file, ANALYSIS_PROMPT).await?;

        // 6. Extract the payload
        let text = strip_code_fences(&raw);
        let payload: AnalysisPayload = serde_json::from_str(&text)
            .map_err(|_| AnalysisError::MalformedPayload { raw: text.clone() })?;

        Ok(AnalysisReport {
            text,
            payload,
            waited_secs,
        })
    }
}

/// Remove a job temp file; failures are logged and swallowed.
async fn cleanup_local(path: &Path) {
    match fs::remove_file(path).await {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => warn!("Failed to cleanup {}: {}", path.display(), e),
    }
}

/// Strip markdown code-fence markers from a model response.
fn strip_code_fences(text: &str) -> String {
    let text = text.trim();
    let text = text.strip_prefix("```json").unwrap_or(text);
    let text = text.strip_prefix("```").unwrap_or(text);
    let text = text.strip_suffix("```").unwrap_or(text);
    text.trim().to_string()
}

/// Reduce an uploaded filename to a safe single path component.
fn sanitize_filename(name: &str) -> String {
    let name = name.rsplit(['/', '\\']).next().unwrap_or(name);
    let name = name.replace("..", "_");
    if name.is_empty() {
        "upload.bin".to_string()
    } else {
        name
    }
}
