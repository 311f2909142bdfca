//! HTTP client for the Gemini Files API.
//!
//! The remote contract is four calls: upload a file, poll its state,
//! generate content against it, and delete it. Uploads use the
//! resumable upload protocol (start + upload/finalize).

use std::path::Path;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::GeminiConfig;
use crate::error::{AnalysisError, AnalysisResult};

/// Processing state of a remote file, as reported by the service.
///
/// The state is polled, never computed locally. `Active` and `Failed`
/// are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FileState {
    #[serde(alias = "STATE_UNSPECIFIED")]
    Pending,
    Processing,
    Active,
    Failed,
}

impl Default for FileState {
    fn default() -> Self {
        Self::Pending
    }
}

impl FileState {
    /// Whether polling should stop at this state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, FileState::Active | FileState::Failed)
    }
}

/// Handle to a file uploaded to the remote service.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteFile {
    /// Opaque resource name, e.g. `files/abc-123`
    pub name: String,
    /// URI referenced by generation requests
    #[serde(default)]
    pub uri: String,
    #[serde(default)]
    pub mime_type: Option<String>,
    #[serde(default)]
    pub state: FileState,
}

#[derive(Debug, Serialize)]
struct UploadStartRequest {
    file: UploadFileMetadata,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct UploadFileMetadata {
    display_name: String,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    file: RemoteFile,
}

/// Gemini generation request.
#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(rename = "fileData", skip_serializing_if = "Option::is_none")]
    file_data: Option<FileData>,
}

#[derive(Debug, Serialize)]
struct FileData {
    #[serde(rename = "mimeType")]
    mime_type: String,
    #[serde(rename = "fileUri")]
    file_uri: String,
}

/// Gemini generation response.
#[derive(Debug, Deserialize)]
struct GenerateResponse {
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: ResponseContent,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: String,
}

/// Gemini API client.
pub struct GeminiClient {
    http: Client,
    config: GeminiConfig,
}

impl GeminiClient {
    /// Create a new client.
    pub fn new(config: GeminiConfig) -> AnalysisResult<Self> {
        let http = Client::builder()
            .build()
            .map_err(|e| AnalysisError::Config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { http, config })
    }

    /// Create from environment variables.
    pub fn from_env() -> AnalysisResult<Self> {
        Self::new(GeminiConfig::from_env()?)
    }

    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }

    /// Upload a local file and return its remote handle.
    pub async fn upload_file(
        &self,
        path: impl AsRef<Path>,
        display_name: &str,
    ) -> AnalysisResult<RemoteFile> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let mime_type = mime_for(display_name);

        // Step 1: start a resumable upload session
        let start_url = format!(
            "{}/upload/v1beta/files?key={}",
            self.config.base_url, self.config.api_key
        );

        let response = self
            .http
            .post(&start_url)
            .header("X-Goog-Upload-Protocol", "resumable")
            .header("X-Goog-Upload-Command", "start")
            .header("X-Goog-Upload-Header-Content-Length", bytes.len().to_string())
            .header("X-Goog-Upload-Header-Content-Type", mime_type)
            .json(&UploadStartRequest {
                file: UploadFileMetadata {
                    display_name: display_name.to_string(),
                },
            })
            .send()
            .await
            .map_err(|e| AnalysisError::upload(format!("upload start request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AnalysisError::upload(format!(
                "upload start returned {}: {}",
                status, body
            )));
        }

        let upload_url = response
            .headers()
            .get("X-Goog-Upload-URL")
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string())
            .ok_or_else(|| AnalysisError::upload("no upload URL in start response"))?;

        // Step 2: send the bytes and finalize
        let response = self
            .http
            .post(&upload_url)
            .header("X-Goog-Upload-Offset", "0")
            .header("X-Goog-Upload-Command", "upload, finalize")
            .body(bytes)
            .send()
            .await
            .map_err(|e| AnalysisError::upload(format!("upload request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AnalysisError::upload(format!(
                "upload returned {}: {}",
                status, body
            )));
        }

        let uploaded: UploadResponse = response
            .json()
            .await
            .map_err(|e| AnalysisError::upload(format!("invalid upload response: {}", e)))?;

        debug!("Upload complete, remote file: {}", uploaded.file.name);
        Ok(uploaded.file)
    }

    /// Fetch the current state of a remote file.
    pub async fn get_file(&self, name: &str) -> AnalysisResult<RemoteFile> {
        let url = format!(
            "{}/v1beta/{}?key={}",
            self.config.base_url, name, self.config.api_key
        );

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| AnalysisError::StateCheck(format!("state request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AnalysisError::StateCheck(format!(
                "state check returned {}: {}",
                status, body
            )));
        }

        response
            .json()
            .await
            .map_err(|e| AnalysisError::StateCheck(format!("invalid state response: {}", e)))
    }

    /// Run a generation request against an uploaded file.
    ///
    /// Bounded by the configured generation timeout; the poll phase has
    /// no such bound.
    pub async fn generate(&self, file: &RemoteFile, prompt: &str) -> AnalysisResult<String> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.config.base_url, self.config.model, self.config.api_key
        );

        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![
                    Part {
                        text: None,
                        file_data: Some(FileData {
                            mime_type: file
                                .mime_type
                                .clone()
                                .unwrap_or_else(|| "video/mp4".to_string()),
                            file_uri: file.uri.clone(),
                        }),
                    },
                    Part {
                        text: Some(prompt.to_string()),
                        file_data: None,
                    },
                ],
            }],
        };

        let timeout = self.config.generation_timeout;
        let fut = async {
            let response = self
                .http
                .post(&url)
                .json(&request)
                .send()
                .await
                .map_err(|e| AnalysisError::generation(format!("request failed: {}", e)))?;

            if !response.status().is_success() {
                let status = response.status();
                let body = response.text().await.unwrap_or_default();
                return Err(AnalysisError::generation(format!(
                    "Gemini API returned {}: {}",
                    status, body
                )));
            }

            response
                .json::<GenerateResponse>()
                .await
                .map_err(|e| AnalysisError::generation(format!("invalid response: {}", e)))
        };

        let generated = tokio::time::timeout(timeout, fut)
            .await
            .map_err(|_| AnalysisError::GenerationTimeout(timeout.as_secs()))??;

        generated
            .candidates
            .first()
            .and_then(|c| c.content.parts.first())
            .map(|p| p.text.clone())
            .ok_or_else(|| AnalysisError::generation("no content in Gemini response"))
    }

    /// Delete a remote file. Callers treat failures as best-effort.
    pub async fn delete_file(&self, name: &str) -> AnalysisResult<()> {
        let url = format!(
            "{}/v1beta/{}?key={}",
            self.config.base_url, name, self.config.api_key
        );

        let response = self
            .http
            .delete(&url)
            .send()
            .await
            .map_err(|e| AnalysisError::RemoteCleanup(format!("delete request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(AnalysisError::RemoteCleanup(format!(
                "delete returned {}",
                response.status()
            )));
        }

        Ok(())
    }
}

/// Guess a MIME type from the uploaded filename.
fn mime_for(filename: &str) -> &'static str {
    let ext = filename
        .rsplit('.')
        .next()
        .unwrap_or_default()
        .to_ascii_lowercase();
    match ext.as_str() {
        "mp4" | "m4v" => "video/mp4",
        "mov" => "video/quicktime",
        "webm" => "video/webm",
        "mkv" => "video/x-matroska",
        "avi" => "video/x-msvideo",
        _ => "application/octet-stream",
    }
}
