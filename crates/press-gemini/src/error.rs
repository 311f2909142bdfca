//! Analysis error types.
//!
//! Each pipeline stage fails with its own variant so callers and tests
//! can discriminate the cause instead of pattern-matching message
//! strings. The HTTP layer is the only place these collapse into a
//! single user-visible failure message.

use thiserror::Error;

pub type AnalysisResult<T> = Result<T, AnalysisError>;

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("Missing configuration: {0}")]
    Config(String),

    #[error("Local storage failure: {0}")]
    Storage(#[from] std::io::Error),

    #[error("Upload to remote service failed: {0}")]
    Upload(String),

    #[error("Remote state check failed: {0}")]
    StateCheck(String),

    #[error("Remote service could not process the video: {0}")]
    RemoteProcessing(String),

    #[error("Polling did not reach a terminal state within {0} seconds")]
    PollTimeout(u64),

    #[error("Analysis generation failed: {0}")]
    Generation(String),

    #[error("Analysis generation timed out after {0} seconds")]
    GenerationTimeout(u64),

    #[error("Analysis output is not valid JSON: {raw}")]
    MalformedPayload { raw: String },

    #[error("Remote cleanup failed: {0}")]
    RemoteCleanup(String),
}

impl AnalysisError {
    /// Create an upload failure error.
    pub fn upload(msg: impl Into<String>) -> Self {
        Self::Upload(msg.into())
    }

    /// Create a generation failure error.
    pub fn generation(msg: impl Into<String>) -> Self {
        Self::Generation(msg.into())
    }
}
