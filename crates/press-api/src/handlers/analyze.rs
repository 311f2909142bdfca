//! AI analysis handler.

use axum::extract::{Multipart, State};
use axum::Json;
use serde::Serialize;
use tracing::info;

use crate::error::ApiResult;
use crate::handlers::read_file_field;
use crate::state::AppState;

#[derive(Serialize)]
pub struct AnalyzeResponse {
    pub status: String,
    /// Extracted model output; a JSON object with title, description,
    /// and hashtags
    pub analysis: String,
}

/// Analyze an uploaded video with the remote AI service.
///
/// The orchestrator owns temp storage and remote-object cleanup; any
/// of its failures surface here as a single 500 with a flat message.
pub async fn analyze_video(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<Json<AnalyzeResponse>> {
    let (filename, bytes) = read_file_field(&mut multipart).await?;

    let report = state.analyzer.analyze(&bytes, &filename).await?;

    info!(
        "AI analysis complete for {} after {}s of remote processing",
        filename, report.waited_secs
    );

    Ok(Json(AnalyzeResponse {
        status: "success".to_string(),
        analysis: report.text,
    }))
}
