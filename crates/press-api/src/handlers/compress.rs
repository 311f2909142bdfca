//! Video compression handler.

use axum::extract::{Multipart, State};
use axum::Json;
use press_media::{cleanup_file, compress_file};
use press_models::{format_bytes, CompressionSettings};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::error::ApiResult;
use crate::handlers::read_file_field;
use crate::state::AppState;

#[derive(Serialize)]
pub struct CompressResponse {
    pub status: String,
    pub download_url: String,
    pub original_size: u64,
    pub new_size: u64,
}

/// Compress an uploaded video with FFmpeg.
///
/// The buffered input is job-private and removed on every exit path;
/// the compressed output stays in the processed directory for download.
pub async fn compress_video(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<Json<CompressResponse>> {
    let (filename, bytes) = read_file_field(&mut multipart).await?;

    let input_path = state
        .config
        .upload_dir
        .join(format!("compress_{}_{}", Uuid::new_v4(), filename));
    let output_filename = format!("smartpress_{}", filename);
    let output_path = state.config.processed_dir.join(&output_filename);

    info!(
        "Processing: {} ({})",
        filename,
        format_bytes(bytes.len() as u64)
    );

    let result = async {
        tokio::fs::write(&input_path, &bytes)
            .await
            .map_err(press_media::MediaError::from)?;

        compress_file(
            &input_path,
            &output_path,
            &CompressionSettings::default(),
            None,
        )
        .await
    }
    .await;

    cleanup_file(&input_path).await;
    let outcome = result?;

    Ok(Json(CompressResponse {
        status: "success".to_string(),
        download_url: format!("{}/download/{}", state.config.public_url, output_filename),
        original_size: outcome.original_size,
        new_size: outcome.new_size,
    }))
}
