//! Video compression pipeline.

use std::path::Path;

use press_models::{format_bytes, CompressionSettings};
use tokio::fs;
use tracing::info;

use crate::command::{FfmpegCommand, FfmpegRunner};
use crate::error::{MediaError, MediaResult};

/// Sizes observed before and after compression.
#[derive(Debug, Clone, Copy)]
pub struct CompressionOutcome {
    pub original_size: u64,
    pub new_size: u64,
}

impl CompressionOutcome {
    /// Size reduction as a percentage of the original.
    pub fn reduction_percent(&self) -> f64 {
        if self.original_size == 0 {
            return 0.0;
        }
        (self.original_size.saturating_sub(self.new_size)) as f64
            / self.original_size as f64
            * 100.0
    }
}

/// Compress `input` into `output` using the given settings.
///
/// Parameters are handed to FFmpeg verbatim; no probing or validation of
/// the input beyond existence is performed.
pub async fn compress_file(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    settings: &CompressionSettings,
    timeout_secs: Option<u64>,
) -> MediaResult<CompressionOutcome> {
    let input = input.as_ref();
    let output = output.as_ref();

    let original_size = fs::metadata(input)
        .await
        .map_err(|_| MediaError::FileNotFound(input.to_path_buf()))?
        .len();

    let cmd = FfmpegCommand::new(input, output).output_args(settings.to_ffmpeg_args());

    let mut runner = FfmpegRunner::new();
    if let Some(secs) = timeout_secs {
        runner = runner.with_timeout(secs);
    }
    runner.run(&cmd).await?;

    let new_size = fs::metadata(output).await?.len();

    let outcome = CompressionOutcome {
        original_size,
        new_size,
    };
    info!(
        "Compression complete: {} -> {} ({:.1}% reduction)",
        format_bytes(original_size),
        format_bytes(new_size),
        outcome.reduction_percent()
    );

    Ok(outcome)
}
