//! FFmpeg CLI wrapper for video compression.
//!
//! FFmpeg is invoked as a black box: compression parameters are passed
//! straight through to the binary, and stderr is captured for diagnostics.

pub mod command;
pub mod compress;
pub mod error;
pub mod fs_utils;

pub use command::{check_ffmpeg, FfmpegCommand, FfmpegRunner};
pub use compress::{compress_file, CompressionOutcome};
pub use error::{MediaError, MediaResult};
pub use fs_utils::{cleanup_file, ensure_dir};
