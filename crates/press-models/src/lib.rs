//! Shared data models for the SmartPress backend.
//!
//! This crate provides Serde-serializable types for:
//! - AI analysis payloads (title/description/hashtags)
//! - Video encoding configuration
//! - Byte-size formatting for logs and responses

pub mod encoding;
pub mod payload;
pub mod utils;

// Re-export common types
pub use encoding::CompressionSettings;
pub use payload::AnalysisPayload;
pub use utils::format_bytes;
