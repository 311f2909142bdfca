//! Gemini AI integration for video analysis.
//!
//! This crate owns the full lifecycle of one analysis request:
//! local temp storage, remote upload, poll-until-ready, prompt
//! submission, response extraction, and two-sided cleanup (local file
//! plus remote object), with cleanup guaranteed regardless of outcome.

pub mod analyzer;
pub mod client;
pub mod config;
pub mod error;

pub use analyzer::{AnalysisReport, VideoAnalyzer, ANALYSIS_PROMPT};
pub use client::{FileState, GeminiClient, RemoteFile};
pub use config::GeminiConfig;
pub use error::{AnalysisError, AnalysisResult};
