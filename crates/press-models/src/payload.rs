//! AI analysis payload.

use serde::{Deserialize, Serialize};

/// Structured analysis returned by the AI model for one video.
///
/// The model is prompted to keep `title` under 60 characters, but the
/// limit is an instruction to the model, not a constraint enforced here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisPayload {
    /// Catchy title for the video
    pub title: String,
    /// SEO description (2-3 sentences)
    pub description: String,
    /// Suggested social media hashtags
    #[serde(default)]
    pub hashtags: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_roundtrip() {
        let json = r#"{"title":"T","description":"D","hashtags":["a","b"]}"#;
        let payload: AnalysisPayload = serde_json::from_str(json).unwrap();
        assert_eq!(payload.title, "T");
        assert_eq!(payload.hashtags, vec!["a", "b"]);
    }

    #[test]
    fn test_missing_hashtags_defaults_to_empty() {
        let json = r#"{"title":"T","description":"D"}"#;
        let payload: AnalysisPayload = serde_json::from_str(json).unwrap();
        assert!(payload.hashtags.is_empty());
    }
}
