//! Request handlers.

use axum::body::Bytes;
use axum::extract::Multipart;

use crate::error::{ApiError, ApiResult};

pub mod analyze;
pub mod compress;
pub mod download;
pub mod health;

pub use analyze::analyze_video;
pub use compress::compress_video;
pub use download::download_file;
pub use health::{health, root};

/// Pull the `file` part out of a multipart upload.
pub(crate) async fn read_file_field(multipart: &mut Multipart) -> ApiResult<(String, Bytes)> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("invalid multipart body: {}", e)))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let filename = field
            .file_name()
            .map(sanitize_filename)
            .unwrap_or_else(|| "upload.mp4".to_string());
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::bad_request(format!("failed to read upload: {}", e)))?;

        return Ok((filename, bytes));
    }

    Err(ApiError::bad_request("missing 'file' field"))
}

/// Reduce a client-supplied filename to a safe single path component.
pub(crate) fn sanitize_filename(name: &str) -> String {
    let name = name.rsplit(['/', '\\']).next().unwrap_or(name);
    let name = name.replace("..", "_");
    if name.is_empty() {
        "upload.mp4".to_string()
    } else {
        name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("clip.mp4"), "clip.mp4");
        assert_eq!(sanitize_filename("/tmp/../etc/clip.mp4"), "clip.mp4");
        assert_eq!(sanitize_filename("a..b.mp4"), "a_b.mp4");
        assert_eq!(sanitize_filename(""), "upload.mp4");
    }
}
