//! Filesystem helpers for job-scoped temp files.

use std::path::Path;

use tokio::fs;
use tracing::warn;

use crate::error::MediaResult;

/// Remove a file if it exists. Failures are logged and swallowed.
pub async fn cleanup_file(path: impl AsRef<Path>) {
    let path = path.as_ref();
    match fs::remove_file(path).await {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => {
            warn!("Failed to cleanup {}: {}", path.display(), e);
        }
    }
}

/// Create a directory (and parents) if it does not already exist.
pub async fn ensure_dir(path: impl AsRef<Path>) -> MediaResult<()> {
    fs::create_dir_all(path.as_ref()).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_cleanup_removes_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("upload.mp4");
        fs::write(&path, b"data").await.unwrap();

        cleanup_file(&path).await;
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_cleanup_missing_file_is_silent() {
        let dir = TempDir::new().unwrap();
        cleanup_file(dir.path().join("never-existed.mp4")).await;
    }

    #[tokio::test]
    async fn test_ensure_dir_creates_nested() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("a").join("b");
        ensure_dir(&nested).await.unwrap();
        assert!(nested.is_dir());
    }
}
