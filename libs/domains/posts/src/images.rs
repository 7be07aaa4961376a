//! Storage for uploaded post images.
//!
//! Images are addressed by their public path, `images/<file name>`, which is
//! what clients send back as a post's `imageUrl`.

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use crate::error::{PostError, PostResult};

/// URL prefix under which stored images are served
pub const PUBLIC_PREFIX: &str = "images";

#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Store an upload and return its public path
    async fn save(&self, original_name: &str, bytes: &[u8]) -> PostResult<String>;

    /// Delete the image behind a public path. Missing files are not an error.
    async fn remove(&self, public_path: &str) -> PostResult<()>;
}

/// Images kept as plain files in one directory
#[derive(Debug, Clone)]
pub struct LocalImageStore {
    root: PathBuf,
}

impl LocalImageStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map a public path to a file directly inside the root.
    ///
    /// Accepts `images/<name>`, `/images/<name>` or a bare `<name>`; anything
    /// with further directories or `..` is refused.
    fn resolve(&self, public_path: &str) -> PostResult<PathBuf> {
        let trimmed = public_path.trim_start_matches('/');
        let relative = trimmed
            .strip_prefix(PUBLIC_PREFIX)
            .and_then(|rest| rest.strip_prefix('/'))
            .unwrap_or(trimmed);

        let mut components = Path::new(relative).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(name)), None) => Ok(self.root.join(name)),
            _ => Err(PostError::Image(format!(
                "refusing image path outside the image directory: {}",
                public_path
            ))),
        }
    }
}

/// `<ISO-8601 timestamp>-<original file name>`, keeping only the final path segment
fn stored_file_name(original_name: &str) -> String {
    let base = Path::new(original_name)
        .file_name()
        .and_then(|n| n.to_str())
        .filter(|n| !n.is_empty())
        .unwrap_or("image");

    format!(
        "{}-{}",
        Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        base
    )
}

#[async_trait]
impl ImageStore for LocalImageStore {
    #[tracing::instrument(skip(self, bytes), fields(size = bytes.len()))]
    async fn save(&self, original_name: &str, bytes: &[u8]) -> PostResult<String> {
        let file_name = stored_file_name(original_name);

        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|e| PostError::Image(e.to_string()))?;
        tokio::fs::write(self.root.join(&file_name), bytes)
            .await
            .map_err(|e| PostError::Image(e.to_string()))?;

        tracing::info!(file = %file_name, "Image stored");
        Ok(format!("{}/{}", PUBLIC_PREFIX, file_name))
    }

    #[tracing::instrument(skip(self))]
    async fn remove(&self, public_path: &str) -> PostResult<()> {
        let path = self.resolve(public_path)?;

        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                tracing::info!(path = %path.display(), "Image removed");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "Image already gone");
                Ok(())
            }
            Err(e) => Err(PostError::Image(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_save_names_file_with_timestamp() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalImageStore::new(dir.path());

        let public = store.save("cat.png", b"png-bytes").await.unwrap();
        assert!(public.starts_with("images/"));
        assert!(public.ends_with("Z-cat.png"));

        let file_name = public.trim_start_matches("images/");
        let stored = std::fs::read(dir.path().join(file_name)).unwrap();
        assert_eq!(stored, b"png-bytes");
    }

    #[tokio::test]
    async fn test_save_strips_directories_from_name() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalImageStore::new(dir.path());

        let public = store.save("../../etc/passwd", b"x").await.unwrap();
        assert!(public.ends_with("-passwd"));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[tokio::test]
    async fn test_remove_deletes_saved_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalImageStore::new(dir.path());
        let public = store.save("dog.jpg", b"jpg").await.unwrap();

        store.remove(&public).await.unwrap();
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_remove_missing_file_is_ok() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalImageStore::new(dir.path());

        assert!(store.remove("images/never-existed.png").await.is_ok());
        assert!(store.remove("/images/never-existed.png").await.is_ok());
    }

    #[tokio::test]
    async fn test_remove_refuses_escaping_paths() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalImageStore::new(dir.path().join("images"));
        std::fs::write(dir.path().join("secret.txt"), b"keep").unwrap();

        for path in ["images/../secret.txt", "../secret.txt", "images/a/b.png", ""] {
            let result = store.remove(path).await;
            assert!(matches!(result, Err(PostError::Image(_))), "{path}");
        }
        assert!(dir.path().join("secret.txt").exists());
    }
}
