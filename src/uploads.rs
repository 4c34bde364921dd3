//! Image Upload Storage
//!
//! Writes accepted image files into the upload directory under a
//! timestamp-prefixed name.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tracing::{debug, warn};

use crate::error::{AppError, Result};

/// File extensions accepted for pet images (compared lowercase)
pub const ALLOWED_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

/// Maximum number of files accepted per upload request
pub const MAX_FILES_PER_UPLOAD: usize = 5;

/// Disk-backed store for uploaded images.
///
/// Clones share the name sequence, so stored names never repeat within a
/// process.
#[derive(Debug, Clone)]
pub struct UploadStore {
    dir: PathBuf,
    sequence: Arc<AtomicU64>,
}

impl UploadStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            sequence: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Returns true when the file name carries an allowed image extension.
    pub fn accepts(file_name: &str) -> bool {
        Path::new(file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .is_some_and(|ext| ALLOWED_EXTENSIONS.contains(&ext.as_str()))
    }

    /// Writes `bytes` and returns the stored file name,
    /// `<unix-millis>-<sequence>-<basename>`.
    ///
    /// Directory components of `original_name` are discarded.
    pub async fn save(&self, original_name: &str, bytes: &[u8]) -> Result<String> {
        let base = Path::new(original_name)
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| AppError::BadRequest("Invalid file name".to_string()))?;

        let stored = format!(
            "{}-{}-{}",
            chrono::Utc::now().timestamp_millis(),
            self.sequence.fetch_add(1, Ordering::Relaxed),
            base
        );

        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to create upload dir: {}", e)))?;
        tokio::fs::write(self.dir.join(&stored), bytes)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to write upload: {}", e)))?;

        debug!(file = %stored, size = bytes.len(), "upload stored");
        Ok(stored)
    }

    /// Writes every file or none of them.
    ///
    /// On the first failure, files already written by this call are removed
    /// and the error is returned.
    pub async fn save_all<B: AsRef<[u8]>>(&self, files: &[(String, B)]) -> Result<Vec<String>> {
        let mut stored = Vec::with_capacity(files.len());

        for (name, bytes) in files {
            match self.save(name, bytes.as_ref()).await {
                Ok(file) => stored.push(file),
                Err(e) => {
                    self.remove(&stored).await;
                    return Err(e);
                }
            }
        }
        Ok(stored)
    }

    /// Deletes stored files. Failures are logged, not returned.
    pub async fn remove(&self, stored: &[String]) {
        for file in stored {
            if let Err(e) = tokio::fs::remove_file(self.dir.join(file)).await {
                warn!(file = %file, error = %e, "failed to remove upload");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store(name: &str) -> UploadStore {
        let dir = std::env::temp_dir().join(format!(
            "pet_store_uploads_{}_{}",
            name,
            std::process::id()
        ));
        UploadStore::new(dir)
    }

    #[test]
    fn test_accepts_image_extensions() {
        assert!(UploadStore::accepts("dog.png"));
        assert!(UploadStore::accepts("dog.JPG"));
        assert!(UploadStore::accepts("dog.jpeg"));
        assert!(!UploadStore::accepts("dog.gif"));
        assert!(!UploadStore::accepts("dog"));
        assert!(!UploadStore::accepts("script.png.exe"));
    }

    #[tokio::test]
    async fn test_save_writes_prefixed_file() {
        let store = temp_store("save");

        let stored = store.save("buddy.png", b"fake-png").await.unwrap();

        assert!(stored.ends_with("-buddy.png"));
        let written = tokio::fs::read(store.dir().join(&stored)).await.unwrap();
        assert_eq!(written, b"fake-png");

        let _ = tokio::fs::remove_dir_all(store.dir()).await;
    }

    #[tokio::test]
    async fn test_same_name_never_collides() {
        let store = temp_store("collide");

        let first = store.save("buddy.png", b"one").await.unwrap();
        let second = store.clone().save("buddy.png", b"two").await.unwrap();

        assert_ne!(first, second);
        assert_eq!(tokio::fs::read(store.dir().join(&first)).await.unwrap(), b"one");
        assert_eq!(tokio::fs::read(store.dir().join(&second)).await.unwrap(), b"two");

        let _ = tokio::fs::remove_dir_all(store.dir()).await;
    }

    #[tokio::test]
    async fn test_save_all_rolls_back_on_failure() {
        let store = temp_store("rollback");
        let files = vec![
            ("a.png".to_string(), b"a".to_vec()),
            ("..".to_string(), b"bad".to_vec()),
        ];

        let result = store.save_all(&files).await;

        assert!(matches!(result, Err(AppError::BadRequest(_))));
        let mut entries = tokio::fs::read_dir(store.dir()).await.unwrap();
        assert!(entries.next_entry().await.unwrap().is_none());

        let _ = tokio::fs::remove_dir_all(store.dir()).await;
    }

    #[tokio::test]
    async fn test_remove_deletes_stored_files() {
        let store = temp_store("remove");
        let stored = store
            .save_all(&[("a.png".to_string(), b"a"), ("b.jpg".to_string(), b"b")])
            .await
            .unwrap();

        store.remove(&stored).await;

        for file in &stored {
            assert!(!store.dir().join(file).exists());
        }
        let _ = tokio::fs::remove_dir_all(store.dir()).await;
    }

    #[tokio::test]
    async fn test_save_strips_directories() {
        let store = temp_store("strip");

        let stored = store.save("../../etc/evil.png", b"x").await.unwrap();

        assert!(stored.ends_with("-evil.png"));
        assert!(!stored.contains('/'));
        assert!(store.dir().join(&stored).exists());

        let _ = tokio::fs::remove_dir_all(store.dir()).await;
    }
}
