//! FileStore trait - where validated uploads end up

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

use crate::error::{Result, UploadError};
use crate::models::StoredFile;

/// Persists validated uploads.
///
/// `filename` has already been sanitized. Implementations overwrite an
/// existing file of the same name.
#[async_trait]
pub trait FileStore: Send + Sync {
    /// Store `content` under `filename`
    async fn store(&self, filename: &str, content: &[u8]) -> Result<StoredFile>;
}

/// Stores uploads as plain files in a single local directory.
///
/// Content is written to a hidden staging file next to the target and
/// renamed into place, so readers never observe a partially written file
/// under the final name. Concurrent uploads of the same name are
/// last-rename-wins.
#[derive(Debug, Clone)]
pub struct LocalFileStore {
    root: PathBuf,
}

impl LocalFileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory files are written into
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Fixed-length name, so any target name the filesystem accepts can be staged
    fn staging_path(&self) -> PathBuf {
        // Sanitized names never start with '.', so this cannot collide with an upload
        self.root
            .join(format!(".{}.part", Uuid::new_v4().simple()))
    }
}

/// A name that is a single normal path component
fn is_flat_name(filename: &str) -> bool {
    !filename.is_empty()
        && !filename.contains(['/', '\\'])
        && filename != "."
        && filename != ".."
}

async fn write_staged(path: &Path, content: &[u8]) -> std::io::Result<()> {
    let mut file = tokio::fs::File::create(path).await?;
    file.write_all(content).await?;
    file.sync_all().await
}

#[async_trait]
impl FileStore for LocalFileStore {
    async fn store(&self, filename: &str, content: &[u8]) -> Result<StoredFile> {
        if !is_flat_name(filename) {
            return Err(UploadError::BadFilename);
        }

        // create_dir_all succeeds if the directory already exists or another
        // request creates it concurrently
        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|e| UploadError::io(filename, &e))?;

        let target = self.root.join(filename);
        let staging = self.staging_path();

        let written = match write_staged(&staging, content).await {
            Ok(()) => tokio::fs::rename(&staging, &target).await,
            Err(e) => Err(e),
        };

        if let Err(e) = written {
            if let Err(cleanup) = tokio::fs::remove_file(&staging).await {
                tracing::debug!(error = %cleanup, "Staging file cleanup failed");
            }
            return Err(UploadError::io(filename, &e));
        }

        Ok(StoredFile {
            filename: filename.to_string(),
            path: target,
            size: content.len() as u64,
        })
    }
}
