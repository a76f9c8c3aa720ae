//! UploadPipeline - validate, then persist, then report

use std::sync::Arc;

use crate::config::UploadConfig;
use crate::error::{Result, UploadError};
use crate::models::{StoredFile, UploadRequest, UploadResult};
use crate::store::{FileStore, LocalFileStore};
use crate::validator::validate;

/// The upload pipeline shared by every entry point.
///
/// Cheap to clone; configuration and store are shared.
#[derive(Clone)]
pub struct UploadPipeline {
    config: Arc<UploadConfig>,
    store: Arc<dyn FileStore>,
}

impl UploadPipeline {
    /// Create a pipeline writing to `config.upload_dir` on the local disk
    pub fn new(config: UploadConfig) -> Self {
        let store = Arc::new(LocalFileStore::new(config.upload_dir.clone()));
        Self::with_store(config, store)
    }

    /// Create a pipeline with a custom store
    pub fn with_store(config: UploadConfig, store: Arc<dyn FileStore>) -> Self {
        Self {
            config: Arc::new(config),
            store,
        }
    }

    pub fn config(&self) -> &UploadConfig {
        &self.config
    }

    /// Validate and store a request.
    ///
    /// Nothing reaches the store unless every validation check passed.
    pub async fn run(&self, request: &UploadRequest) -> Result<StoredFile> {
        let filename = validate(request, &self.config)?;
        self.store.store(&filename, &request.content).await
    }

    /// Run the pipeline and turn the outcome into a report, logging it
    pub async fn process(&self, request: &UploadRequest) -> UploadResult {
        let outcome = self.run(request).await;

        match &outcome {
            Ok(stored) => {
                tracing::info!(
                    filename = %stored.filename,
                    size = stored.size,
                    "File stored"
                );
            }
            Err(err @ UploadError::Io { .. }) => {
                tracing::error!(category = %err.category(), error = %err, "Upload failed");
            }
            Err(err) => {
                tracing::warn!(
                    category = %err.category(),
                    original_filename = ?request.original_filename,
                    "Upload rejected"
                );
            }
        }

        UploadResult::from(outcome)
    }
}
