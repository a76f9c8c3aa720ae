//! Upload pipeline configuration

use std::collections::BTreeSet;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Default upload directory, relative to the working directory
pub const DEFAULT_UPLOAD_DIR: &str = "static/files";

/// Default maximum request body size (16 MiB)
pub const DEFAULT_MAX_CONTENT_LENGTH: u64 = 16 * 1024 * 1024;

/// Extensions accepted when none are configured
pub const DEFAULT_ALLOWED_EXTENSIONS: &[&str] =
    &["txt", "pdf", "png", "jpg", "jpeg", "gif", "doc", "docx"];

/// Configuration for the upload pipeline.
///
/// Passed into [`crate::UploadPipeline`] at construction. Every field has a
/// default, so a partial TOML table deserializes cleanly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    /// Directory uploaded files are written into
    pub upload_dir: PathBuf,
    /// Maximum accepted request body size in bytes
    pub max_content_length: u64,
    /// Allowed file extensions, lowercase and without the leading dot
    pub allowed_extensions: BTreeSet<String>,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            upload_dir: PathBuf::from(DEFAULT_UPLOAD_DIR),
            max_content_length: DEFAULT_MAX_CONTENT_LENGTH,
            allowed_extensions: DEFAULT_ALLOWED_EXTENSIONS
                .iter()
                .map(|ext| ext.to_string())
                .collect(),
        }
    }
}

impl UploadConfig {
    /// Create a config with default limits writing into `upload_dir`
    pub fn new(upload_dir: impl Into<PathBuf>) -> Self {
        Self {
            upload_dir: upload_dir.into(),
            ..Self::default()
        }
    }

    /// Set the maximum request body size
    pub fn with_max_content_length(mut self, bytes: u64) -> Self {
        self.max_content_length = bytes;
        self
    }

    /// Replace the extension allow-list.
    ///
    /// Entries are normalized to lowercase with any leading dot removed.
    pub fn with_allowed_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.allowed_extensions = extensions
            .into_iter()
            .map(|ext| normalize_extension(ext.as_ref()))
            .filter(|ext| !ext.is_empty())
            .collect();
        self
    }

    /// Whether `extension` is on the allow-list (case-insensitive)
    pub fn is_allowed_extension(&self, extension: &str) -> bool {
        let wanted = normalize_extension(extension);
        !wanted.is_empty()
            && self
                .allowed_extensions
                .iter()
                .any(|allowed| normalize_extension(allowed) == wanted)
    }

    /// Comma-separated allow-list, for user-facing messages
    pub fn allowed_extensions_display(&self) -> String {
        self.allowed_extensions
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

fn normalize_extension(ext: &str) -> String {
    ext.trim().trim_start_matches('.').to_ascii_lowercase()
}
