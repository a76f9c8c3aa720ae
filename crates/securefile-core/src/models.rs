//! Request, result and wire types for a single upload

use std::path::PathBuf;

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::error::{ErrorCategory, UploadError};

/// A single upload as received by the transport layer.
///
/// `original_filename` is attacker-controlled and must never be used as a
/// path before passing through [`crate::validate`].
#[derive(Debug, Clone, Default)]
pub struct UploadRequest {
    /// Filename sent by the client, `None` when no file part was present
    pub original_filename: Option<String>,
    /// File content
    pub content: Bytes,
    /// Request body size observed by the transport, in bytes
    pub declared_size: u64,
}

impl UploadRequest {
    /// Create a request for a file part, declaring the content length as size
    pub fn new(filename: impl Into<String>, content: impl Into<Bytes>) -> Self {
        let content = content.into();
        Self {
            original_filename: Some(filename.into()),
            declared_size: content.len() as u64,
            content,
        }
    }

    /// Create a request that carried no file part
    pub fn without_file() -> Self {
        Self::default()
    }

    /// Override the declared size (e.g. with the request `Content-Length`)
    pub fn with_declared_size(mut self, declared_size: u64) -> Self {
        self.declared_size = declared_size;
        self
    }

    /// Size used for limit checks: the larger of declared and actual size
    pub fn effective_size(&self) -> u64 {
        self.declared_size.max(self.content.len() as u64)
    }
}

/// A file that was written to the upload directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    /// Sanitized on-disk filename
    pub filename: String,
    /// Full path of the stored file (server-side only)
    pub path: PathBuf,
    /// Bytes written
    pub size: u64,
}

/// Outcome of one upload, as reported to either entry point
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadResult {
    pub ok: bool,
    /// Present iff `ok`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stored_filename: Option<String>,
    /// Present iff `!ok`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_category: Option<ErrorCategory>,
    /// Human-readable status line
    pub message: String,
    /// Bytes written, present iff `ok`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
}

impl UploadResult {
    pub fn success(stored: &StoredFile) -> Self {
        Self {
            ok: true,
            stored_filename: Some(stored.filename.clone()),
            error_category: None,
            message: format!("File \"{}\" uploaded successfully!", stored.filename),
            size: Some(stored.size),
        }
    }

    pub fn failure(err: &UploadError) -> Self {
        Self {
            ok: false,
            stored_filename: None,
            error_category: Some(err.category()),
            message: err.to_string(),
            size: None,
        }
    }
}

impl From<crate::Result<StoredFile>> for UploadResult {
    fn from(outcome: crate::Result<StoredFile>) -> Self {
        match outcome {
            Ok(stored) => Self::success(&stored),
            Err(err) => Self::failure(&err),
        }
    }
}

/// JSON body of the `/api/upload` endpoint.
///
/// `{"success": true, "message": .., "filename": .., "size": ..}` on success,
/// `{"success": false, "error": .., "category": ..}` on failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<ErrorCategory>,
}

impl From<UploadResult> for UploadResponse {
    fn from(result: UploadResult) -> Self {
        if result.ok {
            Self {
                success: true,
                message: Some(result.message),
                filename: result.stored_filename,
                size: result.size,
                error: None,
                category: None,
            }
        } else {
            Self {
                success: false,
                message: None,
                filename: None,
                size: None,
                error: Some(result.message),
                category: result.error_category,
            }
        }
    }
}
