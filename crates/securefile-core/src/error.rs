//! Upload error taxonomy

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type for upload operations
pub type Result<T> = std::result::Result<T, UploadError>;

/// Category of a failed upload.
///
/// Shared by the form and API flows so both report failures identically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    NoFile,
    BadExtension,
    BadFilename,
    TooLarge,
    IoError,
}

impl ErrorCategory {
    /// Wire name of the category
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::NoFile => "no_file",
            ErrorCategory::BadExtension => "bad_extension",
            ErrorCategory::BadFilename => "bad_filename",
            ErrorCategory::TooLarge => "too_large",
            ErrorCategory::IoError => "io_error",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that can occur while validating or storing an upload
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UploadError {
    /// No file part, or the file part has no filename
    #[error("No file selected")]
    NoFile,

    /// Final extension missing or not on the allow-list
    #[error("File type not allowed. Allowed types: {allowed}")]
    BadExtension { allowed: String },

    /// Nothing usable survived sanitization
    #[error("Invalid filename")]
    BadFilename,

    /// Request body larger than the configured maximum
    #[error("File too large (max: {limit} bytes)")]
    TooLarge { limit: u64 },

    /// Directory creation or write failed.
    ///
    /// Carries only the stored filename and the OS error text, never the
    /// upload directory path.
    #[error("Failed to save \"{filename}\": {reason}")]
    Io { filename: String, reason: String },
}

impl UploadError {
    /// Build an [`UploadError::Io`] from an OS error
    pub fn io(filename: impl Into<String>, err: &std::io::Error) -> Self {
        UploadError::Io {
            filename: filename.into(),
            reason: err.to_string(),
        }
    }

    /// Category reported to clients for this error
    pub fn category(&self) -> ErrorCategory {
        match self {
            UploadError::NoFile => ErrorCategory::NoFile,
            UploadError::BadExtension { .. } => ErrorCategory::BadExtension,
            UploadError::BadFilename => ErrorCategory::BadFilename,
            UploadError::TooLarge { .. } => ErrorCategory::TooLarge,
            UploadError::Io { .. } => ErrorCategory::IoError,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_wire_names() {
        let json = serde_json::to_string(&ErrorCategory::BadExtension).unwrap();
        assert_eq!(json, "\"bad_extension\"");
        let parsed: ErrorCategory = serde_json::from_str("\"too_large\"").unwrap();
        assert_eq!(parsed, ErrorCategory::TooLarge);
        assert_eq!(ErrorCategory::IoError.to_string(), "io_error");
    }

    #[test]
    fn test_io_error_keeps_only_filename_and_reason() {
        let os = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "permission denied");
        let err = UploadError::io("report.pdf", &os);
        assert_eq!(err.category(), ErrorCategory::IoError);
        assert_eq!(
            err.to_string(),
            "Failed to save \"report.pdf\": permission denied"
        );
    }
}
