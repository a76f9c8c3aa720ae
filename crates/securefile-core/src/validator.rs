//! Upload validation
//!
//! Checks run in a fixed order and stop at the first failure:
//!
//! 1. file part present with a non-empty filename, else `no_file`
//! 2. final extension on the allow-list, else `bad_extension`
//! 3. sanitized filename non-empty, else `bad_filename`
//! 4. body size within the limit, else `too_large`
//!
//! Only the segment after the last `.` is inspected, so `file.exe.jpg` is
//! accepted as a `jpg`. Content is never sniffed.

use crate::config::UploadConfig;
use crate::error::{Result, UploadError};
use crate::models::UploadRequest;
use crate::sanitize::secure_filename;

/// Substring after the last `.`, or `None` if the name has no dot
pub fn extension_of(filename: &str) -> Option<&str> {
    filename.rsplit_once('.').map(|(_, ext)| ext)
}

/// Validate `request` against `config`, returning the sanitized filename to
/// store it under.
pub fn validate(request: &UploadRequest, config: &UploadConfig) -> Result<String> {
    let filename = request
        .original_filename
        .as_deref()
        .filter(|name| !name.is_empty())
        .ok_or(UploadError::NoFile)?;

    let allowed = |name: &str| {
        extension_of(name).is_some_and(|ext| config.is_allowed_extension(ext))
    };

    if !allowed(filename) {
        return Err(UploadError::BadExtension {
            allowed: config.allowed_extensions_display(),
        });
    }

    let sanitized = secure_filename(filename);
    // Sanitizing can eat the extension ("日本.txt" -> "txt"); storing that
    // would break the allow-listed stored name guarantee.
    if sanitized.is_empty() || !allowed(&sanitized) {
        return Err(UploadError::BadFilename);
    }

    if request.effective_size() > config.max_content_length {
        return Err(UploadError::TooLarge {
            limit: config.max_content_length,
        });
    }

    Ok(sanitized)
}
