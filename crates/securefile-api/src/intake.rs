//! Multipart intake: turns a form post into an [`UploadRequest`]

use axum::extract::Multipart;
use axum::http::{header, HeaderMap};
use securefile_core::UploadRequest;

use crate::csrf::TOKEN_FIELD;
use crate::error::ApiError;

/// Name of the multipart field carrying the file
pub const FILE_FIELD: &str = "file";

/// Everything the upload handlers need from a multipart body
#[derive(Debug, Default)]
pub struct UploadForm {
    pub request: UploadRequest,
    /// Value of the `csrf_token` field, if sent
    pub csrf_token: Option<String>,
}

/// Read the multipart body.
///
/// Only the first `file` part is kept; later ones are drained and ignored.
/// Unknown fields are skipped. `declared_size` is taken from the request's
/// `Content-Length` when present.
pub async fn read_upload_form(
    headers: &HeaderMap,
    mut multipart: Multipart,
) -> Result<UploadForm, ApiError> {
    let mut form = UploadForm::default();
    let mut file_seen = false;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some(FILE_FIELD) if !file_seen => {
                file_seen = true;
                let filename = field.file_name().map(str::to_string);
                let content = field.bytes().await?;
                form.request = UploadRequest {
                    original_filename: filename,
                    declared_size: content.len() as u64,
                    content,
                };
            }
            Some(TOKEN_FIELD) => {
                form.csrf_token = Some(field.text().await?);
            }
            name => {
                tracing::debug!(field = ?name, "Ignoring multipart field");
                // Drain so the size limit still applies to ignored parts
                field.bytes().await?;
            }
        }
    }

    if let Some(length) = content_length(headers) {
        form.request.declared_size = form.request.declared_size.max(length);
    }

    Ok(form)
}

fn content_length(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse().ok())
}
