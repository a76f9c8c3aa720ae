//! Upload handling shared by the form and API entry points

use axum::extract::multipart::MultipartRejection;
use axum::extract::Multipart;
use axum::http::HeaderMap;
use axum_extra::extract::CookieJar;
use securefile_core::UploadResult;

use crate::csrf::SESSION_COOKIE;
use crate::error::ApiError;
use crate::intake::{read_upload_form, UploadForm};
use crate::state::AppState;

/// Describes how an entry point trusts its callers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryPoint {
    /// Name used in logs
    pub name: &'static str,
    /// Whether a valid anti-forgery token must accompany the upload
    pub require_anti_forgery_token: bool,
}

impl EntryPoint {
    /// Browser form at `/` and `/home`
    pub const FORM: EntryPoint = EntryPoint {
        name: "form",
        require_anti_forgery_token: true,
    };

    /// `/api/upload`, for automated and service-to-service callers
    pub const API: EntryPoint = EntryPoint {
        name: "api",
        require_anti_forgery_token: false,
    };
}

/// Read, authorize and process one upload.
///
/// A body that is not `multipart/form-data` at all is read as an empty form,
/// so it reaches the pipeline as `no_file` (or fails the token check).
///
/// Returns `Err` only when the request never reached the pipeline (oversize
/// body, malformed multipart, failed token check). Validation and storage
/// failures come back as a non-ok [`UploadResult`].
pub async fn handle_upload(
    state: &AppState,
    entry: EntryPoint,
    jar: &CookieJar,
    headers: &HeaderMap,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<UploadResult, ApiError> {
    let form = match multipart {
        Ok(multipart) => read_upload_form(headers, multipart).await?,
        Err(rejection) => {
            tracing::debug!(
                entry = entry.name,
                reason = %rejection,
                "Body is not multipart"
            );
            UploadForm::default()
        }
    };

    if entry.require_anti_forgery_token {
        let session = jar.get(SESSION_COOKIE).map(|c| c.value());
        if let Err(err) = state.signer().verify(form.csrf_token.as_deref(), session) {
            tracing::warn!(entry = entry.name, reason = %err, "Anti-forgery check failed");
            return Err(err.into());
        }
    }

    tracing::debug!(
        entry = entry.name,
        original_filename = ?form.request.original_filename,
        size = form.request.content.len(),
        "Processing upload"
    );

    Ok(state.pipeline().process(&form.request).await)
}
