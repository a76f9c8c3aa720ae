//! JSON upload API
//!
//! Exempt from the anti-forgery check. Validation failures are reported in
//! the body with HTTP 200, and so is a body that is not multipart at all
//! (`no_file`). Only transport-level failures (413, malformed multipart)
//! change the status code.

use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, State};
use axum::http::HeaderMap;
use axum::Json;
use axum_extra::extract::CookieJar;
use securefile_core::UploadResponse;

use super::upload::{handle_upload, EntryPoint};
use crate::error::ApiError;
use crate::state::AppState;

/// POST /api/upload
/// Upload a single file from multipart field `file`
pub async fn upload(
    State(state): State<AppState>,
    jar: CookieJar,
    headers: HeaderMap,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, ApiError> {
    let result = handle_upload(&state, EntryPoint::API, &jar, &headers, multipart).await?;
    Ok(Json(UploadResponse::from(result)))
}
