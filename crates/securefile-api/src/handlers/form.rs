//! Upload form handlers
//!
//! `GET` renders the form with a fresh anti-forgery token. `POST` runs the
//! upload and redirects back to the form with a status banner carried in the
//! query string (`?status=success&message=...`).

use askama::Template;
use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, Query, State};
use axum::http::HeaderMap;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum_extra::extract::cookie::{Cookie, SameSite};
use axum_extra::extract::CookieJar;
use securefile_core::UploadResult;
use serde::Deserialize;

use super::upload::{handle_upload, EntryPoint};
use crate::csrf::{TokenSigner, SESSION_COOKIE, TOKEN_FIELD};
use crate::error::ApiError;
use crate::intake::FILE_FIELD;
use crate::state::AppState;

/// Status banner passed through the redirect
#[derive(Debug, Default, Deserialize)]
pub struct StatusQuery {
    pub status: Option<String>,
    pub message: Option<String>,
}

/// GET / and GET /home
/// Render the upload form
pub async fn show_form(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(query): Query<StatusQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let session = jar
        .get(SESSION_COOKIE)
        .map(|c| c.value().to_string())
        .filter(|s| !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric()))
        .unwrap_or_else(TokenSigner::new_session);

    let token = state.signer().issue(&session);

    let mut cookie = Cookie::new(SESSION_COOKIE, session);
    cookie.set_http_only(true);
    cookie.set_same_site(Some(SameSite::Strict));
    cookie.set_path("/");
    cookie.set_secure(state.secure_cookies());

    let html = render_form(&token, &query)?;
    Ok((jar.add(cookie), Html(html)))
}

/// POST / and POST /home
/// Upload through the form; requires the anti-forgery token
pub async fn submit_form(
    State(state): State<AppState>,
    jar: CookieJar,
    headers: HeaderMap,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response {
    match handle_upload(&state, EntryPoint::FORM, &jar, &headers, multipart).await {
        Ok(result) => Redirect::to(&status_location(&result)).into_response(),
        Err(err) => err.into_response(),
    }
}

/// Redirect target carrying the outcome as a status banner
pub fn status_location(result: &UploadResult) -> String {
    let status = if result.ok { "success" } else { "error" };
    let query = url::form_urlencoded::Serializer::new(String::new())
        .append_pair("status", status)
        .append_pair("message", &result.message)
        .finish();
    format!("/?{}", query)
}

/// The upload page
#[derive(Template)]
#[template(path = "index.html")]
struct FormTemplate<'a> {
    token_field: &'a str,
    token: &'a str,
    file_field: &'a str,
    /// `success` or `error`
    flash_class: &'a str,
    /// Empty when there is no banner to show
    flash_message: &'a str,
}

fn render_form(token: &str, query: &StatusQuery) -> Result<String, ApiError> {
    let (flash_class, flash_message) = match (query.status.as_deref(), query.message.as_deref()) {
        (Some("success"), Some(message)) => ("success", message),
        (Some(_), Some(message)) => ("error", message),
        _ => ("error", ""),
    };

    let template = FormTemplate {
        token_field: TOKEN_FIELD,
        token,
        file_field: FILE_FIELD,
        flash_class,
        flash_message,
    };
    template.render().map_err(|e| {
        tracing::error!(error = %e, "Failed to render upload form");
        ApiError::Internal("Failed to render upload form".to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use securefile_core::{StoredFile, UploadError};

    #[test]
    fn test_status_location_encodes_message() {
        let stored = StoredFile {
            filename: "normal.txt".to_string(),
            path: "normal.txt".into(),
            size: 1,
        };
        let location = status_location(&UploadResult::success(&stored));
        assert_eq!(
            location,
            "/?status=success&message=File+%22normal.txt%22+uploaded+successfully%21"
        );

        let location = status_location(&UploadResult::failure(&UploadError::NoFile));
        assert_eq!(location, "/?status=error&message=No+file+selected");
    }

    #[test]
    fn test_banner_is_escaped() {
        let query = StatusQuery {
            status: Some("error".to_string()),
            message: Some("<script>alert('xss')</script>".to_string()),
        };
        let html = render_form("tok", &query).unwrap();
        assert!(html.contains("&lt;script&gt;alert("));
        assert!(html.contains("&lt;/script&gt;"));
        assert!(!html.contains("<script>"));
        assert!(html.contains(r#"class="flash error""#));
    }

    #[test]
    fn test_form_embeds_token() {
        let html = render_form("abc.1.ff", &StatusQuery::default()).unwrap();
        assert!(html.contains(r#"name="csrf_token" value="abc.1.ff""#));
        assert!(html.contains(r#"name="file""#));
        assert!(!html.contains("flash"));
    }

    #[test]
    fn test_success_banner_uses_success_class() {
        let query = StatusQuery {
            status: Some("success".to_string()),
            message: Some("File \"a&b.txt\" uploaded successfully!".to_string()),
        };
        let html = render_form("tok", &query).unwrap();
        assert!(html.contains(r#"class="flash success""#));
        assert!(html.contains("a&amp;b.txt"));
    }

    #[test]
    fn test_unknown_status_renders_as_error() {
        let query = StatusQuery {
            status: Some("bogus".to_string()),
            message: Some("hello".to_string()),
        };
        let html = render_form("tok", &query).unwrap();
        assert!(html.contains(r#"class="flash error""#));
    }
}
