//! securefile-api - HTTP layer for SecureFile
//!
//! Serves the upload form and the JSON upload API on top of
//! [`securefile_core::UploadPipeline`]. Both entry points share one handler
//! body; they differ only in whether an anti-forgery token is required.
//!
//! # Usage
//!
//! ```ignore
//! use securefile_api::{create_router, AppState, TokenSigner};
//! use securefile_core::{UploadConfig, UploadPipeline};
//!
//! let signer = TokenSigner::new(b"secret", Duration::from_secs(3600))?;
//! let state = AppState::new(UploadPipeline::new(UploadConfig::default()), signer);
//! let router = create_router(state);
//! ```

pub mod csrf;
pub mod error;
pub mod handlers;
pub mod intake;
pub mod state;

pub use csrf::{TokenError, TokenSigner};
pub use error::ApiError;
pub use state::AppState;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

/// Create the SecureFile router with the given application state.
///
/// Request bodies over the configured maximum are refused with 413 before
/// any handler runs.
pub fn create_router(state: AppState) -> Router {
    let body_limit = usize::try_from(state.pipeline().config().max_content_length)
        .unwrap_or(usize::MAX);

    Router::new()
        // Health check
        .route("/health", get(|| async { "OK" }))
        // Upload form
        .route(
            "/",
            get(handlers::form::show_form).post(handlers::form::submit_form),
        )
        .route(
            "/home",
            get(handlers::form::show_form).post(handlers::form::submit_form),
        )
        // JSON upload API (no anti-forgery token)
        .route("/api/upload", post(handlers::api::upload))
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
