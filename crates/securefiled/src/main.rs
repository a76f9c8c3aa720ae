//! securefiled - SecureFile server daemon
//!
//! Serves the upload form at `/` and `/home` and the JSON upload API at
//! `/api/upload`.
//!
//! Usage:
//!   securefiled [OPTIONS]
//!
//! Settings come from an optional TOML file (`--config`), then from
//! `SECUREFILE_*` environment variables and flags. Without any
//! configuration it listens on 0.0.0.0:5000 and writes into `static/files`.

mod config;

use anyhow::Context;
use clap::Parser;
use securefile_api::{create_router, AppState, TokenSigner};
use securefile_core::UploadPipeline;
use tokio::signal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{generate_secret, Args, ServerConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "securefiled=info,securefile_api=info,securefile_core=info,tower_http=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting securefiled (SecureFile Server Daemon)");

    let args = Args::parse();
    let config = ServerConfig::load(&args)?;
    tracing::debug!(?config, "Effective configuration");

    let secret = match config.secret_key() {
        Some(key) => key.to_string(),
        None => {
            tracing::warn!(
                "No secret key configured, generating a random one; \
                 form tokens will not survive a restart"
            );
            generate_secret()
        }
    };
    let signer = TokenSigner::new(secret.as_bytes(), config.csrf_time_limit())
        .context("Failed to create anti-forgery token signer")?;

    tracing::info!(
        upload_dir = %config.upload.upload_dir.display(),
        max_content_length = config.upload.max_content_length,
        allowed_extensions = %config.upload.allowed_extensions_display(),
        "Upload pipeline configured"
    );

    let pipeline = UploadPipeline::new(config.upload.clone());
    let state = AppState::new(pipeline, signer).with_secure_cookies(config.security.secure_cookies);
    let app = create_router(state);

    // Bind to address
    let addr = config.listen_addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("Listening on http://{}", addr);

    // Run the server
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Resolves on Ctrl+C, or SIGTERM on unix
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
