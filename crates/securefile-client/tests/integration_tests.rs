//! Integration tests for securefile-client
//!
//! These tests spin up a real server and use the client to interact with it.
//! This ensures the client stays in sync with the API.

use std::time::Duration;

use securefile_api::{create_router, AppState, TokenSigner};
use securefile_client::testing::TestServer;
use securefile_client::{ErrorCategory, FormOutcome};
use securefile_core::{UploadConfig, UploadPipeline};

async fn start(upload_dir: &std::path::Path) -> TestServer {
    let pipeline = UploadPipeline::new(UploadConfig::new(upload_dir));
    let signer = TokenSigner::new(b"client-test-secret", Duration::from_secs(3600)).unwrap();
    TestServer::start(create_router(AppState::new(pipeline, signer)))
        .await
        .unwrap()
}

#[tokio::test]
async fn test_health() {
    let tmp = tempfile::tempdir().unwrap();
    let server = start(tmp.path()).await;

    assert_eq!(server.client.health().await.unwrap(), "OK");
}

#[tokio::test]
async fn test_upload_api_reports_success_and_failure() {
    let tmp = tempfile::tempdir().unwrap();
    let server = start(tmp.path()).await;

    let ok = server
        .client
        .upload_api("normal.jpg", b"fake image content".to_vec())
        .await
        .unwrap();
    assert!(ok.success);
    assert_eq!(ok.filename.as_deref(), Some("normal.jpg"));
    assert_eq!(ok.size, Some(18));

    let rejected = server
        .client
        .upload_api("script.php", b"<?php echo 'test' ?>".to_vec())
        .await
        .unwrap();
    assert!(!rejected.success);
    assert_eq!(rejected.category, Some(ErrorCategory::BadExtension));

    let missing = server.client.upload_api_without_file().await.unwrap();
    assert_eq!(missing.category, Some(ErrorCategory::NoFile));
}

#[tokio::test]
async fn test_form_flow_uses_session_cookie() {
    let tmp = tempfile::tempdir().unwrap();
    let server = start(tmp.path()).await;

    let token = server.client.fetch_form_token().await.unwrap();
    let outcome = server
        .client
        .upload_form("notes.txt", b"form upload".to_vec(), Some(&token))
        .await
        .unwrap();
    assert!(outcome.is_success(), "{outcome:?}");
    assert_eq!(
        std::fs::read(tmp.path().join("notes.txt")).unwrap(),
        b"form upload"
    );

    // Another browser cannot reuse this token: its session cookie differs
    let other = server.fresh_client().unwrap();
    other.fetch_form_token().await.unwrap();
    let outcome = other
        .upload_form("stolen.txt", b"x".to_vec(), Some(&token))
        .await
        .unwrap();
    assert!(outcome.is_forgery_rejection(), "{outcome:?}");
    assert!(!tmp.path().join("stolen.txt").exists());
}

#[tokio::test]
async fn test_form_without_token_is_rejected() {
    let tmp = tempfile::tempdir().unwrap();
    let server = start(tmp.path()).await;

    let outcome = server
        .client
        .upload_form("test.txt", b"test content".to_vec(), None)
        .await
        .unwrap();

    match outcome {
        FormOutcome::Rejected { status, body } => {
            assert_eq!(status, 400);
            assert!(body.contains("CSRF"));
        }
        other => panic!("expected rejection, got {other:?}"),
    }
}
