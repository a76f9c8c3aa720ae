//! Browser form scenarios: anti-forgery token, redirects and status banners
//!
//! Run with: cargo test -p securefile-tests --test form_e2e

use pretty_assertions::assert_eq;
use securefile_client::FormOutcome;
use securefile_tests::Fixture;

#[tokio::test]
async fn test_form_without_token_is_rejected_but_api_accepts_same_upload() {
    let fixture = Fixture::new().await;

    let outcome = fixture
        .client()
        .upload_form("test.txt", b"test content".to_vec(), None)
        .await
        .unwrap();
    assert!(outcome.is_forgery_rejection(), "{outcome:?}");
    assert!(fixture.stored("test.txt").is_none());

    let response = fixture
        .client()
        .upload_api("test.txt", b"test content".to_vec())
        .await
        .unwrap();
    assert!(response.success);
    assert_eq!(fixture.stored("test.txt").unwrap(), b"test content");
}

#[tokio::test]
async fn test_form_with_token_redirects_with_success_banner() {
    let fixture = Fixture::new().await;

    let token = fixture.client().fetch_form_token().await.unwrap();
    let outcome = fixture
        .client()
        .upload_form("notes.txt", b"from the form".to_vec(), Some(&token))
        .await
        .unwrap();

    assert_eq!(
        outcome,
        FormOutcome::Redirected {
            status: "success".to_string(),
            message: "File \"notes.txt\" uploaded successfully!".to_string(),
        }
    );
    assert_eq!(fixture.stored("notes.txt").unwrap(), b"from the form");
}

#[tokio::test]
async fn test_form_token_can_be_reused_within_session() {
    let fixture = Fixture::new().await;
    let token = fixture.client().fetch_form_token().await.unwrap();

    for name in ["one.txt", "two.txt"] {
        let outcome = fixture
            .client()
            .upload_form(name, b"x".to_vec(), Some(&token))
            .await
            .unwrap();
        assert!(outcome.is_success(), "{name}: {outcome:?}");
    }

    assert_eq!(
        fixture.stored_names(),
        vec!["one.txt".to_string(), "two.txt".to_string()]
    );
}

#[tokio::test]
async fn test_form_validation_errors_redirect_with_error_banner() {
    let fixture = Fixture::new().await;
    let token = fixture.client().fetch_form_token().await.unwrap();

    let outcome = fixture
        .client()
        .upload_form("test.exe", b"malicious exe".to_vec(), Some(&token))
        .await
        .unwrap();

    match outcome {
        FormOutcome::Redirected { status, message } => {
            assert_eq!(status, "error");
            assert!(message.starts_with("File type not allowed"), "{message}");
        }
        other => panic!("expected redirect, got {other:?}"),
    }
    assert!(fixture.stored_names().is_empty());
}

#[tokio::test]
async fn test_token_from_another_session_is_rejected() {
    let fixture = Fixture::new().await;
    let victim_token = fixture.client().fetch_form_token().await.unwrap();

    let attacker = fixture.other_client();
    attacker.fetch_form_token().await.unwrap();
    let outcome = attacker
        .upload_form("planted.txt", b"x".to_vec(), Some(&victim_token))
        .await
        .unwrap();

    assert!(outcome.is_forgery_rejection(), "{outcome:?}");
    assert!(fixture.stored("planted.txt").is_none());
}

#[tokio::test]
async fn test_tampered_token_is_rejected() {
    let fixture = Fixture::new().await;
    let token = fixture.client().fetch_form_token().await.unwrap();

    // Flip the last hex digit of the signature
    let mut tampered = token.clone();
    let last = tampered.pop().unwrap();
    tampered.push(if last == '0' { '1' } else { '0' });

    let outcome = fixture
        .client()
        .upload_form("test.txt", b"x".to_vec(), Some(&tampered))
        .await
        .unwrap();

    match outcome {
        FormOutcome::Rejected { status, body } => {
            assert_eq!(status, 400);
            assert!(body.contains("CSRF token invalid"), "{body}");
        }
        other => panic!("expected rejection, got {other:?}"),
    }
    assert!(fixture.stored_names().is_empty());
}
