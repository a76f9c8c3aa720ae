//! Upload scenarios over the JSON API
//!
//! Run with: cargo test -p securefile-tests --test upload_e2e

use futures::future::join_all;
use pretty_assertions::assert_eq;
use securefile_client::ErrorCategory;
use securefile_tests::Fixture;

// Tests that push large bodies or many parallel uploads are `#[serial]`
// so they do not compete with each other for memory and sockets.

// =============================================================================
// Accepted uploads
// =============================================================================

#[tokio::test]
async fn test_normal_txt_is_stored_byte_for_byte() {
    let fixture = Fixture::new().await;

    let response = fixture
        .client()
        .upload_api("normal.txt", b"safe content".to_vec())
        .await
        .unwrap();

    assert!(response.success);
    assert_eq!(response.filename.as_deref(), Some("normal.txt"));
    assert_eq!(response.size, Some(12));
    assert_eq!(
        response.message.as_deref(),
        Some("File \"normal.txt\" uploaded successfully!")
    );
    assert_eq!(fixture.stored("normal.txt").unwrap(), b"safe content");
}

#[tokio::test]
#[serial_test::serial]
async fn test_binary_content_is_not_altered() {
    let fixture = Fixture::new().await;
    let content: Vec<u8> = (0..=255u8).cycle().take(64 * 1024).collect();

    let response = fixture
        .client()
        .upload_api("noise.png", content.clone())
        .await
        .unwrap();

    assert!(response.success);
    assert_eq!(fixture.stored("noise.png").unwrap(), content);
}

#[tokio::test]
async fn test_every_default_extension_is_accepted() {
    let fixture = Fixture::new().await;
    let names = [
        "test.txt",
        "document.pdf",
        "image.png",
        "photo.jpg",
        "picture.jpeg",
        "animation.gif",
        "doc.doc",
        "document.docx",
        "SHOUTING.JPG",
    ];

    for name in names {
        let response = fixture
            .client()
            .upload_api(name, format!("{name} content"))
            .await
            .unwrap();
        assert!(response.success, "{name} was rejected: {:?}", response.error);
    }

    let mut expected: Vec<String> = names.iter().map(|n| n.to_string()).collect();
    expected.sort();
    assert_eq!(fixture.stored_names(), expected);
}

#[tokio::test]
async fn test_double_extension_passes_on_last_extension() {
    let fixture = Fixture::new().await;

    let response = fixture
        .client()
        .upload_api("file.exe.jpg", b"fake image content".to_vec())
        .await
        .unwrap();

    assert!(response.success);
    assert_eq!(response.filename.as_deref(), Some("file.exe.jpg"));
    assert!(fixture.stored("file.exe.jpg").is_some());
}

#[tokio::test]
async fn test_same_name_overwrites_previous_file() {
    let fixture = Fixture::new().await;

    for content in ["first version", "second version"] {
        let response = fixture
            .client()
            .upload_api("report.pdf", content)
            .await
            .unwrap();
        assert!(response.success);
    }

    assert_eq!(fixture.stored("report.pdf").unwrap(), b"second version");
    assert_eq!(fixture.stored_names(), vec!["report.pdf".to_string()]);
}

#[tokio::test]
async fn test_filename_is_sanitized_before_storing() {
    let fixture = Fixture::new().await;

    let response = fixture
        .client()
        .upload_api("my holiday photo.jpg", b"jpg".to_vec())
        .await
        .unwrap();

    assert!(response.success);
    assert_eq!(response.filename.as_deref(), Some("my_holiday_photo.jpg"));
    assert!(fixture.stored("my_holiday_photo.jpg").is_some());
}

// =============================================================================
// Rejected uploads
// =============================================================================

#[tokio::test]
async fn test_disallowed_extensions_are_rejected() {
    let fixture = Fixture::new().await;

    for (name, content) in [
        ("test.exe", "malicious exe"),
        ("script.php", "<?php echo 'test' ?>"),
        ("file.html", "<script>alert('xss')</script>"),
        ("README", "no extension at all"),
    ] {
        let response = fixture.client().upload_api(name, content).await.unwrap();
        assert!(!response.success, "{name} was accepted");
        assert_eq!(response.category, Some(ErrorCategory::BadExtension), "{name}");
        assert!(response
            .error
            .unwrap()
            .starts_with("File type not allowed. Allowed types:"));
    }

    assert!(fixture.stored_names().is_empty());
}

#[tokio::test]
async fn test_missing_file_is_reported() {
    let fixture = Fixture::new().await;

    let response = fixture.client().upload_api_without_file().await.unwrap();
    assert!(!response.success);
    assert_eq!(response.category, Some(ErrorCategory::NoFile));
    assert_eq!(response.error.as_deref(), Some("No file selected"));

    let response = fixture.client().upload_api("", b"orphan".to_vec()).await.unwrap();
    assert_eq!(response.category, Some(ErrorCategory::NoFile));
    assert!(fixture.stored_names().is_empty());
}

#[tokio::test]
async fn test_name_that_sanitizes_to_nothing_is_rejected() {
    let fixture = Fixture::new().await;

    let response = fixture
        .client()
        .upload_api("../.txt", b"x".to_vec())
        .await
        .unwrap();

    assert!(!response.success);
    assert_eq!(response.category, Some(ErrorCategory::BadFilename));
    assert!(fixture.stored_names().is_empty());
}

// =============================================================================
// Path safety
// =============================================================================

#[tokio::test]
async fn test_path_traversal_never_escapes_upload_dir() {
    let fixture = Fixture::new().await;

    let response = fixture
        .client()
        .upload_api("../../../etc/passwd", b"path traversal content".to_vec())
        .await
        .unwrap();
    assert!(!response.success);

    // An allowed extension gets through validation, but only under its base name
    let response = fixture
        .client()
        .upload_api("../../evil.txt", b"evil".to_vec())
        .await
        .unwrap();
    assert!(response.success);
    assert_eq!(response.filename.as_deref(), Some("evil.txt"));

    let response = fixture
        .client()
        .upload_api("/tmp/absolute.txt", b"absolute".to_vec())
        .await
        .unwrap();
    assert!(response.success);
    assert_eq!(response.filename.as_deref(), Some("tmp_absolute.txt"));

    assert_eq!(fixture.stored("evil.txt").unwrap(), b"evil");
    assert!(fixture.files_outside_upload_dir().is_empty());
    assert!(!fixture.root().join("evil.txt").exists());
}

// =============================================================================
// Size limit
// =============================================================================

#[tokio::test]
#[serial_test::serial]
async fn test_seventeen_mib_is_refused_without_partial_file() {
    let fixture = Fixture::new().await;

    let outcome = fixture
        .client()
        .upload_api("large_file.txt", vec![b'x'; 17 * 1024 * 1024])
        .await;

    match outcome {
        Ok(response) => {
            assert!(!response.success);
            assert_eq!(response.category, Some(ErrorCategory::TooLarge));
        }
        // 413, or the connection closed while the body was still streaming
        Err(e) => assert!(e.is_too_large() || e.is_connection_dropped(), "{e}"),
    }

    assert!(fixture.stored_names().is_empty());
}

#[tokio::test]
async fn test_configured_limit_is_enforced_on_whole_body() {
    let fixture = Fixture::with_config(|config| config.with_max_content_length(4096)).await;

    let small = fixture
        .client()
        .upload_api("small.txt", vec![b'a'; 3000])
        .await
        .unwrap();
    assert!(small.success);

    let err = fixture
        .client()
        .upload_api("big.txt", vec![b'b'; 5000])
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(413));

    assert_eq!(fixture.stored_names(), vec!["small.txt".to_string()]);
}

// =============================================================================
// Concurrency
// =============================================================================

#[tokio::test]
#[serial_test::serial]
async fn test_concurrent_uploads_all_land() {
    let fixture = Fixture::new().await;

    let uploads = (0..8).map(|i| {
        let client = fixture.client();
        async move {
            client
                .upload_api(&format!("file_{i}.txt"), format!("content {i}"))
                .await
        }
    });

    for outcome in join_all(uploads).await {
        assert!(outcome.unwrap().success);
    }

    assert_eq!(fixture.stored_names().len(), 8);
    assert_eq!(fixture.stored("file_3.txt").unwrap(), b"content 3");
}

#[tokio::test]
#[serial_test::serial]
async fn test_concurrent_same_name_leaves_one_whole_file() {
    let fixture = Fixture::new().await;
    let contents: Vec<Vec<u8>> = (0..6u8).map(|i| vec![b'a' + i; 256 * 1024]).collect();

    let uploads = contents
        .iter()
        .map(|content| fixture.client().upload_api("shared.txt", content.clone()));

    for outcome in join_all(uploads).await {
        assert!(outcome.unwrap().success);
    }

    // Last rename wins; the survivor is one upload in full, never a mix
    let stored = fixture.stored("shared.txt").unwrap();
    assert!(contents.contains(&stored));
    assert_eq!(fixture.stored_names(), vec!["shared.txt".to_string()]);
}
