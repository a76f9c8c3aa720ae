//! End-to-end tests for the SecureFile server
//!
//! Every test starts the real router on an ephemeral port with its own
//! temporary upload directory and talks to it over HTTP through
//! `securefile-client`, the same way the probe does.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p securefile-tests
//! ```
//!
//! # Test Structure
//!
//! - `upload_e2e.rs` - validation, storage and path-safety scenarios
//! - `form_e2e.rs` - anti-forgery token flow on the browser form

use std::path::{Path, PathBuf};
use std::time::Duration;

use securefile_api::{create_router, AppState, TokenSigner};
use securefile_client::testing::TestServer;
use securefile_client::UploadClient;
use securefile_core::{UploadConfig, UploadPipeline};
use tempfile::TempDir;

/// Upload directory relative to the temporary root, as the daemon lays it out
pub const UPLOAD_SUBDIR: &str = "static/files";

const TEST_SECRET: &[u8] = b"securefile-e2e-secret";

/// A running server plus the temporary directory it writes into
pub struct Fixture {
    root: TempDir,
    upload_dir: PathBuf,
    pub server: TestServer,
}

impl Fixture {
    /// Server with the default configuration
    pub async fn new() -> Self {
        Self::with_config(|config| config).await
    }

    /// Server with a configuration adjusted by `configure`.
    ///
    /// The upload directory is always placed inside the fixture's root.
    pub async fn with_config(configure: impl FnOnce(UploadConfig) -> UploadConfig) -> Self {
        let root = tempfile::tempdir().expect("create temp dir");
        let upload_dir = root.path().join(UPLOAD_SUBDIR);

        let mut config = configure(UploadConfig::default());
        config.upload_dir = upload_dir.clone();

        let signer = TokenSigner::new(TEST_SECRET, Duration::from_secs(3600))
            .expect("static secret is a valid key");
        let state = AppState::new(UploadPipeline::new(config), signer);
        let server = TestServer::start(create_router(state))
            .await
            .expect("start test server");

        Self {
            root,
            upload_dir,
            server,
        }
    }

    pub fn client(&self) -> &UploadClient {
        &self.server.client
    }

    /// A client with its own cookie jar
    pub fn other_client(&self) -> UploadClient {
        self.server.fresh_client().expect("create client")
    }

    /// Temporary root; the upload directory lives below it
    pub fn root(&self) -> &Path {
        self.root.path()
    }

    pub fn upload_dir(&self) -> &Path {
        &self.upload_dir
    }

    /// Contents of a stored file, if present
    pub fn stored(&self, name: &str) -> Option<Vec<u8>> {
        std::fs::read(self.upload_dir.join(name)).ok()
    }

    /// Names of every entry in the upload directory, sorted
    pub fn stored_names(&self) -> Vec<String> {
        let Ok(entries) = std::fs::read_dir(&self.upload_dir) else {
            return Vec::new();
        };
        let mut names: Vec<String> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    /// Every file below the temporary root that is not inside the upload directory
    pub fn files_outside_upload_dir(&self) -> Vec<PathBuf> {
        let mut found = Vec::new();
        collect_files(self.root.path(), &self.upload_dir, &mut found);
        found
    }
}

fn collect_files(dir: &Path, skip: &Path, found: &mut Vec<PathBuf>) {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return;
    };
    for entry in entries.filter_map(|entry| entry.ok()) {
        let path = entry.path();
        if path == skip {
            continue;
        }
        if path.is_dir() {
            collect_files(&path, skip, found);
        } else {
            found.push(path);
        }
    }
}
