//! Probe suites
//!
//! Each suite sends a fixed set of uploads to a running server and records
//! one [`CaseResult`] per case. Suites never fail early; a case that errors
//! is recorded as failed and the run continues.

mod csrf;
mod extensions;
mod integrity;
mod large_file;
mod security;

use std::fmt;
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use securefile_client::{UploadClient, UploadResponse};
use serde::Serialize;

/// A group of related probe cases
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Suite {
    /// Uploaded bytes arrive unchanged on disk
    Integrity,
    /// Dangerous names and extensions are blocked
    Security,
    /// Bodies over the size limit are refused
    LargeFile,
    /// The form requires an anti-forgery token, the API does not
    Csrf,
    /// Every allow-listed extension is accepted
    Extensions,
}

impl Suite {
    /// Every suite, in run order
    pub const ALL: [Suite; 5] = [
        Suite::Integrity,
        Suite::Security,
        Suite::LargeFile,
        Suite::Csrf,
        Suite::Extensions,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Suite::Integrity => "integrity",
            Suite::Security => "security",
            Suite::LargeFile => "large-file",
            Suite::Csrf => "csrf",
            Suite::Extensions => "extensions",
        }
    }
}

impl fmt::Display for Suite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a case expects the server to do with the upload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Expect {
    Allowed,
    Blocked,
}

impl fmt::Display for Expect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expect::Allowed => f.write_str("allowed"),
            Expect::Blocked => f.write_str("blocked"),
        }
    }
}

/// Outcome of a single probe case
#[derive(Debug, Clone, Serialize)]
pub struct CaseResult {
    pub suite: Suite,
    pub case: String,
    pub expected: Expect,
    pub observed: String,
    pub passed: bool,
}

impl CaseResult {
    pub fn new(
        suite: Suite,
        case: impl Into<String>,
        expected: Expect,
        (passed, observed): (bool, String),
    ) -> Self {
        Self {
            suite,
            case: case.into(),
            expected,
            observed,
            passed,
        }
    }
}

/// Runs suites against one server
pub struct Probe {
    client: UploadClient,
    upload_dir: PathBuf,
}

impl Probe {
    /// `upload_dir` is where the server writes files, as seen from this host.
    /// Only the integrity suite reads it.
    pub fn new(client: UploadClient, upload_dir: impl Into<PathBuf>) -> Self {
        Self {
            client,
            upload_dir: upload_dir.into(),
        }
    }

    pub fn client(&self) -> &UploadClient {
        &self.client
    }

    pub fn upload_dir(&self) -> &Path {
        &self.upload_dir
    }

    /// Run a single suite
    pub async fn run(&self, suite: Suite) -> Vec<CaseResult> {
        tracing::info!(suite = %suite, "Running suite");
        match suite {
            Suite::Integrity => integrity::run(self).await,
            Suite::Security => security::run(self).await,
            Suite::LargeFile => large_file::run(self).await,
            Suite::Csrf => csrf::run(self).await,
            Suite::Extensions => extensions::run(self).await,
        }
    }

    /// Run `only`, or every suite when `None`
    pub async fn run_all(&self, only: Option<Suite>) -> Vec<CaseResult> {
        let suites = match only {
            Some(suite) => vec![suite],
            None => Suite::ALL.to_vec(),
        };

        let mut results = Vec::new();
        for suite in suites {
            results.extend(self.run(suite).await);
        }
        results
    }
}

/// Compare an API upload outcome with what the case expected.
///
/// Returns whether the case passed and a short description of what happened.
pub(crate) fn judge_upload(
    expected: Expect,
    outcome: &securefile_client::Result<UploadResponse>,
) -> (bool, String) {
    match outcome {
        Ok(response) if response.success => (expected == Expect::Allowed, "allowed".to_string()),
        Ok(response) => (
            expected == Expect::Blocked,
            format!("blocked ({})", describe_failure(response)),
        ),
        Err(e) => (false, format!("error: {}", e)),
    }
}

fn describe_failure(response: &UploadResponse) -> String {
    response
        .category
        .map(|category| category.to_string())
        .or_else(|| response.error.clone())
        .unwrap_or_else(|| "no reason given".to_string())
}
