//! Large-file suite: a body over the default 16 MiB limit is refused

use securefile_client::{ErrorCategory, Result, UploadResponse};

use super::{CaseResult, Expect, Probe, Suite};

const FILENAME: &str = "large_file.txt";
const SIZE: usize = 17 * 1024 * 1024;

pub(super) async fn run(probe: &Probe) -> Vec<CaseResult> {
    // An allowed extension, so only the size can block it
    let outcome = probe.client().upload_api(FILENAME, vec![b'x'; SIZE]).await;

    vec![CaseResult::new(
        Suite::LargeFile,
        format!("{FILENAME} (17 MiB)"),
        Expect::Blocked,
        judge_oversize(&outcome),
    )]
}

/// Only a size refusal counts: a 413, an in-body `too_large`, or the server
/// dropping the connection mid-upload. Any other failure fails the case.
fn judge_oversize(outcome: &Result<UploadResponse>) -> (bool, String) {
    match outcome {
        Ok(response) if response.success => (false, "accepted".to_string()),
        Ok(response) => match response.category {
            Some(ErrorCategory::TooLarge) => (true, "blocked (too_large)".to_string()),
            Some(other) => (false, format!("rejected as {other}, not too_large")),
            None => (false, "rejected without a category".to_string()),
        },
        Err(e) if e.is_too_large() => (true, "blocked (413)".to_string()),
        Err(e) if e.is_connection_dropped() => {
            (true, format!("connection closed during upload: {e}"))
        }
        Err(e) => match e.status() {
            Some(status) => (false, format!("unexpected status {status}")),
            None => (false, e.to_string()),
        },
    }
}
