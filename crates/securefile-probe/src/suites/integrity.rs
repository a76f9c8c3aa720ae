//! Integrity suite: bytes stored on disk equal the bytes uploaded

use super::{CaseResult, Expect, Probe, Suite};

const FILENAME: &str = "integrity_test.txt";
const CONTENT: &[u8] = b"This is a test file for integrity checking";

pub(super) async fn run(probe: &Probe) -> Vec<CaseResult> {
    let outcome = probe.client().upload_api(FILENAME, CONTENT).await;

    let verdict = match outcome {
        Ok(response) if response.success => {
            let stored_name = response.filename.as_deref().unwrap_or(FILENAME);
            let path = probe.upload_dir().join(stored_name);
            match tokio::fs::read(&path).await {
                Ok(stored) if stored == CONTENT => (true, "content matches".to_string()),
                Ok(stored) => (
                    false,
                    format!(
                        "content differs ({} bytes stored, {} sent)",
                        stored.len(),
                        CONTENT.len()
                    ),
                ),
                Err(e) => (false, format!("not found at {}: {}", path.display(), e)),
            }
        }
        Ok(response) => (
            false,
            format!(
                "upload failed: {}",
                response.error.unwrap_or_else(|| "no reason given".to_string())
            ),
        ),
        Err(e) => (false, format!("error: {}", e)),
    };

    vec![CaseResult::new(
        Suite::Integrity,
        FILENAME,
        Expect::Allowed,
        verdict,
    )]
}
