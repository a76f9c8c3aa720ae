//! Security suite: dangerous names and extensions against the JSON API

use super::{judge_upload, CaseResult, Expect, Probe, Suite};

/// (filename, content, expectation)
///
/// `file.exe.jpg` is accepted because only the last extension is checked.
const CASES: &[(&str, &[u8], Expect)] = &[
    ("normal.txt", b"safe content", Expect::Allowed),
    ("test.exe", b"malicious exe", Expect::Blocked),
    ("script.php", b"<?php echo 'test' ?>", Expect::Blocked),
    ("../../../etc/passwd", b"path traversal content", Expect::Blocked),
    ("file.html", b"<script>alert('xss')</script>", Expect::Blocked),
    ("file.exe.jpg", b"fake image content", Expect::Allowed),
    ("normal.jpg", b"fake image content", Expect::Allowed),
];

pub(super) async fn run(probe: &Probe) -> Vec<CaseResult> {
    let mut results = Vec::with_capacity(CASES.len());
    for &(filename, content, expected) in CASES {
        let outcome = probe.client().upload_api(filename, content).await;
        tracing::debug!(filename, ?outcome, "Security case");
        results.push(CaseResult::new(
            Suite::Security,
            filename,
            expected,
            judge_upload(expected, &outcome),
        ));
    }
    results
}
