//! Extension suite: every default allow-listed extension is accepted

use super::{judge_upload, CaseResult, Expect, Probe, Suite};

const CASES: &[(&str, &[u8])] = &[
    ("test.txt", b"text content"),
    ("document.pdf", b"pdf content"),
    ("image.png", b"png content"),
    ("photo.jpg", b"jpg content"),
    ("picture.jpeg", b"jpeg content"),
    ("animation.gif", b"gif content"),
    ("doc.doc", b"doc content"),
    ("document.docx", b"docx content"),
];

pub(super) async fn run(probe: &Probe) -> Vec<CaseResult> {
    let mut results = Vec::with_capacity(CASES.len());
    for &(filename, content) in CASES {
        let outcome = probe.client().upload_api(filename, content).await;
        results.push(CaseResult::new(
            Suite::Extensions,
            filename,
            Expect::Allowed,
            judge_upload(Expect::Allowed, &outcome),
        ));
    }
    results
}
