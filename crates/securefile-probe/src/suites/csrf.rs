//! Anti-forgery suite
//!
//! The browser form must refuse a submission without a token, accept one
//! with a token bound to the session, and the JSON API must accept the same
//! request with no token at all.

use securefile_client::{FormOutcome, UploadClient};

use super::{judge_upload, CaseResult, Expect, Probe, Suite};

const FILENAME: &str = "test.txt";
const CONTENT: &[u8] = b"test content";

pub(super) async fn run(probe: &Probe) -> Vec<CaseResult> {
    vec![
        CaseResult::new(
            Suite::Csrf,
            "form without token",
            Expect::Blocked,
            form_without_token(probe).await,
        ),
        CaseResult::new(
            Suite::Csrf,
            "form with token",
            Expect::Allowed,
            form_with_token(probe).await,
        ),
        CaseResult::new(
            Suite::Csrf,
            "api without token",
            Expect::Allowed,
            judge_upload(
                Expect::Allowed,
                &probe.client().upload_api(FILENAME, CONTENT).await,
            ),
        ),
    ]
}

async fn form_without_token(probe: &Probe) -> (bool, String) {
    // A client that never loaded the form, so it holds no session cookie either
    let client = match UploadClient::new(probe.client().base_url().as_str()) {
        Ok(client) => client,
        Err(e) => return (false, format!("error: {e}")),
    };

    match client.upload_form(FILENAME, CONTENT, None).await {
        Ok(outcome) => judge_forgery(&outcome),
        Err(e) => (false, format!("error: {e}")),
    }
}

async fn form_with_token(probe: &Probe) -> (bool, String) {
    let token = match probe.client().fetch_form_token().await {
        Ok(token) => token,
        Err(e) => return (false, format!("could not load form: {e}")),
    };

    match probe
        .client()
        .upload_form(FILENAME, CONTENT, Some(&token))
        .await
    {
        Ok(outcome) if outcome.is_success() => (true, "accepted".to_string()),
        Ok(outcome) => (false, describe(&outcome)),
        Err(e) => (false, format!("error: {e}")),
    }
}

/// Passes when the form refused the submission instead of processing it
fn judge_forgery(outcome: &FormOutcome) -> (bool, String) {
    match outcome {
        FormOutcome::Rejected { .. } => (true, describe(outcome)),
        FormOutcome::Redirected { .. } => (false, describe(outcome)),
    }
}

fn describe(outcome: &FormOutcome) -> String {
    match outcome {
        FormOutcome::Rejected { status, .. } if outcome.is_forgery_rejection() => {
            format!("rejected ({status}, CSRF)")
        }
        FormOutcome::Rejected { status, .. } => format!("rejected ({status})"),
        FormOutcome::Redirected { status, message } => format!("processed ({status}: {message})"),
    }
}
