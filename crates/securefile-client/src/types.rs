//! Response types for the form flow

/// What the form endpoint did with a submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormOutcome {
    /// The upload was processed and the server redirected back to the form
    Redirected {
        /// `success` or `error`
        status: String,
        /// Banner text
        message: String,
    },
    /// The server refused the submission outright (missing token, 413, ...)
    Rejected {
        status: u16,
        body: String,
    },
}

impl FormOutcome {
    /// Whether the upload was stored
    pub fn is_success(&self) -> bool {
        matches!(self, FormOutcome::Redirected { status, .. } if status == "success")
    }

    /// Whether the anti-forgery check refused the submission
    pub fn is_forgery_rejection(&self) -> bool {
        matches!(self, FormOutcome::Rejected { body, .. } if body.contains("CSRF"))
    }
}
