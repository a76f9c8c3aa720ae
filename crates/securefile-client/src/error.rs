//! Client-side failures
//!
//! An upload the server turns down on validation grounds is *not* an error
//! here: it comes back as an `UploadResponse` with `success: false`. These
//! variants cover everything that stops a response from being read at all.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, UploadClientError>;

#[derive(Error, Debug)]
pub enum UploadClientError {
    /// The request never completed: refused, reset, or timed out
    #[error("Upload request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Invalid server URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Binding or accepting on the local test server
    #[error("Local server I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// Non-2xx status outside the redirect flow (400 token failure, 413, 5xx)
    #[error("Server answered {status}: {message}")]
    Status { status: u16, message: String },

    /// A 2xx or 303 that does not look like a SecureFile reply
    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),
}

impl UploadClientError {
    pub fn server_error(status: u16, message: impl Into<String>) -> Self {
        Self::Status {
            status,
            message: message.into(),
        }
    }

    /// HTTP status the server answered with, if it answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// The body was refused for its size (413)
    pub fn is_too_large(&self) -> bool {
        self.status() == Some(413)
    }

    /// The server hung up before a response arrived, e.g. while an
    /// oversized body was still streaming
    pub fn is_connection_dropped(&self) -> bool {
        matches!(self, Self::Transport(e) if e.status().is_none() && !e.is_timeout())
    }
}
