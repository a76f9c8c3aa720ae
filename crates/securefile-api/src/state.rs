//! Application state for the SecureFile API

use std::sync::Arc;

use securefile_core::UploadPipeline;

use crate::csrf::TokenSigner;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    /// Validation and storage pipeline
    pipeline: UploadPipeline,
    /// Anti-forgery token signer for the form flow
    signer: Arc<TokenSigner>,
    /// Mark the session cookie `Secure` (set when served over TLS)
    secure_cookies: bool,
}

impl AppState {
    /// Create a new AppState
    pub fn new(pipeline: UploadPipeline, signer: TokenSigner) -> Self {
        Self {
            pipeline,
            signer: Arc::new(signer),
            secure_cookies: false,
        }
    }

    /// Set whether the session cookie is marked `Secure`
    pub fn with_secure_cookies(mut self, secure: bool) -> Self {
        self.secure_cookies = secure;
        self
    }

    pub fn pipeline(&self) -> &UploadPipeline {
        &self.pipeline
    }

    pub fn signer(&self) -> &TokenSigner {
        &self.signer
    }

    pub fn secure_cookies(&self) -> bool {
        self.secure_cookies
    }
}
