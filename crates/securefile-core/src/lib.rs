//! securefile-core - Upload validation and storage for SecureFile
//!
//! This crate holds the whole upload pipeline and knows nothing about HTTP:
//!
//! 1. an [`UploadRequest`] is built by the transport layer,
//! 2. [`validate`] checks it against an [`UploadConfig`] and yields the
//!    sanitized filename,
//! 3. a [`FileStore`] persists the bytes,
//! 4. the outcome is reported as an [`UploadResult`].
//!
//! [`UploadPipeline`] wires the steps together.
//!
//! # Usage
//!
//! ```ignore
//! use securefile_core::{UploadConfig, UploadPipeline, UploadRequest};
//!
//! let pipeline = UploadPipeline::new(UploadConfig::default());
//! let result = pipeline.process(&UploadRequest::new("normal.txt", "safe content")).await;
//! assert!(result.ok);
//! ```

pub mod config;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod sanitize;
pub mod store;
pub mod validator;

pub use config::UploadConfig;
pub use error::{ErrorCategory, Result, UploadError};
pub use models::{StoredFile, UploadRequest, UploadResponse, UploadResult};
pub use pipeline::UploadPipeline;
pub use sanitize::secure_filename;
pub use store::{FileStore, LocalFileStore};
pub use validator::{extension_of, validate};
