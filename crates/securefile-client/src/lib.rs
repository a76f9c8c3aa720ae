//! SecureFile Client Library
//!
//! Typed HTTP client for both SecureFile entry points.
//!
//! # Example
//!
//! ```rust,no_run
//! use securefile_client::UploadClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = UploadClient::new("http://localhost:5000")?;
//!
//!     // JSON API, no anti-forgery token needed
//!     let response = client.upload_api("normal.txt", b"safe content".to_vec()).await?;
//!     assert!(response.success);
//!
//!     // Browser form: fetch a token first, then post with it
//!     let token = client.fetch_form_token().await?;
//!     let outcome = client.upload_form("notes.txt", b"hi".to_vec(), Some(&token)).await?;
//!     println!("{:?}", outcome);
//!
//!     Ok(())
//! }
//! ```
//!
//! # Testing
//!
//! ```rust,ignore
//! use securefile_client::testing::TestServer;
//! use securefile_api::{create_router, AppState};
//!
//! let server = TestServer::start(create_router(state)).await?;
//! let response = server.client.upload_api("a.txt", b"x".to_vec()).await?;
//! ```

pub mod client;
pub mod error;
pub mod testing;
pub mod types;

pub use client::UploadClient;
pub use error::{Result, UploadClientError};
pub use types::FormOutcome;

pub use securefile_core::{ErrorCategory, UploadResponse};
