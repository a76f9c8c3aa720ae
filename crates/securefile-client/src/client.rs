//! SecureFile HTTP Client implementation

use std::time::Duration;

use reqwest::multipart::{Form, Part};
use reqwest::redirect::Policy;
use reqwest::{header, Client, Response};
use securefile_core::UploadResponse;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use url::Url;

use crate::error::{Result, UploadClientError};
use crate::types::FormOutcome;

/// Default request timeout
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
/// Default connection timeout
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

const FILE_FIELD: &str = "file";
const TOKEN_FIELD: &str = "csrf_token";

/// SecureFile HTTP client
///
/// Keeps a cookie store so the session cookie issued with the form is sent
/// back on submission, the way a browser would. Redirects are not followed,
/// so form outcomes can be read from the `Location` header.
#[derive(Debug, Clone)]
pub struct UploadClient {
    client: Client,
    base_url: Url,
}

impl UploadClient {
    /// Create a new client
    ///
    /// # Arguments
    /// * `base_url` - Base URL of the server (e.g., "http://localhost:5000")
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_config(base_url, DEFAULT_TIMEOUT, DEFAULT_CONNECT_TIMEOUT)
    }

    /// Create a new client with custom timeouts
    pub fn with_config(
        base_url: &str,
        timeout: Duration,
        connect_timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(connect_timeout)
            .cookie_store(true)
            .redirect(Policy::none())
            .build()?;

        let base_url = Url::parse(base_url)?;

        Ok(Self { client, base_url })
    }

    /// Get the base URL
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Get a reference to the underlying HTTP client
    pub fn http_client(&self) -> &Client {
        &self.client
    }

    // =========================================================================
    // Health Check
    // =========================================================================

    /// Check server health
    #[instrument(skip(self))]
    pub async fn health(&self) -> Result<String> {
        let url = self.base_url.join("/health")?;
        let response = self.client.get(url).send().await?;

        if response.status().is_success() {
            Ok(response.text().await?)
        } else {
            Err(self.extract_error(response).await)
        }
    }

    // =========================================================================
    // JSON API
    // =========================================================================

    /// Upload a file through `/api/upload`.
    ///
    /// Validation failures come back as `Ok` with `success == false`;
    /// transport rejections (e.g. 413) are `Err(Status)`.
    #[instrument(skip(self, content))]
    pub async fn upload_api(
        &self,
        filename: &str,
        content: impl Into<Vec<u8>>,
    ) -> Result<UploadResponse> {
        let form = new_form().part(FILE_FIELD, file_part(filename, content.into()));
        self.post_api(form).await
    }

    /// Post to `/api/upload` without any file part
    #[instrument(skip(self))]
    pub async fn upload_api_without_file(&self) -> Result<UploadResponse> {
        let form = new_form().text("note", "no file attached");
        self.post_api(form).await
    }

    async fn post_api(&self, form: Form) -> Result<UploadResponse> {
        let url = self.base_url.join("/api/upload")?;
        debug!("Uploading to {}", url);

        let response = self.client.post(url).multipart(form).send().await?;
        self.handle_response(response).await
    }

    // =========================================================================
    // Form flow
    // =========================================================================

    /// Load the upload form and return its anti-forgery token.
    ///
    /// Also stores the session cookie the token is bound to.
    #[instrument(skip(self))]
    pub async fn fetch_form_token(&self) -> Result<String> {
        let url = self.base_url.join("/")?;
        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            return Err(self.extract_error(response).await);
        }

        let html = response.text().await?;
        extract_form_token(&html)
            .map(str::to_string)
            .ok_or_else(|| UploadClientError::UnexpectedResponse("No csrf_token field in form".into()))
    }

    /// Submit a file through the browser form at `/`.
    ///
    /// `token` is sent as the `csrf_token` field when given.
    #[instrument(skip(self, content))]
    pub async fn upload_form(
        &self,
        filename: &str,
        content: impl Into<Vec<u8>>,
        token: Option<&str>,
    ) -> Result<FormOutcome> {
        let mut form = new_form();
        if let Some(token) = token {
            form = form.text(TOKEN_FIELD, token.to_string());
        }
        form = form.part(FILE_FIELD, file_part(filename, content.into()));

        let url = self.base_url.join("/")?;
        let response = self.client.post(url).multipart(form).send().await?;
        let status = response.status();

        if status.is_redirection() {
            let location = response
                .headers()
                .get(header::LOCATION)
                .and_then(|v| v.to_str().ok())
                .ok_or_else(|| {
                    UploadClientError::UnexpectedResponse("Redirect without Location header".into())
                })?;
            return self.parse_status_location(location);
        }

        Ok(FormOutcome::Rejected {
            status: status.as_u16(),
            body: response.text().await?,
        })
    }

    fn parse_status_location(&self, location: &str) -> Result<FormOutcome> {
        let url = self.base_url.join(location)?;
        let mut status = None;
        let mut message = String::new();
        for (key, value) in url.query_pairs() {
            match key.as_ref() {
                "status" => status = Some(value.into_owned()),
                "message" => message = value.into_owned(),
                _ => {}
            }
        }

        let status = status.ok_or_else(|| {
            UploadClientError::UnexpectedResponse(format!("Redirect without status: {}", location))
        })?;

        Ok(FormOutcome::Redirected { status, message })
    }

    // =========================================================================
    // Helper Methods
    // =========================================================================

    /// Handle a response, parsing JSON on success or extracting error on failure
    async fn handle_response<T: DeserializeOwned>(&self, response: Response) -> Result<T> {
        if response.status().is_success() {
            let text = response.text().await?;
            serde_json::from_str(&text).map_err(|e| {
                UploadClientError::UnexpectedResponse(format!(
                    "JSON parse error: {} - body: {}",
                    e, text
                ))
            })
        } else {
            Err(self.extract_error(response).await)
        }
    }

    /// Extract error message from response
    async fn extract_error(&self, response: Response) -> UploadClientError {
        let status = response.status().as_u16();
        let message = match response.text().await {
            Ok(text) => serde_json::from_str::<serde_json::Value>(&text)
                .ok()
                .and_then(|json| json.get("error").and_then(|e| e.as_str()).map(String::from))
                .unwrap_or(text),
            Err(e) => e.to_string(),
        };

        UploadClientError::server_error(status, message)
    }
}

/// Filenames go out verbatim, as a browser sends them, so hostile names
/// reach the server unchanged
fn new_form() -> Form {
    Form::new().percent_encode_noop()
}

fn file_part(filename: &str, content: Vec<u8>) -> Part {
    Part::bytes(content).file_name(filename.to_string())
}

/// Pull the hidden token value out of the form page
fn extract_form_token(html: &str) -> Option<&str> {
    let marker = format!(r#"name="{}" value=""#, TOKEN_FIELD);
    let start = html.find(&marker)? + marker.len();
    let len = html[start..].find('"')?;
    Some(&html[start..start + len])
}
