//! HTTP client for the image upload/delete endpoints

use bytes::Bytes;
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

use crate::storage::BlobDescriptor;

/// Errors surfaced by the upload client
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Request rejected: {status} - {message}")]
    Rejected { status: u16, message: String },
}

/// Client for the image endpoints, holding the currently selected image.
///
/// At most one image URL is held at a time. Replacing it deletes the
/// previous blob best-effort (a failed delete is logged, never fatal), then
/// uploads the new bytes. Exclusive `&mut self` access means two
/// replacements can never interleave.
pub struct ImageUploadClient {
    http: Client,
    base_url: String,
    session_token: String,
    current_url: Option<String>,
}

impl ImageUploadClient {
    /// Create a new client against a service base URL
    pub fn new(base_url: impl Into<String>, session_token: impl Into<String>) -> Self {
        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(concat!("store-admin-api/", env!("CARGO_PKG_VERSION")))
            .build()
            .expect("Failed to create HTTP client");

        ImageUploadClient {
            http,
            base_url: base_url.into(),
            session_token: session_token.into(),
            current_url: None,
        }
    }

    /// URL of the currently held image, if any
    pub fn current_image(&self) -> Option<&str> {
        self.current_url.as_deref()
    }

    /// Replace the held image with a newly selected file.
    ///
    /// The previous blob is deleted best-effort before the upload; the new
    /// public URL is held and returned.
    pub async fn replace_image(
        &mut self,
        filename: &str,
        data: Bytes,
    ) -> Result<String, UploadError> {
        if let Some(previous) = self.current_url.take() {
            if let Err(e) = self.delete_url(&previous).await {
                warn!(error = %e, url = %previous, "Failed to delete previous image");
            }
        }

        let descriptor = self.upload(filename, data).await?;
        self.current_url = Some(descriptor.url.clone());
        Ok(descriptor.url)
    }

    /// Remove the held image, deleting its blob
    pub async fn remove_image(&mut self) -> Result<(), UploadError> {
        if let Some(url) = self.current_url.take() {
            self.delete_url(&url).await?;
        }
        Ok(())
    }

    async fn upload(&self, filename: &str, data: Bytes) -> Result<BlobDescriptor, UploadError> {
        debug!(filename = %filename, size = data.len(), "Uploading image");

        let response = self
            .http
            .post(endpoint(&self.base_url, "/api/images"))
            .query(&[("filename", filename)])
            .bearer_auth(&self.session_token)
            .body(data)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(rejected(response).await);
        }

        Ok(response.json::<BlobDescriptor>().await?)
    }

    async fn delete_url(&self, url: &str) -> Result<(), UploadError> {
        debug!(url = %url, "Deleting image");

        let response = self
            .http
            .delete(endpoint(&self.base_url, "/api/images"))
            .query(&[("url", url)])
            .bearer_auth(&self.session_token)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(rejected(response).await);
        }

        Ok(())
    }
}

fn endpoint(base_url: &str, path: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), path)
}

async fn rejected(response: reqwest::Response) -> UploadError {
    let status = response.status().as_u16();
    let message = response.text().await.unwrap_or_default();
    UploadError::Rejected { status, message }
}
