//! S3-compatible blob storage for uploaded images
//!
//! Works against any S3-compatible object store (R2, MinIO, AWS itself) via
//! custom endpoint configuration. Objects are addressed externally by their
//! public URL; database records only ever hold that URL, so this module also
//! owns the URL <-> object key mapping.

use async_trait::async_trait;
use aws_sdk_s3::{
    config::{Builder, Credentials, Region},
    primitives::ByteStream,
    Client as S3Client,
};
use bytes::Bytes;
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, CONTROLS};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, instrument};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::config::BlobSettings;

/// Errors that can occur during blob operations
#[derive(Debug, Error)]
pub enum BlobError {
    #[error("Blob storage not configured")]
    NotConfigured,

    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("URL is outside the configured public prefix: {0}")]
    ForeignUrl(String),
}

/// Descriptor returned after a successful upload
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BlobDescriptor {
    /// Public URL of the stored object
    pub url: String,
    /// Object key within the bucket
    pub pathname: String,
    pub content_type: String,
    pub size: u64,
}

/// External object storage for image bytes
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Store `data` under a collision-free key derived from `filename`.
    async fn put(
        &self,
        filename: &str,
        data: Bytes,
        content_type: &str,
    ) -> Result<BlobDescriptor, BlobError>;

    /// Delete the object a public URL points at.
    async fn delete(&self, url: &str) -> Result<(), BlobError>;
}

// Characters escaped when embedding an object key into a URL path. '/' is
// deliberately kept literal so keys stay readable.
const URL_PATH: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'<')
    .add(b'>')
    .add(b'`')
    .add(b'?')
    .add(b'#')
    .add(b'%');

/// Derive an object key for an uploaded file.
///
/// The key carries a random suffix so repeated uploads of the same filename
/// never collide: `{prefix}/{stem}-{suffix}{ext}`.
fn object_key(key_prefix: &str, filename: &str) -> String {
    // Only the final path component counts; a client-supplied path must not
    // steer the key outside the prefix.
    let name = filename
        .rsplit(['/', '\\'])
        .next()
        .filter(|n| !n.is_empty())
        .unwrap_or("upload");

    let (stem, ext) = match name.rfind('.') {
        Some(idx) if idx > 0 => name.split_at(idx),
        _ => (name, ""),
    };

    let suffix = Uuid::new_v4().simple().to_string();
    format!(
        "{}/{}-{}{}",
        key_prefix.trim_matches('/'),
        stem,
        &suffix[..12],
        ext
    )
}

/// Form the public URL for an object key.
fn public_url(public_url_prefix: &str, key: &str) -> String {
    format!(
        "{}/{}",
        public_url_prefix.trim_end_matches('/'),
        utf8_percent_encode(key, URL_PATH)
    )
}

/// Map a public URL back to its object key.
fn key_for_url(public_url_prefix: &str, url: &str) -> Result<String, BlobError> {
    let prefix = public_url_prefix.trim_end_matches('/');
    let rest = url
        .strip_prefix(prefix)
        .and_then(|r| r.strip_prefix('/'))
        .ok_or_else(|| BlobError::ForeignUrl(url.to_string()))?;

    // Drop any query string before decoding
    let path = rest.split(['?', '#']).next().unwrap_or(rest);

    percent_decode_str(path)
        .decode_utf8()
        .map(|k| k.into_owned())
        .map_err(|_| BlobError::ForeignUrl(url.to_string()))
}

/// S3-compatible client for image blob storage
#[derive(Clone)]
pub struct S3BlobStore {
    client: S3Client,
    bucket: String,
    key_prefix: String,
    public_url_prefix: String,
}

impl S3BlobStore {
    /// Create a new blob store client from settings
    pub async fn new(settings: &BlobSettings) -> Result<Self, BlobError> {
        if settings.access_key_id.is_empty() || settings.public_url_prefix.is_empty() {
            return Err(BlobError::NotConfigured);
        }

        let credentials = Credentials::new(
            &settings.access_key_id,
            &settings.secret_access_key,
            None, // session token
            None, // expiry
            "blob-static-credentials",
        );

        let mut builder = Builder::new()
            .region(Region::new(settings.region.clone()))
            .credentials_provider(credentials)
            .force_path_style(true); // Required for R2 and MinIO

        if let Some(endpoint) = &settings.endpoint {
            debug!("Creating blob client with endpoint: {}", endpoint);
            builder = builder.endpoint_url(endpoint);
        }

        let client = S3Client::from_conf(builder.build());

        Ok(Self {
            client,
            bucket: settings.bucket.clone(),
            key_prefix: settings.key_prefix.clone(),
            public_url_prefix: settings.public_url_prefix.clone(),
        })
    }
}

#[async_trait]
impl BlobStore for S3BlobStore {
    #[instrument(skip(self, data), fields(filename = %filename, size = data.len()))]
    async fn put(
        &self,
        filename: &str,
        data: Bytes,
        content_type: &str,
    ) -> Result<BlobDescriptor, BlobError> {
        let key = object_key(&self.key_prefix, filename);
        let size = data.len() as u64;

        debug!("Uploading {} bytes to blob storage: {}", size, key);

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&key)
            .body(ByteStream::from(data))
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| BlobError::UploadFailed(format!("{:?}", e)))?;

        let url = public_url(&self.public_url_prefix, &key);

        info!("Uploaded blob: {} ({} bytes)", key, size);

        Ok(BlobDescriptor {
            url,
            pathname: key,
            content_type: content_type.to_string(),
            size,
        })
    }

    #[instrument(skip(self))]
    async fn delete(&self, url: &str) -> Result<(), BlobError> {
        let key = key_for_url(&self.public_url_prefix, url)?;

        debug!("Deleting blob: {}", key);

        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(&key)
            .send()
            .await
            .map_err(|e| BlobError::DeleteFailed(format!("{:?}", e)))?;

        info!("Deleted blob: {}", key);
        Ok(())
    }
}
