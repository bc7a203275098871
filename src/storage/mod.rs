//! Storage module for uploaded image blobs
//!
//! Provides the S3-compatible gateway used by the image endpoints. The AWS
//! SDK is used with custom endpoint configuration so R2 and MinIO work too.

mod blob;

pub use blob::{BlobDescriptor, BlobError, BlobStore, S3BlobStore};
