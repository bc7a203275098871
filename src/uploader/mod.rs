//! SDK-style client for the image endpoints
//!
//! Drives the upload/delete proxy the way the admin dashboard's upload
//! widget does: hold at most one image URL, replace it by best-effort
//! deleting the previous blob and uploading the new file.

mod client;

pub use client::{ImageUploadClient, UploadError};
