//! Store Admin API
//!
//! Administrative backend for e-commerce store content. Billboards are
//! labeled promotional images: records live in PostgreSQL, image bytes in an
//! S3-compatible blob store, and authentication is delegated to the identity
//! provider issuing session tokens.

pub mod api;
pub mod config;
pub mod db;
pub mod storage;
pub mod uploader;

use std::sync::Arc;

use crate::config::Settings;
use crate::db::{BillboardRecords, StoreRecords};
use crate::storage::BlobStore;

/// Application state shared across all handlers
///
/// Collaborators sit behind trait objects so handlers never reach for
/// ambient singletons and can be exercised against in-memory doubles.
pub struct AppState {
    pub settings: Settings,
    pub stores: Arc<dyn StoreRecords>,
    pub billboards: Arc<dyn BillboardRecords>,
    pub blob: Arc<dyn BlobStore>,
}
