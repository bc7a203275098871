//! Database records for stores and billboards

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Store record. Every mutation is anchored on store ownership.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Store {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Billboard record
///
/// `image_url` is an opaque pointer to an externally stored blob; the
/// database never owns the blob's lifecycle.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Billboard {
    pub id: String,
    pub store_id: String,
    pub label: String,
    pub image_url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Affected-row count returned by update and delete operations
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MutationCount {
    pub count: u64,
}
