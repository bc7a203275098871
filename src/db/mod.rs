//! Database module for PostgreSQL connectivity
//!
//! Provides connection pool management plus the store and billboard
//! repositories. Repositories are exposed behind traits so handlers can be
//! exercised against in-memory doubles.

pub mod billboards;
pub mod models;
pub mod pool;
pub mod stores;

pub use billboards::{BillboardRecords, BillboardRepository};
pub use pool::{DbError, DbPool};
pub use stores::{StoreRecords, StoreRepository};
