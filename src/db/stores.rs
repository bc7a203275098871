//! Store lookups backing the ownership guard

use async_trait::async_trait;
use tokio_postgres::Row;

use super::models::Store;
use super::pool::{DbError, DbPool};

/// Read access to store records
#[async_trait]
pub trait StoreRecords: Send + Sync {
    /// Find a store by id, constrained to its owner.
    ///
    /// Returns `None` both when the store does not exist and when it belongs
    /// to a different user; callers cannot distinguish the two.
    async fn find_for_user(&self, store_id: &str, user_id: &str)
        -> Result<Option<Store>, DbError>;
}

/// PostgreSQL-backed store repository
pub struct StoreRepository {
    pool: DbPool,
}

impl StoreRepository {
    pub fn new(pool: DbPool) -> Self {
        StoreRepository { pool }
    }
}

fn store_from_row(row: &Row) -> Store {
    Store {
        id: row.get("id"),
        user_id: row.get("user_id"),
        name: row.get("name"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

#[async_trait]
impl StoreRecords for StoreRepository {
    async fn find_for_user(
        &self,
        store_id: &str,
        user_id: &str,
    ) -> Result<Option<Store>, DbError> {
        let client = self.pool.get().await?;

        let row = client
            .query_opt(
                r#"
                SELECT id, user_id, name, created_at, updated_at
                FROM stores
                WHERE id = $1 AND user_id = $2
                "#,
                &[&store_id, &user_id],
            )
            .await?;

        Ok(row.as_ref().map(store_from_row))
    }
}
