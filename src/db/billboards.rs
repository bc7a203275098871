//! Billboard database operations

use async_trait::async_trait;
use tokio_postgres::Row;
use tracing::info;
use uuid::Uuid;

use super::models::Billboard;
use super::pool::{DbError, DbPool};

/// CRUD access to billboard records
#[async_trait]
pub trait BillboardRecords: Send + Sync {
    /// Find one billboard by id, scoped to its store.
    async fn find_in_store(
        &self,
        billboard_id: &str,
        store_id: &str,
    ) -> Result<Option<Billboard>, DbError>;

    /// All billboards of a store, newest first.
    async fn list_for_store(&self, store_id: &str) -> Result<Vec<Billboard>, DbError>;

    /// Insert a new billboard and return the stored record.
    async fn create(
        &self,
        store_id: &str,
        label: &str,
        image_url: &str,
    ) -> Result<Billboard, DbError>;

    /// Current image URL of a billboard, if the record exists.
    async fn image_url(&self, billboard_id: &str) -> Result<Option<String>, DbError>;

    /// Update label and image URL; returns the affected row count.
    async fn update(
        &self,
        billboard_id: &str,
        label: &str,
        image_url: &str,
    ) -> Result<u64, DbError>;

    /// Delete by id; returns the affected row count.
    async fn delete(&self, billboard_id: &str) -> Result<u64, DbError>;
}

/// PostgreSQL-backed billboard repository
pub struct BillboardRepository {
    pool: DbPool,
}

impl BillboardRepository {
    pub fn new(pool: DbPool) -> Self {
        BillboardRepository { pool }
    }
}

fn billboard_from_row(row: &Row) -> Billboard {
    Billboard {
        id: row.get("id"),
        store_id: row.get("store_id"),
        label: row.get("label"),
        image_url: row.get("image_url"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

#[async_trait]
impl BillboardRecords for BillboardRepository {
    async fn find_in_store(
        &self,
        billboard_id: &str,
        store_id: &str,
    ) -> Result<Option<Billboard>, DbError> {
        let client = self.pool.get().await?;

        let row = client
            .query_opt(
                r#"
                SELECT id, store_id, label, image_url, created_at, updated_at
                FROM billboards
                WHERE id = $1 AND store_id = $2
                "#,
                &[&billboard_id, &store_id],
            )
            .await?;

        Ok(row.as_ref().map(billboard_from_row))
    }

    async fn list_for_store(&self, store_id: &str) -> Result<Vec<Billboard>, DbError> {
        let client = self.pool.get().await?;

        let rows = client
            .query(
                r#"
                SELECT id, store_id, label, image_url, created_at, updated_at
                FROM billboards
                WHERE store_id = $1
                ORDER BY created_at DESC
                "#,
                &[&store_id],
            )
            .await?;

        Ok(rows.iter().map(billboard_from_row).collect())
    }

    async fn create(
        &self,
        store_id: &str,
        label: &str,
        image_url: &str,
    ) -> Result<Billboard, DbError> {
        let client = self.pool.get().await?;
        let id = Uuid::new_v4().to_string();

        let row = client
            .query_one(
                r#"
                INSERT INTO billboards (id, store_id, label, image_url, created_at, updated_at)
                VALUES ($1, $2, $3, $4, now(), now())
                RETURNING id, store_id, label, image_url, created_at, updated_at
                "#,
                &[&id, &store_id, &label, &image_url],
            )
            .await?;

        let billboard = billboard_from_row(&row);
        info!(billboard_id = %billboard.id, store_id = %store_id, "Billboard created");
        Ok(billboard)
    }

    async fn image_url(&self, billboard_id: &str) -> Result<Option<String>, DbError> {
        let client = self.pool.get().await?;

        let row = client
            .query_opt(
                "SELECT image_url FROM billboards WHERE id = $1",
                &[&billboard_id],
            )
            .await?;

        Ok(row.map(|r| r.get("image_url")))
    }

    async fn update(
        &self,
        billboard_id: &str,
        label: &str,
        image_url: &str,
    ) -> Result<u64, DbError> {
        let client = self.pool.get().await?;

        let count = client
            .execute(
                r#"
                UPDATE billboards
                SET label = $2, image_url = $3, updated_at = now()
                WHERE id = $1
                "#,
                &[&billboard_id, &label, &image_url],
            )
            .await?;

        Ok(count)
    }

    async fn delete(&self, billboard_id: &str) -> Result<u64, DbError> {
        let client = self.pool.get().await?;

        let count = client
            .execute("DELETE FROM billboards WHERE id = $1", &[&billboard_id])
            .await?;

        Ok(count)
    }
}
