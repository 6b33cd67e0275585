//! SQLite adapter for the ReviewItemStore port
//!
//! Each item is stored as one row. The full item, including its audit
//! trail, is kept as JSON in `body`; `status` is duplicated into its own
//! column so listings can filter without decoding every row.

use application::{error::ApplicationError, ports::ReviewItemStore};
use async_trait::async_trait;
use domain::{ItemId, ReviewStatus, ReviewableItem};
use sqlx::SqlitePool;
use tracing::{debug, instrument};

use super::error::{corrupt, map_sqlx_error, to_i64};

/// SQLite implementation of the review item store
#[derive(Debug, Clone)]
pub struct SqliteReviewItemStore {
    pool: SqlitePool,
}

impl SqliteReviewItemStore {
    /// Create a new store on an already migrated pool
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReviewItemStore for SqliteReviewItemStore {
    #[instrument(skip(self, item), fields(item_id = %item.id()))]
    async fn insert(&self, item: &ReviewableItem) -> Result<(), ApplicationError> {
        sqlx::query(
            "INSERT INTO review_items
             (id, kind, title, status, cycle, version, body, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
        )
        .bind(item.id().to_string())
        .bind(item.kind().as_str())
        .bind(item.title())
        .bind(item.status().as_str())
        .bind(item.cycle())
        .bind(to_i64(item.version())?)
        .bind(encode(item)?)
        .bind(item.created_at().to_rfc3339())
        .bind(item.updated_at().to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        debug!("Item inserted");
        Ok(())
    }

    async fn get(&self, id: &ItemId) -> Result<Option<ReviewableItem>, ApplicationError> {
        let body: Option<(String,)> = sqlx::query_as("SELECT body FROM review_items WHERE id = $1")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        body.map(|(body,)| decode(&body)).transpose()
    }

    #[instrument(skip(self, item), fields(item_id = %item.id(), status = %item.status()))]
    async fn update(
        &self,
        item: &ReviewableItem,
        expected_version: u64,
    ) -> Result<(), ApplicationError> {
        let id = item.id().to_string();
        let result = sqlx::query(
            "UPDATE review_items
             SET title = $1, status = $2, cycle = $3, version = $4, body = $5, updated_at = $6
             WHERE id = $7 AND version = $8",
        )
        .bind(item.title())
        .bind(item.status().as_str())
        .bind(item.cycle())
        .bind(to_i64(item.version())?)
        .bind(encode(item)?)
        .bind(item.updated_at().to_rfc3339())
        .bind(&id)
        .bind(to_i64(expected_version)?)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        if result.rows_affected() == 1 {
            return Ok(());
        }

        let (exists,): (bool,) =
            sqlx::query_as("SELECT COUNT(*) > 0 FROM review_items WHERE id = $1")
                .bind(&id)
                .fetch_one(&self.pool)
                .await
                .map_err(map_sqlx_error)?;
        if !exists {
            return Err(ApplicationError::unknown("item", item.id()));
        }

        debug!(expected_version, "Stored item version moved on");
        Err(ApplicationError::Conflict(format!("item {id}")))
    }

    async fn list(&self) -> Result<Vec<ReviewableItem>, ApplicationError> {
        let rows: Vec<(String,)> =
            sqlx::query_as("SELECT body FROM review_items ORDER BY created_at, id")
                .fetch_all(&self.pool)
                .await
                .map_err(map_sqlx_error)?;

        rows.iter().map(|(body,)| decode(body)).collect()
    }

    async fn list_by_status(
        &self,
        status: ReviewStatus,
    ) -> Result<Vec<ReviewableItem>, ApplicationError> {
        let rows: Vec<(String,)> = sqlx::query_as(
            "SELECT body FROM review_items WHERE status = $1 ORDER BY created_at, id",
        )
        .bind(status.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        rows.iter().map(|(body,)| decode(body)).collect()
    }
}

fn encode(item: &ReviewableItem) -> Result<String, ApplicationError> {
    serde_json::to_string(item)
        .map_err(|e| ApplicationError::Internal(format!("Failed to serialize item: {e}")))
}

fn decode(body: &str) -> Result<ReviewableItem, ApplicationError> {
    serde_json::from_str(body).map_err(|e| corrupt("item body", e))
}
