use async_trait::async_trait;
use sqlx::MySqlPool;
use tracing::error;

use super::{BlobStore, StoreError};

/// Blob store backed by the `app_storage` table (see `db::ensure_schema`).
#[derive(Clone)]
pub struct MySqlBlobStore {
    pool: MySqlPool,
}

impl MySqlBlobStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BlobStore for MySqlBlobStore {
    async fn load(&self, key: &str) -> Result<Option<String>, StoreError> {
        sqlx::query_scalar::<_, String>(
            r#"
            SELECT payload
            FROM app_storage
            WHERE storage_key = ?
            "#,
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!(error = %e, key, "Failed to load blob");
            StoreError::Backend(e.to_string())
        })
    }

    async fn save(&self, key: &str, value: String) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO app_storage (storage_key, payload)
            VALUES (?, ?)
            ON DUPLICATE KEY UPDATE payload = VALUES(payload)
            "#,
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!(error = %e, key, "Failed to save blob");
            StoreError::Backend(e.to_string())
        })?;

        Ok(())
    }
}
