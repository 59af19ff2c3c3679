use chrono::Utc;
use sqlx::{Row, SqlitePool};

use crate::repository::{DurableStore, StorageError};

/// One row of the `durable_kv` table, read and replaced as a whole.
#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
    key: String,
}

impl SqliteStore {
    #[must_use]
    pub fn new(pool: SqlitePool, key: impl Into<String>) -> Self {
        Self {
            pool,
            key: key.into(),
        }
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }
}

#[async_trait::async_trait]
impl DurableStore for SqliteStore {
    async fn read_all(&self) -> Result<Option<Vec<u8>>, StorageError> {
        let row = sqlx::query(
            r"
                SELECT value
                FROM durable_kv
                WHERE key = ?1
            ",
        )
        .bind(self.key.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        row.map(|row| {
            row.try_get::<Vec<u8>, _>("value")
                .map_err(|e| StorageError::Serialization(e.to_string()))
        })
        .transpose()
    }

    async fn write_all(&self, bytes: &[u8]) -> Result<(), StorageError> {
        sqlx::query(
            r"
                INSERT INTO durable_kv (key, value, updated_at)
                VALUES (?1, ?2, ?3)
                ON CONFLICT(key) DO UPDATE SET
                    value = excluded.value,
                    updated_at = excluded.updated_at
            ",
        )
        .bind(self.key.as_str())
        .bind(bytes)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        tracing::debug!(key = %self.key, bytes = bytes.len(), "durable value replaced");
        Ok(())
    }
}
