// src/services/query_log.rs
//! Persistence of chat exchanges in the `search_queries` table.

use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::error::StorageError;
use crate::models::SearchQuery;

#[async_trait]
pub trait QueryLog: Send + Sync {
    /// Inserts one `(query, result)` row and returns it with its assigned id.
    async fn record(&self, query: &str, result: &str) -> Result<SearchQuery, StorageError>;

    /// Most recent rows first.
    async fn recent(&self, limit: u32) -> Result<Vec<SearchQuery>, StorageError>;

    async fn ping(&self) -> Result<(), StorageError>;
}

#[derive(Debug, Clone)]
pub struct SqliteQueryLog {
    pool: SqlitePool,
}

impl SqliteQueryLog {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl QueryLog for SqliteQueryLog {
    async fn record(&self, query: &str, result: &str) -> Result<SearchQuery, StorageError> {
        let inserted = sqlx::query("INSERT INTO search_queries (query, result) VALUES (?, ?)")
            .bind(query)
            .bind(result)
            .execute(&self.pool)
            .await?;

        let id = inserted.last_insert_rowid();
        tracing::debug!("Logged search query {} ({} chars)", id, query.len());

        Ok(SearchQuery {
            id,
            query: query.to_string(),
            result: result.to_string(),
        })
    }

    async fn recent(&self, limit: u32) -> Result<Vec<SearchQuery>, StorageError> {
        let rows = sqlx::query_as::<_, SearchQuery>(
            r#"
            SELECT id, query, result
            FROM search_queries
            ORDER BY id DESC
            LIMIT ?
            "#,
        )
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn ping(&self) -> Result<(), StorageError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
