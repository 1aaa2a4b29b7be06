// src/db.rs
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use std::time::Duration;

const SEARCH_QUERIES_SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS search_queries (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    query TEXT NOT NULL,
    result TEXT NOT NULL
)
"#;

pub async fn create_pool(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(30))
        .connect_with(options)
        .await?;

    init_schema(&pool).await?;

    tracing::info!("Connected to database: {}", database_url);
    Ok(pool)
}

/// Creates the `search_queries` table if it is missing. Existing rows are left
/// untouched, so this runs on every startup.
pub async fn init_schema(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    tracing::info!("Ensuring search_queries table exists...");

    sqlx::query(SEARCH_QUERIES_SCHEMA).execute(pool).await?;

    tracing::info!("Database schema ready");
    Ok(())
}
