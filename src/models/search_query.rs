// src/models/search_query.rs
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One logged chat exchange. `id` is assigned by SQLite and never reused.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct SearchQuery {
    pub id: i64,
    pub query: String,
    pub result: String,
}
