// src/handlers/status.rs
use axum::{
    extract::{Extension, Query},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

use crate::handlers::ErrorResponse;
use crate::AppState;

pub const DEFAULT_HISTORY_LIMIT: u32 = 50;
pub const MAX_HISTORY_LIMIT: u32 = 500;

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<u32>,
}

/// GET /api/status - service health and the active routing table
pub async fn api_status(Extension(state): Extension<Arc<AppState>>) -> Json<serde_json::Value> {
    let db_status = match state.query_log.ping().await {
        Ok(_) => "healthy",
        Err(e) => {
            tracing::warn!("Database health check failed: {}", e);
            "unhealthy"
        }
    };
    let completion_status = if state.completion.is_some() {
        "configured"
    } else {
        "not_configured"
    };

    Json(json!({
        "status": "operational",
        "version": env!("CARGO_PKG_VERSION"),
        "services": {
            "database": db_status,
            "completion": completion_status,
        },
        "routes": state.routes,
    }))
}

/// GET /api/search-queries?limit=n - most recent logged chat exchanges
pub async fn recent_queries(
    Extension(state): Extension<Arc<AppState>>,
    Query(params): Query<HistoryQuery>,
) -> Response {
    let limit = params
        .limit
        .unwrap_or(DEFAULT_HISTORY_LIMIT)
        .clamp(1, MAX_HISTORY_LIMIT);

    match state.query_log.recent(limit).await {
        Ok(queries) => (StatusCode::OK, Json(json!({ "queries": queries }))).into_response(),
        Err(e) => {
            tracing::error!("Failed to load search queries: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("Failed to load queries")),
            )
                .into_response()
        }
    }
}
