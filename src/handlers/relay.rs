// src/handlers/relay.rs
//! Pass-through relays to automation webhooks.

use axum::{
    extract::Extension,
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
};
use serde_json::Value;
use std::sync::Arc;

use crate::handlers::ErrorResponse;
use crate::routes::{RelayReply, Validation};
use crate::AppState;

/// Per-route settings for a relay, attached to the route as an extension.
#[derive(Debug, Clone)]
pub struct RelayRoute {
    pub name: &'static str,
    pub url: String,
    pub reply: RelayReply,
    pub validation: Validation,
}

/// POST handler shared by `/webhook` and `/api/n8n-trigger`.
pub async fn relay(
    Extension(state): Extension<Arc<AppState>>,
    Extension(route): Extension<RelayRoute>,
    Json(payload): Json<Value>,
) -> Response {
    if let Err(e) = route.validation.check(&payload) {
        return (StatusCode::BAD_REQUEST, Json(ErrorResponse::new(e.to_string()))).into_response();
    }

    tracing::info!(route = route.name, "Received webhook data: {}", payload);

    match state.forwarder.forward(&route.url, &payload).await {
        Ok(upstream) => {
            tracing::info!(
                route = route.name,
                upstream_status = upstream.status,
                "n8n response: {}",
                upstream.body
            );

            match route.reply {
                RelayReply::OriginalPayload => (StatusCode::OK, Json(payload)).into_response(),
                RelayReply::UpstreamBody => {
                    let content_type = upstream
                        .content_type
                        .unwrap_or_else(|| "text/plain; charset=utf-8".to_string());
                    (
                        StatusCode::OK,
                        [(header::CONTENT_TYPE, content_type)],
                        upstream.body,
                    )
                        .into_response()
                }
            }
        }
        Err(e) => {
            tracing::error!(route = route.name, url = %route.url, "Error sending to n8n: {}", e);

            match route.reply {
                RelayReply::OriginalPayload => {
                    (StatusCode::INTERNAL_SERVER_ERROR, "Error sending data to n8n").into_response()
                }
                RelayReply::UpstreamBody => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse::new("Failed to trigger n8n workflow")),
                )
                    .into_response(),
            }
        }
    }
}
