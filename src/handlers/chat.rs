// src/handlers/chat.rs
use axum::{
    extract::Extension,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

use crate::handlers::ErrorResponse;
use crate::routes::Validation;
use crate::AppState;

/// Reply used when the completion service answers without any candidate text.
pub const AI_FALLBACK_REPLY: &str = "AI response not found.";

#[derive(Debug, Clone)]
pub struct ChatRoute {
    pub name: &'static str,
    pub validation: Validation,
    pub persist: bool,
}

#[derive(Debug, Serialize)]
pub struct ChatReply {
    pub reply: String,
}

#[derive(Debug, Serialize)]
pub struct EchoReply {
    pub response: String,
}

fn message_text(payload: &Value) -> Option<String> {
    payload
        .get("message")
        .and_then(Value::as_str)
        .map(str::to_owned)
}

/// POST /api/chat/ - forward the message to the completion service and log the exchange
pub async fn chat(
    Extension(state): Extension<Arc<AppState>>,
    Extension(route): Extension<ChatRoute>,
    Json(payload): Json<Value>,
) -> Response {
    let message = match route.validation.check(&payload) {
        Ok(extracted) => extracted.or_else(|| message_text(&payload)).unwrap_or_default(),
        Err(e) => {
            return (StatusCode::BAD_REQUEST, Json(ErrorResponse::new(e.to_string()))).into_response();
        }
    };

    let Some(completion) = state.completion.as_ref() else {
        tracing::error!(route = route.name, "No completion client configured");
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new("AI service is not configured")),
        )
            .into_response();
    };

    let reply = match completion.complete(&message).await {
        Ok(Some(text)) => text,
        Ok(None) => {
            // The service answered 2xx but without candidate text. The caller
            // still gets a 200; only this log line tells the two cases apart.
            tracing::warn!(route = route.name, "AI response had no candidate text, using fallback reply");
            AI_FALLBACK_REPLY.to_string()
        }
        Err(e) => {
            tracing::error!(route = route.name, "Error calling AI service: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("Failed to get a response from the AI service")),
            )
                .into_response();
        }
    };

    if route.persist {
        match state.query_log.record(&message, &reply).await {
            Ok(row) => tracing::info!(route = route.name, "Saved search query {}", row.id),
            Err(e) => {
                tracing::error!(route = route.name, "Failed to save search query: {}", e);
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse::new("Failed to save query")),
                )
                    .into_response();
            }
        }
    }

    (StatusCode::OK, Json(ChatReply { reply })).into_response()
}

/// POST /api/chat - local echo, no network or storage
pub async fn echo(Json(payload): Json<Value>) -> Json<EchoReply> {
    let message = message_text(&payload).unwrap_or_default();
    Json(EchoReply {
        response: format!("You said: {}", message),
    })
}
