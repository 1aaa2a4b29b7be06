// lib.rs - HTTP gateway that relays webhooks to automation endpoints and
// chat messages to a completion service, logging chat exchanges in SQLite.
pub mod config;
pub mod db;
pub mod error;
pub mod gemini_client;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

use axum::{
    extract::Extension,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use crate::gemini_client::CompletionClient;
use crate::handlers::{chat::ChatRoute, relay::RelayRoute};
use crate::routes::{RouteSpec, Target};
use crate::services::{Forwarder, QueryLog};

/// Shared handler context, built once at startup and injected through an Extension layer.
pub struct AppState {
    pub routes: Vec<RouteSpec>,
    pub forwarder: Arc<dyn Forwarder>,
    pub completion: Option<Arc<dyn CompletionClient>>,
    pub query_log: Arc<dyn QueryLog>,
    pub expose_query_history: bool,
}

/// Builds the router from the state's routing table plus the status endpoints.
pub fn build_router(state: Arc<AppState>) -> Router {
    let mut app = Router::new().route("/api/status", get(handlers::status::api_status));

    if state.expose_query_history {
        tracing::warn!("Query history is exposed at GET /api/search-queries");
        app = app.route("/api/search-queries", get(handlers::status::recent_queries));
    }

    for route in &state.routes {
        let method_router = match &route.target {
            Target::Automation { url, reply } => {
                post(handlers::relay::relay).layer(Extension(RelayRoute {
                    name: route.name,
                    url: url.clone(),
                    reply: *reply,
                    validation: route.validation,
                }))
            }
            Target::Completion => post(handlers::chat::chat).layer(Extension(ChatRoute {
                name: route.name,
                validation: route.validation,
                persist: route.persist,
            })),
            Target::Echo => post(handlers::chat::echo),
        };

        tracing::info!("Route {} -> POST {}", route.name, route.path);
        app = app.route(&route.path, method_router);
    }

    app.layer(axum::middleware::from_fn(middleware::logging::request_logging_middleware))
        .layer(CorsLayer::permissive())
        .layer(Extension(state))
}
