use std::net::SocketAddr;
use std::sync::Arc;

use relay_gateway::config::Config;
use relay_gateway::gemini_client::{CompletionClient, GeminiClient};
use relay_gateway::services::{HttpForwarder, SqliteQueryLog};
use relay_gateway::{build_router, db, AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    init_logging()?;

    // Missing secrets or bad values stop the process before anything binds
    let config = Config::from_env().map_err(|e| {
        tracing::error!("Invalid configuration: {}", e);
        e
    })?;

    let pool = db::create_pool(&config.database_url).await.map_err(|e| {
        tracing::error!("Failed to open database {}: {}", config.database_url, e);
        e
    })?;

    let completion: Option<Arc<dyn CompletionClient>> = match config.gemini_api_key.clone() {
        Some(api_key) if config.needs_completion() => {
            tracing::info!("Initializing Gemini AI client...");
            Some(Arc::new(GeminiClient::new(api_key)) as Arc<dyn CompletionClient>)
        }
        _ => {
            tracing::info!("No completion route enabled, Gemini AI client not created");
            None
        }
    };

    let shared_state = Arc::new(AppState {
        routes: config.routes.clone(),
        forwarder: Arc::new(HttpForwarder::new()),
        completion,
        expose_query_history: config.expose_query_history,
        query_log: Arc::new(SqliteQueryLog::new(pool)),
    });

    let app = build_router(shared_state);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port)).await?;
    tracing::info!("Server listening at http://localhost:{}", config.port);

    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>()).await?;
    Ok(())
}

fn init_logging() -> Result<(), Box<dyn std::error::Error>> {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

    let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cfg!(debug_assertions) {
            "debug,relay_gateway=trace,sqlx=info,reqwest=info,hyper=info,tower=info".to_string()
        } else {
            "info,relay_gateway=info,sqlx=warn,reqwest=warn,hyper=warn,tower=warn".to_string()
        }
    });

    let env_filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(&log_level))?;

    let fmt_layer = if std::env::var("LOG_FORMAT").as_deref() == Ok("json") {
        fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(false)
            .with_target(true)
            .with_thread_ids(true)
            .boxed()
    } else {
        fmt::layer()
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .boxed()
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();

    tracing::info!("relay_gateway {} starting up", env!("CARGO_PKG_VERSION"));
    tracing::info!("Log level: {}", log_level);
    Ok(())
}
