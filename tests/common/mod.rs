//! Shared fakes and request helpers for the gateway integration tests.
#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use relay_gateway::error::{StorageError, UpstreamError};
use relay_gateway::gemini_client::CompletionClient;
use relay_gateway::models::SearchQuery;
use relay_gateway::routes::RouteSpec;
use relay_gateway::services::{Forwarder, QueryLog, UpstreamReply};
use relay_gateway::{build_router, AppState};
use serde_json::Value;
use tower::ServiceExt;

pub const WEBHOOK_TARGET: &str = "http://automation.test/webhook";
pub const TRIGGER_TARGET: &str = "http://automation.test/trigger";

pub fn test_routes() -> Vec<RouteSpec> {
    vec![
        RouteSpec::webhook_relay(WEBHOOK_TARGET),
        RouteSpec::chat_completion(),
        RouteSpec::automation_trigger(TRIGGER_TARGET),
        RouteSpec::chat_echo(),
    ]
}

/// Answers every forward with the payload it was given, as JSON.
#[derive(Default)]
pub struct EchoForwarder {
    pub calls: Mutex<Vec<(String, Value)>>,
}

#[async_trait]
impl Forwarder for EchoForwarder {
    async fn forward(&self, url: &str, payload: &Value) -> Result<UpstreamReply, UpstreamError> {
        self.calls
            .lock()
            .unwrap()
            .push((url.to_string(), payload.clone()));
        Ok(UpstreamReply {
            status: 200,
            content_type: Some("application/json".to_string()),
            body: payload.to_string(),
        })
    }
}

/// Fails the first `failures` forwards with a 502, then answers with `body`.
pub struct FlakyForwarder {
    failures: usize,
    body: String,
    calls: AtomicUsize,
}

impl FlakyForwarder {
    pub fn new(failures: usize, body: &str) -> Self {
        Self {
            failures,
            body: body.to_string(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Forwarder for FlakyForwarder {
    async fn forward(&self, _url: &str, _payload: &Value) -> Result<UpstreamReply, UpstreamError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if call < self.failures {
            return Err(UpstreamError::Status {
                status: reqwest::StatusCode::BAD_GATEWAY,
                body: "upstream exploded".to_string(),
            });
        }
        Ok(UpstreamReply {
            status: 200,
            content_type: Some("text/plain".to_string()),
            body: self.body.clone(),
        })
    }
}

pub enum CompletionBehaviour {
    Text(String),
    NoText,
    Fail,
}

pub struct FakeCompletion {
    behaviour: CompletionBehaviour,
    pub prompts: Mutex<Vec<String>>,
}

impl FakeCompletion {
    pub fn new(behaviour: CompletionBehaviour) -> Self {
        Self {
            behaviour,
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn answering(text: &str) -> Self {
        Self::new(CompletionBehaviour::Text(text.to_string()))
    }
}

#[async_trait]
impl CompletionClient for FakeCompletion {
    async fn complete(&self, prompt: &str) -> Result<Option<String>, UpstreamError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        match &self.behaviour {
            CompletionBehaviour::Text(text) => Ok(Some(text.clone())),
            CompletionBehaviour::NoText => Ok(None),
            CompletionBehaviour::Fail => Err(UpstreamError::Status {
                status: reqwest::StatusCode::SERVICE_UNAVAILABLE,
                body: "quota exceeded".to_string(),
            }),
        }
    }
}

/// In-memory query log; ids count up from 1 like the SQLite table.
#[derive(Default)]
pub struct MemoryQueryLog {
    pub rows: Mutex<Vec<SearchQuery>>,
    pub fail_writes: bool,
}

impl MemoryQueryLog {
    pub fn failing() -> Self {
        Self {
            rows: Mutex::new(Vec::new()),
            fail_writes: true,
        }
    }

    pub fn rows(&self) -> Vec<SearchQuery> {
        self.rows.lock().unwrap().clone()
    }
}

#[async_trait]
impl QueryLog for MemoryQueryLog {
    async fn record(&self, query: &str, result: &str) -> Result<SearchQuery, StorageError> {
        if self.fail_writes {
            return Err(StorageError::Sqlx(sqlx::Error::PoolClosed));
        }
        let mut rows = self.rows.lock().unwrap();
        let row = SearchQuery {
            id: rows.last().map(|r| r.id + 1).unwrap_or(1),
            query: query.to_string(),
            result: result.to_string(),
        };
        rows.push(row.clone());
        Ok(row)
    }

    async fn recent(&self, limit: u32) -> Result<Vec<SearchQuery>, StorageError> {
        let rows = self.rows.lock().unwrap();
        Ok(rows.iter().rev().take(limit as usize).cloned().collect())
    }

    async fn ping(&self) -> Result<(), StorageError> {
        Ok(())
    }
}

pub fn app(
    forwarder: Arc<dyn Forwarder>,
    completion: Option<Arc<dyn CompletionClient>>,
    query_log: Arc<dyn QueryLog>,
) -> Router {
    app_with_history(forwarder, completion, query_log, false)
}

pub fn app_with_history(
    forwarder: Arc<dyn Forwarder>,
    completion: Option<Arc<dyn CompletionClient>>,
    query_log: Arc<dyn QueryLog>,
    expose_query_history: bool,
) -> Router {
    build_router(Arc::new(AppState {
        routes: test_routes(),
        forwarder,
        completion,
        query_log,
        expose_query_history,
    }))
}

pub struct TestResponse {
    pub status: StatusCode,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).expect("response body should be JSON")
    }

    pub fn text(&self) -> String {
        String::from_utf8(self.body.clone()).expect("response body should be UTF-8")
    }
}

pub async fn send(app: Router, request: Request<Body>) -> TestResponse {
    let response = app.oneshot(request).await.expect("failed to make request");
    let status = response.status();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("failed to read response body");
    TestResponse {
        status,
        content_type,
        body: body.to_vec(),
    }
}

pub async fn post_json(app: Router, uri: &str, body: &Value) -> TestResponse {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn get(app: Router, uri: &str) -> TestResponse {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}
