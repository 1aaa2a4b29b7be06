// src/services/forwarder.rs
//! Single-shot JSON POST to an automation webhook.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use crate::error::UpstreamError;

/// Successful upstream answer, kept raw so it can be relayed byte for byte.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamReply {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: String,
}

#[async_trait]
pub trait Forwarder: Send + Sync {
    async fn forward(&self, url: &str, payload: &Value) -> Result<UpstreamReply, UpstreamError>;
}

#[derive(Debug, Clone, Default)]
pub struct HttpForwarder {
    client: Client,
}

impl HttpForwarder {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }
}

#[async_trait]
impl Forwarder for HttpForwarder {
    async fn forward(&self, url: &str, payload: &Value) -> Result<UpstreamReply, UpstreamError> {
        let response = self.client.post(url).json(payload).send().await?;

        let status = response.status();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        let body = response.text().await?;

        if !status.is_success() {
            return Err(UpstreamError::Status { status, body });
        }

        tracing::debug!(
            "Upstream {} answered {} ({} bytes)",
            url,
            status.as_u16(),
            body.len()
        );

        Ok(UpstreamReply {
            status: status.as_u16(),
            content_type,
            body,
        })
    }
}
