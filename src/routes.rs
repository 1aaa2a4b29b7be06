// src/routes.rs
//! Routing table: each entry maps an inbound path to its validation rule,
//! its outbound target and whether the exchange is written to the query log.

use serde::Serialize;
use serde_json::Value;

use crate::error::ValidationError;

/// Automation webhook the `/webhook` relay forwards to.
pub const N8N_WEBHOOK_URL: &str =
    "https://musipex.app.n8n.cloud/webhook/f8158f83-ea38-4184-aa46-6a8e947720a6";

/// Automation webhook the `/api/n8n-trigger` route forwards to.
pub const N8N_TRIGGER_URL: &str = "https://musipex.app.n8n.cloud/webhook/n8n-trigger";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Validation {
    /// Any JSON value is accepted, including `{}`.
    AnyJson,
    /// The body must carry a non-empty `message` string.
    RequireMessage,
}

impl Validation {
    /// Applies the rule and returns the message text when the rule extracts one.
    pub fn check(self, payload: &Value) -> Result<Option<String>, ValidationError> {
        match self {
            Validation::AnyJson => Ok(None),
            Validation::RequireMessage => match payload.get("message").and_then(Value::as_str) {
                Some(message) if !message.trim().is_empty() => Ok(Some(message.to_string())),
                _ => Err(ValidationError::MissingMessage),
            },
        }
    }
}

/// What the relay sends back when the automation call succeeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RelayReply {
    /// Echo the caller's own payload.
    OriginalPayload,
    /// Pass the upstream body through untouched.
    UpstreamBody,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Target {
    Automation {
        // n8n webhook URLs work as bearer capabilities; never echo them out
        #[serde(skip_serializing)]
        url: String,
        reply: RelayReply,
    },
    Completion,
    Echo,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteSpec {
    pub name: &'static str,
    pub path: String,
    pub validation: Validation,
    pub target: Target,
    pub persist: bool,
}

impl RouteSpec {
    pub fn webhook_relay(url: impl Into<String>) -> Self {
        Self {
            name: "webhook",
            path: "/webhook".to_string(),
            validation: Validation::AnyJson,
            target: Target::Automation {
                url: url.into(),
                reply: RelayReply::OriginalPayload,
            },
            persist: false,
        }
    }

    pub fn chat_completion() -> Self {
        Self {
            name: "chat",
            path: "/api/chat/".to_string(),
            validation: Validation::RequireMessage,
            target: Target::Completion,
            persist: true,
        }
    }

    pub fn automation_trigger(url: impl Into<String>) -> Self {
        Self {
            name: "n8n-trigger",
            path: "/api/n8n-trigger".to_string(),
            validation: Validation::AnyJson,
            target: Target::Automation {
                url: url.into(),
                reply: RelayReply::UpstreamBody,
            },
            persist: false,
        }
    }

    pub fn chat_echo() -> Self {
        Self {
            name: "chat-echo",
            path: "/api/chat".to_string(),
            validation: Validation::AnyJson,
            target: Target::Echo,
            persist: false,
        }
    }

    pub fn uses_completion(&self) -> bool {
        matches!(self.target, Target::Completion)
    }
}

/// The full table with the production endpoints.
pub fn default_routes() -> Vec<RouteSpec> {
    vec![
        RouteSpec::webhook_relay(N8N_WEBHOOK_URL),
        RouteSpec::chat_completion(),
        RouteSpec::automation_trigger(N8N_TRIGGER_URL),
        RouteSpec::chat_echo(),
    ]
}

/// Looks a default route up by its configuration name.
pub fn route_by_name(name: &str) -> Option<RouteSpec> {
    default_routes().into_iter().find(|route| route.name == name)
}
