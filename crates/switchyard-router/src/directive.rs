// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Routing directive parsing and request rewriting.
//!
//! Callers tag a chat-completion payload with a `nim-llm-router` block:
//!
//! ```json
//! "nim-llm-router": {
//!     "policy": "task_router",
//!     "routing_strategy": "manual",
//!     "model": "Chatbot",
//!     "threshold": 0.5
//! }
//! ```
//!
//! Everything outside that block (messages, sampling parameters) is left alone,
//! except for `model`, which [`rewrite`] overwrites.

use serde_json::{Map, Value};
use switchyard_core::{ChatMessage, RouterError};

/// Top-level key holding the routing directive.
pub const DIRECTIVE_KEY: &str = "nim-llm-router";

/// How the backend is chosen within a policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoutingStrategy {
    /// Caller names the backend. An empty name means none was supplied.
    Manual(String),
    /// The policy's classification service picks the backend.
    Classifier,
}

impl RoutingStrategy {
    /// Parse the `routing_strategy` field. `triton` and `classifier` are synonyms.
    fn from_field(value: &str, model: Option<&str>) -> Option<Self> {
        match value.trim() {
            "manual" => Some(RoutingStrategy::Manual(model.unwrap_or_default().to_string())),
            "triton" | "classifier" => Some(RoutingStrategy::Classifier),
            _ => None,
        }
    }

    /// Label used in logs and responses.
    pub fn label(&self) -> &'static str {
        match self {
            RoutingStrategy::Manual(_) => "manual",
            RoutingStrategy::Classifier => "triton",
        }
    }
}

/// Per-request routing instructions.
#[derive(Debug, Clone, PartialEq)]
pub struct RoutingDirective {
    /// Policy to route under.
    pub policy: String,
    /// `None` when the strategy is absent or unrecognized.
    pub strategy: Option<RoutingStrategy>,
    /// Caller-supplied confidence threshold, if any. Currently inert.
    pub threshold: Option<f64>,
}

/// Extract and validate the routing directive from a request body.
pub fn parse(body: &Value) -> Result<RoutingDirective, RouterError> {
    let block = body
        .get(DIRECTIVE_KEY)
        .ok_or_else(|| {
            RouterError::MissingDirective(format!(
                "request body has no `{DIRECTIVE_KEY}` block; expected \
                 {{\"policy\": \"...\", \"routing_strategy\": \"manual|triton\", \"model\": \"...\"}}"
            ))
        })?
        .as_object()
        .ok_or_else(|| {
            RouterError::MissingDirective(format!("`{DIRECTIVE_KEY}` must be a JSON object"))
        })?;

    let policy = block
        .get("policy")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .ok_or_else(|| {
            RouterError::MissingDirective(format!("`{DIRECTIVE_KEY}.policy` is required"))
        })?;

    let model = block.get("model").and_then(Value::as_str);
    let strategy = block
        .get("routing_strategy")
        .and_then(Value::as_str)
        .and_then(|s| RoutingStrategy::from_field(s, model));

    Ok(RoutingDirective {
        policy: policy.to_string(),
        strategy,
        threshold: block.get("threshold").and_then(Value::as_f64),
    })
}

/// Copy of `body` without the routing block.
pub fn strip(body: &Value) -> Value {
    let mut cleaned = body.clone();
    if let Some(obj) = cleaned.as_object_mut() {
        obj.remove(DIRECTIVE_KEY);
    }
    cleaned
}

/// Copy of `body` without the routing block and with `model` set to `model_id`.
///
/// This is the only change the router makes to a caller's payload.
pub fn rewrite(body: &Value, model_id: &str) -> Value {
    let mut rewritten = strip(body);
    match rewritten.as_object_mut() {
        Some(obj) => {
            obj.insert("model".to_string(), Value::String(model_id.to_string()));
        }
        None => {
            let mut obj = Map::new();
            obj.insert("model".to_string(), Value::String(model_id.to_string()));
            rewritten = Value::Object(obj);
        }
    }
    rewritten
}

/// Ordered `{role, content}` view of the payload's `messages` array.
///
/// Missing fields become empty strings; structured content is rendered as
/// its JSON text.
pub fn extract_messages(body: &Value) -> Vec<ChatMessage> {
    let Some(messages) = body.get("messages").and_then(Value::as_array) else {
        return Vec::new();
    };

    messages
        .iter()
        .map(|m| ChatMessage {
            role: text_of(m.get("role")),
            content: text_of(m.get("content")),
        })
        .collect()
}

fn text_of(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}
