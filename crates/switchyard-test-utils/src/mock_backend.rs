// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock downstream model endpoint.
//!
//! `MockBackend` implements `BackendAdapter`, capturing every forwarded
//! payload so tests can inspect exactly what would have gone over the wire.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::sync::Mutex;

use switchyard_core::{AdapterType, Backend, BackendAdapter, PluginAdapter, RouterError};

/// One payload forwarded to a [`MockBackend`].
#[derive(Debug, Clone, PartialEq)]
pub struct ForwardedRequest {
    /// Registry name of the target backend.
    pub backend: String,
    /// URL the request would have been posted to.
    pub url: String,
    pub body: Value,
}

/// A mock backend adapter with queued replies.
///
/// When the queue is empty, a minimal chat completion naming the target
/// backend's model is returned.
pub struct MockBackend {
    replies: Arc<Mutex<VecDeque<Result<Value, (u16, String)>>>>,
    forwarded: Arc<Mutex<Vec<ForwardedRequest>>>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self {
            replies: Arc::new(Mutex::new(VecDeque::new())),
            forwarded: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Queue a successful reply body.
    pub async fn push_reply(&self, body: Value) {
        self.replies.lock().await.push_back(Ok(body));
    }

    /// Queue a non-success reply.
    pub async fn push_error(&self, status: u16, body: impl Into<String>) {
        self.replies.lock().await.push_back(Err((status, body.into())));
    }

    /// Every payload forwarded so far, oldest first.
    pub async fn forwarded(&self) -> Vec<ForwardedRequest> {
        self.forwarded.lock().await.clone()
    }
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// Minimal OpenAI-style completion body.
pub fn completion(model: &str, content: &str) -> Value {
    json!({
        "id": "chatcmpl-mock",
        "object": "chat.completion",
        "model": model,
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": content},
            "finish_reason": "stop"
        }]
    })
}

impl PluginAdapter for MockBackend {
    fn name(&self) -> &str {
        "mock-backend"
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Backend
    }
}

#[async_trait]
impl BackendAdapter for MockBackend {
    async fn forward(&self, backend: &Backend, body: &Value) -> Result<Value, RouterError> {
        self.forwarded.lock().await.push(ForwardedRequest {
            backend: backend.name.clone(),
            url: backend.completions_url(),
            body: body.clone(),
        });

        match self.replies.lock().await.pop_front() {
            Some(Ok(reply)) => Ok(reply),
            Some(Err((status, body))) => Err(RouterError::Backend { status, body }),
            None => Ok(completion(&backend.model_id, "mock response")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn records_and_replies() {
        let mock = MockBackend::new();
        mock.push_error(500, "boom").await;
        let backend = Backend::new("A", "http://a/", "k", "model-a");

        let err = mock.forward(&backend, &json!({"n": 1})).await.unwrap_err();
        assert!(matches!(err, RouterError::Backend { status: 500, .. }));

        let ok = mock.forward(&backend, &json!({"n": 2})).await.unwrap();
        assert_eq!(ok["model"], "model-a");

        let forwarded = mock.forwarded().await;
        assert_eq!(forwarded.len(), 2);
        assert_eq!(forwarded[0].url, "http://a/v1/chat/completions");
        assert_eq!(forwarded[1].body["n"], 2);
    }
}
