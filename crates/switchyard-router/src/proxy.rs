// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Forwarding of rewritten chat-completion requests to the chosen backend.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use switchyard_core::{AdapterType, Backend, BackendAdapter, PluginAdapter, RouterError};
use tracing::{debug, warn};

/// OpenAI-compatible chat-completions client.
///
/// One call per request: no retries, no streaming. A non-success status is
/// handed back verbatim as [`RouterError::Backend`].
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
}

impl HttpBackend {
    /// Creates a backend client whose calls time out after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self, RouterError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| RouterError::Config(format!("failed to build backend HTTP client: {e}")))?;

        Ok(Self { client })
    }
}

impl PluginAdapter for HttpBackend {
    fn name(&self) -> &str {
        "http-backend"
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Backend
    }
}

#[async_trait]
impl BackendAdapter for HttpBackend {
    async fn forward(
        &self,
        backend: &Backend,
        body: &serde_json::Value,
    ) -> Result<serde_json::Value, RouterError> {
        let url = backend.completions_url();
        let transport = |message: String, source: Option<reqwest::Error>| {
            RouterError::BackendTransport {
                backend: backend.name.clone(),
                message,
                source: source.map(|e| Box::new(e) as Box<dyn std::error::Error + Send + Sync>),
            }
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(backend.bearer())
            .json(body)
            .send()
            .await
            .map_err(|e| transport(format!("HTTP request to {url} failed: {e}"), Some(e)))?;

        let status = response.status();
        debug!(status = %status, backend = %backend.name, "backend response received");

        let text = response
            .text()
            .await
            .map_err(|e| transport(format!("failed to read response body: {e}"), Some(e)))?;

        if !status.is_success() {
            warn!(status = %status, backend = %backend.name, "backend returned error status");
            return Err(RouterError::Backend {
                status: status.as_u16(),
                body: text,
            });
        }

        serde_json::from_str(&text).map_err(|e| RouterError::BackendTransport {
            backend: backend.name.clone(),
            message: format!("response body is not JSON: {e}"),
            source: Some(Box::new(e)),
        })
    }
}
