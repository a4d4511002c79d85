// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end routing over real HTTP.
//!
//! `TestHarness` starts two wiremock servers, one standing in for the
//! classification service and one for every backend, and wires a
//! [`Router`] with the real HTTP adapters against them.

use std::sync::Arc;
use std::time::Duration;

use serde_json::{json, Value};
use switchyard_core::{Backend, RouterError};
use switchyard_router::{HttpBackend, Policy, Registry, Router, TritonClassifier};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Credential every harness backend expects.
pub const TEST_API_KEY: &str = "test-key";

/// Builder for creating test environments with configurable options.
pub struct TestHarnessBuilder {
    policy: String,
    backends: Vec<String>,
    classifier_timeout: Duration,
    backend_timeout: Duration,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            policy: "task_router".to_string(),
            backends: vec!["A".into(), "B".into(), "C".into()],
            classifier_timeout: Duration::from_secs(5),
            backend_timeout: Duration::from_secs(10),
        }
    }

    /// Name of the single policy in the harness registry.
    pub fn with_policy(mut self, name: &str) -> Self {
        self.policy = name.to_string();
        self
    }

    /// Backend names, in classifier index order.
    pub fn with_backends(mut self, names: &[&str]) -> Self {
        self.backends = names.iter().map(|n| n.to_string()).collect();
        self
    }

    pub fn with_timeouts(mut self, classifier: Duration, backend: Duration) -> Self {
        self.classifier_timeout = classifier;
        self.backend_timeout = backend;
        self
    }

    /// Start the mock servers and build the router.
    pub async fn build(self) -> Result<TestHarness, RouterError> {
        let classifier_server = MockServer::start().await;
        let backend_server = MockServer::start().await;

        let classifier_path = format!("/v2/models/{}_ensemble/infer", self.policy);
        let backends = self
            .backends
            .iter()
            .map(|name| {
                Backend::new(
                    name.as_str(),
                    backend_server.uri(),
                    TEST_API_KEY,
                    model_for(name),
                )
            })
            .collect();
        let policy = Policy::new(
            &self.policy,
            format!("{}{classifier_path}", classifier_server.uri()),
            backends,
        );

        let registry = Arc::new(Registry::new(vec![policy])?);
        let router = Router::new(
            registry,
            Arc::new(TritonClassifier::new(self.classifier_timeout)?),
            Arc::new(HttpBackend::new(self.backend_timeout)?),
        );

        Ok(TestHarness {
            classifier: classifier_server,
            backend: backend_server,
            classifier_path,
            policy: self.policy,
            router: Arc::new(router),
        })
    }
}

/// Model identifier the harness assigns to a backend name.
pub fn model_for(name: &str) -> String {
    format!("test/{}", name.to_lowercase().replace(' ', "-"))
}

/// A router wired to mock HTTP services.
pub struct TestHarness {
    pub classifier: MockServer,
    pub backend: MockServer,
    classifier_path: String,
    policy: String,
    pub router: Arc<Router>,
}

impl TestHarness {
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// Harness with the default `task_router` policy and backends A, B, C.
    pub async fn new() -> Result<Self, RouterError> {
        Self::builder().build().await
    }

    pub fn policy(&self) -> &str {
        &self.policy
    }

    /// Answer every classification call with `scores`.
    pub async fn mount_scores(&self, scores: &[f64]) {
        Mock::given(method("POST"))
            .and(path(self.classifier_path.as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "model_name": format!("{}_ensemble", self.policy),
                "outputs": [{
                    "name": "OUTPUT",
                    "datatype": "FP32",
                    "shape": [1, scores.len()],
                    "data": scores
                }]
            })))
            .mount(&self.classifier)
            .await;
    }

    /// Fail every classification call with `status`.
    pub async fn mount_classifier_error(&self, status: u16) {
        Mock::given(method("POST"))
            .and(path(self.classifier_path.as_str()))
            .respond_with(ResponseTemplate::new(status).set_body_string("classifier unavailable"))
            .mount(&self.classifier)
            .await;
    }

    /// Answer every authenticated completion call with `body`.
    pub async fn mount_completion(&self, body: Value) {
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("authorization", format!("Bearer {TEST_API_KEY}").as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&self.backend)
            .await;
    }

    /// Fail every completion call with `status` and a verbatim `body`.
    pub async fn mount_backend_error(&self, status: u16, body: &str) {
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .mount(&self.backend)
            .await;
    }

    /// Bodies received by the backend server, parsed as JSON.
    pub async fn backend_requests(&self) -> Vec<Value> {
        received_json(&self.backend).await
    }

    /// Bodies received by the classifier server, parsed as JSON.
    pub async fn classifier_requests(&self) -> Vec<Value> {
        received_json(&self.classifier).await
    }
}

async fn received_json(server: &MockServer) -> Vec<Value> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter_map(|r| serde_json::from_slice(&r.body).ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn harness_routes_over_http() {
        let harness = TestHarness::new().await.unwrap();
        harness.mount_scores(&[0.1, 0.7, 0.2]).await;
        harness
            .mount_completion(json!({"choices": [{"message": {"content": "ok"}}]}))
            .await;

        let routed = harness
            .router
            .route(crate::fixtures::triton_request("task_router", "hello"))
            .await
            .unwrap();
        assert_eq!(routed.classifier_label, "B");
        assert_eq!(routed.model, "test/b");

        let sent = harness.backend_requests().await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0]["model"], "test/b");

        let classified = harness.classifier_requests().await;
        assert_eq!(classified[0]["inputs"][0]["data"][0][0], "hello");
    }

    #[test]
    fn model_names_are_slugged() {
        assert_eq!(model_for("Code Generation"), "test/code-generation");
    }
}
