// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Request routing pipeline.
//!
//! Order of operations: parse directive > resolve policy > select backend
//! (manual name or classifier index) > rewrite payload > proxy. Each stage
//! either hands off to the next or ends the request with a [`RouterError`].

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use strum::Display;
use switchyard_config::SwitchyardConfig;
use switchyard_core::{
    Backend, BackendAdapter, ClassifierAdapter, RoutedResponse, RouterError,
};
use tracing::{debug, info, warn};

use crate::classifier::{self, TritonClassifier};
use crate::directive::{self, RoutingDirective, RoutingStrategy};
use crate::proxy::HttpBackend;
use crate::registry::{Policy, Registry};

/// Pipeline stage, reported when a request fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum RouterStage {
    ParseDirective,
    ResolvePolicy,
    SelectBackend,
    RewriteRequest,
    Proxy,
    Done,
}

/// Backend chosen for a request, and the policy it came from.
#[derive(Debug, Clone, Copy)]
pub struct Selection<'a> {
    pub policy: &'a Policy,
    pub backend: &'a Backend,
}

/// Routes chat-completion requests to backends.
///
/// Holds no per-request state; a single instance serves concurrent requests.
#[derive(Clone)]
pub struct Router {
    registry: Arc<Registry>,
    classifier: Arc<dyn ClassifierAdapter>,
    backend: Arc<dyn BackendAdapter>,
    default_threshold: f64,
}

impl Router {
    pub fn new(
        registry: Arc<Registry>,
        classifier: Arc<dyn ClassifierAdapter>,
        backend: Arc<dyn BackendAdapter>,
    ) -> Self {
        Self {
            registry,
            classifier,
            backend,
            default_threshold: 0.5,
        }
    }

    /// Threshold used when a directive carries none.
    pub fn with_default_threshold(mut self, threshold: f64) -> Self {
        self.default_threshold = threshold;
        self
    }

    /// Build a router with HTTP adapters from a validated configuration.
    pub fn from_config(config: &SwitchyardConfig) -> Result<Self, RouterError> {
        let registry = Arc::new(Registry::from_config(config)?);
        let classifier = TritonClassifier::new(Duration::from_secs(
            config.router.classifier_timeout_secs,
        ))?;
        let backend = HttpBackend::new(Duration::from_secs(config.router.backend_timeout_secs))?;

        Ok(Self::new(registry, Arc::new(classifier), Arc::new(backend))
            .with_default_threshold(config.router.default_threshold))
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Route one request end to end and return the backend's response.
    pub async fn route(&self, body: Value) -> Result<RoutedResponse, RouterError> {
        let directive = directive::parse(&body).map_err(|e| failed(RouterStage::ParseDirective, e))?;

        let selection = self.select(&directive, &body).await?;
        let Selection { policy, backend } = selection;

        let rewritten = directive::rewrite(&body, &backend.model_id);
        debug!(stage = %RouterStage::RewriteRequest, model = %backend.model_id, "payload rewritten");

        let response = self
            .backend
            .forward(backend, &rewritten)
            .await
            .map_err(|e| failed(RouterStage::Proxy, e))?;

        info!(
            stage = %RouterStage::Done,
            policy = %policy.name,
            backend = %backend.name,
            model = %backend.model_id,
            "request routed"
        );

        Ok(RoutedResponse {
            body: response,
            model: backend.model_id.clone(),
            classifier_label: backend.name.clone(),
            policy: policy.name.clone(),
        })
    }

    /// Choose a backend for `body` without proxying.
    pub async fn select_backend(&self, body: &Value) -> Result<Selection<'_>, RouterError> {
        let directive = directive::parse(body).map_err(|e| failed(RouterStage::ParseDirective, e))?;
        self.select(&directive, body).await
    }

    async fn select(
        &self,
        directive: &RoutingDirective,
        body: &Value,
    ) -> Result<Selection<'_>, RouterError> {
        let policy = self
            .registry
            .lookup(&directive.policy)
            .map_err(|e| failed(RouterStage::ResolvePolicy, e))?;

        let strategy = directive
            .strategy
            .as_ref()
            .ok_or_else(|| failed(RouterStage::SelectBackend, RouterError::NoStrategy))?;

        let backend = match strategy {
            RoutingStrategy::Manual(name) => policy
                .backend_by_name(name)
                .map_err(|e| failed(RouterStage::SelectBackend, e))?,
            RoutingStrategy::Classifier => {
                let messages = directive::extract_messages(body);
                let conversation = classifier::serialize_conversation(&messages);
                debug!(
                    messages = messages.len(),
                    conversation_chars = conversation.chars().count(),
                    "conversation prepared for classification"
                );

                let text = classifier::last_message_content(&messages);
                let threshold = directive.threshold.unwrap_or(self.default_threshold);
                let index = classifier::classify(self.classifier.as_ref(), policy, text, threshold)
                    .await
                    .map_err(|e| failed(RouterStage::SelectBackend, e))?;

                policy
                    .backend_at(index)
                    .map_err(|e| failed(RouterStage::SelectBackend, e))?
            }
        };

        debug!(
            stage = %RouterStage::SelectBackend,
            strategy = strategy.label(),
            policy = %policy.name,
            backend = %backend.name,
            "backend selected"
        );

        Ok(Selection { policy, backend })
    }
}

fn failed(stage: RouterStage, err: RouterError) -> RouterError {
    warn!(stage = %stage, kind = %err.kind(), error = %err, "routing failed");
    err
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use serde_json::json;
    use switchyard_core::{AdapterType, PluginAdapter};
    use tokio::sync::Mutex;

    use super::*;

    struct FixedScores {
        scores: Vec<f64>,
        calls: AtomicUsize,
        seen: Mutex<Vec<(String, String)>>,
    }

    impl FixedScores {
        fn new(scores: Vec<f64>) -> Arc<Self> {
            Arc::new(Self {
                scores,
                calls: AtomicUsize::new(0),
                seen: Mutex::new(Vec::new()),
            })
        }
    }

    impl PluginAdapter for FixedScores {
        fn name(&self) -> &str {
            "fixed-scores"
        }
        fn adapter_type(&self) -> AdapterType {
            AdapterType::Classifier
        }
    }

    #[async_trait]
    impl ClassifierAdapter for FixedScores {
        async fn infer(&self, url: &str, text: &str) -> Result<Vec<f64>, RouterError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.seen.lock().await.push((url.to_string(), text.to_string()));
            Ok(self.scores.clone())
        }
    }

    struct Recorder {
        status: Option<u16>,
        requests: Mutex<Vec<(String, Value)>>,
    }

    impl Recorder {
        fn ok() -> Arc<Self> {
            Arc::new(Self {
                status: None,
                requests: Mutex::new(Vec::new()),
            })
        }

        fn failing(status: u16) -> Arc<Self> {
            Arc::new(Self {
                status: Some(status),
                requests: Mutex::new(Vec::new()),
            })
        }
    }

    impl PluginAdapter for Recorder {
        fn name(&self) -> &str {
            "recorder"
        }
        fn adapter_type(&self) -> AdapterType {
            AdapterType::Backend
        }
    }

    #[async_trait]
    impl BackendAdapter for Recorder {
        async fn forward(&self, backend: &Backend, body: &Value) -> Result<Value, RouterError> {
            self.requests
                .lock()
                .await
                .push((backend.name.clone(), body.clone()));
            match self.status {
                Some(status) => Err(RouterError::Backend {
                    status,
                    body: "upstream exploded".into(),
                }),
                None => Ok(json!({"choices": [{"message": {"content": "ok"}}], "served_by": backend.model_id})),
            }
        }
    }

    fn registry() -> Arc<Registry> {
        Arc::new(
            Registry::new(vec![Policy::new(
                "task_router",
                "http://classifier/v2/models/task_router_ensemble/infer",
                vec![
                    Backend::new("A", "http://a", "k", "model-a"),
                    Backend::new("B", "http://b", "k", "model-b"),
                    Backend::new("C", "http://c", "k", "model-c"),
                ],
            )])
            .unwrap(),
        )
    }

    fn router(classifier: Arc<FixedScores>, backend: Arc<Recorder>) -> Router {
        Router::new(registry(), classifier, backend)
    }

    fn triton_request(text: &str) -> Value {
        json!({
            "model": "",
            "messages": [
                {"role": "system", "content": "be helpful"},
                {"role": "user", "content": text}
            ],
            "max_tokens": 128,
            "nim-llm-router": {"policy": "task_router", "routing_strategy": "triton"}
        })
    }

    #[tokio::test]
    async fn classifier_strategy_picks_highest_score() {
        let classifier = FixedScores::new(vec![0.1, 0.7, 0.2]);
        let backend = Recorder::ok();
        let router = router(classifier.clone(), backend.clone());

        let routed = router.route(triton_request("write a haiku")).await.unwrap();
        assert_eq!(routed.classifier_label, "B");
        assert_eq!(routed.model, "model-b");
        assert_eq!(routed.policy, "task_router");
        assert_eq!(routed.body["served_by"], "model-b");

        let seen = classifier.seen.lock().await;
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].0, "http://classifier/v2/models/task_router_ensemble/infer");
        assert_eq!(seen[0].1, "write a haiku");
    }

    #[tokio::test]
    async fn manual_strategy_skips_classifier() {
        let classifier = FixedScores::new(vec![1.0, 0.0, 0.0]);
        let backend = Recorder::ok();
        let router = router(classifier.clone(), backend.clone());

        let body = json!({
            "messages": [{"role": "user", "content": "hi"}],
            "nim-llm-router": {"policy": "task_router", "routing_strategy": "manual", "model": "B"}
        });
        let routed = router.route(body).await.unwrap();

        assert_eq!(routed.classifier_label, "B");
        assert_eq!(classifier.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn threshold_does_not_change_selection() {
        let backend = Recorder::ok();
        let router = router(FixedScores::new(vec![0.2, 0.3]), backend.clone())
            .with_default_threshold(0.95);

        let body = json!({
            "messages": [{"role": "user", "content": "hi"}],
            "nim-llm-router": {"policy": "task_router", "routing_strategy": "triton", "threshold": 0.99}
        });
        let routed = router.route(body).await.unwrap();

        assert_eq!(routed.classifier_label, "B");
        let requests = backend.requests.lock().await;
        assert_eq!(requests[0].0, "B");
        assert_eq!(requests[0].1["model"], "model-b");
    }

    #[tokio::test]
    async fn request_without_messages_classifies_empty_text() {
        let classifier = FixedScores::new(vec![0.2, 0.3]);
        let router = router(classifier.clone(), Recorder::ok());

        let body = json!({
            "nim-llm-router": {"policy": "task_router", "routing_strategy": "triton"}
        });
        let routed = router.route(body).await.unwrap();

        assert_eq!(routed.classifier_label, "B");
        let seen = classifier.seen.lock().await;
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].1, "");
    }

    #[tokio::test]
    async fn tie_goes_to_first_backend() {
        let router = router(FixedScores::new(vec![0.4, 0.4, 0.2]), Recorder::ok());
        let routed = router.route(triton_request("x")).await.unwrap();
        assert_eq!(routed.classifier_label, "A");
    }

    #[tokio::test]
    async fn index_beyond_backends_is_out_of_range() {
        let backend = Recorder::ok();
        let router = router(FixedScores::new(vec![0.0, 0.0, 0.0, 0.9]), backend.clone());
        let err = router.route(triton_request("x")).await.unwrap_err();
        assert!(matches!(err, RouterError::IndexOutOfRange { index: 3, len: 3, .. }));
        assert!(backend.requests.lock().await.is_empty());
    }

    #[tokio::test]
    async fn unknown_policy_fails_before_any_call() {
        let classifier = FixedScores::new(vec![1.0]);
        let backend = Recorder::ok();
        let router = router(classifier.clone(), backend.clone());

        let body = json!({"nim-llm-router": {"policy": "nope", "routing_strategy": "triton"}});
        let err = router.route(body).await.unwrap_err();

        assert!(matches!(err, RouterError::UnknownPolicy { .. }));
        assert_eq!(classifier.calls.load(Ordering::SeqCst), 0);
        assert!(backend.requests.lock().await.is_empty());
    }

    #[tokio::test]
    async fn missing_directive_is_rejected() {
        let router = router(FixedScores::new(vec![1.0]), Recorder::ok());
        let err = router
            .route(json!({"messages": [{"role": "user", "content": "hi"}]}))
            .await
            .unwrap_err();
        assert!(matches!(err, RouterError::MissingDirective(_)));
    }

    #[tokio::test]
    async fn absent_strategy_is_no_strategy() {
        let router = router(FixedScores::new(vec![1.0]), Recorder::ok());
        let err = router
            .route(json!({"nim-llm-router": {"policy": "task_router"}}))
            .await
            .unwrap_err();
        assert!(matches!(err, RouterError::NoStrategy));
    }

    #[tokio::test]
    async fn manual_unknown_backend_is_rejected() {
        let router = router(FixedScores::new(vec![1.0]), Recorder::ok());
        for model in [json!("Z"), json!(null)] {
            let body = json!({
                "nim-llm-router": {"policy": "task_router", "routing_strategy": "manual", "model": model}
            });
            let err = router.route(body).await.unwrap_err();
            assert!(matches!(err, RouterError::UnknownBackend { .. }), "got {err:?}");
        }
    }

    #[tokio::test]
    async fn forwarded_body_is_rewritten() {
        let backend = Recorder::ok();
        let router = router(FixedScores::new(vec![0.0, 0.0, 1.0]), backend.clone());
        router.route(triton_request("summarize this")).await.unwrap();

        let requests = backend.requests.lock().await;
        let (name, body) = &requests[0];
        assert_eq!(name, "C");
        assert_eq!(body["model"], "model-c");
        assert_eq!(body["max_tokens"], 128);
        assert_eq!(body["messages"][1]["content"], "summarize this");
        assert!(body.get(directive::DIRECTIVE_KEY).is_none());
    }

    #[tokio::test]
    async fn backend_error_passes_through() {
        let router = router(FixedScores::new(vec![1.0, 0.0, 0.0]), Recorder::failing(503));
        let err = router.route(triton_request("x")).await.unwrap_err();
        assert!(matches!(err, RouterError::Backend { status: 503, ref body } if body == "upstream exploded"));
    }

    #[tokio::test]
    async fn select_backend_does_not_proxy() {
        let backend = Recorder::ok();
        let router = router(FixedScores::new(vec![0.2, 0.9, 0.1]), backend.clone());
        let selection = router.select_backend(&triton_request("x")).await.unwrap();
        assert_eq!(selection.backend.name, "B");
        assert_eq!(selection.policy.name, "task_router");
        assert!(backend.requests.lock().await.is_empty());
    }

    #[test]
    fn stage_names_are_snake_case() {
        assert_eq!(RouterStage::ParseDirective.to_string(), "parse_directive");
        assert_eq!(RouterStage::Proxy.to_string(), "proxy");
    }
}
