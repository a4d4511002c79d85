// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared registries, routers and request bodies for tests.

use std::sync::Arc;

use serde_json::{json, Value};
use switchyard_core::Backend;
use switchyard_router::{Policy, Registry, Router};

use crate::mock_backend::MockBackend;
use crate::mock_classifier::MockClassifier;

/// Policy name used by the fixture registry.
pub const TASK_POLICY: &str = "task_router";

/// Three backends `A`, `B`, `C` with models `model-a`..`model-c`.
pub fn abc_policy() -> Policy {
    Policy::new(
        TASK_POLICY,
        "http://router-server:8000/v2/models/task_router_ensemble/infer",
        vec![
            Backend::new("A", "http://backend-a", "key-a", "model-a"),
            Backend::new("B", "http://backend-b", "key-b", "model-b"),
            Backend::new("C", "http://backend-c", "key-c", "model-c"),
        ],
    )
}

pub fn abc_registry() -> Arc<Registry> {
    // Fixed input; Registry::new only rejects malformed policy sets.
    Arc::new(Registry::new(vec![abc_policy()]).unwrap_or_default())
}

/// Router over [`abc_registry`] with the given mocks.
pub fn abc_router_with(classifier: Arc<MockClassifier>, backend: Arc<MockBackend>) -> Router {
    Router::new(abc_registry(), classifier, backend)
}

/// Router over [`abc_registry`] with default mocks (classifier always picks `A`).
pub fn abc_router() -> Router {
    abc_router_with(
        Arc::new(MockClassifier::with_scores(vec![1.0, 0.0, 0.0])),
        Arc::new(MockBackend::new()),
    )
}

/// Chat request routed by the classifier under `policy`.
pub fn triton_request(policy: &str, text: &str) -> Value {
    json!({
        "model": "",
        "messages": [{"role": "user", "content": text}],
        "max_tokens": 64,
        "nim-llm-router": {"policy": policy, "routing_strategy": "triton"}
    })
}

/// Chat request routed manually to `backend` under `policy`.
pub fn manual_request(policy: &str, backend: &str, text: &str) -> Value {
    json!({
        "model": "",
        "messages": [{"role": "user", "content": text}],
        "nim-llm-router": {"policy": policy, "routing_strategy": "manual", "model": backend}
    })
}

/// Configuration with the task and complexity policies, credentials inline.
pub const SAMPLE_TOML: &str = r#"
[router]
classifier_timeout_secs = 5
backend_timeout_secs = 10

[[policies]]
name = "task_router"
url = "http://router-server:8000/v2/models/task_router_ensemble/infer"

[[policies.llms]]
name = "Brainstorming"
api_base = "https://integrate.api.nvidia.com"
api_key = "nvapi-test"
model = "meta/llama-3.1-70b-instruct"

[[policies.llms]]
name = "Chatbot"
api_base = "https://integrate.api.nvidia.com"
api_key = "nvapi-test"
model = "mistralai/mixtral-8x22b-instruct-v0.1"

[[policies.llms]]
name = "Code Generation"
api_base = "https://integrate.api.nvidia.com"
api_key = "nvapi-test"
model = "nvidia/llama-3.3-nemotron-super-49b-v1"

[[policies]]
name = "complexity_router"
url = "http://router-server:8000/v2/models/complexity_router_ensemble/infer"

[[policies.llms]]
name = "Creativity"
api_base = "https://integrate.api.nvidia.com"
api_key = "nvapi-test"
model = "meta/llama-3.1-70b-instruct"

[[policies.llms]]
name = "Reasoning"
api_base = "https://integrate.api.nvidia.com"
api_key = "nvapi-test"
model = "nvidia/llama-3.3-nemotron-super-49b-v1"
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixture_registry_has_abc() {
        let registry = abc_registry();
        let policy = registry.lookup(TASK_POLICY).unwrap();
        let names: Vec<&str> = policy.backends().iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B", "C"]);
    }

    #[test]
    fn sample_toml_loads() {
        let registry = Registry::load_str(SAMPLE_TOML).unwrap();
        assert_eq!(registry.len(), 2);
        assert_eq!(
            registry.lookup("task_router").unwrap().backend_at(1).unwrap().name,
            "Chatbot"
        );
    }
}
