// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Policy registry: the immutable table of policies and their ordered backends.
//!
//! Built once at startup from [`SwitchyardConfig`] and shared read-only
//! (typically behind an `Arc`) across all concurrent requests.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use switchyard_config::{ConfigError, PolicyConfig, SwitchyardConfig};
use switchyard_core::{Backend, RouterError};
use tracing::info;

/// A named group of competing backends sharing one classification service.
#[derive(Debug, Clone)]
pub struct Policy {
    /// Unique policy name.
    pub name: String,
    /// Classification service inference URL.
    pub classifier_url: String,
    backends: Vec<Backend>,
}

impl Policy {
    /// Create a policy. Backend order defines the classifier index mapping.
    pub fn new(
        name: impl Into<String>,
        classifier_url: impl Into<String>,
        backends: Vec<Backend>,
    ) -> Self {
        Self {
            name: name.into(),
            classifier_url: classifier_url.into(),
            backends,
        }
    }

    /// Backends in declared order.
    pub fn backends(&self) -> &[Backend] {
        &self.backends
    }

    /// Backend at a classifier output position.
    pub fn backend_at(&self, index: usize) -> Result<&Backend, RouterError> {
        self.backends
            .get(index)
            .ok_or_else(|| RouterError::IndexOutOfRange {
                policy: self.name.clone(),
                index,
                len: self.backends.len(),
            })
    }

    /// Backend by exact name, ignoring surrounding whitespace on both sides.
    pub fn backend_by_name(&self, name: &str) -> Result<&Backend, RouterError> {
        let wanted = name.trim();
        let found = if wanted.is_empty() {
            None
        } else {
            self.backends.iter().find(|b| b.name.trim() == wanted)
        };
        found.ok_or_else(|| RouterError::UnknownBackend {
            policy: self.name.clone(),
            backend: name.to_string(),
        })
    }
}

/// The set of all policies, unique by name.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    policies: HashMap<String, Policy>,
}

impl Registry {
    /// Build a registry from already-constructed policies.
    ///
    /// Fails with [`RouterError::Config`] on an empty or duplicate policy
    /// name, a policy without backends, an empty backend name, or a
    /// duplicate backend name within one policy.
    pub fn new(policies: Vec<Policy>) -> Result<Self, RouterError> {
        let mut map = HashMap::with_capacity(policies.len());

        for policy in policies {
            let key = policy.name.trim().to_string();
            if key.is_empty() {
                return Err(RouterError::Config("policy name must not be empty".into()));
            }
            if policy.backends.is_empty() {
                return Err(RouterError::Config(format!(
                    "policy `{key}` must declare at least one backend"
                )));
            }

            let mut seen = HashSet::new();
            for backend in &policy.backends {
                let name = backend.name.trim();
                if name.is_empty() {
                    return Err(RouterError::Config(format!(
                        "policy `{key}` has a backend with an empty name"
                    )));
                }
                if !seen.insert(name) {
                    return Err(RouterError::Config(format!(
                        "duplicate backend name `{name}` in policy `{key}`"
                    )));
                }
            }

            if map.contains_key(&key) {
                return Err(RouterError::Config(format!("duplicate policy name `{key}`")));
            }
            map.insert(key, policy);
        }

        Ok(Self { policies: map })
    }

    /// Build a registry from the declarative policy records.
    pub fn from_policies(records: &[PolicyConfig]) -> Result<Self, RouterError> {
        let policies = records
            .iter()
            .map(|p| {
                let backends = p
                    .llms
                    .iter()
                    .map(|l| Backend::new(&l.name, &l.api_base, &l.api_key, &l.model))
                    .collect();
                Policy::new(&p.name, &p.url, backends)
            })
            .collect();
        Self::new(policies)
    }

    /// Build a registry from a loaded configuration.
    pub fn from_config(config: &SwitchyardConfig) -> Result<Self, RouterError> {
        let registry = Self::from_policies(&config.policies)?;
        info!(policies = registry.len(), "policy registry loaded");
        Ok(registry)
    }

    /// Parse, resolve placeholders, validate, and build from TOML text.
    pub fn load_str(toml: &str) -> Result<Self, RouterError> {
        let config = switchyard_config::load_and_validate_str(toml).map_err(config_failure)?;
        Self::from_config(&config)
    }

    /// Parse, resolve placeholders, validate, and build from a TOML file.
    pub fn load_path(path: &Path) -> Result<Self, RouterError> {
        let config = switchyard_config::load_and_validate_path(path).map_err(config_failure)?;
        Self::from_config(&config)
    }

    /// Policy by name (surrounding whitespace ignored).
    pub fn lookup(&self, name: &str) -> Result<&Policy, RouterError> {
        self.policies
            .get(name.trim())
            .ok_or_else(|| RouterError::UnknownPolicy {
                policy: name.to_string(),
            })
    }

    /// Policies sorted by name.
    pub fn policies(&self) -> Vec<&Policy> {
        let mut list: Vec<&Policy> = self.policies.values().collect();
        list.sort_by(|a, b| a.name.cmp(&b.name));
        list
    }

    pub fn len(&self) -> usize {
        self.policies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.policies.is_empty()
    }
}

fn config_failure(errors: Vec<ConfigError>) -> RouterError {
    let joined = errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ");
    RouterError::Config(joined)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn abc_policy(name: &str) -> Policy {
        Policy::new(
            name,
            "http://classifier/infer",
            vec![
                Backend::new("A", "http://a", "k", "model-a"),
                Backend::new("B", "http://b", "k", "model-b"),
                Backend::new("C", "http://c", "k", "model-c"),
            ],
        )
    }

    #[test]
    fn backend_at_follows_declared_order() {
        let policy = abc_policy("task_router");
        assert_eq!(policy.backend_at(0).unwrap().name, "A");
        assert_eq!(policy.backend_at(2).unwrap().name, "C");
    }

    #[test]
    fn backend_at_out_of_range() {
        let policy = abc_policy("task_router");
        let err = policy.backend_at(3).unwrap_err();
        assert!(matches!(
            err,
            RouterError::IndexOutOfRange { index: 3, len: 3, .. }
        ));
    }

    #[test]
    fn backend_by_name_trims_whitespace() {
        let policy = abc_policy("task_router");
        assert_eq!(policy.backend_by_name("  B ").unwrap().model_id, "model-b");
    }

    #[test]
    fn backend_by_name_is_exact() {
        let policy = abc_policy("task_router");
        assert!(matches!(
            policy.backend_by_name("b"),
            Err(RouterError::UnknownBackend { .. })
        ));
        assert!(matches!(
            policy.backend_by_name(""),
            Err(RouterError::UnknownBackend { .. })
        ));
    }

    #[test]
    fn lookup_trims_and_reports_unknown() {
        let registry = Registry::new(vec![abc_policy("task_router")]).unwrap();
        assert_eq!(registry.lookup(" task_router").unwrap().name, "task_router");
        assert!(matches!(
            registry.lookup("nope"),
            Err(RouterError::UnknownPolicy { policy }) if policy == "nope"
        ));
    }

    #[test]
    fn duplicate_policy_is_config_error() {
        let err = Registry::new(vec![abc_policy("p"), abc_policy("p ")]).unwrap_err();
        assert!(matches!(err, RouterError::Config(msg) if msg.contains("duplicate policy")));
    }

    #[test]
    fn duplicate_backend_is_config_error() {
        let policy = Policy::new(
            "p",
            "http://c",
            vec![
                Backend::new("A", "http://a", "k", "m"),
                Backend::new("A", "http://a2", "k", "m"),
            ],
        );
        assert!(matches!(Registry::new(vec![policy]), Err(RouterError::Config(_))));
    }

    #[test]
    fn empty_policy_is_config_error() {
        let policy = Policy::new("p", "http://c", vec![]);
        assert!(matches!(Registry::new(vec![policy]), Err(RouterError::Config(_))));
    }

    #[test]
    fn load_str_builds_registry() {
        let registry = Registry::load_str(
            r#"
[[policies]]
name = "complexity_router"
url = "http://router-server:8000/v2/models/complexity_router_ensemble/infer"

[[policies.llms]]
name = "Creativity"
api_base = "https://integrate.api.nvidia.com"
api_key = "k"
model = "meta/llama-3.1-70b-instruct"

[[policies.llms]]
name = "Reasoning"
api_base = "https://integrate.api.nvidia.com"
api_key = "k"
model = "nvidia/llama-3.3-nemotron-super-49b-v1"
"#,
        )
        .unwrap();

        let policy = registry.lookup("complexity_router").unwrap();
        assert_eq!(policy.backends().len(), 2);
        assert_eq!(
            policy.backend_at(1).unwrap().model_id,
            "nvidia/llama-3.3-nemotron-super-49b-v1"
        );
    }

    #[test]
    fn load_str_surfaces_config_errors() {
        let err = Registry::load_str("[[policies]]\nname = \"p\"\n").unwrap_err();
        assert!(matches!(err, RouterError::Config(_)));
    }

    #[test]
    fn policies_are_listed_by_name() {
        let registry = Registry::new(vec![abc_policy("zeta"), abc_policy("alpha")]).unwrap();
        let names: Vec<&str> = registry.policies().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["alpha", "zeta"]);
    }
}
