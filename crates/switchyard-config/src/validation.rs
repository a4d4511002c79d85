// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde attributes,
//! such as unique policy names, non-empty backend lists, and timeout ordering.

use std::collections::HashSet;

use crate::diagnostic::ConfigError;
use crate::model::{PolicyConfig, SwitchyardConfig};

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &SwitchyardConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    let host = config.gateway.host.trim();
    if host.is_empty() {
        errors.push(ConfigError::Validation {
            message: "gateway.host must not be empty".to_string(),
        });
    } else {
        let is_valid_ip = host.parse::<std::net::IpAddr>().is_ok();
        let is_valid_hostname = host
            .chars()
            .all(|c| c.is_alphanumeric() || c == '.' || c == '-' || c == ':');
        if !is_valid_ip && !is_valid_hostname {
            errors.push(ConfigError::Validation {
                message: format!("gateway.host `{host}` is not a valid IP address or hostname"),
            });
        }
    }

    if config.gateway.port == 0 {
        errors.push(ConfigError::Validation {
            message: "gateway.port must not be 0".to_string(),
        });
    }

    let router = &config.router;
    if router.classifier_timeout_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "router.classifier_timeout_secs must be at least 1".to_string(),
        });
    }
    if router.backend_timeout_secs <= router.classifier_timeout_secs {
        errors.push(ConfigError::Validation {
            message: format!(
                "router.backend_timeout_secs ({}) must be greater than router.classifier_timeout_secs ({})",
                router.backend_timeout_secs, router.classifier_timeout_secs
            ),
        });
    }
    if !(0.0..=1.0).contains(&router.default_threshold) {
        errors.push(ConfigError::Validation {
            message: format!(
                "router.default_threshold must be within 0.0..=1.0, got {}",
                router.default_threshold
            ),
        });
    }

    let mut seen_policies = HashSet::new();
    for (i, policy) in config.policies.iter().enumerate() {
        let name = policy.name.trim();
        if name.is_empty() {
            errors.push(ConfigError::Validation {
                message: format!("policies[{i}].name must not be empty"),
            });
        } else if !seen_policies.insert(name) {
            errors.push(ConfigError::Validation {
                message: format!("duplicate policy name `{name}` in [[policies]] array"),
            });
        }
        validate_policy(i, policy, &mut errors);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_policy(i: usize, policy: &PolicyConfig, errors: &mut Vec<ConfigError>) {
    if policy.url.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: format!("policies[{i}].url must not be empty"),
        });
    }

    if policy.llms.is_empty() {
        errors.push(ConfigError::Validation {
            message: format!("policy `{}` must declare at least one backend", policy.name),
        });
    }

    let mut seen_backends = HashSet::new();
    for (j, llm) in policy.llms.iter().enumerate() {
        let name = llm.name.trim();
        if name.is_empty() {
            errors.push(ConfigError::Validation {
                message: format!("policies[{i}].llms[{j}].name must not be empty"),
            });
        } else if !seen_backends.insert(name) {
            errors.push(ConfigError::Validation {
                message: format!(
                    "duplicate backend name `{name}` in policy `{}`",
                    policy.name
                ),
            });
        }
        if llm.api_base.trim().is_empty() {
            errors.push(ConfigError::Validation {
                message: format!("policies[{i}].llms[{j}].api_base must not be empty"),
            });
        }
        if llm.model.trim().is_empty() {
            errors.push(ConfigError::Validation {
                message: format!("policies[{i}].llms[{j}].model must not be empty"),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::LlmConfig;

    fn llm(name: &str) -> LlmConfig {
        LlmConfig {
            name: name.to_string(),
            api_base: "https://integrate.api.nvidia.com".to_string(),
            api_key: "key".to_string(),
            model: format!("model-{name}"),
        }
    }

    fn policy(name: &str, backends: &[&str]) -> PolicyConfig {
        PolicyConfig {
            name: name.to_string(),
            url: "http://classifier/infer".to_string(),
            llms: backends.iter().map(|b| llm(b)).collect(),
        }
    }

    fn has_message(errors: &[ConfigError], needle: &str) -> bool {
        errors
            .iter()
            .any(|e| matches!(e, ConfigError::Validation { message } if message.contains(needle)))
    }

    #[test]
    fn default_config_validates() {
        let config = SwitchyardConfig::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn valid_policies_pass() {
        let mut config = SwitchyardConfig::default();
        config.policies = vec![
            policy("task_router", &["A", "B", "C"]),
            policy("complexity_router", &["A", "B"]),
        ];
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn duplicate_policy_names_fail_validation() {
        let mut config = SwitchyardConfig::default();
        config.policies = vec![policy("task_router", &["A"]), policy(" task_router ", &["B"])];
        let errors = validate_config(&config).unwrap_err();
        assert!(has_message(&errors, "duplicate policy name"));
    }

    #[test]
    fn duplicate_backend_names_fail_validation() {
        let mut config = SwitchyardConfig::default();
        config.policies = vec![policy("task_router", &["A", "A"])];
        let errors = validate_config(&config).unwrap_err();
        assert!(has_message(&errors, "duplicate backend name `A`"));
    }

    #[test]
    fn empty_backend_list_fails_validation() {
        let mut config = SwitchyardConfig::default();
        config.policies = vec![policy("task_router", &[])];
        let errors = validate_config(&config).unwrap_err();
        assert!(has_message(&errors, "at least one backend"));
    }

    #[test]
    fn blank_required_fields_fail_validation() {
        let mut config = SwitchyardConfig::default();
        let mut p = policy("", &["A"]);
        p.url = "  ".to_string();
        p.llms[0].model = String::new();
        config.policies = vec![p];
        let errors = validate_config(&config).unwrap_err();
        assert!(has_message(&errors, "policies[0].name"));
        assert!(has_message(&errors, "policies[0].url"));
        assert!(has_message(&errors, "policies[0].llms[0].model"));
    }

    #[test]
    fn backend_timeout_must_exceed_classifier_timeout() {
        let mut config = SwitchyardConfig::default();
        config.router.classifier_timeout_secs = 60;
        config.router.backend_timeout_secs = 60;
        let errors = validate_config(&config).unwrap_err();
        assert!(has_message(&errors, "backend_timeout_secs"));
    }

    #[test]
    fn out_of_range_threshold_fails_validation() {
        let mut config = SwitchyardConfig::default();
        config.router.default_threshold = 1.5;
        let errors = validate_config(&config).unwrap_err();
        assert!(has_message(&errors, "default_threshold"));
    }

    #[test]
    fn collects_every_error() {
        let mut config = SwitchyardConfig::default();
        config.gateway.host = String::new();
        config.gateway.port = 0;
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 2);
    }
}
