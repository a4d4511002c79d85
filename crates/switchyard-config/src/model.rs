// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Switchyard router.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level Switchyard configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// The `[router]` and `[gateway]` sections default to sensible values; the
/// policy list defaults to empty.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SwitchyardConfig {
    /// Router behavior: timeouts, logging, threshold default.
    #[serde(default)]
    pub router: RouterSettings,

    /// HTTP gateway listen settings.
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// Routing policies, each with its classifier and ordered backends.
    #[serde(default)]
    pub policies: Vec<PolicyConfig>,

    /// `${VAR}` placeholders that had no value when the config was loaded.
    #[serde(skip)]
    pub unset_variables: Vec<String>,
}

/// Router behavior settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RouterSettings {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Timeout for a single classifier call, in seconds.
    #[serde(default = "default_classifier_timeout_secs")]
    pub classifier_timeout_secs: u64,

    /// Timeout for a single backend call, in seconds. Must exceed the classifier timeout.
    #[serde(default = "default_backend_timeout_secs")]
    pub backend_timeout_secs: u64,

    /// Threshold applied when a directive omits one. Parsed and logged, never
    /// used to gate a classifier decision.
    #[serde(default = "default_threshold")]
    pub default_threshold: f64,
}

impl Default for RouterSettings {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            classifier_timeout_secs: default_classifier_timeout_secs(),
            backend_timeout_secs: default_backend_timeout_secs(),
            default_threshold: default_threshold(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_classifier_timeout_secs() -> u64 {
    30
}

fn default_backend_timeout_secs() -> u64 {
    60
}

fn default_threshold() -> f64 {
    0.5
}

/// HTTP gateway configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GatewayConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8084
}

/// A routing policy: competing backends plus the classifier that ranks them.
///
/// The order of `llms` is significant. Position `i` in the classifier's
/// output vector selects `llms[i]`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PolicyConfig {
    /// Unique policy name referenced by request directives.
    pub name: String,

    /// Classification service inference URL.
    pub url: String,

    /// Ordered backend list.
    pub llms: Vec<LlmConfig>,
}

/// A single downstream backend record.
#[derive(Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LlmConfig {
    /// Backend name, unique within its policy.
    pub name: String,

    /// Base URL of the OpenAI-compatible endpoint.
    pub api_base: String,

    /// Bearer credential. May contain `${VAR}` placeholders.
    pub api_key: String,

    /// Model identifier written into forwarded requests.
    pub model: String,
}

impl std::fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmConfig")
            .field("name", &self.name)
            .field("api_base", &self.api_base)
            .field("api_key", &"[REDACTED]")
            .field("model", &self.model)
            .finish()
    }
}
