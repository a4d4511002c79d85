// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared by the registry, the router, and the gateway.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Identifies the kind of adapter behind a trait object.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterType {
    Classifier,
    Backend,
}

/// Machine-readable routing failure kinds.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Config,
    MissingDirective,
    UnknownPolicy,
    NoStrategy,
    UnknownBackend,
    Classifier,
    IndexOutOfRange,
    Backend,
    BackendTransport,
}

/// Structured failure reported to the router's caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutingFailure {
    /// What went wrong.
    pub kind: ErrorKind,
    /// Human-readable cause.
    pub message: String,
}

/// An immutable, named downstream model endpoint.
///
/// Identity is `name`, unique within its policy.
#[derive(Clone)]
pub struct Backend {
    /// Registry name, also reported as the classifier label.
    pub name: String,
    /// Base URL; `/v1/chat/completions` is appended when proxying.
    pub endpoint_base: String,
    /// Bearer credential sent downstream.
    pub credential: SecretString,
    /// Model identifier written into the forwarded payload.
    pub model_id: String,
}

impl Backend {
    pub fn new(
        name: impl Into<String>,
        endpoint_base: impl Into<String>,
        credential: impl Into<String>,
        model_id: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            endpoint_base: endpoint_base.into(),
            credential: SecretString::from(credential.into()),
            model_id: model_id.into(),
        }
    }

    /// Full chat-completions URL for this backend.
    pub fn completions_url(&self) -> String {
        format!(
            "{}/v1/chat/completions",
            self.endpoint_base.trim_end_matches('/')
        )
    }

    /// The bearer credential in clear text, for building request headers.
    pub fn bearer(&self) -> &str {
        self.credential.expose_secret()
    }
}

impl std::fmt::Debug for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Backend")
            .field("name", &self.name)
            .field("endpoint_base", &self.endpoint_base)
            .field("credential", &"[REDACTED]")
            .field("model_id", &self.model_id)
            .finish()
    }
}

/// One entry of a chat conversation as seen by the router.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
        }
    }
}

/// Successful routing outcome.
#[derive(Debug, Clone, PartialEq)]
pub struct RoutedResponse {
    /// The backend's response body, unmodified.
    pub body: serde_json::Value,
    /// Declared model identifier of the chosen backend.
    pub model: String,
    /// Registry name of the chosen backend.
    pub classifier_label: String,
    /// Policy the request was routed under.
    pub policy: String,
}
