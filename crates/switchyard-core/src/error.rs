// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Switchyard router.

use thiserror::Error;

use crate::types::{ErrorKind, RoutingFailure};

/// The error type produced by every routing stage.
///
/// Each variant is terminal for the request that produced it. Nothing in the
/// router retries on these, and none of them leaves shared state modified.
#[derive(Debug, Error)]
pub enum RouterError {
    /// Bad or duplicate policy definitions. Fatal at startup.
    #[error("configuration error: {0}")]
    Config(String),

    /// The request carries no usable `nim-llm-router` block.
    #[error("missing routing directive: {0}")]
    MissingDirective(String),

    /// The directive names a policy the registry does not know.
    #[error("policy not found: {policy}")]
    UnknownPolicy { policy: String },

    /// The directive has no recognized routing strategy.
    #[error("no routing strategy specified (expected `manual` or `triton`)")]
    NoStrategy,

    /// A manual directive names a backend that is empty or absent from the policy.
    #[error("backend `{backend}` not found in policy `{policy}`")]
    UnknownBackend { policy: String, backend: String },

    /// The classification service failed or returned an unusable payload.
    #[error("classifier error: {message}")]
    Classifier {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The classifier picked a position with no backend behind it.
    #[error("classifier index {index} out of range for policy `{policy}` with {len} backends")]
    IndexOutOfRange {
        policy: String,
        index: usize,
        len: usize,
    },

    /// The downstream backend answered with a non-success status.
    #[error("backend returned {status}: {body}")]
    Backend { status: u16, body: String },

    /// The downstream backend could not be reached or sent an unreadable body.
    #[error("backend `{backend}` request failed: {message}")]
    BackendTransport {
        backend: String,
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl RouterError {
    /// Convenience constructor for classifier failures without an underlying source.
    pub fn classifier(message: impl Into<String>) -> Self {
        RouterError::Classifier {
            message: message.into(),
            source: None,
        }
    }

    /// The machine-readable kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            RouterError::Config(_) => ErrorKind::Config,
            RouterError::MissingDirective(_) => ErrorKind::MissingDirective,
            RouterError::UnknownPolicy { .. } => ErrorKind::UnknownPolicy,
            RouterError::NoStrategy => ErrorKind::NoStrategy,
            RouterError::UnknownBackend { .. } => ErrorKind::UnknownBackend,
            RouterError::Classifier { .. } => ErrorKind::Classifier,
            RouterError::IndexOutOfRange { .. } => ErrorKind::IndexOutOfRange,
            RouterError::Backend { .. } => ErrorKind::Backend,
            RouterError::BackendTransport { .. } => ErrorKind::BackendTransport,
        }
    }

    /// Translate into the structured failure object handed to callers.
    pub fn to_failure(&self) -> RoutingFailure {
        RoutingFailure {
            kind: self.kind(),
            message: self.to_string(),
        }
    }
}

impl From<&RouterError> for RoutingFailure {
    fn from(err: &RouterError) -> Self {
        err.to_failure()
    }
}
