// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Switchyard LLM router.
//!
//! This crate provides the error type, the shared data types, and the adapter
//! traits used throughout the Switchyard workspace. The HTTP classifier and
//! backend clients in `switchyard-router` implement the traits defined here,
//! as do the mocks in `switchyard-test-utils`.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::RouterError;
pub use types::{
    AdapterType, Backend, ChatMessage, ErrorKind, RoutedResponse, RoutingFailure,
};

pub use traits::{BackendAdapter, ClassifierAdapter, PluginAdapter};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_error_maps_to_its_kind() {
        let cases = [
            (RouterError::Config("dup".into()), ErrorKind::Config),
            (
                RouterError::MissingDirective("absent".into()),
                ErrorKind::MissingDirective,
            ),
            (
                RouterError::UnknownPolicy {
                    policy: "p".into(),
                },
                ErrorKind::UnknownPolicy,
            ),
            (RouterError::NoStrategy, ErrorKind::NoStrategy),
            (
                RouterError::UnknownBackend {
                    policy: "p".into(),
                    backend: "x".into(),
                },
                ErrorKind::UnknownBackend,
            ),
            (RouterError::classifier("boom"), ErrorKind::Classifier),
            (
                RouterError::IndexOutOfRange {
                    policy: "p".into(),
                    index: 4,
                    len: 3,
                },
                ErrorKind::IndexOutOfRange,
            ),
            (
                RouterError::Backend {
                    status: 503,
                    body: "down".into(),
                },
                ErrorKind::Backend,
            ),
            (
                RouterError::BackendTransport {
                    backend: "A".into(),
                    message: "timeout".into(),
                    source: None,
                },
                ErrorKind::BackendTransport,
            ),
        ];

        for (err, kind) in cases {
            assert_eq!(err.kind(), kind, "wrong kind for {err}");
        }
    }

    #[test]
    fn error_kind_display_and_parse() {
        use std::str::FromStr;

        assert_eq!(ErrorKind::MissingDirective.to_string(), "missing_directive");
        assert_eq!(
            ErrorKind::from_str("index_out_of_range").unwrap(),
            ErrorKind::IndexOutOfRange
        );
    }

    #[test]
    fn failure_object_carries_kind_and_cause() {
        let err = RouterError::Backend {
            status: 429,
            body: "{\"error\":\"rate limited\"}".into(),
        };
        let failure = err.to_failure();
        assert_eq!(failure.kind, ErrorKind::Backend);
        assert!(failure.message.contains("429"));
        assert!(failure.message.contains("rate limited"));

        let json = serde_json::to_value(&failure).unwrap();
        assert_eq!(json["kind"], "backend");
    }

    #[test]
    fn backend_debug_redacts_credential() {
        let backend = Backend::new("A", "http://a.local", "sk-secret", "model-a");
        let debug = format!("{backend:?}");
        assert!(!debug.contains("sk-secret"));
        assert!(debug.contains("REDACTED"));
        assert_eq!(backend.bearer(), "sk-secret");
    }

    #[test]
    fn completions_url_handles_trailing_slash() {
        let a = Backend::new("A", "http://a.local/", "k", "m");
        let b = Backend::new("B", "http://b.local", "k", "m");
        assert_eq!(a.completions_url(), "http://a.local/v1/chat/completions");
        assert_eq!(b.completions_url(), "http://b.local/v1/chat/completions");
    }

    #[test]
    fn adapter_type_display() {
        assert_eq!(AdapterType::Classifier.to_string(), "Classifier");
        assert_eq!(AdapterType::Backend.to_string(), "Backend");
    }
}
