// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Policy-driven routing of chat-completion requests for Switchyard.
//!
//! This crate provides:
//! - [`Registry`]: the immutable policy table loaded from configuration
//! - [`directive`]: parsing and stripping of the per-request routing block
//! - [`TritonClassifier`]: HTTP client for the classification service
//! - [`HttpBackend`]: forwarding to OpenAI-compatible backends
//! - [`Router`]: the pipeline tying these together
//!
//! A caller tags its payload with a policy and a strategy; the router picks
//! a backend (by name, or by the classifier's highest score), swaps in that
//! backend's model identifier, and relays the backend's answer.

pub mod classifier;
pub mod directive;
pub mod proxy;
pub mod registry;
pub mod router;

pub use classifier::{select_index, TritonClassifier, MAX_CLASSIFIER_INPUT_CHARS};
pub use directive::{RoutingDirective, RoutingStrategy, DIRECTIVE_KEY};
pub use proxy::HttpBackend;
pub use registry::{Policy, Registry};
pub use router::{Router, RouterStage, Selection};
