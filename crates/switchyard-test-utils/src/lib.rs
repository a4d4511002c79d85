// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Switchyard integration tests.
//!
//! Provides mock adapters and test harness infrastructure for fast,
//! deterministic, CI-runnable tests without external services.
//!
//! # Components
//!
//! - [`MockClassifier`] - Classification service with pre-configured scores
//! - [`MockBackend`] - Downstream endpoint that captures forwarded payloads
//! - [`TestHarness`] - Router with real HTTP adapters pointed at wiremock
//! - [`fixtures`] - Shared registries, routers and request bodies

pub mod fixtures;
pub mod harness;
pub mod mock_backend;
pub mod mock_classifier;

pub use harness::{TestHarness, TestHarnessBuilder};
pub use mock_backend::{completion, ForwardedRequest, MockBackend};
pub use mock_classifier::{ClassifierCall, MockClassifier};
