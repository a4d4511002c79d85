// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock classification service for deterministic testing.
//!
//! `MockClassifier` implements `ClassifierAdapter` with pre-configured score
//! vectors and records every call it receives.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use switchyard_core::{AdapterType, ClassifierAdapter, PluginAdapter, RouterError};

/// One call seen by a [`MockClassifier`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifierCall {
    pub url: String,
    pub text: String,
}

/// A mock classifier that returns pre-configured score vectors.
///
/// Queued outcomes are popped first; once the queue is empty the default
/// scores are returned on every call.
pub struct MockClassifier {
    queued: Arc<Mutex<VecDeque<Result<Vec<f64>, String>>>>,
    default_scores: Vec<f64>,
    calls: Arc<Mutex<Vec<ClassifierCall>>>,
}

impl MockClassifier {
    /// Always answer with `scores`.
    pub fn with_scores(scores: Vec<f64>) -> Self {
        Self {
            queued: Arc::new(Mutex::new(VecDeque::new())),
            default_scores: scores,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Queue a score vector for the next call.
    pub async fn push_scores(&self, scores: Vec<f64>) {
        self.queued.lock().await.push_back(Ok(scores));
    }

    /// Queue a failure for the next call.
    pub async fn push_failure(&self, message: impl Into<String>) {
        self.queued.lock().await.push_back(Err(message.into()));
    }

    /// Every call received so far, oldest first.
    pub async fn calls(&self) -> Vec<ClassifierCall> {
        self.calls.lock().await.clone()
    }

    pub async fn call_count(&self) -> usize {
        self.calls.lock().await.len()
    }
}

impl Default for MockClassifier {
    fn default() -> Self {
        Self::with_scores(vec![1.0])
    }
}

impl PluginAdapter for MockClassifier {
    fn name(&self) -> &str {
        "mock-classifier"
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Classifier
    }
}

#[async_trait]
impl ClassifierAdapter for MockClassifier {
    async fn infer(&self, url: &str, text: &str) -> Result<Vec<f64>, RouterError> {
        self.calls.lock().await.push(ClassifierCall {
            url: url.to_string(),
            text: text.to_string(),
        });

        match self.queued.lock().await.pop_front() {
            Some(Ok(scores)) => Ok(scores),
            Some(Err(message)) => Err(RouterError::classifier(message)),
            None => Ok(self.default_scores.clone()),
        }
    }
}
