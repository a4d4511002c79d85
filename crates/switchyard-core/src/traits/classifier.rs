// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Classifier adapter trait for score-vector classification services.

use async_trait::async_trait;

use crate::error::RouterError;
use crate::traits::adapter::PluginAdapter;

/// Adapter for a classification service.
///
/// Given a policy's classifier URL and a piece of text, returns one score per
/// backend position in the policy's declared order.
#[async_trait]
pub trait ClassifierAdapter: PluginAdapter {
    /// Performs a single inference call. Implementations must not retry.
    async fn infer(&self, url: &str, text: &str) -> Result<Vec<f64>, RouterError>;
}
