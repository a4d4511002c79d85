// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Backend adapter trait for OpenAI-compatible chat-completion endpoints.

use async_trait::async_trait;

use crate::error::RouterError;
use crate::traits::adapter::PluginAdapter;
use crate::types::Backend;

/// Adapter that delivers a rewritten payload to the chosen backend.
#[async_trait]
pub trait BackendAdapter: PluginAdapter {
    /// Sends `body` to `backend` and returns the raw response body.
    ///
    /// Non-success statuses surface as [`RouterError::Backend`] with the
    /// downstream body preserved verbatim.
    async fn forward(
        &self,
        backend: &Backend,
        body: &serde_json::Value,
    ) -> Result<serde_json::Value, RouterError>;
}
