// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::path::PathBuf;

use switchyard_core::RouterError;
use switchyard_gateway::GatewayError;
use thiserror::Error;

/// Failures surfaced by a subcommand.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Router(#[from] RouterError),

    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("request is not valid JSON: {0}")]
    InvalidRequest(#[source] serde_json::Error),

    #[error("failed to encode output: {0}")]
    Output(#[source] serde_json::Error),
}
