// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway error types and their HTTP rendering.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use switchyard_core::{ErrorKind, RouterError};
use thiserror::Error;

/// Failures of the gateway server itself.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("failed to bind gateway to {addr}: {source}")]
    Bind {
        addr: String,
        source: std::io::Error,
    },

    #[error("gateway server error: {0}")]
    Serve(#[source] std::io::Error),
}

/// Error response body: `{"error": {"kind": ..., "message": ...}}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub kind: String,
    pub message: String,
}

/// A request-level failure ready to be sent to the client.
#[derive(Debug)]
pub enum ApiError {
    /// The routing pipeline rejected or failed the request.
    Routing(RouterError),
    /// The body could not be read as JSON at all.
    InvalidBody(String),
}

impl From<RouterError> for ApiError {
    fn from(err: RouterError) -> Self {
        ApiError::Routing(err)
    }
}

/// HTTP status for a routing failure.
pub fn status_for(err: &RouterError) -> StatusCode {
    match err.kind() {
        ErrorKind::MissingDirective | ErrorKind::NoStrategy | ErrorKind::UnknownBackend => {
            StatusCode::BAD_REQUEST
        }
        ErrorKind::UnknownPolicy => StatusCode::NOT_FOUND,
        ErrorKind::Classifier | ErrorKind::IndexOutOfRange | ErrorKind::BackendTransport => {
            StatusCode::BAD_GATEWAY
        }
        ErrorKind::Backend => match err {
            RouterError::Backend { status, .. } => StatusCode::from_u16(*status)
                .ok()
                .filter(|code| code.is_client_error() || code.is_server_error())
                .unwrap_or(StatusCode::BAD_GATEWAY),
            _ => StatusCode::BAD_GATEWAY,
        },
        ErrorKind::Config => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, detail) = match self {
            ApiError::Routing(err) => {
                let failure = err.to_failure();
                (
                    status_for(&err),
                    ErrorDetail {
                        kind: failure.kind.to_string(),
                        message: failure.message,
                    },
                )
            }
            ApiError::InvalidBody(message) => (
                StatusCode::BAD_REQUEST,
                ErrorDetail {
                    kind: "invalid_body".to_string(),
                    message,
                },
            ),
        };

        (status, Json(ErrorResponse { error: detail })).into_response()
    }
}
