// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! OpenAI-compatible HTTP front door for the Switchyard router.
//!
//! Clients post ordinary chat-completion payloads carrying a routing
//! directive; the gateway hands them to the [`Router`](switchyard_router::Router)
//! and translates routing failures into HTTP statuses.

pub mod error;
pub mod handlers;
pub mod server;

pub use error::{status_for, ApiError, ErrorDetail, ErrorResponse, GatewayError};
pub use handlers::{CLASSIFIER_HEADER, MODEL_HEADER};
pub use server::{build_app, start_server, GatewayState, ServerConfig};
