// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers for the gateway API.
//!
//! Handles POST /v1/chat/completions, POST /v1/route, GET /v1/policies, GET /health.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{HeaderName, HeaderValue},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ApiError;
use crate::server::GatewayState;

/// Response header carrying the chosen backend's model identifier.
pub const MODEL_HEADER: &str = "x-switchyard-model";
/// Response header carrying the chosen backend's registry name.
pub const CLASSIFIER_HEADER: &str = "x-switchyard-classifier";

/// Response body for POST /v1/route.
#[derive(Debug, Serialize, Deserialize)]
pub struct RouteEnvelope {
    /// Backend response body, unmodified.
    pub response: Value,
    pub model: String,
    pub classifier: String,
    pub policy: String,
}

/// Response body for GET /v1/policies.
#[derive(Debug, Serialize, Deserialize)]
pub struct PolicyListResponse {
    pub policies: Vec<PolicyInfo>,
}

/// One policy as exposed over HTTP. Credentials are never included.
#[derive(Debug, Serialize, Deserialize)]
pub struct PolicyInfo {
    pub name: String,
    pub url: String,
    pub llms: Vec<BackendInfo>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BackendInfo {
    pub name: String,
    pub model: String,
}

/// Response body for GET /health.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
}

/// POST /v1/chat/completions
///
/// Routes the request and returns the backend's body as-is. The selection is
/// reported in the `x-switchyard-*` headers.
pub async fn post_chat_completions(
    State(state): State<GatewayState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(body) = body.map_err(|e| ApiError::InvalidBody(e.body_text()))?;
    let routed = state.router.route(body).await?;

    let mut response = Json(routed.body).into_response();
    let headers = response.headers_mut();
    for (name, value) in [
        (MODEL_HEADER, &routed.model),
        (CLASSIFIER_HEADER, &routed.classifier_label),
    ] {
        // Names that are not valid header text are simply not echoed.
        if let Ok(value) = HeaderValue::from_str(value) {
            headers.insert(HeaderName::from_static(name), value);
        }
    }
    Ok(response)
}

/// POST /v1/route
///
/// Routes the request and wraps the backend's body with the selection.
pub async fn post_route(
    State(state): State<GatewayState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<RouteEnvelope>, ApiError> {
    let Json(body) = body.map_err(|e| ApiError::InvalidBody(e.body_text()))?;
    let routed = state.router.route(body).await?;

    Ok(Json(RouteEnvelope {
        response: routed.body,
        model: routed.model,
        classifier: routed.classifier_label,
        policy: routed.policy,
    }))
}

/// GET /v1/policies
pub async fn get_policies(State(state): State<GatewayState>) -> Json<PolicyListResponse> {
    let policies = state
        .router
        .registry()
        .policies()
        .into_iter()
        .map(|p| PolicyInfo {
            name: p.name.clone(),
            url: p.classifier_url.clone(),
            llms: p
                .backends()
                .iter()
                .map(|b| BackendInfo {
                    name: b.name.clone(),
                    model: b.model_id.clone(),
                })
                .collect(),
        })
        .collect();

    Json(PolicyListResponse { policies })
}

/// GET /health
///
/// Unauthenticated liveness probe.
pub async fn get_health(State(state): State<GatewayState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
    })
}
