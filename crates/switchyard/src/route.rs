// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Implementation of `switchyard route`: one request, no server.

use std::io::Read;
use std::path::PathBuf;

use serde_json::{json, Value};
use switchyard_config::SwitchyardConfig;
use switchyard_core::RoutedResponse;
use switchyard_router::Router;

use crate::error::CliError;

/// Route the JSON request in `file` (or stdin for `-`) and print the envelope.
pub async fn run_route(config: &SwitchyardConfig, file: &str) -> Result<(), CliError> {
    let text = read_input(file)?;
    let body: Value = serde_json::from_str(&text).map_err(CliError::InvalidRequest)?;

    let router = Router::from_config(config)?;
    let routed = router.route(body).await?;

    let rendered = serde_json::to_string_pretty(&envelope(routed)).map_err(CliError::Output)?;
    println!("{rendered}");
    Ok(())
}

fn read_input(file: &str) -> Result<String, CliError> {
    if file == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .map_err(|source| CliError::Read {
                path: PathBuf::from("<stdin>"),
                source,
            })?;
        return Ok(buf);
    }

    std::fs::read_to_string(file).map_err(|source| CliError::Read {
        path: PathBuf::from(file),
        source,
    })
}

/// Same shape as the gateway's `/v1/route` response.
fn envelope(routed: RoutedResponse) -> Value {
    json!({
        "response": routed.body,
        "model": routed.model,
        "classifier": routed.classifier_label,
        "policy": routed.policy,
    })
}
