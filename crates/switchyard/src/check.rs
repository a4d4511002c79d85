// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Implementation of `switchyard check`.

use switchyard_config::SwitchyardConfig;
use switchyard_router::Registry;

use crate::error::CliError;

/// Build the registry from a validated config and print what was loaded.
pub fn run_check(config: &SwitchyardConfig) -> Result<(), CliError> {
    let registry = Registry::from_config(config)?;
    print!("{}", summarize(config, &registry));
    Ok(())
}

/// Human-readable summary of the configuration. Credentials are reported
/// only as set or empty.
pub fn summarize(config: &SwitchyardConfig, registry: &Registry) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "gateway: {}:{}\ntimeouts: classifier {}s, backend {}s\npolicies: {}\n",
        config.gateway.host,
        config.gateway.port,
        config.router.classifier_timeout_secs,
        config.router.backend_timeout_secs,
        registry.len()
    ));

    for policy in registry.policies() {
        out.push_str(&format!("\n{}\n  classifier: {}\n", policy.name, policy.classifier_url));
        for (index, backend) in policy.backends().iter().enumerate() {
            let credential = if backend.bearer().is_empty() { "empty" } else { "set" };
            out.push_str(&format!(
                "  [{index}] {} -> {} ({}, key {credential})\n",
                backend.name,
                backend.model_id,
                backend.endpoint_base
            ));
        }
    }
    out
}
