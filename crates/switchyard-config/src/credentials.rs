// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `${VAR}` placeholder resolution for policy credentials and URLs.
//!
//! Placeholders are substituted after deserialization, so a policy file can
//! be committed with `api_key = "${NVIDIA_API_KEY}"` and the secret supplied
//! by the process environment at startup.

use std::sync::LazyLock;

use regex::{Captures, Regex};
use tracing::debug;

use crate::model::SwitchyardConfig;

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("placeholder pattern is valid")
});

/// Resolve placeholders against the process environment.
pub fn resolve_credentials(config: &mut SwitchyardConfig) {
    resolve_credentials_with(config, |name| std::env::var(name).ok());
}

/// Resolve placeholders with a caller-supplied lookup.
///
/// Applies to each policy's `url` and each backend's `api_base` and
/// `api_key`. Unset variables resolve to the empty string and are recorded,
/// once each, in `config.unset_variables` so the caller can report them
/// after logging is up.
pub fn resolve_credentials_with<F>(config: &mut SwitchyardConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let mut unset = Vec::new();
    for policy in &mut config.policies {
        policy.url = substitute(&policy.url, &lookup, &mut unset);
        for llm in &mut policy.llms {
            llm.api_base = substitute(&llm.api_base, &lookup, &mut unset);
            llm.api_key = substitute(&llm.api_key, &lookup, &mut unset);
        }
    }
    config.unset_variables = unset;
}

/// Replace every `${VAR}` in `input` using `lookup`, appending the names of
/// unset variables to `unset`.
pub fn substitute<F>(input: &str, lookup: &F, unset: &mut Vec<String>) -> String
where
    F: Fn(&str) -> Option<String>,
{
    if !input.contains("${") {
        return input.to_string();
    }

    PLACEHOLDER
        .replace_all(input, |caps: &Captures<'_>| {
            let name = &caps[1];
            lookup(name).unwrap_or_else(|| {
                debug!(variable = name, "placeholder variable is not set");
                if !unset.iter().any(|seen| seen == name) {
                    unset.push(name.to_string());
                }
                String::new()
            })
        })
        .into_owned()
}
