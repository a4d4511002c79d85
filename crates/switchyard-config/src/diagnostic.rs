// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Figment-to-miette error bridge with fuzzy match suggestions.
//!
//! Converts Figment deserialization errors into miette diagnostics with
//! source spans, valid key listings, and "did you mean?" suggestions using
//! Jaro-Winkler string similarity. Array tables such as `[[policies.llms]]`
//! are located by their dotted header and array index.

#![allow(unused_assignments)] // miette's Diagnostic derive generates code triggering this lint

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// Minimum Jaro-Winkler similarity score to suggest a correction.
/// Catches typos like `api_kye` -> `api_key` or `classifer_timeout_secs`
/// -> `classifier_timeout_secs` while filtering noise.
const SUGGESTION_THRESHOLD: f64 = 0.75;

/// A configuration error with rich diagnostic information.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    /// An unknown key was found in the configuration.
    #[error("unknown configuration key `{key}`")]
    #[diagnostic(
        code(switchyard::config::unknown_key),
        help("{}", format_unknown_key_help(suggestion.as_deref(), valid_keys))
    )]
    UnknownKey {
        key: String,
        suggestion: Option<String>,
        /// Comma-separated keys accepted at this position.
        valid_keys: String,
        #[label("this key is not recognized")]
        span: Option<SourceSpan>,
        #[source_code]
        src: Option<NamedSource<String>>,
    },

    /// A configuration value has the wrong type.
    #[error("invalid type for key `{key}`: {detail}")]
    #[diagnostic(code(switchyard::config::invalid_type), help("expected {expected}"))]
    InvalidType {
        /// Dotted path of the offending key.
        key: String,
        detail: String,
        expected: String,
    },

    /// A required configuration key is missing, e.g. a backend without `model`.
    #[error("missing required key `{key}`{}", format_location(.location))]
    #[diagnostic(
        code(switchyard::config::missing_key),
        help("add `{key} = <value>` to your switchyard.toml")
    )]
    MissingKey {
        key: String,
        /// Dotted path of the table the key is missing from, if known.
        location: Option<String>,
    },

    /// A validation error for a config value.
    #[error("validation error: {message}")]
    #[diagnostic(code(switchyard::config::validation))]
    Validation {
        message: String,
    },

    /// Catch-all for other configuration errors.
    #[error("configuration error: {0}")]
    #[diagnostic(code(switchyard::config::other))]
    Other(String),
}

fn format_unknown_key_help(suggestion: Option<&str>, valid_keys: &str) -> String {
    match suggestion {
        Some(s) => format!("did you mean `{s}`? Valid keys: {valid_keys}"),
        None => format!("valid keys: {valid_keys}"),
    }
}

fn format_location(location: &Option<String>) -> String {
    match location {
        Some(path) if !path.is_empty() => format!(" in `{path}`"),
        _ => String::new(),
    }
}

/// Convert a `figment::Error` into a list of `ConfigError` diagnostics.
///
/// A figment error may carry several underlying errors; each one becomes a
/// separate diagnostic.
pub fn figment_to_config_errors(
    err: figment::Error,
    toml_sources: &[(String, String)],
) -> Vec<ConfigError> {
    use figment::error::Kind;

    err.into_iter()
        .map(|error| match &error.kind {
            Kind::UnknownField(field, expected) => {
                let valid_keys: Vec<&str> = expected.to_vec();
                let suggestion = suggest_key(field, &valid_keys);
                let (span, src) = find_source_span(&error, field, toml_sources);

                ConfigError::UnknownKey {
                    key: field.clone(),
                    suggestion,
                    valid_keys: valid_keys.join(", "),
                    span,
                    src,
                }
            }
            Kind::MissingField(field) => ConfigError::MissingKey {
                key: field.clone().into_owned(),
                location: Some(error.path.join(".")).filter(|p| !p.is_empty()),
            },
            Kind::InvalidType(actual, expected) => ConfigError::InvalidType {
                key: error.path.join("."),
                detail: format!("found {actual}, expected {expected}"),
                expected: expected.to_string(),
            },
            _ => ConfigError::Other(error.to_string()),
        })
        .collect()
}

/// Locate the offending key in the loaded TOML sources.
///
/// File-backed errors are matched by path. Errors from an inline string are
/// matched against the single source when exactly one was supplied.
fn find_source_span(
    error: &figment::error::Error,
    field: &str,
    toml_sources: &[(String, String)],
) -> (Option<SourceSpan>, Option<NamedSource<String>>) {
    let source_path = error
        .metadata
        .as_ref()
        .and_then(|m| m.source.as_ref())
        .and_then(|s| match s {
            figment::Source::File(path) => Some(path.display().to_string()),
            _ => None,
        });

    let source = match source_path {
        Some(path) => toml_sources.iter().find(|(p, _)| *p == path),
        None if toml_sources.len() == 1 => toml_sources.first(),
        None => None,
    };

    if let Some((path, content)) = source {
        if let Some(offset) = find_key_offset(content, &error.path, field) {
            let span = SourceSpan::new(offset.into(), field.len());
            let named = NamedSource::new(path, content.clone());
            return (Some(span), Some(named));
        }
    }

    (None, None)
}

/// Byte offset of `field` inside the table addressed by `path`.
///
/// Numeric segments select the Nth header of an array of tables, so
/// `["policies", "1", "llms", "0"]` resolves to the first `[[policies.llms]]`
/// after the second `[[policies]]`. The search stops at the next table
/// header, so a key is never attributed to a neighbouring table.
pub fn find_key_offset(content: &str, path: &[String], field: &str) -> Option<usize> {
    let body_start = table_body_start(content, path)?;

    let mut offset = body_start;
    for line in content[body_start..].split_inclusive('\n') {
        let key = line.trim_start();
        let indent = line.len() - key.len();
        if !path.is_empty() && key.starts_with('[') && offset > body_start {
            return None;
        }
        let is_assignment = key
            .strip_prefix(field)
            .is_some_and(|rest| rest.trim_start().starts_with('='));
        if is_assignment {
            return Some(offset + indent);
        }
        offset += line.len();
    }

    None
}

/// Offset just past the header of the table addressed by `path`.
fn table_body_start(content: &str, path: &[String]) -> Option<usize> {
    let mut start = 0;
    let mut keys: Vec<&str> = Vec::new();
    let mut pending = false;

    for segment in path {
        match segment.parse::<usize>() {
            Ok(index) => {
                let header = format!("[[{}]]", keys.join("."));
                let (pos, _) = content[start..].match_indices(&header).nth(index)?;
                start += pos + header.len();
                pending = false;
            }
            Err(_) => {
                keys.push(segment);
                pending = true;
            }
        }
    }

    if pending {
        let dotted = keys.join(".");
        let array = format!("[[{dotted}]]");
        let table = format!("[{dotted}]");
        let rest = &content[start..];
        let found = rest
            .find(&array)
            .map(|pos| pos + array.len())
            .or_else(|| rest.find(&table).map(|pos| pos + table.len()))?;
        start += found;
    }

    Some(start)
}

/// Closest valid key by Jaro-Winkler similarity, if any clears the threshold.
pub fn suggest_key(unknown: &str, valid_keys: &[&str]) -> Option<String> {
    valid_keys
        .iter()
        .map(|key| (strsim::jaro_winkler(unknown, key), *key))
        .filter(|(score, _)| *score > SUGGESTION_THRESHOLD)
        .max_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, key)| key.to_string())
}

/// Print every error to stderr through miette's graphical handler, followed
/// by a one-line count when there is more than one.
pub fn render_errors(errors: &[ConfigError]) {
    let handler = miette::GraphicalReportHandler::new();
    for error in errors {
        let mut rendered = String::new();
        match handler.render_report(&mut rendered, error as &dyn Diagnostic) {
            Ok(()) => eprint!("{rendered}"),
            Err(_) => eprintln!("Error: {error}"),
        }
    }
    if errors.len() > 1 {
        eprintln!("switchyard: {} configuration errors", errors.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suggest_api_key_for_typo() {
        let valid = &["name", "api_base", "api_key", "model"];
        assert_eq!(suggest_key("api_kye", valid), Some("api_key".to_string()));
    }

    #[test]
    fn suggest_classifier_timeout_for_typo() {
        let valid = &[
            "log_level",
            "classifier_timeout_secs",
            "backend_timeout_secs",
            "default_threshold",
        ];
        assert_eq!(
            suggest_key("classifer_timeout_secs", valid),
            Some("classifier_timeout_secs".to_string())
        );
    }

    #[test]
    fn no_suggestion_for_distant_typo() {
        let valid = &["name", "url", "llms"];
        assert_eq!(suggest_key("zzzzzz", valid), None);
    }

    #[test]
    fn find_key_offset_in_table() {
        let content = "[router]\nlog_levl = \"debug\"\n";
        let path = vec!["router".to_string()];
        let o = find_key_offset(content, &path, "log_levl").unwrap();
        assert_eq!(&content[o..o + 8], "log_levl");
    }

    #[test]
    fn find_key_offset_in_array_table() {
        let content = "[[policies]]\nname = \"p\"\nurl = \"u\"\n\n[[policies.llms]]\nname = \"A\"\nmodle = \"m\"\n";
        let path = vec![
            "policies".to_string(),
            "0".to_string(),
            "llms".to_string(),
            "0".to_string(),
        ];
        let o = find_key_offset(content, &path, "modle").unwrap();
        assert_eq!(&content[o..o + 5], "modle");
    }

    #[test]
    fn find_key_offset_follows_array_indices() {
        let content = "[[policies]]\nname = \"a\"\n\n[[policies.llms]]\nname = \"A\"\n\n\
                       [[policies]]\nname = \"b\"\n\n[[policies.llms]]\nname = \"B\"\n\n\
                       [[policies.llms]]\nname = \"C\"\napi_kye = \"k\"\n";
        let path: Vec<String> = ["policies", "1", "llms", "1"].map(String::from).to_vec();

        let offset = find_key_offset(content, &path, "api_kye").unwrap();
        assert!(content[offset..].starts_with("api_kye"));

        let first: Vec<String> = ["policies", "0", "llms", "0"].map(String::from).to_vec();
        assert_eq!(find_key_offset(content, &first, "api_kye"), None);

        let second_policy_name = find_key_offset(content, &path[..2], "name").unwrap();
        assert!(content[second_policy_name..].starts_with("name = \"b\""));
    }

    #[test]
    fn find_key_offset_stays_inside_table() {
        let content = "[router]\nlog_level = \"info\"\n\n[gateway]\nport = 1\n";
        let path = vec!["router".to_string()];
        assert_eq!(find_key_offset(content, &path, "port"), None);
    }

    #[test]
    fn missing_key_mentions_location() {
        let err = ConfigError::MissingKey {
            key: "model".to_string(),
            location: Some("policies.0.llms.1".to_string()),
        };
        assert_eq!(
            err.to_string(),
            "missing required key `model` in `policies.0.llms.1`"
        );
    }
}
