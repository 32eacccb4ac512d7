//! Store options
//!
//! Options can be deserialized from any serde source or overridden from the
//! environment with the `CONFSTORE_` prefix:
//!
//! - `CONFSTORE_DEFAULT_VERSION` -> `default_version`
//! - `CONFSTORE_JSON_INDENT` -> `json_indent`
//! - `CONFSTORE_INGEST_ENV` -> `ingest_environment`

use std::collections::HashMap;

use confstore_format::{DEFAULT_JSON_INDENT, MAX_JSON_INDENT};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Version recorded when load/save is called without one
pub const DEFAULT_VERSION: &str = "1.0.0";

const ENV_PREFIX: &str = "CONFSTORE_";

/// Tunables for a [`crate::ConfigStore`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreOptions {
    /// Version used by `load_from_file`/`save_to_file` without an explicit one
    pub default_version: String,
    /// Indent width of JSON documents and backups, clamped to
    /// [`MAX_JSON_INDENT`] when encoding
    pub json_indent: usize,
    /// Whether the environment overlay ingests every variable as a new key
    pub ingest_environment: bool,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            default_version: DEFAULT_VERSION.to_string(),
            json_indent: DEFAULT_JSON_INDENT,
            ingest_environment: true,
        }
    }
}

impl StoreOptions {
    /// Defaults with `CONFSTORE_*` overrides from the process environment
    pub fn from_env() -> Self {
        let overrides: HashMap<String, String> = std::env::vars()
            .filter_map(|(key, value)| {
                key.strip_prefix(ENV_PREFIX)
                    .map(|name| (name.to_lowercase(), value))
            })
            .collect();
        let mut options = Self::default();
        options.apply_overrides(&overrides);
        options
    }

    /// Apply overrides keyed by lowercase option name
    ///
    /// Values that fail to parse are logged and ignored.
    pub fn apply_overrides(&mut self, overrides: &HashMap<String, String>) {
        for (name, value) in overrides {
            match name.as_str() {
                "default_version" => self.default_version = value.clone(),
                "json_indent" => match value.parse::<usize>() {
                    Ok(indent) if indent <= MAX_JSON_INDENT => self.json_indent = indent,
                    _ => warn!(
                        "Ignoring invalid {}JSON_INDENT: {} (expected 0 to {})",
                        ENV_PREFIX, value, MAX_JSON_INDENT
                    ),
                },
                "ingest_env" | "ingest_environment" => match parse_flag(value) {
                    Some(flag) => self.ingest_environment = flag,
                    None => warn!("Ignoring invalid {}INGEST_ENV: {}", ENV_PREFIX, value),
                },
                _ => {}
            }
        }
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
