//! Environment-sourced configuration.
//!
//! Variables named `<PREFIX>_REST` contribute config keys. The remainder is
//! lowercased and split on `__`, each split adding one level of nesting:
//!
//! ```text
//! IGNITION_LOG_LEVEL_CONSOLE=debug      → { "log_level_console": "debug" }
//! IGNITION_PROXY__HTTP_PORT=8080        → { "proxy": { "http_port": 8080 } }
//! ```
//!
//! Values that parse as JSON become typed scalars (`true`, `8080`, `null`);
//! everything else stays a string. Zero matching variables is success with
//! an empty layer, never an error.

use serde_json::{Map, Value};
use tracing::warn;

use crate::ENV_NESTING_DELIMITER;

/// Scans the process environment for variables under `prefix`.
pub fn load_env(prefix: &str) -> Value {
    load_env_from(prefix, std::env::vars())
}

/// Same scan over an explicit variable set. Seam for tests and embedders
/// that snapshot the environment themselves.
pub fn load_env_from<I>(prefix: &str, vars: I) -> Value
where
    I: IntoIterator<Item = (String, String)>,
{
    let full_prefix = format!("{}_", prefix.trim_end_matches('_'));

    // Process env iteration order is unspecified; sort so that overlapping
    // names resolve the same way on every run.
    let mut matched: Vec<(String, String)> = vars
        .into_iter()
        .filter_map(|(name, value)| {
            name.strip_prefix(&full_prefix)
                .map(|rest| (rest.to_string(), value))
        })
        .collect();
    matched.sort();

    let mut root = Map::new();
    for (rest, raw) in matched {
        let segments: Vec<String> = rest
            .split(ENV_NESTING_DELIMITER)
            .map(|segment| segment.trim_matches('_').to_ascii_lowercase())
            .collect();
        if segments.iter().any(String::is_empty) {
            warn!(
                variable = format!("{full_prefix}{rest}"),
                "Skipping env var with empty key segment"
            );
            continue;
        }
        insert_path(&mut root, &segments, coerce(&raw));
    }
    Value::Object(root)
}

/// Walks/creates nested mappings and sets the leaf value.
fn insert_path(root: &mut Map<String, Value>, segments: &[String], value: Value) {
    let (leaf, branch) = segments.split_last().expect("segments are non-empty");
    let mut cursor = root;
    for segment in branch {
        let slot = cursor
            .entry(segment.clone())
            .or_insert_with(|| Value::Object(Map::new()));
        if !slot.is_object() {
            // A deeper name wins over an earlier scalar at the same key.
            *slot = Value::Object(Map::new());
        }
        cursor = slot.as_object_mut().expect("slot was just made a mapping");
    }
    cursor.insert(leaf.clone(), value);
}

fn coerce(raw: &str) -> Value {
    serde_json::from_str::<Value>(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}
