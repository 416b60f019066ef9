//! The resolved configuration mapping and its typed accessors.

use crate::error::ConfigError;
use serde_json::{Map, Value};
use std::path::PathBuf;

/// Config key holding the derived install identity.
pub const KEY_ID: &str = "id";
/// Config key holding the root configuration directory (the identity seed).
pub const KEY_USER_CONF_ROOT: &str = "user_conf_root";
/// Config key holding the console log level.
pub const KEY_LOG_LEVEL_CONSOLE: &str = "log_level_console";
/// Config key holding the ordered plugin name list.
pub const KEY_PLUGINS: &str = "plugins";
/// Config key holding the ordered plugin search directories.
pub const KEY_PLUGIN_DIRS: &str = "plugin_dirs";
/// Config key selecting abort-on-first-failure plugin loading.
pub const KEY_PLUGIN_FAIL_FAST: &str = "plugin_fail_fast";
/// Opaque pass-through key consumed by downstream collaborators.
pub const KEY_MODE: &str = "mode";

/// The single mapping produced by merging every configuration layer.
///
/// Mutable while `pre-bootstrap` handlers run; the runtime re-reads the
/// keys it consumes after that event, so handler mutations are honored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedConfig {
    inner: Map<String, Value>,
}

impl ResolvedConfig {
    /// Wraps a merged value, rejecting non-mapping roots.
    pub fn from_value(value: Value) -> Result<Self, ConfigError> {
        match value {
            Value::Object(inner) => Ok(Self { inner }),
            other => Err(ConfigError::InvalidRoot {
                found: json_type_name(&other),
            }),
        }
    }

    /// Returns the value under `key`, if any.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.inner.get(key)
    }

    /// Inserts or replaces a top-level key.
    pub fn set(&mut self, key: impl Into<String>, value: Value) {
        self.inner.insert(key.into(), value);
    }

    /// Snapshot of the full mapping, e.g. for trace logging.
    pub fn to_value(&self) -> Value {
        Value::Object(self.inner.clone())
    }

    /// The derived install identity, once assigned.
    pub fn id(&self) -> Option<&str> {
        self.get(KEY_ID).and_then(Value::as_str)
    }

    /// The configured root configuration directory.
    pub fn user_conf_root(&self) -> Option<&Value> {
        self.get(KEY_USER_CONF_ROOT)
    }

    /// Console log level, falling back to the built-in default.
    pub fn log_level_console(&self) -> &str {
        self.get(KEY_LOG_LEVEL_CONSOLE)
            .and_then(Value::as_str)
            .unwrap_or(crate::defaults::DEFAULT_LOG_LEVEL)
    }

    /// Ordered plugin name list.
    ///
    /// A missing key reads as an empty list; a present key must be a
    /// sequence of strings.
    pub fn plugins(&self) -> Result<Vec<String>, ConfigError> {
        string_list(&self.inner, KEY_PLUGINS)
    }

    /// Ordered plugin search directories.
    pub fn plugin_dirs(&self) -> Result<Vec<PathBuf>, ConfigError> {
        Ok(string_list(&self.inner, KEY_PLUGIN_DIRS)?
            .into_iter()
            .map(PathBuf::from)
            .collect())
    }

    /// Whether a plugin registration failure aborts bootstrap.
    pub fn plugin_fail_fast(&self) -> bool {
        self.get(KEY_PLUGIN_FAIL_FAST)
            .and_then(Value::as_bool)
            .unwrap_or(true)
    }

    /// The opaque `mode` pass-through, if set.
    pub fn mode(&self) -> Option<&str> {
        self.get(KEY_MODE).and_then(Value::as_str)
    }
}

fn string_list(map: &Map<String, Value>, key: &str) -> Result<Vec<String>, ConfigError> {
    let Some(value) = map.get(key) else {
        return Ok(Vec::new());
    };
    let Some(items) = value.as_array() else {
        return Err(ConfigError::InvalidKey {
            key: key.to_string(),
            reason: format!("expected a sequence, found {}", json_type_name(value)),
        });
    };
    items
        .iter()
        .map(|item| {
            item.as_str().map(str::to_string).ok_or_else(|| ConfigError::InvalidKey {
                key: key.to_string(),
                reason: format!("expected string entries, found {}", json_type_name(item)),
            })
        })
        .collect()
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "sequence",
        Value::Object(_) => "mapping",
    }
}
