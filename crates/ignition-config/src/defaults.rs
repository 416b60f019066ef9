//! Built-in baseline configuration.

use serde_json::{json, Value};

/// Default console log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Returns the built-in baseline configuration.
///
/// This is the lowest-precedence layer and never touches disk or the
/// environment. Every key here can be overridden by caller options, files,
/// or environment variables.
pub fn defaults() -> Value {
    json!({
        "log_level_console": DEFAULT_LOG_LEVEL,
        "plugins": [],
        "plugin_dirs": [],
        "plugin_fail_fast": true,
    })
}
