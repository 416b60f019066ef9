//! File-sourced configuration.
//!
//! Files are read once, synchronously, at the start of a bootstrap call.
//! A missing or unparsable file is a hard failure; there is no best-effort
//! partial merge, because a silently half-applied config file is worse than
//! an aborted bootstrap.

use crate::error::ConfigError;
use crate::merge::merge;
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Reads and deep-merges the given config files, in order.
///
/// Supported formats by extension: `.json`, `.toml`. Later files win on
/// key collision.
pub fn load_files(paths: &[PathBuf]) -> Result<Value, ConfigError> {
    let mut resolved = Value::Object(Map::new());
    for path in paths {
        let layer = load_file(path)?;
        debug!(path = %path.display(), "Merged config file");
        merge(&mut resolved, layer);
    }
    Ok(resolved)
}

fn load_file(path: &Path) -> Result<Value, ConfigError> {
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;

    let extension = path.extension().and_then(|ext| ext.to_str());
    let parsed = match extension {
        Some("json") => {
            serde_json::from_str::<Value>(&raw).map_err(|err| ConfigError::FileParse {
                path: path.to_path_buf(),
                reason: err.to_string(),
            })?
        }
        Some("toml") => {
            let table: toml::Value =
                toml::from_str(&raw).map_err(|err| ConfigError::FileParse {
                    path: path.to_path_buf(),
                    reason: err.to_string(),
                })?;
            serde_json::to_value(table).map_err(|err| ConfigError::FileParse {
                path: path.to_path_buf(),
                reason: err.to_string(),
            })?
        }
        _ => {
            return Err(ConfigError::UnsupportedFormat {
                path: path.to_path_buf(),
            })
        }
    };

    if !parsed.is_object() {
        return Err(ConfigError::FileParse {
            path: path.to_path_buf(),
            reason: "top-level value must be a mapping".to_string(),
        });
    }
    Ok(parsed)
}
