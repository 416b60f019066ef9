//! Plugin manifest declaration and validation.

use serde::Deserialize;
use std::fs;
use std::path::Path;

use super::PluginError;

/// Declarative plugin manifest (`plugin.toml`).
///
/// The manifest marks a directory entry as a loadable plugin and pins the
/// name the implementation must be registered under. Everything else is
/// descriptive.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PluginManifest {
    /// Name the plugin is addressed by.
    pub name: String,
    /// Optional semantic version string.
    #[serde(default)]
    pub version: Option<String>,
    /// Optional human-readable description.
    #[serde(default)]
    pub description: Option<String>,
}

impl PluginManifest {
    /// Reads and parses a manifest file.
    pub fn load(path: &Path) -> Result<Self, PluginError> {
        let raw = fs::read_to_string(path).map_err(|err| PluginError::Manifest {
            path: path.to_path_buf(),
            reason: err.to_string(),
        })?;
        toml::from_str(&raw).map_err(|err| PluginError::Manifest {
            path: path.to_path_buf(),
            reason: err.to_string(),
        })
    }

    /// Checks the manifest names the plugin we asked for.
    pub fn ensure_matches(&self, expected: &str, path: &Path) -> Result<(), PluginError> {
        let declared = self.name.trim();
        if declared.is_empty() {
            return Err(PluginError::Manifest {
                path: path.to_path_buf(),
                reason: "manifest name must not be empty".to_string(),
            });
        }
        if declared != expected {
            return Err(PluginError::Manifest {
                path: path.to_path_buf(),
                reason: format!("manifest names '{declared}', expected '{expected}'"),
            });
        }
        Ok(())
    }
}
