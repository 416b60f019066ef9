//! Plugin resolution and loading.

use std::path::PathBuf;
use std::sync::Arc;
use parking_lot::RwLock;
use tracing::{debug, info};

use super::manifest::PluginManifest;
use super::registry::PluginRegistry;
use super::PluginError;
use crate::instance::Instance;

/// Manifest file name inside a plugin directory.
pub const MANIFEST_FILE: &str = "plugin.toml";

/// Resolves a plugin name against ordered search directories.
///
/// Per directory, `<dir>/<name>/plugin.toml` is probed before
/// `<dir>/<name>.toml`; the first hit wins, so earlier directories shadow
/// later ones.
pub fn resolve(name: &str, search_dirs: &[PathBuf]) -> Result<PathBuf, PluginError> {
    for dir in search_dirs {
        for candidate in [
            dir.join(name).join(MANIFEST_FILE),
            dir.join(format!("{name}.toml")),
        ] {
            if candidate.is_file() {
                return Ok(candidate);
            }
        }
    }
    Err(PluginError::NotFound {
        name: name.to_string(),
        searched: search_dirs.to_vec(),
    })
}

/// Loads plugins: resolve the manifest, look up the linked implementation,
/// invoke its registration entry point with the instance.
pub struct PluginLoader {
    registry: Arc<PluginRegistry>,
    loaded: RwLock<Vec<String>>,
}

impl PluginLoader {
    /// Creates a loader over the given implementation registry.
    pub fn new(registry: Arc<PluginRegistry>) -> Self {
        Self {
            registry,
            loaded: RwLock::new(Vec::new()),
        }
    }

    /// The implementation registry this loader consults.
    pub fn registry(&self) -> &Arc<PluginRegistry> {
        &self.registry
    }

    /// Resolves and registers one plugin against `instance`.
    ///
    /// Registration runs to completion before this returns, so callers
    /// loading a list sequentially get strict ordering between plugins.
    pub async fn load(
        &self,
        name: &str,
        search_dirs: &[PathBuf],
        instance: Arc<Instance>,
    ) -> Result<(), PluginError> {
        let manifest_path = resolve(name, search_dirs)?;
        let manifest = PluginManifest::load(&manifest_path)?;
        manifest.ensure_matches(name, &manifest_path)?;

        let plugin = self
            .registry
            .get(name)
            .ok_or_else(|| PluginError::Unregistered {
                name: name.to_string(),
            })?;

        debug!(
            plugin = %name,
            manifest = %manifest_path.display(),
            version = manifest.version.as_deref().unwrap_or("unspecified"),
            "Registering plugin"
        );
        plugin
            .register(instance)
            .await
            .map_err(|source| PluginError::Init {
                name: name.to_string(),
                source,
            })?;

        self.loaded.write().push(name.to_string());
        info!(plugin = %name, "Plugin registered");
        Ok(())
    }

    /// Names of successfully loaded plugins, in load order.
    pub fn loaded(&self) -> Vec<String> {
        self.loaded.read().clone()
    }
}
