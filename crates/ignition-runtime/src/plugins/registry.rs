//! Registry of statically linked plugin implementations.

use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

use super::{Plugin, PluginError};

/// Name-keyed registry of plugin implementations.
///
/// The embedding application registers every plugin its binary links in;
/// configuration and search directories then decide which of them actually
/// load, and in what order.
#[derive(Default)]
pub struct PluginRegistry {
    entries: RwLock<BTreeMap<String, Arc<dyn Plugin>>>,
}

impl PluginRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers one plugin implementation under its own name.
    pub fn register(&self, plugin: Arc<dyn Plugin>) -> Result<(), PluginError> {
        let name = plugin.name().to_string();
        let mut entries = self.entries.write();
        if entries.contains_key(&name) {
            return Err(PluginError::Duplicate { name });
        }
        debug!(plugin = %name, "Plugin implementation registered");
        entries.insert(name, plugin);
        Ok(())
    }

    /// Looks up an implementation by name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn Plugin>> {
        self.entries.read().get(name).cloned()
    }

    /// Number of registered implementations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Whether the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<String> {
        self.entries.read().keys().cloned().collect()
    }
}
