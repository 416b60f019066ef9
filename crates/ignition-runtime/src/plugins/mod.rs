//! Pluggable extension modules.
//!
//! A plugin is addressed by name and discovered across ordered search
//! directories; discovery is manifest-based (`<dir>/<name>/plugin.toml` or
//! `<dir>/<name>.toml`), and the registration implementation is a
//! statically linked value the embedder registers up front. There is no
//! reflection and no dynamic code loading: the registry interface *is* the
//! plugin contract.
//!
//! On load, the plugin's registration entry point receives the instance and
//! may subscribe to lifecycle events, mutate configuration, or attach new
//! capabilities. Registration order matters, since later plugins may depend
//! on capabilities earlier ones attached, so the orchestrator loads plugins
//! strictly sequentially.

pub mod loader;
pub mod manifest;
pub mod registry;

pub use loader::PluginLoader;
pub use manifest::PluginManifest;
pub use registry::PluginRegistry;

use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

use crate::instance::Instance;

/// Failure reported by a plugin's own registration entry point.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct PluginRegisterError {
    /// Human-readable failure description.
    pub message: String,
}

impl PluginRegisterError {
    /// Creates a registration failure with the given description.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<String> for PluginRegisterError {
    fn from(message: String) -> Self {
        Self { message }
    }
}

impl From<&str> for PluginRegisterError {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

/// The capability every plugin must expose: a registration entry point
/// accepting the instance.
#[async_trait]
pub trait Plugin: Send + Sync {
    /// The name plugins are addressed by in config and manifests.
    fn name(&self) -> &str;

    /// Registers the plugin against the instance.
    async fn register(&self, instance: Arc<Instance>) -> Result<(), PluginRegisterError>;
}

/// Plugin resolution and registration failures.
#[derive(Debug, Error)]
pub enum PluginError {
    /// No search directory contained the plugin.
    #[error("plugin '{name}' not found (searched {searched:?})")]
    NotFound {
        /// The requested plugin.
        name: String,
        /// Directories probed, in order.
        searched: Vec<PathBuf>,
    },

    /// A manifest resolved but no implementation is registered under the
    /// name. Deployment and binary disagree about what is linked in.
    #[error("plugin '{name}' resolved but has no registered implementation")]
    Unregistered {
        /// The requested plugin.
        name: String,
    },

    /// Two implementations were registered under one name.
    #[error("plugin '{name}' is already registered")]
    Duplicate {
        /// The contested name.
        name: String,
    },

    /// The resolved manifest is unreadable, unparsable, or contradicts the
    /// requested name.
    #[error("plugin manifest {path} is invalid: {reason}")]
    Manifest {
        /// The offending manifest file.
        path: PathBuf,
        /// What was wrong with it.
        reason: String,
    },

    /// The plugin's registration entry point failed.
    #[error("plugin '{name}' failed to register: {source}")]
    Init {
        /// The failing plugin.
        name: String,
        /// Its reported failure.
        #[source]
        source: PluginRegisterError,
    },
}
