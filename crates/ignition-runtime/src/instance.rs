//! The application instance and its factory.
//!
//! Exactly one [`Instance`] exists per process lifetime, by construction
//! through the run-once [`Bootstrapper`](crate::bootstrap::Bootstrapper)
//! rather than through ambient global state. The instance owns the resolved
//! configuration, the lifecycle event bus, and the plugin loader.

use ignition_bus::LifecycleBus;
use ignition_config::{InstallId, ResolvedConfig};
use parking_lot::RwLock;
use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tracing::Level;
use uuid::Uuid;

use crate::plugins::{PluginLoader, PluginRegistry};

/// Resolved configuration shared between the instance, lifecycle handlers,
/// and plugins. Writable during `pre-bootstrap`; later writers may add new
/// top-level keys but must not remove the ones the runtime consumes.
pub type SharedConfig = Arc<RwLock<ResolvedConfig>>;

/// The instance's event bus, carrying [`BootPayload`]s.
pub type EventBus = LifecycleBus<BootPayload>;

/// Payload handed to lifecycle handlers.
#[derive(Clone)]
pub enum BootPayload {
    /// `pre-bootstrap`: the resolved configuration.
    Config(SharedConfig),
    /// `post-bootstrap`: the fully built instance.
    Instance(Arc<Instance>),
}

/// Instance factory failures.
#[derive(Debug, Error)]
pub enum InstanceBuildError {
    /// The configured console log level is not a known level.
    #[error("invalid console log level '{value}'")]
    InvalidLogLevel {
        /// The rejected value.
        value: String,
    },

    /// The factory ran before the identity stage assigned an id.
    #[error("resolved config carries no install id")]
    MissingInstallId,
}

/// Attempt to attach a capability under a name already taken.
#[derive(Debug, Clone, Error)]
#[error("capability '{name}' is already attached")]
pub struct DuplicateCapability {
    /// The contested capability name.
    pub name: String,
}

/// The single application instance produced by bootstrap.
pub struct Instance {
    config: SharedConfig,
    events: Arc<EventBus>,
    plugins: Arc<PluginLoader>,
    capabilities: RwLock<BTreeMap<String, Arc<dyn Any + Send + Sync>>>,
    install_id: InstallId,
    run_id: Uuid,
    log_level: Level,
}

impl Instance {
    /// Builds the instance from an identity-assigned resolved config.
    ///
    /// Synchronous and side-effect free beyond allocating the owned
    /// sub-objects (fresh event bus, fresh loader bound to `registry`).
    /// Emits no lifecycle event; that is the orchestrator's job.
    pub(crate) fn from_config(
        config: ResolvedConfig,
        registry: Arc<PluginRegistry>,
    ) -> Result<Arc<Self>, InstanceBuildError> {
        let level_raw = config.log_level_console().to_string();
        let log_level = level_raw
            .parse::<Level>()
            .map_err(|_| InstanceBuildError::InvalidLogLevel { value: level_raw })?;

        let install_id = config
            .id()
            .map(InstallId::new)
            .ok_or(InstanceBuildError::MissingInstallId)?;

        Ok(Arc::new(Self {
            config: Arc::new(RwLock::new(config)),
            events: Arc::new(EventBus::new()),
            plugins: Arc::new(PluginLoader::new(registry)),
            capabilities: RwLock::new(BTreeMap::new()),
            install_id,
            run_id: Uuid::new_v4(),
            log_level,
        }))
    }

    /// The resolved configuration.
    pub fn config(&self) -> &SharedConfig {
        &self.config
    }

    /// The lifecycle event bus.
    pub fn events(&self) -> &Arc<EventBus> {
        &self.events
    }

    /// The plugin loader bound to this instance's registry.
    pub fn plugins(&self) -> &Arc<PluginLoader> {
        &self.plugins
    }

    /// Deterministic per-installation identity.
    pub fn install_id(&self) -> &InstallId {
        &self.install_id
    }

    /// Random per-process id, for log correlation only.
    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    /// Console log level the configuration selected.
    pub fn log_level(&self) -> Level {
        self.log_level
    }

    /// Attaches a named capability for later plugins/handlers to find.
    ///
    /// Names are first-come-first-served: plugins load in list order, so an
    /// earlier plugin's capability cannot be displaced by a later one.
    pub fn attach_capability(
        &self,
        name: impl Into<String>,
        capability: Arc<dyn Any + Send + Sync>,
    ) -> Result<(), DuplicateCapability> {
        let name = name.into();
        let mut capabilities = self.capabilities.write();
        if capabilities.contains_key(&name) {
            return Err(DuplicateCapability { name });
        }
        capabilities.insert(name, capability);
        Ok(())
    }

    /// Looks up a capability by name.
    pub fn capability(&self, name: &str) -> Option<Arc<dyn Any + Send + Sync>> {
        self.capabilities.read().get(name).cloned()
    }

    /// Looks up a capability and downcasts it to a concrete type.
    pub fn capability_as<T>(&self, name: &str) -> Option<Arc<T>>
    where
        T: Any + Send + Sync,
    {
        self.capability(name).and_then(|cap| cap.downcast::<T>().ok())
    }

    /// Names of all attached capabilities, sorted.
    pub fn capability_names(&self) -> Vec<String> {
        self.capabilities.read().keys().cloned().collect()
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instance")
            .field("install_id", &self.install_id)
            .field("run_id", &self.run_id)
            .field("log_level", &self.log_level)
            .field("capabilities", &self.capability_names())
            .finish_non_exhaustive()
    }
}
