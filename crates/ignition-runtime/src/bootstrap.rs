//! The bootstrap orchestrator.
//!
//! ## Stage Machine
//!
//! ```text
//! Created → ConfigMerged → IdentityAssigned → InstanceBuilt
//!         → PreBootstrapEmitted → PluginsLoaded → PostBootstrapEmitted
//!         → Ready
//! ```
//!
//! Linear, no branching except on failure: any stage's error moves the
//! machine to `Failed` carrying the originating cause, and nothing after
//! the failure point executes.
//!
//! ## Run-Once Guarantee
//!
//! The sequence executes at most once per process. The outcome, success or
//! failure, is memoized behind an async mutex held across the single
//! execution, so concurrent first callers queue up and share the in-flight
//! run's result instead of racing into their own.

use ignition_bus::LifecycleEvent;
use ignition_config::{
    defaults, derive_install_id, load_env, load_files, merge, resolved::KEY_ID, ResolvedConfig,
};
use parking_lot::RwLock;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, trace, warn};

use crate::error::BootstrapError;
use crate::instance::{BootPayload, Instance};
use crate::options::BootstrapOptions;
use crate::plugins::{PluginError, PluginRegistry};

/// Where the stage machine currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootstrapPhase {
    /// No run has started.
    Created,
    /// All configuration layers merged.
    ConfigMerged,
    /// Install identity attached to the config.
    IdentityAssigned,
    /// Instance built; no lifecycle event emitted yet.
    InstanceBuilt,
    /// `pre-bootstrap` handlers completed.
    PreBootstrapEmitted,
    /// Every configured plugin registered.
    PluginsLoaded,
    /// `post-bootstrap` handlers completed.
    PostBootstrapEmitted,
    /// Instance handed to the caller.
    Ready,
    /// A stage failed; the memoized error says which.
    Failed,
}

impl BootstrapPhase {
    /// Stable phase name for logs and diagnostics.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::ConfigMerged => "config-merged",
            Self::IdentityAssigned => "identity-assigned",
            Self::InstanceBuilt => "instance-built",
            Self::PreBootstrapEmitted => "pre-bootstrap-emitted",
            Self::PluginsLoaded => "plugins-loaded",
            Self::PostBootstrapEmitted => "post-bootstrap-emitted",
            Self::Ready => "ready",
            Self::Failed => "failed",
        }
    }

    /// Whether the machine can advance further.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Ready | Self::Failed)
    }
}

impl fmt::Display for BootstrapPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a bootstrap run produced. Cloned out to every caller.
pub type BootstrapOutcome = Result<Arc<Instance>, Arc<BootstrapError>>;

/// Run-once bootstrap entry point.
///
/// The embedding application constructs exactly one of these and calls
/// [`bootstrap`](Bootstrapper::bootstrap) from as many places as it likes;
/// every call observes the same outcome. No process-global state is
/// involved; the memoization lives in this value.
pub struct Bootstrapper {
    options: BootstrapOptions,
    registry: Arc<PluginRegistry>,
    outcome: Mutex<Option<BootstrapOutcome>>,
    phase: RwLock<BootstrapPhase>,
}

impl Bootstrapper {
    /// Creates a bootstrapper with an empty plugin registry.
    #[must_use]
    pub fn new(options: BootstrapOptions) -> Self {
        Self::with_registry(options, Arc::new(PluginRegistry::new()))
    }

    /// Creates a bootstrapper over an embedder-populated plugin registry.
    #[must_use]
    pub fn with_registry(options: BootstrapOptions, registry: Arc<PluginRegistry>) -> Self {
        Self {
            options,
            registry,
            outcome: Mutex::new(None),
            phase: RwLock::new(BootstrapPhase::Created),
        }
    }

    /// The plugin implementation registry.
    pub fn registry(&self) -> &Arc<PluginRegistry> {
        &self.registry
    }

    /// Current stage-machine position.
    #[must_use]
    pub fn phase(&self) -> BootstrapPhase {
        *self.phase.read()
    }

    /// Runs the bootstrap sequence, or returns the memoized outcome.
    ///
    /// The first caller executes the sequence while holding the outcome
    /// lock; concurrent callers await the lock and find the result already
    /// in place. Success and failure memoize alike: a failed bootstrap
    /// stays failed for the life of the process.
    pub async fn bootstrap(&self) -> BootstrapOutcome {
        let mut slot = self.outcome.lock().await;
        if let Some(outcome) = slot.as_ref() {
            debug!("Bootstrap already executed; returning memoized outcome");
            return outcome.clone();
        }

        let outcome = match self.run().await {
            Ok(instance) => {
                self.advance(BootstrapPhase::Ready);
                Ok(instance)
            }
            Err(err) => {
                warn!(stage = %err.stage(), error = %err, "Bootstrap failed");
                *self.phase.write() = BootstrapPhase::Failed;
                Err(Arc::new(err))
            }
        };
        *slot = Some(outcome.clone());
        outcome
    }

    /// The sequence proper. Strictly ordered; every `?` is a terminal exit.
    async fn run(&self) -> Result<Arc<Instance>, BootstrapError> {
        info!("Bootstrap starting");

        // Stage: config. defaults < options < files < env.
        self.check_cancel("config")?;
        let mut layered = defaults();
        merge(&mut layered, self.options.to_layer());
        if let Some(paths) = &self.options.config_sources {
            merge(&mut layered, load_files(paths)?);
        }
        if let Some(prefix) = &self.options.env_prefix {
            merge(&mut layered, load_env(prefix));
        }
        let mut config = ResolvedConfig::from_value(layered)?;
        self.advance(BootstrapPhase::ConfigMerged);

        // Stage: identity.
        self.check_cancel("identity")?;
        let install_id = derive_install_id(&config)?;
        config.set(KEY_ID, Value::String(install_id.as_str().to_string()));
        self.advance(BootstrapPhase::IdentityAssigned);

        // Stage: instance.
        self.check_cancel("instance")?;
        let instance = Instance::from_config(config, Arc::clone(&self.registry))?;
        for event in [LifecycleEvent::PreBootstrap, LifecycleEvent::PostBootstrap] {
            for handler in self.options.subscribers(event) {
                instance.events().on(event, Arc::clone(handler));
            }
        }
        self.advance(BootstrapPhase::InstanceBuilt);
        info!(
            install_id = %instance.install_id(),
            run_id = %instance.run_id(),
            "Instance built"
        );

        // Stage: pre-bootstrap. Handlers may mutate the config.
        self.check_cancel("pre-bootstrap")?;
        instance
            .events()
            .emit(
                LifecycleEvent::PreBootstrap,
                BootPayload::Config(Arc::clone(instance.config())),
            )
            .await
            .map_err(BootstrapError::PreBootstrap)?;
        self.advance(BootstrapPhase::PreBootstrapEmitted);
        trace!(config = %instance.config().read().to_value(), "Config finalized");

        // Stage: plugins. Re-read the (possibly handler-mutated) list and
        // load strictly in order; later plugins may depend on capabilities
        // earlier ones attached.
        let (plugin_names, plugin_dirs, fail_fast) = {
            let config = instance.config().read();
            (
                config.plugins()?,
                config.plugin_dirs()?,
                config.plugin_fail_fast(),
            )
        };
        for name in plugin_names {
            self.check_cancel(&format!("plugin:{name}"))?;
            match instance
                .plugins()
                .load(&name, &plugin_dirs, Arc::clone(&instance))
                .await
            {
                Ok(()) => {}
                Err(err @ PluginError::Init { .. }) if !fail_fast => {
                    warn!(plugin = %name, error = %err, "Plugin failed; continuing");
                }
                Err(err) => {
                    return Err(BootstrapError::Plugin { name, source: err });
                }
            }
        }
        self.advance(BootstrapPhase::PluginsLoaded);

        // Stage: post-bootstrap. Handlers may attach capabilities.
        self.check_cancel("post-bootstrap")?;
        instance
            .events()
            .emit(
                LifecycleEvent::PostBootstrap,
                BootPayload::Instance(Arc::clone(&instance)),
            )
            .await
            .map_err(BootstrapError::PostBootstrap)?;
        self.advance(BootstrapPhase::PostBootstrapEmitted);

        info!(
            plugins = instance.plugins().loaded().len(),
            "Bootstrap complete"
        );
        Ok(instance)
    }

    fn advance(&self, phase: BootstrapPhase) {
        debug!(phase = %phase, "Bootstrap phase reached");
        *self.phase.write() = phase;
    }

    /// Cancellation is honored between stages only, never mid-stage.
    fn check_cancel(&self, next_stage: &str) -> Result<(), BootstrapError> {
        if let Some(cancel) = &self.options.cancel {
            if *cancel.borrow() {
                return Err(BootstrapError::Cancelled {
                    stage: next_stage.to_string(),
                });
            }
        }
        Ok(())
    }
}

impl fmt::Debug for Bootstrapper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bootstrapper")
            .field("phase", &self.phase())
            .field("registered_plugins", &self.registry.len())
            .finish_non_exhaustive()
    }
}
