//! # Ignition Runtime
//!
//! The run-once application bootstrap orchestrator.
//!
//! ## Bootstrap Flow
//!
//! ```text
//! defaults ⊕ options ⊕ files ⊕ env     (ignition-config, fixed precedence)
//!        │
//!        ▼
//!   attach install id                  (SHA-256 of the configured root dir)
//!        │
//!        ▼
//!   build Instance                     (config + event bus + plugin loader)
//!        │
//!        ▼
//!   emit pre-bootstrap(config)         (handlers may mutate config)
//!        │
//!        ▼
//!   load plugins, in list order        (first matching search dir wins)
//!        │
//!        ▼
//!   emit post-bootstrap(instance)      (handlers may attach capabilities)
//!        │
//!        ▼
//!      Ready
//! ```
//!
//! Every stage runs strictly after the previous one; a failure at any stage
//! aborts the remainder and surfaces a [`BootstrapError`] naming the stage.
//! The [`Bootstrapper`] memoizes the outcome, so the sequence executes at
//! most once per process no matter how many callers race into it.

pub mod bootstrap;
pub mod error;
pub mod instance;
pub mod options;
pub mod plugins;

pub use bootstrap::{BootstrapOutcome, BootstrapPhase, Bootstrapper};
pub use error::BootstrapError;
pub use instance::{
    BootPayload, DuplicateCapability, EventBus, Instance, InstanceBuildError, SharedConfig,
};
pub use options::BootstrapOptions;
pub use plugins::{
    Plugin, PluginError, PluginLoader, PluginManifest, PluginRegisterError, PluginRegistry,
};
