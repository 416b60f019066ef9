//! Top-level bootstrap failure, tagged with the stage that produced it.

use ignition_bus::EventHandlerError;
use ignition_config::{ConfigError, IdentityError};
use thiserror::Error;

use crate::instance::InstanceBuildError;
use crate::plugins::PluginError;

/// Why a bootstrap run failed.
///
/// Exactly one of these reaches the caller; no partial bootstrap is
/// considered usable, and nothing is swallowed along the way. The
/// [`stage`](BootstrapError::stage) label lets callers diagnose without
/// inspecting internals.
#[derive(Debug, Error)]
pub enum BootstrapError {
    /// A configuration layer failed to load or had the wrong shape.
    #[error("config stage failed: {0}")]
    Config(#[from] ConfigError),

    /// The install identity could not be derived.
    #[error("identity stage failed: {0}")]
    Identity(#[from] IdentityError),

    /// The instance factory rejected the resolved configuration.
    #[error("instance stage failed: {0}")]
    Instance(#[from] InstanceBuildError),

    /// A `pre-bootstrap` handler failed.
    #[error("pre-bootstrap stage failed: {0}")]
    PreBootstrap(#[source] EventHandlerError),

    /// A plugin failed to resolve or register.
    #[error("plugin '{name}' stage failed: {source}")]
    Plugin {
        /// The plugin being loaded.
        name: String,
        /// The loader failure.
        #[source]
        source: PluginError,
    },

    /// A `post-bootstrap` handler failed.
    #[error("post-bootstrap stage failed: {0}")]
    PostBootstrap(#[source] EventHandlerError),

    /// The caller's cancellation signal was raised between stages.
    #[error("bootstrap cancelled before the {stage} stage")]
    Cancelled {
        /// Stage that would have run next.
        stage: String,
    },
}

impl BootstrapError {
    /// Stable stage label: `config`, `identity`, `instance`,
    /// `pre-bootstrap`, `plugin:<name>`, or `post-bootstrap`.
    #[must_use]
    pub fn stage(&self) -> String {
        match self {
            Self::Config(_) => "config".to_string(),
            Self::Identity(_) => "identity".to_string(),
            Self::Instance(_) => "instance".to_string(),
            Self::PreBootstrap(_) => "pre-bootstrap".to_string(),
            Self::Plugin { name, .. } => format!("plugin:{name}"),
            Self::PostBootstrap(_) => "post-bootstrap".to_string(),
            Self::Cancelled { stage } => stage.clone(),
        }
    }
}
