//! Caller-supplied bootstrap options.

use ignition_bus::{LifecycleEvent, LifecycleHandler};
use ignition_config::resolved::{
    KEY_LOG_LEVEL_CONSOLE, KEY_MODE, KEY_PLUGIN_DIRS, KEY_USER_CONF_ROOT,
};
use serde_json::{Map, Value};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::watch;

use crate::instance::BootPayload;

/// Options accepted by [`Bootstrapper::new`](crate::Bootstrapper::new).
///
/// The recognized config fields merge into the resolved configuration one
/// precedence level above the built-in defaults. Subscribers and the
/// cancellation signal steer the run itself and never appear in config.
#[derive(Clone, Default)]
pub struct BootstrapOptions {
    /// Console log level forwarded to the logger collaborator.
    pub log_level_console: Option<String>,
    /// Root configuration directory; seeds the install identity.
    pub user_conf_root: Option<PathBuf>,
    /// Enables the environment config source under this prefix.
    pub env_prefix: Option<String>,
    /// Ordered config file paths merged after the options layer.
    pub config_sources: Option<Vec<PathBuf>>,
    /// Ordered plugin search directories.
    pub plugin_dirs: Option<Vec<PathBuf>>,
    /// Opaque pass-through consumed by downstream collaborators.
    pub mode: Option<String>,

    pub(crate) pre_subscribers: Vec<Arc<dyn LifecycleHandler<BootPayload>>>,
    pub(crate) post_subscribers: Vec<Arc<dyn LifecycleHandler<BootPayload>>>,
    pub(crate) cancel: Option<watch::Receiver<bool>>,
}

impl BootstrapOptions {
    /// Empty options: defaults only, no files, no env source, no plugins.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the console log level.
    #[must_use]
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level_console = Some(level.into());
        self
    }

    /// Sets the root configuration directory (the identity seed).
    #[must_use]
    pub fn with_user_conf_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.user_conf_root = Some(root.into());
        self
    }

    /// Enables the environment config source under `prefix`.
    #[must_use]
    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = Some(prefix.into());
        self
    }

    /// Sets the ordered config file list.
    #[must_use]
    pub fn with_config_sources(mut self, paths: Vec<PathBuf>) -> Self {
        self.config_sources = Some(paths);
        self
    }

    /// Sets the ordered plugin search directories.
    #[must_use]
    pub fn with_plugin_dirs(mut self, dirs: Vec<PathBuf>) -> Self {
        self.plugin_dirs = Some(dirs);
        self
    }

    /// Sets the opaque `mode` pass-through.
    #[must_use]
    pub fn with_mode(mut self, mode: impl Into<String>) -> Self {
        self.mode = Some(mode.into());
        self
    }

    /// Subscribes a handler to `pre-bootstrap`, after earlier subscribers.
    #[must_use]
    pub fn on_pre_bootstrap(mut self, handler: Arc<dyn LifecycleHandler<BootPayload>>) -> Self {
        self.pre_subscribers.push(handler);
        self
    }

    /// Subscribes a handler to `post-bootstrap`, after earlier subscribers.
    #[must_use]
    pub fn on_post_bootstrap(mut self, handler: Arc<dyn LifecycleHandler<BootPayload>>) -> Self {
        self.post_subscribers.push(handler);
        self
    }

    /// Supplies a cancellation signal checked between bootstrap stages.
    #[must_use]
    pub fn with_cancel(mut self, cancel: watch::Receiver<bool>) -> Self {
        self.cancel = Some(cancel);
        self
    }

    /// Subscribers for one event, in registration order.
    pub(crate) fn subscribers(
        &self,
        event: LifecycleEvent,
    ) -> &[Arc<dyn LifecycleHandler<BootPayload>>] {
        match event {
            LifecycleEvent::PreBootstrap => &self.pre_subscribers,
            LifecycleEvent::PostBootstrap => &self.post_subscribers,
        }
    }

    /// Renders the recognized config fields as one merge layer.
    pub(crate) fn to_layer(&self) -> Value {
        let mut layer = Map::new();
        if let Some(level) = &self.log_level_console {
            layer.insert(KEY_LOG_LEVEL_CONSOLE.to_string(), Value::String(level.clone()));
        }
        if let Some(root) = &self.user_conf_root {
            layer.insert(KEY_USER_CONF_ROOT.to_string(), path_value(root));
        }
        if let Some(dirs) = &self.plugin_dirs {
            layer.insert(
                KEY_PLUGIN_DIRS.to_string(),
                Value::Array(dirs.iter().map(|dir| path_value(dir)).collect()),
            );
        }
        if let Some(mode) = &self.mode {
            layer.insert(KEY_MODE.to_string(), Value::String(mode.clone()));
        }
        Value::Object(layer)
    }
}

fn path_value(path: &Path) -> Value {
    Value::String(path.display().to_string())
}

impl fmt::Debug for BootstrapOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BootstrapOptions")
            .field("log_level_console", &self.log_level_console)
            .field("user_conf_root", &self.user_conf_root)
            .field("env_prefix", &self.env_prefix)
            .field("config_sources", &self.config_sources)
            .field("plugin_dirs", &self.plugin_dirs)
            .field("mode", &self.mode)
            .field("pre_subscribers", &self.pre_subscribers.len())
            .field("post_subscribers", &self.post_subscribers.len())
            .field("cancellable", &self.cancel.is_some())
            .finish()
    }
}
