//! Named lifecycle events.

use std::fmt;

/// The synchronization points the bootstrap sequence exposes.
///
/// The string forms are stable, documented identifiers that plugins and
/// embedding callers key their subscriptions on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecycleEvent {
    /// Emitted after the instance is built, before plugins load.
    /// Payload: the resolved configuration (handlers may mutate it).
    PreBootstrap,
    /// Emitted after all plugins registered.
    /// Payload: the instance (handlers may attach capabilities).
    PostBootstrap,
}

impl LifecycleEvent {
    /// Stable event name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PreBootstrap => "pre-bootstrap",
            Self::PostBootstrap => "post-bootstrap",
        }
    }
}

impl fmt::Display for LifecycleEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
