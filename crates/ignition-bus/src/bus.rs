//! The lifecycle event bus.

use crate::event::LifecycleEvent;
use crate::handler::{HandlerError, LifecycleHandler};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, trace};

/// A lifecycle handler failure, wrapped with the event name and the
/// identity of the handler that failed.
#[derive(Debug, Clone, Error)]
#[error("handler '{handler}' failed during {event}: {source}")]
pub struct EventHandlerError {
    /// Event being dispatched.
    pub event: LifecycleEvent,
    /// Name of the failing handler.
    pub handler: String,
    /// The handler's own failure.
    #[source]
    pub source: HandlerError,
}

/// In-memory lifecycle event bus with ordered, awaited dispatch.
///
/// Unlike a broadcast channel, dispatch here is a join point: `emit` owns
/// the completion of every handler and surfaces the first failure. That
/// keeps ordering and failure propagation an explicit contract rather than
/// implicit event-loop behavior.
pub struct LifecycleBus<P> {
    handlers: RwLock<HashMap<LifecycleEvent, Vec<Arc<dyn LifecycleHandler<P>>>>>,
    events_emitted: AtomicU64,
}

impl<P> LifecycleBus<P>
where
    P: Clone + Send + Sync + 'static,
{
    /// Creates an empty bus.
    #[must_use]
    pub fn new() -> Self {
        Self {
            handlers: RwLock::new(HashMap::new()),
            events_emitted: AtomicU64::new(0),
        }
    }

    /// Registers a handler for `event`, appended after existing ones.
    pub fn on(&self, event: LifecycleEvent, handler: Arc<dyn LifecycleHandler<P>>) {
        trace!(event = %event, handler = handler.name(), "Handler registered");
        self.handlers.write().entry(event).or_default().push(handler);
    }

    /// Number of handlers currently registered for `event`.
    #[must_use]
    pub fn handler_count(&self, event: LifecycleEvent) -> usize {
        self.handlers
            .read()
            .get(&event)
            .map_or(0, Vec::len)
    }

    /// Total `emit` calls on this bus.
    #[must_use]
    pub fn events_emitted(&self) -> u64 {
        self.events_emitted.load(Ordering::Relaxed)
    }

    /// Dispatches `event` to every registered handler, in registration
    /// order, awaiting each to completion.
    ///
    /// Aborts on the first handler failure; handlers after the failing one
    /// do not run. Handlers registered during this dispatch are not part of
    /// it; the list is snapshotted up front.
    pub async fn emit(&self, event: LifecycleEvent, payload: P) -> Result<(), EventHandlerError> {
        let snapshot: Vec<Arc<dyn LifecycleHandler<P>>> = self
            .handlers
            .read()
            .get(&event)
            .cloned()
            .unwrap_or_default();

        self.events_emitted.fetch_add(1, Ordering::Relaxed);
        debug!(event = %event, handlers = snapshot.len(), "Dispatching lifecycle event");

        for handler in snapshot {
            trace!(event = %event, handler = handler.name(), "Awaiting handler");
            handler
                .handle(payload.clone())
                .await
                .map_err(|source| EventHandlerError {
                    event,
                    handler: handler.name().to_string(),
                    source,
                })?;
        }
        Ok(())
    }
}

impl<P> Default for LifecycleBus<P>
where
    P: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}
