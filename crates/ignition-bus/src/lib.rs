//! # Ignition Bus
//!
//! Publish/subscribe mechanism for named bootstrap lifecycle events.
//!
//! ## Contract
//!
//! - Handlers run in **registration order**, one at a time; `emit` returns
//!   only after every handler has finished.
//! - The first handler failure aborts the dispatch and surfaces an error
//!   naming the event and the handler; remaining handlers do not run.
//! - Handlers registered while an `emit` is in flight join the next
//!   dispatch, not the current one (the handler list is snapshotted).
//!
//! ```text
//! ┌───────────┐   on(event, H1..H3)   ┌──────────────┐
//! │ Plugin /  │ ─────────────────────▶│ LifecycleBus │
//! │ Embedder  │                       │  H1 → H2 → H3│
//! └───────────┘   emit(event, p).await└──────────────┘
//!                  completes after H3 (or first failure)
//! ```
//!
//! The bus is generic over the payload so the runtime crate can hand the
//! resolved config to `pre-bootstrap` handlers and the built instance to
//! `post-bootstrap` handlers through one mechanism.

pub mod bus;
pub mod event;
pub mod handler;

pub use bus::{EventHandlerError, LifecycleBus};
pub use event::LifecycleEvent;
pub use handler::{handler_fn, HandlerError, LifecycleHandler};
