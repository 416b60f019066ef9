//! Handler contract and closure adapter.

use async_trait::async_trait;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use thiserror::Error;

/// Failure reported by a single lifecycle handler.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct HandlerError {
    /// Human-readable failure description.
    pub message: String,
}

impl HandlerError {
    /// Creates a handler failure with the given description.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<String> for HandlerError {
    fn from(message: String) -> Self {
        Self { message }
    }
}

impl From<&str> for HandlerError {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

/// A named subscriber to one lifecycle event.
///
/// Handlers may perform asynchronous work; the bus awaits each to
/// completion before invoking the next.
#[async_trait]
pub trait LifecycleHandler<P>: Send + Sync
where
    P: Send + 'static,
{
    /// Identity used in ordering diagnostics and failure reports.
    fn name(&self) -> &str;

    /// Runs the handler against the event payload.
    async fn handle(&self, payload: P) -> Result<(), HandlerError>;
}

type BoxedHandlerFn<P> = Box<
    dyn Fn(P) -> Pin<Box<dyn Future<Output = Result<(), HandlerError>> + Send>> + Send + Sync,
>;

struct FnHandler<P> {
    name: String,
    func: BoxedHandlerFn<P>,
}

#[async_trait]
impl<P> LifecycleHandler<P> for FnHandler<P>
where
    P: Send + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    async fn handle(&self, payload: P) -> Result<(), HandlerError> {
        (self.func)(payload).await
    }
}

/// Wraps an async closure as a named handler.
pub fn handler_fn<P, F, Fut>(name: impl Into<String>, func: F) -> Arc<dyn LifecycleHandler<P>>
where
    P: Send + 'static,
    F: Fn(P) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), HandlerError>> + Send + 'static,
{
    Arc::new(FnHandler {
        name: name.into(),
        func: Box::new(move |payload| Box::pin(func(payload))),
    })
}
