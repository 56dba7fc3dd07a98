//! Handler abstraction for the Herald dispatch core.
//!
//! A handler is a named async callable invoked once per matching event.
//! Handlers are pure side-effect triggers to the core: their internal
//! behavior is opaque, and the only thing the dispatcher observes is the
//! returned [`HandlerResult`].
//!
//! Plain async functions and closures become handlers through
//! [`handler`], which erases the concrete future type and attaches a name
//! used in registry logs and failure reports:
//!
//! ```rust,ignore
//! use herald_core::{Event, handler};
//! use std::sync::Arc;
//!
//! async fn send_confirmation(event: Arc<Event>) -> anyhow::Result<()> {
//!     // ...
//!     Ok(())
//! }
//!
//! let boxed = handler("send_confirmation", send_confirmation);
//!
//! // Infallible handlers work too: `()` converts to a success outcome.
//! let noop = handler("noop", |_event| async {});
//! ```

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures::future::BoxFuture;

use crate::error::{BoxError, HandlerResult};
use crate::event::Event;

/// Type-erased handler function stored in the registry.
type ErasedFn = dyn Fn(Arc<Event>) -> BoxFuture<'static, HandlerResult> + Send + Sync;

/// A named, type-erased event handler.
///
/// Cheap to clone; the underlying function is shared behind an `Arc`.
#[derive(Clone)]
pub struct BoxedHandler {
    name: Arc<str>,
    f: Arc<ErasedFn>,
}

impl BoxedHandler {
    /// Returns the handler's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Invokes the handler with the given event.
    pub fn call(&self, event: Arc<Event>) -> BoxFuture<'static, HandlerResult> {
        (self.f)(event)
    }
}

impl fmt::Debug for BoxedHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoxedHandler")
            .field("name", &self.name)
            .finish()
    }
}

// =============================================================================
// Handler Return Values
// =============================================================================

/// Conversion of handler return values into a [`HandlerResult`].
///
/// Implemented for `()` (handlers that cannot fail) and for
/// `Result<(), E>` with any boxable error, so handlers written against
/// their own error types plug in without adapter code.
pub trait IntoHandlerOutcome {
    /// Converts this value into the outcome the dispatcher inspects.
    fn into_outcome(self) -> HandlerResult;
}

impl IntoHandlerOutcome for () {
    fn into_outcome(self) -> HandlerResult {
        Ok(())
    }
}

impl<E: Into<BoxError>> IntoHandlerOutcome for Result<(), E> {
    fn into_outcome(self) -> HandlerResult {
        self.map_err(Into::into)
    }
}

// =============================================================================
// Handler Construction
// =============================================================================

/// Wraps an async function or closure into a [`BoxedHandler`].
///
/// The name shows up in registry logs at build time and in failure
/// reports at dispatch time; use something a human can trace back to the
/// code, typically the function's own name.
pub fn handler<F, Fut, O>(name: &str, f: F) -> BoxedHandler
where
    F: Fn(Arc<Event>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = O> + Send + 'static,
    O: IntoHandlerOutcome,
{
    BoxedHandler {
        name: Arc::from(name),
        f: Arc::new(move |event| {
            let fut = f(event);
            Box::pin(async move { fut.await.into_outcome() })
        }),
    }
}
