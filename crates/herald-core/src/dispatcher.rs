//! Event dispatcher for the Herald core.
//!
//! The [`Dispatcher`] takes one event at a time, resolves the event's
//! type against the frozen [`HandlerRegistry`], and invokes each matching
//! handler sequentially, in registration order. There is no fan-out
//! within a dispatch call and no state carried between calls; ordering
//! across calls is whatever the external event source imposes.
//!
//! # Dispatch sequence
//!
//! 1. Resolve the event type. Absent type → [`DispatchError::MalformedEvent`]
//!    or a logged warning, per [`DispatchPolicy::error_on_missing_type`].
//! 2. Look up the handler sequence. No handlers → return normally; this
//!    is not an error under any policy.
//! 3. Run the pre-dispatch hook, exactly once. A hook failure is treated
//!    like a handler failure.
//! 4. Invoke each handler in order. Per invocation, a failure is either
//!    logged and swallowed (dispatch continues) or propagated immediately
//!    (remaining handlers are skipped), per
//!    [`DispatchPolicy::swallow_handler_errors`]. The [`ResourceGuard`],
//!    when configured, is refreshed before every invocation.
//!
//! There is no retry and no timeout in this core: a hung handler blocks
//! the dispatch task, and redelivery of failed events belongs to the
//! queue feeding the dispatcher.
//!
//! # Example
//!
//! ```rust,ignore
//! use herald_core::{DispatchPolicy, Dispatcher, Event, HandlerRegistry, handler};
//! use std::sync::Arc;
//!
//! let registry = Arc::new(
//!     HandlerRegistry::builder()
//!         .on("order.created", handler("send_confirmation", send_confirmation))
//!         .build(),
//! );
//!
//! let dispatcher = Dispatcher::new(registry, DispatchPolicy::LENIENT);
//! dispatcher.dispatch(Event::new("order.created").with("id", 42)).await?;
//! ```

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use futures::future::BoxFuture;
use tracing::{Instrument, Level, debug, error, info, span, warn};

use crate::error::{DispatchError, DispatchResult, HandlerResult};
use crate::event::Event;
use crate::handler::IntoHandlerOutcome;
use crate::registry::HandlerRegistry;

/// Name under which pre-dispatch hook failures are reported.
const BEFORE_DISPATCH: &str = "before_dispatch";

// =============================================================================
// Policy
// =============================================================================

/// Error-isolation and malformed-event policy for a dispatcher.
///
/// There is deliberately no `Default`: either choice silently changes
/// failure behavior, so callers state both flags explicitly, field by
/// field or via the [`STRICT`](DispatchPolicy::STRICT) /
/// [`LENIENT`](DispatchPolicy::LENIENT) presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchPolicy {
    /// When `true`, a failure raised by a handler or the pre-dispatch
    /// hook is logged and swallowed and dispatch continues with the next
    /// handler. When `false`, the first failure propagates out of
    /// [`Dispatcher::dispatch`] and the remaining handlers are skipped.
    pub swallow_handler_errors: bool,

    /// When `true`, an event without a resolvable `type` fails dispatch
    /// with [`DispatchError::MalformedEvent`]. When `false`, the
    /// condition is logged and dispatch returns normally without
    /// invoking the hook or any handler.
    pub error_on_missing_type: bool,
}

impl DispatchPolicy {
    /// Propagate handler failures; reject events without a type.
    pub const STRICT: Self = Self {
        swallow_handler_errors: false,
        error_on_missing_type: true,
    };

    /// Swallow-and-log handler failures; log-and-drop events without a
    /// type.
    pub const LENIENT: Self = Self {
        swallow_handler_errors: true,
        error_on_missing_type: false,
    };
}

// =============================================================================
// Collaborators
// =============================================================================

/// Zero-argument hook run once per dispatch, before any handler.
pub type BeforeHook = Arc<dyn Fn() -> BoxFuture<'static, HandlerResult> + Send + Sync>;

/// Externally-owned long-lived resource handles, refreshed around handler
/// execution.
///
/// The dispatcher calls [`refresh`](ResourceGuard::refresh) before each
/// handler invocation so handlers start from live resources. The typical
/// implementation discards stale database connections that timed out
/// while the consumer sat idle. Side-effect only; expected not to fail.
#[async_trait]
pub trait ResourceGuard: Send + Sync {
    /// Discards stale handles ahead of the next handler invocation.
    async fn refresh(&self);
}

// =============================================================================
// Outcome
// =============================================================================

/// What one dispatch call did, for callers that log or meter consumption.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// All matching handlers were invoked. `failed` counts failures
    /// swallowed under the lenient error policy.
    Completed { invoked: usize, failed: usize },

    /// No handlers are registered for the event's type.
    Unhandled,

    /// The event carried no type and the policy downgraded the condition
    /// to a logged warning.
    MissingType,
}

// =============================================================================
// Dispatcher
// =============================================================================

/// Routes one event at a time to its registered handlers.
///
/// Holds a shared reference to the frozen registry; constructing more
/// dispatchers (one per consumer worker, say) does not copy handler
/// state. Stateless across calls.
pub struct Dispatcher {
    registry: Arc<HandlerRegistry>,
    policy: DispatchPolicy,
    before_dispatch: Option<BeforeHook>,
    resource_guard: Option<Arc<dyn ResourceGuard>>,
}

impl Dispatcher {
    /// Creates a dispatcher over `registry` with the given policy.
    pub fn new(registry: Arc<HandlerRegistry>, policy: DispatchPolicy) -> Self {
        Self {
            registry,
            policy,
            before_dispatch: None,
            resource_guard: None,
        }
    }

    /// Installs the pre-dispatch hook, run exactly once per dispatch
    /// call, after type resolution and before any handler.
    pub fn with_before_dispatch<F, Fut, O>(mut self, hook: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = O> + Send + 'static,
        O: IntoHandlerOutcome,
    {
        self.before_dispatch = Some(Arc::new(move || {
            let fut = hook();
            Box::pin(async move { fut.await.into_outcome() })
        }));
        self
    }

    /// Installs the resource guard refreshed before each handler
    /// invocation.
    pub fn with_resource_guard(mut self, guard: Arc<dyn ResourceGuard>) -> Self {
        self.resource_guard = Some(guard);
        self
    }

    /// Returns the configured policy.
    pub fn policy(&self) -> DispatchPolicy {
        self.policy
    }

    /// Dispatches one event to every handler registered for its type.
    ///
    /// Handlers run sequentially in registration order and each receives
    /// the event as it was at dispatch entry. Returns after all matching
    /// handlers were invoked, or with the first unrecovered failure when
    /// the policy propagates errors.
    pub async fn dispatch(&self, event: Event) -> DispatchResult<DispatchOutcome> {
        let Some(event_type) = event.event_type().map(str::to_owned) else {
            if self.policy.error_on_missing_type {
                return Err(DispatchError::MalformedEvent {
                    payload: event.to_string(),
                });
            }
            warn!(payload = %event, "dropping event without a type field");
            return Ok(DispatchOutcome::MissingType);
        };

        let span = span!(Level::DEBUG, "dispatch", event_type = %event_type);
        self.run_handlers(event, event_type).instrument(span).await
    }

    /// Runs steps 2–4 of the dispatch sequence for an already-resolved
    /// event type.
    async fn run_handlers(
        &self,
        event: Event,
        event_type: String,
    ) -> DispatchResult<DispatchOutcome> {
        info!(event_type = %event_type, "received event");

        let handlers = self.registry.handlers_for(&event_type);
        if handlers.is_empty() {
            debug!("no handlers registered, ignoring");
            return Ok(DispatchOutcome::Unhandled);
        }

        let event = Arc::new(event);

        if let Some(hook) = &self.before_dispatch {
            if let Err(err) = hook().await {
                if !self.policy.swallow_handler_errors {
                    return Err(DispatchError::Handler {
                        event_type,
                        handler: BEFORE_DISPATCH.to_owned(),
                        source: err,
                    });
                }
                error!(
                    event_type = %event_type,
                    payload = %event,
                    error = %err,
                    "pre-dispatch hook failed"
                );
            }
        }

        let mut invoked = 0usize;
        let mut failed = 0usize;

        for handler in handlers {
            if let Some(guard) = &self.resource_guard {
                guard.refresh().await;
            }

            debug!(handler = handler.name(), "invoking handler");
            invoked += 1;

            if let Err(err) = handler.call(Arc::clone(&event)).await {
                if !self.policy.swallow_handler_errors {
                    return Err(DispatchError::Handler {
                        event_type,
                        handler: handler.name().to_owned(),
                        source: err,
                    });
                }
                failed += 1;
                error!(
                    event_type = %event_type,
                    handler = handler.name(),
                    payload = %event,
                    error = %err,
                    "handler failed, continuing with remaining handlers"
                );
            }
        }

        Ok(DispatchOutcome::Completed { invoked, failed })
    }
}
