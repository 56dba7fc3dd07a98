//! Unified error types for the Herald dispatch core.
//!
//! Two failure classes with different containment rules:
//!
//! - [`DispatchError`] — dispatch-time failures; contained or propagated
//!   to the dispatch caller depending on [`DispatchPolicy`].
//! - [`RegistrationError`] — collection-time failures; always contained:
//!   logged, the offending entry skipped, never fatal to the overall
//!   registry build.
//!
//! [`DispatchPolicy`]: crate::dispatcher::DispatchPolicy

use thiserror::Error;

/// Boxed error type carried by handler failures.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Result type returned by handlers and the pre-dispatch hook.
pub type HandlerResult = Result<(), BoxError>;

/// Errors that can occur while dispatching a single event.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The event carried no resolvable `type` field.
    ///
    /// Raised only under a strict [`DispatchPolicy`]; otherwise the
    /// condition is downgraded to a logged warning.
    ///
    /// [`DispatchPolicy`]: crate::dispatcher::DispatchPolicy
    #[error("malformed event without a type field: {payload}")]
    MalformedEvent {
        /// Raw payload of the offending event, rendered as JSON.
        payload: String,
    },

    /// A handler or the pre-dispatch hook failed during invocation.
    ///
    /// The cause is surfaced unchanged so the consumption loop can decide
    /// on redelivery.
    #[error("handler '{handler}' failed on '{event_type}' event")]
    Handler {
        /// Type of the event being dispatched.
        event_type: String,
        /// Name of the failing handler.
        handler: String,
        /// The failure raised by the handler.
        #[source]
        source: BoxError,
    },
}

/// Errors raised while collecting handler declarations from providers.
#[derive(Debug, Clone, Error)]
pub enum RegistrationError {
    /// A declared entry's handler sequence could not be assembled.
    #[error("handler declaration for '{event_type}' is invalid: {reason}")]
    InvalidEntry {
        /// Event type the entry was declared for.
        event_type: String,
        /// Why the entry is unusable.
        reason: String,
    },
}

impl RegistrationError {
    /// Creates an [`RegistrationError::InvalidEntry`] for `event_type`.
    pub fn invalid(event_type: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidEntry {
            event_type: event_type.into(),
            reason: reason.into(),
        }
    }
}

/// Result type for dispatch operations.
pub type DispatchResult<T> = Result<T, DispatchError>;
