//! Handler providers — declarative registration sources.
//!
//! A provider is one unit of the host application (a feature module, a
//! plugin, a subsystem) that optionally declares a partial event-type →
//! handlers map. At startup the host hands the registry an ordered list
//! of providers; [`RegistryBuilder::collect`] walks it and merges every
//! usable declaration, in traversal order.
//!
//! Two rules keep one misconfigured provider from taking the rest down:
//!
//! - A provider that declares nothing is skipped silently; most
//!   providers in a real application declare no handlers.
//! - A declared entry whose handler sequence could not be assembled is
//!   logged and skipped on its own; the provider's other entries and all
//!   remaining providers still load.
//!
//! # Example
//!
//! ```rust,ignore
//! use herald_core::{HandlerDeclarations, HandlerProvider, handler_map};
//!
//! struct OrderModule;
//!
//! impl HandlerProvider for OrderModule {
//!     fn name(&self) -> &str {
//!         "orders"
//!     }
//!
//!     fn handlers(&self) -> Option<HandlerDeclarations> {
//!         Some(handler_map! {
//!             "order.created" => [send_confirmation, audit_order],
//!             "order.cancelled" => [audit_order],
//!         })
//!     }
//! }
//! ```
//!
//! [`RegistryBuilder::collect`]: crate::registry::RegistryBuilder::collect

use crate::error::RegistrationError;
use crate::handler::BoxedHandler;

// ─── HandlerProvider trait ────────────────────────────────────────────────────

/// A registration source exposing a declared handler map.
pub trait HandlerProvider: Send + Sync {
    /// Provider name, used in collection logs.
    fn name(&self) -> &str;

    /// Returns the declared event-type → handlers map, or `None` when
    /// this provider declares no handlers (a normal, expected case).
    fn handlers(&self) -> Option<HandlerDeclarations>;
}

// ─── HandlerDeclarations ──────────────────────────────────────────────────────

/// The declared handler map of a single provider.
///
/// Entries are individually fallible: a provider that cannot assemble
/// the handler sequence for one event type records the failure on that
/// entry while the rest of its declaration stays usable. The collection
/// pass logs failed entries and merges everything else.
#[derive(Debug, Default)]
pub struct HandlerDeclarations {
    entries: Vec<(String, Result<Vec<BoxedHandler>, RegistrationError>)>,
}

impl HandlerDeclarations {
    /// Creates an empty declaration map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares `handlers` for `event_type`, after any prior entries.
    pub fn on(mut self, event_type: impl Into<String>, handlers: Vec<BoxedHandler>) -> Self {
        self.entries.push((event_type.into(), Ok(handlers)));
        self
    }

    /// Declares a fallibly-assembled entry.
    ///
    /// Providers that build handler sequences from config or other
    /// runtime input record an `Err` here instead of aborting their whole
    /// declaration; the collection pass skips exactly that entry.
    pub fn try_on(
        mut self,
        event_type: impl Into<String>,
        handlers: Result<Vec<BoxedHandler>, RegistrationError>,
    ) -> Self {
        self.entries.push((event_type.into(), handlers));
        self
    }

    /// Number of declared entries, failed ones included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when nothing is declared.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn into_entries(
        self,
    ) -> Vec<(String, Result<Vec<BoxedHandler>, RegistrationError>)> {
        self.entries
    }
}

// ─── handler_map! ─────────────────────────────────────────────────────────────

/// Builds a [`HandlerDeclarations`] from a literal map of event types to
/// async functions, naming each handler after its path.
///
/// ```rust,ignore
/// let decls = handler_map! {
///     "order.created" => [send_confirmation, audit_order],
///     "order.shipped" => [notify_carrier],
/// };
/// ```
#[macro_export]
macro_rules! handler_map {
    ($($event_type:literal => [$($handler:expr),* $(,)?]),* $(,)?) => {
        $crate::HandlerDeclarations::new()
            $(.on(
                $event_type,
                vec![$($crate::handler(stringify!($handler), $handler)),*],
            ))*
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RegistrationError;
    use crate::event::Event;
    use crate::handler::handler;
    use std::sync::Arc;

    async fn noop(_event: Arc<Event>) {}

    #[test]
    fn entries_keep_declaration_order() {
        let decls = HandlerDeclarations::new()
            .on("a", vec![handler("h1", noop)])
            .try_on("b", Err(RegistrationError::invalid("b", "bad config")))
            .on("c", vec![handler("h2", noop)]);

        assert_eq!(decls.len(), 3);
        assert!(!decls.is_empty());

        let entries = decls.into_entries();
        let types: Vec<&str> = entries.iter().map(|(t, _)| t.as_str()).collect();

        assert_eq!(types, ["a", "b", "c"]);
        assert!(entries[1].1.is_err());
    }

    #[test]
    fn handler_map_names_handlers_after_their_path() {
        let decls = handler_map! {
            "order.created" => [noop],
        };

        let entries = decls.into_entries();
        assert_eq!(entries.len(), 1);

        let (event_type, handlers) = &entries[0];
        assert_eq!(event_type, "order.created");
        assert_eq!(handlers.as_ref().unwrap()[0].name(), "noop");
    }
}
