//! Handler registry — the built mapping from event type to handlers.
//!
//! The registry is process-wide shared state with a hard registration
//! cutoff: it is assembled by a [`RegistryBuilder`] during single-threaded
//! startup and frozen into an immutable [`HandlerRegistry`] by
//! [`build`](RegistryBuilder::build). Dispatchers hold the frozen registry
//! behind an `Arc` and only ever read it, so no synchronization is needed
//! on the dispatch path. Registering after the freeze is impossible by
//! construction, since `build` consumes the builder.
//!
//! Merge semantics: registering additional handlers for an existing event
//! type always appends, never replaces, and the resulting order is the
//! invocation order at dispatch time.
//!
//! # Example
//!
//! ```rust,ignore
//! use herald_core::{HandlerRegistry, handler};
//!
//! let registry = HandlerRegistry::builder()
//!     .on("order.created", handler("send_confirmation", send_confirmation))
//!     .on("order.created", handler("audit_order", audit_order))
//!     .build();
//!
//! assert_eq!(registry.handlers_for("order.created").len(), 2);
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, error, trace};

use crate::handler::BoxedHandler;
use crate::provider::HandlerProvider;

// =============================================================================
// HandlerRegistry
// =============================================================================

/// The frozen event-type → handler-sequence mapping.
///
/// Read-only; built once by [`RegistryBuilder`]. An event type with no
/// entry simply has no handlers; dispatching it is a no-op, never an
/// error.
#[derive(Debug, Default)]
pub struct HandlerRegistry {
    entries: HashMap<String, Vec<BoxedHandler>>,
}

impl HandlerRegistry {
    /// Starts a new registry build.
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// Returns the handlers registered for `event_type`, in registration
    /// order. Empty for unknown types.
    pub fn handlers_for(&self, event_type: &str) -> &[BoxedHandler] {
        self.entries
            .get(event_type)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Iterates over the registered event types.
    pub fn event_types(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Number of event types with at least one registered handler.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when no handlers are registered at all.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// =============================================================================
// RegistryBuilder
// =============================================================================

/// Accumulates handler registrations during the startup phase.
///
/// Only valid while startup is single-threaded; the builder is not
/// shareable across threads mid-build and is consumed by
/// [`build`](RegistryBuilder::build).
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    entries: HashMap<String, Vec<BoxedHandler>>,
}

impl RegistryBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `handler` to the sequence registered for `event_type`,
    /// creating the sequence if absent. Always succeeds.
    pub fn register(&mut self, event_type: impl Into<String>, handler: BoxedHandler) {
        self.entries.entry(event_type.into()).or_default().push(handler);
    }

    /// Chainable form of [`register`](RegistryBuilder::register), for the
    /// define-and-register-in-one-statement style.
    pub fn on(mut self, event_type: impl Into<String>, handler: BoxedHandler) -> Self {
        self.register(event_type, handler);
        self
    }

    /// Merges the declarations of an ordered list of providers.
    ///
    /// Providers declaring nothing are skipped silently. A declared entry
    /// that failed provider-side assembly is logged and skipped on its
    /// own; the provider's remaining entries and all remaining providers
    /// continue to load. Entries for an event type already present append
    /// in traversal order.
    pub fn collect(&mut self, providers: &[Arc<dyn HandlerProvider>]) {
        for provider in providers {
            let Some(declarations) = provider.handlers() else {
                trace!(provider = provider.name(), "provider declares no handlers");
                continue;
            };

            for (event_type, entry) in declarations.into_entries() {
                match entry {
                    Ok(handlers) => {
                        self.entries.entry(event_type).or_default().extend(handlers);
                    }
                    Err(err) => {
                        error!(
                            provider = provider.name(),
                            event_type = %event_type,
                            error = %err,
                            "handler declaration skipped due to misconfiguration"
                        );
                    }
                }
            }
        }
    }

    /// Chainable form of [`collect`](RegistryBuilder::collect).
    pub fn providers(mut self, providers: &[Arc<dyn HandlerProvider>]) -> Self {
        self.collect(providers);
        self
    }

    /// Freezes the accumulated registrations into a [`HandlerRegistry`].
    pub fn build(self) -> HandlerRegistry {
        debug!(event_types = self.entries.len(), "registered event handlers");
        for (event_type, handlers) in &self.entries {
            let names: Vec<&str> = handlers.iter().map(BoxedHandler::name).collect();
            debug!(event_type = %event_type, handlers = ?names, "event handlers");
        }

        HandlerRegistry {
            entries: self.entries,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RegistrationError;
    use crate::event::Event;
    use crate::handler::handler;
    use crate::provider::HandlerDeclarations;

    fn named(name: &str) -> BoxedHandler {
        handler(name, |_event: Arc<Event>| async {})
    }

    #[test]
    fn repeated_registration_appends_in_order() {
        let mut builder = HandlerRegistry::builder();
        builder.register("order.created", named("h1"));
        builder.register("order.created", named("h2"));
        let registry = builder.build();

        let names: Vec<&str> = registry
            .handlers_for("order.created")
            .iter()
            .map(BoxedHandler::name)
            .collect();

        assert_eq!(names, ["h1", "h2"]);
    }

    #[test]
    fn unknown_type_has_no_handlers() {
        let registry = HandlerRegistry::builder()
            .on("order.created", named("h1"))
            .build();

        assert!(registry.handlers_for("order.shipped").is_empty());
        assert_eq!(registry.len(), 1);
    }

    struct Silent;

    impl HandlerProvider for Silent {
        fn name(&self) -> &str {
            "silent"
        }

        fn handlers(&self) -> Option<HandlerDeclarations> {
            None
        }
    }

    struct Declaring {
        name: &'static str,
        declarations: fn() -> HandlerDeclarations,
    }

    impl HandlerProvider for Declaring {
        fn name(&self) -> &str {
            self.name
        }

        fn handlers(&self) -> Option<HandlerDeclarations> {
            Some((self.declarations)())
        }
    }

    #[test]
    fn collect_skips_providers_without_declarations() {
        let providers: Vec<Arc<dyn HandlerProvider>> = vec![
            Arc::new(Silent),
            Arc::new(Declaring {
                name: "orders",
                declarations: || HandlerDeclarations::new().on("order.created", vec![named("h1")]),
            }),
        ];

        let registry = RegistryBuilder::new().providers(&providers).build();

        assert_eq!(registry.handlers_for("order.created").len(), 1);
        assert!(!registry.is_empty());

        let types: Vec<&str> = registry.event_types().collect();
        assert_eq!(types, ["order.created"]);
    }

    #[test]
    fn collect_skips_only_the_invalid_entry() {
        let providers: Vec<Arc<dyn HandlerProvider>> = vec![
            Arc::new(Declaring {
                name: "broken",
                declarations: || {
                    HandlerDeclarations::new()
                        .try_on("order.created", Err(RegistrationError::invalid(
                            "order.created",
                            "handler sequence could not be assembled",
                        )))
                        .on("order.cancelled", vec![named("cancel")])
                },
            }),
            Arc::new(Declaring {
                name: "orders",
                declarations: || HandlerDeclarations::new().on("order.created", vec![named("h1")]),
            }),
        ];

        let mut builder = RegistryBuilder::new();
        builder.collect(&providers);
        let registry = builder.build();

        // The broken entry is gone; its sibling and the later provider loaded.
        assert_eq!(registry.handlers_for("order.created").len(), 1);
        assert_eq!(registry.handlers_for("order.cancelled").len(), 1);
    }

    #[test]
    fn collect_appends_across_providers_in_traversal_order() {
        let providers: Vec<Arc<dyn HandlerProvider>> = vec![
            Arc::new(Declaring {
                name: "first",
                declarations: || HandlerDeclarations::new().on("e", vec![named("a"), named("b")]),
            }),
            Arc::new(Declaring {
                name: "second",
                declarations: || HandlerDeclarations::new().on("e", vec![named("c")]),
            }),
        ];

        let mut builder = RegistryBuilder::new();
        builder.register("e", named("imperative"));
        builder.collect(&providers);
        let registry = builder.build();

        let names: Vec<&str> = registry
            .handlers_for("e")
            .iter()
            .map(BoxedHandler::name)
            .collect();

        assert_eq!(names, ["imperative", "a", "b", "c"]);
    }
}
