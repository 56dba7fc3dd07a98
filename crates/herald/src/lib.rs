//! # Herald
//!
//! An in-process event dispatch core for message-queue consumers.
//!
//! ## Overview
//!
//! Herald sits between a message queue and the application code that
//! reacts to events: an external consumer decodes one typed message at a
//! time and hands it to the dispatcher, which routes it to every handler
//! registered for that event type: sequentially, in registration order,
//! under an explicit error-isolation policy.
//!
//! ```text
//! ┌──────────────┐     ┌──────────┐     ┌────────────┐     ┌──────────────────┐
//! │ Message queue│────▶│ Listener │────▶│ Dispatcher │────▶│ handler "email"  │
//! │  (consumer)  │     │  (loop)  │     │            │────▶│ handler "audit"  │
//! └──────────────┘     └──────────┘     └────────────┘────▶│ handler ...      │
//!                                                          └──────────────────┘
//! ```
//!
//! - **Registry**: event type → ordered handler sequence, assembled from
//!   imperative registrations and provider declarations during startup,
//!   then frozen
//! - **Dispatcher**: resolves an event's type and invokes the matching
//!   handlers under a [`DispatchPolicy`](herald_core::DispatchPolicy)
//!   chosen explicitly by the caller
//! - **Runtime**: configuration, logging bootstrap, and the consumption
//!   loop around the core
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use herald::prelude::*;
//! use std::sync::Arc;
//!
//! async fn send_confirmation(event: Arc<Event>) -> Result<(), BoxError> {
//!     println!("confirming order {:?}", event.get("id"));
//!     Ok(())
//! }
//!
//! #[tokio::main]
//! async fn main() -> RuntimeResult<()> {
//!     let config = load_config()?;
//!     init_from_config(&config.logging);
//!
//!     let registry = Arc::new(
//!         HandlerRegistry::builder()
//!             .on("order.created", handler("send_confirmation", send_confirmation))
//!             .build(),
//!     );
//!     let dispatcher = Dispatcher::new(registry, DispatchPolicy::LENIENT);
//!
//!     Listener::new(dispatcher).run_until_shutdown(consumer).await
//! }
//! ```
//!
//! ## Features
//!
//! - `toml-config` *(default)*: TOML configuration files
//! - `yaml-config`: YAML configuration files
//! - `json-log`: newline-delimited JSON log output

pub use herald_core as core;
pub use herald_runtime as runtime;

/// Prelude module for convenient imports.
///
/// ```rust,ignore
/// use herald::prelude::*;
/// ```
pub mod prelude {
    // Core - registry and dispatch
    pub use herald_core::{
        BoxError, BoxedHandler, DispatchError, DispatchOutcome, DispatchPolicy, DispatchResult,
        Dispatcher, Event, HandlerDeclarations, HandlerProvider, HandlerRegistry, HandlerResult,
        RegistrationError, RegistryBuilder, ResourceGuard, handler,
    };
    pub use herald_core::handler_map;

    // Runtime - config, logging, consumption loop
    pub use herald_runtime::{
        ConfigLoader, EventSource, HeraldConfig, Listener, RuntimeError, RuntimeResult,
        init_from_config, load_config,
    };
}
