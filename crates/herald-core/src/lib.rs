//! # Herald Core
//!
//! The core event dispatch engine of Herald.
//!
//! Herald receives one event at a time (a typed message pulled off a
//! message queue by an external consumer) and routes it to every handler
//! registered for the event's type. This crate is the load-bearing part:
//! the handler registry with its merge semantics, the dispatcher with its
//! error-isolation policy, and the shared error types. Queue plumbing,
//! configuration, and logging bootstrap live in `herald-runtime`.
//!
//! ## Flow
//!
//! ```text
//! ┌──────────────┐     ┌────────────┐     ┌──────────────────┐
//! │ Event source │────▶│ Dispatcher │────▶│ handler "email"  │
//! │   (queue)    │     │            │────▶│ handler "audit"  │
//! └──────────────┘     └────────────┘────▶│ handler ...      │
//!                            │            └──────────────────┘
//!                            ▼
//!                     HandlerRegistry
//!               (frozen at startup, read-only)
//! ```
//!
//! - **Event**: a `type` discriminator plus an open JSON payload
//! - **HandlerRegistry**: event type → ordered handler sequence, built
//!   once by [`RegistryBuilder`] and frozen
//! - **HandlerProvider**: a host-application module declaring part of the
//!   map; collected and merged in order at startup
//! - **Dispatcher**: invokes matching handlers sequentially under an
//!   explicit [`DispatchPolicy`]
//!
//! ## Example
//!
//! ```rust,ignore
//! use herald_core::{DispatchPolicy, Dispatcher, Event, HandlerRegistry, handler};
//! use std::sync::Arc;
//!
//! async fn send_confirmation(event: Arc<Event>) -> Result<(), herald_core::BoxError> {
//!     println!("confirming order {:?}", event.get("id"));
//!     Ok(())
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), herald_core::DispatchError> {
//!     let registry = Arc::new(
//!         HandlerRegistry::builder()
//!             .on("order.created", handler("send_confirmation", send_confirmation))
//!             .build(),
//!     );
//!
//!     let dispatcher = Dispatcher::new(registry, DispatchPolicy::LENIENT);
//!     dispatcher
//!         .dispatch(Event::new("order.created").with("id", 42))
//!         .await?;
//!     Ok(())
//! }
//! ```

pub mod dispatcher;
pub mod error;
pub mod event;
pub mod handler;
pub mod provider;
pub mod registry;

// Re-export the working set at the crate root.
pub use dispatcher::{BeforeHook, DispatchOutcome, DispatchPolicy, Dispatcher, ResourceGuard};
pub use error::{BoxError, DispatchError, DispatchResult, HandlerResult, RegistrationError};
pub use event::Event;
pub use handler::{BoxedHandler, IntoHandlerOutcome, handler};
pub use provider::{HandlerDeclarations, HandlerProvider};
pub use registry::{HandlerRegistry, RegistryBuilder};
