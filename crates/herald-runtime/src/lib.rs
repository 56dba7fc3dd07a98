//! # Herald Runtime
//!
//! Runtime integration layer for the Herald event handler.
//!
//! `herald-core` is deliberately narrow: registry, dispatcher, error
//! taxonomy. This crate carries everything a real consumer process needs
//! around that core:
//!
//! - **Configuration**: layered loading (defaults → `herald.toml` /
//!   `herald.yaml` → `HERALD_*` env vars) with startup validation,
//!   including the queue-consumer settings the core never interprets
//! - **Logging**: a `tracing-subscriber` bootstrap driven by the same
//!   configuration
//! - **Consumption loop**: the [`EventSource`] boundary to the external
//!   queue consumer and the [`Listener`] that drives it into a
//!   dispatcher, with Ctrl-C shutdown
//!
//! ## Example
//!
//! ```rust,ignore
//! use herald_runtime::config::load_config;
//! use herald_runtime::{logging, source::Listener};
//!
//! let config = load_config()?;
//! logging::init_from_config(&config.logging);
//!
//! let listener = Listener::new(dispatcher);
//! listener.run_until_shutdown(consumer).await?;
//! ```
//!
//! [`EventSource`]: source::EventSource
//! [`Listener`]: source::Listener

pub mod config;
pub mod error;
pub mod logging;
pub mod source;

pub use config::{ConfigError, ConfigLoader, ConfigResult, HeraldConfig, load_config};
pub use error::{RuntimeError, RuntimeResult};
pub use logging::{LoggingBuilder, init_from_config};
pub use source::{EventSource, Listener};
