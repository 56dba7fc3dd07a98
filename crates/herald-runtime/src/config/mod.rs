//! Configuration system for Herald processes.
//!
//! - [`schema`] — the typed configuration structure
//! - [`loader`] — figment-based layered loading (defaults, files, env)
//! - [`validation`] — startup-time sanity checks
//! - [`error`] — configuration error types

pub mod error;
pub mod loader;
pub mod schema;
pub mod validation;

pub use error::{ConfigError, ConfigResult};
pub use loader::{ConfigLoader, load_config};
pub use schema::{HeraldConfig, ListenerConfig, LogFormat, LogLevel, LogOutput, LoggingConfig};
pub use validation::validate;
