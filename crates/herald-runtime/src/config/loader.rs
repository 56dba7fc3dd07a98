//! Configuration loader using figment.
//!
//! Layered loading, lowest to highest priority:
//!
//! 1. Built-in defaults ([`HeraldConfig::default`])
//! 2. Config files found in the search directories (`herald.toml` /
//!    `herald.yaml`, per enabled format feature)
//! 3. Explicitly requested files ([`ConfigLoader::file`])
//! 4. Environment variables (`HERALD_*`, `__` as nesting separator)
//!
//! # Feature Flags
//!
//! - `toml-config`: enables TOML configuration files
//! - `yaml-config`: enables YAML configuration files
//!
//! Both can be enabled simultaneously; both file names are then searched.
//!
//! # Environment Variable Mapping
//!
//! - `HERALD_LOGGING__LEVEL=debug` → `logging.level = "debug"`
//! - `HERALD_LISTENER__QUEUE=events` → `listener.queue = "events"`
//!
//! # Example
//!
//! ```rust,ignore
//! use herald_runtime::config::ConfigLoader;
//!
//! // Defaults + herald.toml from the working directory + HERALD_* env
//! let config = ConfigLoader::new().with_current_dir().load()?;
//!
//! // A specific file, env overrides still applied
//! let config = ConfigLoader::new().file("config/herald.toml").load()?;
//! ```

use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Serialized};
#[cfg(any(feature = "toml-config", feature = "yaml-config"))]
use figment::providers::Format;
#[cfg(feature = "toml-config")]
use figment::providers::Toml;
#[cfg(feature = "yaml-config")]
use figment::providers::Yaml;
use tracing::debug;

use super::error::{ConfigError, ConfigResult};
use super::schema::HeraldConfig;
use super::validation;

/// Environment variable prefix for configuration overrides.
const ENV_PREFIX: &str = "HERALD_";

/// Nesting separator inside environment variable names.
const ENV_SEPARATOR: &str = "__";

/// Configuration loader with figment-based multi-source support.
pub struct ConfigLoader {
    figment: Figment,
    env_enabled: bool,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// Creates a loader seeded with the built-in defaults.
    pub fn new() -> Self {
        Self {
            figment: Figment::from(Serialized::defaults(HeraldConfig::default())),
            env_enabled: true,
        }
    }

    /// Searches `dir` for default config files (`herald.toml`,
    /// `herald.yaml`/`herald.yml`, per enabled format features). Missing
    /// files are skipped.
    pub fn search(mut self, dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();

        #[cfg(feature = "toml-config")]
        {
            self.figment = self.figment.merge(Toml::file(dir.join("herald.toml")));
        }

        #[cfg(feature = "yaml-config")]
        {
            self.figment = self
                .figment
                .merge(Yaml::file(dir.join("herald.yaml")))
                .merge(Yaml::file(dir.join("herald.yml")));
        }

        #[cfg(not(any(feature = "toml-config", feature = "yaml-config")))]
        {
            let _ = dir;
        }

        self
    }

    /// Searches the current working directory for default config files.
    pub fn with_current_dir(self) -> Self {
        self.search(".")
    }

    /// Loads a specific config file, chosen by extension. Unlike
    /// [`search`](ConfigLoader::search), a missing file is an error.
    pub fn file(mut self, path: impl Into<PathBuf>) -> Self {
        let path = path.into();

        if !path.exists() {
            // Remember the failure; surfaced from load() so the builder
            // chain stays infallible.
            self.figment = self.figment.merge(MissingFile(path));
            return self;
        }

        match path.extension().and_then(|ext| ext.to_str()) {
            #[cfg(feature = "toml-config")]
            Some("toml") => {
                self.figment = self.figment.merge(Toml::file(path));
            }
            #[cfg(feature = "yaml-config")]
            Some("yaml") | Some("yml") => {
                self.figment = self.figment.merge(Yaml::file(path));
            }
            _ => {
                self.figment = self.figment.merge(UnsupportedFile(path));
            }
        }

        self
    }

    /// Disables the `HERALD_*` environment variable layer.
    pub fn without_env(mut self) -> Self {
        self.env_enabled = false;
        self
    }

    /// Merges all sources, extracts, and validates the configuration.
    pub fn load(self) -> ConfigResult<HeraldConfig> {
        let mut figment = self.figment;

        if self.env_enabled {
            figment = figment.merge(Env::prefixed(ENV_PREFIX).split(ENV_SEPARATOR));
        }

        let config: HeraldConfig = figment.extract()?;
        validation::validate(&config)?;

        debug!(
            listener_url = config.listener.url.as_deref().unwrap_or("<unset>"),
            log_level = config.logging.level.as_str(),
            "configuration loaded"
        );

        Ok(config)
    }
}

/// Convenience: defaults + current-directory files + env overrides.
pub fn load_config() -> ConfigResult<HeraldConfig> {
    ConfigLoader::new().with_current_dir().load()
}

// ─── Failure-carrying providers ───────────────────────────────────────────────
//
// figment providers cannot fail eagerly from the builder chain, so these
// two carry the failure until `extract` runs.

struct MissingFile(PathBuf);

impl figment::Provider for MissingFile {
    fn metadata(&self) -> figment::Metadata {
        figment::Metadata::named("missing configuration file")
    }

    fn data(
        &self,
    ) -> Result<
        figment::value::Map<figment::Profile, figment::value::Dict>,
        figment::Error,
    > {
        Err(figment::Error::from(
            ConfigError::FileNotFound(self.0.clone()).to_string(),
        ))
    }
}

struct UnsupportedFile(PathBuf);

impl figment::Provider for UnsupportedFile {
    fn metadata(&self) -> figment::Metadata {
        figment::Metadata::named("unsupported configuration file")
    }

    fn data(
        &self,
    ) -> Result<
        figment::value::Map<figment::Profile, figment::value::Dict>,
        figment::Error,
    > {
        Err(figment::Error::from(format!(
            "unsupported configuration file format: {}",
            self.0.display()
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::{LogLevel, LogOutput};

    #[test]
    fn defaults_load_without_any_sources() {
        figment::Jail::expect_with(|_jail| {
            let config = ConfigLoader::new().load().expect("defaults must load");

            assert_eq!(config.listener.url, None);
            assert_eq!(config.logging.level, LogLevel::Info);
            Ok(())
        });
    }

    #[test]
    fn env_variables_override_defaults() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("HERALD_LOGGING__LEVEL", "debug");
            jail.set_env("HERALD_LOGGING__OUTPUT", "stderr");
            jail.set_env("HERALD_LISTENER__URL", "amqp://localhost:5672");
            jail.set_env("HERALD_LISTENER__QUEUE", "events");

            let config = ConfigLoader::new().load().expect("env layer must load");

            assert_eq!(config.logging.level, LogLevel::Debug);
            assert_eq!(config.logging.output, LogOutput::Stderr);
            assert_eq!(config.listener.queue.as_deref(), Some("events"));
            Ok(())
        });
    }

    #[test]
    fn without_env_ignores_the_environment() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("HERALD_LOGGING__LEVEL", "debug");

            let config = ConfigLoader::new().without_env().load().unwrap();

            assert_eq!(config.logging.level, LogLevel::Info);
            Ok(())
        });
    }

    #[test]
    fn invalid_listener_config_fails_load() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("HERALD_LISTENER__URL", "amqp://localhost:5672");
            // No queue configured.

            let err = ConfigLoader::new().load().unwrap_err();
            assert!(matches!(err, ConfigError::Validation { .. }));
            Ok(())
        });
    }

    #[test]
    fn explicitly_requested_missing_file_is_an_error() {
        figment::Jail::expect_with(|_jail| {
            let err = ConfigLoader::new()
                .file("does-not-exist.toml")
                .load()
                .unwrap_err();

            assert!(matches!(err, ConfigError::Extract(_)));
            Ok(())
        });
    }

    #[cfg(feature = "toml-config")]
    #[test]
    fn toml_file_layers_under_env() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "herald.toml",
                r#"
                    [listener]
                    url = "amqp://broker:5672"
                    queue = "events"
                    exchange = "domain-events"

                    [logging]
                    level = "warn"
                "#,
            )?;
            jail.set_env("HERALD_LOGGING__LEVEL", "error");

            let config = ConfigLoader::new().with_current_dir().load().unwrap();

            assert_eq!(config.listener.exchange.as_deref(), Some("domain-events"));
            // Env wins over the file.
            assert_eq!(config.logging.level, LogLevel::Error);
            // File-level defaults still apply where nothing overrides.
            assert_eq!(config.listener.routing_key, "#");
            Ok(())
        });
    }
}
