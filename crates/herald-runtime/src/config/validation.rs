//! Configuration validation.
//!
//! Catches listener misconfiguration at startup instead of letting the
//! queue consumer fail on its first connection attempt.

use super::error::{ConfigError, ConfigResult};
use super::schema::HeraldConfig;

/// Validates a loaded configuration.
///
/// The listener section is optional as a whole (a process that only
/// dispatches in-process events runs without one), but once a broker URL
/// is configured the queue name must be too.
pub fn validate(config: &HeraldConfig) -> ConfigResult<()> {
    if let Some(url) = &config.listener.url {
        if !url.starts_with("amqp://") && !url.starts_with("amqps://") {
            return Err(ConfigError::validation(format!(
                "unsupported listener URL scheme: {url}"
            )));
        }

        if config.listener.queue.as_deref().is_none_or(str::is_empty) {
            return Err(ConfigError::validation(
                "listener.queue must be set when listener.url is configured",
            ));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::HeraldConfig;

    #[test]
    fn empty_config_is_valid() {
        assert!(validate(&HeraldConfig::default()).is_ok());
    }

    #[test]
    fn url_without_queue_is_rejected() {
        let mut config = HeraldConfig::default();
        config.listener.url = Some("amqp://localhost:5672".to_string());

        let err = validate(&config).unwrap_err();
        assert!(err.to_string().contains("listener.queue"));
    }

    #[test]
    fn non_amqp_scheme_is_rejected() {
        let mut config = HeraldConfig::default();
        config.listener.url = Some("http://localhost".to_string());
        config.listener.queue = Some("events".to_string());

        assert!(validate(&config).is_err());
    }

    #[test]
    fn full_listener_config_is_valid() {
        let mut config = HeraldConfig::default();
        config.listener.url = Some("amqps://broker.internal:5671/%2f".to_string());
        config.listener.queue = Some("events".to_string());
        config.listener.exchange = Some("domain-events".to_string());

        assert!(validate(&config).is_ok());
    }
}
