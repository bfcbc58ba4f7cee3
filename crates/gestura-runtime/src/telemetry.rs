//! Tracing subscriber setup
//!
//! `RUST_LOG` wins over the configured level when set.

use tracing_subscriber::{fmt, layer::SubscriberExt, EnvFilter, Registry};

use gestura_core::{GestureError, GesturaResult};

use crate::LoggingConfig;

/// Filter from `RUST_LOG`, falling back to the configured directive
pub fn env_filter(config: &LoggingConfig) -> GesturaResult<EnvFilter> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(&config.level)
            .map_err(|e| GestureError::Telemetry(format!("invalid filter '{}': {e}", config.level))),
    }
}

/// Install the global subscriber
///
/// Fails with [`GestureError::Telemetry`] if a subscriber is already set.
pub fn init(config: &LoggingConfig) -> GesturaResult<()> {
    let filter = env_filter(config)?;
    let registry = Registry::default().with(filter);

    let result = if config.json {
        let layer = fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_target(config.with_target);
        tracing::subscriber::set_global_default(registry.with(layer))
    } else {
        let layer = fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(config.with_target);
        tracing::subscriber::set_global_default(registry.with(layer))
    };

    result.map_err(|e| GestureError::Telemetry(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_invalid_directive() {
        if std::env::var_os("RUST_LOG").is_some() {
            return;
        }
        let config = LoggingConfig {
            level: "gestura=loud".to_string(),
            ..LoggingConfig::default()
        };
        assert!(matches!(env_filter(&config), Err(GestureError::Telemetry(_))));
    }

    #[test]
    fn test_valid_directive() {
        let config = LoggingConfig {
            level: "gestura_runtime=debug,warn".to_string(),
            ..LoggingConfig::default()
        };
        assert!(env_filter(&config).is_ok());
    }

    #[test]
    #[serial]
    fn test_second_init_fails_without_panicking() {
        let config = LoggingConfig::default();
        let _ = init(&config);
        assert!(matches!(init(&config), Err(GestureError::Telemetry(_))));
    }

    #[test]
    #[serial]
    fn test_json_init_after_global_is_set() {
        let _ = init(&LoggingConfig::default());
        assert!(matches!(
            init(&LoggingConfig::json("debug")),
            Err(GestureError::Telemetry(_))
        ));
    }
}
