//! Session and logging configuration

use std::time::Duration;

use serde::{Deserialize, Serialize};

use gestura_core::{GestureError, GesturaResult};
use gestura_vision::Sensitivity;

/// Recognition session configuration
///
/// Durations are milliseconds so the struct round-trips through JSON
/// unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Finger-extension strictness, 0.0 - 1.0
    pub sensitivity: f32,
    /// Results at or below this confidence are never emitted
    pub min_confidence: f32,
    /// A single-frame label must persist this long before it is emitted
    pub hold_time_ms: u64,
    /// Minimum gap between two emitted events
    pub cooldown_ms: u64,
    /// Frames kept for sequence classification
    pub sequence_window: usize,
    /// Emitted events kept in history
    pub history_limit: usize,
    pub health_check_interval_ms: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            sensitivity: 0.7,
            min_confidence: 0.7,
            hold_time_ms: 500,
            cooldown_ms: 1000,
            sequence_window: 8,
            history_limit: 10,
            health_check_interval_ms: 60_000,
        }
    }
}

impl SessionConfig {
    /// Fast reactions for rehearsals
    pub fn responsive() -> Self {
        Self {
            min_confidence: 0.6,
            hold_time_ms: 250,
            cooldown_ms: 500,
            sequence_window: 6,
            ..Self::default()
        }
    }

    /// Few false positives for live presentations
    pub fn strict() -> Self {
        Self {
            sensitivity: 0.85,
            min_confidence: 0.8,
            hold_time_ms: 800,
            cooldown_ms: 1500,
            sequence_window: 10,
            ..Self::default()
        }
    }

    /// Parse and validate a JSON document; missing fields take defaults
    pub fn from_json(json: &str) -> GesturaResult<Self> {
        let config: SessionConfig =
            serde_json::from_str(json).map_err(|e| GestureError::Serialization(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> GesturaResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| GestureError::Serialization(e.to_string()))
    }

    pub fn validate(&self) -> GesturaResult<()> {
        Sensitivity::new(self.sensitivity)?;
        if !(0.0..=1.0).contains(&self.min_confidence) {
            return Err(GestureError::InvalidConfig(format!(
                "min_confidence must be in [0, 1], got {}",
                self.min_confidence
            )));
        }
        if self.sequence_window < 2 {
            return Err(GestureError::InvalidConfig(format!(
                "sequence_window must be at least 2, got {}",
                self.sequence_window
            )));
        }
        if self.history_limit == 0 {
            return Err(GestureError::InvalidConfig("history_limit must be at least 1".into()));
        }
        Ok(())
    }

    pub fn sensitivity(&self) -> GesturaResult<Sensitivity> {
        Sensitivity::new(self.sensitivity)
    }

    pub fn hold_time(&self) -> Duration {
        Duration::from_millis(self.hold_time_ms)
    }

    pub fn cooldown(&self) -> Duration {
        Duration::from_millis(self.cooldown_ms)
    }

    pub fn health_check_interval(&self) -> Duration {
        Duration::from_millis(self.health_check_interval_ms)
    }
}

/// Tracing subscriber configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is unset
    pub level: String,
    /// Emit JSON lines instead of human-readable text
    pub json: bool,
    pub with_target: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            with_target: true,
        }
    }
}

impl LoggingConfig {
    /// JSON output at the given level
    pub fn json(level: impl Into<String>) -> Self {
        Self {
            level: level.into(),
            json: true,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SessionConfig::default();
        assert_eq!(config.sensitivity, 0.7);
        assert_eq!(config.hold_time(), Duration::from_millis(500));
        assert_eq!(config.cooldown(), Duration::from_secs(1));
        assert_eq!(config.health_check_interval(), Duration::from_secs(60));
        assert_eq!(config.history_limit, 10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_presets_are_valid() {
        for config in [SessionConfig::responsive(), SessionConfig::strict()] {
            assert!(config.validate().is_ok());
        }
        assert!(SessionConfig::strict().min_confidence > SessionConfig::responsive().min_confidence);
    }

    #[test]
    fn test_validation() {
        let bad = SessionConfig {
            sensitivity: 1.2,
            ..SessionConfig::default()
        };
        assert_eq!(bad.validate(), Err(GestureError::InvalidSensitivity(1.2)));

        let bad = SessionConfig {
            min_confidence: -0.1,
            ..SessionConfig::default()
        };
        assert!(matches!(bad.validate(), Err(GestureError::InvalidConfig(_))));

        let bad = SessionConfig {
            sequence_window: 1,
            ..SessionConfig::default()
        };
        assert!(matches!(bad.validate(), Err(GestureError::InvalidConfig(_))));

        let bad = SessionConfig {
            history_limit: 0,
            ..SessionConfig::default()
        };
        assert!(matches!(bad.validate(), Err(GestureError::InvalidConfig(_))));
    }

    #[test]
    fn test_from_json_fills_defaults() {
        let config = SessionConfig::from_json(r#"{ "sensitivity": 0.5, "cooldown_ms": 200 }"#).unwrap();
        assert_eq!(config.sensitivity, 0.5);
        assert_eq!(config.cooldown_ms, 200);
        assert_eq!(config.hold_time_ms, 500);
    }

    #[test]
    fn test_from_json_rejects_invalid() {
        assert!(matches!(
            SessionConfig::from_json("{ not json"),
            Err(GestureError::Serialization(_))
        ));
        assert!(matches!(
            SessionConfig::from_json(r#"{ "sensitivity": 3.0 }"#),
            Err(GestureError::InvalidSensitivity(_))
        ));
    }

    #[test]
    fn test_json_roundtrip() {
        let config = SessionConfig::strict();
        assert_eq!(SessionConfig::from_json(&config.to_json().unwrap()), Ok(config));
    }

    #[test]
    fn test_logging_presets() {
        assert!(!LoggingConfig::default().json);
        let json = LoggingConfig::json("debug");
        assert!(json.json);
        assert_eq!(json.level, "debug");
    }
}
