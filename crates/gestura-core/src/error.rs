//! Error types for the gesture pipeline

use thiserror::Error;

/// Core gesture errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GestureError {
    // Label errors
    #[error("Unknown gesture class: {0}")]
    UnknownGestureClass(u8),

    #[error("Unknown gesture name: {0}")]
    UnknownGestureName(String),

    // Configuration errors
    #[error("Invalid sensitivity: {0} (expected 0.0 - 1.0)")]
    InvalidSensitivity(f32),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // Dataset errors
    #[error("Duplicate example id: {0}")]
    DuplicateExample(String),

    #[error("Dataset is empty")]
    EmptyDataset,

    #[error("Unknown export format: {0}")]
    UnknownExportFormat(String),

    #[error("Serialization failed: {0}")]
    Serialization(String),

    // Runtime errors
    #[error("Telemetry initialization failed: {0}")]
    Telemetry(String),
}

/// Result type for gesture operations
pub type GesturaResult<T> = Result<T, GestureError>;
