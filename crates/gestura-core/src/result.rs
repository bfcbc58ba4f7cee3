//! Classification results
//!
//! A result is a label (or none), a confidence and optional metadata. The
//! metadata is typed per gesture family instead of a free-form bag, so a
//! zoom result can only carry a scale and a navigation result a slide target.

use serde::{Deserialize, Serialize};

use crate::{GestureLabel, Point2};

/// Highest confidence a classifier ever reports
pub const MAX_CONFIDENCE: f32 = 0.95;

/// Slide a navigation gesture moves to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlideTarget {
    Next,
    Previous,
    First,
    Last,
    Number(u32),
}

/// Command carried by a sequence gesture
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SequenceCommand {
    /// Zoom by a scale factor (>1 zooms in)
    Zoom { scale: f32 },
    /// Jump straight to a slide
    Jump { target: SlideTarget },
}

/// Family-specific result payload
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "family", rename_all = "snake_case")]
pub enum GestureMetadata {
    Navigation { target: SlideTarget },
    Drawing { tip: Point2 },
    Control { pointer: Option<Point2> },
    Sequence { command: SequenceCommand },
}

/// Outcome of classifying a frame or a frame sequence
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GestureResult {
    pub gesture: Option<GestureLabel>,
    pub confidence: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<GestureMetadata>,
}

impl GestureResult {
    /// No gesture detected
    pub fn none() -> Self {
        Self {
            gesture: None,
            confidence: 0.0,
            metadata: None,
        }
    }

    /// A detected gesture; confidence is clamped to `[0, MAX_CONFIDENCE]`
    pub fn detected(gesture: GestureLabel, confidence: f32) -> Self {
        let confidence = if confidence.is_finite() {
            confidence.clamp(0.0, MAX_CONFIDENCE)
        } else {
            0.0
        };
        Self {
            gesture: Some(gesture),
            confidence,
            metadata: None,
        }
    }

    pub fn with_metadata(mut self, metadata: GestureMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    #[inline]
    pub fn is_none(&self) -> bool {
        self.gesture.is_none()
    }

    #[inline]
    pub fn is_detected(&self) -> bool {
        self.gesture.is_some()
    }
}

impl Default for GestureResult {
    fn default() -> Self {
        Self::none()
    }
}
