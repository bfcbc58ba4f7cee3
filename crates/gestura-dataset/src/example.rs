//! Recorded gesture examples

use serde::{Deserialize, Serialize};

use gestura_core::{CaptureTime, ExampleId, Frame, GesturaResult, GestureLabel, UserId};

/// Optional capture conditions supplied by the recorder
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CaptureAnnotations {
    pub lighting: Option<String>,
    pub distance: Option<f32>,
}

impl CaptureAnnotations {
    pub fn with_lighting(mut self, lighting: impl Into<String>) -> Self {
        self.lighting = Some(lighting.into());
        self
    }

    pub fn with_distance(mut self, distance: f32) -> Self {
        self.distance = Some(distance);
        self
    }
}

/// Per-example metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExampleMetadata {
    pub user_id: UserId,
    pub captured_at: CaptureTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lighting: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<f32>,
    /// Quality score in [0, 1]
    pub quality: f32,
}

/// One labelled training record
///
/// The label is free-form so recorders can capture gestures outside the
/// built-in set. Examples are never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GestureExample {
    pub id: ExampleId,
    pub label: String,
    pub frame: Frame,
    pub metadata: ExampleMetadata,
}

impl GestureExample {
    /// Built-in label for this example, if the label names one
    pub fn gesture_label(&self) -> GesturaResult<GestureLabel> {
        self.label.parse()
    }

    /// Copy of this example with another id and frame, metadata carried over
    pub fn derive(&self, id: ExampleId, frame: Frame) -> GestureExample {
        GestureExample {
            id,
            label: self.label.clone(),
            frame,
            metadata: self.metadata.clone(),
        }
    }
}
