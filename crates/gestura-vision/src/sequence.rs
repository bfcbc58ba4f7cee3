//! Sequence classifier - Compound gestures across frames
//!
//! A compound gesture starts from a pointer pose (the anchor, the oldest
//! frame in the buffer) and is completed by the latest frame: a pinch zooms,
//! a horizontal swipe jumps to the first or last slide.
//!
//! The classifier keeps no state between calls. Buffer windowing and
//! eviction belong to the caller.

use gestura_core::{
    Frame, GestureLabel, GestureMetadata, GestureResult, SequenceCommand, SlideTarget,
};
use tracing::debug;

use crate::{is_pinch, pinch_spreading, swipe, FrameClassifier, SwipeDirection};

/// Confidence reported for zoom gestures
pub const ZOOM_CONFIDENCE: f32 = 0.82;
/// Confidence reported for first/last slide jumps
pub const JUMP_CONFIDENCE: f32 = 0.78;
/// Scale applied by zoom-in
pub const ZOOM_IN_SCALE: f32 = 1.2;
/// Scale applied by zoom-out
pub const ZOOM_OUT_SCALE: f32 = 0.8;

/// Minimum buffer length for a sequence
pub const MIN_SEQUENCE_LEN: usize = 2;

/// Compound gesture rule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequenceRule {
    /// Latest frame pinches; spread decides the zoom direction
    Zoom,
    /// Wrist travelled past the swipe threshold
    Swipe(SwipeDirection),
}

impl SequenceRule {
    fn evaluate(&self, anchor: &Frame, latest: &Frame) -> Option<GestureResult> {
        match *self {
            SequenceRule::Zoom => {
                if !is_pinch(latest) {
                    return None;
                }
                let (label, scale) = if pinch_spreading(anchor, latest) {
                    (GestureLabel::ZoomIn, ZOOM_IN_SCALE)
                } else {
                    (GestureLabel::ZoomOut, ZOOM_OUT_SCALE)
                };
                Some(
                    GestureResult::detected(label, ZOOM_CONFIDENCE).with_metadata(
                        GestureMetadata::Sequence {
                            command: SequenceCommand::Zoom { scale },
                        },
                    ),
                )
            }
            SequenceRule::Swipe(direction) => {
                if !swipe(anchor, latest, direction) {
                    return None;
                }
                let (label, target) = match direction {
                    SwipeDirection::Left => (GestureLabel::FirstSlide, SlideTarget::First),
                    SwipeDirection::Right => (GestureLabel::LastSlide, SlideTarget::Last),
                };
                Some(
                    GestureResult::detected(label, JUMP_CONFIDENCE).with_metadata(
                        GestureMetadata::Sequence {
                            command: SequenceCommand::Jump { target },
                        },
                    ),
                )
            }
        }
    }
}

/// Sequence rules, in evaluation order
pub const SEQUENCE_RULES: &[SequenceRule] = &[
    SequenceRule::Zoom,
    SequenceRule::Swipe(SwipeDirection::Left),
    SequenceRule::Swipe(SwipeDirection::Right),
];

/// Compound gesture classifier
#[derive(Debug, Clone, Default)]
pub struct SequenceClassifier {
    frames: FrameClassifier,
}

impl SequenceClassifier {
    pub fn new(frames: FrameClassifier) -> Self {
        Self { frames }
    }

    /// The single-frame classifier used for the anchor
    pub fn frame_classifier(&self) -> &FrameClassifier {
        &self.frames
    }

    pub fn frame_classifier_mut(&mut self) -> &mut FrameClassifier {
        &mut self.frames
    }

    /// Classify an ordered buffer, oldest frame first
    pub fn classify(&self, frames: &[Frame]) -> GestureResult {
        if frames.len() < MIN_SEQUENCE_LEN {
            return GestureResult::none();
        }
        let (Some(anchor), Some(latest)) = (frames.first(), frames.last()) else {
            return GestureResult::none();
        };

        if self.frames.predict_class(anchor) != Some(GestureLabel::Pointer) {
            return GestureResult::none();
        }

        for rule in SEQUENCE_RULES {
            if let Some(result) = rule.evaluate(anchor, latest) {
                debug!(?rule, gesture = ?result.gesture, frames = frames.len(), "sequence matched");
                return result;
            }
        }

        GestureResult::none()
    }
}
