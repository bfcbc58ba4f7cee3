//! Single-frame classifier - Ordered rule evaluation
//!
//! Each rule pairs a finger pattern with an optional geometric test. Rules
//! are evaluated in table order and the first match wins, so the directional
//! index-finger rules must stay ahead of the plain `draw` rule they overlap.

use gestura_core::{
    Finger, Frame, GestureLabel, GestureMetadata, GestureResult, Point2, SlideTarget, INDEX_TIP,
    MIDDLE_TIP,
};
use tracing::trace;

use crate::{
    fingers_close, finger_pattern, frame_confidence, hand_pointing, Direction, FingerPattern,
    Sensitivity,
};

/// Geometric test a rule applies on top of its finger pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleTest {
    /// Pattern alone decides
    Always,
    /// Hand must point in the direction
    Pointing(Direction),
    /// Hand must not point in the direction
    NotPointing(Direction),
    /// Two fingertips must be apart
    TipsApart(Finger, Finger),
}

impl RuleTest {
    fn holds(&self, frame: &Frame) -> bool {
        match *self {
            RuleTest::Always => true,
            RuleTest::Pointing(direction) => hand_pointing(frame, direction),
            RuleTest::NotPointing(direction) => !hand_pointing(frame, direction),
            RuleTest::TipsApart(a, b) => match (frame.fingertip(a), frame.fingertip(b)) {
                (Some(a), Some(b)) => !fingers_close(a, b),
                _ => false,
            },
        }
    }
}

/// One entry of the rule table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GestureRule {
    pub label: GestureLabel,
    pub pattern: FingerPattern,
    pub test: RuleTest,
}

impl GestureRule {
    const fn new(label: GestureLabel, pattern: FingerPattern, test: RuleTest) -> Self {
        Self {
            label,
            pattern,
            test,
        }
    }

    /// Does the frame satisfy this rule given its finger pattern?
    pub fn matches(&self, pattern: FingerPattern, frame: &Frame) -> bool {
        self.pattern == pattern && self.test.holds(frame)
    }
}

/// The rule table, in evaluation order
pub const GESTURE_RULES: &[GestureRule] = &[
    GestureRule::new(
        GestureLabel::PointRight,
        FingerPattern::INDEX_ONLY,
        RuleTest::Pointing(Direction::Right),
    ),
    GestureRule::new(
        GestureLabel::PointLeft,
        FingerPattern::INDEX_ONLY,
        RuleTest::Pointing(Direction::Left),
    ),
    GestureRule::new(
        GestureLabel::Pointer,
        FingerPattern::INDEX_ONLY,
        RuleTest::Pointing(Direction::Up),
    ),
    GestureRule::new(
        GestureLabel::PalmOut,
        FingerPattern::OPEN,
        RuleTest::Pointing(Direction::Up),
    ),
    GestureRule::new(GestureLabel::Stop, FingerPattern::FIST, RuleTest::Always),
    GestureRule::new(GestureLabel::OpenHand, FingerPattern::OPEN, RuleTest::Always),
    GestureRule::new(
        GestureLabel::Peace,
        FingerPattern::INDEX_MIDDLE,
        RuleTest::TipsApart(Finger::Index, Finger::Middle),
    ),
    GestureRule::new(GestureLabel::Draw, FingerPattern::INDEX_ONLY, RuleTest::Always),
    GestureRule::new(GestureLabel::Save, FingerPattern::THUMB_ONLY, RuleTest::Always),
    GestureRule::new(
        GestureLabel::Highlight,
        FingerPattern::INDEX_MIDDLE,
        RuleTest::NotPointing(Direction::Up),
    ),
];

/// Single-frame gesture classifier
#[derive(Debug, Clone)]
pub struct FrameClassifier {
    sensitivity: Sensitivity,
    rules: &'static [GestureRule],
}

impl Default for FrameClassifier {
    fn default() -> Self {
        Self::new(Sensitivity::default())
    }
}

impl FrameClassifier {
    /// Create a classifier using the standard rule table
    pub fn new(sensitivity: Sensitivity) -> Self {
        Self {
            sensitivity,
            rules: GESTURE_RULES,
        }
    }

    pub fn sensitivity(&self) -> Sensitivity {
        self.sensitivity
    }

    pub fn set_sensitivity(&mut self, sensitivity: Sensitivity) {
        self.sensitivity = sensitivity;
    }

    /// Rules in evaluation order
    pub fn rules(&self) -> &'static [GestureRule] {
        self.rules
    }

    /// First matching rule's label, without confidence scoring
    ///
    /// Partial hands and hands with non-finite coordinates match nothing.
    pub fn predict_class(&self, frame: &Frame) -> Option<GestureLabel> {
        if !frame.is_complete() || frame.has_non_finite() {
            return None;
        }

        let pattern = finger_pattern(frame, self.sensitivity);
        let label = self
            .rules
            .iter()
            .find(|rule| rule.matches(pattern, frame))
            .map(|rule| rule.label);

        trace!(%pattern, ?label, "rule evaluation");
        label
    }

    /// Classify one frame
    pub fn classify(&self, frame: &Frame) -> GestureResult {
        let Some(label) = self.predict_class(frame) else {
            return GestureResult::none();
        };

        let mut result = GestureResult::detected(label, frame_confidence(frame));
        if let Some(metadata) = frame_metadata(label, frame) {
            result = result.with_metadata(metadata);
        }
        result
    }
}

/// Family payload for a single-frame label
fn frame_metadata(label: GestureLabel, frame: &Frame) -> Option<GestureMetadata> {
    let index_tip = frame.landmark(INDEX_TIP).map(|l| l.xy());

    match label {
        GestureLabel::PointRight => Some(GestureMetadata::Navigation {
            target: SlideTarget::Next,
        }),
        GestureLabel::PointLeft => Some(GestureMetadata::Navigation {
            target: SlideTarget::Previous,
        }),
        GestureLabel::OpenHand => Some(GestureMetadata::Navigation {
            target: SlideTarget::First,
        }),
        GestureLabel::Peace => Some(GestureMetadata::Navigation {
            target: SlideTarget::Last,
        }),
        GestureLabel::Draw | GestureLabel::PalmOut => {
            index_tip.map(|tip| GestureMetadata::Drawing { tip })
        }
        GestureLabel::Highlight => {
            // Highlighter sits between the two raised tips
            let middle_tip = frame.landmark(MIDDLE_TIP).map(|l| l.xy());
            match (index_tip, middle_tip) {
                (Some(a), Some(b)) => Some(GestureMetadata::Drawing {
                    tip: Point2::new((a.x + b.x) / 2.0, (a.y + b.y) / 2.0),
                }),
                _ => None,
            }
        }
        GestureLabel::Pointer => Some(GestureMetadata::Control { pointer: index_tip }),
        GestureLabel::Stop | GestureLabel::Save => Some(GestureMetadata::Control { pointer: None }),
        GestureLabel::ZoomIn
        | GestureLabel::ZoomOut
        | GestureLabel::FirstSlide
        | GestureLabel::LastSlide => None,
    }
}
