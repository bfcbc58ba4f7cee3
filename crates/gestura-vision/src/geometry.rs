//! Feature Geometry - Derived quantities from hand landmarks
//!
//! Pure functions over one or two frames. Every function tolerates frames
//! with missing landmarks by failing closed: tests return `false` and
//! distances return `f32::INFINITY`. Thresholds are in detector pixel units,
//! so the tests are resolution dependent.

use std::fmt;

use gestura_core::{
    Finger, Frame, GestureError, GesturaResult, HandLandmark, INDEX_TIP, MIDDLE_MCP, THUMB_TIP,
    WRIST,
};

/// Units a fingertip must rise above the wrist at sensitivity 1.0
pub const EXTENSION_SCALE: f32 = 100.0;
/// Thumb-index distance below which the hand pinches
pub const PINCH_THRESHOLD: f32 = 50.0;
/// Two fingertips closer than this are "together"
pub const FINGER_PROXIMITY_THRESHOLD: f32 = 30.0;
/// Middle MCP offset from the wrist that counts as pointing
pub const POINTING_OFFSET: f32 = 50.0;
/// Wrist travel between frames that counts as a swipe
pub const SWIPE_THRESHOLD: f32 = 100.0;

/// Strictness of the finger-extension test (0.0 - 1.0)
///
/// Higher values demand fingertips further above the wrist.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Sensitivity(f32);

impl Sensitivity {
    pub const DEFAULT: Sensitivity = Sensitivity(0.7);

    pub fn new(value: f32) -> GesturaResult<Self> {
        if (0.0..=1.0).contains(&value) {
            Ok(Sensitivity(value))
        } else {
            Err(GestureError::InvalidSensitivity(value))
        }
    }

    #[inline]
    pub fn value(self) -> f32 {
        self.0
    }

    /// Vertical rise required for a finger to count as extended
    #[inline]
    pub fn extension_threshold(self) -> f32 {
        EXTENSION_SCALE * self.0
    }
}

impl Default for Sensitivity {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Coarse pointing direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Left,
    Right,
    Up,
}

/// Horizontal swipe direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SwipeDirection {
    Left,
    Right,
}

/// Extended/curled state of the five fingers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct FingerPattern(pub [bool; 5]);

impl FingerPattern {
    pub const FIST: FingerPattern = FingerPattern([false, false, false, false, false]);
    pub const OPEN: FingerPattern = FingerPattern([true, true, true, true, true]);
    pub const INDEX_ONLY: FingerPattern = FingerPattern([false, true, false, false, false]);
    pub const INDEX_MIDDLE: FingerPattern = FingerPattern([false, true, true, false, false]);
    pub const THUMB_ONLY: FingerPattern = FingerPattern([true, false, false, false, false]);

    #[inline]
    pub fn is_extended(&self, finger: Finger) -> bool {
        self.0[finger as usize]
    }

    /// Number of extended fingers
    pub fn count(&self) -> usize {
        self.0.iter().filter(|&&e| e).count()
    }
}

impl fmt::Display for FingerPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for extended in self.0 {
            f.write_str(if extended { "1" } else { "0" })?;
        }
        Ok(())
    }
}

/// Is the fingertip raised above the wrist by the sensitivity threshold?
#[inline]
pub fn is_finger_extended(tip: &HandLandmark, wrist: &HandLandmark, sensitivity: Sensitivity) -> bool {
    tip.y < wrist.y - sensitivity.extension_threshold()
}

/// Extension test for all five fingers against the wrist
pub fn finger_pattern(frame: &Frame, sensitivity: Sensitivity) -> FingerPattern {
    let mut pattern = FingerPattern::FIST;
    let Some(wrist) = frame.wrist() else {
        return pattern;
    };

    for (i, finger) in Finger::all().iter().enumerate() {
        pattern.0[i] = frame
            .fingertip(*finger)
            .map(|tip| is_finger_extended(tip, wrist, sensitivity))
            .unwrap_or(false);
    }
    pattern
}

/// Euclidean distance in (x, y, z)
#[inline]
pub fn distance_3d(a: &HandLandmark, b: &HandLandmark) -> f32 {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    let dz = a.z - b.z;
    (dx * dx + dy * dy + dz * dz).sqrt()
}

/// Distance between two landmarks of a frame, infinite if either is missing
pub fn landmark_distance(frame: &Frame, a: usize, b: usize) -> f32 {
    match (frame.landmark(a), frame.landmark(b)) {
        (Some(a), Some(b)) => distance_3d(a, b),
        _ => f32::INFINITY,
    }
}

/// Thumb tip to index tip distance
#[inline]
pub fn pinch_distance(frame: &Frame) -> f32 {
    landmark_distance(frame, THUMB_TIP, INDEX_TIP)
}

/// Are thumb and index tips touching?
#[inline]
pub fn is_pinch(frame: &Frame) -> bool {
    pinch_distance(frame) < PINCH_THRESHOLD
}

/// Are two fingertips held together?
#[inline]
pub fn fingers_close(a: &HandLandmark, b: &HandLandmark) -> bool {
    distance_3d(a, b) < FINGER_PROXIMITY_THRESHOLD
}

/// Did thumb and index move apart between frames? (zoom-in direction)
pub fn pinch_spreading(prev: &Frame, curr: &Frame) -> bool {
    let before = pinch_distance(prev);
    let after = pinch_distance(curr);
    before.is_finite() && after.is_finite() && after > before
}

/// Is the hand pointing in `direction`? (middle MCP relative to wrist)
pub fn hand_pointing(frame: &Frame, direction: Direction) -> bool {
    let (Some(wrist), Some(mcp)) = (frame.landmark(WRIST), frame.landmark(MIDDLE_MCP)) else {
        return false;
    };

    match direction {
        Direction::Left => mcp.x < wrist.x - POINTING_OFFSET,
        Direction::Right => mcp.x > wrist.x + POINTING_OFFSET,
        Direction::Up => mcp.y < wrist.y - POINTING_OFFSET,
    }
}

/// Did the wrist travel horizontally past the swipe threshold?
pub fn swipe(prev: &Frame, curr: &Frame, direction: SwipeDirection) -> bool {
    let (Some(before), Some(after)) = (prev.wrist(), curr.wrist()) else {
        return false;
    };

    match direction {
        SwipeDirection::Left => after.x < before.x - SWIPE_THRESHOLD,
        SwipeDirection::Right => after.x > before.x + SWIPE_THRESHOLD,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_hands::*;
    use gestura_core::{CaptureTime, LANDMARK_COUNT};
    use proptest::prelude::*;

    #[test]
    fn test_sensitivity_bounds() {
        assert!(Sensitivity::new(0.0).is_ok());
        assert!(Sensitivity::new(1.0).is_ok());
        assert_eq!(
            Sensitivity::new(1.5),
            Err(GestureError::InvalidSensitivity(1.5))
        );
        assert!(Sensitivity::new(f32::NAN).is_err());
        assert_eq!(Sensitivity::default().value(), 0.7);
    }

    #[test]
    fn test_finger_extension_threshold() {
        let wrist = HandLandmark::new(0.0, 200.0, 0.0);
        let s = Sensitivity::DEFAULT;
        assert!(is_finger_extended(&HandLandmark::new(0.0, 129.0, 0.0), &wrist, s));
        assert!(!is_finger_extended(&HandLandmark::new(0.0, 131.0, 0.0), &wrist, s));
        // Stricter sensitivity needs a higher fingertip
        let strict = Sensitivity::new(1.0).unwrap();
        assert!(!is_finger_extended(&HandLandmark::new(0.0, 129.0, 0.0), &wrist, strict));
    }

    #[test]
    fn test_finger_pattern() {
        let f = frame(hand([false, true, false, false, false]));
        assert_eq!(finger_pattern(&f, Sensitivity::DEFAULT), FingerPattern::INDEX_ONLY);

        let f = frame(hand([true; 5]));
        let pattern = finger_pattern(&f, Sensitivity::DEFAULT);
        assert_eq!(pattern, FingerPattern::OPEN);
        assert_eq!(pattern.count(), 5);
        assert_eq!(pattern.to_string(), "11111");
    }

    #[test]
    fn test_short_frames_fail_closed() {
        let empty = Frame::new(Vec::new(), CaptureTime::ZERO);
        assert_eq!(finger_pattern(&empty, Sensitivity::DEFAULT), FingerPattern::FIST);
        assert_eq!(pinch_distance(&empty), f32::INFINITY);
        assert!(!is_pinch(&empty));
        assert!(!hand_pointing(&empty, Direction::Up));
        assert!(!swipe(&empty, &empty, SwipeDirection::Left));
        assert!(!pinch_spreading(&empty, &empty));

        // Wrist present, tips missing
        let partial = Frame::new(vec![HandLandmark::zero(); 6], CaptureTime::ZERO);
        assert_eq!(finger_pattern(&partial, Sensitivity::new(0.0).unwrap()), FingerPattern::FIST);
    }

    #[test]
    fn test_pinch_on_identical_tips() {
        let mut landmarks = fist();
        landmarks[THUMB_TIP] = HandLandmark::new(120.0, 80.0, -3.0);
        landmarks[INDEX_TIP] = HandLandmark::new(120.0, 80.0, -3.0);
        let f = frame(landmarks);
        assert_eq!(pinch_distance(&f), 0.0);
        assert!(is_pinch(&f));
    }

    #[test]
    fn test_hand_pointing_directions() {
        let right = frame(pointing(fist(), 60.0, 0.0));
        assert!(hand_pointing(&right, Direction::Right));
        assert!(!hand_pointing(&right, Direction::Left));
        assert!(!hand_pointing(&right, Direction::Up));

        let left = frame(pointing(fist(), -60.0, 0.0));
        assert!(hand_pointing(&left, Direction::Left));

        let up = frame(pointing(fist(), 0.0, -60.0));
        assert!(hand_pointing(&up, Direction::Up));

        // Offset of exactly 50 is not enough
        let edge = frame(pointing(fist(), 50.0, 0.0));
        assert!(!hand_pointing(&edge, Direction::Right));
    }

    #[test]
    fn test_swipe() {
        let a = fist();
        let left = shifted(&a, -150.0);
        let right = shifted(&a, 150.0);
        assert!(swipe(&frame(a.clone()), &frame(left.clone()), SwipeDirection::Left));
        assert!(!swipe(&frame(a.clone()), &frame(left), SwipeDirection::Right));
        assert!(swipe(&frame(a.clone()), &frame(right), SwipeDirection::Right));
        assert!(!swipe(&frame(a.clone()), &frame(shifted(&a, -100.0)), SwipeDirection::Left));
    }

    #[test]
    fn test_fingers_close() {
        let a = HandLandmark::new(0.0, 0.0, 0.0);
        assert!(fingers_close(&a, &HandLandmark::new(10.0, 10.0, 0.0)));
        assert!(!fingers_close(&a, &HandLandmark::new(30.0, 0.0, 0.0)));
    }

    fn landmark_strategy() -> impl Strategy<Value = HandLandmark> {
        (-500.0f32..500.0, -500.0f32..500.0, -50.0f32..50.0)
            .prop_map(|(x, y, z)| HandLandmark::new(x, y, z))
    }

    fn frame_strategy() -> impl Strategy<Value = Frame> {
        prop::collection::vec(landmark_strategy(), LANDMARK_COUNT)
            .prop_map(|landmarks| Frame::new(landmarks, CaptureTime::ZERO))
    }

    proptest! {
        #[test]
        fn prop_pinch_spreading_iff_distance_grew(prev in frame_strategy(), curr in frame_strategy()) {
            let before = distance_3d(&prev.landmarks[THUMB_TIP], &prev.landmarks[INDEX_TIP]);
            let after = distance_3d(&curr.landmarks[THUMB_TIP], &curr.landmarks[INDEX_TIP]);
            prop_assert_eq!(pinch_spreading(&prev, &curr), after > before);
        }

        #[test]
        fn prop_distance_is_symmetric(a in landmark_strategy(), b in landmark_strategy()) {
            prop_assert_eq!(distance_3d(&a, &b), distance_3d(&b, &a));
            prop_assert!(distance_3d(&a, &b) >= 0.0);
        }

        #[test]
        fn prop_short_frames_never_panic(len in 0usize..LANDMARK_COUNT, s in 0.0f32..=1.0) {
            let f = Frame::new(vec![HandLandmark::zero(); len], CaptureTime::ZERO);
            let sensitivity = Sensitivity::new(s).unwrap();
            let _ = finger_pattern(&f, sensitivity);
            prop_assert!(!is_pinch(&f) || len > INDEX_TIP);
            prop_assert!(!hand_pointing(&f, Direction::Up));
        }
    }
}
