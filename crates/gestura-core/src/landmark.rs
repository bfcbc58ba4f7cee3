//! Hand landmarks and frames
//!
//! A hand is tracked as 21 points at fixed anatomical indices. This is the
//! raw output of the upstream landmark detector; nothing here interprets it.

use serde::{Deserialize, Serialize};

use crate::CaptureTime;

/// Number of landmarks in a complete hand
pub const LANDMARK_COUNT: usize = 21;

/// Landmark indices
pub const WRIST: usize = 0;
pub const THUMB_TIP: usize = 4;
pub const INDEX_MCP: usize = 5;
pub const INDEX_TIP: usize = 8;
pub const MIDDLE_MCP: usize = 9;
pub const MIDDLE_TIP: usize = 12;
pub const RING_TIP: usize = 16;
pub const PINKY_MCP: usize = 17;
pub const PINKY_TIP: usize = 20;

/// 3D landmark position in camera-relative units
///
/// `z` is a depth estimate relative to the wrist, not metric depth.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct HandLandmark {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl HandLandmark {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn zero() -> Self {
        Self::default()
    }

    /// Are all three coordinates finite?
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    /// Projection onto the image plane
    pub fn xy(&self) -> Point2 {
        Point2::new(self.x, self.y)
    }
}

/// 2D point on the image plane
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point2 {
    pub x: f32,
    pub y: f32,
}

impl Point2 {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Point2) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Finger identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Finger {
    Thumb,
    Index,
    Middle,
    Ring,
    Pinky,
}

impl Finger {
    /// All fingers in pattern order
    pub fn all() -> &'static [Finger] {
        &[
            Finger::Thumb,
            Finger::Index,
            Finger::Middle,
            Finger::Ring,
            Finger::Pinky,
        ]
    }

    /// Landmark chain from the wrist to the fingertip
    pub fn chain(self) -> [usize; 5] {
        match self {
            Finger::Thumb => [WRIST, 1, 2, 3, 4],
            Finger::Index => [WRIST, 5, 6, 7, 8],
            Finger::Middle => [WRIST, 9, 10, 11, 12],
            Finger::Ring => [WRIST, 13, 14, 15, 16],
            Finger::Pinky => [WRIST, 17, 18, 19, 20],
        }
    }

    /// Fingertip landmark index
    #[inline]
    pub fn tip(self) -> usize {
        self.chain()[4]
    }
}

/// One timestamped capture of a hand
///
/// The landmark count is not enforced: detectors occasionally emit partial
/// hands, and consumers decide how to treat them (see [`Frame::is_complete`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub landmarks: Vec<HandLandmark>,
    pub timestamp: CaptureTime,
}

impl Frame {
    pub fn new(landmarks: Vec<HandLandmark>, timestamp: CaptureTime) -> Self {
        Self {
            landmarks,
            timestamp,
        }
    }

    /// Does this frame carry exactly one full hand?
    #[inline]
    pub fn is_complete(&self) -> bool {
        self.landmarks.len() == LANDMARK_COUNT
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.landmarks.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.landmarks.is_empty()
    }

    /// Landmark by index, `None` if the frame is too short
    #[inline]
    pub fn landmark(&self, index: usize) -> Option<&HandLandmark> {
        self.landmarks.get(index)
    }

    #[inline]
    pub fn wrist(&self) -> Option<&HandLandmark> {
        self.landmark(WRIST)
    }

    #[inline]
    pub fn fingertip(&self, finger: Finger) -> Option<&HandLandmark> {
        self.landmark(finger.tip())
    }

    /// All five fingertips in pattern order, `None` if any is missing
    pub fn fingertips(&self) -> Option<[HandLandmark; 5]> {
        Some([
            *self.fingertip(Finger::Thumb)?,
            *self.fingertip(Finger::Index)?,
            *self.fingertip(Finger::Middle)?,
            *self.fingertip(Finger::Ring)?,
            *self.fingertip(Finger::Pinky)?,
        ])
    }

    /// Does any landmark carry a NaN or infinite coordinate?
    pub fn has_non_finite(&self) -> bool {
        self.landmarks.iter().any(|l| !l.is_finite())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finger_chains_end_at_tips() {
        assert_eq!(Finger::Thumb.tip(), THUMB_TIP);
        assert_eq!(Finger::Index.tip(), INDEX_TIP);
        assert_eq!(Finger::Middle.tip(), MIDDLE_TIP);
        assert_eq!(Finger::Ring.tip(), RING_TIP);
        assert_eq!(Finger::Pinky.tip(), PINKY_TIP);
        for finger in Finger::all() {
            assert_eq!(finger.chain()[0], WRIST);
        }
    }

    #[test]
    fn test_partial_frame_is_representable() {
        let frame = Frame::new(vec![HandLandmark::zero(); 5], CaptureTime::ZERO);
        assert!(!frame.is_complete());
        assert!(frame.wrist().is_some());
        assert!(frame.fingertip(Finger::Index).is_none());
        assert!(frame.fingertips().is_none());
    }

    #[test]
    fn test_non_finite_detection() {
        let mut landmarks = vec![HandLandmark::zero(); LANDMARK_COUNT];
        let frame = Frame::new(landmarks.clone(), CaptureTime::ZERO);
        assert!(!frame.has_non_finite());

        landmarks[7].z = f32::NAN;
        let frame = Frame::new(landmarks, CaptureTime::ZERO);
        assert!(frame.has_non_finite());
    }

    #[test]
    fn test_point_distance() {
        let a = Point2::new(0.0, 0.0);
        let b = Point2::new(3.0, 4.0);
        assert!((a.distance(&b) - 5.0).abs() < 1e-6);
    }
}
