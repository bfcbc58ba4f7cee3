//! Example quality scoring
//!
//! Quality is a penalty product, not a learned score. A frame starts at 1.0
//! and loses a fixed factor per defect; defects are independent.

use gestura_core::Frame;

/// z range above which depth estimates are considered inconsistent
pub const DEPTH_RANGE_LIMIT: f32 = 1.0;
/// Factor applied for inconsistent depth
pub const DEPTH_PENALTY: f32 = 0.8;
/// Factor applied for NaN or infinite coordinates
pub const CORRUPT_PENALTY: f32 = 0.5;

/// Range of the finite z values in the frame, 0 if there are none
pub fn depth_range(frame: &Frame) -> f32 {
    let mut min = f32::INFINITY;
    let mut max = f32::NEG_INFINITY;
    for z in frame.landmarks.iter().map(|l| l.z).filter(|z| z.is_finite()) {
        min = min.min(z);
        max = max.max(z);
    }
    if min <= max {
        max - min
    } else {
        0.0
    }
}

/// Quality in [0, 1]; 0 for frames that are not a full hand
pub fn calculate_quality(frame: &Frame) -> f32 {
    if !frame.is_complete() {
        return 0.0;
    }

    let mut quality = 1.0;
    if depth_range(frame) > DEPTH_RANGE_LIMIT {
        quality *= DEPTH_PENALTY;
    }
    if frame.has_non_finite() {
        quality *= CORRUPT_PENALTY;
    }
    quality
}

#[cfg(test)]
mod tests {
    use super::*;
    use gestura_core::{CaptureTime, HandLandmark, LANDMARK_COUNT};

    fn flat() -> Vec<HandLandmark> {
        vec![HandLandmark::new(10.0, 20.0, 0.0); LANDMARK_COUNT]
    }

    fn quality(landmarks: Vec<HandLandmark>) -> f32 {
        calculate_quality(&Frame::new(landmarks, CaptureTime::ZERO))
    }

    #[test]
    fn test_clean_frame_is_perfect() {
        assert_eq!(quality(flat()), 1.0);
    }

    #[test]
    fn test_wrong_count_is_zero() {
        assert_eq!(quality(Vec::new()), 0.0);
        assert_eq!(quality(vec![HandLandmark::zero(); 20]), 0.0);
        assert_eq!(quality(vec![HandLandmark::zero(); 22]), 0.0);
    }

    #[test]
    fn test_depth_penalty() {
        let mut landmarks = flat();
        landmarks[3].z = 1.5;
        assert_eq!(quality(landmarks.clone()), DEPTH_PENALTY);

        // Exactly at the limit is not penalised
        landmarks[3].z = 1.0;
        assert_eq!(quality(landmarks), 1.0);
    }

    #[test]
    fn test_penalties_multiply() {
        let mut landmarks = flat();
        landmarks[3].z = 2.0;
        landmarks[9].x = f32::NAN;
        assert!((quality(landmarks) - DEPTH_PENALTY * CORRUPT_PENALTY).abs() < 1e-6);
    }

    #[test]
    fn test_non_finite_z_is_ignored_for_range() {
        let mut landmarks = flat();
        landmarks[0].z = f32::INFINITY;
        landmarks[1].z = f32::NEG_INFINITY;
        let frame = Frame::new(landmarks, CaptureTime::ZERO);
        assert_eq!(depth_range(&frame), 0.0);
        assert_eq!(calculate_quality(&frame), CORRUPT_PENALTY);
    }
}
