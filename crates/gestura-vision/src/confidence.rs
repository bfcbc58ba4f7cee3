//! Confidence scoring from frame geometry
//!
//! Confidence is not a calibrated probability. It rewards frames whose depth
//! estimates agree with each other and whose fingertips are well separated,
//! and never reaches certainty.

use gestura_core::{Frame, MAX_CONFIDENCE};

/// Weight of depth consistency in the final score
pub const DEPTH_WEIGHT: f32 = 0.7;
/// Weight of fingertip separation in the final score
pub const CLARITY_WEIGHT: f32 = 0.3;
/// z variance at which depth consistency reaches zero
pub const DEPTH_VARIANCE_FLOOR: f32 = 100.0;
/// Mean fingertip separation mapped to full clarity
pub const CLARITY_SCALE: f32 = 200.0;

/// Depth consistency: 1 for a flat hand, 0 once z variance reaches 100
pub fn depth_consistency(frame: &Frame) -> f32 {
    if frame.is_empty() {
        return 0.0;
    }

    let n = frame.len() as f32;
    let mean = frame.landmarks.iter().map(|l| l.z).sum::<f32>() / n;
    let variance = frame
        .landmarks
        .iter()
        .map(|l| (l.z - mean) * (l.z - mean))
        .sum::<f32>()
        / n;

    let score = 1.0 - variance / DEPTH_VARIANCE_FLOOR;
    if score.is_finite() {
        score.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// Fingertip clarity: mean pairwise 2D distance between the five tips / 200
pub fn fingertip_clarity(frame: &Frame) -> f32 {
    let Some(tips) = frame.fingertips() else {
        return 0.0;
    };

    let mut total = 0.0;
    let mut count = 0;
    for i in 0..tips.len() {
        for j in (i + 1)..tips.len() {
            total += tips[i].xy().distance(&tips[j].xy());
            count += 1;
        }
    }

    let score = (total / count as f32) / CLARITY_SCALE;
    if score.is_finite() {
        score.clamp(0.0, MAX_CONFIDENCE)
    } else {
        0.0
    }
}

/// Weighted frame confidence in `[0, 0.95]`
pub fn frame_confidence(frame: &Frame) -> f32 {
    let score = DEPTH_WEIGHT * depth_consistency(frame) + CLARITY_WEIGHT * fingertip_clarity(frame);
    score.clamp(0.0, MAX_CONFIDENCE)
}
