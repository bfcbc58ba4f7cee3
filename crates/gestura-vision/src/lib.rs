//! Gestura Vision
//!
//! Gestures as GEOMETRY, not learned weights. This is NOT a neural classifier.
//!
//! # Pipeline
//!
//! Landmarks → Finger pattern + direction tests → Ordered rules → Label
//!
//! A frame is reduced to a handful of geometric facts (which fingers are
//! raised, where the hand points, whether thumb and index pinch). An ordered
//! rule table maps those facts to a label; the first matching rule wins.
//! Confidence is derived from how clean the frame is, not from the rule.
//!
//! Compound gestures (zoom, jump to first/last slide) need two or more frames
//! and are recognized by the sequence classifier on top of single frames.

pub mod classifier;
pub mod confidence;
pub mod geometry;
pub mod sequence;

pub use classifier::*;
pub use confidence::*;
pub use geometry::*;
pub use sequence::*;
