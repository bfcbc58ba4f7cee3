//! Gestura Dataset - Recorded examples and the offline training pipeline
//!
//! This crate owns everything that happens away from the live camera feed:
//! - Example collection with always-consistent statistics
//! - Quality scoring of recorded frames
//! - Structured / tabular export and structured import
//! - Seeded geometric augmentation
//! - A prototype learner and the training loop that measures it

pub mod augment;
pub mod collection;
pub mod example;
pub mod export;
pub mod quality;
pub mod training;

pub use augment::*;
pub use collection::*;
pub use example::*;
pub use export::*;
pub use quality::*;
pub use training::*;
