//! Gestura Test Harness - Synthetic hands, fuzzing and scenario validation
//!
//! This crate provides:
//! - Seeded synthetic hand generation
//! - Dataset mutation fuzzing
//! - End-to-end recognition scenarios

pub mod synth;
pub mod dataset_fuzzer;
pub mod integration;

pub use synth::*;
pub use dataset_fuzzer::*;
pub use integration::*;
