//! Augmentation - Synthetic variants of recorded examples
//!
//! Each variant applies one similarity transform to every landmark:
//! scale and translate in the image plane, then rotate about the origin.
//! Depth is scaled only. Randomness comes from a seedable `StdRng` so a
//! fixed seed reproduces the same variants.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::debug;

use gestura_core::{Frame, GestureError, GesturaResult, HandLandmark};

use crate::GestureExample;

/// Variants produced per source example
pub const VARIANTS_PER_EXAMPLE: usize = 3;

/// Augmentation ranges
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AugmentationConfig {
    pub enabled: bool,
    /// Rotation, +/- degrees
    pub rotation_range: f32,
    /// Scale, 1 +/- this fraction
    pub scale_range: f32,
    /// Translation, +/- units on each axis
    pub translation_range: f32,
}

impl Default for AugmentationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            rotation_range: 30.0,
            scale_range: 0.2,
            translation_range: 0.1,
        }
    }
}

impl AugmentationConfig {
    /// No augmentation
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    /// Ranges must be finite and non-negative; scale must stay positive
    pub fn validate(&self) -> GesturaResult<()> {
        let ranges = [
            ("rotation_range", self.rotation_range),
            ("scale_range", self.scale_range),
            ("translation_range", self.translation_range),
        ];
        for (name, value) in ranges {
            if !value.is_finite() || value < 0.0 {
                return Err(GestureError::InvalidConfig(format!(
                    "{name} must be finite and non-negative, got {value}"
                )));
            }
        }
        if self.scale_range >= 1.0 {
            return Err(GestureError::InvalidConfig(format!(
                "scale_range must be below 1.0, got {}",
                self.scale_range
            )));
        }
        Ok(())
    }
}

/// One sampled similarity transform
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AugmentTransform {
    pub rotation_deg: f32,
    pub scale: f32,
    pub tx: f32,
    pub ty: f32,
}

impl AugmentTransform {
    pub const IDENTITY: AugmentTransform = AugmentTransform {
        rotation_deg: 0.0,
        scale: 1.0,
        tx: 0.0,
        ty: 0.0,
    };

    pub fn apply(&self, landmark: &HandLandmark) -> HandLandmark {
        let x = landmark.x * self.scale + self.tx;
        let y = landmark.y * self.scale + self.ty;
        let (sin, cos) = self.rotation_deg.to_radians().sin_cos();
        HandLandmark::new(x * cos - y * sin, x * sin + y * cos, landmark.z * self.scale)
    }

    /// Transform every landmark; the timestamp is kept
    pub fn apply_frame(&self, frame: &Frame) -> Frame {
        Frame::new(
            frame.landmarks.iter().map(|l| self.apply(l)).collect(),
            frame.timestamp,
        )
    }

    /// Does this transform lie within the configured ranges?
    pub fn within(&self, config: &AugmentationConfig) -> bool {
        self.rotation_deg.abs() <= config.rotation_range
            && (self.scale - 1.0).abs() <= config.scale_range + 1e-6
            && self.tx.abs() <= config.translation_range
            && self.ty.abs() <= config.translation_range
    }
}

/// Seedable augmentation source
#[derive(Debug, Clone)]
pub struct Augmenter {
    config: AugmentationConfig,
    rng: StdRng,
}

impl Augmenter {
    /// Augmenter seeded from system entropy
    pub fn new(config: AugmentationConfig) -> GesturaResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            rng: StdRng::from_entropy(),
        })
    }

    /// Reproducible augmenter
    pub fn seeded(config: AugmentationConfig, seed: u64) -> GesturaResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            rng: StdRng::seed_from_u64(seed),
        })
    }

    pub fn config(&self) -> &AugmentationConfig {
        &self.config
    }

    /// Draw one transform within the configured ranges
    pub fn sample_transform(&mut self) -> AugmentTransform {
        let c = &self.config;
        AugmentTransform {
            rotation_deg: self.rng.gen_range(-c.rotation_range..=c.rotation_range),
            scale: 1.0 + self.rng.gen_range(-c.scale_range..=c.scale_range),
            tx: self.rng.gen_range(-c.translation_range..=c.translation_range),
            ty: self.rng.gen_range(-c.translation_range..=c.translation_range),
        }
    }

    /// Variants of one example, ids `<source>-aug<i>`; empty when disabled
    pub fn augment(&mut self, example: &GestureExample) -> Vec<GestureExample> {
        if !self.config.enabled {
            return Vec::new();
        }

        (0..VARIANTS_PER_EXAMPLE)
            .map(|i| {
                let transform = self.sample_transform();
                example.derive(example.id.augmented(i), transform.apply_frame(&example.frame))
            })
            .collect()
    }

    /// Variants of every example, grouped by source in input order
    pub fn augment_all(&mut self, examples: &[GestureExample]) -> Vec<GestureExample> {
        let variants: Vec<_> = examples.iter().flat_map(|e| self.augment(e)).collect();
        debug!(sources = examples.len(), variants = variants.len(), "augmented");
        variants
    }
}
