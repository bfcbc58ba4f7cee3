//! Dataset Fuzzer - Randomized mutation of a gesture collection
//!
//! Checks after every operation:
//! - Statistics agree with the stored examples
//! - Per-class counts agree with an independent model
//! - Recorded quality matches the frame it was scored from
//! - Duplicate ids are always rejected
//!
//! and once at the end:
//! - Tabular export has one row per example
//! - Structured export re-imports into an identical collection

use std::collections::BTreeMap;

use gestura_core::{ExampleId, Frame, GesturaResult, GestureError};
use gestura_dataset::{
    calculate_quality, AugmentationConfig, Augmenter, CaptureAnnotations, ExportFormat,
    GestureDataset,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::HandSynth;

/// Fuzzer configuration
#[derive(Clone, Debug)]
pub struct DatasetFuzzConfig {
    /// Operations to perform
    pub operations: usize,
    /// Probability an added frame is damaged
    pub corrupt_prob: f64,
    /// Probability an operation removes an example
    pub remove_prob: f64,
    /// Probability an operation inserts augmented copies
    pub augment_prob: f64,
    /// Distinct contributors
    pub users: usize,
    /// Random seed
    pub seed: u64,
}

impl Default for DatasetFuzzConfig {
    fn default() -> Self {
        DatasetFuzzConfig {
            operations: 500,
            corrupt_prob: 0.1,
            remove_prob: 0.2,
            augment_prob: 0.1,
            users: 4,
            seed: 42,
        }
    }
}

impl DatasetFuzzConfig {
    /// Light fuzzing for quick tests
    pub fn light() -> Self {
        DatasetFuzzConfig {
            operations: 100,
            corrupt_prob: 0.05,
            remove_prob: 0.1,
            augment_prob: 0.05,
            users: 2,
            seed: 42,
        }
    }

    /// Heavy fuzzing for thorough testing
    pub fn heavy() -> Self {
        DatasetFuzzConfig {
            operations: 5000,
            corrupt_prob: 0.3,
            remove_prob: 0.3,
            augment_prob: 0.2,
            users: 16,
            seed: 42,
        }
    }
}

/// Ways an added frame can be damaged
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Corruption {
    /// Fewer landmarks than a hand has
    Truncated,
    /// One landmark pushed far off the hand plane
    DepthSpike,
    /// One coordinate is NaN
    NonFinite,
}

/// Fuzzing result
#[derive(Debug, Default)]
pub struct DatasetFuzzResult {
    pub adds: usize,
    pub corrupted: usize,
    pub removes: usize,
    pub missing_removes: usize,
    pub augmented: usize,
    pub duplicate_rejections: usize,
    pub final_len: usize,
    /// Structured round trip was skipped because an example holds NaN
    pub roundtrip_skipped: bool,
    pub violations: Vec<String>,
}

impl DatasetFuzzResult {
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }
}

/// Dataset fuzzer
pub struct DatasetFuzzer {
    config: DatasetFuzzConfig,
    dataset: GestureDataset,
    /// Independent record of what the dataset should hold
    model: BTreeMap<ExampleId, String>,
    rng: StdRng,
    synth: HandSynth,
    augmenter: Augmenter,
    clock_ms: i64,
}

impl DatasetFuzzer {
    /// Create a new fuzzer
    pub fn new(config: DatasetFuzzConfig) -> GesturaResult<Self> {
        let rng = StdRng::seed_from_u64(config.seed);
        let synth = HandSynth::seeded(config.seed.wrapping_add(1));
        let augmenter = Augmenter::seeded(AugmentationConfig::default(), config.seed.wrapping_add(2))?;

        Ok(DatasetFuzzer {
            config,
            dataset: GestureDataset::new(),
            model: BTreeMap::new(),
            rng,
            synth,
            augmenter,
            clock_ms: 0,
        })
    }

    pub fn dataset(&self) -> &GestureDataset {
        &self.dataset
    }

    /// Run the fuzzer
    pub fn run(&mut self) -> DatasetFuzzResult {
        let mut result = DatasetFuzzResult::default();

        for op in 0..self.config.operations {
            self.clock_ms += 33;
            let roll: f64 = self.rng.gen();

            if roll < self.config.remove_prob {
                self.remove(&mut result);
            } else if roll < self.config.remove_prob + self.config.augment_prob {
                self.augment(&mut result);
            } else {
                self.add(&mut result);
            }

            self.check_stats(op, &mut result);
        }

        result.final_len = self.dataset.len();
        self.check_exports(&mut result);
        result
    }

    fn add(&mut self, result: &mut DatasetFuzzResult) {
        let (label, mut frame) = self.synth.random_labelled(self.clock_ms);
        if self.rng.gen::<f64>() < self.config.corrupt_prob {
            let corruption = match self.rng.gen_range(0..3) {
                0 => Corruption::Truncated,
                1 => Corruption::DepthSpike,
                _ => Corruption::NonFinite,
            };
            self.corrupt(&mut frame, corruption);
            result.corrupted += 1;
        }

        let user = format!("user-{}", self.rng.gen_range(0..self.config.users.max(1)));
        let id = self
            .dataset
            .add_example(label.name(), frame, user.as_str(), CaptureAnnotations::default());

        if self.model.insert(id.clone(), label.name().to_string()).is_some() {
            result.violations.push(format!("add reused id {id}"));
        }
        result.adds += 1;
    }

    fn corrupt(&mut self, frame: &mut Frame, corruption: Corruption) {
        match corruption {
            Corruption::Truncated => {
                let keep = self.rng.gen_range(0..frame.landmarks.len());
                frame.landmarks.truncate(keep);
            }
            Corruption::DepthSpike => {
                let i = self.rng.gen_range(0..frame.landmarks.len());
                frame.landmarks[i].z += 50.0;
            }
            Corruption::NonFinite => {
                let i = self.rng.gen_range(0..frame.landmarks.len());
                frame.landmarks[i].x = f32::NAN;
            }
        }
    }

    fn remove(&mut self, result: &mut DatasetFuzzResult) {
        let target = if self.model.is_empty() || self.rng.gen_bool(0.1) {
            None
        } else {
            let i = self.rng.gen_range(0..self.model.len());
            self.model.keys().nth(i).cloned()
        };

        match target {
            Some(id) => {
                if !self.dataset.remove_example(&id) {
                    result.violations.push(format!("remove of live id {id} failed"));
                }
                self.model.remove(&id);
                result.removes += 1;
            }
            None => {
                let ghost = ExampleId::new(format!("missing-{}", self.clock_ms));
                if self.dataset.remove_example(&ghost) {
                    result.violations.push(format!("removed unknown id {ghost}"));
                }
                result.missing_removes += 1;
            }
        }
    }

    fn augment(&mut self, result: &mut DatasetFuzzResult) {
        if self.model.is_empty() {
            return;
        }
        let i = self.rng.gen_range(0..self.model.len());
        let Some(source) = self.model.keys().nth(i).and_then(|id| self.dataset.get(id)) else {
            result.violations.push("model id missing from dataset".to_string());
            return;
        };

        for variant in self.augmenter.augment(&source) {
            let id = variant.id.clone();
            let label = variant.label.clone();
            let known = self.model.contains_key(&id);

            match self.dataset.insert_example(variant) {
                Ok(()) if known => {
                    result.violations.push(format!("duplicate {id} accepted"));
                }
                Ok(()) => {
                    self.model.insert(id, label);
                    result.augmented += 1;
                }
                Err(GestureError::DuplicateExample(_)) if known => {
                    result.duplicate_rejections += 1;
                }
                Err(e) => {
                    result.violations.push(format!("insert of {id} failed: {e}"));
                }
            }
        }
    }

    fn check_stats(&self, op: usize, result: &mut DatasetFuzzResult) {
        let stats = self.dataset.stats();
        let examples = self.dataset.examples();

        if stats.total_examples != examples.len() || examples.len() != self.model.len() {
            result.violations.push(format!(
                "op {op}: total {} vs stored {} vs model {}",
                stats.total_examples,
                examples.len(),
                self.model.len()
            ));
        }

        let mut expected: BTreeMap<String, usize> = BTreeMap::new();
        for label in self.model.values() {
            *expected.entry(label.clone()).or_default() += 1;
        }
        if stats.examples_per_class != expected {
            result.violations.push(format!("op {op}: per-class counts diverged"));
        }

        let mean = if examples.is_empty() {
            0.0
        } else {
            let sum: f64 = examples.iter().map(|e| e.metadata.quality as f64).sum();
            (sum / examples.len() as f64) as f32
        };
        if (stats.average_quality - mean).abs() > 1e-4 || !(0.0..=1.0).contains(&stats.average_quality) {
            result.violations.push(format!(
                "op {op}: average quality {} expected {mean}",
                stats.average_quality
            ));
        }

        // Augmented copies carry their source's score
        for example in examples.iter().filter(|e| !e.id.is_augmented()) {
            let quality = calculate_quality(&example.frame);
            if (quality - example.metadata.quality).abs() > f32::EPSILON {
                result.violations.push(format!(
                    "op {op}: {} scored {} but frame gives {quality}",
                    example.id, example.metadata.quality
                ));
            }
        }
    }

    fn check_exports(&self, result: &mut DatasetFuzzResult) {
        match self.dataset.export(ExportFormat::Tabular) {
            Ok(csv) if csv.lines().count() == self.dataset.len() + 1 => {}
            Ok(csv) => result.violations.push(format!(
                "tabular export has {} lines for {} examples",
                csv.lines().count(),
                self.dataset.len()
            )),
            Err(e) => result.violations.push(format!("tabular export failed: {e}")),
        }

        let examples = self.dataset.examples();
        if examples.iter().any(|e| e.frame.has_non_finite()) {
            result.roundtrip_skipped = true;
            return;
        }

        let json = match self.dataset.export(ExportFormat::Structured) {
            Ok(json) => json,
            Err(e) => {
                result.violations.push(format!("structured export failed: {e}"));
                return;
            }
        };

        let mirror = GestureDataset::new();
        match mirror.import_structured(&json) {
            Ok(count) if count == examples.len() && mirror.examples() == examples => {}
            Ok(_) => result.violations.push("structured round trip changed the examples".to_string()),
            Err(e) => result.violations.push(format!("structured import failed: {e}")),
        }
        if mirror.import_structured(&json).is_ok() && !examples.is_empty() {
            result.violations.push("re-import of the same export was accepted".to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_light_fuzz() {
        let result = DatasetFuzzer::new(DatasetFuzzConfig::light()).unwrap().run();
        assert!(result.is_valid(), "{:?}", result.violations);
        assert!(result.adds > 0);
        assert!(result.final_len <= result.adds + result.augmented);
    }

    #[test]
    fn test_default_fuzz() {
        let result = DatasetFuzzer::new(DatasetFuzzConfig::default()).unwrap().run();
        assert!(result.is_valid(), "{:?}", result.violations);
        assert!(result.corrupted > 0);
        assert!(result.removes > 0);
    }

    #[test]
    fn test_clean_run_round_trips() {
        let config = DatasetFuzzConfig {
            corrupt_prob: 0.0,
            ..DatasetFuzzConfig::light()
        };
        let result = DatasetFuzzer::new(config).unwrap().run();
        assert!(result.is_valid(), "{:?}", result.violations);
        assert!(!result.roundtrip_skipped);
    }

    #[test]
    fn test_final_len_matches_operations() {
        let config = DatasetFuzzConfig {
            augment_prob: 0.0,
            ..DatasetFuzzConfig::default()
        };
        let result = DatasetFuzzer::new(config).unwrap().run();
        assert!(result.is_valid(), "{:?}", result.violations);
        assert_eq!(result.final_len, result.adds - result.removes);
    }

    #[test]
    fn test_same_seed_same_run() {
        let a = DatasetFuzzer::new(DatasetFuzzConfig::light()).unwrap().run();
        let b = DatasetFuzzer::new(DatasetFuzzConfig::light()).unwrap().run();
        assert_eq!(a.adds, b.adds);
        assert_eq!(a.removes, b.removes);
        assert_eq!(a.final_len, b.final_len);
    }
}
