//! Training - Prototype learner and measured training loop
//!
//! The learner is learning vector quantisation over normalised landmark
//! vectors: one prototype per label, initialised to the label mean, pulled
//! toward its own examples and pushed away from examples it would steal.
//! Every number in a [`TrainingReport`] is measured on the data.
//!
//! Pipeline:
//! 1. Shuffle (seeded) and split into training / validation
//! 2. Augment the training part only
//! 3. Initialise prototypes, run `epochs` passes in `batch_size` chunks,
//!    checkpointing the learner whenever validation improves
//! 4. Restore the best checkpoint and evaluate per-label precision / recall / F1

use std::collections::BTreeMap;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use gestura_core::{CaptureTime, Frame, GestureError, GesturaResult, LANDMARK_COUNT};

use crate::{AugmentationConfig, Augmenter, DatasetStats, GestureDataset, GestureExample};

/// Length of a landmark feature vector
pub const FEATURE_LEN: usize = LANDMARK_COUNT * 3;

/// Training hyperparameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingConfig {
    pub epochs: usize,
    pub batch_size: usize,
    /// Fraction of examples held out for validation
    pub validation_split: f32,
    /// Prototype step size
    pub learning_rate: f32,
    pub augmentation: AugmentationConfig,
    pub seed: u64,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            epochs: 50,
            batch_size: 32,
            validation_split: 0.2,
            learning_rate: 0.001,
            augmentation: AugmentationConfig::default(),
            seed: 0,
        }
    }
}

impl TrainingConfig {
    /// Short run for smoke tests and previews
    pub fn quick() -> Self {
        Self {
            epochs: 5,
            learning_rate: 0.05,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> GesturaResult<()> {
        if self.epochs == 0 {
            return Err(GestureError::InvalidConfig("epochs must be at least 1".into()));
        }
        if self.batch_size == 0 {
            return Err(GestureError::InvalidConfig("batch_size must be at least 1".into()));
        }
        if !(0.0..1.0).contains(&self.validation_split) {
            return Err(GestureError::InvalidConfig(format!(
                "validation_split must be in [0, 1), got {}",
                self.validation_split
            )));
        }
        if !self.learning_rate.is_finite() || self.learning_rate <= 0.0 {
            return Err(GestureError::InvalidConfig(format!(
                "learning_rate must be positive, got {}",
                self.learning_rate
            )));
        }
        self.augmentation.validate()
    }
}

/// Centre landmarks on their centroid and scale into [-1, 1]
///
/// Non-finite coordinates become 0. Short frames are zero-padded.
pub fn feature_vector(frame: &Frame) -> Vec<f32> {
    let mut features = vec![0.0f32; FEATURE_LEN];
    for (i, l) in frame.landmarks.iter().take(LANDMARK_COUNT).enumerate() {
        for (k, v) in [l.x, l.y, l.z].into_iter().enumerate() {
            features[i * 3 + k] = if v.is_finite() { v } else { 0.0 };
        }
    }

    let n = frame.len().min(LANDMARK_COUNT);
    if n == 0 {
        return features;
    }
    for k in 0..3 {
        let mean = (0..n).map(|i| features[i * 3 + k]).sum::<f32>() / n as f32;
        for i in 0..n {
            features[i * 3 + k] -= mean;
        }
    }

    let max = features.iter().fold(0.0f32, |m, v| m.max(v.abs()));
    if max > 0.0 {
        for v in &mut features {
            *v /= max;
        }
    }
    features
}

fn euclidean(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f32>()
        .sqrt()
}

/// A model that can be fitted on labelled examples
pub trait GestureLearner {
    /// Reset internal state from the training examples
    fn initialize(&mut self, examples: &[GestureExample]);

    /// One pass over the batches; returns the mean training loss
    fn fit_epoch<'a, I>(&mut self, batches: I) -> f32
    where
        I: Iterator<Item = &'a [GestureExample]>;

    /// Predicted label, `None` before initialisation
    fn predict(&self, frame: &Frame) -> Option<String>;

    /// Distance from the frame to the label's prototype
    fn distance_to(&self, label: &str, frame: &Frame) -> Option<f32>;

    /// Loss of one example in [0, 1]
    fn loss(&self, example: &GestureExample) -> f32;
}

/// Learning vector quantisation with one prototype per label
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrototypeLearner {
    learning_rate: f32,
    prototypes: BTreeMap<String, Vec<f32>>,
}

impl PrototypeLearner {
    pub fn new(learning_rate: f32) -> Self {
        Self {
            learning_rate,
            prototypes: BTreeMap::new(),
        }
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.prototypes.keys().map(|k| k.as_str())
    }

    pub fn prototype(&self, label: &str) -> Option<&[f32]> {
        self.prototypes.get(label).map(|p| p.as_slice())
    }

    /// Nearest prototype to a feature vector, optionally skipping one label
    fn nearest(&self, features: &[f32], skip: Option<&str>) -> Option<(&str, f32)> {
        self.prototypes
            .iter()
            .filter(|(label, _)| Some(label.as_str()) != skip)
            .map(|(label, p)| (label.as_str(), euclidean(features, p)))
            .min_by(|a, b| a.1.total_cmp(&b.1))
    }

    /// Relative distance loss: 0 when the own prototype is much closer
    /// than any other, 1 when a wrong one sits on the example
    fn relative_loss(&self, features: &[f32], label: &str) -> f32 {
        let Some(own) = self.prototypes.get(label).map(|p| euclidean(features, p)) else {
            return 1.0;
        };
        let Some((_, other)) = self.nearest(features, Some(label)) else {
            return 0.0;
        };
        if own + other == 0.0 {
            return 0.5;
        }
        own / (own + other)
    }

    fn step(&mut self, example: &GestureExample) {
        let features = feature_vector(&example.frame);
        let rate = self.learning_rate;

        let own_distance = match self.prototypes.get_mut(&example.label) {
            Some(own) => {
                let d = euclidean(&features, own);
                for (w, x) in own.iter_mut().zip(&features) {
                    *w += rate * (x - *w);
                }
                d
            }
            None => {
                self.prototypes.insert(example.label.clone(), features);
                return;
            }
        };

        let rival = self
            .nearest(&features, Some(example.label.as_str()))
            .filter(|(_, d)| *d < own_distance)
            .map(|(label, _)| label.to_string());
        if let Some(rival) = rival.and_then(|label| self.prototypes.get_mut(&label)) {
            for (w, x) in rival.iter_mut().zip(&features) {
                *w -= rate * (x - *w);
            }
        }
    }
}

impl Default for PrototypeLearner {
    fn default() -> Self {
        Self::new(TrainingConfig::default().learning_rate)
    }
}

impl GestureLearner for PrototypeLearner {
    fn initialize(&mut self, examples: &[GestureExample]) {
        let mut sums: BTreeMap<String, (Vec<f32>, usize)> = BTreeMap::new();
        for example in examples {
            let entry = sums
                .entry(example.label.clone())
                .or_insert_with(|| (vec![0.0; FEATURE_LEN], 0));
            for (s, v) in entry.0.iter_mut().zip(feature_vector(&example.frame)) {
                *s += v;
            }
            entry.1 += 1;
        }

        self.prototypes = sums
            .into_iter()
            .map(|(label, (sum, count))| {
                let mean = sum.into_iter().map(|s| s / count as f32).collect();
                (label, mean)
            })
            .collect();
    }

    fn fit_epoch<'a, I>(&mut self, batches: I) -> f32
    where
        I: Iterator<Item = &'a [GestureExample]>,
    {
        let mut total = 0.0;
        let mut count = 0usize;
        for batch in batches {
            for example in batch {
                total += self.loss(example);
                count += 1;
                self.step(example);
            }
        }
        if count == 0 {
            0.0
        } else {
            total / count as f32
        }
    }

    fn predict(&self, frame: &Frame) -> Option<String> {
        self.nearest(&feature_vector(frame), None)
            .map(|(label, _)| label.to_string())
    }

    fn distance_to(&self, label: &str, frame: &Frame) -> Option<f32> {
        self.prototypes
            .get(label)
            .map(|p| euclidean(&feature_vector(frame), p))
    }

    fn loss(&self, example: &GestureExample) -> f32 {
        self.relative_loss(&feature_vector(&example.frame), &example.label)
    }
}

/// Measured metrics of one epoch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpochMetrics {
    /// 1-based epoch number
    pub epoch: usize,
    pub loss: f32,
    pub accuracy: f32,
    pub validation_loss: f32,
    pub validation_accuracy: f32,
}

/// Final evaluation on the held-out examples
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelPerformance {
    pub accuracy: f32,
    pub precision: BTreeMap<String, f32>,
    pub recall: BTreeMap<String, f32>,
    pub f1_score: BTreeMap<String, f32>,
}

/// Description of a trained model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelMetadata {
    pub version: String,
    pub trained_at: CaptureTime,
    pub dataset_stats: DatasetStats,
    pub performance: ModelPerformance,
    pub config: TrainingConfig,
}

/// A trained learner saved alongside its description
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainedModel<L = PrototypeLearner> {
    pub metadata: ModelMetadata,
    pub learner: L,
}

impl<L> TrainedModel<L>
where
    L: Serialize + DeserializeOwned,
{
    pub fn new(metadata: ModelMetadata, learner: L) -> Self {
        Self { metadata, learner }
    }

    pub fn to_json(&self) -> GesturaResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| GestureError::Serialization(e.to_string()))
    }

    pub fn from_json(json: &str) -> GesturaResult<Self> {
        serde_json::from_str(json).map_err(|e| GestureError::Serialization(e.to_string()))
    }
}

/// Outcome of [`Trainer::train`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingReport {
    pub history: Vec<EpochMetrics>,
    /// Epoch with the best validation accuracy (lowest loss on ties); the
    /// trainer's learner holds this epoch's state
    pub best_epoch: usize,
    pub metadata: ModelMetadata,
}

impl TrainingReport {
    pub fn best(&self) -> Option<&EpochMetrics> {
        self.history.iter().find(|m| m.epoch == self.best_epoch)
    }

    pub fn last(&self) -> Option<&EpochMetrics> {
        self.history.last()
    }
}

/// Runs a learner over a dataset
#[derive(Debug, Clone)]
pub struct Trainer<L = PrototypeLearner> {
    config: TrainingConfig,
    learner: L,
}

impl Trainer<PrototypeLearner> {
    pub fn new(config: TrainingConfig) -> Self {
        let learner = PrototypeLearner::new(config.learning_rate);
        Self { config, learner }
    }
}

impl<L: GestureLearner + Clone> Trainer<L> {
    pub fn with_learner(config: TrainingConfig, learner: L) -> Self {
        Self { config, learner }
    }

    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    pub fn learner(&self) -> &L {
        &self.learner
    }

    pub fn into_learner(self) -> L {
        self.learner
    }

    /// Pair the learner with the metadata of the report it produced
    pub fn into_model(self, report: &TrainingReport) -> TrainedModel<L> {
        TrainedModel {
            metadata: report.metadata.clone(),
            learner: self.learner,
        }
    }

    /// Fit the learner on the dataset and report measured metrics
    pub fn train(&mut self, dataset: &GestureDataset) -> GesturaResult<TrainingReport> {
        self.config.validate()?;

        let dataset_stats = dataset.stats();
        let mut examples = dataset.examples();
        if examples.is_empty() {
            return Err(GestureError::EmptyDataset);
        }

        let mut rng = StdRng::seed_from_u64(self.config.seed);
        examples.shuffle(&mut rng);

        let (mut training, validation) = split(examples, self.config.validation_split);
        if self.config.augmentation.enabled {
            let mut augmenter =
                Augmenter::seeded(self.config.augmentation.clone(), self.config.seed.wrapping_add(1))?;
            let variants = augmenter.augment_all(&training);
            training.extend(variants);
        }

        info!(
            training = training.len(),
            validation = validation.len(),
            classes = dataset_stats.class_count(),
            epochs = self.config.epochs,
            "training started"
        );

        // Too few examples to hold any out: validate on the training set
        let held_out = if validation.is_empty() {
            training.clone()
        } else {
            validation
        };

        self.learner.initialize(&training);

        let mut history: Vec<EpochMetrics> = Vec::with_capacity(self.config.epochs);
        let mut checkpoint: Option<(usize, L)> = None;
        for epoch in 1..=self.config.epochs {
            training.shuffle(&mut rng);
            let loss = self.learner.fit_epoch(training.chunks(self.config.batch_size));
            let accuracy = evaluate(&self.learner, &training).1;
            let (validation_loss, validation_accuracy) = evaluate(&self.learner, &held_out);

            debug!(epoch, loss, accuracy, validation_loss, validation_accuracy, "epoch");
            let metrics = EpochMetrics {
                epoch,
                loss,
                accuracy,
                validation_loss,
                validation_accuracy,
            };

            let best_so_far = checkpoint
                .as_ref()
                .and_then(|(best, _)| history.get(best - 1));
            if best_so_far.map_or(true, |best| improves(&metrics, best)) {
                debug!(epoch, validation_accuracy, "checkpoint");
                checkpoint = Some((epoch, self.learner.clone()));
            }
            history.push(metrics);
        }

        let best_epoch = match checkpoint {
            Some((epoch, learner)) => {
                self.learner = learner;
                epoch
            }
            None => 0,
        };
        let performance = performance(&self.learner, &held_out);
        info!(best_epoch, accuracy = performance.accuracy, "training finished");

        let trained_at = CaptureTime::now();
        Ok(TrainingReport {
            history,
            best_epoch,
            metadata: ModelMetadata {
                version: trained_at.as_millis().to_string(),
                trained_at,
                dataset_stats,
                performance,
                config: self.config.clone(),
            },
        })
    }
}

/// Training keeps at least one example
fn split(
    mut examples: Vec<GestureExample>,
    validation_split: f32,
) -> (Vec<GestureExample>, Vec<GestureExample>) {
    let n = examples.len();
    let train_len = ((n as f32 * (1.0 - validation_split)).floor() as usize).clamp(1, n);
    let validation = examples.split_off(train_len);
    (examples, validation)
}

/// Mean loss and accuracy over a set of examples
fn evaluate<L: GestureLearner>(learner: &L, examples: &[GestureExample]) -> (f32, f32) {
    if examples.is_empty() {
        return (0.0, 0.0);
    }
    let mut loss = 0.0;
    let mut correct = 0usize;
    for example in examples {
        loss += learner.loss(example);
        if learner.predict(&example.frame).as_deref() == Some(example.label.as_str()) {
            correct += 1;
        }
    }
    let n = examples.len() as f32;
    (loss / n, correct as f32 / n)
}

/// Higher validation accuracy wins; equal accuracy needs a lower loss
fn improves(candidate: &EpochMetrics, best: &EpochMetrics) -> bool {
    candidate.validation_accuracy > best.validation_accuracy
        || (candidate.validation_accuracy == best.validation_accuracy
            && candidate.validation_loss < best.validation_loss)
}


fn ratio(num: usize, den: usize) -> f32 {
    if den == 0 {
        0.0
    } else {
        num as f32 / den as f32
    }
}

/// Per-label precision, recall and F1
fn performance<L: GestureLearner>(learner: &L, examples: &[GestureExample]) -> ModelPerformance {
    // label -> (true positives, predicted, actual)
    let mut counts: BTreeMap<String, (usize, usize, usize)> = BTreeMap::new();
    let mut correct = 0usize;

    for example in examples {
        counts.entry(example.label.clone()).or_default().2 += 1;
        if let Some(predicted) = learner.predict(&example.frame) {
            let hit = predicted == example.label;
            let entry = counts.entry(predicted).or_default();
            entry.1 += 1;
            if hit {
                entry.0 += 1;
                correct += 1;
            }
        }
    }

    let mut performance = ModelPerformance {
        accuracy: ratio(correct, examples.len()),
        ..ModelPerformance::default()
    };
    for (label, (tp, predicted, actual)) in counts {
        let precision = ratio(tp, predicted);
        let recall = ratio(tp, actual);
        let f1 = if precision + recall > 0.0 {
            2.0 * precision * recall / (precision + recall)
        } else {
            0.0
        };
        performance.precision.insert(label.clone(), precision);
        performance.recall.insert(label.clone(), recall);
        performance.f1_score.insert(label, f1);
    }
    performance
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CaptureAnnotations;
    use gestura_core::HandLandmark;

    /// Two well separated shapes: a vertical and a horizontal line of points
    fn shape(vertical: bool, jitter: f32, millis: i64) -> Frame {
        let landmarks = (0..LANDMARK_COUNT)
            .map(|i| {
                let t = i as f32 * 10.0 + jitter;
                if vertical {
                    HandLandmark::new(100.0 + jitter, 100.0 + t, 0.0)
                } else {
                    HandLandmark::new(100.0 + t, 100.0 + jitter, 0.0)
                }
            })
            .collect();
        Frame::new(landmarks, CaptureTime::from_millis(millis))
    }

    fn separable_dataset(per_class: usize) -> GestureDataset {
        let dataset = GestureDataset::new();
        for i in 0..per_class {
            let jitter = (i % 5) as f32;
            dataset.add_example("pointer", shape(true, jitter, i as i64), "u1", CaptureAnnotations::default());
            dataset.add_example("stop", shape(false, jitter, i as i64), "u1", CaptureAnnotations::default());
        }
        dataset
    }

    #[test]
    fn test_feature_vector_is_normalised() {
        let f = feature_vector(&shape(true, 0.0, 0));
        assert_eq!(f.len(), FEATURE_LEN);
        let max = f.iter().fold(0.0f32, |m, v| m.max(v.abs()));
        assert!((max - 1.0).abs() < 1e-6);
        // Centred: x, y and z columns each sum to ~0
        for k in 0..3 {
            let sum: f32 = (0..LANDMARK_COUNT).map(|i| f[i * 3 + k]).sum();
            assert!(sum.abs() < 1e-4);
        }
    }

    #[test]
    fn test_feature_vector_is_translation_and_scale_invariant() {
        let a = shape(true, 0.0, 0);
        let moved = Frame::new(
            a.landmarks
                .iter()
                .map(|l| HandLandmark::new(l.x * 2.0 + 50.0, l.y * 2.0 - 30.0, l.z))
                .collect(),
            a.timestamp,
        );
        for (x, y) in feature_vector(&a).iter().zip(feature_vector(&moved)) {
            assert!((x - y).abs() < 1e-5);
        }
    }

    #[test]
    fn test_feature_vector_tolerates_bad_frames() {
        assert_eq!(feature_vector(&Frame::new(Vec::new(), CaptureTime::ZERO)), vec![0.0; FEATURE_LEN]);

        let mut landmarks = vec![HandLandmark::new(1.0, 2.0, 3.0); LANDMARK_COUNT];
        landmarks[4].x = f32::NAN;
        assert!(feature_vector(&Frame::new(landmarks, CaptureTime::ZERO))
            .iter()
            .all(|v| v.is_finite()));
    }

    #[test]
    fn test_prototypes_start_at_class_means() {
        let dataset = separable_dataset(4);
        let mut learner = PrototypeLearner::default();
        learner.initialize(&dataset.examples());

        assert_eq!(learner.labels().collect::<Vec<_>>(), vec!["pointer", "stop"]);
        assert_eq!(learner.predict(&shape(true, 2.0, 0)).as_deref(), Some("pointer"));
        assert_eq!(learner.predict(&shape(false, 2.0, 0)).as_deref(), Some("stop"));

        let near = learner.distance_to("pointer", &shape(true, 1.0, 0)).unwrap();
        let far = learner.distance_to("stop", &shape(true, 1.0, 0)).unwrap();
        assert!(near < far);
        assert!(learner.distance_to("wave", &shape(true, 1.0, 0)).is_none());
    }

    #[test]
    fn test_uninitialised_learner_predicts_nothing() {
        let learner = PrototypeLearner::default();
        assert_eq!(learner.predict(&shape(true, 0.0, 0)), None);
    }

    #[test]
    fn test_train_on_separable_data() {
        let dataset = separable_dataset(10);
        let mut trainer = Trainer::new(TrainingConfig::quick());
        let report = trainer.train(&dataset).unwrap();

        assert_eq!(report.history.len(), 5);
        assert_eq!(report.history[0].epoch, 1);
        assert!((1..=5).contains(&report.best_epoch));
        assert_eq!(report.best().map(|m| m.epoch), Some(report.best_epoch));

        let last = report.last().unwrap();
        assert_eq!(last.accuracy, 1.0);
        assert_eq!(last.validation_accuracy, 1.0);
        assert!(last.loss < 0.5);
        assert_eq!(report.metadata.performance.accuracy, 1.0);
        let f1 = &report.metadata.performance.f1_score;
        assert!(!f1.is_empty());
        assert!(f1.values().all(|v| *v == 1.0));
        assert_eq!(report.metadata.dataset_stats.total_examples, 20);
    }

    #[test]
    fn test_training_is_reproducible() {
        let dataset = separable_dataset(6);
        let config = TrainingConfig {
            epochs: 3,
            ..TrainingConfig::default()
        };
        let a = Trainer::new(config.clone()).train(&dataset).unwrap();
        let b = Trainer::new(config).train(&dataset).unwrap();
        assert_eq!(a.history, b.history);
    }

    #[test]
    fn test_empty_dataset_is_an_error() {
        let result = Trainer::new(TrainingConfig::default()).train(&GestureDataset::new());
        assert_eq!(result.unwrap_err(), GestureError::EmptyDataset);
    }

    #[test]
    fn test_single_example_trains_and_validates_on_itself() {
        let dataset = GestureDataset::new();
        dataset.add_example("draw", shape(true, 0.0, 0), "u1", CaptureAnnotations::default());
        let config = TrainingConfig {
            epochs: 2,
            augmentation: AugmentationConfig::disabled(),
            ..TrainingConfig::default()
        };
        let report = Trainer::new(config).train(&dataset).unwrap();
        assert_eq!(report.history.len(), 2);
        assert_eq!(report.last().unwrap().validation_accuracy, 1.0);
    }

    #[test]
    fn test_invalid_config() {
        let dataset = separable_dataset(1);
        for config in [
            TrainingConfig { epochs: 0, ..TrainingConfig::default() },
            TrainingConfig { batch_size: 0, ..TrainingConfig::default() },
            TrainingConfig { validation_split: 1.0, ..TrainingConfig::default() },
            TrainingConfig { learning_rate: -1.0, ..TrainingConfig::default() },
        ] {
            assert!(matches!(
                Trainer::new(config).train(&dataset),
                Err(GestureError::InvalidConfig(_))
            ));
        }
    }

    #[test]
    fn test_split_keeps_training_nonempty() {
        let dataset = separable_dataset(5);
        let (train, val) = split(dataset.examples(), 0.2);
        assert_eq!((train.len(), val.len()), (8, 2));

        let (train, val) = split(dataset.examples().into_iter().take(1).collect(), 0.5);
        assert_eq!((train.len(), val.len()), (1, 0));
    }

    #[test]
    fn test_best_epoch_prefers_accuracy_then_loss() {
        let m = |epoch, validation_loss, validation_accuracy| EpochMetrics {
            epoch,
            loss: 0.0,
            accuracy: 0.0,
            validation_loss,
            validation_accuracy,
        };
        assert!(improves(&m(2, 0.3, 0.9), &m(1, 0.4, 0.5)));
        assert!(improves(&m(3, 0.2, 0.9), &m(2, 0.3, 0.9)));
        assert!(!improves(&m(4, 0.1, 0.8), &m(3, 0.2, 0.9)));
        // A tie keeps the earlier epoch
        assert!(!improves(&m(5, 0.2, 0.9), &m(3, 0.2, 0.9)));
    }

    /// Mean prototypes that forget everything after `good_epochs`
    #[derive(Debug, Clone)]
    struct FadingLearner {
        inner: PrototypeLearner,
        epochs_run: usize,
        good_epochs: usize,
    }

    impl FadingLearner {
        fn sharp(&self) -> bool {
            self.epochs_run <= self.good_epochs
        }
    }

    impl GestureLearner for FadingLearner {
        fn initialize(&mut self, examples: &[GestureExample]) {
            self.inner.initialize(examples);
            self.epochs_run = 0;
        }

        fn fit_epoch<'a, I>(&mut self, batches: I) -> f32
        where
            I: Iterator<Item = &'a [GestureExample]>,
        {
            batches.for_each(drop);
            self.epochs_run += 1;
            0.0
        }

        fn predict(&self, frame: &Frame) -> Option<String> {
            if self.sharp() {
                self.inner.predict(frame)
            } else {
                Some("wave".to_string())
            }
        }

        fn distance_to(&self, label: &str, frame: &Frame) -> Option<f32> {
            self.inner.distance_to(label, frame)
        }

        fn loss(&self, example: &GestureExample) -> f32 {
            if self.sharp() {
                self.inner.loss(example)
            } else {
                1.0
            }
        }
    }

    #[test]
    fn test_best_epoch_is_restored_after_regression() {
        let config = TrainingConfig {
            augmentation: AugmentationConfig::disabled(),
            ..TrainingConfig::quick()
        };
        let learner = FadingLearner {
            inner: PrototypeLearner::default(),
            epochs_run: 0,
            good_epochs: 2,
        };
        let mut trainer = Trainer::with_learner(config, learner);
        let report = trainer.train(&separable_dataset(10)).unwrap();

        assert_eq!(report.last().unwrap().validation_accuracy, 0.0);
        assert_eq!(report.best_epoch, 1);
        assert_eq!(report.best().unwrap().validation_accuracy, 1.0);

        // The learner left behind is the checkpoint, not the last epoch
        assert_eq!(trainer.learner().epochs_run, report.best_epoch);
        assert_eq!(report.metadata.performance.accuracy, 1.0);
        assert_eq!(
            trainer.learner().predict(&shape(true, 2.0, 0)).as_deref(),
            Some("pointer")
        );
    }

    #[test]
    fn test_trained_model_round_trips() {
        let dataset = separable_dataset(5);
        let mut trainer = Trainer::new(TrainingConfig::quick());
        let report = trainer.train(&dataset).unwrap();
        let model = trainer.into_model(&report);

        let json = model.to_json().unwrap();
        let back: TrainedModel = TrainedModel::from_json(&json).unwrap();
        assert_eq!(back, model);
        assert_eq!(
            back.learner.predict(&shape(false, 1.0, 0)).as_deref(),
            Some("stop")
        );

        assert!(matches!(
            TrainedModel::<PrototypeLearner>::from_json("{"),
            Err(GestureError::Serialization(_))
        ));
    }

    #[test]
    fn test_report_serializes() {
        let report = Trainer::new(TrainingConfig::quick())
            .train(&separable_dataset(3))
            .unwrap();
        let json = serde_json::to_string(&report.metadata).unwrap();
        assert!(json.contains("\"f1_score\""));
        let back: ModelMetadata = serde_json::from_str(&json).unwrap();
        assert_eq!(back, report.metadata);
    }
}
