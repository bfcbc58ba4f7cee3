//! Example collection - Recorded examples with derived statistics
//!
//! Statistics are never stored apart from the examples they describe: every
//! mutation recomputes them under the same write lock, so a reader always
//! sees `total_examples == examples.len()`.

use std::collections::{BTreeMap, HashSet};

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use gestura_core::{CaptureTime, ExampleId, Frame, GestureError, GesturaResult, UserId};

use crate::{
    calculate_quality, export_examples, parse_structured, CaptureAnnotations, ExampleMetadata,
    ExportFormat, GestureExample,
};

/// Aggregate view over the collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetStats {
    pub total_examples: usize,
    pub examples_per_class: BTreeMap<String, usize>,
    /// Mean quality, 0 for an empty collection
    pub average_quality: f32,
    pub last_updated: CaptureTime,
}

impl Default for DatasetStats {
    fn default() -> Self {
        Self {
            total_examples: 0,
            examples_per_class: BTreeMap::new(),
            average_quality: 0.0,
            last_updated: CaptureTime::ZERO,
        }
    }
}

impl DatasetStats {
    /// Compute statistics for a set of examples
    pub fn compute(examples: &[GestureExample], now: CaptureTime) -> Self {
        let mut examples_per_class = BTreeMap::new();
        let mut quality_sum = 0.0f64;
        for example in examples {
            *examples_per_class.entry(example.label.clone()).or_insert(0) += 1;
            quality_sum += example.metadata.quality as f64;
        }

        let average_quality = if examples.is_empty() {
            0.0
        } else {
            (quality_sum / examples.len() as f64) as f32
        };

        Self {
            total_examples: examples.len(),
            examples_per_class,
            average_quality,
            last_updated: now,
        }
    }

    /// Number of distinct labels
    pub fn class_count(&self) -> usize {
        self.examples_per_class.len()
    }
}

#[derive(Debug, Default)]
struct DatasetInner {
    examples: Vec<GestureExample>,
    ids: HashSet<ExampleId>,
    stats: DatasetStats,
    next_seq: u64,
}

impl DatasetInner {
    fn refresh(&mut self) {
        self.stats = DatasetStats::compute(&self.examples, CaptureTime::now());
    }

    fn next_id(&mut self, captured_at: CaptureTime) -> ExampleId {
        loop {
            self.next_seq += 1;
            let id = ExampleId::from_capture(captured_at, self.next_seq);
            if !self.ids.contains(&id) {
                return id;
            }
        }
    }

    fn push(&mut self, example: GestureExample) {
        self.ids.insert(example.id.clone());
        self.examples.push(example);
    }
}

/// Thread-safe collection of recorded examples
#[derive(Debug, Default)]
pub struct GestureDataset {
    inner: RwLock<DatasetInner>,
}

impl GestureDataset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Score, store and index one example; returns its new id
    pub fn add_example(
        &self,
        label: impl Into<String>,
        frame: Frame,
        user_id: impl Into<UserId>,
        annotations: CaptureAnnotations,
    ) -> ExampleId {
        let label = label.into();
        let quality = calculate_quality(&frame);
        let captured_at = frame.timestamp;

        let mut inner = self.inner.write();
        let id = inner.next_id(captured_at);
        let example = GestureExample {
            id: id.clone(),
            label,
            frame,
            metadata: ExampleMetadata {
                user_id: user_id.into(),
                captured_at,
                lighting: annotations.lighting,
                distance: annotations.distance,
                quality,
            },
        };
        debug!(id = %example.id, label = %example.label, quality, "example added");
        inner.push(example);
        inner.refresh();
        id
    }

    /// Store an already-built example (augmented copies, imports)
    pub fn insert_example(&self, example: GestureExample) -> GesturaResult<()> {
        let mut inner = self.inner.write();
        if inner.ids.contains(&example.id) {
            return Err(GestureError::DuplicateExample(example.id.to_string()));
        }
        inner.push(example);
        inner.refresh();
        Ok(())
    }

    /// Remove by id; `false` if there was no such example
    pub fn remove_example(&self, id: &ExampleId) -> bool {
        let mut inner = self.inner.write();
        if !inner.ids.remove(id) {
            return false;
        }
        inner.examples.retain(|e| &e.id != id);
        inner.refresh();
        debug!(%id, "example removed");
        true
    }

    pub fn get(&self, id: &ExampleId) -> Option<GestureExample> {
        self.inner.read().examples.iter().find(|e| &e.id == id).cloned()
    }

    /// Examples with the label, in insertion order
    pub fn examples_by_label(&self, label: &str) -> Vec<GestureExample> {
        self.inner
            .read()
            .examples
            .iter()
            .filter(|e| e.label == label)
            .cloned()
            .collect()
    }

    /// Examples from one contributor, in insertion order
    pub fn examples_by_user(&self, user_id: &UserId) -> Vec<GestureExample> {
        self.inner
            .read()
            .examples
            .iter()
            .filter(|e| &e.metadata.user_id == user_id)
            .cloned()
            .collect()
    }

    /// Snapshot of every example, in insertion order
    pub fn examples(&self) -> Vec<GestureExample> {
        self.inner.read().examples.clone()
    }

    pub fn stats(&self) -> DatasetStats {
        self.inner.read().stats.clone()
    }

    pub fn len(&self) -> usize {
        self.inner.read().examples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().examples.is_empty()
    }

    /// Serialize the whole collection
    pub fn export(&self, format: ExportFormat) -> GesturaResult<String> {
        let inner = self.inner.read();
        export_examples(&inner.examples, format)
    }

    /// Append examples from a structured export
    ///
    /// All-or-nothing: if any id already exists (or repeats within the
    /// input) nothing is appended.
    pub fn import_structured(&self, json: &str) -> GesturaResult<usize> {
        let incoming = parse_structured(json)?;

        let mut inner = self.inner.write();
        let mut seen = HashSet::with_capacity(incoming.len());
        for example in &incoming {
            if inner.ids.contains(&example.id) || !seen.insert(&example.id) {
                return Err(GestureError::DuplicateExample(example.id.to_string()));
            }
        }

        let count = incoming.len();
        for example in incoming {
            inner.push(example);
        }
        inner.refresh();
        info!(count, total = inner.examples.len(), "examples imported");
        Ok(count)
    }
}
