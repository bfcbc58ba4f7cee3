//! Recognition session - Lifecycle, buffering and emission policy

use std::collections::VecDeque;

use serde::Serialize;
use tracing::{debug, info, warn};

use gestura_core::{
    CaptureTime, Frame, GesturaResult, GestureLabel, GestureMetadata, GestureResult, HandLandmark,
    INDEX_TIP, LANDMARK_COUNT,
};
use gestura_vision::{FrameClassifier, SequenceClassifier, Sensitivity};

use crate::SessionConfig;

/// Session lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// Classifiers not built yet
    Unloaded,
    Ready,
    /// Last health check failed; reloads on next use
    Degraded,
}

/// A gesture that passed the emission policy
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GestureEvent {
    pub gesture: GestureLabel,
    pub confidence: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<GestureMetadata>,
    /// Timestamp of the frame that completed the gesture
    pub timestamp: CaptureTime,
    pub from_sequence: bool,
}

/// Outcome of a health check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HealthReport {
    pub healthy: bool,
    pub state: SessionState,
    pub checked_at: CaptureTime,
}

/// Session counters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SessionStats {
    pub frames_processed: u64,
    /// Frames without a full hand
    pub frames_rejected: u64,
    pub gestures_emitted: u64,
    pub sequence_hits: u64,
    /// Detected gestures held back by the emission policy
    pub suppressed: u64,
}

/// Canonical probe: every landmark at the origin except the index tip at
/// (100, -50)
///
/// The tip stays under the extension threshold at default sensitivity, so
/// the probe reads as a fist (`stop`).
pub fn probe_frame(timestamp: CaptureTime) -> Frame {
    let mut landmarks = vec![HandLandmark::zero(); LANDMARK_COUNT];
    landmarks[INDEX_TIP] = HandLandmark::new(100.0, -50.0, 0.0);
    Frame::new(landmarks, timestamp)
}

/// Live recognition session
///
/// Owned by the caller and driven with `&mut self`; all timing decisions
/// use frame timestamps, never the wall clock.
#[derive(Debug)]
pub struct RecognitionSession {
    config: SessionConfig,
    sensitivity: Sensitivity,
    classifier: SequenceClassifier,
    state: SessionState,
    /// Rolling buffer for sequence classification, oldest first
    buffer: VecDeque<Frame>,
    /// Emitted events, newest first
    history: VecDeque<GestureEvent>,
    /// Label currently held and when it was first seen
    held: Option<(GestureLabel, CaptureTime)>,
    last_emitted_at: Option<CaptureTime>,
    last_health_check: Option<CaptureTime>,
    stats: SessionStats,
}

impl Default for RecognitionSession {
    fn default() -> Self {
        Self::build(SessionConfig::default(), Sensitivity::DEFAULT)
    }
}

impl RecognitionSession {
    /// Create an unloaded session
    pub fn new(config: SessionConfig) -> GesturaResult<Self> {
        config.validate()?;
        let sensitivity = config.sensitivity()?;
        Ok(Self::build(config, sensitivity))
    }

    fn build(config: SessionConfig, sensitivity: Sensitivity) -> Self {
        Self {
            buffer: VecDeque::with_capacity(config.sequence_window),
            history: VecDeque::with_capacity(config.history_limit),
            config,
            sensitivity,
            classifier: SequenceClassifier::new(FrameClassifier::new(sensitivity)),
            state: SessionState::Unloaded,
            held: None,
            last_emitted_at: None,
            last_health_check: None,
            stats: SessionStats::default(),
        }
    }

    /// Build the classifiers and become ready
    pub fn load(&mut self) {
        self.classifier = SequenceClassifier::new(FrameClassifier::new(self.sensitivity));
        self.buffer.clear();
        self.held = None;
        self.state = SessionState::Ready;
        info!(sensitivity = self.sensitivity.value(), "recognition session loaded");
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    /// Emitted events, newest first
    pub fn history(&self) -> &VecDeque<GestureEvent> {
        &self.history
    }

    pub fn last_event(&self) -> Option<&GestureEvent> {
        self.history.front()
    }

    pub fn sensitivity(&self) -> Sensitivity {
        self.sensitivity
    }

    /// Change sensitivity; takes effect on the next frame
    pub fn set_sensitivity(&mut self, sensitivity: Sensitivity) {
        self.sensitivity = sensitivity;
        self.config.sensitivity = sensitivity.value();
        self.classifier.frame_classifier_mut().set_sensitivity(sensitivity);
    }

    /// Frames currently buffered for sequence classification
    pub fn buffered_frames(&self) -> usize {
        self.buffer.len()
    }

    /// Drop buffered frames, e.g. on a mode change
    pub fn clear_sequence(&mut self) {
        self.buffer.clear();
        self.held = None;
    }

    /// Is a health check due at `now`?
    pub fn health_check_due(&self, now: CaptureTime) -> bool {
        match self.last_health_check {
            Some(last) => now.since(last) >= self.config.health_check_interval(),
            None => true,
        }
    }

    /// Run the canonical probe through the classifier
    pub fn health_check(&mut self, now: CaptureTime) -> HealthReport {
        self.health_check_with(&probe_frame(now), now)
    }

    /// Health check with a caller-supplied probe
    ///
    /// Healthy when the probe yields any gesture. A failing probe leaves the
    /// session `Degraded` until it is loaded again.
    pub fn health_check_with(&mut self, probe: &Frame, now: CaptureTime) -> HealthReport {
        if self.state != SessionState::Ready {
            warn!(state = ?self.state, "session not ready, reloading before health check");
            self.load();
        }

        let healthy = self.classifier.frame_classifier().classify(probe).is_detected();
        if !healthy {
            warn!("health check probe produced no gesture");
            self.state = SessionState::Degraded;
        }
        self.last_health_check = Some(now);

        HealthReport {
            healthy,
            state: self.state,
            checked_at: now,
        }
    }

    /// Feed one frame; returns an event when a gesture passes the policy
    pub fn process_frame(&mut self, frame: Frame) -> Option<GestureEvent> {
        if self.state != SessionState::Ready {
            self.load();
        }
        self.stats.frames_processed += 1;

        if !frame.is_complete() {
            self.stats.frames_rejected += 1;
            self.held = None;
            warn!(landmarks = frame.len(), "frame rejected: incomplete hand");
            return None;
        }

        let now = frame.timestamp;
        let single = self.classifier.frame_classifier().classify(&frame);

        self.buffer.push_back(frame);
        while self.buffer.len() > self.config.sequence_window {
            self.buffer.pop_front();
        }
        let sequence = self.classifier.classify(self.buffer.make_contiguous());

        let (result, from_sequence) = if sequence.is_detected() {
            self.stats.sequence_hits += 1;
            self.buffer.clear();
            self.held = None;
            (sequence, true)
        } else {
            (single, false)
        };

        let Some(gesture) = result.gesture else {
            self.held = None;
            return None;
        };

        let held_since = if from_sequence {
            now
        } else {
            match self.held {
                Some((label, since)) if label == gesture => since,
                _ => {
                    self.held = Some((gesture, now));
                    now
                }
            }
        };

        if !self.passes_policy(&result, from_sequence, held_since, now) {
            self.stats.suppressed += 1;
            return None;
        }

        let event = GestureEvent {
            gesture,
            confidence: result.confidence,
            metadata: result.metadata,
            timestamp: now,
            from_sequence,
        };
        self.record(event.clone());
        Some(event)
    }

    fn passes_policy(
        &self,
        result: &GestureResult,
        from_sequence: bool,
        held_since: CaptureTime,
        now: CaptureTime,
    ) -> bool {
        if result.confidence <= self.config.min_confidence {
            debug!(gesture = ?result.gesture, confidence = result.confidence, "below confidence threshold");
            return false;
        }
        if !from_sequence && now.since(held_since) < self.config.hold_time() {
            return false;
        }
        if let Some(last) = self.last_emitted_at {
            if now.since(last) < self.config.cooldown() {
                debug!(gesture = ?result.gesture, "cooling down");
                return false;
            }
        }
        true
    }

    fn record(&mut self, event: GestureEvent) {
        info!(
            gesture = %event.gesture,
            confidence = event.confidence,
            sequence = event.from_sequence,
            "gesture emitted"
        );
        self.last_emitted_at = Some(event.timestamp);
        self.stats.gestures_emitted += 1;
        self.history.push_front(event);
        self.history.truncate(self.config.history_limit);
    }
}
