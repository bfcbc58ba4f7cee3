//! End-to-end Scenario Suite
//!
//! Drives a recognition session with scripted synthetic hands and checks:
//! - Presentation gestures reach the caller in order
//! - Hold time and cooldown gate repeated emissions
//! - Sequence gestures win over the frames that make them up
//! - Damaged frames are rejected without disturbing the session

use gestura_core::{Frame, GesturaResult, GestureLabel};
use gestura_runtime::{GestureEvent, RecognitionSession, SessionConfig, SessionState, SessionStats};
use gestura_vision::SwipeDirection;

use crate::{HandBuilder, HandSynth};

// ============================================================================
// SCRIPT
// ============================================================================

/// One step of a scripted performance
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Step {
    /// Show a pose for the duration; sequence labels perform their motion
    Hold(GestureLabel, i64),
    /// Sweep a pointer sideways
    Swipe(SwipeDirection),
    /// Pointer followed by a pinch; spreading zooms in
    Zoom { spreading: bool },
    /// No hand in view; the caller drops buffered frames
    Absent(i64),
    /// Partial hands from a struggling detector
    Damaged(usize),
}

/// Walk through the deck: next, previous, jump to start, zoom, stop
pub fn presentation_script() -> Vec<Step> {
    vec![
        Step::Hold(GestureLabel::PointRight, 700),
        Step::Absent(1000),
        Step::Hold(GestureLabel::PointLeft, 700),
        Step::Absent(1000),
        Step::Swipe(SwipeDirection::Left),
        Step::Absent(1000),
        Step::Zoom { spreading: true },
        Step::Absent(1000),
        Step::Hold(GestureLabel::Stop, 700),
    ]
}

// ============================================================================
// HARNESS
// ============================================================================

/// Scenario configuration
#[derive(Clone, Debug)]
pub struct ScenarioConfig {
    pub session: SessionConfig,
    /// Gap between frames
    pub frame_interval_ms: i64,
    /// Per-coordinate landmark jitter
    pub jitter: f32,
    /// Random seed
    pub seed: u64,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        ScenarioConfig {
            session: SessionConfig::default(),
            frame_interval_ms: 33,
            jitter: crate::DEFAULT_JITTER,
            seed: 42,
        }
    }
}

impl ScenarioConfig {
    /// Noise-free frames at 30 fps
    pub fn clean() -> Self {
        ScenarioConfig {
            jitter: 0.0,
            ..Self::default()
        }
    }

    /// Slow camera
    pub fn low_fps() -> Self {
        ScenarioConfig {
            frame_interval_ms: 100,
            ..Self::default()
        }
    }

    pub fn with_session(mut self, session: SessionConfig) -> Self {
        self.session = session;
        self
    }
}

/// Scenario result
#[derive(Debug, Clone)]
pub struct ScenarioResult {
    /// Emitted events, oldest first
    pub events: Vec<GestureEvent>,
    pub stats: SessionStats,
    pub state: SessionState,
    pub elapsed_ms: i64,
}

impl ScenarioResult {
    /// Emitted labels, oldest first
    pub fn gestures(&self) -> Vec<GestureLabel> {
        self.events.iter().map(|e| e.gesture).collect()
    }

    /// Every frame was accounted for and the session ended ready
    pub fn passed(&self) -> bool {
        self.state == SessionState::Ready
            && self.stats.gestures_emitted as usize == self.events.len()
            && self.stats.frames_rejected <= self.stats.frames_processed
    }
}

/// Scripted driver for a recognition session
pub struct ScenarioHarness {
    config: ScenarioConfig,
    session: RecognitionSession,
    synth: HandSynth,
    clock_ms: i64,
    events: Vec<GestureEvent>,
}

impl ScenarioHarness {
    /// Create a harness around a fresh session
    pub fn new(config: ScenarioConfig) -> GesturaResult<Self> {
        let session = RecognitionSession::new(config.session.clone())?;
        let synth = HandSynth::seeded(config.seed).with_jitter(config.jitter);
        Ok(ScenarioHarness {
            config,
            session,
            synth,
            clock_ms: 0,
            events: Vec::new(),
        })
    }

    pub fn session(&self) -> &RecognitionSession {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut RecognitionSession {
        &mut self.session
    }

    /// Timestamp the next frame will carry
    pub fn clock_ms(&self) -> i64 {
        self.clock_ms
    }

    /// Run one step; returns the events it produced
    pub fn step(&mut self, step: Step) -> Vec<GestureEvent> {
        let interval = self.config.frame_interval_ms;
        let before = self.events.len();

        match step {
            Step::Hold(label, duration_ms) => match HandBuilder::for_label(label) {
                Some(hand) => {
                    let end = self.clock_ms + duration_ms;
                    while self.clock_ms < end {
                        let frame = self.synth.frame(&hand, self.clock_ms);
                        self.feed(frame);
                    }
                }
                None => return self.perform_sequence(label),
            },
            Step::Swipe(direction) => {
                let frames = self.synth.swipe(direction, self.clock_ms, 4, interval);
                self.feed_all(frames);
            }
            Step::Zoom { spreading } => {
                let frames = self.synth.zoom(spreading, self.clock_ms, interval);
                self.feed_all(frames);
            }
            Step::Absent(duration_ms) => {
                self.session.clear_sequence();
                self.clock_ms += duration_ms;
            }
            Step::Damaged(count) => {
                for _ in 0..count {
                    let frame = self.synth.noise_frame(5, self.clock_ms);
                    self.feed(frame);
                }
            }
        }

        self.events[before..].to_vec()
    }

    fn perform_sequence(&mut self, label: GestureLabel) -> Vec<GestureEvent> {
        let step = match label {
            GestureLabel::FirstSlide => Step::Swipe(SwipeDirection::Left),
            GestureLabel::LastSlide => Step::Swipe(SwipeDirection::Right),
            GestureLabel::ZoomIn => Step::Zoom { spreading: true },
            _ => Step::Zoom { spreading: false },
        };
        self.step(step)
    }

    fn feed_all(&mut self, frames: Vec<Frame>) {
        for frame in frames {
            self.feed(frame);
        }
    }

    fn feed(&mut self, frame: Frame) {
        if let Some(event) = self.session.process_frame(frame) {
            self.events.push(event);
        }
        self.clock_ms += self.config.frame_interval_ms;
    }

    /// Run every step and summarize
    pub fn run(&mut self, steps: &[Step]) -> ScenarioResult {
        for step in steps {
            self.step(*step);
        }
        ScenarioResult {
            events: self.events.clone(),
            stats: self.session.stats().clone(),
            state: self.session.state(),
            elapsed_ms: self.clock_ms,
        }
    }
}

// ============================================================================
// TEST SCENARIOS
// ============================================================================

/// Full presentation walkthrough with default settings
pub fn test_presentation_walkthrough() -> GesturaResult<ScenarioResult> {
    let mut harness = ScenarioHarness::new(ScenarioConfig::default())?;
    Ok(harness.run(&presentation_script()))
}

/// Holding one pose for several seconds
pub fn test_long_hold(label: GestureLabel, duration_ms: i64) -> GesturaResult<ScenarioResult> {
    let mut harness = ScenarioHarness::new(ScenarioConfig::default())?;
    Ok(harness.run(&[Step::Hold(label, duration_ms)]))
}
