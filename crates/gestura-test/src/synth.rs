//! Synthetic hands - Seeded landmark generation
//!
//! Produces frames that sit well inside the classifier's thresholds so that
//! small jitter never changes the label:
//! - Fingertips rise 150 above the wrist (threshold 70 at default sensitivity)
//! - Curled tips sit 10 below the wrist
//! - Pointing offsets are 80 (threshold 50)
//! - Fingertips are spaced 60 apart (proximity threshold 30, pinch 50)

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use gestura_core::{
    CaptureTime, Finger, Frame, GestureLabel, HandLandmark, Point2, LANDMARK_COUNT, MIDDLE_MCP,
    WRIST,
};
use gestura_vision::{Direction, FingerPattern, SwipeDirection};

pub const DEFAULT_WRIST: Point2 = Point2 { x: 300.0, y: 400.0 };
pub const FINGER_SPACING: f32 = 60.0;
pub const FINGER_REACH: f32 = 150.0;
pub const CURL_DROP: f32 = 10.0;
pub const POINT_OFFSET: f32 = 80.0;
/// Per-coordinate jitter that keeps every pose on its label
pub const DEFAULT_JITTER: f32 = 2.0;

/// Deterministic hand pose
#[derive(Debug, Clone, PartialEq)]
pub struct HandBuilder {
    wrist: Point2,
    pattern: FingerPattern,
    mcp_offset: (f32, f32),
    depth: f32,
    tip_overrides: Vec<(Finger, f32, f32)>,
    tips_together: bool,
    pinch_gap: Option<f32>,
}

impl Default for HandBuilder {
    fn default() -> Self {
        Self {
            wrist: DEFAULT_WRIST,
            pattern: FingerPattern::FIST,
            mcp_offset: (0.0, 0.0),
            depth: 0.0,
            tip_overrides: Vec::new(),
            tips_together: false,
            pinch_gap: None,
        }
    }
}

impl HandBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Canonical pose for a single-frame label; `None` for sequence labels
    pub fn for_label(label: GestureLabel) -> Option<Self> {
        let hand = Self::new();
        let pose = match label {
            GestureLabel::PointRight => hand.fingers(FingerPattern::INDEX_ONLY).pointing(Direction::Right),
            GestureLabel::PointLeft => hand.fingers(FingerPattern::INDEX_ONLY).pointing(Direction::Left),
            GestureLabel::Pointer => hand.fingers(FingerPattern::INDEX_ONLY).pointing(Direction::Up),
            GestureLabel::PalmOut => hand.fingers(FingerPattern::OPEN).pointing(Direction::Up),
            GestureLabel::Stop => hand,
            GestureLabel::OpenHand => hand.fingers(FingerPattern::OPEN),
            GestureLabel::Peace => hand.fingers(FingerPattern::INDEX_MIDDLE),
            GestureLabel::Draw => hand.fingers(FingerPattern::INDEX_ONLY),
            GestureLabel::Save => hand.fingers(FingerPattern::THUMB_ONLY),
            GestureLabel::Highlight => hand.fingers(FingerPattern::INDEX_MIDDLE).tips_together(),
            GestureLabel::ZoomIn
            | GestureLabel::ZoomOut
            | GestureLabel::FirstSlide
            | GestureLabel::LastSlide => return None,
        };
        Some(pose)
    }

    pub fn fingers(mut self, pattern: FingerPattern) -> Self {
        self.pattern = pattern;
        self
    }

    pub fn pointing(mut self, direction: Direction) -> Self {
        self.mcp_offset = match direction {
            Direction::Left => (-POINT_OFFSET, 0.0),
            Direction::Right => (POINT_OFFSET, 0.0),
            Direction::Up => (0.0, -POINT_OFFSET),
        };
        self
    }

    /// Place the wrist
    pub fn at(mut self, x: f32, y: f32) -> Self {
        self.wrist = Point2::new(x, y);
        self
    }

    /// Move the whole hand horizontally
    pub fn shifted(mut self, dx: f32) -> Self {
        self.wrist.x += dx;
        self
    }

    pub fn depth(mut self, z: f32) -> Self {
        self.depth = z;
        self
    }

    /// Put a fingertip at an offset from the wrist
    pub fn tip(mut self, finger: Finger, dx: f32, dy: f32) -> Self {
        self.tip_overrides.push((finger, dx, dy));
        self
    }

    /// Middle tip right next to the index tip
    pub fn tips_together(mut self) -> Self {
        self.tips_together = true;
        self
    }

    /// Index tip `gap` to the right of the thumb tip
    pub fn pinch(mut self, gap: f32) -> Self {
        self.pinch_gap = Some(gap);
        self
    }

    pub fn landmarks(&self) -> Vec<HandLandmark> {
        let w = self.wrist;
        let mut landmarks = vec![HandLandmark::new(w.x, w.y, self.depth); LANDMARK_COUNT];

        for (i, finger) in Finger::all().iter().enumerate() {
            let x = w.x - 2.0 * FINGER_SPACING + FINGER_SPACING * i as f32;
            let y = if self.pattern.is_extended(*finger) {
                w.y - FINGER_REACH
            } else {
                w.y + CURL_DROP
            };
            set_chain(&mut landmarks, *finger, x, y, self.depth, w);
        }

        for (finger, dx, dy) in &self.tip_overrides {
            set_chain(&mut landmarks, *finger, w.x + dx, w.y + dy, self.depth, w);
        }

        if self.tips_together {
            let index = landmarks[Finger::Index.tip()];
            landmarks[Finger::Middle.tip()] = HandLandmark::new(index.x + 10.0, index.y, index.z);
        }

        if let Some(gap) = self.pinch_gap {
            let thumb = landmarks[Finger::Thumb.tip()];
            landmarks[Finger::Index.tip()] = HandLandmark::new(thumb.x + gap, thumb.y, thumb.z);
        }

        landmarks[WRIST] = HandLandmark::new(w.x, w.y, self.depth);
        landmarks[MIDDLE_MCP] =
            HandLandmark::new(w.x + self.mcp_offset.0, w.y + self.mcp_offset.1, self.depth);
        landmarks
    }

    pub fn build(&self, timestamp: CaptureTime) -> Frame {
        Frame::new(self.landmarks(), timestamp)
    }
}

/// Joints spread evenly from the wrist to the tip
fn set_chain(landmarks: &mut [HandLandmark], finger: Finger, x: f32, y: f32, z: f32, wrist: Point2) {
    let chain = finger.chain();
    for (step, &index) in chain.iter().enumerate().skip(1) {
        let t = step as f32 / 4.0;
        landmarks[index] = HandLandmark::new(
            wrist.x + (x - wrist.x) * t,
            wrist.y + (y - wrist.y) * t,
            z,
        );
    }
}

/// Seeded source of jittered synthetic frames
#[derive(Debug, Clone)]
pub struct HandSynth {
    rng: StdRng,
    jitter: f32,
}

impl HandSynth {
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            jitter: DEFAULT_JITTER,
        }
    }

    pub fn with_jitter(mut self, jitter: f32) -> Self {
        self.jitter = jitter.abs();
        self
    }

    /// Build the pose and jitter every coordinate
    pub fn frame(&mut self, hand: &HandBuilder, millis: i64) -> Frame {
        let mut landmarks = hand.landmarks();
        if self.jitter > 0.0 {
            for l in &mut landmarks {
                l.x += self.rng.gen_range(-self.jitter..=self.jitter);
                l.y += self.rng.gen_range(-self.jitter..=self.jitter);
                l.z += self.rng.gen_range(-self.jitter..=self.jitter);
            }
        }
        Frame::new(landmarks, CaptureTime::from_millis(millis))
    }

    /// Jittered frame of a single-frame label
    pub fn labelled(&mut self, label: GestureLabel, millis: i64) -> Option<Frame> {
        let hand = HandBuilder::for_label(label)?;
        Some(self.frame(&hand, millis))
    }

    /// Uniformly chosen single-frame label
    pub fn random_label(&mut self) -> GestureLabel {
        let labels = GestureLabel::single_frame();
        labels[self.rng.gen_range(0..labels.len())]
    }

    /// Random label together with a frame of it
    pub fn random_labelled(&mut self, millis: i64) -> (GestureLabel, Frame) {
        let label = self.random_label();
        let hand = HandBuilder::for_label(label).unwrap_or_default();
        (label, self.frame(&hand, millis))
    }

    /// Landmarks scattered at random, any count
    pub fn noise_frame(&mut self, landmarks: usize, millis: i64) -> Frame {
        let points = (0..landmarks)
            .map(|_| {
                HandLandmark::new(
                    self.rng.gen_range(0.0..640.0),
                    self.rng.gen_range(0.0..480.0),
                    self.rng.gen_range(-20.0..20.0),
                )
            })
            .collect();
        Frame::new(points, CaptureTime::from_millis(millis))
    }

    /// Pointer pose sweeping 160 units sideways over `steps + 1` frames
    pub fn swipe(
        &mut self,
        direction: SwipeDirection,
        start_ms: i64,
        steps: usize,
        interval_ms: i64,
    ) -> Vec<Frame> {
        let steps = steps.max(1);
        let sign = match direction {
            SwipeDirection::Left => -1.0,
            SwipeDirection::Right => 1.0,
        };
        let pointer = HandBuilder::for_label(GestureLabel::Pointer).unwrap_or_default();

        (0..=steps)
            .map(|i| {
                let dx = sign * 160.0 * i as f32 / steps as f32;
                self.frame(&pointer.clone().shifted(dx), start_ms + i as i64 * interval_ms)
            })
            .collect()
    }

    /// Pointer anchor followed by a pinch frame
    ///
    /// Spreading starts from a pointer whose thumb already touches the
    /// index and ends in a wider pinch; closing starts from an open pointer.
    pub fn zoom(&mut self, spreading: bool, start_ms: i64, interval_ms: i64) -> Vec<Frame> {
        let pointer = HandBuilder::for_label(GestureLabel::Pointer).unwrap_or_default();
        let (anchor, latest) = if spreading {
            (
                pointer
                    .clone()
                    .tip(Finger::Index, -FINGER_SPACING, -77.0)
                    .tip(Finger::Thumb, -FINGER_SPACING, -62.0),
                pointer.pinch(38.0),
            )
        } else {
            (pointer.clone(), pointer.pinch(10.0))
        };
        vec![
            self.frame(&anchor, start_ms),
            self.frame(&latest, start_ms + interval_ms),
        ]
    }
}
