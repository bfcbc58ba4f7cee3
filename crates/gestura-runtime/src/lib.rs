//! Gestura Runtime - Live recognition session
//!
//! A session turns a stream of frames into discrete gesture events:
//! 1. Classify the frame
//! 2. Buffer it for compound gestures
//! 3. Prefer a sequence hit over the single-frame result
//! 4. Apply the emission policy (confidence, hold time, cooldown)
//! 5. Record the event in a bounded history
//!
//! Health checks and lifecycle are explicit calls; nothing runs in the
//! background.

pub mod config;
pub mod session;
pub mod telemetry;

pub use config::*;
pub use session::*;
