//! Time primitives for captured frames
//!
//! Every frame and recorded example carries a capture time. Capture times are
//! wall-clock microseconds since the Unix epoch, so frames from the upstream
//! landmark detector and examples recorded by a training session share a scale.

use std::ops::{Add, Sub};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

/// Capture time - microseconds since the Unix epoch
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CaptureTime(pub i64);

impl CaptureTime {
    pub const ZERO: CaptureTime = CaptureTime(0);

    /// Current wall-clock time
    pub fn now() -> Self {
        let micros = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_micros() as i64)
            .unwrap_or(0);
        CaptureTime(micros)
    }

    #[inline]
    pub fn from_micros(micros: i64) -> Self {
        CaptureTime(micros)
    }

    #[inline]
    pub fn from_millis(millis: i64) -> Self {
        CaptureTime(millis.saturating_mul(1000))
    }

    #[inline]
    pub fn as_micros(self) -> i64 {
        self.0
    }

    #[inline]
    pub fn as_millis(self) -> i64 {
        self.0 / 1000
    }

    /// Time elapsed since `earlier`, zero if `earlier` is in the future
    #[inline]
    pub fn since(self, earlier: CaptureTime) -> Duration {
        self - earlier
    }
}

impl Add<Duration> for CaptureTime {
    type Output = CaptureTime;

    #[inline]
    fn add(self, rhs: Duration) -> Self::Output {
        CaptureTime(self.0.saturating_add(rhs.as_micros() as i64))
    }
}

impl Sub<Duration> for CaptureTime {
    type Output = CaptureTime;

    #[inline]
    fn sub(self, rhs: Duration) -> Self::Output {
        CaptureTime(self.0.saturating_sub(rhs.as_micros() as i64))
    }
}

impl Sub<CaptureTime> for CaptureTime {
    type Output = Duration;

    #[inline]
    fn sub(self, rhs: CaptureTime) -> Self::Output {
        let diff = self.0.saturating_sub(rhs.0);
        if diff >= 0 {
            Duration::from_micros(diff as u64)
        } else {
            Duration::ZERO
        }
    }
}

impl std::fmt::Debug for CaptureTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "t({}ms)", self.as_millis())
    }
}

impl std::fmt::Display for CaptureTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_millis())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capture_time_conversions() {
        let t = CaptureTime::from_millis(1500);
        assert_eq!(t.as_micros(), 1_500_000);
        assert_eq!(t.as_millis(), 1500);
    }

    #[test]
    fn test_capture_time_arithmetic() {
        let t = CaptureTime::from_millis(1000);
        let later = t + Duration::from_millis(250);
        assert_eq!(later.as_millis(), 1250);
        assert_eq!(later - t, Duration::from_millis(250));
        // Never negative
        assert_eq!(t - later, Duration::ZERO);
        assert_eq!((later - Duration::from_millis(250)), t);
    }

    #[test]
    fn test_capture_time_extremes_saturate() {
        let early = CaptureTime::from_micros(i64::MIN + 1);
        let late = CaptureTime::from_micros(i64::MAX);
        assert_eq!(late.since(early), Duration::from_micros(i64::MAX as u64));
        assert_eq!(early.since(late), Duration::ZERO);
        assert_eq!(CaptureTime::from_millis(i64::MAX).as_micros(), i64::MAX);
        assert_eq!(CaptureTime::from_millis(i64::MIN).as_micros(), i64::MIN);
    }

    #[test]
    fn test_now_is_after_epoch() {
        assert!(CaptureTime::now() > CaptureTime::ZERO);
    }
}
