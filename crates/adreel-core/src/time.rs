use serde::{Deserialize, Serialize};
use std::fmt;

/// Integer frame rate. Always at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fps(u32);

impl Fps {
    pub const DEFAULT: Fps = Fps(30);

    pub fn new(fps: u32) -> Self {
        Self(fps.max(1))
    }

    pub fn get(&self) -> u32 {
        self.0
    }

    pub fn as_f64(&self) -> f64 {
        self.0 as f64
    }
}

impl Default for Fps {
    fn default() -> Self {
        Fps::DEFAULT
    }
}

impl fmt::Display for Fps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}fps", self.0)
    }
}

/// Convert seconds to a frame count, rounding to the nearest frame.
/// Non-finite and non-positive inputs yield zero.
pub fn seconds_to_frames(seconds: f64, fps: Fps) -> u64 {
    if !seconds.is_finite() || seconds <= 0.0 {
        return 0;
    }
    (seconds * fps.as_f64()).round() as u64
}

/// Convert a frame index to seconds.
pub fn frame_to_seconds(frame: u64, fps: Fps) -> f64 {
    frame as f64 / fps.as_f64()
}

/// Sample index at which `frame` begins, rounded to the nearest sample.
///
/// Consecutive frames tile the sample axis exactly:
/// `[frame_to_sample(f), frame_to_sample(f + 1))` never overlap or leave gaps.
pub fn frame_to_sample(frame: u64, fps: Fps, sample_rate: u32) -> u64 {
    let num = u128::from(frame) * u128::from(sample_rate);
    let den = u128::from(fps.get());
    ((num + den / 2) / den) as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fps_never_zero() {
        assert_eq!(Fps::new(0).get(), 1);
        assert_eq!(Fps::default().get(), 30);
    }

    #[test]
    fn test_seconds_to_frames_rounds() {
        let fps = Fps::new(30);
        assert_eq!(seconds_to_frames(1.0, fps), 30);
        assert_eq!(seconds_to_frames(0.51, fps), 15);
        assert_eq!(seconds_to_frames(0.0, fps), 0);
        assert_eq!(seconds_to_frames(-1.0, fps), 0);
        assert_eq!(seconds_to_frames(f64::INFINITY, fps), 0);
    }

    #[test]
    fn test_frame_to_sample_tiles_exactly() {
        let fps = Fps::new(30);
        assert_eq!(frame_to_sample(0, fps, 48_000), 0);
        assert_eq!(frame_to_sample(1, fps, 48_000), 1600);
        // 44.1k / 24fps is not an integer; spans still tile.
        let fps = Fps::new(24);
        let mut total = 0;
        for f in 0..24 {
            total += frame_to_sample(f + 1, fps, 44_100) - frame_to_sample(f, fps, 44_100);
        }
        assert_eq!(total, 44_100);
    }
}
