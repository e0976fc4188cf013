use serde::{Deserialize, Serialize};

use crate::time::Fps;

/// Easing function for animation interpolation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Easing {
    #[default]
    Linear,
    QuadIn,
    QuadOut,
    CubicIn,
    CubicOut,
    CubicInOut,
}

impl Easing {
    /// Apply the easing function to a normalized time value t in [0, 1].
    pub fn apply(&self, t: f64) -> f64 {
        let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
        match self {
            Easing::Linear => t,
            Easing::QuadIn => t * t,
            Easing::QuadOut => 1.0 - (1.0 - t) * (1.0 - t),
            Easing::CubicIn => t * t * t,
            Easing::CubicOut => 1.0 - (1.0 - t).powi(3),
            Easing::CubicInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
        }
    }
}

/// Map `x` from `input` to `output` linearly, clamping at both ends.
pub fn interpolate(x: f64, input: [f64; 2], output: [f64; 2]) -> f64 {
    let [x0, x1] = input;
    let [y0, y1] = output;
    if (x1 - x0).abs() < f64::EPSILON {
        return if x < x0 { y0 } else { y1 };
    }
    let t = ((x - x0) / (x1 - x0)).clamp(0.0, 1.0);
    y0 + (y1 - y0) * t
}

/// Physical parameters of a damped spring.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpringConfig {
    pub mass: f64,
    pub stiffness: f64,
    pub damping: f64,
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self {
            mass: 1.0,
            stiffness: 100.0,
            damping: 10.0,
        }
    }
}

/// Step response of a damped spring released at frame 0.
///
/// Starts at 0 and settles at 1. Underdamped configs overshoot 1 before settling.
pub fn spring(frame: f64, fps: Fps, config: SpringConfig) -> f64 {
    if frame <= 0.0 {
        return 0.0;
    }
    let mass = config.mass.max(f64::EPSILON);
    let stiffness = config.stiffness.max(f64::EPSILON);
    let damping = config.damping.max(0.0);

    let t = frame / fps.as_f64();
    let omega = (stiffness / mass).sqrt();
    let zeta = damping / (2.0 * (stiffness * mass).sqrt());

    if zeta < 1.0 {
        let omega_d = omega * (1.0 - zeta * zeta).sqrt();
        let decay = (-zeta * omega * t).exp();
        1.0 - decay * ((omega_d * t).cos() + (zeta * omega / omega_d) * (omega_d * t).sin())
    } else {
        // critically damped and overdamped springs never overshoot
        1.0 - (-omega * t).exp() * (1.0 + omega * t)
    }
}
