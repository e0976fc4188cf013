//! Scene transition styles.
//!
//! Each transition kind maps to a pure function of eased progress. The
//! per-scene renderer decides which window is active and hands the raw
//! progress here; easing is CubicOut on the way in and CubicIn on the way out.

use adreel_core::{Easing, LayerStyle};
use adreel_ir::TransitionType;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TransitionDirection {
    In,
    Out,
}

impl TransitionDirection {
    pub fn easing(&self) -> Easing {
        match self {
            TransitionDirection::In => Easing::CubicOut,
            TransitionDirection::Out => Easing::CubicIn,
        }
    }
}

/// `(eased progress, direction) -> style`. Progress 0 is the start of the
/// window; for `In` that is fully hidden, for `Out` fully shown.
pub type TransitionFn = fn(f64, TransitionDirection) -> LayerStyle;

const ZOOM_IN_FROM: f64 = 1.2;
const ZOOM_OUT_TO: f64 = 0.8;
const BLUR_MAX_PX: f64 = 20.0;

/// Opacity ramp shared by every kind.
fn ramp(e: f64, dir: TransitionDirection) -> f64 {
    match dir {
        TransitionDirection::In => e,
        TransitionDirection::Out => 1.0 - e,
    }
}

fn fade(e: f64, dir: TransitionDirection) -> LayerStyle {
    LayerStyle::identity().with_opacity(ramp(e, dir))
}

/// Content moves toward the left: enters from the right edge, exits off the left.
fn slide_left(e: f64, dir: TransitionDirection) -> LayerStyle {
    let x = match dir {
        TransitionDirection::In => 1.0 - e,
        TransitionDirection::Out => -e,
    };
    fade(e, dir).with_translate(x, 0.0)
}

fn slide_right(e: f64, dir: TransitionDirection) -> LayerStyle {
    let x = match dir {
        TransitionDirection::In => -(1.0 - e),
        TransitionDirection::Out => e,
    };
    fade(e, dir).with_translate(x, 0.0)
}

fn zoom(e: f64, dir: TransitionDirection) -> LayerStyle {
    let scale = match dir {
        TransitionDirection::In => 1.0 + (ZOOM_IN_FROM - 1.0) * (1.0 - e),
        TransitionDirection::Out => 1.0 + (ZOOM_OUT_TO - 1.0) * e,
    };
    fade(e, dir).with_scale(scale)
}

fn blur(e: f64, dir: TransitionDirection) -> LayerStyle {
    let px = match dir {
        TransitionDirection::In => BLUR_MAX_PX * (1.0 - e),
        TransitionDirection::Out => BLUR_MAX_PX * e,
    };
    fade(e, dir).with_blur(px)
}

fn none(_e: f64, _dir: TransitionDirection) -> LayerStyle {
    LayerStyle::identity()
}

/// Dispatch table: transition kind to its style function.
pub fn transition_fn(kind: TransitionType) -> TransitionFn {
    match kind {
        TransitionType::Fade | TransitionType::Crossfade => fade,
        TransitionType::SlideLeft => slide_left,
        TransitionType::SlideRight => slide_right,
        TransitionType::Zoom => zoom,
        TransitionType::Blur => blur,
        TransitionType::None => none,
    }
}

/// Style for `kind` at raw window progress `t` (clamped to [0, 1]).
pub fn transition_style(kind: TransitionType, t: f64, dir: TransitionDirection) -> LayerStyle {
    let eased = dir.easing().apply(t);
    transition_fn(kind)(eased, dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_every_kind_is_hidden_at_in_start_and_shown_at_in_end() {
        for kind in TransitionType::ALL {
            if kind == TransitionType::None {
                continue;
            }
            let start = transition_style(kind, 0.0, TransitionDirection::In);
            let end = transition_style(kind, 1.0, TransitionDirection::In);
            assert!(start.opacity.abs() < EPS, "{kind} should start hidden");
            assert!(end.is_identity(), "{kind} should settle to identity: {end:?}");
        }
    }

    #[test]
    fn test_every_kind_starts_shown_on_out() {
        for kind in TransitionType::ALL {
            let start = transition_style(kind, 0.0, TransitionDirection::Out);
            assert!(start.is_identity(), "{kind} out should start at identity");
        }
    }

    #[test]
    fn test_fade_in_is_monotonic() {
        let mut last = -1.0;
        for i in 0..=15 {
            let s = transition_style(TransitionType::Fade, i as f64 / 15.0, TransitionDirection::In);
            assert!(s.opacity >= last);
            last = s.opacity;
        }
    }

    #[test]
    fn test_in_uses_cubic_out() {
        let s = transition_style(TransitionType::Fade, 0.5, TransitionDirection::In);
        assert!((s.opacity - 0.875).abs() < EPS);
        let s = transition_style(TransitionType::Fade, 0.5, TransitionDirection::Out);
        assert!((s.opacity - 0.875).abs() < EPS);
    }

    #[test]
    fn test_slides_move_full_canvas_width() {
        let s = transition_style(TransitionType::SlideLeft, 0.0, TransitionDirection::In);
        assert!((s.translate.x - 1.0).abs() < EPS);
        let s = transition_style(TransitionType::SlideRight, 0.0, TransitionDirection::In);
        assert!((s.translate.x + 1.0).abs() < EPS);
        let s = transition_style(TransitionType::SlideLeft, 1.0, TransitionDirection::Out);
        assert!((s.translate.x + 1.0).abs() < EPS);
    }

    #[test]
    fn test_zoom_and_blur_ranges() {
        let s = transition_style(TransitionType::Zoom, 0.0, TransitionDirection::In);
        assert!((s.scale - 1.2).abs() < EPS);
        let s = transition_style(TransitionType::Zoom, 1.0, TransitionDirection::Out);
        assert!((s.scale - 0.8).abs() < EPS);
        let s = transition_style(TransitionType::Blur, 0.0, TransitionDirection::In);
        assert!((s.blur - 20.0).abs() < EPS);
    }

    #[test]
    fn test_none_is_identity() {
        for t in [0.0, 0.3, 1.0] {
            assert!(transition_style(TransitionType::None, t, TransitionDirection::In).is_identity());
        }
    }
}
