//! Background motion (Ken Burns and friends).
//!
//! Motion runs over the whole scene, independent of transition windows.

use adreel_core::{LayerStyle, Point2D};
use adreel_ir::{BackgroundEffect, EffectDirection, EffectType};

/// `(progress over the scene, amplitude, direction) -> style`.
pub type MotionFn = fn(f64, f64, EffectDirection) -> LayerStyle;

/// How strongly each effect type scales the intensity level.
pub fn type_factor(kind: EffectType) -> f64 {
    match kind {
        EffectType::KenBurns => 1.0,
        EffectType::Zoom => 1.5,
        EffectType::Pan => 1.0,
        EffectType::Parallax => 0.5,
        EffectType::None => 0.0,
    }
}

fn unit(direction: EffectDirection) -> Point2D {
    match direction {
        EffectDirection::Left => Point2D::new(-1.0, 0.0),
        EffectDirection::Right => Point2D::new(1.0, 0.0),
        EffectDirection::Up => Point2D::new(0.0, -1.0),
        EffectDirection::Down => Point2D::new(0.0, 1.0),
        EffectDirection::In | EffectDirection::Out => Point2D::zero(),
    }
}

/// Slow push in (or pull out) with a gentle drift toward `direction`.
fn ken_burns(p: f64, amount: f64, direction: EffectDirection) -> LayerStyle {
    let scale = match direction {
        EffectDirection::Out => 1.0 + amount * (1.0 - p),
        _ => 1.0 + amount * p,
    };
    let drift = unit(direction);
    LayerStyle::identity()
        .with_scale(scale)
        .with_translate(drift.x * amount * 0.5 * p, drift.y * amount * 0.5 * p)
}

fn zoom(p: f64, amount: f64, direction: EffectDirection) -> LayerStyle {
    let scale = match direction {
        EffectDirection::Out => 1.0 + amount * (1.0 - p),
        _ => 1.0 + amount * p,
    };
    LayerStyle::identity().with_scale(scale)
}

/// Constant overscan, translated across the frame. In/out directions pan left.
fn pan(p: f64, amount: f64, direction: EffectDirection) -> LayerStyle {
    let dir = match direction {
        EffectDirection::In | EffectDirection::Out => unit(EffectDirection::Left),
        d => unit(d),
    };
    let offset = amount * (p - 0.5);
    LayerStyle::identity()
        .with_scale(1.0 + amount)
        .with_translate(dir.x * offset, dir.y * offset)
}

/// Like pan, but vertical unless told otherwise.
fn parallax(p: f64, amount: f64, direction: EffectDirection) -> LayerStyle {
    let dir = match direction {
        EffectDirection::In | EffectDirection::Out => unit(EffectDirection::Up),
        d => unit(d),
    };
    let offset = amount * (p - 0.5);
    LayerStyle::identity()
        .with_scale(1.0 + amount)
        .with_translate(dir.x * offset, dir.y * offset)
}

fn still(_p: f64, _amount: f64, _direction: EffectDirection) -> LayerStyle {
    LayerStyle::identity()
}

/// Dispatch table: effect type to its motion function.
pub fn motion_fn(kind: EffectType) -> MotionFn {
    match kind {
        EffectType::KenBurns => ken_burns,
        EffectType::Zoom => zoom,
        EffectType::Pan => pan,
        EffectType::Parallax => parallax,
        EffectType::None => still,
    }
}

/// Background style for `effect` at `local` of `scene_frames`.
pub fn motion_style(effect: &BackgroundEffect, local: u64, scene_frames: u64) -> LayerStyle {
    if scene_frames == 0 {
        return LayerStyle::identity();
    }
    let p = (local as f64 / scene_frames as f64).clamp(0.0, 1.0);
    let amount = effect.intensity.amount() * type_factor(effect.kind);
    motion_fn(effect.kind)(p, amount, effect.direction)
}
