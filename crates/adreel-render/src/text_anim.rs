//! Caption enter/exit animations.

use adreel_core::{spring, Easing, Fps, LayerStyle, SpringConfig};
use adreel_ir::TextAnimation;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TextPhase {
    Enter,
    Exit,
}

/// Visual state of a caption during an animation window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextFrame {
    pub style: LayerStyle,
    /// Fraction of characters shown (typewriter); 1.0 otherwise.
    pub reveal: f64,
}

impl TextFrame {
    fn styled(style: LayerStyle) -> Self {
        Self { style, reveal: 1.0 }
    }
}

/// `(raw window progress, phase) -> frame`. Each variant eases on its own so
/// spring- and character-based variants can use the raw progress.
pub type TextAnimFn = fn(f64, TextPhase) -> TextFrame;

const SLIDE: f64 = 0.05;
const BLUR_PX: f64 = 10.0;
/// Simulated spring time covered by one animation window.
const POP_SPRING_FRAMES: f64 = 30.0;

fn eased(t: f64, phase: TextPhase) -> f64 {
    match phase {
        TextPhase::Enter => Easing::CubicOut.apply(t),
        TextPhase::Exit => Easing::CubicIn.apply(t),
    }
}

fn shown(t: f64, phase: TextPhase) -> f64 {
    match phase {
        TextPhase::Enter => eased(t, phase),
        TextPhase::Exit => 1.0 - eased(t, phase),
    }
}

fn fade(t: f64, phase: TextPhase) -> TextFrame {
    TextFrame::styled(LayerStyle::identity().with_opacity(shown(t, phase)))
}

/// Slides along `(dx, dy)`: arrives from `-dir`, leaves toward `dir`.
fn slide(t: f64, phase: TextPhase, dx: f64, dy: f64) -> TextFrame {
    let k = match phase {
        TextPhase::Enter => -(1.0 - eased(t, phase)),
        TextPhase::Exit => eased(t, phase),
    };
    let style = LayerStyle::identity()
        .with_opacity(shown(t, phase))
        .with_translate(dx * SLIDE * k, dy * SLIDE * k);
    TextFrame::styled(style)
}

fn slide_up(t: f64, phase: TextPhase) -> TextFrame {
    slide(t, phase, 0.0, -1.0)
}

fn slide_down(t: f64, phase: TextPhase) -> TextFrame {
    slide(t, phase, 0.0, 1.0)
}

fn slide_left(t: f64, phase: TextPhase) -> TextFrame {
    slide(t, phase, -1.0, 0.0)
}

fn slide_right(t: f64, phase: TextPhase) -> TextFrame {
    slide(t, phase, 1.0, 0.0)
}

fn scale(t: f64, phase: TextPhase) -> TextFrame {
    let s = shown(t, phase);
    TextFrame::styled(
        LayerStyle::identity()
            .with_opacity(s)
            .with_scale(0.8 + 0.2 * s),
    )
}

fn pop(t: f64, phase: TextPhase) -> TextFrame {
    let style = match phase {
        TextPhase::Enter => {
            let s = spring(
                t.clamp(0.0, 1.0) * POP_SPRING_FRAMES,
                Fps::new(30),
                SpringConfig::default(),
            );
            LayerStyle::identity()
                .with_opacity(eased(t, phase))
                .with_scale(s.max(0.0))
        }
        TextPhase::Exit => {
            let s = shown(t, phase);
            LayerStyle::identity().with_opacity(s).with_scale(s)
        }
    };
    TextFrame::styled(style)
}

fn blur(t: f64, phase: TextPhase) -> TextFrame {
    let s = shown(t, phase);
    TextFrame::styled(
        LayerStyle::identity()
            .with_opacity(s)
            .with_blur(BLUR_PX * (1.0 - s)),
    )
}

fn typewriter(t: f64, phase: TextPhase) -> TextFrame {
    match phase {
        TextPhase::Enter => TextFrame {
            style: LayerStyle::identity(),
            reveal: t.clamp(0.0, 1.0),
        },
        TextPhase::Exit => fade(t, phase),
    }
}

fn none(_t: f64, _phase: TextPhase) -> TextFrame {
    TextFrame::styled(LayerStyle::identity())
}

/// Dispatch table: animation variant to its frame function.
pub fn text_anim_fn(animation: TextAnimation) -> TextAnimFn {
    match animation {
        TextAnimation::Fade => fade,
        TextAnimation::SlideUp => slide_up,
        TextAnimation::SlideDown => slide_down,
        TextAnimation::SlideLeft => slide_left,
        TextAnimation::SlideRight => slide_right,
        TextAnimation::Scale => scale,
        TextAnimation::Pop => pop,
        TextAnimation::BlurIn | TextAnimation::BlurOut => blur,
        TextAnimation::Typewriter => typewriter,
        TextAnimation::None => none,
    }
}

pub fn text_frame(animation: TextAnimation, t: f64, phase: TextPhase) -> TextFrame {
    text_anim_fn(animation)(t, phase)
}

/// Number of characters of `text` to draw for a reveal fraction.
pub fn revealed_chars(text: &str, reveal: f64) -> usize {
    let total = text.chars().count();
    ((total as f64) * reveal.clamp(0.0, 1.0)).floor() as usize
}
