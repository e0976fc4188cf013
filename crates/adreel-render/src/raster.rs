//! CPU rasterizer: turns a [`FramePlan`] into pixels.
//!
//! Scene layers are drawn into a scene canvas that starts as the brand
//! primary color. The canvas is then composited onto black with the scene
//! transition style, and frame overlays are drawn on top.

use adreel_core::{Color, FrameBuffer, LayerStyle};
use adreel_ir::{BrandSettings, HorizontalAlign, RenderSettings};
use fontdue::Font;

use crate::background::GradientFill;
use crate::blur::box_blur;
use crate::evaluate::{FramePlan, LayerContent, PlannedLayer, ScrimKind};
use crate::image_loader::{fit_into, resize_exact, Fit};
use crate::provider::AssetProvider;
use crate::text::{render_text_aligned, wrap_text, TextAlign};
use crate::text_anim::revealed_chars;

const PANEL: Color = Color::rgba(0.0, 0.0, 0.0, 0.45);
const DEBUG_PANEL: Color = Color::rgba(0.0, 0.0, 0.0, 0.7);

struct Canvas<'a> {
    width: u32,
    height: u32,
    provider: &'a dyn AssetProvider,
}

impl Canvas<'_> {
    fn px(&self, fx: f64, fy: f64) -> (f64, f64) {
        (fx * self.width as f64, fy * self.height as f64)
    }

    /// Base unit for type sizes: the short canvas side.
    fn type_unit(&self) -> f32 {
        self.width.min(self.height) as f32
    }
}

/// Rasterize one frame plan.
pub fn rasterize(
    plan: &FramePlan,
    settings: &RenderSettings,
    brand: &BrandSettings,
    provider: &dyn AssetProvider,
) -> FrameBuffer {
    let canvas = Canvas {
        width: settings.width.max(1),
        height: settings.height.max(1),
        provider,
    };
    let mut frame = FrameBuffer::solid(canvas.width, canvas.height, &Color::BLACK);

    if let Some(scene) = &plan.scene {
        let mut group = FrameBuffer::solid(canvas.width, canvas.height, &brand.primary());
        for layer in &scene.layers {
            draw_layer(&mut group, layer, &canvas);
        }
        composite_styled(&mut frame, &group, &scene.transition, &canvas, 0.5, 0.5);
    }
    for layer in &plan.overlays {
        draw_layer(&mut frame, layer, &canvas);
    }
    frame
}

fn draw_layer(target: &mut FrameBuffer, layer: &PlannedLayer, canvas: &Canvas<'_>) {
    if !layer.style.is_visible() {
        return;
    }
    let size = layer.placement.size.map(|s| {
        let (w, h) = canvas.px(s.width, s.height);
        (w.round().max(1.0) as u32, h.round().max(1.0) as u32)
    });
    let Some(content) = render_content(&layer.content, size, canvas) else {
        return;
    };

    let (bw, bh) = (content.width as f64, content.height as f64);
    let (ax, ay) = canvas.px(layer.placement.at.x, layer.placement.at.y);
    let cx = ax - layer.placement.pivot.x * bw + bw / 2.0;
    let cy = ay - layer.placement.pivot.y * bh + bh / 2.0;
    composite_styled(
        target,
        &content,
        &layer.style,
        canvas,
        cx / canvas.width as f64,
        cy / canvas.height as f64,
    );
}

/// Composite `src` centred on `(cx, cy)` (canvas fractions) with `style`
/// applied: scale about the centre, translate, blur, opacity.
fn composite_styled(
    target: &mut FrameBuffer,
    src: &FrameBuffer,
    style: &LayerStyle,
    canvas: &Canvas<'_>,
    cx: f64,
    cy: f64,
) {
    if !style.is_visible() {
        return;
    }
    let scale = style.scale;
    let mut layer = if (scale - 1.0).abs() > 1e-6 {
        let w = (src.width as f64 * scale).round();
        let h = (src.height as f64 * scale).round();
        if w < 1.0 || h < 1.0 {
            return;
        }
        resize_exact(src, w as u32, h as u32)
    } else {
        src.clone()
    };
    if style.blur >= 0.5 {
        layer = box_blur(&layer, style.blur.round() as u32);
    }

    let (px, py) = canvas.px(cx + style.translate.x, cy + style.translate.y);
    let dx = (px - layer.width as f64 / 2.0).round() as i32;
    let dy = (py - layer.height as f64 / 2.0).round() as i32;
    target.composite_over_with_opacity(&layer, dx, dy, style.opacity as f32);
}

fn render_content(
    content: &LayerContent,
    size: Option<(u32, u32)>,
    canvas: &Canvas<'_>,
) -> Option<FrameBuffer> {
    let (w, h) = size.unwrap_or((canvas.width, canvas.height));
    match content {
        LayerContent::Gradient(fill) => Some(gradient(fill, w, h)),
        LayerContent::MotionGraphic {
            fill,
            accent,
            progress,
        } => Some(motion_graphic(fill, accent, *progress, w, h)),
        LayerContent::Image { url, fit, fallback } => match canvas.provider.image(url) {
            Some(img) => Some(fit_into(img, w, h, *fit)),
            None => {
                tracing::debug!(%url, "image not provided, using fallback");
                fallback.as_ref().map(|f| gradient(f, w, h))
            }
        },
        LayerContent::Video {
            url,
            seconds,
            fallback,
        } => match canvas.provider.video_frame(url, *seconds) {
            Some(img) => Some(fit_into(img, w, h, Fit::Cover)),
            None => fallback.as_ref().map(|f| gradient(f, w, h)),
        },
        LayerContent::Scrim { scrim, color } => Some(scrim_fb(*scrim, color, w, h)),
        LayerContent::Solid { color } => Some(FrameBuffer::solid(w, h, color)),
        LayerContent::Text {
            text,
            style,
            font,
            color,
            align,
            reveal,
            max_width,
        } => {
            let font = canvas.provider.font(font.as_deref())?;
            let shown: String = text.chars().take(revealed_chars(text, *reveal)).collect();
            if shown.trim().is_empty() {
                return None;
            }
            let size = style.size_fraction() * canvas.type_unit();
            let wrapped = wrap_text(font, &shown, size, (*max_width * canvas.width as f64) as f32);
            Some(render_text_aligned(font, &wrapped, size, color, text_align(*align)))
        }
        LayerContent::LowerThird {
            headline,
            subtext,
            accent,
            text_color,
            heading_font,
            body_font,
        } => Some(lower_third(
            headline,
            subtext.as_deref(),
            accent,
            text_color,
            canvas.provider.font(heading_font.as_deref()),
            canvas.provider.font(body_font.as_deref()),
            w,
            h,
        )),
        LayerContent::Button {
            label,
            fill,
            text_color,
            font,
        } => {
            let mut fb = FrameBuffer::solid(w, h, fill);
            if let Some(font) = canvas.provider.font(font.as_deref()) {
                let label_fb =
                    render_text_aligned(font, label, h as f32 * 0.45, text_color, TextAlign::Center);
                center_into(&mut fb, &label_fb);
            }
            Some(fb)
        }
        LayerContent::ErrorPlaceholder { message } => {
            let mut fb = FrameBuffer::new(w, h);
            let band = (h / 12).max(1) as i32;
            fb.fill_rect(0, 0, w as i32, band, &Color::MAGENTA);
            fb.fill_rect(0, h as i32 - band, w as i32, h as i32, &Color::MAGENTA);
            if let Some(font) = canvas.provider.font(None) {
                let text =
                    render_text_aligned(font, message, band as f32 * 0.6, &Color::WHITE, TextAlign::Left);
                fb.composite_over(&text, band / 2, band / 5);
            }
            Some(fb)
        }
        LayerContent::DebugInfo { lines } => {
            let unit = canvas.type_unit() * 0.025;
            let text = canvas
                .provider
                .font(None)
                .map(|font| render_text_aligned(font, &lines.join("\n"), unit, &Color::WHITE, TextAlign::Left));
            let (tw, th) = match &text {
                Some(t) => (t.width, t.height),
                None => (
                    (canvas.width as f32 * 0.3) as u32,
                    (unit * 1.3 * lines.len() as f32) as u32,
                ),
            };
            let pad = (unit * 0.5) as u32;
            let mut fb = FrameBuffer::solid(tw + 2 * pad, th.max(1) + 2 * pad, &DEBUG_PANEL);
            if let Some(t) = text {
                fb.composite_over(&t, pad as i32, pad as i32);
            }
            Some(fb)
        }
    }
}

fn text_align(align: HorizontalAlign) -> TextAlign {
    match align {
        HorizontalAlign::Left => TextAlign::Left,
        HorizontalAlign::Center => TextAlign::Center,
        HorizontalAlign::Right => TextAlign::Right,
    }
}

fn center_into(target: &mut FrameBuffer, src: &FrameBuffer) {
    let dx = (target.width as i32 - src.width as i32) / 2;
    let dy = (target.height as i32 - src.height as i32) / 2;
    target.composite_over(src, dx, dy);
}

pub(crate) fn gradient(fill: &GradientFill, w: u32, h: u32) -> FrameBuffer {
    let mut fb = FrameBuffer::new(w, h);
    let (fw, fh) = (w.max(1) as f64, h.max(1) as f64);
    for y in 0..h {
        for x in 0..w {
            let c = fill.sample((x as f64 + 0.5) / fw, (y as f64 + 0.5) / fh);
            fb.set_pixel(x, y, c.to_rgba8());
        }
    }
    fb
}

/// Rotating gradient with a drifting accent glow.
fn motion_graphic(fill: &GradientFill, accent: &Color, progress: f64, w: u32, h: u32) -> FrameBuffer {
    let rotated = GradientFill::new(fill.from, fill.to, fill.angle + 90.0 * progress);
    let mut fb = gradient(&rotated, w, h);
    let cx = (0.2 + 0.6 * progress) * w as f64;
    let cy = 0.5 * h as f64;
    let radius = 0.35 * w.min(h) as f64;
    let rgba = accent.to_rgba8();
    for y in 0..h {
        for x in 0..w {
            let d = ((x as f64 - cx).powi(2) + (y as f64 - cy).powi(2)).sqrt() / radius;
            if d < 1.0 {
                fb.blend_pixel(x, y, rgba, (0.35 * (1.0 - d)) as f32);
            }
        }
    }
    fb
}

fn scrim_fb(kind: ScrimKind, color: &Color, w: u32, h: u32) -> FrameBuffer {
    let mut fb = FrameBuffer::new(w, h);
    let [r, g, b, a] = color.to_rgba8();
    let alpha_at = |x: u32, y: u32| -> f64 {
        let u = (x as f64 + 0.5) / w as f64;
        let v = (y as f64 + 0.5) / h as f64;
        match kind {
            ScrimKind::Solid => 1.0,
            ScrimKind::BottomGradient => ((v - 0.4) / 0.6).clamp(0.0, 1.0),
            ScrimKind::Vignette => {
                let d = ((u - 0.5).powi(2) + (v - 0.5).powi(2)).sqrt() / 0.7071;
                ((d - 0.35) / 0.65).clamp(0.0, 1.0)
            }
        }
    };
    for y in 0..h {
        for x in 0..w {
            let k = alpha_at(x, y);
            if k > 0.0 {
                fb.set_pixel(x, y, [r, g, b, (f64::from(a) * k).round() as u8]);
            }
        }
    }
    fb
}

#[allow(clippy::too_many_arguments)]
fn lower_third(
    headline: &str,
    subtext: Option<&str>,
    accent: &Color,
    text_color: &Color,
    heading: Option<&Font>,
    body: Option<&Font>,
    w: u32,
    h: u32,
) -> FrameBuffer {
    let mut fb = FrameBuffer::new(w, h);
    fb.fill_rect(0, 0, w as i32, h as i32, &PANEL);
    let bar = ((w as f64 * 0.015).round() as i32).max(2);
    fb.fill_rect(0, 0, bar, h as i32, accent);

    let left = bar + (w as f64 * 0.04) as i32;
    let max_width = (w as i32 - left - bar).max(1) as f32;
    let mut y = (h as f64 * 0.12) as i32;
    if let Some(font) = heading {
        let size = h as f32 * 0.36;
        let text = render_text_aligned(font, &wrap_text(font, headline, size, max_width), size, text_color, TextAlign::Left);
        fb.composite_over(&text, left, y);
        y += text.height as i32 + (h as f64 * 0.06) as i32;
    }
    if let (Some(font), Some(sub)) = (body, subtext) {
        let size = h as f32 * 0.2;
        let text = render_text_aligned(font, &wrap_text(font, sub, size, max_width), size, &text_color.with_alpha(0.85), TextAlign::Left);
        fb.composite_over(&text, left, y);
    }
    fb
}
