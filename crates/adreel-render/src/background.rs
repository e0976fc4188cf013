//! Background and readability layers.

use adreel_core::{Color, LayerStyle};
use adreel_ir::{
    classify, BackgroundType, BrandSettings, OverlayType, RenderSettings, Scene, SceneType,
};
use serde::Serialize;

use crate::evaluate::{LayerContent, PlannedLayer, ScrimKind, ZIndex};
use crate::image_loader::Fit;
use crate::motion::motion_style;

const DEFAULT_SCRIM_OPACITY: f64 = 0.4;

/// Two-stop linear gradient. `angle` in degrees, 0 = left to right,
/// 90 = top to bottom.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GradientFill {
    pub from: Color,
    pub to: Color,
    pub angle: f64,
}

impl GradientFill {
    pub fn new(from: Color, to: Color, angle: f64) -> Self {
        Self { from, to, angle }
    }

    /// Color at `(u, v)` in unit box coordinates.
    pub fn sample(&self, u: f64, v: f64) -> Color {
        let rad = self.angle.to_radians();
        let (dx, dy) = (rad.cos(), rad.sin());
        // project onto the gradient axis through the box centre
        let proj = (u - 0.5) * dx + (v - 0.5) * dy;
        let extent = 0.5 * (dx.abs() + dy.abs());
        let t = if extent > 0.0 {
            (proj / extent * 0.5 + 0.5).clamp(0.0, 1.0)
        } else {
            0.0
        };
        self.from.lerp(&self.to, t as f32)
    }
}

/// Fallback palette per scene type, built from the brand colors.
pub fn palette(kind: SceneType, brand: &BrandSettings) -> GradientFill {
    let (primary, secondary, accent) = (brand.primary(), brand.secondary(), brand.accent());
    match kind {
        SceneType::Hook => GradientFill::new(primary, secondary, 135.0),
        SceneType::Intro => GradientFill::new(secondary, primary, 135.0),
        SceneType::Problem => GradientFill::new(primary.darken(0.4), primary, 90.0),
        SceneType::Solution => GradientFill::new(primary, accent, 45.0),
        SceneType::Benefit => GradientFill::new(secondary, accent, 135.0),
        SceneType::Feature => GradientFill::new(primary, secondary.darken(0.2), 90.0),
        SceneType::Testimonial => GradientFill::new(secondary.darken(0.3), secondary, 90.0),
        SceneType::Demo => GradientFill::new(primary.darken(0.2), secondary, 0.0),
        SceneType::Cta => GradientFill::new(accent, primary, 135.0),
        SceneType::Outro => GradientFill::new(primary, Color::BLACK, 90.0),
        SceneType::Other => GradientFill::new(primary, secondary, 90.0),
    }
}

/// The scene background, plus an error placeholder in debug mode when the
/// background had to fall back.
pub fn background_layers(
    scene: &Scene,
    brand: &BrandSettings,
    settings: &RenderSettings,
    local: u64,
    scene_frames: u64,
) -> Vec<PlannedLayer> {
    let fill = palette(scene.kind, brand);
    let motion = scene
        .background
        .effect
        .map(|e| motion_style(&e, local, scene_frames))
        .unwrap_or_else(LayerStyle::identity);

    let content = match scene.background.kind {
        BackgroundType::MotionGraphic => {
            let progress = if scene_frames > 0 {
                local as f64 / scene_frames as f64
            } else {
                0.0
            };
            return vec![PlannedLayer::new(
                ZIndex::Background,
                "background",
                LayerContent::MotionGraphic {
                    fill,
                    accent: brand.accent(),
                    progress,
                },
            )];
        }
        kind => {
            let url = scene.background_url();
            let status = classify(url);
            match (url, status.is_usable()) {
                (Some(url), true) if kind == BackgroundType::Video => LayerContent::Video {
                    url: url.trim().to_string(),
                    seconds: local as f64 / settings.fps.as_f64(),
                    fallback: Some(fill),
                },
                (Some(url), true) => LayerContent::Image {
                    url: url.trim().to_string(),
                    fit: Fit::Cover,
                    fallback: Some(fill),
                },
                _ => {
                    tracing::debug!(scene = %scene.id, %status, "background falls back to gradient");
                    let mut layers = vec![PlannedLayer::new(
                        ZIndex::Background,
                        "background",
                        LayerContent::Gradient(fill),
                    )
                    .with_style(motion)];
                    if settings.debug {
                        layers.push(PlannedLayer::new(
                            ZIndex::Background,
                            "error",
                            LayerContent::ErrorPlaceholder {
                                message: format!("{} background: {status}", scene.id),
                            },
                        ));
                    }
                    return layers;
                }
            }
        }
    };

    vec![PlannedLayer::new(ZIndex::Background, "background", content).with_style(motion)]
}

/// Readability scrim between the background and the copy.
///
/// An explicit overlay is honoured as given; otherwise scenes with copy get
/// a bottom gradient.
pub fn readability_layer(scene: &Scene) -> Option<PlannedLayer> {
    let (scrim, color, opacity) = match &scene.background.overlay {
        Some(overlay) => {
            let scrim = match overlay.kind {
                OverlayType::Gradient => ScrimKind::BottomGradient,
                OverlayType::Vignette => ScrimKind::Vignette,
                OverlayType::Solid => ScrimKind::Solid,
                OverlayType::None => return None,
            };
            (
                scrim,
                Color::parse_or(overlay.color.as_deref(), Color::BLACK),
                overlay.opacity.unwrap_or(DEFAULT_SCRIM_OPACITY),
            )
        }
        None if has_copy(scene) => (ScrimKind::BottomGradient, Color::BLACK, DEFAULT_SCRIM_OPACITY),
        None => return None,
    };
    let opacity = if opacity.is_finite() {
        opacity.clamp(0.0, 1.0)
    } else {
        DEFAULT_SCRIM_OPACITY
    };
    Some(
        PlannedLayer::new(ZIndex::Readability, "readability", LayerContent::Scrim { scrim, color })
            .with_style(LayerStyle::identity().with_opacity(opacity)),
    )
}

fn has_copy(scene: &Scene) -> bool {
    scene.text_overlays.iter().any(|o| !o.text.trim().is_empty())
}
