//! Product overlay: a cut-out product shot layered over the background.

use adreel_core::{interpolate, spring, Easing, LayerStyle, Point2D, Size2D, SpringConfig};
use adreel_ir::{usable_url, RenderSettings, Scene, SceneType};

use crate::evaluate::{LayerContent, Placement, PlannedLayer, ZIndex};
use crate::image_loader::Fit;

const ENTRANCE_SECONDS: f64 = 0.6;
const EXIT_SECONDS: f64 = 0.5;
const REVEAL_FADE_SECONDS: f64 = 1.0;

/// Product overlay for `scene`, if it opted in and has a usable URL.
pub fn product_layer(
    scene: &Scene,
    settings: &RenderSettings,
    local: u64,
    scene_frames: u64,
) -> Option<PlannedLayer> {
    if !scene.wants_product_overlay() {
        return None;
    }
    let Some(url) = usable_url(scene.assets.product_overlay_url.as_ref()) else {
        tracing::debug!(scene = %scene.id, "product overlay requested without a usable url");
        return None;
    };
    let content = LayerContent::Image {
        url: url.to_string(),
        fit: Fit::Contain,
        fallback: None,
    };

    let layer = if scene.kind.uses_product_reveal() {
        let scale = spring(local as f64, settings.fps, SpringConfig::default());
        let fade = settings.frames(REVEAL_FADE_SECONDS) as f64;
        let opacity = interpolate(local as f64, [0.0, fade], [0.0, 1.0]);
        PlannedLayer::new(ZIndex::Product, "product", content)
            .with_style(LayerStyle::identity().with_opacity(opacity).with_scale(scale))
            .with_placement(Placement::centered(0.5, 0.5, Some(Size2D::new(0.4, 0.4))))
    } else {
        PlannedLayer::new(ZIndex::Product, "product", content)
            .with_style(simple_style(scene.kind, settings, local, scene_frames))
            .with_placement(Placement::anchored(
                Point2D::new(0.95, 0.5),
                Point2D::new(1.0, 0.5),
                Some(Size2D::new(0.35, 0.5)),
            ))
    };
    Some(layer)
}

/// Entrance by scene type, then a fade out over the scene's last half second.
fn simple_style(kind: SceneType, settings: &RenderSettings, local: u64, scene_frames: u64) -> LayerStyle {
    let entrance = settings.frames(ENTRANCE_SECONDS).min(scene_frames);
    let e = if entrance > 0 && local < entrance {
        Easing::CubicOut.apply(local as f64 / entrance as f64)
    } else {
        1.0
    };
    let mut style = match kind {
        SceneType::Benefit => LayerStyle::identity()
            .with_opacity(e)
            .with_translate(0.1 * (1.0 - e), 0.0),
        SceneType::Feature => LayerStyle::identity()
            .with_opacity(e)
            .with_scale(0.8 + 0.2 * e),
        _ => LayerStyle::identity().with_opacity(e),
    };

    let exit = settings.frames(EXIT_SECONDS).min(scene_frames);
    let exit_start = scene_frames - exit;
    if exit > 0 && local >= exit_start {
        let t = (local - exit_start) as f64 / exit as f64;
        style.opacity *= 1.0 - Easing::CubicIn.apply(t);
    }
    style
}
