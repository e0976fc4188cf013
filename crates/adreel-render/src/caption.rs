//! Scene copy: the lower third for hook-style scenes and positioned
//! overlays for everything else.

use adreel_core::{Easing, LayerStyle, Point2D, Size2D};
use adreel_ir::{
    BrandSettings, HorizontalAlign, RenderSettings, Scene, TextOverlay, VerticalAlign,
};

use crate::evaluate::{LayerContent, Placement, PlannedLayer, ZIndex};
use crate::text_anim::{text_frame, TextFrame, TextPhase};

const LOWER_THIRD_ENTER_SECONDS: f64 = 0.5;
const LOWER_THIRD_EXIT_SECONDS: f64 = 0.5;
const LOWER_THIRD_SLIDE: f64 = 0.3;

/// Copy layers for `scene` at `local`.
pub fn text_layers(
    scene: &Scene,
    brand: &BrandSettings,
    settings: &RenderSettings,
    local: u64,
    scene_frames: u64,
) -> Vec<PlannedLayer> {
    if scene.kind.uses_lower_third() {
        lower_third(scene, brand, settings, local, scene_frames)
            .into_iter()
            .collect()
    } else {
        scene
            .text_overlays
            .iter()
            .filter_map(|o| positioned(o, brand, settings, local, scene_frames))
            .collect()
    }
}

fn lower_third(
    scene: &Scene,
    brand: &BrandSettings,
    settings: &RenderSettings,
    local: u64,
    scene_frames: u64,
) -> Option<PlannedLayer> {
    let headline = scene.text_overlays.first()?.text.trim().to_string();
    let subtext = scene
        .text_overlays
        .get(1)
        .map(|o| o.text.trim().to_string())
        .filter(|t| !t.is_empty());
    if headline.is_empty() && subtext.is_none() {
        return None;
    }

    let enter = settings.frames(LOWER_THIRD_ENTER_SECONDS).min(scene_frames);
    let mut style = if enter > 0 && local < enter {
        let e = Easing::CubicOut.apply(local as f64 / enter as f64);
        LayerStyle::identity()
            .with_opacity(e)
            .with_translate(-LOWER_THIRD_SLIDE * (1.0 - e), 0.0)
    } else {
        LayerStyle::identity()
    };
    let exit = settings.frames(LOWER_THIRD_EXIT_SECONDS).min(scene_frames);
    let exit_start = scene_frames - exit;
    if exit > 0 && local >= exit_start {
        let t = (local - exit_start) as f64 / exit as f64;
        style.opacity *= 1.0 - Easing::CubicIn.apply(t);
    }

    let content = LayerContent::LowerThird {
        headline,
        subtext,
        accent: brand.accent(),
        text_color: brand.text(),
        heading_font: brand.heading_font.clone(),
        body_font: brand.body_font.clone(),
    };
    Some(
        PlannedLayer::new(ZIndex::Text, "lower-third", content)
            .with_style(style)
            .with_placement(Placement::anchored(
                Point2D::new(0.06, 0.85),
                Point2D::new(0.0, 1.0),
                Some(Size2D::new(0.6, 0.18)),
            )),
    )
}

/// Visible over `[start, start + duration]`, inclusive at both ends.
fn positioned(
    overlay: &TextOverlay,
    brand: &BrandSettings,
    settings: &RenderSettings,
    local: u64,
    scene_frames: u64,
) -> Option<PlannedLayer> {
    if overlay.text.trim().is_empty() {
        return None;
    }
    let start = settings.frames(overlay.timing.start_at);
    let duration = match overlay.timing.duration {
        Some(d) => settings.frames(d),
        None => scene_frames.saturating_sub(start),
    };
    let end = start.saturating_add(duration);
    if local < start || local > end {
        return None;
    }

    let anim = settings.frames(overlay.animation.duration);
    let mut frame = TextFrame {
        style: LayerStyle::identity(),
        reveal: 1.0,
    };
    if anim > 0 && local - start < anim {
        let t = (local - start) as f64 / anim as f64;
        frame = text_frame(overlay.animation.enter, t, TextPhase::Enter);
    }
    let exit_start = end.saturating_sub(anim);
    if anim > 0 && local >= exit_start && local > start {
        let t = (local - exit_start) as f64 / anim as f64;
        let exit = text_frame(overlay.animation.exit, t, TextPhase::Exit);
        frame.style = frame.style.compose(&exit.style);
        frame.reveal = frame.reveal.min(exit.reveal);
    }

    let (width, height) = (settings.width.max(1) as f64, settings.height.max(1) as f64);
    let pad_x = (overlay.position.padding / width).clamp(0.0, 0.5);
    let pad_y = (overlay.position.padding / height).clamp(0.0, 0.5);
    let (x, px) = match overlay.position.horizontal {
        HorizontalAlign::Left => (pad_x, 0.0),
        HorizontalAlign::Center => (0.5, 0.5),
        HorizontalAlign::Right => (1.0 - pad_x, 1.0),
    };
    let (y, py) = match overlay.position.vertical {
        VerticalAlign::Top => (pad_y, 0.0),
        VerticalAlign::Center => (0.5, 0.5),
        VerticalAlign::Bottom => (1.0 - pad_y, 1.0),
    };

    let font = if overlay.style.is_heading() {
        brand.heading_font.clone()
    } else {
        brand.body_font.clone()
    };
    let content = LayerContent::Text {
        text: overlay.text.clone(),
        style: overlay.style,
        font,
        color: brand.text(),
        align: overlay.position.horizontal,
        reveal: frame.reveal,
        max_width: 1.0 - 2.0 * pad_x,
    };
    Some(
        PlannedLayer::new(ZIndex::Text, "text", content)
            .with_style(frame.style)
            .with_placement(Placement::anchored(
                Point2D::new(x, y),
                Point2D::new(px, py),
                None,
            )),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use adreel_ir::{SceneType, TextAnimation, TextStyle};

    fn settings() -> RenderSettings {
        RenderSettings::default()
    }

    #[test]
    fn test_lower_third_from_first_two_overlays() {
        let mut scene = Scene::new("h", SceneType::Hook, 3.0);
        scene.text_overlays.push(TextOverlay::new("1", "Headline", TextStyle::Title));
        scene.text_overlays.push(TextOverlay::new("2", "Sub", TextStyle::Body));
        scene.text_overlays.push(TextOverlay::new("3", "Ignored", TextStyle::Body));
        let layers = text_layers(&scene, &BrandSettings::default(), &settings(), 45, 90);
        assert_eq!(layers.len(), 1);
        match &layers[0].content {
            LayerContent::LowerThird { headline, subtext, .. } => {
                assert_eq!(headline, "Headline");
                assert_eq!(subtext.as_deref(), Some("Sub"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_lower_third_absent_without_overlays() {
        let scene = Scene::new("h", SceneType::Benefit, 3.0);
        assert!(text_layers(&scene, &BrandSettings::default(), &settings(), 45, 90).is_empty());
    }

    #[test]
    fn test_lower_third_slides_in() {
        let mut scene = Scene::new("h", SceneType::Feature, 3.0);
        scene.text_overlays.push(TextOverlay::new("1", "Fast", TextStyle::Headline));
        let first = &text_layers(&scene, &BrandSettings::default(), &settings(), 0, 90)[0];
        assert_eq!(first.style.opacity, 0.0);
        assert!((first.style.translate.x + 0.3).abs() < 1e-9);
        let settled = &text_layers(&scene, &BrandSettings::default(), &settings(), 30, 90)[0];
        assert!(settled.style.is_identity());
    }

    #[test]
    fn test_overlay_visibility_window_inclusive() {
        let mut scene = Scene::new("d", SceneType::Demo, 5.0);
        scene.text_overlays.push(
            TextOverlay::new("1", "Window", TextStyle::Body)
                .with_timing(1.0, Some(2.0))
                .with_animation(TextAnimation::None, TextAnimation::None),
        );
        let at = |f| text_layers(&scene, &BrandSettings::default(), &settings(), f, 150).len();
        assert_eq!(at(29), 0);
        assert_eq!(at(30), 1);
        assert_eq!(at(90), 1);
        assert_eq!(at(91), 0);
    }

    #[test]
    fn test_overlay_with_huge_duration_stays_visible() {
        let mut scene = Scene::new("t", SceneType::Testimonial, 5.0);
        scene
            .text_overlays
            .push(TextOverlay::new("1", "Forever", TextStyle::Quote).with_timing(1.0, Some(1e300)));
        let at = |f| text_layers(&scene, &BrandSettings::default(), &settings(), f, 150);
        assert!(at(29).is_empty());
        let layers = at(40);
        assert_eq!(layers.len(), 1);
        assert_eq!(layers[0].style.opacity, 1.0);
    }

    #[test]
    fn test_overlay_defaults_to_rest_of_scene() {
        let mut scene = Scene::new("d", SceneType::Problem, 2.0);
        scene
            .text_overlays
            .push(TextOverlay::new("1", "Stay", TextStyle::Body).with_timing(0.5, None));
        let at = |f| text_layers(&scene, &BrandSettings::default(), &settings(), f, 60).len();
        assert_eq!(at(14), 0);
        assert_eq!(at(59), 1);
    }

    #[test]
    fn test_overlay_enter_and_exit() {
        let mut scene = Scene::new("d", SceneType::Solution, 4.0);
        scene.text_overlays.push(
            TextOverlay::new("1", "Hi", TextStyle::Body)
                .with_timing(0.0, Some(2.0))
                .with_animation(TextAnimation::Fade, TextAnimation::Fade),
        );
        let opacity = |f| text_layers(&scene, &BrandSettings::default(), &settings(), f, 120)[0].style.opacity;
        assert_eq!(opacity(0), 0.0);
        assert_eq!(opacity(30), 1.0);
        assert!(opacity(50) < 1.0);
        assert!(opacity(60).abs() < 1e-9);
    }

    #[test]
    fn test_overlay_placement_uses_padding() {
        let mut scene = Scene::new("d", SceneType::Demo, 2.0);
        scene.text_overlays.push(
            TextOverlay::new("1", "Corner", TextStyle::Caption)
                .with_position(VerticalAlign::Top, HorizontalAlign::Right),
        );
        let s = settings().with_size(1000, 500);
        let layer = &text_layers(&scene, &BrandSettings::default(), &s, 30, 60)[0];
        assert!((layer.placement.at.x - 0.94).abs() < 1e-9);
        assert!((layer.placement.at.y - 0.12).abs() < 1e-9);
        assert_eq!(layer.placement.pivot, Point2D::new(1.0, 0.0));
    }

    #[test]
    fn test_heading_styles_use_heading_font() {
        let mut scene = Scene::new("d", SceneType::Demo, 2.0);
        scene.text_overlays.push(TextOverlay::new("1", "Big", TextStyle::Title));
        let brand = BrandSettings {
            heading_font: Some("Display".into()),
            body_font: Some("Body".into()),
            ..Default::default()
        };
        let layer = &text_layers(&scene, &brand, &settings(), 30, 60)[0];
        match &layer.content {
            LayerContent::Text { font, .. } => assert_eq!(font.as_deref(), Some("Display")),
            other => panic!("unexpected {other:?}"),
        }
    }
}
