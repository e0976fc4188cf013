//! Brand layers: intro logo, per-scene watermark, CTA outro and the end card.

use adreel_core::{interpolate, spring, Color, LayerStyle, Point2D, Size2D, SpringConfig};
use adreel_ir::{
    usable_url, CompositionProps, HorizontalAlign, RenderSettings, SceneWindow, TextStyle,
    Timeline, WatermarkOverride, WatermarkPosition,
};

use crate::evaluate::{LayerContent, Placement, PlannedLayer, ZIndex};
use crate::image_loader::Fit;

const INTRO_LOGO_SECONDS: f64 = 2.5;
const INTRO_LOGO_FADE_SECONDS: f64 = 0.5;
const WATERMARK_MARGIN: f64 = 0.03;
const WATERMARK_SIZE: Size2D = Size2D {
    width: 0.12,
    height: 0.08,
};
const STAGGER_FADE_SECONDS: f64 = 0.4;
const END_CARD_FADE_SECONDS: f64 = 0.5;

/// Opacity of an element that starts fading in `delay` seconds after `origin`.
fn staggered(settings: &RenderSettings, local: u64, delay: f64) -> LayerStyle {
    let start = settings.frames(delay) as f64;
    let end = start + settings.frames(STAGGER_FADE_SECONDS) as f64;
    LayerStyle::identity().with_opacity(interpolate(local as f64, [start, end], [0.0, 1.0]))
}

fn first_usable<'a>(candidates: &[Option<&'a String>]) -> Option<&'a str> {
    candidates.iter().find_map(|c| usable_url(*c))
}

fn logo(url: &str, label: &'static str, z: ZIndex) -> PlannedLayer {
    PlannedLayer::new(
        z,
        label,
        LayerContent::Image {
            url: url.to_string(),
            fit: Fit::Contain,
            fallback: None,
        },
    )
}

fn text(
    z: ZIndex,
    label: &'static str,
    copy: &str,
    style: TextStyle,
    font: Option<String>,
    color: Color,
) -> PlannedLayer {
    PlannedLayer::new(
        z,
        label,
        LayerContent::Text {
            text: copy.to_string(),
            style,
            font,
            color,
            align: HorizontalAlign::Center,
            reveal: 1.0,
            max_width: 0.8,
        },
    )
}

fn non_blank(s: Option<&String>) -> Option<&str> {
    s.map(|s| s.trim()).filter(|s| !s.is_empty())
}

/// Brand layers drawn inside the scene group for `window` at `local`.
pub fn brand_layers(
    props: &CompositionProps,
    timeline: &Timeline,
    settings: &RenderSettings,
    window: &SceneWindow,
    local: u64,
) -> Vec<PlannedLayer> {
    let mut layers = Vec::new();
    let last = timeline.is_last(window.index);
    if window.index == 0 {
        layers.extend(intro_logo(props, settings, window.frames(), local));
    }
    if window.index > 0 && !last {
        layers.extend(watermark(props, window.index));
    }
    if last {
        layers.extend(cta_outro(props, settings, local));
    }
    layers
}

fn intro_logo(
    props: &CompositionProps,
    settings: &RenderSettings,
    scene_frames: u64,
    local: u64,
) -> Option<PlannedLayer> {
    let intro = props
        .brand_instructions
        .as_ref()
        .and_then(|bi| bi.intro_logo_url.as_ref());
    let url = first_usable(&[intro, props.brand.logo_url.as_ref()])?;
    let duration = settings.frames(INTRO_LOGO_SECONDS).min(scene_frames);
    if local >= duration {
        return None;
    }
    let fade = settings.frames(INTRO_LOGO_FADE_SECONDS).min(duration) as f64;
    let d = duration as f64;
    let opacity = interpolate(local as f64, [d - fade, d], [1.0, 0.0]);
    let scale = spring(local as f64, settings.fps, SpringConfig::default());
    Some(
        logo(url, "intro-logo", ZIndex::Brand)
            .with_style(LayerStyle::identity().with_opacity(opacity).with_scale(scale))
            .with_placement(Placement::centered(0.5, 0.5, Some(Size2D::new(0.3, 0.3)))),
    )
}

fn watermark(props: &CompositionProps, index: usize) -> Option<PlannedLayer> {
    let scene = props.scenes.get(index)?;
    let settings = WatermarkOverride::resolve(scene.watermark.as_ref(), props.brand.watermark.as_ref())?;
    let url = usable_url(props.brand.logo_url.as_ref())?;
    let m = WATERMARK_MARGIN;
    let (at, pivot) = match settings.position {
        WatermarkPosition::TopLeft => (Point2D::new(m, m), Point2D::new(0.0, 0.0)),
        WatermarkPosition::TopRight => (Point2D::new(1.0 - m, m), Point2D::new(1.0, 0.0)),
        WatermarkPosition::BottomLeft => (Point2D::new(m, 1.0 - m), Point2D::new(0.0, 1.0)),
        WatermarkPosition::BottomRight => (Point2D::new(1.0 - m, 1.0 - m), Point2D::new(1.0, 1.0)),
    };
    let opacity = if settings.opacity.is_finite() {
        settings.opacity.clamp(0.0, 1.0)
    } else {
        0.0
    };
    Some(
        logo(url, "watermark", ZIndex::Brand)
            .with_style(LayerStyle::identity().with_opacity(opacity))
            .with_placement(Placement::anchored(at, pivot, Some(WATERMARK_SIZE))),
    )
}

/// CTA outro on the last scene. Needs the CTA payload and a usable logo;
/// otherwise nothing is drawn.
fn cta_outro(props: &CompositionProps, settings: &RenderSettings, local: u64) -> Vec<PlannedLayer> {
    let Some(bi) = props.brand_instructions.as_ref() else {
        return Vec::new();
    };
    let Some(cta) = bi.cta.as_ref() else {
        return Vec::new();
    };
    let Some(url) = first_usable(&[bi.outro_logo_url.as_ref(), props.brand.logo_url.as_ref()])
    else {
        tracing::debug!("cta outro skipped: no usable logo");
        return Vec::new();
    };

    let brand = &props.brand;
    let mut layers = vec![logo(url, "outro-logo", ZIndex::Brand)
        .with_style(staggered(settings, local, 0.0))
        .with_placement(Placement::centered(0.5, 0.3, Some(Size2D::new(0.25, 0.2))))];
    if let Some(headline) = non_blank(cta.headline.as_ref()) {
        layers.push(
            text(
                ZIndex::Brand,
                "cta-headline",
                headline,
                TextStyle::Headline,
                brand.heading_font.clone(),
                brand.text(),
            )
            .with_style(staggered(settings, local, 0.3))
            .with_placement(Placement::centered(0.5, 0.5, None)),
        );
    }
    if let Some(subtext) = non_blank(cta.subtext.as_ref()) {
        layers.push(
            text(
                ZIndex::Brand,
                "cta-subtext",
                subtext,
                TextStyle::Subheadline,
                brand.body_font.clone(),
                brand.text(),
            )
            .with_style(staggered(settings, local, 0.6))
            .with_placement(Placement::centered(0.5, 0.6, None)),
        );
    }
    if let Some(label) = non_blank(cta.button_text.as_ref()) {
        layers.push(
            PlannedLayer::new(
                ZIndex::Brand,
                "cta-button",
                LayerContent::Button {
                    label: label.to_string(),
                    fill: brand.accent(),
                    text_color: brand.text(),
                    font: brand.heading_font.clone(),
                },
            )
            .with_style(staggered(settings, local, 0.9))
            .with_placement(Placement::centered(0.5, 0.72, Some(Size2D::new(0.28, 0.09)))),
        );
    }
    layers
}

/// End-card layers at global `frame`, drawn above the scene group.
pub fn end_card_layers(
    props: &CompositionProps,
    timeline: &Timeline,
    settings: &RenderSettings,
    frame: u64,
) -> Vec<PlannedLayer> {
    let Some(card) = props.active_end_card() else {
        return Vec::new();
    };
    let start = timeline.tail_start(settings.frames(card.duration));
    if frame < start || settings.frames(card.duration) == 0 {
        return Vec::new();
    }
    let rel = frame - start;
    let brand = &props.brand;

    let fade = settings.frames(END_CARD_FADE_SECONDS) as f64;
    let mut layers = vec![PlannedLayer::new(
        ZIndex::EndCard,
        "end-card",
        LayerContent::Solid {
            color: Color::parse_or(card.background_color.as_deref(), brand.primary()),
        },
    )
    .with_style(LayerStyle::identity().with_opacity(interpolate(rel as f64, [0.0, fade], [0.0, 1.0])))];

    if let Some(url) = first_usable(&[card.logo_url.as_ref(), brand.logo_url.as_ref()]) {
        layers.push(
            logo(url, "end-card-logo", ZIndex::EndCard)
                .with_style(staggered(settings, rel, 0.0))
                .with_placement(Placement::centered(0.5, 0.3, Some(Size2D::new(0.25, 0.2)))),
        );
    }
    if let Some(headline) = non_blank(card.headline.as_ref()) {
        layers.push(
            text(
                ZIndex::EndCard,
                "end-card-headline",
                headline,
                TextStyle::Title,
                brand.heading_font.clone(),
                brand.text(),
            )
            .with_style(staggered(settings, rel, 0.3))
            .with_placement(Placement::centered(0.5, 0.5, None)),
        );
    }
    if let Some(subtext) = non_blank(card.subtext.as_ref()) {
        layers.push(
            text(
                ZIndex::EndCard,
                "end-card-subtext",
                subtext,
                TextStyle::Subheadline,
                brand.body_font.clone(),
                brand.text(),
            )
            .with_style(staggered(settings, rel, 0.6))
            .with_placement(Placement::centered(0.5, 0.6, None)),
        );
    }
    if let Some(url) = non_blank(card.url.as_ref()) {
        layers.push(
            text(
                ZIndex::EndCard,
                "end-card-url",
                url,
                TextStyle::Caption,
                brand.body_font.clone(),
                brand.accent(),
            )
            .with_style(staggered(settings, rel, 0.9))
            .with_placement(Placement::centered(0.5, 0.72, None)),
        );
    }
    layers
}

#[cfg(test)]
mod tests {
    use super::*;
    use adreel_ir::{
        BrandInstructions, BrandSettings, CtaPayload, EndCardConfig, Scene, SceneType,
        WatermarkSettings,
    };

    fn three_scenes() -> CompositionProps {
        CompositionProps {
            scenes: vec![
                Scene::new("a", SceneType::Hook, 3.0),
                Scene::new("b", SceneType::Benefit, 3.0),
                Scene::new("c", SceneType::Cta, 3.0),
            ],
            brand: BrandSettings {
                logo_url: Some("https://cdn/logo.png".into()),
                watermark: Some(WatermarkSettings::default()),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    fn layers_at(props: &CompositionProps, index: usize, local: u64) -> Vec<PlannedLayer> {
        let settings = RenderSettings::from_props(props);
        let timeline = Timeline::build(props, &settings);
        let window = timeline.window(index).unwrap().clone();
        brand_layers(props, &timeline, &settings, &window, local)
    }

    fn labels(layers: &[PlannedLayer]) -> Vec<&'static str> {
        layers.iter().map(|l| l.label).collect()
    }

    #[test]
    fn test_intro_logo_on_first_scene_only() {
        let props = three_scenes();
        assert_eq!(labels(&layers_at(&props, 0, 10)), vec!["intro-logo"]);
        assert!(layers_at(&props, 0, 75).is_empty());
        assert!(!labels(&layers_at(&props, 1, 10)).contains(&"intro-logo"));
    }

    #[test]
    fn test_intro_logo_prefers_instruction_url() {
        let mut props = three_scenes();
        props.brand_instructions = Some(BrandInstructions {
            intro_logo_url: Some("https://cdn/intro.png".into()),
            ..Default::default()
        });
        match &layers_at(&props, 0, 10)[0].content {
            LayerContent::Image { url, .. } => assert_eq!(url, "https://cdn/intro.png"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_intro_logo_fades_before_leaving() {
        let props = three_scenes();
        let visible = &layers_at(&props, 0, 30)[0];
        assert_eq!(visible.style.opacity, 1.0);
        let fading = &layers_at(&props, 0, 70)[0];
        assert!(fading.style.opacity < 1.0 && fading.style.opacity > 0.0);
    }

    #[test]
    fn test_watermark_on_middle_scenes() {
        let props = three_scenes();
        let layers = layers_at(&props, 1, 10);
        assert_eq!(labels(&layers), vec!["watermark"]);
        assert!((layers[0].style.opacity - 0.6).abs() < 1e-9);
        assert_eq!(layers[0].placement.pivot, Point2D::new(1.0, 1.0));
    }

    #[test]
    fn test_watermark_scene_override() {
        let mut props = three_scenes();
        props.scenes[1].watermark = Some(WatermarkOverride {
            enabled: Some(false),
            ..Default::default()
        });
        assert!(layers_at(&props, 1, 10).is_empty());

        props.brand.watermark = None;
        props.scenes[1].watermark = Some(WatermarkOverride {
            enabled: Some(true),
            position: Some(WatermarkPosition::TopLeft),
            opacity: Some(0.3),
        });
        let layers = layers_at(&props, 1, 10);
        assert_eq!(layers[0].placement.at, Point2D::new(0.03, 0.03));
        assert!((layers[0].style.opacity - 0.3).abs() < 1e-9);
    }

    #[test]
    fn test_cta_outro_requires_payload_and_logo() {
        let mut props = three_scenes();
        assert!(layers_at(&props, 2, 60).is_empty());

        props.brand_instructions = Some(BrandInstructions {
            cta: Some(CtaPayload {
                headline: Some("Shop now".into()),
                subtext: Some("Free shipping".into()),
                button_text: Some("Buy".into()),
                url: None,
            }),
            ..Default::default()
        });
        let layers = layers_at(&props, 2, 60);
        assert_eq!(
            labels(&layers),
            vec!["outro-logo", "cta-headline", "cta-subtext", "cta-button"]
        );
        assert!(layers.iter().all(|l| l.style.opacity == 1.0));

        let early = layers_at(&props, 2, 9);
        assert!(early[0].style.opacity > 0.0);
        assert_eq!(early[1].style.opacity, 0.0);

        props.brand.logo_url = Some("/local/logo.png".into());
        assert!(layers_at(&props, 2, 60).is_empty());
    }

    #[test]
    fn test_end_card_tail_and_stagger() {
        let mut props = three_scenes();
        props.end_card_config = Some(EndCardConfig {
            headline: Some("Thanks".into()),
            url: Some("example.com".into()),
            background_color: Some("#000000".into()),
            ..Default::default()
        });
        let settings = RenderSettings::from_props(&props);
        let timeline = Timeline::build(&props, &settings);
        assert_eq!(timeline.total_frames(), 270);
        assert!(end_card_layers(&props, &timeline, &settings, 179).is_empty());

        let start = end_card_layers(&props, &timeline, &settings, 180);
        assert_eq!(start[0].label, "end-card");
        assert_eq!(start[0].style.opacity, 0.0);
        assert_eq!(start[0].content, LayerContent::Solid { color: Color::BLACK });

        let settled = end_card_layers(&props, &timeline, &settings, 269);
        assert_eq!(
            labels(&settled),
            vec!["end-card", "end-card-logo", "end-card-headline", "end-card-url"]
        );
        assert!(settled.iter().all(|l| l.style.opacity == 1.0));
        assert!(settled.iter().all(|l| l.z == ZIndex::EndCard));
    }

    #[test]
    fn test_end_card_inactive_without_headline() {
        let mut props = three_scenes();
        props.end_card_config = Some(EndCardConfig {
            headline: Some("   ".into()),
            ..Default::default()
        });
        let settings = RenderSettings::from_props(&props);
        let timeline = Timeline::build(&props, &settings);
        assert!(end_card_layers(&props, &timeline, &settings, 260).is_empty());
    }
}
