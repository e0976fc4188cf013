use adreel_core::{hash, Color, FrameBuffer};
use adreel_ir::{
    classify, AssetStatus, BrandSettings, CompositionBuilder, CompositionProps, EndCardConfig,
    OutputFormat, RenderSettings, Scene, SceneBuilder, SceneType, TextOverlay, TextStyle,
    Timeline, TransitionDefaults, TransitionSpec, TransitionType,
};
use adreel_render::audio::music_volume_at;
use adreel_render::{
    evaluate_frame, LayerContent, NoAssets, PreloadedAssets, RenderPipeline, ZIndex,
};

fn settings_for(props: &CompositionProps) -> RenderSettings {
    RenderSettings::from_props(props).with_size(48, 27)
}

fn sample_props() -> CompositionProps {
    let mut builder = CompositionBuilder::new(OutputFormat::Youtube);
    builder
        .voiceover("https://cdn.example.com/vo.mp3")
        .music("https://cdn.example.com/bed.mp3", Some(0.5))
        .default_transition(TransitionDefaults {
            kind: TransitionType::Fade,
            duration: Some(0.4),
        })
        .add_scene(
            SceneBuilder::new("hook", SceneType::Hook, 2.0)
                .image("https://cdn.example.com/hook.jpg")
                .text(TextOverlay::new("t1", "Stop scrolling", TextStyle::Title))
                .text(TextOverlay::new("t2", "You need this", TextStyle::Body))
                .build(),
        )
        .add_scene(
            SceneBuilder::new("demo", SceneType::Demo, 2.0)
                .image("/local/path.png")
                .text(TextOverlay::new("t3", "Works anywhere", TextStyle::Headline))
                .build(),
        )
        .add_scene(SceneBuilder::new("cta", SceneType::Cta, 2.0).build());
    builder.build()
}

#[test]
fn test_total_duration_is_sum_of_scenes() {
    let props = sample_props();
    let settings = settings_for(&props);
    let timeline = Timeline::build(&props, &settings);
    assert_eq!(timeline.total_frames(), 180);
    let starts: Vec<u64> = timeline.windows().iter().map(|w| w.start).collect();
    assert_eq!(starts, vec![0, 60, 120]);
}

#[test]
fn test_short_composition_padded_to_minimum() {
    let props = CompositionProps {
        scenes: vec![Scene::new("blip", SceneType::Hook, 0.2)],
        ..Default::default()
    };
    let settings = settings_for(&props);
    let timeline = Timeline::build(&props, &settings);
    assert_eq!(timeline.content_frames(), 6);
    assert_eq!(timeline.total_frames(), 30);
}

#[test]
fn test_fade_in_hook_scenario() {
    let mut hook = Scene::new("hook", SceneType::Hook, 4.0);
    hook.transition_in = Some(TransitionSpec::new(TransitionType::Fade, 0.5));
    let props = CompositionProps {
        scenes: vec![hook],
        ..Default::default()
    };
    let settings = settings_for(&props);
    let timeline = Timeline::build(&props, &settings);
    assert_eq!(timeline.total_frames(), 120);

    let opacity = |f: u64| {
        evaluate_frame(&props, &timeline, &settings, f)
            .unwrap()
            .scene
            .unwrap()
            .transition
            .opacity
    };
    assert_eq!(opacity(0), 0.0);
    for f in 1..15 {
        assert!(opacity(f) > opacity(f - 1));
    }
    assert_eq!(opacity(60), 1.0);
}

#[test]
fn test_every_later_scene_starts_hidden_under_default_fade() {
    let props = sample_props();
    let settings = settings_for(&props);
    let timeline = Timeline::build(&props, &settings);
    for window in timeline.windows().iter().skip(1) {
        let plan = evaluate_frame(&props, &timeline, &settings, window.start).unwrap();
        assert_eq!(plan.scene.unwrap().transition.opacity, 0.0);
    }
    let first = evaluate_frame(&props, &timeline, &settings, 0).unwrap();
    assert_eq!(first.scene.unwrap().transition.opacity, 1.0);
}

#[test]
fn test_non_http_urls_fall_back_to_palette() {
    for url in ["/local/path.png", "data:image/png;base64,AAAA", "blob:xyz", "ftp://x/a.png"] {
        assert_ne!(classify(Some(url)), AssetStatus::Valid, "{url}");
    }

    let props = sample_props();
    let settings = settings_for(&props);
    let timeline = Timeline::build(&props, &settings);
    let plan = evaluate_frame(&props, &timeline, &settings, 90).unwrap();
    let scene = plan.scene.unwrap();
    assert_eq!(scene.scene_id, "demo");
    let bg = scene.layer("background").unwrap();
    assert_eq!(bg.z, ZIndex::Background);
    assert!(matches!(bg.content, LayerContent::Gradient(_)));

    let pipeline = RenderPipeline::new(props, settings);
    assert!(pipeline.render_frame(90, &NoAssets).is_ok());
}

#[test]
fn test_music_ducked_under_valid_voiceover() {
    let props = sample_props();
    let settings = settings_for(&props);
    let timeline = Timeline::build(&props, &settings);
    let ducked = 0.5 * settings.audio.ducking_ratio;
    for f in 0..timeline.total_frames() {
        assert!((music_volume_at(&props, &settings, f) - ducked).abs() < 1e-12);
    }
    assert!(ducked < 0.5);
}

#[test]
fn test_music_not_ducked_with_invalid_voiceover() {
    let mut props = sample_props();
    props.voiceover_url = Some("file:///tmp/vo.mp3".into());
    let settings = settings_for(&props);
    let timeline = Timeline::build(&props, &settings);
    for f in 0..timeline.total_frames() {
        assert_eq!(music_volume_at(&props, &settings, f), 0.5);
    }
}

#[test]
fn test_render_is_idempotent() {
    let props = sample_props();
    let settings = settings_for(&props);
    let pipeline = RenderPipeline::new(props, settings);
    let mut assets = PreloadedAssets::new();
    assets.insert_image(
        "https://cdn.example.com/hook.jpg",
        FrameBuffer::solid(16, 9, &Color::from_rgb8(200, 40, 40)),
    );

    for frame in [0, 7, 59, 60, 119, 179] {
        let a = pipeline.render_frame(frame, &assets).unwrap();
        let b = pipeline.render_frame(frame, &assets).unwrap();
        assert_eq!(hash::hash_frame(&a.image), hash::hash_frame(&b.image));
        assert_eq!(a.audio, b.audio);
    }

    let whole = pipeline.render(&assets).unwrap();
    let again = pipeline.render(&assets).unwrap();
    assert_eq!(whole.content_hash(), again.content_hash());
}

#[test]
fn test_plan_is_order_independent() {
    let props = sample_props();
    let settings = settings_for(&props);
    let timeline = Timeline::build(&props, &settings);
    let forward: Vec<_> = (0..180)
        .map(|f| evaluate_frame(&props, &timeline, &settings, f).unwrap())
        .collect();
    for f in (0..180).rev() {
        let plan = evaluate_frame(&props, &timeline, &settings, f).unwrap();
        assert_eq!(plan, forward[f as usize]);
    }
}

#[test]
fn test_end_card_drawn_above_last_scene() {
    let mut props = sample_props();
    props.brand = BrandSettings {
        primary_color: Some("#102030".into()),
        ..Default::default()
    };
    props.end_card_config = Some(EndCardConfig {
        headline: Some("See you".into()),
        duration: 1.0,
        background_color: Some("#00ff00".into()),
        ..Default::default()
    });
    let settings = settings_for(&props);
    let pipeline = RenderPipeline::new(props, settings);
    let frame = pipeline.render_frame(179, &NoAssets).unwrap();
    assert!(frame
        .image
        .data
        .chunks_exact(4)
        .all(|p| p == [0, 255, 0, 255]));
    let before = pipeline.plan(149).unwrap();
    assert!(before.overlays.is_empty());
}

#[test]
fn test_frame_outside_composition_is_error() {
    let props = sample_props();
    let settings = settings_for(&props);
    let timeline = Timeline::build(&props, &settings);
    assert!(evaluate_frame(&props, &timeline, &settings, 180).is_err());
}

#[test]
fn test_huge_durations_render_without_overflow() {
    let props = CompositionProps::from_json(
        r#"{
            "voiceoverUrl": "https://cdn.example.com/vo.mp3",
            "endCardConfig": {"headline": "Bye", "duration": 1e300},
            "scenes": [
                {"id": "a", "type": "testimonial", "duration": 1e300,
                 "textOverlays": [{"id": "q", "text": "Loved it", "timing": {"startAt": 1, "duration": 1e300}}]},
                {"id": "b", "type": "cta", "duration": 1e300}
            ]
        }"#,
    )
    .unwrap();
    let settings = settings_for(&props);
    let pipeline = RenderPipeline::new(props, settings);
    assert_eq!(pipeline.total_frames(), u64::MAX);

    let plan = pipeline.plan(40).unwrap();
    assert_eq!(plan.scene.as_ref().map(|s| s.scene_id.as_str()), Some("a"));
    assert!(pipeline.audio_plan(40).is_ok());
    assert!(pipeline.render_frame(40, &NoAssets).is_ok());
}
