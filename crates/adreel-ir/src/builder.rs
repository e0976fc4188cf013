use crate::audio::{DuckingKeyframe, SoundCue, SoundDesign, SoundDesignConfig};
use crate::brand::{BrandInstructions, BrandSettings, EndCardConfig, WatermarkOverride};
use crate::composition::{CompositionProps, OutputFormat};
use crate::overlay::TextOverlay;
use crate::scene::{BackgroundEffect, BackgroundOverlay, BackgroundType, Scene, SceneType};
use crate::transition::{TransitionDefaults, TransitionSpec};

/// A builder for constructing `CompositionProps` programmatically.
/// Useful for hosts, benches and unit tests.
pub struct CompositionBuilder {
    props: CompositionProps,
}

impl CompositionBuilder {
    pub fn new(format: OutputFormat) -> Self {
        Self {
            props: CompositionProps {
                output_format: format,
                ..Default::default()
            },
        }
    }

    pub fn fps(&mut self, fps: u32) -> &mut Self {
        self.props.fps = Some(fps);
        self
    }

    /// Add a scene. Scenes play in insertion order.
    pub fn add_scene(&mut self, scene: Scene) -> &mut Self {
        self.props.scenes.push(scene);
        self
    }

    pub fn voiceover(&mut self, url: impl Into<String>) -> &mut Self {
        self.props.voiceover_url = Some(url.into());
        self
    }

    pub fn music(&mut self, url: impl Into<String>, volume: Option<f64>) -> &mut Self {
        self.props.music_url = Some(url.into());
        self.props.music_volume = volume;
        self
    }

    pub fn brand(&mut self, brand: BrandSettings) -> &mut Self {
        self.props.brand = brand;
        self
    }

    pub fn brand_instructions(&mut self, instructions: BrandInstructions) -> &mut Self {
        self.props.brand_instructions = Some(instructions);
        self
    }

    pub fn end_card(&mut self, card: EndCardConfig) -> &mut Self {
        self.props.end_card_config = Some(card);
        self
    }

    pub fn sound_design(&mut self, config: SoundDesignConfig) -> &mut Self {
        self.props.sound_design_config = Some(config);
        self
    }

    pub fn ducking_keyframe(&mut self, frame: u64, volume: f64) -> &mut Self {
        self.props
            .audio_ducking_keyframes
            .push(DuckingKeyframe::new(frame, volume));
        self
    }

    pub fn default_transition(&mut self, defaults: TransitionDefaults) -> &mut Self {
        self.props.transitions = Some(defaults);
        self
    }

    pub fn build(&mut self) -> CompositionProps {
        std::mem::take(&mut self.props)
    }
}

/// A builder for a single scene.
pub struct SceneBuilder {
    scene: Scene,
}

impl SceneBuilder {
    pub fn new(id: impl Into<String>, kind: SceneType, duration: f64) -> Self {
        Self {
            scene: Scene::new(id, kind, duration),
        }
    }

    pub fn image(&mut self, url: impl Into<String>) -> &mut Self {
        self.scene.background.kind = BackgroundType::Image;
        self.scene.assets.image_url = Some(url.into());
        self
    }

    pub fn video(&mut self, url: impl Into<String>) -> &mut Self {
        self.scene.background.kind = BackgroundType::Video;
        self.scene.assets.video_url = Some(url.into());
        self
    }

    pub fn motion_graphic(&mut self) -> &mut Self {
        self.scene.background.kind = BackgroundType::MotionGraphic;
        self
    }

    pub fn effect(&mut self, effect: BackgroundEffect) -> &mut Self {
        self.scene.background.effect = Some(effect);
        self
    }

    pub fn overlay(&mut self, overlay: BackgroundOverlay) -> &mut Self {
        self.scene.background.overlay = Some(overlay);
        self
    }

    pub fn product(&mut self, url: impl Into<String>) -> &mut Self {
        self.scene.assets.product_overlay_url = Some(url.into());
        self.scene.assets.use_product_overlay = Some(true);
        self
    }

    /// Add a caption. First added is drawn first (back).
    pub fn text(&mut self, overlay: TextOverlay) -> &mut Self {
        self.scene.text_overlays.push(overlay);
        self
    }

    pub fn transition_in(&mut self, spec: TransitionSpec) -> &mut Self {
        self.scene.transition_in = Some(spec);
        self
    }

    pub fn transition_out(&mut self, spec: TransitionSpec) -> &mut Self {
        self.scene.transition_out = Some(spec);
        self
    }

    pub fn sfx_in(&mut self, cue: SoundCue) -> &mut Self {
        self.sound().transition_in = Some(cue);
        self
    }

    pub fn sfx_out(&mut self, cue: SoundCue) -> &mut Self {
        self.sound().transition_out = Some(cue);
        self
    }

    pub fn ambience(&mut self, cue: SoundCue) -> &mut Self {
        self.sound().ambience = Some(cue);
        self
    }

    pub fn emphasis(&mut self, cue: SoundCue) -> &mut Self {
        self.sound().emphasis.push(cue);
        self
    }

    pub fn watermark(&mut self, watermark: WatermarkOverride) -> &mut Self {
        self.scene.watermark = Some(watermark);
        self
    }

    fn sound(&mut self) -> &mut SoundDesign {
        self.scene.sound_design.get_or_insert_with(SoundDesign::default)
    }

    pub fn build(&mut self) -> Scene {
        std::mem::take(&mut self.scene)
    }
}
