use serde::{Deserialize, Serialize};

use adreel_core::{AdreelError, AdreelResult};

use crate::audio::{DuckingKeyframe, SoundDesignConfig};
use crate::brand::{BrandInstructions, BrandSettings, EndCardConfig};
use crate::scene::Scene;
use crate::transition::TransitionDefaults;

/// Target platform; fixes the canvas size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    Tiktok,
    Instagram,
    Custom,
    #[default]
    #[serde(other)]
    Youtube,
}

impl OutputFormat {
    /// Canvas size in pixels. `Custom` has no intrinsic size and uses YouTube's.
    pub fn dimensions(&self) -> (u32, u32) {
        match self {
            OutputFormat::Youtube | OutputFormat::Custom => (1920, 1080),
            OutputFormat::Tiktok => (1080, 1920),
            OutputFormat::Instagram => (1080, 1080),
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "youtube" => Some(OutputFormat::Youtube),
            "tiktok" => Some(OutputFormat::Tiktok),
            "instagram" => Some(OutputFormat::Instagram),
            "custom" => Some(OutputFormat::Custom),
            _ => None,
        }
    }
}

/// The root input of a render: the whole video, declaratively.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CompositionProps {
    #[serde(default)]
    pub scenes: Vec<Scene>,
    #[serde(default)]
    pub voiceover_url: Option<String>,
    #[serde(default)]
    pub music_url: Option<String>,
    #[serde(default)]
    pub music_volume: Option<f64>,
    #[serde(default)]
    pub brand: BrandSettings,
    #[serde(default)]
    pub output_format: OutputFormat,
    /// Only read for `OutputFormat::Custom`.
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default)]
    pub fps: Option<u32>,
    #[serde(default)]
    pub brand_instructions: Option<BrandInstructions>,
    #[serde(default)]
    pub end_card_config: Option<EndCardConfig>,
    #[serde(default)]
    pub sound_design_config: Option<SoundDesignConfig>,
    #[serde(default)]
    pub audio_ducking_keyframes: Vec<DuckingKeyframe>,
    #[serde(default)]
    pub transitions: Option<TransitionDefaults>,
}

impl CompositionProps {
    pub fn from_json(json: &str) -> AdreelResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| AdreelError::parse(e.to_string(), e.line(), e.column()))
    }

    pub fn to_json(&self) -> AdreelResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Canvas size honoring custom dimensions when they are complete and non-zero.
    pub fn dimensions(&self) -> (u32, u32) {
        match (self.output_format, self.width, self.height) {
            (OutputFormat::Custom, Some(w), Some(h)) if w > 0 && h > 0 => (w, h),
            (format, _, _) => format.dimensions(),
        }
    }

    /// The end card, when it is configured and has enough content to show.
    pub fn active_end_card(&self) -> Option<&EndCardConfig> {
        self.end_card_config.as_ref().filter(|c| c.is_active())
    }

    pub fn sound_design(&self) -> SoundDesignConfig {
        self.sound_design_config.unwrap_or_default()
    }

    pub fn scene_count(&self) -> usize {
        self.scenes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::SceneType;

    const PROPS: &str = r##"{
        "scenes": [
            {"id": "a", "type": "hook", "duration": 4, "transitionIn": {"type": "fade", "duration": 0.5}},
            {"id": "b", "type": "cta", "duration": 3}
        ],
        "voiceoverUrl": "https://cdn/vo.mp3",
        "musicUrl": "https://cdn/music.mp3",
        "musicVolume": 0.25,
        "brand": {"primaryColor": "#112233", "logoUrl": "https://cdn/logo.png"},
        "outputFormat": "tiktok",
        "audioDuckingKeyframes": [{"frame": 0, "volume": 0.2}],
        "endCardConfig": {"headline": "Get started"}
    }"##;

    #[test]
    fn test_from_json() {
        let props = CompositionProps::from_json(PROPS).unwrap();
        assert_eq!(props.scene_count(), 2);
        assert_eq!(props.scenes[1].kind, SceneType::Cta);
        assert_eq!(props.output_format, OutputFormat::Tiktok);
        assert_eq!(props.dimensions(), (1080, 1920));
        assert_eq!(props.music_volume, Some(0.25));
        assert!(props.active_end_card().is_some());
        assert_eq!(props.active_end_card().unwrap().duration, 3.0);
    }

    #[test]
    fn test_json_round_trip() {
        let props = CompositionProps::from_json(PROPS).unwrap();
        let json = props.to_json().unwrap();
        let back = CompositionProps::from_json(&json).unwrap();
        assert_eq!(props, back);
    }

    #[test]
    fn test_empty_object_is_valid_props() {
        let props = CompositionProps::from_json("{}").unwrap();
        assert!(props.scenes.is_empty());
        assert_eq!(props.dimensions(), (1920, 1080));
        assert!(props.sound_design().enabled);
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        let err = CompositionProps::from_json("{\"scenes\": [").unwrap_err();
        assert!(matches!(err, AdreelError::Parse { .. }));
    }

    #[test]
    fn test_custom_dimensions() {
        let mut props = CompositionProps {
            output_format: OutputFormat::Custom,
            width: Some(640),
            height: Some(360),
            ..Default::default()
        };
        assert_eq!(props.dimensions(), (640, 360));
        props.height = Some(0);
        assert_eq!(props.dimensions(), (1920, 1080));
    }

    #[test]
    fn test_unknown_tags_fall_back_to_defaults() {
        let json = r#"{
            "outputFormat": "vimeo",
            "transitions": {"type": "page-curl"},
            "brand": {"watermark": {"enabled": true, "position": "middle"}},
            "scenes": [{
                "id": "a",
                "type": "teaser",
                "textOverlays": [{
                    "id": "t",
                    "text": "Hi",
                    "style": "banner",
                    "position": {"vertical": "baseline", "horizontal": "justify"}
                }]
            }]
        }"#;
        let props = CompositionProps::from_json(json).unwrap();
        assert_eq!(props.output_format, OutputFormat::Youtube);
        assert_eq!(props.dimensions(), (1920, 1080));
        assert_eq!(
            props.transitions.map(|t| t.kind),
            Some(crate::transition::TransitionType::Fade)
        );
        assert_eq!(
            props.brand.watermark.map(|w| w.position),
            Some(crate::brand::WatermarkPosition::BottomRight)
        );
        assert_eq!(props.scenes[0].kind, SceneType::Other);
        let overlay = &props.scenes[0].text_overlays[0];
        assert_eq!(overlay.style, crate::overlay::TextStyle::Body);
        assert_eq!(overlay.position.vertical, crate::overlay::VerticalAlign::Center);
        assert_eq!(overlay.position.horizontal, crate::overlay::HorizontalAlign::Center);
    }

    #[test]
    fn test_output_format_parse() {
        assert_eq!(OutputFormat::parse("Instagram"), Some(OutputFormat::Instagram));
        assert_eq!(OutputFormat::parse("vimeo"), None);
    }
}
