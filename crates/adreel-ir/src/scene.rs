use serde::{Deserialize, Serialize};

use crate::audio::SoundDesign;
use crate::brand::WatermarkOverride;
use crate::overlay::TextOverlay;
use crate::transition::TransitionSpec;

/// Narrative role of a scene. Drives the fallback palette, the text family
/// and the product-overlay treatment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum SceneType {
    Hook,
    Intro,
    Problem,
    Solution,
    Benefit,
    Feature,
    Testimonial,
    Demo,
    Cta,
    Outro,
    #[default]
    #[serde(other)]
    Other,
}

impl SceneType {
    /// Scenes that present their copy as a lower third instead of positioned overlays.
    pub fn uses_lower_third(&self) -> bool {
        matches!(
            self,
            SceneType::Hook | SceneType::Benefit | SceneType::Feature | SceneType::Intro
        )
    }

    /// Scenes whose product overlay gets the full "reveal" treatment.
    pub fn uses_product_reveal(&self) -> bool {
        matches!(self, SceneType::Intro | SceneType::Cta)
    }

    pub fn label(&self) -> &'static str {
        match self {
            SceneType::Hook => "hook",
            SceneType::Intro => "intro",
            SceneType::Problem => "problem",
            SceneType::Solution => "solution",
            SceneType::Benefit => "benefit",
            SceneType::Feature => "feature",
            SceneType::Testimonial => "testimonial",
            SceneType::Demo => "demo",
            SceneType::Cta => "cta",
            SceneType::Outro => "outro",
            SceneType::Other => "other",
        }
    }
}

impl std::fmt::Display for SceneType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum BackgroundType {
    #[default]
    Image,
    Video,
    MotionGraphic,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum EffectType {
    KenBurns,
    Zoom,
    Pan,
    Parallax,
    #[default]
    #[serde(other)]
    None,
}

impl EffectType {
    pub const ALL: [EffectType; 5] = [
        EffectType::KenBurns,
        EffectType::Zoom,
        EffectType::Pan,
        EffectType::Parallax,
        EffectType::None,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            EffectType::KenBurns => "ken-burns",
            EffectType::Zoom => "zoom",
            EffectType::Pan => "pan",
            EffectType::Parallax => "parallax",
            EffectType::None => "none",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum EffectIntensity {
    Subtle,
    Strong,
    #[default]
    #[serde(other)]
    Medium,
}

impl EffectIntensity {
    pub fn amount(&self) -> f64 {
        match self {
            EffectIntensity::Subtle => 0.05,
            EffectIntensity::Medium => 0.1,
            EffectIntensity::Strong => 0.15,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum EffectDirection {
    Out,
    Left,
    Right,
    Up,
    Down,
    #[default]
    #[serde(other)]
    In,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct BackgroundEffect {
    #[serde(rename = "type", default)]
    pub kind: EffectType,
    #[serde(default)]
    pub intensity: EffectIntensity,
    #[serde(default)]
    pub direction: EffectDirection,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum OverlayType {
    Gradient,
    Vignette,
    Solid,
    #[default]
    #[serde(other)]
    None,
}

/// Readability treatment drawn between the background and the copy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct BackgroundOverlay {
    #[serde(rename = "type", default)]
    pub kind: OverlayType,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub opacity: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Background {
    #[serde(rename = "type", default)]
    pub kind: BackgroundType,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub effect: Option<BackgroundEffect>,
    #[serde(default)]
    pub overlay: Option<BackgroundOverlay>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct SceneAssets {
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub video_url: Option<String>,
    #[serde(default)]
    pub product_overlay_url: Option<String>,
    #[serde(default)]
    pub use_product_overlay: Option<bool>,
}

/// One video segment as produced by the script-to-scene service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Scene {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "type", default)]
    pub kind: SceneType,
    /// Seconds. `None` means "use the default scene length".
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(default)]
    pub background: Background,
    #[serde(default)]
    pub assets: SceneAssets,
    #[serde(default)]
    pub text_overlays: Vec<TextOverlay>,
    #[serde(default)]
    pub transition_in: Option<TransitionSpec>,
    #[serde(default)]
    pub transition_out: Option<TransitionSpec>,
    #[serde(default)]
    pub sound_design: Option<SoundDesign>,
    #[serde(default)]
    pub watermark: Option<WatermarkOverride>,
}

impl Scene {
    pub fn new(id: impl Into<String>, kind: SceneType, duration: f64) -> Self {
        Self {
            id: id.into(),
            kind,
            duration: Some(duration),
            ..Self::default()
        }
    }

    /// The URL the background layer should try, by background type.
    pub fn background_url(&self) -> Option<&str> {
        let explicit = self.background.url.as_deref();
        match self.background.kind {
            BackgroundType::Video => explicit.or(self.assets.video_url.as_deref()),
            BackgroundType::MotionGraphic => None,
            BackgroundType::Image | BackgroundType::Unknown => {
                explicit.or(self.assets.image_url.as_deref())
            }
        }
    }

    /// Product overlays are opt-in: the flag must be set explicitly.
    pub fn wants_product_overlay(&self) -> bool {
        self.assets.use_product_overlay == Some(true)
    }
}
