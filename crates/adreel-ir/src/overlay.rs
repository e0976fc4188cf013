use serde::{Deserialize, Serialize};

/// Typographic role of a caption. Maps to a font size and weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum TextStyle {
    Title,
    Headline,
    Subheadline,
    Caption,
    Cta,
    Stat,
    Quote,
    #[default]
    #[serde(other)]
    Body,
}

impl TextStyle {
    /// Font size as a fraction of the canvas height.
    pub fn size_fraction(&self) -> f32 {
        match self {
            TextStyle::Title => 0.09,
            TextStyle::Headline => 0.07,
            TextStyle::Stat => 0.1,
            TextStyle::Subheadline => 0.05,
            TextStyle::Cta => 0.055,
            TextStyle::Quote => 0.045,
            TextStyle::Body => 0.04,
            TextStyle::Caption => 0.032,
        }
    }

    /// Headings render in the brand heading font, the rest in the body font.
    pub fn is_heading(&self) -> bool {
        matches!(
            self,
            TextStyle::Title | TextStyle::Headline | TextStyle::Stat | TextStyle::Cta
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum VerticalAlign {
    Top,
    Bottom,
    #[default]
    #[serde(other)]
    Center,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum HorizontalAlign {
    Left,
    Right,
    #[default]
    #[serde(other)]
    Center,
}

fn default_padding() -> f64 {
    60.0
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TextPosition {
    #[serde(default)]
    pub vertical: VerticalAlign,
    #[serde(default)]
    pub horizontal: HorizontalAlign,
    /// Pixels from the anchored canvas edges.
    #[serde(default = "default_padding")]
    pub padding: f64,
}

impl Default for TextPosition {
    fn default() -> Self {
        Self {
            vertical: VerticalAlign::default(),
            horizontal: HorizontalAlign::default(),
            padding: default_padding(),
        }
    }
}

/// Enter/exit animation variant for positioned captions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum TextAnimation {
    SlideUp,
    SlideDown,
    SlideLeft,
    SlideRight,
    Scale,
    Pop,
    BlurIn,
    BlurOut,
    Typewriter,
    None,
    #[default]
    #[serde(other)]
    Fade,
}

impl TextAnimation {
    pub const ALL: [TextAnimation; 11] = [
        TextAnimation::Fade,
        TextAnimation::SlideUp,
        TextAnimation::SlideDown,
        TextAnimation::SlideLeft,
        TextAnimation::SlideRight,
        TextAnimation::Scale,
        TextAnimation::Pop,
        TextAnimation::BlurIn,
        TextAnimation::BlurOut,
        TextAnimation::Typewriter,
        TextAnimation::None,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            TextAnimation::Fade => "fade",
            TextAnimation::SlideUp => "slide-up",
            TextAnimation::SlideDown => "slide-down",
            TextAnimation::SlideLeft => "slide-left",
            TextAnimation::SlideRight => "slide-right",
            TextAnimation::Scale => "scale",
            TextAnimation::Pop => "pop",
            TextAnimation::BlurIn => "blur-in",
            TextAnimation::BlurOut => "blur-out",
            TextAnimation::Typewriter => "typewriter",
            TextAnimation::None => "none",
        }
    }
}

fn default_animation_seconds() -> f64 {
    0.5
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TextAnimationSpec {
    #[serde(default)]
    pub enter: TextAnimation,
    #[serde(default)]
    pub exit: TextAnimation,
    #[serde(default = "default_animation_seconds")]
    pub duration: f64,
}

impl Default for TextAnimationSpec {
    fn default() -> Self {
        Self {
            enter: TextAnimation::Fade,
            exit: TextAnimation::Fade,
            duration: default_animation_seconds(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct TextTiming {
    /// Seconds from the scene start.
    #[serde(default)]
    pub start_at: f64,
    /// Seconds visible; `None` runs to the end of the scene.
    #[serde(default)]
    pub duration: Option<f64>,
}

/// A caption scoped to one scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct TextOverlay {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub style: TextStyle,
    #[serde(default)]
    pub position: TextPosition,
    #[serde(default)]
    pub animation: TextAnimationSpec,
    #[serde(default)]
    pub timing: TextTiming,
}

impl TextOverlay {
    pub fn new(id: impl Into<String>, text: impl Into<String>, style: TextStyle) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            style,
            ..Self::default()
        }
    }

    pub fn with_timing(mut self, start_at: f64, duration: Option<f64>) -> Self {
        self.timing = TextTiming { start_at, duration };
        self
    }

    pub fn with_animation(mut self, enter: TextAnimation, exit: TextAnimation) -> Self {
        self.animation.enter = enter;
        self.animation.exit = exit;
        self
    }

    pub fn with_position(mut self, vertical: VerticalAlign, horizontal: HorizontalAlign) -> Self {
        self.position.vertical = vertical;
        self.position.horizontal = horizontal;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlay_defaults() {
        let overlay: TextOverlay = serde_json::from_str(r#"{"id":"t1","text":"Hello"}"#).unwrap();
        assert_eq!(overlay.style, TextStyle::Body);
        assert_eq!(overlay.position.padding, 60.0);
        assert_eq!(overlay.position.vertical, VerticalAlign::Center);
        assert_eq!(overlay.animation.enter, TextAnimation::Fade);
        assert_eq!(overlay.animation.duration, 0.5);
        assert_eq!(overlay.timing.start_at, 0.0);
        assert_eq!(overlay.timing.duration, None);
    }

    #[test]
    fn test_overlay_full_shape() {
        let json = r#"{
            "id": "t2",
            "text": "50% faster",
            "style": "stat",
            "position": {"vertical": "bottom", "horizontal": "left", "padding": 80},
            "animation": {"enter": "pop", "exit": "blur-out", "duration": 0.3},
            "timing": {"startAt": 1.5, "duration": 2}
        }"#;
        let overlay: TextOverlay = serde_json::from_str(json).unwrap();
        assert_eq!(overlay.style, TextStyle::Stat);
        assert_eq!(overlay.position.horizontal, HorizontalAlign::Left);
        assert_eq!(overlay.position.padding, 80.0);
        assert_eq!(overlay.animation.enter, TextAnimation::Pop);
        assert_eq!(overlay.animation.exit, TextAnimation::BlurOut);
        assert_eq!(overlay.timing.start_at, 1.5);
        assert_eq!(overlay.timing.duration, Some(2.0));
    }

    #[test]
    fn test_unknown_animation_falls_back_to_fade() {
        let spec: TextAnimationSpec =
            serde_json::from_str(r#"{"enter":"spin","exit":"wipe"}"#).unwrap();
        assert_eq!(spec.enter, TextAnimation::Fade);
        assert_eq!(spec.exit, TextAnimation::Fade);
    }

    #[test]
    fn test_animation_labels_match_wire_tags() {
        for anim in TextAnimation::ALL {
            let json = serde_json::to_string(&anim).unwrap();
            assert_eq!(json, format!("\"{}\"", anim.label()));
        }
    }

    #[test]
    fn test_heading_styles() {
        assert!(TextStyle::Title.is_heading());
        assert!(!TextStyle::Caption.is_heading());
        assert!(TextStyle::Title.size_fraction() > TextStyle::Caption.size_fraction());
    }
}
