use serde::{Deserialize, Serialize};

/// The visual effect used to bring a scene in or take it out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum TransitionType {
    SlideLeft,
    SlideRight,
    Zoom,
    Blur,
    Crossfade,
    None,
    #[default]
    #[serde(other)]
    Fade,
}

impl TransitionType {
    pub const ALL: [TransitionType; 7] = [
        TransitionType::Fade,
        TransitionType::SlideLeft,
        TransitionType::SlideRight,
        TransitionType::Zoom,
        TransitionType::Blur,
        TransitionType::Crossfade,
        TransitionType::None,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            TransitionType::Fade => "fade",
            TransitionType::SlideLeft => "slide-left",
            TransitionType::SlideRight => "slide-right",
            TransitionType::Zoom => "zoom",
            TransitionType::Blur => "blur",
            TransitionType::Crossfade => "crossfade",
            TransitionType::None => "none",
        }
    }
}

impl std::fmt::Display for TransitionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

fn default_transition_seconds() -> f64 {
    0.5
}

/// A per-scene transition: which effect, over how many seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransitionSpec {
    #[serde(rename = "type", default)]
    pub kind: TransitionType,
    #[serde(default = "default_transition_seconds")]
    pub duration: f64,
}

impl TransitionSpec {
    pub fn new(kind: TransitionType, duration: f64) -> Self {
        Self { kind, duration }
    }

    pub fn fade(duration: f64) -> Self {
        Self::new(TransitionType::Fade, duration)
    }

    /// True when the transition would have no visible effect.
    pub fn is_noop(&self) -> bool {
        self.kind == TransitionType::None || !(self.duration > 0.0)
    }
}

impl Default for TransitionSpec {
    fn default() -> Self {
        Self::fade(default_transition_seconds())
    }
}

/// Composition-wide transition applied to scenes that do not declare their own.
///
/// Defaults never apply to the entrance of the first scene or the exit of the
/// last one; explicit per-scene transitions always do.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct TransitionDefaults {
    #[serde(rename = "type", default)]
    pub kind: TransitionType,
    #[serde(default)]
    pub duration: Option<f64>,
}

impl TransitionDefaults {
    pub fn spec(&self) -> TransitionSpec {
        TransitionSpec {
            kind: self.kind,
            duration: self.duration.unwrap_or_else(default_transition_seconds),
        }
    }
}
