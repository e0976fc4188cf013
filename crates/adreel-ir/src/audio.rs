use serde::{Deserialize, Serialize};

/// A single sound effect reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SoundCue {
    #[serde(default)]
    pub url: Option<String>,
    /// Linear gain; falls back to the per-category volume.
    #[serde(default)]
    pub volume: Option<f64>,
    /// Seconds; used to end transition-out effects exactly on the scene cut.
    #[serde(default)]
    pub duration: Option<f64>,
}

impl SoundCue {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            ..Self::default()
        }
    }

    pub fn with_volume(mut self, volume: f64) -> Self {
        self.volume = Some(volume);
        self
    }

    pub fn with_duration(mut self, seconds: f64) -> Self {
        self.duration = Some(seconds);
        self
    }
}

/// Per-scene sound effects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct SoundDesign {
    #[serde(default)]
    pub transition_in: Option<SoundCue>,
    #[serde(default)]
    pub ambience: Option<SoundCue>,
    #[serde(default)]
    pub transition_out: Option<SoundCue>,
    #[serde(default)]
    pub emphasis: Vec<SoundCue>,
}

fn default_true() -> bool {
    true
}

fn default_master_volume() -> f64 {
    1.0
}

/// Composition-wide sound-effect switches and gains.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SoundDesignConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_master_volume")]
    pub master_volume: f64,
    #[serde(default)]
    pub transition_volume: Option<f64>,
    #[serde(default)]
    pub ambience_volume: Option<f64>,
    #[serde(default)]
    pub emphasis_volume: Option<f64>,
}

impl Default for SoundDesignConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            master_volume: default_master_volume(),
            transition_volume: None,
            ambience_volume: None,
            emphasis_volume: None,
        }
    }
}

/// Absolute music volume at a global frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DuckingKeyframe {
    pub frame: u64,
    pub volume: f64,
}

impl DuckingKeyframe {
    pub fn new(frame: u64, volume: f64) -> Self {
        Self { frame, volume }
    }
}
