use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AdreelError, AdreelResult};
use crate::time::{seconds_to_frames, Fps};

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RenderConfig {
    pub fps: u32,
    /// Floor for the composition length, used when scenes add up to less.
    pub minimum_seconds: f64,
    /// Duration given to scenes that do not declare one.
    pub default_scene_seconds: f64,
    /// Adds the debug overlay and visible error placeholders.
    pub debug: bool,
    pub sample_rate: u32,
    pub channels: u16,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            fps: 30,
            minimum_seconds: 1.0,
            default_scene_seconds: 5.0,
            debug: false,
            sample_rate: 48_000,
            channels: 2,
        }
    }
}

impl RenderConfig {
    pub fn fps(&self) -> Fps {
        Fps::new(self.fps)
    }

    /// Minimum composition length in frames at `fps`; never zero.
    pub fn minimum_frames(&self, fps: Fps) -> u64 {
        seconds_to_frames(self.minimum_seconds, fps).max(1)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AudioConfig {
    /// Music volume used when the composition does not set one.
    pub music_volume: f64,
    /// Ducked music volume as a fraction of the base volume.
    pub ducking_ratio: f64,
    pub loop_music: bool,
    pub transition_volume: f64,
    pub ambience_volume: f64,
    pub emphasis_volume: f64,
    /// Assumed length of sound effects that do not declare one.
    pub default_sfx_seconds: f64,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            music_volume: 0.3,
            ducking_ratio: 0.4,
            loop_music: true,
            transition_volume: 0.5,
            ambience_volume: 0.2,
            emphasis_volume: 0.6,
            default_sfx_seconds: 1.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AssetsConfig {
    pub cache_dir: String,
    pub fetch_remote: bool,
    /// Font family name → font file path.
    pub fonts: BTreeMap<String, String>,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            cache_dir: "~/.adreel/cache".to_string(),
            fetch_remote: true,
            fonts: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct AdreelConfig {
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(default)]
    pub audio: AudioConfig,
    #[serde(default)]
    pub assets: AssetsConfig,
}

impl AdreelConfig {
    pub fn from_toml_str(contents: &str) -> AdreelResult<Self> {
        toml::from_str(contents).map_err(|e| AdreelError::Config(e.to_string()))
    }

    pub fn load_from_file(path: &Path) -> AdreelResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Load `path` if it exists, otherwise return the defaults.
    pub fn load_or_default(path: &Path) -> AdreelResult<Self> {
        if path.exists() {
            Self::load_from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save_to_file(&self, path: &Path) -> AdreelResult<()> {
        let contents =
            toml::to_string_pretty(self).map_err(|e| AdreelError::Config(e.to_string()))?;
        std::fs::write(path, contents)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = AdreelConfig::default();
        assert_eq!(cfg.render.fps, 30);
        assert_eq!(cfg.render.minimum_frames(cfg.render.fps()), 30);
        assert!(cfg.audio.ducking_ratio < 1.0);
        assert!(cfg.assets.fetch_remote);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let cfg = AdreelConfig::from_toml_str(
            r#"
            [render]
            fps = 60
            debug = true

            [audio]
            ducking_ratio = 0.5
            "#,
        )
        .unwrap();
        assert_eq!(cfg.render.fps, 60);
        assert!(cfg.render.debug);
        assert_eq!(cfg.render.sample_rate, 48_000);
        assert_eq!(cfg.audio.ducking_ratio, 0.5);
        assert_eq!(cfg.audio.music_volume, 0.3);
    }

    #[test]
    fn test_minimum_frames_never_zero() {
        let cfg = RenderConfig {
            minimum_seconds: 0.0,
            ..RenderConfig::default()
        };
        assert_eq!(cfg.minimum_frames(cfg.fps()), 1);
        assert_eq!(cfg.minimum_frames(Fps::new(60)), 1);
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = AdreelConfig::from_toml_str("[render\nfps=").unwrap_err();
        assert!(matches!(err, AdreelError::Config(_)));
    }

    #[test]
    fn test_save_and_reload() {
        let path = std::env::temp_dir().join("adreel_config_roundtrip.toml");
        let mut cfg = AdreelConfig::default();
        cfg.render.fps = 24;
        cfg.assets
            .fonts
            .insert("Inter".to_string(), "/fonts/Inter.ttf".to_string());
        cfg.save_to_file(&path).unwrap();
        let loaded = AdreelConfig::load_from_file(&path).unwrap();
        assert_eq!(loaded.render.fps, 24);
        assert_eq!(loaded.assets.fonts.get("Inter").unwrap(), "/fonts/Inter.ttf");
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let cfg = AdreelConfig::load_or_default(Path::new("/nonexistent/adreel.toml")).unwrap();
        assert_eq!(cfg.render.fps, 30);
    }
}
