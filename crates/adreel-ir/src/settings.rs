use serde::{Deserialize, Serialize};

use adreel_core::{seconds_to_frames, AdreelConfig, AudioConfig, Fps};

const DEFAULT_DUCKING_RATIO: f64 = 0.4;

use crate::composition::CompositionProps;

/// Everything about a render job that is not content: canvas, rate, and
/// the tunables loaded from `adreel.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderSettings {
    pub width: u32,
    pub height: u32,
    pub fps: Fps,
    pub minimum_frames: u64,
    pub default_scene_seconds: f64,
    pub debug: bool,
    pub sample_rate: u32,
    pub channels: u16,
    pub audio: AudioConfig,
}

impl RenderSettings {
    /// Resolve settings for `props`. Composition fields win over config ones.
    pub fn resolve(props: &CompositionProps, config: &AdreelConfig) -> Self {
        let (width, height) = props.dimensions();
        let fps = props.fps.map(Fps::new).unwrap_or_else(|| config.render.fps());
        let minimum_frames = config.render.minimum_frames(fps);
        Self {
            width,
            height,
            fps,
            minimum_frames,
            default_scene_seconds: config.render.default_scene_seconds,
            debug: config.render.debug,
            sample_rate: config.render.sample_rate.max(1),
            channels: config.render.channels.max(1),
            audio: sanitize_audio(&config.audio),
        }
    }

    pub fn from_props(props: &CompositionProps) -> Self {
        Self::resolve(props, &AdreelConfig::default())
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width.max(1);
        self.height = height.max(1);
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn frames(&self, seconds: f64) -> u64 {
        seconds_to_frames(seconds, self.fps)
    }
}

/// Ducking must lower the music: the ratio has to land strictly inside (0, 1).
fn sanitize_audio(audio: &AudioConfig) -> AudioConfig {
    let mut audio = audio.clone();
    let ratio = audio.ducking_ratio;
    if !(ratio.is_finite() && ratio > 0.0 && ratio < 1.0) {
        tracing::warn!(ratio, fallback = DEFAULT_DUCKING_RATIO, "ducking_ratio out of range");
        audio.ducking_ratio = DEFAULT_DUCKING_RATIO;
    }
    audio
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self::from_props(&CompositionProps::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::composition::OutputFormat;

    #[test]
    fn test_defaults() {
        let settings = RenderSettings::default();
        assert_eq!((settings.width, settings.height), (1920, 1080));
        assert_eq!(settings.fps.get(), 30);
        assert_eq!(settings.minimum_frames, 30);
        assert_eq!(settings.default_scene_seconds, 5.0);
        assert_eq!(settings.sample_rate, 48_000);
    }

    #[test]
    fn test_props_fps_overrides_config() {
        let props = CompositionProps {
            fps: Some(24),
            output_format: OutputFormat::Instagram,
            ..Default::default()
        };
        let mut config = AdreelConfig::default();
        config.render.fps = 60;
        config.render.debug = true;
        let settings = RenderSettings::resolve(&props, &config);
        assert_eq!(settings.fps.get(), 24);
        assert_eq!(settings.minimum_frames, 24);
        assert_eq!((settings.width, settings.height), (1080, 1080));
        assert!(settings.debug);
    }

    #[test]
    fn test_ducking_ratio_always_lowers_music() {
        let props = CompositionProps::default();
        for bad in [1.5, 1.0, 0.0, -0.2, f64::NAN, f64::INFINITY] {
            let mut config = AdreelConfig::default();
            config.audio.ducking_ratio = bad;
            let ratio = RenderSettings::resolve(&props, &config).audio.ducking_ratio;
            assert!(ratio > 0.0 && ratio < 1.0, "{bad} resolved to {ratio}");
        }

        let mut config = AdreelConfig::default();
        config.audio.ducking_ratio = 0.25;
        assert_eq!(RenderSettings::resolve(&props, &config).audio.ducking_ratio, 0.25);
    }

    #[test]
    fn test_frames_rounds() {
        let settings = RenderSettings::default();
        assert_eq!(settings.frames(0.5), 15);
        assert_eq!(settings.frames(0.1), 3);
        assert_eq!(settings.frames(-1.0), 0);
    }
}
