//! Asset access for the rasterizer and the audio mixer.
//!
//! The compositor never performs I/O. The host resolves every asset it can
//! before rendering and hands over an immutable provider; anything the
//! provider does not have simply falls back.

use std::collections::HashMap;
use std::sync::Arc;

use adreel_core::FrameBuffer;
use fontdue::Font;

use crate::text::TextRenderer;

/// Decoded PCM, interleaved f32.
#[derive(Debug, Clone)]
pub struct AudioClip {
    pub sample_rate: u32,
    pub channels: u16,
    pub samples: Arc<Vec<f32>>,
}

impl AudioClip {
    pub fn new(sample_rate: u32, channels: u16, samples: Vec<f32>) -> Self {
        Self {
            sample_rate: sample_rate.max(1),
            channels: channels.max(1),
            samples: Arc::new(samples),
        }
    }

    /// Number of sample frames (one sample per channel).
    pub fn frames(&self) -> usize {
        self.samples.len() / self.channel_count()
    }

    pub fn duration_seconds(&self) -> f64 {
        self.frames() as f64 / f64::from(self.sample_rate.max(1))
    }

    /// Stereo pair at a source frame index. Mono is duplicated.
    pub fn stereo_at(&self, frame: usize) -> Option<(f32, f32)> {
        let ch = self.channel_count();
        let i = frame.checked_mul(ch)?;
        let l = *self.samples.get(i)?;
        let r = if ch > 1 { *self.samples.get(i + 1)? } else { l };
        Some((l, r))
    }

    /// Fields are public, so a zero channel count is read as mono.
    fn channel_count(&self) -> usize {
        usize::from(self.channels.max(1))
    }
}

/// Decoded frames of a video background.
#[derive(Debug, Clone)]
pub struct VideoClip {
    pub fps: f64,
    pub frames: Vec<FrameBuffer>,
}

impl VideoClip {
    /// Frame shown at `seconds`, looping when the clip is shorter than the scene.
    pub fn frame_at(&self, seconds: f64) -> Option<&FrameBuffer> {
        if self.frames.is_empty() {
            return None;
        }
        let idx = if self.fps > 0.0 && seconds.is_finite() && seconds > 0.0 {
            (seconds * self.fps).floor() as usize
        } else {
            0
        };
        self.frames.get(idx % self.frames.len())
    }
}

/// Read-only access to everything a frame may reference.
pub trait AssetProvider: Sync {
    fn image(&self, url: &str) -> Option<&FrameBuffer>;
    fn video_frame(&self, url: &str, seconds: f64) -> Option<&FrameBuffer>;
    fn audio(&self, url: &str) -> Option<&AudioClip>;
    fn font(&self, family: Option<&str>) -> Option<&Font>;
}

/// Provider with nothing in it. Every layer falls back.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoAssets;

impl AssetProvider for NoAssets {
    fn image(&self, _url: &str) -> Option<&FrameBuffer> {
        None
    }

    fn video_frame(&self, _url: &str, _seconds: f64) -> Option<&FrameBuffer> {
        None
    }

    fn audio(&self, _url: &str) -> Option<&AudioClip> {
        None
    }

    fn font(&self, _family: Option<&str>) -> Option<&Font> {
        None
    }
}

/// In-memory provider filled by the host before rendering starts.
#[derive(Default)]
pub struct PreloadedAssets {
    images: HashMap<String, FrameBuffer>,
    videos: HashMap<String, VideoClip>,
    audio: HashMap<String, AudioClip>,
    fonts: TextRenderer,
}

impl PreloadedAssets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_image(&mut self, url: impl Into<String>, image: FrameBuffer) {
        self.images.insert(url.into(), image);
    }

    pub fn insert_video(&mut self, url: impl Into<String>, clip: VideoClip) {
        self.videos.insert(url.into(), clip);
    }

    pub fn insert_audio(&mut self, url: impl Into<String>, clip: AudioClip) {
        self.audio.insert(url.into(), clip);
    }

    pub fn fonts_mut(&mut self) -> &mut TextRenderer {
        &mut self.fonts
    }
}

impl AssetProvider for PreloadedAssets {
    fn image(&self, url: &str) -> Option<&FrameBuffer> {
        self.images.get(url.trim())
    }

    fn video_frame(&self, url: &str, seconds: f64) -> Option<&FrameBuffer> {
        let url = url.trim();
        match self.videos.get(url) {
            Some(clip) => clip.frame_at(seconds),
            // a still stands in for a video that was only fetched as a poster
            None => self.images.get(url),
        }
    }

    fn audio(&self, url: &str) -> Option<&AudioClip> {
        self.audio.get(url.trim())
    }

    fn font(&self, family: Option<&str>) -> Option<&Font> {
        self.fonts.get_font(family)
    }
}
