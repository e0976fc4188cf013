use std::ops::Range;

use rayon::prelude::*;

use adreel_core::hash::{self, ContentHash, RenderHasher};
use adreel_core::{AdreelConfig, AdreelError, AdreelResult, FrameBuffer};
use adreel_ir::{CompositionProps, RenderSettings, Timeline};

use crate::audio::{
    concat_buffers, mix_frame, plan_from_schedule, schedule, AudioBuffer, AudioPlan, ScheduledCue,
};
use crate::evaluate::{evaluate_frame, FramePlan};
use crate::provider::AssetProvider;
use crate::raster::rasterize;

/// One composited output frame.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedFrame {
    pub index: u64,
    pub image: FrameBuffer,
    pub audio: AudioBuffer,
}

/// Result of a complete render.
pub struct RenderResult {
    /// All rendered frames in order.
    pub frames: Vec<FrameBuffer>,
    /// The mixed soundtrack for the same frames.
    pub audio: AudioBuffer,
    pub width: u32,
    pub height: u32,
    pub fps: u32,
}

impl RenderResult {
    /// Compute the content hash of the entire render output.
    ///
    /// Covers every frame (dimensions and pixel data). The same props and
    /// assets always produce the same hash.
    pub fn content_hash(&self) -> ContentHash {
        hash::hash_frames(&self.frames)
    }

    /// Compute the content hash of a single frame by index.
    pub fn frame_hash(&self, index: usize) -> Option<ContentHash> {
        self.frames.get(index).map(hash::hash_frame)
    }

    pub fn audio_hash(&self) -> ContentHash {
        hash::hash_samples(&self.audio.samples)
    }

    /// Single digest over picture and soundtrack together.
    pub fn render_hash(&self) -> ContentHash {
        let mut hasher = RenderHasher::new();
        for frame in &self.frames {
            hasher.frame(frame);
        }
        hasher.audio(&self.audio.samples);
        hasher.finish()
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }
}

/// The render pipeline: composition props in, frames and audio out.
///
/// Holds no per-frame state, so frames can be rendered in any order and on
/// any thread.
pub struct RenderPipeline {
    props: CompositionProps,
    timeline: Timeline,
    settings: RenderSettings,
    cues: Vec<ScheduledCue>,
}

impl RenderPipeline {
    pub fn new(props: CompositionProps, settings: RenderSettings) -> Self {
        let timeline = Timeline::build(&props, &settings);
        let cues = schedule(&props, &timeline, &settings);
        tracing::debug!(
            scenes = timeline.scene_count(),
            frames = timeline.total_frames(),
            cues = cues.len(),
            "render pipeline ready"
        );
        Self {
            props,
            timeline,
            settings,
            cues,
        }
    }

    pub fn with_config(props: CompositionProps, config: &AdreelConfig) -> Self {
        let settings = RenderSettings::resolve(&props, config);
        Self::new(props, settings)
    }

    pub fn props(&self) -> &CompositionProps {
        &self.props
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    pub fn cue_sheet(&self) -> &[ScheduledCue] {
        &self.cues
    }

    pub fn total_frames(&self) -> u64 {
        self.timeline.total_frames()
    }

    /// The layer plan for one frame.
    pub fn plan(&self, frame: u64) -> AdreelResult<FramePlan> {
        evaluate_frame(&self.props, &self.timeline, &self.settings, frame)
    }

    pub fn audio_plan(&self, frame: u64) -> AdreelResult<AudioPlan> {
        self.check_frame(frame)?;
        Ok(plan_from_schedule(&self.cues, &self.props, &self.settings, frame))
    }

    fn check_frame(&self, frame: u64) -> AdreelResult<()> {
        let total = self.total_frames();
        if frame >= total {
            return Err(AdreelError::Render(format!(
                "frame {frame} is outside the composition (0..{total})"
            )));
        }
        Ok(())
    }

    /// Render exactly one frame by global index.
    pub fn render_frame(
        &self,
        frame: u64,
        provider: &dyn AssetProvider,
    ) -> AdreelResult<RenderedFrame> {
        let plan = self.plan(frame)?;
        let image = rasterize(&plan, &self.settings, &self.props.brand, provider);
        let audio_plan = plan_from_schedule(&self.cues, &self.props, &self.settings, frame);
        let audio = mix_frame(&audio_plan, frame, &self.settings, provider);
        Ok(RenderedFrame {
            index: frame,
            image,
            audio,
        })
    }

    /// Render `range` in parallel. Output is in frame order and identical to
    /// rendering sequentially.
    pub fn render_range(
        &self,
        range: Range<u64>,
        provider: &dyn AssetProvider,
    ) -> AdreelResult<Vec<RenderedFrame>> {
        let total = self.total_frames();
        if range.start > range.end || range.end > total {
            return Err(AdreelError::InvalidArgument(format!(
                "frame range {}..{} is outside the composition (0..{total})",
                range.start, range.end
            )));
        }
        range
            .into_par_iter()
            .map(|frame| self.render_frame(frame, provider))
            .collect()
    }

    /// Render the whole composition.
    pub fn render(&self, provider: &dyn AssetProvider) -> AdreelResult<RenderResult> {
        let total = self.total_frames();
        tracing::info!(
            frames = total,
            width = self.settings.width,
            height = self.settings.height,
            "rendering"
        );
        let rendered = self.render_range(0..total, provider)?;
        let audio = concat_buffers(&rendered.iter().map(|f| f.audio.clone()).collect::<Vec<_>>());
        let result = RenderResult {
            frames: rendered.into_iter().map(|f| f.image).collect(),
            audio,
            width: self.settings.width,
            height: self.settings.height,
            fps: self.settings.fps.get(),
        };
        tracing::debug!(hash = %result.render_hash().short(), "render complete");
        Ok(result)
    }
}
