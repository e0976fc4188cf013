//! # adreel-render
//!
//! The adreel compositor. Evaluates a composition frame by frame into a
//! layer plan, rasterizes it on the CPU and mixes the matching audio.
//! Every frame is a pure function of the props, the settings and the
//! provided assets.

pub mod audio;
pub mod background;
pub mod blur;
pub mod brand;
pub mod caption;
pub mod evaluate;
pub mod image_loader;
pub mod motion;
pub mod pipeline;
pub mod product;
pub mod provider;
pub mod raster;
pub mod text;
pub mod text_anim;
pub mod transition;

pub use audio::{
    audio_plan, mix_frame, schedule, ActiveCue, AudioBuffer, AudioPlan, CueSource, ScheduledCue,
};
pub use evaluate::{
    evaluate_frame, FramePlan, LayerContent, Placement, PlannedLayer, ScenePhase, ScenePlan, ZIndex,
};
pub use pipeline::{RenderPipeline, RenderResult, RenderedFrame};
pub use provider::{AssetProvider, AudioClip, NoAssets, PreloadedAssets, VideoClip};
pub use raster::rasterize;
pub use text::TextRenderer;
