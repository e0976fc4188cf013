//! # adreel-ir
//!
//! The adreel composition model: the JSON wire format (`CompositionProps`)
//! handed to the compositor by the upstream video-project workflow, plus the
//! pure passes over it that every renderer component shares: asset
//! classification, the timeline prefix-sum and lint-style validation.
//!
//! Everything here is immutable once built; the renderer only ever borrows it.

pub mod asset;
pub mod audio;
pub mod brand;
pub mod builder;
pub mod composition;
pub mod overlay;
pub mod scene;
pub mod settings;
pub mod timeline;
pub mod transition;
pub mod validate;

pub use asset::{classify, usable_url, AssetKind, AssetReport, AssetStatus};
pub use audio::{DuckingKeyframe, SoundCue, SoundDesign, SoundDesignConfig};
pub use brand::{
    BrandInstructions, BrandSettings, CtaPayload, EndCardConfig, WatermarkOverride,
    WatermarkPosition, WatermarkSettings,
};
pub use builder::{CompositionBuilder, SceneBuilder};
pub use composition::{CompositionProps, OutputFormat};
pub use overlay::{HorizontalAlign, TextAnimation, TextOverlay, TextStyle, VerticalAlign};
pub use scene::{
    Background, BackgroundEffect, BackgroundOverlay, BackgroundType, EffectDirection,
    EffectIntensity, EffectType, OverlayType, Scene, SceneAssets, SceneType,
};
pub use settings::RenderSettings;
pub use timeline::{SceneWindow, Timeline};
pub use transition::{TransitionDefaults, TransitionSpec, TransitionType};
pub use validate::{validate_composition, Diagnostic, Diagnostics, Severity};
