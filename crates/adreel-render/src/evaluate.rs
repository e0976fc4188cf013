//! Per-frame scene evaluation.
//!
//! `evaluate_frame` is a pure function of `(props, timeline, settings, frame)`.
//! It decides which scene is active, where it is in its transition windows
//! and which layers it shows, in the fixed z-order. Nothing is carried from
//! one frame to the next, so frames can be evaluated in any order.

use serde::Serialize;

use adreel_core::hash::{self, ContentHash};
use adreel_core::{AdreelError, AdreelResult, Color, LayerStyle, Point2D, Size2D};
use adreel_ir::{
    CompositionProps, HorizontalAlign, RenderSettings, SceneType, SceneWindow, TextStyle,
    Timeline, TransitionSpec,
};

use crate::background::{self, GradientFill};
use crate::brand;
use crate::caption;
use crate::image_loader::Fit;
use crate::product;
use crate::transition::{transition_style, TransitionDirection};

/// Fixed back-to-front stacking order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ZIndex {
    Background,
    Readability,
    Product,
    Text,
    Brand,
    EndCard,
    Debug,
}

/// Where a layer sits on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Placement {
    /// Anchor point on the canvas, in canvas fractions.
    pub at: Point2D,
    /// Point of the layer box placed on `at` (0,0 top-left, 1,1 bottom-right).
    pub pivot: Point2D,
    /// Layer box in canvas fractions. `None` sizes the box to its content.
    pub size: Option<Size2D>,
}

impl Placement {
    pub fn full() -> Self {
        Self {
            at: Point2D::new(0.5, 0.5),
            pivot: Point2D::new(0.5, 0.5),
            size: Some(Size2D::new(1.0, 1.0)),
        }
    }

    pub fn centered(at_x: f64, at_y: f64, size: Option<Size2D>) -> Self {
        Self {
            at: Point2D::new(at_x, at_y),
            pivot: Point2D::new(0.5, 0.5),
            size,
        }
    }

    pub fn anchored(at: Point2D, pivot: Point2D, size: Option<Size2D>) -> Self {
        Self { at, pivot, size }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScrimKind {
    BottomGradient,
    Vignette,
    Solid,
}

/// What a layer draws. Resolved URLs only: anything unusable has already
/// been replaced by a fallback or dropped.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum LayerContent {
    Gradient(GradientFill),
    MotionGraphic {
        fill: GradientFill,
        accent: Color,
        progress: f64,
    },
    Image {
        url: String,
        fit: Fit,
        fallback: Option<GradientFill>,
    },
    Video {
        url: String,
        seconds: f64,
        fallback: Option<GradientFill>,
    },
    Scrim {
        scrim: ScrimKind,
        color: Color,
    },
    Solid {
        color: Color,
    },
    Text {
        text: String,
        style: TextStyle,
        font: Option<String>,
        color: Color,
        align: HorizontalAlign,
        /// Fraction of characters shown.
        reveal: f64,
        /// Wrap width in canvas fractions.
        max_width: f64,
    },
    LowerThird {
        headline: String,
        subtext: Option<String>,
        accent: Color,
        text_color: Color,
        heading_font: Option<String>,
        body_font: Option<String>,
    },
    Button {
        label: String,
        fill: Color,
        text_color: Color,
        font: Option<String>,
    },
    ErrorPlaceholder {
        message: String,
    },
    DebugInfo {
        lines: Vec<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlannedLayer {
    pub z: ZIndex,
    /// Short role name, e.g. `background` or `watermark`.
    pub label: &'static str,
    pub content: LayerContent,
    pub style: LayerStyle,
    pub placement: Placement,
}

impl PlannedLayer {
    pub fn new(z: ZIndex, label: &'static str, content: LayerContent) -> Self {
        Self {
            z,
            label,
            content,
            style: LayerStyle::identity(),
            placement: Placement::full(),
        }
    }

    pub fn with_style(mut self, style: LayerStyle) -> Self {
        self.style = style;
        self
    }

    pub fn with_placement(mut self, placement: Placement) -> Self {
        self.placement = placement;
        self
    }
}

/// Transition state of a scene at one frame. In and out can overlap on
/// scenes shorter than both windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ScenePhase {
    pub transition_in: bool,
    pub transition_out: bool,
}

impl ScenePhase {
    pub fn steady(&self) -> bool {
        !self.transition_in && !self.transition_out
    }
}

impl std::fmt::Display for ScenePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (self.transition_in, self.transition_out) {
            (false, false) => write!(f, "steady"),
            (true, false) => write!(f, "transition-in"),
            (false, true) => write!(f, "transition-out"),
            (true, true) => write!(f, "transition-in+out"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScenePlan {
    pub index: usize,
    pub scene_id: String,
    pub scene_type: SceneType,
    pub local_frame: u64,
    pub scene_frames: u64,
    /// Applied to the whole scene group when compositing.
    pub transition: LayerStyle,
    pub phase: ScenePhase,
    pub layers: Vec<PlannedLayer>,
}

impl ScenePlan {
    pub fn layer(&self, label: &str) -> Option<&PlannedLayer> {
        self.layers.iter().find(|l| l.label == label)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FramePlan {
    pub frame: u64,
    pub total_frames: u64,
    pub scene: Option<ScenePlan>,
    /// Drawn above the scene group: end card and debug info.
    pub overlays: Vec<PlannedLayer>,
}

impl FramePlan {
    pub fn to_json(&self) -> AdreelResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Stable digest of the plan. Equal plans rasterize to equal frames.
    pub fn plan_hash(&self) -> AdreelResult<ContentHash> {
        hash::hash_plan(self)
    }

    /// Every layer in draw order.
    pub fn all_layers(&self) -> impl Iterator<Item = &PlannedLayer> {
        self.scene
            .iter()
            .flat_map(|s| s.layers.iter())
            .chain(self.overlays.iter())
    }
}

/// The transition a scene enters with. Composition defaults never apply to
/// the first scene's entrance.
pub fn resolve_transition_in(props: &CompositionProps, index: usize) -> Option<TransitionSpec> {
    let scene = props.scenes.get(index)?;
    scene.transition_in.or_else(|| {
        (index > 0)
            .then(|| props.transitions.map(|d| d.spec()))
            .flatten()
    })
}

/// The transition a scene leaves with. Composition defaults never apply to
/// the last scene's exit.
pub fn resolve_transition_out(props: &CompositionProps, index: usize) -> Option<TransitionSpec> {
    let scene = props.scenes.get(index)?;
    scene.transition_out.or_else(|| {
        (index + 1 < props.scenes.len())
            .then(|| props.transitions.map(|d| d.spec()))
            .flatten()
    })
}

/// Transition window length in frames, clamped to the scene.
fn window_frames(spec: Option<TransitionSpec>, settings: &RenderSettings, scene_frames: u64) -> u64 {
    match spec {
        Some(spec) if !spec.is_noop() => settings.frames(spec.duration).min(scene_frames),
        _ => 0,
    }
}

/// Scene-level transition style and phase at `local`.
pub fn scene_transition(
    props: &CompositionProps,
    settings: &RenderSettings,
    index: usize,
    local: u64,
    scene_frames: u64,
) -> (LayerStyle, ScenePhase) {
    let mut style = LayerStyle::identity();
    let mut phase = ScenePhase::default();

    let spec_in = resolve_transition_in(props, index);
    let win_in = window_frames(spec_in, settings, scene_frames);
    if let Some(spec) = spec_in {
        if win_in > 0 && local < win_in {
            let t = local as f64 / win_in as f64;
            style = style.compose(&transition_style(spec.kind, t, TransitionDirection::In));
            phase.transition_in = true;
        }
    }

    let spec_out = resolve_transition_out(props, index);
    let win_out = window_frames(spec_out, settings, scene_frames);
    if let Some(spec) = spec_out {
        let out_start = scene_frames - win_out;
        if win_out > 0 && local >= out_start {
            let t = (local - out_start) as f64 / win_out as f64;
            style = style.compose(&transition_style(spec.kind, t, TransitionDirection::Out));
            phase.transition_out = true;
        }
    }

    (style, phase)
}

fn evaluate_scene(
    props: &CompositionProps,
    timeline: &Timeline,
    settings: &RenderSettings,
    window: &SceneWindow,
    local: u64,
) -> Option<ScenePlan> {
    let scene = props.scenes.get(window.index)?;
    let frames = window.frames();
    let (transition, phase) = scene_transition(props, settings, window.index, local, frames);

    let mut layers = Vec::new();
    layers.extend(background::background_layers(
        scene,
        &props.brand,
        settings,
        local,
        frames,
    ));
    layers.extend(background::readability_layer(scene));
    layers.extend(product::product_layer(scene, settings, local, frames));
    layers.extend(caption::text_layers(
        scene,
        &props.brand,
        settings,
        local,
        frames,
    ));
    layers.extend(brand::brand_layers(props, timeline, settings, window, local));
    layers.sort_by_key(|l| l.z);

    Some(ScenePlan {
        index: window.index,
        scene_id: scene.id.clone(),
        scene_type: scene.kind,
        local_frame: local,
        scene_frames: frames,
        transition,
        phase,
        layers,
    })
}

fn debug_layer(frame: u64, total: u64, scene: Option<&ScenePlan>) -> PlannedLayer {
    let mut lines = Vec::new();
    match scene {
        Some(s) => {
            lines.push(format!("scene {} [{}] #{}", s.scene_id, s.scene_type, s.index));
            lines.push(format!(
                "frame {frame}/{total} local {}/{}",
                s.local_frame, s.scene_frames
            ));
            lines.push(format!("phase {}", s.phase));
        }
        None => {
            lines.push("no active scene".to_string());
            lines.push(format!("frame {frame}/{total}"));
        }
    }
    PlannedLayer::new(ZIndex::Debug, "debug", LayerContent::DebugInfo { lines }).with_placement(
        Placement::anchored(Point2D::new(0.01, 0.01), Point2D::zero(), None),
    )
}

/// Evaluate one output frame. Frames outside `[0, total)` are an error;
/// content problems never are.
pub fn evaluate_frame(
    props: &CompositionProps,
    timeline: &Timeline,
    settings: &RenderSettings,
    frame: u64,
) -> AdreelResult<FramePlan> {
    let total = timeline.total_frames();
    if frame >= total {
        return Err(AdreelError::Render(format!(
            "frame {frame} is outside the composition (0..{total})"
        )));
    }

    let scene = timeline
        .scene_at(frame)
        .and_then(|(window, local)| evaluate_scene(props, timeline, settings, window, local));

    let mut overlays = brand::end_card_layers(props, timeline, settings, frame);
    if settings.debug {
        overlays.push(debug_layer(frame, total, scene.as_ref()));
    }
    overlays.sort_by_key(|l| l.z);

    Ok(FramePlan {
        frame,
        total_frames: total,
        scene,
        overlays,
    })
}
