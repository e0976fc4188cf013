use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::asset::AssetReport;
use crate::composition::CompositionProps;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
}

impl Diagnostic {
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.severity, self.message)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Diagnostics(pub Vec<Diagnostic>);

impl Diagnostics {
    pub fn has_errors(&self) -> bool {
        self.0.iter().any(|d| d.severity == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.0.iter().filter(|d| d.severity == Severity::Warning)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.0.iter()
    }
}

/// Lint a composition. Never blocks rendering: the compositor degrades every
/// finding here to a fallback. Only structurally unusable props are errors.
pub fn validate_composition(props: &CompositionProps) -> Diagnostics {
    let mut out = Vec::new();

    if props.fps == Some(0) {
        out.push(Diagnostic::error("composition fps must be positive"));
    }
    if let (Some(0), _) | (_, Some(0)) = (props.width, props.height) {
        out.push(Diagnostic::warning(
            "custom canvas has a zero dimension; using the default size",
        ));
    }

    if props.scenes.is_empty() {
        out.push(Diagnostic::warning(
            "composition has no scenes; output will be the minimum-length brand background",
        ));
    }

    let mut ids = HashSet::new();
    for (i, scene) in props.scenes.iter().enumerate() {
        let label = if scene.id.is_empty() {
            format!("#{i}")
        } else {
            format!("'{}'", scene.id)
        };
        if !scene.id.is_empty() && !ids.insert(scene.id.as_str()) {
            out.push(Diagnostic::warning(format!("duplicate scene id {label}")));
        }

        if let Some(d) = scene.duration {
            if !d.is_finite() || d <= 0.0 {
                out.push(Diagnostic::warning(format!(
                    "scene {label} has non-positive duration {d}; it will be skipped"
                )));
            }
        }

        let scene_seconds = scene.duration.filter(|d| d.is_finite() && *d > 0.0);
        for overlay in &scene.text_overlays {
            if let Some(secs) = scene_seconds {
                if overlay.timing.start_at > secs {
                    out.push(Diagnostic::warning(format!(
                        "text overlay '{}' in scene {label} starts at {}s, after the scene ends ({}s)",
                        overlay.id, overlay.timing.start_at, secs
                    )));
                }
            }
        }
    }

    if let Some(last) = props.scenes.last() {
        if last.kind.uses_product_reveal() || last.kind == crate::scene::SceneType::Outro {
            let bi = props.brand_instructions.as_ref();
            let has_cta = bi.and_then(|b| b.cta.as_ref()).is_some();
            let has_logo = bi
                .and_then(|b| b.outro_logo_url.as_ref())
                .or(props.brand.logo_url.as_ref())
                .is_some_and(|u| crate::asset::classify(Some(u)).is_usable());
            if bi.is_some() && (!has_cta || !has_logo) {
                out.push(Diagnostic::warning(
                    "CTA outro needs both a CTA payload and an outro logo; it will be skipped",
                ));
            }
        }
    }

    let report = AssetReport::collect(props);
    for entry in report.unusable() {
        out.push(Diagnostic::warning(format!(
            "{} {} at {} is {} and will fall back",
            entry.kind, entry.url, entry.location, entry.status
        )));
    }

    if props
        .audio_ducking_keyframes
        .windows(2)
        .any(|pair| pair[1].frame < pair[0].frame)
    {
        out.push(Diagnostic::warning(
            "audio ducking keyframes are out of order; they will be sorted by frame",
        ));
    }

    Diagnostics(out)
}
