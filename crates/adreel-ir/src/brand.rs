use serde::{Deserialize, Serialize};

use adreel_core::Color;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum WatermarkPosition {
    TopLeft,
    TopRight,
    BottomLeft,
    #[default]
    #[serde(other)]
    BottomRight,
}

fn default_true() -> bool {
    true
}

fn default_watermark_opacity() -> f64 {
    0.6
}

/// Global watermark settings. Present means enabled unless `enabled` says otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WatermarkSettings {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub position: WatermarkPosition,
    #[serde(default = "default_watermark_opacity")]
    pub opacity: f64,
}

impl Default for WatermarkSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            position: WatermarkPosition::default(),
            opacity: default_watermark_opacity(),
        }
    }
}

/// Scene-level watermark override; unset fields inherit the global settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct WatermarkOverride {
    #[serde(default)]
    pub enabled: Option<bool>,
    #[serde(default)]
    pub position: Option<WatermarkPosition>,
    #[serde(default)]
    pub opacity: Option<f64>,
}

impl WatermarkOverride {
    /// Resolve against the global watermark. `None` means no watermark.
    pub fn resolve(
        override_: Option<&WatermarkOverride>,
        global: Option<&WatermarkSettings>,
    ) -> Option<WatermarkSettings> {
        let base = global.copied();
        match override_ {
            Some(o) => {
                let fallback = base.unwrap_or(WatermarkSettings {
                    enabled: false,
                    ..WatermarkSettings::default()
                });
                let resolved = WatermarkSettings {
                    enabled: o.enabled.unwrap_or(fallback.enabled),
                    position: o.position.unwrap_or(fallback.position),
                    opacity: o.opacity.unwrap_or(fallback.opacity),
                };
                resolved.enabled.then_some(resolved)
            }
            None => base.filter(|w| w.enabled),
        }
    }
}

/// Global brand identity, read-only for the whole render.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct BrandSettings {
    #[serde(default)]
    pub primary_color: Option<String>,
    #[serde(default)]
    pub secondary_color: Option<String>,
    #[serde(default)]
    pub accent_color: Option<String>,
    #[serde(default)]
    pub text_color: Option<String>,
    #[serde(default)]
    pub heading_font: Option<String>,
    #[serde(default)]
    pub body_font: Option<String>,
    #[serde(default)]
    pub logo_url: Option<String>,
    #[serde(default)]
    pub watermark: Option<WatermarkSettings>,
}

impl BrandSettings {
    pub const DEFAULT_PRIMARY: Color = Color::rgb(0.12, 0.16, 0.36);
    pub const DEFAULT_SECONDARY: Color = Color::rgb(0.38, 0.2, 0.62);
    pub const DEFAULT_ACCENT: Color = Color::rgb(0.98, 0.62, 0.12);

    pub fn primary(&self) -> Color {
        Color::parse_or(self.primary_color.as_deref(), Self::DEFAULT_PRIMARY)
    }

    pub fn secondary(&self) -> Color {
        Color::parse_or(self.secondary_color.as_deref(), Self::DEFAULT_SECONDARY)
    }

    pub fn accent(&self) -> Color {
        Color::parse_or(self.accent_color.as_deref(), Self::DEFAULT_ACCENT)
    }

    pub fn text(&self) -> Color {
        Color::parse_or(self.text_color.as_deref(), Color::WHITE)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CtaPayload {
    #[serde(default)]
    pub headline: Option<String>,
    #[serde(default)]
    pub subtext: Option<String>,
    #[serde(default)]
    pub button_text: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

/// Brand-specific logo and call-to-action injection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct BrandInstructions {
    #[serde(default)]
    pub intro_logo_url: Option<String>,
    #[serde(default)]
    pub outro_logo_url: Option<String>,
    #[serde(default)]
    pub cta: Option<CtaPayload>,
    #[serde(default)]
    pub tagline: Option<String>,
}

fn default_end_card_seconds() -> f64 {
    3.0
}

/// Fixed-length closing card drawn over the tail of the composition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EndCardConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_end_card_seconds")]
    pub duration: f64,
    #[serde(default)]
    pub headline: Option<String>,
    #[serde(default)]
    pub subtext: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub logo_url: Option<String>,
    #[serde(default)]
    pub background_color: Option<String>,
    #[serde(default)]
    pub audio_url: Option<String>,
}

impl Default for EndCardConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            duration: default_end_card_seconds(),
            headline: None,
            subtext: None,
            url: None,
            logo_url: None,
            background_color: None,
            audio_url: None,
        }
    }
}

impl EndCardConfig {
    /// An end card needs to be enabled and to carry a headline.
    pub fn is_active(&self) -> bool {
        self.enabled
            && self
                .headline
                .as_deref()
                .is_some_and(|h| !h.trim().is_empty())
    }
}
