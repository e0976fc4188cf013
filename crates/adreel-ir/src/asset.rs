use serde::{Deserialize, Serialize};

use crate::composition::CompositionProps;

/// Reachability class of an external asset reference, decided from the
/// string alone. The render host can only fetch `Valid` references.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AssetStatus {
    Valid,
    DataUrl,
    LocalPath,
    Missing,
}

impl AssetStatus {
    pub fn is_usable(&self) -> bool {
        *self == AssetStatus::Valid
    }
}

impl std::fmt::Display for AssetStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AssetStatus::Valid => write!(f, "valid"),
            AssetStatus::DataUrl => write!(f, "data-url"),
            AssetStatus::LocalPath => write!(f, "local-path"),
            AssetStatus::Missing => write!(f, "missing"),
        }
    }
}

fn has_prefix_ignore_case(s: &str, prefix: &str) -> bool {
    s.len() >= prefix.len()
        && s.is_char_boundary(prefix.len())
        && s[..prefix.len()].eq_ignore_ascii_case(prefix)
}

/// Classify an asset reference. Performs no I/O.
pub fn classify(url: Option<&str>) -> AssetStatus {
    let Some(url) = url.map(str::trim).filter(|u| !u.is_empty()) else {
        return AssetStatus::Missing;
    };
    if has_prefix_ignore_case(url, "http://") || has_prefix_ignore_case(url, "https://") {
        AssetStatus::Valid
    } else if has_prefix_ignore_case(url, "data:") {
        AssetStatus::DataUrl
    } else {
        AssetStatus::LocalPath
    }
}

/// The trimmed URL if it classifies as `Valid`.
pub fn usable_url(url: Option<&String>) -> Option<&str> {
    let url = url.map(String::as_str);
    classify(url).is_usable().then(|| url.map(str::trim)).flatten()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetKind {
    Image,
    Video,
    Audio,
    Font,
}

impl std::fmt::Display for AssetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AssetKind::Image => write!(f, "image"),
            AssetKind::Video => write!(f, "video"),
            AssetKind::Audio => write!(f, "audio"),
            AssetKind::Font => write!(f, "font"),
        }
    }
}

/// One asset reference found in a composition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetRef {
    pub kind: AssetKind,
    /// Where in the props the reference lives, e.g. `scenes[2].assets.imageUrl`.
    pub location: String,
    pub url: String,
    pub status: AssetStatus,
}

/// Every asset reference in a composition, in document order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssetReport {
    pub entries: Vec<AssetRef>,
}

impl AssetReport {
    pub fn collect(props: &CompositionProps) -> Self {
        let mut report = AssetReport::default();

        report.push(AssetKind::Audio, "voiceoverUrl", props.voiceover_url.as_ref());
        report.push(AssetKind::Audio, "musicUrl", props.music_url.as_ref());
        report.push(AssetKind::Image, "brand.logoUrl", props.brand.logo_url.as_ref());
        if let Some(bi) = &props.brand_instructions {
            report.push(
                AssetKind::Image,
                "brandInstructions.introLogoUrl",
                bi.intro_logo_url.as_ref(),
            );
            report.push(
                AssetKind::Image,
                "brandInstructions.outroLogoUrl",
                bi.outro_logo_url.as_ref(),
            );
        }
        if let Some(card) = &props.end_card_config {
            report.push(AssetKind::Image, "endCardConfig.logoUrl", card.logo_url.as_ref());
            report.push(AssetKind::Audio, "endCardConfig.audioUrl", card.audio_url.as_ref());
        }

        for (i, scene) in props.scenes.iter().enumerate() {
            let at = |field: &str| format!("scenes[{i}].{field}");
            let bg_kind = match scene.background.kind {
                crate::scene::BackgroundType::Video => AssetKind::Video,
                _ => AssetKind::Image,
            };
            report.push(bg_kind, at("background.url"), scene.background.url.as_ref());
            report.push(AssetKind::Image, at("assets.imageUrl"), scene.assets.image_url.as_ref());
            report.push(AssetKind::Video, at("assets.videoUrl"), scene.assets.video_url.as_ref());
            report.push(
                AssetKind::Image,
                at("assets.productOverlayUrl"),
                scene.assets.product_overlay_url.as_ref(),
            );
            if let Some(sd) = &scene.sound_design {
                let cues = [
                    ("soundDesign.transitionIn", sd.transition_in.as_ref()),
                    ("soundDesign.ambience", sd.ambience.as_ref()),
                    ("soundDesign.transitionOut", sd.transition_out.as_ref()),
                ];
                for (field, cue) in cues {
                    if let Some(cue) = cue {
                        report.push(AssetKind::Audio, at(field), cue.url.as_ref());
                    }
                }
                for (j, cue) in sd.emphasis.iter().enumerate() {
                    report.push(
                        AssetKind::Audio,
                        at(&format!("soundDesign.emphasis[{j}]")),
                        cue.url.as_ref(),
                    );
                }
            }
        }

        report
    }

    /// Record a reference. Absent fields are not listed; empty strings are,
    /// as `Missing`.
    fn push(&mut self, kind: AssetKind, location: impl Into<String>, url: Option<&String>) {
        if let Some(url) = url {
            self.entries.push(AssetRef {
                kind,
                location: location.into(),
                url: url.clone(),
                status: classify(Some(url)),
            });
        }
    }

    /// References the compositor will not be able to use.
    pub fn unusable(&self) -> impl Iterator<Item = &AssetRef> {
        self.entries.iter().filter(|e| !e.status.is_usable())
    }

    /// Distinct fetchable URLs of `kind`, in first-seen order.
    pub fn fetchable(&self, kind: AssetKind) -> Vec<&str> {
        let mut seen = std::collections::HashSet::new();
        self.entries
            .iter()
            .filter(|e| e.kind == kind && e.status.is_usable())
            .map(|e| e.url.trim())
            .filter(|u| seen.insert(*u))
            .collect()
    }

    pub fn count(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{Scene, SceneType};

    #[test]
    fn test_classify_schemes() {
        assert_eq!(classify(Some("https://cdn.example.com/a.png")), AssetStatus::Valid);
        assert_eq!(classify(Some("http://cdn.example.com/a.png")), AssetStatus::Valid);
        assert_eq!(classify(Some("HTTPS://CDN.EXAMPLE.COM/A.PNG")), AssetStatus::Valid);
        assert_eq!(classify(Some("  https://x/y.png  ")), AssetStatus::Valid);
        assert_eq!(classify(Some("data:image/png;base64,AAAA")), AssetStatus::DataUrl);
        assert_eq!(classify(Some("/local/path.png")), AssetStatus::LocalPath);
        assert_eq!(classify(Some("assets/hero.jpg")), AssetStatus::LocalPath);
        assert_eq!(classify(Some("file:///tmp/a.png")), AssetStatus::LocalPath);
        assert_eq!(classify(Some("blob:https://x/123")), AssetStatus::LocalPath);
        assert_eq!(classify(Some("ftp://x/a.png")), AssetStatus::LocalPath);
        assert_eq!(classify(Some("")), AssetStatus::Missing);
        assert_eq!(classify(Some("   ")), AssetStatus::Missing);
        assert_eq!(classify(None), AssetStatus::Missing);
    }

    #[test]
    fn test_only_http_is_usable() {
        for url in ["data:x", "/a.png", "httpx://a", "http:/a", "https//a", "ht"] {
            assert!(!classify(Some(url)).is_usable(), "{url} must not be valid");
        }
    }

    #[test]
    fn test_multibyte_input_does_not_panic() {
        assert_eq!(classify(Some("ééé")), AssetStatus::LocalPath);
        assert_eq!(classify(Some("日本語のパス")), AssetStatus::LocalPath);
    }

    #[test]
    fn test_usable_url_trims() {
        let url = " https://x/y.png ".to_string();
        assert_eq!(usable_url(Some(&url)), Some("https://x/y.png"));
        let local = "/a.png".to_string();
        assert_eq!(usable_url(Some(&local)), None);
        assert_eq!(usable_url(None), None);
    }

    #[test]
    fn test_report_collects_and_dedups() {
        let mut scene = Scene::new("s1", SceneType::Hook, 3.0);
        scene.assets.image_url = Some("/local/path.png".into());
        scene.assets.product_overlay_url = Some("https://cdn/logo.png".into());
        let props = CompositionProps {
            scenes: vec![scene],
            voiceover_url: Some("https://cdn/vo.mp3".into()),
            music_url: Some("".into()),
            brand: crate::brand::BrandSettings {
                logo_url: Some("https://cdn/logo.png".into()),
                ..Default::default()
            },
            ..Default::default()
        };
        let report = AssetReport::collect(&props);
        assert_eq!(report.count(), 5);
        assert_eq!(report.unusable().count(), 2);
        assert_eq!(report.fetchable(AssetKind::Image), vec!["https://cdn/logo.png"]);
        assert_eq!(report.fetchable(AssetKind::Audio), vec!["https://cdn/vo.mp3"]);
        let local = report
            .entries
            .iter()
            .find(|e| e.location == "scenes[0].assets.imageUrl")
            .unwrap();
        assert_eq!(local.status, AssetStatus::LocalPath);
    }
}
