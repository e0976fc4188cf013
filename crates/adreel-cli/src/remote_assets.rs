use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use reqwest::blocking::Client;
use sha2::{Digest, Sha256};

use adreel_core::AdreelConfig;
use adreel_ir::{AssetKind, AssetReport};

/// Where each fetchable URL of a composition ended up on disk.
#[derive(Debug, Default)]
pub struct FetchedAssets {
    pub paths: HashMap<String, PathBuf>,
    pub downloaded: usize,
    pub reused_from_cache: usize,
    pub failed: usize,
}

impl FetchedAssets {
    pub fn path(&self, url: &str) -> Option<&Path> {
        self.paths.get(url).map(PathBuf::as_path)
    }
}

// Video backgrounds are not decoded by this host; they fall back.
const FETCH_KINDS: [AssetKind; 2] = [AssetKind::Image, AssetKind::Audio];

/// Download every usable remote asset into the content-addressed cache.
///
/// A failed fetch is logged and skipped; the compositor falls back for that
/// asset. With `fetch_remote` off only cache hits are used.
pub fn fetch_remote_assets(report: &AssetReport, config: &AdreelConfig) -> Result<FetchedAssets> {
    let cache_root = resolve_cache_root(config)?;
    let client = Client::builder()
        .timeout(Duration::from_secs(30))
        .build()
        .context("failed to build HTTP client")?;

    let mut fetched = FetchedAssets::default();
    for kind in FETCH_KINDS {
        for url in report.fetchable(kind) {
            let out_path = cached_path(&cache_root, kind, url);
            if out_path.exists() {
                fetched.paths.insert(url.to_string(), out_path);
                fetched.reused_from_cache += 1;
                continue;
            }
            if !config.assets.fetch_remote {
                tracing::debug!(url, "remote fetch disabled, asset not cached");
                continue;
            }
            match download(&client, url, &out_path) {
                Ok(()) => {
                    fetched.paths.insert(url.to_string(), out_path);
                    fetched.downloaded += 1;
                }
                Err(e) => {
                    tracing::warn!(url, error = %e, "asset fetch failed, falling back");
                    fetched.failed += 1;
                }
            }
        }
    }
    Ok(fetched)
}

fn download(client: &Client, url: &str, out_path: &Path) -> Result<()> {
    if let Some(dir) = out_path.parent() {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create asset cache dir: {}", dir.display()))?;
    }

    let res = client
        .get(url)
        .send()
        .with_context(|| format!("failed to download asset: {url}"))?;
    if !res.status().is_success() {
        return Err(anyhow!("remote asset fetch failed: {}", res.status()));
    }
    let bytes = res
        .bytes()
        .with_context(|| format!("failed to read bytes for asset: {url}"))?;

    let tmp_path = out_path.with_extension(format!("{}.tmp", uuid::Uuid::new_v4()));
    std::fs::write(&tmp_path, &bytes)
        .with_context(|| format!("failed to write downloaded asset: {}", tmp_path.display()))?;
    std::fs::rename(&tmp_path, out_path).with_context(|| {
        format!(
            "failed to finalize downloaded asset (rename {} -> {})",
            tmp_path.display(),
            out_path.display()
        )
    })?;
    Ok(())
}

fn cached_path(cache_root: &Path, kind: AssetKind, url: &str) -> PathBuf {
    let key = sha256_hex(&format!("asset_fetch|type={kind}|url={url}"));
    let ext = infer_extension_from_url(url).unwrap_or_else(|| default_extension(kind).to_string());
    cache_root
        .join("assets")
        .join(kind_dir(kind))
        .join(format!("{key}.{ext}"))
}

fn kind_dir(kind: AssetKind) -> &'static str {
    match kind {
        AssetKind::Image => "images",
        AssetKind::Video => "video",
        AssetKind::Audio => "audio",
        AssetKind::Font => "fonts",
    }
}

fn default_extension(kind: AssetKind) -> &'static str {
    match kind {
        AssetKind::Image => "png",
        AssetKind::Video => "mp4",
        AssetKind::Audio => "mp3",
        AssetKind::Font => "ttf",
    }
}

fn infer_extension_from_url(url: &str) -> Option<String> {
    let no_frag = url.split('#').next().unwrap_or(url);
    let no_query = no_frag.split('?').next().unwrap_or(no_frag);

    let ext = Path::new(no_query)
        .extension()
        .and_then(|s| s.to_str())
        .map(|s| s.trim().trim_start_matches('.').to_lowercase())?;

    if ext.is_empty() || ext.len() > 5 || !ext.chars().all(|c| c.is_ascii_alphanumeric()) {
        None
    } else {
        Some(ext)
    }
}

pub fn resolve_cache_root(config: &AdreelConfig) -> Result<PathBuf> {
    expand_tilde(&config.assets.cache_dir)
}

pub fn expand_tilde(path: &str) -> Result<PathBuf> {
    if path == "~" || path.starts_with("~/") {
        let home = dirs::home_dir().ok_or_else(|| anyhow!("failed to resolve home dir"))?;
        if path == "~" {
            return Ok(home);
        }
        return Ok(home.join(path.trim_start_matches("~/")));
    }
    Ok(PathBuf::from(path))
}

fn sha256_hex(input: &str) -> String {
    let digest = Sha256::digest(input.as_bytes());
    digest.iter().map(|b| format!("{b:02x}")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn infer_extension_from_url_works() {
        assert_eq!(
            infer_extension_from_url("https://x/y.png").as_deref(),
            Some("png")
        );
        assert_eq!(
            infer_extension_from_url("https://x/y.JPG?cache=1").as_deref(),
            Some("jpg")
        );
        assert_eq!(infer_extension_from_url("https://x/y").as_deref(), None);
        assert_eq!(infer_extension_from_url("https://x.com/a.b-c").as_deref(), None);
    }

    #[test]
    fn cache_path_is_keyed_by_kind_and_url() {
        let root = Path::new("/cache");
        let a = cached_path(root, AssetKind::Image, "https://cdn/a.jpg");
        let b = cached_path(root, AssetKind::Image, "https://cdn/a.jpg");
        let c = cached_path(root, AssetKind::Audio, "https://cdn/a.jpg");
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert!(a.starts_with("/cache/assets/images"));
        assert_eq!(a.extension().and_then(|e| e.to_str()), Some("jpg"));

        let bare = cached_path(root, AssetKind::Audio, "https://cdn/track");
        assert_eq!(bare.extension().and_then(|e| e.to_str()), Some("mp3"));
    }

    #[test]
    fn sha256_hex_is_stable() {
        let a = sha256_hex("hello");
        assert_eq!(a, sha256_hex("hello"));
        assert_eq!(a.len(), 64);
    }

    #[test]
    fn cache_hits_are_used_without_fetching() {
        let root = std::env::temp_dir().join(format!("adreel_cache_{}", std::process::id()));
        let mut config = AdreelConfig::default();
        config.assets.cache_dir = root.to_string_lossy().into_owned();
        config.assets.fetch_remote = false;

        let url = "https://cdn.example.com/logo.png";
        let hit = cached_path(&root, AssetKind::Image, url);
        std::fs::create_dir_all(hit.parent().unwrap()).unwrap();
        std::fs::write(&hit, b"png").unwrap();

        let props = adreel_ir::CompositionProps {
            brand: adreel_ir::BrandSettings {
                logo_url: Some(url.into()),
                ..Default::default()
            },
            music_url: Some("https://cdn.example.com/bed.mp3".into()),
            ..Default::default()
        };
        let fetched = fetch_remote_assets(&AssetReport::collect(&props), &config).unwrap();
        assert_eq!(fetched.reused_from_cache, 1);
        assert_eq!(fetched.downloaded, 0);
        assert_eq!(fetched.path(url), Some(hit.as_path()));
        assert!(fetched.path("https://cdn.example.com/bed.mp3").is_none());

        let _ = std::fs::remove_dir_all(&root);
    }
}
