use std::fs::File;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use rayon::prelude::*;
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::DecoderOptions;
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

use adreel_core::AdreelConfig;
use adreel_ir::{AssetKind, AssetReport};
use adreel_render::image_loader::load_image;
use adreel_render::{AudioClip, PreloadedAssets};

use crate::remote_assets::{expand_tilde, FetchedAssets};

#[derive(Debug, Default)]
pub struct MediaReport {
    pub images: usize,
    pub audio: usize,
    pub fonts: usize,
    pub failed: usize,
}

/// Decode everything that was fetched into an in-memory provider. Assets
/// that fail to decode are left out and fall back at render time.
pub fn load_assets(
    report: &AssetReport,
    fetched: &FetchedAssets,
    config: &AdreelConfig,
) -> (PreloadedAssets, MediaReport) {
    let mut assets = PreloadedAssets::new();
    let mut media = MediaReport::default();

    let images: Vec<_> = report
        .fetchable(AssetKind::Image)
        .into_par_iter()
        .filter_map(|url| fetched.path(url).map(|p| (url, load_image(p))))
        .collect();
    for (url, decoded) in images {
        match decoded {
            Ok(fb) => {
                assets.insert_image(url, fb);
                media.images += 1;
            }
            Err(e) => {
                tracing::warn!(url, error = %e, "image decode failed, falling back");
                media.failed += 1;
            }
        }
    }

    let clips: Vec<_> = report
        .fetchable(AssetKind::Audio)
        .into_par_iter()
        .filter_map(|url| fetched.path(url).map(|p| (url, decode_audio(p))))
        .collect();
    for (url, decoded) in clips {
        match decoded {
            Ok(clip) => {
                assets.insert_audio(url, clip);
                media.audio += 1;
            }
            Err(e) => {
                tracing::warn!(url, error = %e, "audio decode failed, track stays silent");
                media.failed += 1;
            }
        }
    }

    for (family, path) in &config.assets.fonts {
        let loaded = expand_tilde(path).and_then(|p| {
            assets
                .fonts_mut()
                .load_font(family, &p)
                .map_err(anyhow::Error::from)
        });
        match loaded {
            Ok(()) => media.fonts += 1,
            Err(e) => {
                tracing::warn!(family = %family, error = %e, "font not loaded");
                media.failed += 1;
            }
        }
    }

    (assets, media)
}

/// Decode a whole audio file to interleaved stereo f32 at its own rate.
/// The mixer resamples to the output rate.
pub fn decode_audio(path: &Path) -> Result<AudioClip> {
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .context("unsupported audio format")?;
    let mut format = probed.format;
    let track = format
        .default_track()
        .ok_or_else(|| anyhow!("no audio track in {}", path.display()))?;
    let track_id = track.id;
    let source_rate = track.codec_params.sample_rate.unwrap_or(44_100);
    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .context("unsupported audio codec")?;

    let mut samples = Vec::new();
    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(_)) | Err(SymphoniaError::ResetRequired) => break,
            Err(e) => return Err(e).context("failed to read audio packet"),
        };
        if packet.track_id() != track_id {
            continue;
        }
        match decoder.decode(&packet) {
            Ok(decoded) => {
                let spec = *decoded.spec();
                let mut buf = SampleBuffer::<f32>::new(decoded.capacity() as u64, spec);
                buf.copy_interleaved_ref(decoded);
                push_stereo(&mut samples, buf.samples(), spec.channels.count());
            }
            Err(SymphoniaError::DecodeError(e)) => {
                tracing::debug!(error = e, "skipping corrupt audio packet");
            }
            Err(e) => return Err(e).context("audio decode failed"),
        }
    }

    Ok(AudioClip::new(source_rate, 2, samples))
}

/// Append interleaved `input` as stereo: mono is duplicated, extra channels
/// are dropped.
fn push_stereo(out: &mut Vec<f32>, input: &[f32], channels: usize) {
    match channels {
        0 => {}
        1 => {
            for &s in input {
                out.push(s);
                out.push(s);
            }
        }
        n => {
            for chunk in input.chunks_exact(n) {
                out.push(chunk[0]);
                out.push(chunk[1]);
            }
        }
    }
}
