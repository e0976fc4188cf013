use std::path::Path;

use adreel_core::{AdreelError, AdreelResult};

/// 16-bit PCM WAV writer for the mixed soundtrack.
pub struct WavWriter;

impl WavWriter {
    /// Write interleaved `samples` in [-1, 1]. Out-of-range samples clip.
    pub fn write(samples: &[f32], channels: u16, sample_rate: u32, path: &Path) -> AdreelResult<()> {
        if channels == 0 || sample_rate == 0 {
            return Err(AdreelError::Encode(format!(
                "invalid WAV format: {channels} channels at {sample_rate} Hz"
            )));
        }
        if samples.len() % usize::from(channels) != 0 {
            return Err(AdreelError::Encode(format!(
                "{} samples do not divide into {channels} channels",
                samples.len()
            )));
        }
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let spec = hound::WavSpec {
            channels,
            sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(path, spec).map_err(encode_err)?;
        for &sample in samples {
            writer.write_sample(to_i16(sample)).map_err(encode_err)?;
        }
        writer.finalize().map_err(encode_err)?;

        tracing::info!(
            samples = samples.len(),
            channels,
            sample_rate,
            path = %path.display(),
            "wrote WAV"
        );
        Ok(())
    }
}

fn to_i16(sample: f32) -> i16 {
    let s = if sample.is_finite() { sample.clamp(-1.0, 1.0) } else { 0.0 };
    (s * f32::from(i16::MAX)).round() as i16
}

fn encode_err(e: hound::Error) -> AdreelError {
    AdreelError::Encode(format!("WAV write failed: {e}"))
}
