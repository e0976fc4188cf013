use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use adreel_core::{AdreelError, AdreelResult, FrameBuffer};

/// Animated PNG encoder built on the `png` crate. Lossless, so it doubles as
/// a reviewable single-file preview of a render.
pub struct ApngEncoder;

impl ApngEncoder {
    /// Encode `frames` as one APNG at `path`.
    ///
    /// Every frame must be RGBA8 at `width`×`height`. `loops` of `None` or
    /// `Some(0)` plays forever.
    pub fn encode(
        frames: &[FrameBuffer],
        width: u32,
        height: u32,
        fps: u32,
        path: &Path,
        loops: Option<u32>,
    ) -> AdreelResult<()> {
        if frames.is_empty() {
            return Err(AdreelError::Encode("no frames to encode for APNG".into()));
        }
        if fps == 0 || fps > u32::from(u16::MAX) {
            return Err(AdreelError::Encode(format!("unsupported APNG frame rate {fps}")));
        }
        let frame_count = u32::try_from(frames.len())
            .map_err(|_| AdreelError::Encode("too many frames for APNG".into()))?;
        for (i, frame) in frames.iter().enumerate() {
            check_frame(i, frame, width, height)?;
        }

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = File::create(path)
            .map_err(|e| AdreelError::Encode(format!("failed to create APNG file: {e}")))?;

        let delay_den = fps as u16;
        let mut encoder = png::Encoder::new(BufWriter::new(file), width, height);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        encoder
            .set_animated(frame_count, loops.unwrap_or(0))
            .map_err(|e| AdreelError::Encode(format!("failed to set APNG animation: {e}")))?;
        encoder
            .set_frame_delay(1, delay_den)
            .map_err(|e| AdreelError::Encode(format!("failed to set APNG frame delay: {e}")))?;

        let mut writer = encoder
            .write_header()
            .map_err(|e| AdreelError::Encode(format!("failed to write APNG header: {e}")))?;

        for (i, frame) in frames.iter().enumerate() {
            writer
                .write_image_data(&frame.data)
                .map_err(|e| AdreelError::Encode(format!("failed to write APNG frame {i}: {e}")))?;
        }
        writer
            .finish()
            .map_err(|e| AdreelError::Encode(format!("failed to finalize APNG: {e}")))?;

        tracing::info!(
            frames = frames.len(),
            path = %path.display(),
            width,
            height,
            fps,
            "encoded APNG"
        );
        Ok(())
    }
}

pub(crate) fn check_frame(
    index: usize,
    frame: &FrameBuffer,
    width: u32,
    height: u32,
) -> AdreelResult<()> {
    if frame.width != width || frame.height != height {
        return Err(AdreelError::Encode(format!(
            "frame {index} has dimensions {}x{}, expected {width}x{height}",
            frame.width, frame.height
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use adreel_core::Color;

    fn frames(n: u8) -> Vec<FrameBuffer> {
        (0..n)
            .map(|i| FrameBuffer::solid(4, 4, &Color::from_rgb8(0, i * 50, 255)))
            .collect()
    }

    #[test]
    fn test_apng_encode_empty_frames() {
        let out = std::env::temp_dir().join("adreel_test_empty.png");
        assert!(ApngEncoder::encode(&[], 320, 240, 30, &out, None).is_err());
    }

    #[test]
    fn test_apng_encode_solid_frames() {
        let out = std::env::temp_dir().join("adreel_test_apng.png");
        let result = ApngEncoder::encode(&frames(5), 4, 4, 10, &out, None);
        assert!(result.is_ok(), "APNG encode failed: {:?}", result.err());

        let decoder = png::Decoder::new(File::open(&out).unwrap());
        let reader = decoder.read_info().unwrap();
        let info = reader.info();
        assert_eq!((info.width, info.height), (4, 4));
        assert_eq!(info.animation_control.map(|a| a.num_frames), Some(5));

        let _ = std::fs::remove_file(&out);
    }

    #[test]
    fn test_apng_rejects_mismatched_frame() {
        let mut input = frames(2);
        input.push(FrameBuffer::solid(2, 2, &Color::WHITE));
        let out = std::env::temp_dir().join("adreel_test_mismatch.png");
        let err = ApngEncoder::encode(&input, 4, 4, 30, &out, None).unwrap_err();
        assert!(err.to_string().contains("frame 2"));
        let _ = std::fs::remove_file(&out);
    }

    #[test]
    fn test_apng_rejects_zero_fps() {
        let out = std::env::temp_dir().join("adreel_test_zero_fps.png");
        assert!(ApngEncoder::encode(&frames(1), 4, 4, 0, &out, None).is_err());
    }
}
