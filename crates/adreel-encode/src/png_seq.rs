use std::path::{Path, PathBuf};

use adreel_core::{AdreelError, AdreelResult, FrameBuffer};

use crate::apng::check_frame;

/// Writes frames as numbered still PNGs (`<prefix>_00000.png`, ...).
pub struct PngSequenceWriter;

impl PngSequenceWriter {
    /// The file name used for frame `index`.
    pub fn file_name(prefix: &str, index: u64) -> String {
        format!("{prefix}_{index:05}.png")
    }

    /// Write `frames` into `dir`, numbering from `first_index`. Returns the
    /// written paths in order.
    pub fn write(
        frames: &[FrameBuffer],
        dir: &Path,
        prefix: &str,
        first_index: u64,
    ) -> AdreelResult<Vec<PathBuf>> {
        std::fs::create_dir_all(dir)?;
        let mut written = Vec::with_capacity(frames.len());
        for (i, frame) in frames.iter().enumerate() {
            check_frame(i, frame, frame.width, frame.height)?;
            let path = dir.join(Self::file_name(prefix, first_index + i as u64));
            image::save_buffer(
                &path,
                &frame.data,
                frame.width,
                frame.height,
                image::ExtendedColorType::Rgba8,
            )
            .map_err(|e| AdreelError::Encode(format!("failed to write {}: {e}", path.display())))?;
            written.push(path);
        }
        tracing::info!(frames = written.len(), dir = %dir.display(), "wrote PNG sequence");
        Ok(written)
    }
}
