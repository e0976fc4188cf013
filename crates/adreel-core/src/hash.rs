//! Content hashing for render verification.
//!
//! Every digest is SHA-256 over a domain tag followed by length-prefixed
//! data, so a frame, an audio track and a layer plan can never collide even
//! when their raw bytes match. Renders of the same props and assets hash
//! identically across runs and threads.

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::error::AdreelResult;
use crate::frame::FrameBuffer;

const FRAME_TAG: &[u8] = b"adreel/frame";
const AUDIO_TAG: &[u8] = b"adreel/audio";
const PLAN_TAG: &[u8] = b"adreel/plan";
const RENDER_TAG: &[u8] = b"adreel/render";

/// A SHA-256 digest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContentHash {
    bytes: [u8; 32],
}

impl ContentHash {
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self { bytes }
    }

    pub fn to_hex(&self) -> String {
        self.bytes.iter().map(|b| format!("{b:02x}")).collect()
    }

    /// First 12 hex digits, for log lines and terminal output.
    pub fn short(&self) -> String {
        let mut hex = self.to_hex();
        hex.truncate(12);
        hex
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.bytes
    }
}

impl std::fmt::Display for ContentHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Incremental hash of a render: frames and audio in output order.
///
/// Feeding the same frames and samples in the same order always gives the
/// same digest, whether they arrive all at once or frame by frame.
#[derive(Clone)]
pub struct RenderHasher {
    inner: Sha256,
    frames: u64,
    samples: u64,
}

impl RenderHasher {
    pub fn new() -> Self {
        let mut inner = Sha256::new();
        inner.update(RENDER_TAG);
        Self {
            inner,
            frames: 0,
            samples: 0,
        }
    }

    pub fn frame(&mut self, frame: &FrameBuffer) -> &mut Self {
        update_frame(&mut self.inner, frame);
        self.frames += 1;
        self
    }

    pub fn audio(&mut self, samples: &[f32]) -> &mut Self {
        update_samples(&mut self.inner, samples);
        self.samples += samples.len() as u64;
        self
    }

    pub fn frame_count(&self) -> u64 {
        self.frames
    }

    pub fn finish(self) -> ContentHash {
        let mut inner = self.inner;
        inner.update(self.frames.to_le_bytes());
        inner.update(self.samples.to_le_bytes());
        finalize(inner)
    }
}

impl Default for RenderHasher {
    fn default() -> Self {
        Self::new()
    }
}

fn update_frame(hasher: &mut Sha256, frame: &FrameBuffer) {
    hasher.update(FRAME_TAG);
    hasher.update(frame.width.to_le_bytes());
    hasher.update(frame.height.to_le_bytes());
    hasher.update(&frame.data);
}

fn update_samples(hasher: &mut Sha256, samples: &[f32]) {
    hasher.update(AUDIO_TAG);
    hasher.update((samples.len() as u64).to_le_bytes());
    for s in samples {
        hasher.update(s.to_bits().to_le_bytes());
    }
}

fn finalize(hasher: Sha256) -> ContentHash {
    let mut bytes = [0u8; 32];
    bytes.copy_from_slice(&hasher.finalize());
    ContentHash::from_bytes(bytes)
}

/// Hash of one composited frame, dimensions included.
pub fn hash_frame(frame: &FrameBuffer) -> ContentHash {
    let mut hasher = Sha256::new();
    update_frame(&mut hasher, frame);
    finalize(hasher)
}

/// Hash of a frame sequence in order.
pub fn hash_frames(frames: &[FrameBuffer]) -> ContentHash {
    let mut hasher = Sha256::new();
    hasher.update((frames.len() as u64).to_le_bytes());
    for frame in frames {
        update_frame(&mut hasher, frame);
    }
    finalize(hasher)
}

/// Hash of interleaved f32 PCM, bit-exact.
pub fn hash_samples(samples: &[f32]) -> ContentHash {
    let mut hasher = Sha256::new();
    update_samples(&mut hasher, samples);
    finalize(hasher)
}

/// Hash of any serializable plan through its JSON form.
pub fn hash_plan<T: Serialize>(plan: &T) -> AdreelResult<ContentHash> {
    let json = serde_json::to_vec(plan)?;
    let mut hasher = Sha256::new();
    hasher.update(PLAN_TAG);
    hasher.update((json.len() as u64).to_le_bytes());
    hasher.update(&json);
    Ok(finalize(hasher))
}
