//! # adreel-encode
//!
//! Output sinks for rendered compositions. Frames go to a PNG sequence or a
//! single animated PNG; the mixed soundtrack goes to a 16-bit PCM WAV.
//! Container muxing is left to the host.

pub mod apng;
pub mod png_seq;
pub mod wav;

pub use apng::ApngEncoder;
pub use png_seq::PngSequenceWriter;
pub use wav::WavWriter;
