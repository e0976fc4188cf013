//! # adreel-core
//!
//! Core types and primitives for the adreel scene compositor.
//! This crate contains foundational types shared across all adreel crates:
//! frame math, easing curves, colors, layer styles, frame buffers, hashing,
//! configuration and error types.

pub mod color;
pub mod config;
pub mod easing;
pub mod error;
pub mod frame;
pub mod hash;
pub mod math;
pub mod time;

pub use config::*;

pub use color::Color;
pub use easing::{interpolate, spring, Easing, SpringConfig};
pub use error::{AdreelError, AdreelResult};
pub use frame::FrameBuffer;
pub use math::{LayerStyle, Point2D, Size2D};
pub use time::{frame_to_sample, frame_to_seconds, seconds_to_frames, Fps};
