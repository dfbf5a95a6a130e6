//! subburn - burn styled subtitles into video files via ffmpeg.
//!
//! This crate contains the full burn-in pipeline with no UI
//! dependencies: subtitle parsing into a canonical line model, ASS
//! document serialization, ffmpeg command construction, and async
//! subprocess supervision. It can be used by a GUI shell or the
//! bundled batch CLI.

pub mod config;
pub mod encode;
pub mod jobs;
pub mod subtitles;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
