//! Subtitle handling: canonical line model, parsers, styling, writers.
//!
//! All sources (SRT, ASS, CSV) normalize into [`SubtitleLine`]
//! sequences, which the ASS writer turns back into a styled document
//! for burn-in.

pub mod error;
pub mod parsers;
pub mod style;
pub mod types;
pub mod writers;

pub use error::ParseError;
pub use style::StyleConfig;
pub use types::{shift_all, SubtitleFormat, SubtitleLine, DEFAULT_DURATION_SECS};
