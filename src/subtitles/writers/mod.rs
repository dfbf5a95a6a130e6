//! Subtitle writers.

pub mod ass;

pub use ass::{format_ass_time, write_ass, write_ass_file};
