//! Core subtitle types.
//!
//! All timing values are stored as `f64` seconds. Rounding to
//! centiseconds (ASS) happens only at write time.

use std::path::Path;

/// Default duration assigned when a source omits the end time or puts it
/// at or before the start.
pub const DEFAULT_DURATION_SECS: f64 = 3.0;

/// Supported subtitle source formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubtitleFormat {
    /// Advanced SubStation Alpha (.ass, .ssa)
    Ass,
    /// SubRip (.srt)
    Srt,
    /// Tabular timing/text data (.csv)
    Csv,
}

impl SubtitleFormat {
    /// Detect format from file extension.
    pub fn from_extension(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "ass" | "ssa" => Some(Self::Ass),
            "srt" => Some(Self::Srt),
            "csv" => Some(Self::Csv),
            _ => None,
        }
    }

    /// Typical file extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Ass => "ass",
            Self::Srt => "srt",
            Self::Csv => "csv",
        }
    }
}

/// A single canonical subtitle line.
///
/// Every parser converts its source into a sequence of these. Text may
/// contain the ASS line-break marker `\N`; ordering follows source
/// order, not necessarily start time.
#[derive(Debug, Clone, PartialEq)]
pub struct SubtitleLine {
    /// Start time in seconds.
    pub start: f64,
    /// End time in seconds. Always strictly greater than `start`.
    pub end: f64,
    /// Text content (may contain `\N` line breaks).
    pub text: String,
}

impl SubtitleLine {
    /// Create a new line, enforcing `end > start`.
    ///
    /// When `end` is at or before `start`, the line gets a default
    /// 3-second duration from its start.
    pub fn new(start: f64, end: f64, text: impl Into<String>) -> Self {
        let start = start.max(0.0);
        let end = if end > start {
            end
        } else {
            start + DEFAULT_DURATION_SECS
        };
        Self {
            start,
            end,
            text: text.into(),
        }
    }

    /// Create a line with the default duration from `start`.
    pub fn with_default_duration(start: f64, text: impl Into<String>) -> Self {
        Self::new(start, start, text)
    }

    /// Duration in seconds.
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    /// Shift this line by an offset in seconds.
    ///
    /// Times are clamped to 0 (no negative times).
    pub fn shift(&mut self, offset: f64) {
        self.start = (self.start + offset).max(0.0);
        self.end = (self.end + offset).max(0.0);
    }
}

/// Shift all lines by a time offset in seconds.
///
/// Positive offset moves lines forward in time; negative moves them
/// backward, clamped at 0.
pub fn shift_all(lines: &mut [SubtitleLine], offset: f64) {
    for line in lines {
        line.shift(offset);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_detection() {
        assert_eq!(
            SubtitleFormat::from_extension(Path::new("test.ass")),
            Some(SubtitleFormat::Ass)
        );
        assert_eq!(
            SubtitleFormat::from_extension(Path::new("test.SRT")),
            Some(SubtitleFormat::Srt)
        );
        assert_eq!(
            SubtitleFormat::from_extension(Path::new("data.csv")),
            Some(SubtitleFormat::Csv)
        );
        assert_eq!(SubtitleFormat::from_extension(Path::new("test.txt")), None);
    }

    #[test]
    fn end_always_after_start() {
        let line = SubtitleLine::new(5.0, 4.0, "backwards");
        assert_eq!(line.start, 5.0);
        assert_eq!(line.end, 8.0);

        let line = SubtitleLine::new(2.0, 2.0, "zero length");
        assert_eq!(line.end, 5.0);

        let line = SubtitleLine::with_default_duration(1.0, "no end");
        assert_eq!(line.end, 4.0);
    }

    #[test]
    fn shift_clamps_at_zero() {
        let mut line = SubtitleLine::new(1.0, 2.0, "x");
        line.shift(0.5);
        assert_eq!(line.start, 1.5);
        assert_eq!(line.end, 2.5);

        line.shift(-5.0);
        assert_eq!(line.start, 0.0);
        assert_eq!(line.end, 0.0);
    }

    #[test]
    fn shift_all_applies_offset() {
        let mut lines = vec![
            SubtitleLine::new(0.0, 1.0, "a"),
            SubtitleLine::new(10.0, 12.0, "b"),
        ];
        shift_all(&mut lines, 2.5);
        assert_eq!(lines[0].start, 2.5);
        assert_eq!(lines[1].end, 14.5);
    }
}
