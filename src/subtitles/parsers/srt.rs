//! SRT subtitle parser.
//!
//! Parses SubRip (.srt) content into canonical lines.
//!
//! # Format Overview
//!
//! SRT files consist of sequential entries:
//! ```text
//! 1
//! 00:00:01,000 --> 00:00:04,000
//! Hello, world!
//!
//! 2
//! 00:00:05,000 --> 00:00:08,000
//! This is a test.
//! ```
//!
//! Each entry has an index (ignored), a timing line
//! `HH:MM:SS,mmm --> HH:MM:SS,mmm`, one or more text lines, and a blank
//! separator. Multi-line text is joined with the ASS `\N` marker so
//! captions survive re-serialization into a styled document.

use crate::subtitles::error::ParseError;
use crate::subtitles::types::SubtitleLine;

/// Parse SRT content into canonical lines.
pub fn parse_srt(content: &str) -> Result<Vec<SubtitleLine>, ParseError> {
    let mut lines = Vec::new();

    // Normalize line endings and split into blocks
    let content = content.replace("\r\n", "\n").replace('\r', "\n");
    let blocks: Vec<&str> = content.split("\n\n").collect();

    let mut line_offset = 0;

    for block in blocks {
        let block = block.trim();
        if block.is_empty() {
            line_offset += 2;
            continue;
        }

        let block_lines: Vec<&str> = block.lines().collect();
        if block_lines.len() < 2 {
            line_offset += block_lines.len() + 1;
            continue;
        }

        // The timing line may or may not have an index before it
        let Some((timing_idx, timing_line)) = find_timing_line(&block_lines) else {
            line_offset += block_lines.len() + 1;
            continue;
        };

        let timing_line_num = line_offset + timing_idx + 1;
        let (start_ms, end_ms) = parse_srt_timing(timing_line)
            .ok_or_else(|| ParseError::invalid_time(timing_line_num, timing_line))?;

        // Text is everything after the timing line, joined with \N
        let text = block_lines[timing_idx + 1..].join("\\N");

        if !text.is_empty() {
            lines.push(SubtitleLine::new(start_ms / 1000.0, end_ms / 1000.0, text));
        }

        line_offset += block_lines.len() + 1;
    }

    Ok(lines)
}

/// Find the timing line in a block of lines.
fn find_timing_line<'a>(lines: &[&'a str]) -> Option<(usize, &'a str)> {
    lines
        .iter()
        .enumerate()
        .find(|(_, line)| line.contains(" --> "))
        .map(|(i, line)| (i, *line))
}

/// Parse an SRT timing line: `HH:MM:SS,mmm --> HH:MM:SS,mmm`.
///
/// Returns (start_ms, end_ms).
fn parse_srt_timing(line: &str) -> Option<(f64, f64)> {
    let parts: Vec<&str> = line.split(" --> ").collect();
    if parts.len() != 2 {
        return None;
    }

    let start = parse_srt_time(parts[0].trim())?;
    let end = parse_srt_time(parts[1].trim())?;

    Some((start, end))
}

/// Parse an SRT timestamp: `HH:MM:SS,mmm` or `HH:MM:SS.mmm`.
///
/// Returns time in milliseconds.
pub fn parse_srt_time(s: &str) -> Option<f64> {
    // Both comma and period appear in the wild as decimal separator
    let s = s.trim().replace(',', ".");

    let parts: Vec<&str> = s.split(':').collect();
    if parts.len() != 3 {
        return None;
    }

    let hours: f64 = parts[0].parse().ok()?;
    let minutes: f64 = parts[1].parse().ok()?;

    let sec_parts: Vec<&str> = parts[2].split('.').collect();
    let seconds: f64 = sec_parts[0].parse().ok()?;

    let milliseconds: f64 = if sec_parts.len() > 1 {
        let ms_str = sec_parts[1];
        let ms_val: f64 = ms_str.parse().ok()?;
        // Normalize based on number of digits
        match ms_str.len() {
            1 => ms_val * 100.0,
            2 => ms_val * 10.0,
            3 => ms_val,
            _ => ms_val / 10f64.powi(ms_str.len() as i32 - 3),
        }
    } else {
        0.0
    };

    Some(hours * 3600000.0 + minutes * 60000.0 + seconds * 1000.0 + milliseconds)
}
