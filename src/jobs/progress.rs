//! ffmpeg diagnostic-stream scanning.
//!
//! ffmpeg reports everything on stderr as free-form text. Two line
//! shapes matter here: a one-time total-duration announcement,
//!
//! ```text
//!   Duration: 00:01:23.45, start: 0.000000, bitrate: 1454 kb/s
//! ```
//!
//! and repeated progress lines carrying a `time=` token,
//!
//! ```text
//! frame=  240 fps=0.0 q=-1.0 size=    0kB time=00:00:08.00 bitrate=...
//! ```
//!
//! Both use the `:`-separated `H:MM:SS.cc` convention, hours unbounded.
//! Malformed fragments are skipped; they must never abort a job.

/// Stateful scanner deriving progress ratios from diagnostic lines.
///
/// Tracks the total duration once seen; progress lines before that
/// point are observed but produce no ratio.
#[derive(Debug, Default)]
pub struct ProgressScanner {
    duration: Option<f64>,
}

impl ProgressScanner {
    /// Create a scanner, optionally seeded with a known total duration
    /// in seconds.
    pub fn new(duration: Option<f64>) -> Self {
        Self { duration }
    }

    /// Total duration in seconds, if known.
    pub fn duration(&self) -> Option<f64> {
        self.duration
    }

    /// Observe one diagnostic line.
    ///
    /// Returns a progress ratio in `[0.0, 1.0]` when the line carries a
    /// parsable `time=` token and the total duration is known.
    pub fn observe(&mut self, line: &str) -> Option<f64> {
        if self.duration.is_none() {
            if let Some(total) = parse_duration_line(line) {
                self.duration = Some(total);
                return None;
            }
        }

        let elapsed = parse_time_token(line)?;
        let duration = self.duration?;
        if duration <= 0.0 {
            return None;
        }
        Some((elapsed / duration).min(1.0))
    }
}

/// Extract the total duration in seconds from a line like
/// `  Duration: 00:01:23.45, start: ...`.
pub fn parse_duration_line(line: &str) -> Option<f64> {
    let rest = line.split("Duration:").nth(1)?;
    let stamp = rest.split(',').next()?.trim();
    parse_clock_time(stamp)
}

/// Extract the elapsed seconds from a `time=H:MM:SS.cc` token anywhere
/// in the line.
pub fn parse_time_token(line: &str) -> Option<f64> {
    let rest = line.split("time=").nth(1)?;
    let stamp = rest.split_whitespace().next()?;
    parse_clock_time(stamp)
}

/// Parse a `H:MM:SS.cc` clock value into seconds. Hours are unbounded.
fn parse_clock_time(s: &str) -> Option<f64> {
    let parts: Vec<&str> = s.split(':').collect();
    if parts.len() != 3 {
        return None;
    }
    let hours: f64 = parts[0].parse().ok()?;
    let minutes: f64 = parts[1].parse().ok()?;
    let seconds: f64 = parts[2].parse().ok()?;
    Some(hours * 3600.0 + minutes * 60.0 + seconds)
}
