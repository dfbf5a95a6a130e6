//! ASS/SSA subtitle parser.
//!
//! Parses Advanced SubStation Alpha (.ass) and SubStation Alpha (.ssa)
//! content into canonical lines. Only the `[Events]` section matters
//! for burn-in; styles and script metadata are left to the document the
//! writer regenerates.
//!
//! All timing is in the format `H:MM:SS.cc` (centiseconds).

use crate::subtitles::error::ParseError;
use crate::subtitles::types::SubtitleLine;

/// Parse ASS/SSA content into canonical lines.
///
/// Comment events are skipped. Dialogue text keeps its `\N` markers and
/// any inline override tags untouched.
pub fn parse_ass(content: &str) -> Result<Vec<SubtitleLine>, ParseError> {
    let mut lines = Vec::new();
    let mut current_section = String::new();
    let mut event_format: Vec<String> = Vec::new();

    for (line_num, line) in content.lines().enumerate() {
        let line_num = line_num + 1; // 1-indexed for error messages
        let line = line.trim_start_matches('\u{feff}').trim();

        if line.is_empty() {
            continue;
        }

        // Section header
        if line.starts_with('[') && line.ends_with(']') {
            current_section = line[1..line.len() - 1].to_lowercase();
            continue;
        }

        // Comments
        if line.starts_with(';') || line.starts_with('!') {
            continue;
        }

        if current_section != "events" {
            continue;
        }

        if line.starts_with("Format:") {
            event_format = parse_format_line(line);
        } else if line.starts_with("Dialogue:") {
            if let Some(event) = parse_dialogue_line(line, &event_format, line_num)? {
                lines.push(event);
            }
        }
    }

    Ok(lines)
}

/// Parse a `Format:` line to get field names.
fn parse_format_line(line: &str) -> Vec<String> {
    line.trim_start_matches("Format:")
        .split(',')
        .map(|s| s.trim().to_lowercase())
        .collect()
}

/// Parse a `Dialogue:` line into a canonical line.
fn parse_dialogue_line(
    line: &str,
    format: &[String],
    line_num: usize,
) -> Result<Option<SubtitleLine>, ParseError> {
    let content = line.trim_start_matches("Dialogue:").trim();

    let format = if format.is_empty() {
        default_event_format()
    } else {
        format.to_vec()
    };

    // The text field is last and may contain commas, so split only up
    // to it.
    let text_index = format.iter().position(|f| f == "text").unwrap_or(9);
    let parts: Vec<&str> = content.splitn(text_index + 1, ',').collect();

    if parts.len() < text_index {
        return Err(ParseError::at_line(
            line_num,
            format!("expected at least {} event fields", text_index),
        ));
    }

    let mut start_ms = 0.0;
    let mut end_ms = 0.0;
    let mut text = String::new();

    for (i, field_name) in format.iter().enumerate() {
        let value = parts.get(i).map(|s| s.trim()).unwrap_or("");

        match field_name.as_str() {
            "start" => {
                start_ms = parse_ass_time(value)
                    .ok_or_else(|| ParseError::invalid_time(line_num, value))?;
            }
            "end" => {
                end_ms = parse_ass_time(value)
                    .ok_or_else(|| ParseError::invalid_time(line_num, value))?;
            }
            // Text keeps original (untrimmed-on-the-right) content
            "text" => text = parts.get(i).map(|s| *s).unwrap_or("").to_string(),
            _ => {}
        }
    }

    if text.is_empty() {
        return Ok(None);
    }

    Ok(Some(SubtitleLine::new(
        start_ms / 1000.0,
        end_ms / 1000.0,
        text,
    )))
}

/// Parse an ASS timestamp: `H:MM:SS.cc`.
///
/// Returns time in milliseconds (f64 for precision).
pub fn parse_ass_time(s: &str) -> Option<f64> {
    let parts: Vec<&str> = s.trim().split(':').collect();
    if parts.len() != 3 {
        return None;
    }

    let hours: f64 = parts[0].parse().ok()?;
    let minutes: f64 = parts[1].parse().ok()?;

    let sec_parts: Vec<&str> = parts[2].split('.').collect();
    let seconds: f64 = sec_parts[0].parse().ok()?;

    let fractional = if sec_parts.len() > 1 {
        let frac_str = sec_parts[1];
        let frac_val: f64 = frac_str.parse().ok()?;
        // Normalize based on number of digits
        match frac_str.len() {
            1 => frac_val * 100.0, // tenths to ms
            2 => frac_val * 10.0,  // centiseconds to ms
            3 => frac_val,         // milliseconds
            _ => frac_val / 10f64.powi(frac_str.len() as i32 - 3),
        }
    } else {
        0.0
    };

    Some(hours * 3600000.0 + minutes * 60000.0 + seconds * 1000.0 + fractional)
}

/// Default event format for `[Events]` when no `Format:` line is given.
fn default_event_format() -> Vec<String> {
    [
        "layer", "start", "end", "style", "name", "marginl", "marginr", "marginv", "effect",
        "text",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
[Script Info]
ScriptType: v4.00+
PlayResX: 1920
PlayResY: 1080

[V4+ Styles]
Format: Name, Fontname, Fontsize, PrimaryColour, SecondaryColour, OutlineColour, BackColour, Bold, Italic, Underline, StrikeOut, ScaleX, ScaleY, Spacing, Angle, BorderStyle, Outline, Shadow, Alignment, MarginL, MarginR, MarginV, Encoding
Style: Default,Arial,32,&H00FFFFFF,&H000000FF,&H00000000,&H64000000,0,0,0,0,100,100,0,0,1,2,3,2,10,10,10,1

[Events]
Format: Layer, Start, End, Style, Name, MarginL, MarginR, MarginV, Effect, Text
Dialogue: 0,0:00:01.50,0:00:04.00,Default,,0,0,0,,Hello, world!
Comment: 0,0:00:05.00,0:00:06.00,Default,,0,0,0,,ignored
Dialogue: 0,0:00:05.00,0:00:08.25,Default,,0,0,0,,First\\NSecond
";

    #[test]
    fn test_parse_ass_time() {
        assert!((parse_ass_time("0:00:00.00").unwrap() - 0.0).abs() < 0.001);
        assert!((parse_ass_time("0:00:01.50").unwrap() - 1500.0).abs() < 0.001);
        assert!((parse_ass_time("1:02:03.04").unwrap() - 3723040.0).abs() < 0.001);
        assert!(parse_ass_time("1:02").is_none());
        assert!(parse_ass_time("x:00:00.00").is_none());
    }

    #[test]
    fn test_parse_events() {
        let lines = parse_ass(SAMPLE).unwrap();
        assert_eq!(lines.len(), 2);

        assert!((lines[0].start - 1.5).abs() < 1e-9);
        assert!((lines[0].end - 4.0).abs() < 1e-9);
        assert_eq!(lines[0].text, "Hello, world!");

        assert!((lines[1].end - 8.25).abs() < 1e-9);
        assert_eq!(lines[1].text, "First\\NSecond");
    }

    #[test]
    fn test_text_with_commas_survives() {
        let content = "[Events]\nFormat: Layer, Start, End, Style, Name, MarginL, MarginR, MarginV, Effect, Text\nDialogue: 0,0:00:01.00,0:00:02.00,Default,,0,0,0,,One, two, three\n";
        let lines = parse_ass(content).unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].text, "One, two, three");
    }

    #[test]
    fn test_missing_format_uses_default_layout() {
        let content =
            "[Events]\nDialogue: 0,0:00:01.00,0:00:02.00,Default,,0,0,0,,No format line\n";
        let lines = parse_ass(content).unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].text, "No format line");
    }

    #[test]
    fn test_bad_timestamp_is_an_error() {
        let content = "[Events]\nFormat: Layer, Start, End, Style, Name, MarginL, MarginR, MarginV, Effect, Text\nDialogue: 0,bogus,0:00:02.00,Default,,0,0,0,,x\n";
        assert!(parse_ass(content).is_err());
    }
}
