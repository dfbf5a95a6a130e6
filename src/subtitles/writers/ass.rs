//! ASS document writer.
//!
//! Renders a style configuration plus canonical lines into a complete
//! Advanced SubStation Alpha document suitable for the ffmpeg
//! `subtitles` burn-in filter.
//!
//! # Timing Precision
//!
//! ASS uses centisecond timing (`H:MM:SS.cc`, hours unpadded). Internal
//! float seconds are rounded to the nearest centisecond at write time.

use std::io;
use std::path::Path;

use crate::subtitles::style::{hex_to_ass_or_white, StyleConfig};
use crate::subtitles::types::SubtitleLine;

/// Render lines and a style into a full ASS document.
///
/// Pure function: an empty line sequence produces a document with an
/// empty `[Events]` body. The header declares a fixed 1920x1080
/// reference canvas and a single `Default` style record built from the
/// configuration.
pub fn write_ass(lines: &[SubtitleLine], style: &StyleConfig) -> String {
    let primary = hex_to_ass_or_white(&style.color);
    let outline = hex_to_ass_or_white(&style.outline_color);

    let mut output = String::new();

    output.push_str(
        "[Script Info]\n\
         ScriptType: v4.00+\n\
         Collisions: Normal\n\
         PlayResX: 1920\n\
         PlayResY: 1080\n\
         Timer: 100.0000\n\n",
    );

    output.push_str(
        "[V4+ Styles]\n\
         Format: Name, Fontname, Fontsize, PrimaryColour, SecondaryColour, OutlineColour, BackColour, \
         Bold, Italic, Underline, StrikeOut, ScaleX, ScaleY, Spacing, Angle, BorderStyle, Outline, Shadow, \
         Alignment, MarginL, MarginR, MarginV, Encoding\n",
    );
    output.push_str(&format!(
        "Style: Default,{},{},{},&H000000FF,{},&H64000000,{},0,0,0,100,100,0,0,1,{},{},2,10,10,{},1\n\n",
        style.family,
        style.size,
        primary,
        outline,
        style.bold_flag(),
        style.outline_width,
        style.shadow_depth(),
        style.margin_v,
    ));

    output.push_str(
        "[Events]\n\
         Format: Layer, Start, End, Style, Name, MarginL, MarginR, MarginV, Effect, Text\n",
    );
    for line in lines {
        output.push_str(&format_dialogue(line));
        output.push('\n');
    }

    output
}

/// Render a styled document and write it to `path`.
pub fn write_ass_file(
    lines: &[SubtitleLine],
    style: &StyleConfig,
    path: &Path,
) -> io::Result<()> {
    let content = write_ass(lines, style);
    std::fs::write(path, content)?;
    tracing::debug!(path = %path.display(), events = lines.len(), "wrote ASS artifact");
    Ok(())
}

/// Format one canonical line as an ASS `Dialogue:` record.
fn format_dialogue(line: &SubtitleLine) -> String {
    format!(
        "Dialogue: 0,{},{},Default,,0,0,0,,{}",
        format_ass_time(line.start),
        format_ass_time(line.end),
        line.text
    )
}

/// Format seconds as an ASS timestamp: `H:MM:SS.cc`.
///
/// Hours are unpadded; minutes, seconds, and centiseconds are
/// zero-padded to two digits. Rounds to the nearest centisecond.
pub fn format_ass_time(seconds: f64) -> String {
    let total_cs = (seconds.max(0.0) * 100.0).round() as u64;

    let cs = total_cs % 100;
    let total_secs = total_cs / 100;
    let secs = total_secs % 60;
    let total_mins = total_secs / 60;
    let mins = total_mins % 60;
    let hours = total_mins / 60;

    format!("{}:{:02}:{:02}.{:02}", hours, mins, secs, cs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::subtitles::parsers::parse_ass;

    #[test]
    fn test_format_ass_time() {
        assert_eq!(format_ass_time(0.0), "0:00:00.00");
        assert_eq!(format_ass_time(1.5), "0:00:01.50");
        assert_eq!(format_ass_time(61.25), "0:01:01.25");
        assert_eq!(format_ass_time(3600.0), "1:00:00.00");
        // Rounds to nearest centisecond
        assert_eq!(format_ass_time(1.999), "0:00:02.00");
        // Negative input clamps to zero
        assert_eq!(format_ass_time(-1.0), "0:00:00.00");
    }

    #[test]
    fn test_document_structure() {
        let lines = vec![SubtitleLine::new(1.5, 4.0, "Hello")];
        let style = StyleConfig::default();
        let doc = write_ass(&lines, &style);

        assert!(doc.starts_with("[Script Info]"));
        assert!(doc.contains("PlayResX: 1920"));
        assert!(doc.contains("PlayResY: 1080"));
        assert!(doc.contains("Style: Default,Arial,32,&H00ffffff,&H000000FF,&H00000000,"));
        assert!(doc.contains("Dialogue: 0,0:00:01.50,0:00:04.00,Default,,0,0,0,,Hello"));
    }

    #[test]
    fn test_style_record_reflects_config() {
        let style = StyleConfig {
            family: "Noto Sans".to_string(),
            size: 48,
            color: "#ffcc00".to_string(),
            outline_color: "#112233".to_string(),
            outline_width: 4,
            bold: true,
            shadow: false,
            margin_v: 24,
        };
        let doc = write_ass(&[], &style);

        // bold -1, border-style 1, outline 4, shadow 0, alignment 2, margin_v 24
        assert!(doc.contains(
            "Style: Default,Noto Sans,48,&H0000ccff,&H000000FF,&H00332211,&H64000000,-1,0,0,0,100,100,0,0,1,4,0,2,10,10,24,1"
        ));
    }

    #[test]
    fn test_malformed_color_becomes_white() {
        let style = StyleConfig {
            color: "oops".to_string(),
            ..StyleConfig::default()
        };
        let doc = write_ass(&[], &style);
        assert!(doc.contains("Style: Default,Arial,32,&H00FFFFFF,"));
    }

    #[test]
    fn test_empty_lines_give_empty_events_body() {
        let doc = write_ass(&[], &StyleConfig::default());
        let events = doc.split("[Events]").nth(1).unwrap();
        assert_eq!(events.lines().count(), 2); // the section split leaves "\nFormat: ..."
        assert!(!events.contains("Dialogue:"));
    }

    #[test]
    fn test_round_trip_preserves_timing_within_a_centisecond() {
        let original = vec![
            SubtitleLine::new(1.504, 4.009, "First\\NSecond"),
            SubtitleLine::new(65.25, 70.0, "Third, with commas"),
        ];
        let doc = write_ass(&original, &StyleConfig::default());
        let reparsed = parse_ass(&doc).unwrap();

        assert_eq!(reparsed.len(), original.len());
        for (a, b) in original.iter().zip(&reparsed) {
            assert!((a.start - b.start).abs() <= 0.01);
            assert!((a.end - b.end).abs() <= 0.01);
            assert_eq!(a.text, b.text);
        }
    }
}
