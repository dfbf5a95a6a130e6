//! CSV subtitle parser.
//!
//! Tabular sources carry start/end/text in arbitrary columns, addressed
//! either by header name or by zero-based position. Time values are
//! either plain seconds or frame counts divided by a caller-supplied
//! frame rate. Rows without a usable end time get the default 3-second
//! duration.

use serde::{Deserialize, Serialize};

use crate::subtitles::error::ParseError;
use crate::subtitles::types::SubtitleLine;

/// How a column is addressed in the CSV header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColumnRef {
    /// By header name.
    Name(String),
    /// By zero-based position.
    Index(usize),
}

impl ColumnRef {
    /// Resolve this reference against a header row.
    fn resolve(&self, headers: &[String]) -> Option<usize> {
        match self {
            Self::Name(name) => headers.iter().position(|h| h == name),
            Self::Index(i) => (*i < headers.len()).then_some(*i),
        }
    }

    fn describe(&self) -> String {
        match self {
            Self::Name(name) => name.clone(),
            Self::Index(i) => format!("column #{}", i),
        }
    }
}

impl From<&str> for ColumnRef {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}

impl From<usize> for ColumnRef {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

/// Interpretation of the CSV time columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeFormat {
    /// Values are seconds, used as-is.
    #[default]
    Seconds,
    /// Values are frame counts, divided by the frame rate.
    Frames,
}

/// Column mapping for one CSV file.
///
/// Saved per file in the settings so repeat runs skip re-mapping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CsvMapping {
    /// Column holding the start time.
    pub start_col: ColumnRef,
    /// Column holding the end time, if any.
    #[serde(default)]
    pub end_col: Option<ColumnRef>,
    /// Column holding the caption text.
    pub text_col: ColumnRef,
    /// How time values are interpreted.
    #[serde(default)]
    pub time_unit: TimeFormat,
    /// Frame rate used when `time_unit` is frames.
    #[serde(default = "default_fps")]
    pub fps: f64,
}

fn default_fps() -> f64 {
    30.0
}

/// Parse decoded CSV content into canonical lines.
///
/// The first record is treated as the header. Fields referenced by the
/// mapping must resolve against it or parsing fails.
pub fn parse_csv(content: &str, mapping: &CsvMapping) -> Result<Vec<SubtitleLine>, ParseError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(content.as_bytes());

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let start_idx = mapping.start_col.resolve(&headers).ok_or_else(|| {
        ParseError::MissingColumn {
            row: 0,
            column: mapping.start_col.describe(),
        }
    })?;
    let text_idx = mapping.text_col.resolve(&headers).ok_or_else(|| {
        ParseError::MissingColumn {
            row: 0,
            column: mapping.text_col.describe(),
        }
    })?;
    // A mapped end column that does not resolve is treated as absent,
    // the row then falls back to the default duration.
    let end_idx = mapping
        .end_col
        .as_ref()
        .and_then(|col| col.resolve(&headers));

    let mut lines = Vec::new();

    for (row_num, record) in reader.records().enumerate() {
        let record = record?;
        let row_num = row_num + 2; // 1-indexed, after the header

        let start_raw = record.get(start_idx).unwrap_or("").trim();
        let start = to_seconds(start_raw, mapping)
            .ok_or_else(|| ParseError::invalid_time(row_num, start_raw))?;

        let end = end_idx
            .and_then(|i| record.get(i))
            .and_then(|v| to_seconds(v.trim(), mapping));

        let text = record.get(text_idx).unwrap_or("").to_string();

        let line = match end {
            Some(end) => SubtitleLine::new(start, end, text),
            None => SubtitleLine::with_default_duration(start, text),
        };
        lines.push(line);
    }

    Ok(lines)
}

/// Convert a raw time field to seconds per the mapping's time format.
fn to_seconds(value: &str, mapping: &CsvMapping) -> Option<f64> {
    let v: f64 = value.parse().ok()?;
    match mapping.time_unit {
        TimeFormat::Seconds => Some(v),
        TimeFormat::Frames => {
            if mapping.fps > 0.0 {
                Some(v / mapping.fps)
            } else {
                None
            }
        }
    }
}

/// Guess a column mapping from the raw header line.
///
/// Checks for marker substrings (`start_time`, `end_time`, `text`)
/// anywhere in the header text, falling back to positional columns
/// 0/1/2. This is approximate and can misfire on unconventional
/// headers; callers should prefer an explicit saved mapping.
pub fn guess_mapping(header_line: &str) -> Option<CsvMapping> {
    let header = header_line.trim();
    if header.is_empty() {
        return None;
    }

    let pick = |marker: &str, fallback: usize| -> ColumnRef {
        if header.contains(marker) {
            ColumnRef::Name(marker.to_string())
        } else {
            ColumnRef::Index(fallback)
        }
    };

    Some(CsvMapping {
        start_col: pick("start_time", 0),
        end_col: Some(pick("end_time", 1)),
        text_col: pick("text", 2),
        time_unit: TimeFormat::Seconds,
        fps: default_fps(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name_mapping() -> CsvMapping {
        CsvMapping {
            start_col: "start_time".into(),
            end_col: Some("end_time".into()),
            text_col: "text".into(),
            time_unit: TimeFormat::Seconds,
            fps: 30.0,
        }
    }

    #[test]
    fn test_parse_by_column_name() {
        let content = "start_time,end_time,text\n1.0,4.0,Hello\n5.5,8.0,World\n";
        let lines = parse_csv(content, &name_mapping()).unwrap();

        assert_eq!(lines.len(), 2);
        assert!((lines[0].start - 1.0).abs() < 1e-9);
        assert!((lines[0].end - 4.0).abs() < 1e-9);
        assert_eq!(lines[0].text, "Hello");
        assert_eq!(lines[1].text, "World");
    }

    #[test]
    fn test_parse_by_column_index() {
        let content = "a,b,c\n2.0,3.0,Indexed\n";
        let mapping = CsvMapping {
            start_col: 0.into(),
            end_col: Some(1.into()),
            text_col: 2.into(),
            time_unit: TimeFormat::Seconds,
            fps: 30.0,
        };
        let lines = parse_csv(content, &mapping).unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].text, "Indexed");
    }

    #[test]
    fn test_frames_divided_by_fps() {
        let content = "start_time,end_time,text\n90,150,Frame timed\n";
        let mapping = CsvMapping {
            time_unit: TimeFormat::Frames,
            fps: 30.0,
            ..name_mapping()
        };
        let lines = parse_csv(content, &mapping).unwrap();
        assert!((lines[0].start - 3.0).abs() < 1e-9);
        assert!((lines[0].end - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_missing_end_column_defaults_three_seconds() {
        let content = "start_time,text\n10.0,No end here\n";
        let mapping = CsvMapping {
            start_col: "start_time".into(),
            end_col: None,
            text_col: "text".into(),
            time_unit: TimeFormat::Seconds,
            fps: 30.0,
        };
        let lines = parse_csv(content, &mapping).unwrap();
        assert!((lines[0].end - 13.0).abs() < 1e-9);
    }

    #[test]
    fn test_end_not_after_start_defaults_three_seconds() {
        let content = "start_time,end_time,text\n10.0,9.0,Backwards\n10.0,10.0,Equal\n";
        let lines = parse_csv(content, &name_mapping()).unwrap();
        assert!((lines[0].end - 13.0).abs() < 1e-9);
        assert!((lines[1].end - 13.0).abs() < 1e-9);
    }

    #[test]
    fn test_unresolvable_start_column_fails() {
        let content = "a,b,c\n1.0,2.0,x\n";
        let err = parse_csv(content, &name_mapping()).unwrap_err();
        assert!(matches!(err, ParseError::MissingColumn { .. }));
    }

    #[test]
    fn test_non_numeric_time_fails() {
        let content = "start_time,end_time,text\nsoon,later,x\n";
        assert!(parse_csv(content, &name_mapping()).is_err());
    }

    #[test]
    fn test_guess_mapping_by_markers() {
        let mapping = guess_mapping("start_time,end_time,text").unwrap();
        assert_eq!(mapping.start_col, ColumnRef::Name("start_time".into()));
        assert_eq!(mapping.end_col, Some(ColumnRef::Name("end_time".into())));
        assert_eq!(mapping.text_col, ColumnRef::Name("text".into()));
    }

    #[test]
    fn test_guess_mapping_positional_fallback() {
        let mapping = guess_mapping("in,out,caption").unwrap();
        assert_eq!(mapping.start_col, ColumnRef::Index(0));
        assert_eq!(mapping.end_col, Some(ColumnRef::Index(1)));
        assert_eq!(mapping.text_col, ColumnRef::Index(2));

        assert!(guess_mapping("").is_none());
    }
}
