//! Format parsers.
//!
//! Each parser converts one supported subtitle source into a sequence
//! of canonical [`SubtitleLine`]s. File-level entry points handle byte
//! decoding: strict UTF-8 first, then byte-level encoding detection and
//! a re-decode before giving up.

pub mod ass;
pub mod csv;
pub mod srt;

use std::fs;
use std::path::Path;

use crate::subtitles::error::ParseError;
use crate::subtitles::types::{SubtitleFormat, SubtitleLine};

pub use self::csv::{guess_mapping, ColumnRef, CsvMapping, TimeFormat};
pub use ass::parse_ass;
pub use srt::parse_srt;

/// Parse a timed-text subtitle file (SRT or ASS), detecting the format
/// from the extension.
///
/// CSV sources need a column mapping and go through
/// [`parse_csv_file`] instead.
pub fn parse_subtitle_file(path: &Path) -> Result<Vec<SubtitleLine>, ParseError> {
    let format = SubtitleFormat::from_extension(path)
        .ok_or_else(|| ParseError::UnknownFormat(path.to_path_buf()))?;

    let content = read_to_string_detecting(path)?;

    match format {
        SubtitleFormat::Srt => parse_srt(&content),
        SubtitleFormat::Ass => parse_ass(&content),
        SubtitleFormat::Csv => Err(ParseError::UnknownFormat(path.to_path_buf())),
    }
}

/// Parse a CSV subtitle file with an explicit column mapping.
///
/// The file's byte encoding is auto-detected before parsing rows.
pub fn parse_csv_file(path: &Path, mapping: &CsvMapping) -> Result<Vec<SubtitleLine>, ParseError> {
    let content = read_to_string_detecting(path)?;
    csv::parse_csv(&content, mapping)
}

/// Read a file as text: strict UTF-8 first, falling back to byte-level
/// encoding detection and a lossy decode with the detected encoding.
pub fn read_to_string_detecting(path: &Path) -> Result<String, ParseError> {
    let bytes = fs::read(path).map_err(|e| ParseError::read(path, e))?;
    decode_bytes(&bytes)
}

/// Decode raw bytes to text.
///
/// Strict UTF-8 succeeds for the common case; otherwise the encoding is
/// detected from the byte distribution and the content is re-decoded.
pub fn decode_bytes(bytes: &[u8]) -> Result<String, ParseError> {
    match std::str::from_utf8(bytes) {
        Ok(s) => Ok(s.to_string()),
        Err(_) => {
            let mut detector = chardetng::EncodingDetector::new();
            detector.feed(bytes, true);
            let encoding = detector.guess(None, true);
            tracing::debug!(encoding = encoding.name(), "non-UTF-8 subtitle source");

            let (decoded, _, had_errors) = encoding.decode(bytes);
            if had_errors {
                return Err(ParseError::EncodingError(format!(
                    "undecodable as {}",
                    encoding.name()
                )));
            }
            Ok(decoded.into_owned())
        }
    }
}
