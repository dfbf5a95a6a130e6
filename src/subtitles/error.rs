//! Subtitle error types.

use std::path::PathBuf;

/// Errors that can occur while turning a subtitle source into canonical
/// lines.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// Failed to read the source file.
    #[error("Failed to read file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Unknown or unsupported subtitle format.
    #[error("Unknown subtitle format for file '{0}'")]
    UnknownFormat(PathBuf),

    /// The bytes could not be decoded to text.
    #[error("Encoding error: {0}")]
    EncodingError(String),

    /// Invalid or malformed time value.
    #[error("Invalid time value at line {line}: '{value}'")]
    InvalidTime { line: usize, value: String },

    /// A CSV row is missing a mapped column.
    #[error("Row {row} has no column matching '{column}'")]
    MissingColumn { row: usize, column: String },

    /// Malformed CSV structure.
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    /// Generic parse error.
    #[error("Parse error at line {line}: {message}")]
    Generic { line: usize, message: String },
}

impl ParseError {
    /// Create a read error.
    pub fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::ReadError {
            path: path.into(),
            source,
        }
    }

    /// Create an invalid time error.
    pub fn invalid_time(line: usize, value: impl Into<String>) -> Self {
        Self::InvalidTime {
            line,
            value: value.into(),
        }
    }

    /// Create a generic parse error.
    pub fn at_line(line: usize, message: impl Into<String>) -> Self {
        Self::Generic {
            line,
            message: message.into(),
        }
    }
}
