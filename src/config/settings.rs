//! Settings struct with JSON-based sections.
//!
//! Settings are an explicit snapshot constructed once at startup and
//! threaded through the calls that need them; nothing in the core reads
//! them implicitly.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::subtitles::parsers::CsvMapping;
use crate::subtitles::style::StyleConfig;

/// Root settings structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Subtitle style (font) configuration.
    #[serde(default)]
    pub font: StyleConfig,

    /// Encode parameters.
    #[serde(default)]
    pub encode: EncodeSettings,

    /// Custom output directory; empty means a `output` folder beside
    /// the input video.
    #[serde(default)]
    pub output_dir: String,

    /// Default frame rate for frame-based CSV timing.
    #[serde(default = "default_fps")]
    pub fps: f64,

    /// Start offset applied to parsed lines, in seconds.
    #[serde(default)]
    pub start_offset: f64,

    /// Saved CSV column mappings, keyed by file path.
    #[serde(default)]
    pub csv_mappings: HashMap<String, CsvMapping>,
}

fn default_fps() -> f64 {
    30.0
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            font: StyleConfig::default(),
            encode: EncodeSettings::default(),
            output_dir: String::default(),
            fps: default_fps(),
            start_offset: 0.0,
            csv_mappings: HashMap::default(),
        }
    }
}

/// Encode quality configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncodeSettings {
    /// CRF quality value (0-51).
    #[serde(default = "default_crf")]
    pub crf: u32,

    /// x264 speed/quality preset.
    #[serde(default = "default_preset")]
    pub preset: String,
}

fn default_crf() -> u32 {
    23
}

fn default_preset() -> String {
    "veryfast".to_string()
}

impl Default for EncodeSettings {
    fn default() -> Self {
        Self {
            crf: default_crf(),
            preset: default_preset(),
        }
    }
}

impl Settings {
    /// Look up the saved CSV mapping for a file path.
    pub fn csv_mapping_for(&self, path: &str) -> Option<&CsvMapping> {
        self.csv_mappings.get(path)
    }
}
