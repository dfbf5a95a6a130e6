//! Subtitle style configuration and ASS color handling.
//!
//! Styles are consumed two ways: baked into a full ASS document by the
//! writer, or rendered as a libass `force_style` override string for
//! the ffmpeg `subtitles` filter.

use serde::{Deserialize, Serialize};

/// Immutable style configuration for burned-in subtitles.
///
/// Owned by the settings layer (the `font` section) and passed by value
/// into the serializer and command builder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleConfig {
    /// Font family name.
    #[serde(default = "default_family")]
    pub family: String,

    /// Font size in pixels (relative to the 1920x1080 canvas).
    #[serde(default = "default_size")]
    pub size: u32,

    /// Primary text color as `#RRGGBB`.
    #[serde(default = "default_color")]
    pub color: String,

    /// Outline color as `#RRGGBB`.
    #[serde(default = "default_outline_color")]
    pub outline_color: String,

    /// Outline width in pixels.
    #[serde(default = "default_outline_width")]
    pub outline_width: u32,

    /// Bold text.
    #[serde(default)]
    pub bold: bool,

    /// Drop shadow behind the text.
    #[serde(default = "default_true")]
    pub shadow: bool,

    /// Bottom margin in pixels.
    #[serde(default = "default_margin_v")]
    pub margin_v: u32,
}

fn default_family() -> String {
    "Arial".to_string()
}

fn default_size() -> u32 {
    32
}

fn default_color() -> String {
    "#ffffff".to_string()
}

fn default_outline_color() -> String {
    "#000000".to_string()
}

fn default_outline_width() -> u32 {
    2
}

fn default_true() -> bool {
    true
}

fn default_margin_v() -> u32 {
    10
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            family: default_family(),
            size: default_size(),
            color: default_color(),
            outline_color: default_outline_color(),
            outline_width: default_outline_width(),
            bold: false,
            shadow: true,
            margin_v: default_margin_v(),
        }
    }
}

impl StyleConfig {
    /// Shadow thickness for the ASS style record.
    pub fn shadow_depth(&self) -> u32 {
        if self.shadow {
            3
        } else {
            0
        }
    }

    /// Bold flag in ASS style-record encoding (-1 = true, 0 = false).
    pub fn bold_flag(&self) -> i32 {
        if self.bold {
            -1
        } else {
            0
        }
    }

    /// Build a libass `force_style` override string.
    ///
    /// Renders `Key=Value` pairs joined by commas. Malformed colors are
    /// omitted; `Shadow` is always emitted as `1` or `0`.
    pub fn to_force_style(&self) -> String {
        let mut parts: Vec<String> = Vec::new();

        if !self.family.is_empty() {
            parts.push(format!("FontName={}", self.family));
        }
        if self.size > 0 {
            parts.push(format!("FontSize={}", self.size));
        }
        if let Some(c) = hex_to_ass(&self.color) {
            parts.push(format!("PrimaryColour={}", c));
        }
        if let Some(c) = hex_to_ass(&self.outline_color) {
            parts.push(format!("OutlineColour={}", c));
        }
        if self.outline_width > 0 {
            parts.push(format!("Outline={}", self.outline_width));
        }
        if self.bold {
            parts.push("Bold=1".to_string());
        }
        parts.push(format!("Shadow={}", if self.shadow { 1 } else { 0 }));

        parts.join(",")
    }
}

/// Convert a `#RRGGBB` hex color to ASS `&H00BBGGRR` notation.
///
/// ASS colors carry channels in blue-green-red order with a leading
/// alpha byte (`00` = opaque). Returns `None` when the input is not a
/// 6-hex-digit color.
pub fn hex_to_ass(color: &str) -> Option<String> {
    let c = color.trim_start_matches('#');
    if c.len() != 6 || !c.chars().all(|ch| ch.is_ascii_hexdigit()) {
        return None;
    }
    let (r, g, b) = (&c[0..2], &c[2..4], &c[4..6]);
    Some(format!("&H00{}{}{}", b, g, r))
}

/// Convert a `#RRGGBB` hex color, falling back to opaque white when the
/// input is malformed.
pub fn hex_to_ass_or_white(color: &str) -> String {
    hex_to_ass(color).unwrap_or_else(|| "&H00FFFFFF".to_string())
}
