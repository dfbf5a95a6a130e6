//! ffmpeg command builder.
//!
//! Builds the full ffmpeg argument list for a burn-in job from an
//! [`EncodeRequest`] and an optional style override.
//!
//! # Codec Decision
//!
//! Stream copy (`-c:v copy -c:a copy`) is only valid when no video
//! filter is attached; the `subtitles` filter forces a re-encode with
//! libx264/aac at the requested CRF and preset.

use std::path::Path;

use crate::encode::request::EncodeRequest;
use crate::subtitles::style::StyleConfig;

/// Errors for malformed encode requests.
#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    #[error("Encode request is missing the video path")]
    MissingVideoPath,

    #[error("Encode request is missing the output path")]
    MissingOutputPath,
}

/// Builder for the ffmpeg command token list.
///
/// Borrows the request and style; `build()` is deterministic for a
/// given input.
pub struct CommandBuilder<'a> {
    request: &'a EncodeRequest,
    style: Option<&'a StyleConfig>,
    ffmpeg_path: &'a str,
}

impl<'a> CommandBuilder<'a> {
    /// Create a builder with the default `ffmpeg` program name.
    pub fn new(request: &'a EncodeRequest) -> Self {
        Self {
            request,
            style: None,
            ffmpeg_path: "ffmpeg",
        }
    }

    /// Attach a style whose `force_style` override is passed to the
    /// subtitles filter.
    pub fn with_style(mut self, style: &'a StyleConfig) -> Self {
        self.style = Some(style);
        self
    }

    /// Override the ffmpeg binary path.
    pub fn with_ffmpeg_path(mut self, path: &'a str) -> Self {
        self.ffmpeg_path = path;
        self
    }

    /// Build the complete ffmpeg command tokens.
    ///
    /// Token order: program, `-y`, input, optional `-vf`, codec
    /// arguments, extra raw arguments, output path last.
    pub fn build(&self) -> Result<Vec<String>, RequestError> {
        let video_path = self
            .request
            .video_path
            .as_deref()
            .ok_or(RequestError::MissingVideoPath)?;
        let output_path = self
            .request
            .output_path
            .as_deref()
            .ok_or(RequestError::MissingOutputPath)?;

        let mut tokens = vec![
            self.ffmpeg_path.to_string(),
            "-y".to_string(),
            "-i".to_string(),
            video_path.to_string_lossy().to_string(),
        ];

        let mut has_filter = false;
        if let Some(sub_path) = self.request.subtitle_path.as_deref() {
            tokens.push("-vf".to_string());
            tokens.push(self.subtitles_filter(sub_path));
            has_filter = true;
        }

        if self.request.codec_copy && !has_filter {
            tokens.extend(
                ["-c:v", "copy", "-c:a", "copy"]
                    .iter()
                    .map(|s| s.to_string()),
            );
        } else {
            // Filtering is incompatible with stream copy
            let crf = self.request.crf_or_default().to_string();
            tokens.extend(
                [
                    "-c:v",
                    "libx264",
                    "-crf",
                    crf.as_str(),
                    "-preset",
                    self.request.preset_or_default(),
                    "-c:a",
                    "aac",
                ]
                .iter()
                .map(|s| s.to_string()),
            );
        }

        tokens.extend(self.request.extra_args.iter().cloned());
        tokens.push(output_path.to_string_lossy().to_string());

        tracing::debug!(command = ?tokens, "built ffmpeg command");
        Ok(tokens)
    }

    /// Build the `subtitles=...` filter expression.
    fn subtitles_filter(&self, sub_path: &Path) -> String {
        let escaped = escape_filter_path(sub_path);
        let force_style = self
            .style
            .map(|s| s.to_force_style())
            .filter(|s| !s.is_empty());

        match force_style {
            Some(style) => format!("subtitles='{}':force_style='{}'", escaped, style),
            None => format!("subtitles='{}'", escaped),
        }
    }
}

/// Escape a path for use inside an ffmpeg filter argument.
///
/// The filter-argument grammar treats `:` as a parameter separator and
/// `\` as its own escape character, so every literal backslash is
/// escaped first and then every colon.
pub fn escape_filter_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', r"\\").replace(':', r"\:")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_copy_when_no_filter_and_copy_preferred() {
        let request = EncodeRequest::new("in.mp4", "out.mp4");
        let cmd = CommandBuilder::new(&request).build().unwrap();

        assert_eq!(cmd[0], "ffmpeg");
        assert_eq!(&cmd[1..4], &["-y", "-i", "in.mp4"]);
        assert!(!cmd.contains(&"-vf".to_string()));
        let joined = cmd.join(" ");
        assert!(joined.contains("-c:v copy -c:a copy"));
        assert_eq!(cmd.last().unwrap(), "out.mp4");
    }

    #[test]
    fn test_filter_forces_reencode() {
        let request = EncodeRequest::new("in.mp4", "out.mp4").with_subtitles("subs.ass");
        let cmd = CommandBuilder::new(&request).build().unwrap();

        let joined = cmd.join(" ");
        assert!(cmd.contains(&"-vf".to_string()));
        assert!(!joined.contains("-c:v copy"));
        assert!(joined.contains("-c:v libx264 -crf 23 -preset veryfast -c:a aac"));
    }

    #[test]
    fn test_copy_declined_reencodes_without_filter() {
        let mut request = EncodeRequest::new("in.mp4", "out.mp4");
        request.codec_copy = false;
        request.crf = Some(18);
        request.preset = Some("slow".to_string());
        let cmd = CommandBuilder::new(&request).build().unwrap();

        let joined = cmd.join(" ");
        assert!(joined.contains("-c:v libx264 -crf 18 -preset slow"));
    }

    #[test]
    fn test_force_style_appended_to_filter() {
        let request = EncodeRequest::new("in.mp4", "out.mp4").with_subtitles("subs.ass");
        let style = StyleConfig::default();
        let cmd = CommandBuilder::new(&request).with_style(&style).build().unwrap();

        let vf = &cmd[cmd.iter().position(|t| t == "-vf").unwrap() + 1];
        assert!(vf.starts_with("subtitles='subs.ass':force_style='"));
        assert!(vf.contains("FontName=Arial"));
    }

    #[test]
    fn test_extra_args_come_before_output() {
        let mut request = EncodeRequest::new("in.mp4", "out.mp4");
        request.extra_args = vec!["-movflags".to_string(), "+faststart".to_string()];
        let cmd = CommandBuilder::new(&request).build().unwrap();

        let n = cmd.len();
        assert_eq!(&cmd[n - 3..], &["-movflags", "+faststart", "out.mp4"]);
    }

    #[test]
    fn test_missing_paths_rejected() {
        let request = EncodeRequest::default();
        assert!(matches!(
            CommandBuilder::new(&request).build(),
            Err(RequestError::MissingVideoPath)
        ));

        let request = EncodeRequest {
            video_path: Some(PathBuf::from("in.mp4")),
            ..Default::default()
        };
        assert!(matches!(
            CommandBuilder::new(&request).build(),
            Err(RequestError::MissingOutputPath)
        ));
    }

    #[test]
    fn test_escape_windows_path() {
        let escaped = escape_filter_path(Path::new(r"C:\videos\clip.mp4"));
        assert_eq!(escaped, r"C\:\\videos\\clip.mp4");
        // No bare colon and no single backslash survive
        assert!(!escaped.contains(":/") && !escaped.replace(r"\\", "").replace(r"\:", "").contains('\\'));
    }

    #[test]
    fn test_escape_plain_unix_path() {
        assert_eq!(
            escape_filter_path(Path::new("/tmp/subs.ass")),
            "/tmp/subs.ass"
        );
    }
}
