//! Encode request model.

use std::path::PathBuf;

/// Default CRF quality value when none is requested.
pub const DEFAULT_CRF: u32 = 23;

/// Default x264 speed/quality preset when none is requested.
pub const DEFAULT_PRESET: &str = "veryfast";

/// Parameters for one encoder invocation.
///
/// Built once per job by the orchestrating caller and handed to the
/// command builder; immutable for the lifetime of the job.
#[derive(Debug, Clone, Default)]
pub struct EncodeRequest {
    /// Input video file. Required.
    pub video_path: Option<PathBuf>,
    /// On-disk subtitle artifact to burn in, if any.
    pub subtitle_path: Option<PathBuf>,
    /// Output file. Required.
    pub output_path: Option<PathBuf>,
    /// Prefer stream copy when no filter is applied.
    pub codec_copy: bool,
    /// CRF quality value (0-51). Defaults to 23.
    pub crf: Option<u32>,
    /// x264 preset name. Defaults to `veryfast`.
    pub preset: Option<String>,
    /// Extra raw arguments appended verbatim before the output path.
    pub extra_args: Vec<String>,
}

impl EncodeRequest {
    /// Create a request for the given input and output with stream copy
    /// preferred.
    pub fn new(video_path: impl Into<PathBuf>, output_path: impl Into<PathBuf>) -> Self {
        Self {
            video_path: Some(video_path.into()),
            output_path: Some(output_path.into()),
            codec_copy: true,
            ..Default::default()
        }
    }

    /// Set the subtitle artifact to burn in.
    pub fn with_subtitles(mut self, path: impl Into<PathBuf>) -> Self {
        self.subtitle_path = Some(path.into());
        self
    }

    /// Effective CRF value.
    pub fn crf_or_default(&self) -> u32 {
        self.crf.unwrap_or(DEFAULT_CRF)
    }

    /// Effective preset name.
    pub fn preset_or_default(&self) -> &str {
        self.preset.as_deref().unwrap_or(DEFAULT_PRESET)
    }
}
