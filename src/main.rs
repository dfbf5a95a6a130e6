//! Batch CLI for burning subtitles without the GUI shell.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use subburn::config::ConfigManager;
use subburn::encode::{CommandBuilder, EncodeRequest};
use subburn::jobs::{JobEvent, JobOutcome, JobRunner, FAILURE_EXIT_CODE};
use subburn::subtitles::parsers::{guess_mapping, parse_csv_file, parse_subtitle_file};
use subburn::subtitles::writers::write_ass_file;
use subburn::subtitles::{shift_all, SubtitleFormat, SubtitleLine, StyleConfig};

/// Burn subtitles into a video file via ffmpeg.
#[derive(Debug, Parser)]
#[command(name = "subburn", version, about)]
struct Cli {
    /// Input video file.
    video: PathBuf,

    /// Subtitle file (srt / ass / csv).
    #[arg(short, long)]
    subtitle: PathBuf,

    /// Output file path. Defaults to `<stem>_sub<ext>` in the output
    /// directory.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Re-encode even when no subtitle filter is applied.
    #[arg(long)]
    no_copy: bool,

    /// CRF quality value (0-51).
    #[arg(long)]
    crf: Option<u32>,

    /// x264 preset name.
    #[arg(long)]
    preset: Option<String>,

    /// Override the subtitle font family.
    #[arg(long)]
    font_family: Option<String>,

    /// Override the subtitle font size in pixels.
    #[arg(long)]
    font_size: Option<u32>,

    /// Override the text color (e.g. '#ffcc00').
    #[arg(long)]
    font_color: Option<String>,

    /// Override the outline color.
    #[arg(long)]
    outline_color: Option<String>,

    /// Override the outline width in pixels (0 disables).
    #[arg(long)]
    outline_width: Option<u32>,

    /// Enable bold text.
    #[arg(long)]
    bold: bool,

    /// Enable the drop shadow.
    #[arg(long, overrides_with = "no_shadow")]
    shadow: bool,

    /// Disable the drop shadow.
    #[arg(long)]
    no_shadow: bool,

    /// Shift all subtitle lines forward by this many seconds.
    #[arg(long, default_value_t = 0.0)]
    start_offset: f64,

    /// Config file path (defaults to the per-user location).
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::from(1)
        }
    }
}

#[tokio::main]
async fn run(cli: Cli) -> Result<ExitCode> {
    if cli.start_offset < 0.0 {
        bail!("start offset must be non-negative");
    }

    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(ConfigManager::default_path);
    let mut config = ConfigManager::new(config_path);
    config
        .load_or_create()
        .context("failed to load configuration")?;

    let settings = config.settings().clone();
    let style = apply_style_overrides(settings.font.clone(), &cli);

    // Parse into canonical lines, then reserialize to a styled ASS
    // artifact. CSV always needs this; SRT/ASS only when an offset is
    // requested (otherwise ffmpeg reads the original file and the style
    // rides along as a force_style override).
    let format = SubtitleFormat::from_extension(&cli.subtitle);
    let needs_reserialize = matches!(format, Some(SubtitleFormat::Csv)) || cli.start_offset > 0.0;

    let subtitle_path = if needs_reserialize {
        let mut lines = parse_lines(&cli.subtitle, &settings)?;
        if cli.start_offset > 0.0 {
            shift_all(&mut lines, cli.start_offset);
        }
        let artifact = std::env::temp_dir().join("subburn_artifact.ass");
        write_ass_file(&lines, &style, &artifact)
            .with_context(|| format!("failed to write '{}'", artifact.display()))?;
        info!(lines = lines.len(), artifact = %artifact.display(), "wrote styled subtitle artifact");
        artifact
    } else {
        cli.subtitle.clone()
    };

    let output_path = match cli.output.clone() {
        Some(path) => path,
        None => derive_output_path(&cli.video, &settings.output_dir)?,
    };

    let request = EncodeRequest {
        video_path: Some(cli.video.clone()),
        subtitle_path: Some(subtitle_path),
        output_path: Some(output_path.clone()),
        codec_copy: !cli.no_copy,
        crf: cli.crf.or(Some(settings.encode.crf)),
        preset: cli.preset.clone().or(Some(settings.encode.preset.clone())),
        extra_args: Vec::new(),
    };

    let command = CommandBuilder::new(&request).with_style(&style).build()?;
    info!(command = ?command, "starting burn-in job");

    let (handle, mut events) = JobRunner::new(command).spawn();
    let cancel = handle.clone();
    ctrlc_handler(cancel);

    let mut outcome = JobOutcome::Failed(FAILURE_EXIT_CODE);
    while let Some(event) = events.recv().await {
        match event {
            JobEvent::Progress(ratio) => {
                info!("progress: {:.0}%", ratio * 100.0);
            }
            JobEvent::Error(message) => {
                error!("job error: {}", message);
            }
            JobEvent::Finished(result) => {
                outcome = result;
            }
        }
    }

    Ok(match outcome {
        JobOutcome::Completed => {
            info!(output = %output_path.display(), "done");
            ExitCode::SUCCESS
        }
        JobOutcome::Failed(code) => {
            error!("ffmpeg exited with code {}", code);
            ExitCode::from(code.clamp(1, 255) as u8)
        }
        JobOutcome::Cancelled => {
            info!("cancelled");
            ExitCode::from(130)
        }
    })
}

/// Parse any supported subtitle source into canonical lines.
///
/// CSV uses the saved per-file mapping when one exists, otherwise the
/// header heuristic.
fn parse_lines(
    path: &Path,
    settings: &subburn::config::Settings,
) -> Result<Vec<SubtitleLine>> {
    let format = SubtitleFormat::from_extension(path);
    if matches!(format, Some(SubtitleFormat::Csv)) {
        let mapping = match settings.csv_mapping_for(&path.to_string_lossy()) {
            Some(mapping) => mapping.clone(),
            None => {
                let content = subburn::subtitles::parsers::read_to_string_detecting(path)?;
                let header = content.lines().next().unwrap_or("");
                guess_mapping(header)
                    .context("CSV file is empty; cannot guess a column mapping")?
            }
        };
        Ok(parse_csv_file(path, &mapping)?)
    } else {
        Ok(parse_subtitle_file(path)?)
    }
}

/// Apply CLI style overrides on top of the configured style.
fn apply_style_overrides(mut style: StyleConfig, cli: &Cli) -> StyleConfig {
    if let Some(family) = &cli.font_family {
        style.family = family.clone();
    }
    if let Some(size) = cli.font_size {
        style.size = size;
    }
    if let Some(color) = &cli.font_color {
        style.color = color.clone();
    }
    if let Some(color) = &cli.outline_color {
        style.outline_color = color.clone();
    }
    if let Some(width) = cli.outline_width {
        style.outline_width = width;
    }
    if cli.bold {
        style.bold = true;
    }
    if cli.shadow {
        style.shadow = true;
    } else if cli.no_shadow {
        style.shadow = false;
    }
    style
}

/// Build `<stem>_sub<ext>` inside the configured output directory, or
/// an `output` folder beside the video. The directory is created before
/// the job starts.
fn derive_output_path(video: &Path, output_dir: &str) -> Result<PathBuf> {
    let dir = if output_dir.is_empty() {
        video
            .parent()
            .map(|p| p.join("output"))
            .unwrap_or_else(|| PathBuf::from("output"))
    } else {
        PathBuf::from(output_dir)
    };
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create output directory '{}'", dir.display()))?;

    let stem = video
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "output".to_string());
    let ext = video
        .extension()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "mp4".to_string());
    Ok(dir.join(format!("{}_sub.{}", stem, ext)))
}

/// Stop the running job on Ctrl-C; a second Ctrl-C is a no-op.
fn ctrlc_handler(handle: subburn::jobs::JobHandle) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            handle.stop();
        }
    });
}
