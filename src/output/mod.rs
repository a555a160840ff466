use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::cli::OutputFormat;
use crate::extractors::{Transcript, VideoId};
use crate::utils::sanitize_filename;

/// Render a transcript in the requested format
pub fn format_transcript(transcript: &Transcript, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(transcript.text()),
        OutputFormat::Json => serde_json::to_string_pretty(transcript)
            .context("Failed to serialize transcript"),
    }
}

/// Save a transcript as `transcript-<id>.<ext>` inside `dir`
pub fn save_transcript(
    transcript: &Transcript,
    dir: &Path,
    format: OutputFormat,
) -> Result<PathBuf> {
    let content = format_transcript(transcript, format)?;
    let path = output_path(dir, "transcript", transcript.video_id(), format.extension());
    write_file(&path, &content)?;
    Ok(path)
}

/// Save a summary as `summary-<id>.txt` inside `dir`
pub fn save_summary(summary: &str, dir: &Path, video_id: &VideoId) -> Result<PathBuf> {
    let path = output_path(dir, "summary", video_id, "txt");
    write_file(&path, summary)?;
    Ok(path)
}

/// Print content to the console unmodified
pub fn print_to_console(content: &str) {
    println!("{}", content);
}

fn output_path(dir: &Path, kind: &str, video_id: &VideoId, extension: &str) -> PathBuf {
    dir.join(format!(
        "{}-{}.{}",
        kind,
        sanitize_filename(video_id.as_str()),
        extension
    ))
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs_err::create_dir_all(parent)?;
    }

    fs_err::write(path, content)?;
    tracing::debug!("Wrote {} chars to {}", content.chars().count(), path.display());
    Ok(())
}
