use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use scribe_core::{StartTime, TranscriptMessage};
use serde::Serialize;
use tempfile::NamedTempFile;
use thiserror::Error;

use super::ui::render::message_lines;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ExportFormat {
    /// `{"messages": [{"text", "startTime"}]}`, the service's own shape.
    Json,
    /// One `[time] text` line per message.
    Text,
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("output path {0:?} has no parent directory")]
    NoParent(PathBuf),
    #[error("failed to serialize transcript: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

#[derive(Serialize)]
struct ExportedTranscript<'a> {
    messages: Vec<ExportedMessage<'a>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ExportedMessage<'a> {
    text: &'a str,
    start_time: serde_json::Value,
}

pub fn render_transcript(
    messages: &[TranscriptMessage],
    format: ExportFormat,
) -> Result<String, ExportError> {
    match format {
        ExportFormat::Json => {
            let transcript = ExportedTranscript {
                messages: messages
                    .iter()
                    .map(|message| ExportedMessage {
                        text: &message.text,
                        start_time: match &message.start_time {
                            StartTime::EpochMillis(millis) => serde_json::Value::from(*millis),
                            StartTime::Text(text) => serde_json::Value::from(text.as_str()),
                        },
                    })
                    .collect(),
            };
            let mut out = serde_json::to_string_pretty(&transcript)?;
            out.push('\n');
            Ok(out)
        }
        ExportFormat::Text => Ok(message_lines(messages)
            .into_iter()
            .map(|line| line + "\n")
            .collect()),
    }
}

/// Writes the transcript by writing a temp file next to `path` and renaming it over.
pub fn write_transcript(
    path: &Path,
    messages: &[TranscriptMessage],
    format: ExportFormat,
) -> Result<PathBuf, ExportError> {
    let content = render_transcript(messages, format)?;
    let dir = match path.parent() {
        Some(parent) if parent.as_os_str().is_empty() => Path::new("."),
        Some(parent) => parent,
        None => return Err(ExportError::NoParent(path.to_path_buf())),
    };
    fs::create_dir_all(dir)?;

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content.as_bytes())?;
    tmp.flush()?;
    tmp.as_file_mut().sync_all()?;
    tmp.persist(path).map_err(|e| ExportError::Io(e.error))?;
    Ok(path.to_path_buf())
}
