use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use scribe_core::{MediaFile, MediaKind};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("failed to read {path:?}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("unsupported media type for {0:?}; expected an audio or video file")]
    Unsupported(PathBuf),
}

/// Maps a file extension to the media kind and content type sent to the service.
pub fn media_type_for(path: &Path) -> Option<(MediaKind, &'static str)> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    let media = match ext.as_str() {
        "mp4" | "m4v" => (MediaKind::Video, "video/mp4"),
        "mov" => (MediaKind::Video, "video/quicktime"),
        "webm" => (MediaKind::Video, "video/webm"),
        "mkv" => (MediaKind::Video, "video/x-matroska"),
        "mp3" => (MediaKind::Audio, "audio/mpeg"),
        "wav" => (MediaKind::Audio, "audio/wav"),
        "m4a" => (MediaKind::Audio, "audio/mp4"),
        "ogg" | "oga" => (MediaKind::Audio, "audio/ogg"),
        "flac" => (MediaKind::Audio, "audio/flac"),
        _ => return None,
    };
    Some(media)
}

/// Reads a media file from disk. The content itself is not inspected.
pub fn load_media(path: &Path) -> Result<MediaFile, MediaError> {
    let (kind, content_type) =
        media_type_for(path).ok_or_else(|| MediaError::Unsupported(path.to_path_buf()))?;
    let bytes = fs::read(path).map_err(|source| MediaError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    Ok(MediaFile {
        name,
        kind,
        content_type: content_type.to_string(),
        bytes,
    })
}
