//! Settings resolution: built-in defaults, then `scribe.ron`, then command-line flags.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use ron::extensions::Extensions;
use scribe_engine::EngineSettings;
use scribe_logging::scribe_info;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_CONFIG_FILENAME: &str = "scribe.ron";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub base_url: Option<String>,
    pub poll_interval_ms: Option<u64>,
    pub connect_timeout_secs: Option<u64>,
    pub request_timeout_secs: Option<u64>,
    pub app_id: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct SettingsOverrides {
    pub base_url: Option<String>,
    pub poll_interval_ms: Option<u64>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to parse config {path:?}: {message}")]
    Parse { path: PathBuf, message: String },
    #[error("poll interval must be greater than zero")]
    ZeroPollInterval,
}

/// Loads the config file. An explicit path must exist; the default one is optional.
pub fn load_file_config(explicit: Option<&Path>) -> Result<FileConfig, ConfigError> {
    let path = explicit
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILENAME));

    let content = match fs::read_to_string(&path) {
        Ok(text) => text,
        Err(err) if explicit.is_none() && err.kind() == io::ErrorKind::NotFound => {
            return Ok(FileConfig::default());
        }
        Err(source) => return Err(ConfigError::Read { path, source }),
    };

    let config: FileConfig = ron::Options::default()
        .with_default_extension(Extensions::IMPLICIT_SOME)
        .from_str(&content)
        .map_err(|err| ConfigError::Parse {
            path: path.clone(),
            message: err.to_string(),
        })?;
    scribe_info!("Loaded config from {:?}", path);
    Ok(config)
}

pub fn resolve_settings(
    file: &FileConfig,
    overrides: &SettingsOverrides,
) -> Result<EngineSettings, ConfigError> {
    let mut settings = EngineSettings::default();

    if let Some(base_url) = overrides.base_url.clone().or_else(|| file.base_url.clone()) {
        settings.api.base_url = base_url;
    }
    if let Some(secs) = file.connect_timeout_secs {
        settings.api.connect_timeout = Duration::from_secs(secs);
    }
    if let Some(secs) = file.request_timeout_secs {
        settings.api.request_timeout = Duration::from_secs(secs);
    }
    if let Some(millis) = overrides.poll_interval_ms.or(file.poll_interval_ms) {
        if millis == 0 {
            return Err(ConfigError::ZeroPollInterval);
        }
        settings.poll_interval = Duration::from_millis(millis);
    }

    Ok(settings)
}
