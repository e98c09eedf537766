//! Scribe application: wires the core state machine to the engine and the terminal.
mod platform;

pub use platform::config::{
    load_file_config, resolve_settings, ConfigError, FileConfig, SettingsOverrides,
    DEFAULT_CONFIG_FILENAME,
};
pub use platform::credentials::CredentialHolder;
pub use platform::effects::EffectRunner;
pub use platform::export::{render_transcript, write_transcript, ExportError, ExportFormat};
pub use platform::logging::{initialize as initialize_logging, LogDestination};
pub use platform::media::{load_media, media_type_for, MediaError};
pub use platform::session::Session;
pub use platform::ui::render::{format_start_time, message_lines, TerminalSink, ViewSink};
