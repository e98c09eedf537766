//! Scribe core: pure job-lifecycle state machine and view-model helpers.
mod effect;
mod msg;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use msg::Msg;
pub use state::{
    polling_should_stop, AppState, ConversationId, Failure, FailureKind, JobId, JobStatus,
    MediaFile, MediaKind, RemoteJob, StartTime, SubmissionState, TranscriptMessage,
};
pub use update::update;
pub use view_model::{status_label, AppViewModel};
