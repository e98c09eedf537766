//! Scribe engine: remote processing API, poll timer and effect execution.
mod api;
mod engine;
mod poller;
mod schedule;
mod types;

pub use api::{ApiSettings, ProcessingApi, ReqwestApi};
pub use engine::{EngineHandle, EngineSettings};
pub use poller::StatusPoller;
pub use schedule::{schedule, IntervalHandle, IntervalScheduler};
pub use types::{
    AccessToken, ApiError, EngineEvent, FailureKind, JobStatusReport, MediaKind, MediaUpload,
    StartTime, SubmittedJob, TranscriptMessage,
};
