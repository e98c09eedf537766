use crate::{Failure, JobStatus, RemoteJob, SubmissionState, TranscriptMessage};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub file_name: Option<String>,
    pub submission: SubmissionState,
    pub submit_enabled: bool,
    pub job: Option<RemoteJob>,
    pub status: JobStatus,
    pub status_label: String,
    pub polling: bool,
    pub status_queries: u64,
    pub transcript_pending: bool,
    pub messages: Vec<TranscriptMessage>,
    pub last_failure: Option<Failure>,
    pub settled: bool,
    pub dirty: bool,
}

/// Heading shown for a status: nothing before submission, "processing" while running.
pub fn status_label(status: &JobStatus) -> String {
    match status {
        JobStatus::NotStarted => String::new(),
        JobStatus::InProgress => "processing".to_string(),
        other => other.as_str().to_string(),
    }
}
