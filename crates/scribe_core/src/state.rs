use std::fmt;

use crate::view_model::{status_label, AppViewModel};

pub type JobId = String;
pub type ConversationId = String;

/// Identifiers assigned by the service on submission. They always arrive together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteJob {
    pub job_id: JobId,
    pub conversation_id: ConversationId,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum JobStatus {
    #[default]
    NotStarted,
    InProgress,
    Completed,
    Failed,
    /// Any other value the service reports, kept verbatim.
    Other(String),
}

impl JobStatus {
    pub fn from_remote(raw: &str) -> Self {
        match raw {
            "not_started" => JobStatus::NotStarted,
            "in_progress" => JobStatus::InProgress,
            "completed" => JobStatus::Completed,
            "failed" => JobStatus::Failed,
            other => JobStatus::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            JobStatus::NotStarted => "not_started",
            JobStatus::InProgress => "in_progress",
            JobStatus::Completed => "completed",
            JobStatus::Failed => "failed",
            JobStatus::Other(raw) => raw,
        }
    }

    /// No further polling happens once a job reaches one of these.
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }
}

/// Stop condition for the status poller.
///
/// True once the job finished, or when the status moved on without a job to poll.
pub fn polling_should_stop(status: &JobStatus, job: Option<&RemoteJob>) -> bool {
    status.is_terminal() || (*status != JobStatus::NotStarted && job.is_none())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Audio,
    Video,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaFile {
    pub name: String,
    pub kind: MediaKind,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartTime {
    EpochMillis(i64),
    /// Timestamp text as sent by the service (RFC 3339).
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptMessage {
    pub text: String,
    pub start_time: StartTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Submission,
    Poll,
    Fetch,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    pub kind: FailureKind,
    pub message: String,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FailureKind::Submission => "submission",
            FailureKind::Poll => "poll",
            FailureKind::Fetch => "fetch",
        })
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} failure: {}", self.kind, self.message)
    }
}

/// Submission guard. Only `Idle` accepts a new submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmissionState {
    #[default]
    Idle,
    InFlight,
    Accepted,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    file: Option<MediaFile>,
    submission: SubmissionState,
    job: Option<RemoteJob>,
    status: JobStatus,
    polling: bool,
    status_query_in_flight: bool,
    status_queries: u64,
    transcript_in_flight: bool,
    messages: Vec<TranscriptMessage>,
    last_failure: Option<Failure>,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> AppViewModel {
        AppViewModel {
            file_name: self.file.as_ref().map(|file| file.name.clone()),
            submission: self.submission,
            submit_enabled: self.submission == SubmissionState::Idle,
            job: self.job.clone(),
            status: self.status.clone(),
            status_label: status_label(&self.status),
            polling: self.polling,
            status_queries: self.status_queries,
            transcript_pending: self.transcript_in_flight,
            messages: self.messages.clone(),
            last_failure: self.last_failure.clone(),
            settled: self.is_settled(),
            dirty: self.dirty,
        }
    }

    /// True when no submission, poll or transcript fetch is outstanding.
    pub fn is_settled(&self) -> bool {
        self.submission != SubmissionState::InFlight && !self.polling && !self.transcript_in_flight
    }

    /// Returns whether the state changed since the last call and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn select_file(&mut self, file: MediaFile) {
        self.file = Some(file);
        self.mark_dirty();
    }

    pub(crate) fn submittable_file(&self) -> Option<&MediaFile> {
        self.file.as_ref().filter(|file| !file.bytes.is_empty())
    }

    pub(crate) fn submission(&self) -> SubmissionState {
        self.submission
    }

    /// Marks a submission in flight and forgets the previous job.
    /// The previous transcript is kept until a new one replaces it.
    pub(crate) fn begin_submission(&mut self) {
        self.submission = SubmissionState::InFlight;
        self.job = None;
        self.status = JobStatus::NotStarted;
        self.status_query_in_flight = false;
        self.transcript_in_flight = false;
        self.last_failure = None;
        self.mark_dirty();
    }

    pub(crate) fn accept_submission(&mut self, job: RemoteJob) {
        self.submission = SubmissionState::Accepted;
        self.job = Some(job);
        self.status = JobStatus::InProgress;
        self.mark_dirty();
    }

    pub(crate) fn reject_submission(&mut self, message: String) {
        self.submission = SubmissionState::Idle;
        self.record_failure(FailureKind::Submission, message);
    }

    pub(crate) fn record_failure(&mut self, kind: FailureKind, message: String) {
        self.last_failure = Some(Failure { kind, message });
        self.mark_dirty();
    }

    /// Drops the last failure if it is of `kind`.
    pub(crate) fn clear_failure(&mut self, kind: FailureKind) {
        if self.last_failure.as_ref().is_some_and(|f| f.kind == kind) {
            self.last_failure = None;
            self.mark_dirty();
        }
    }

    pub(crate) fn job(&self) -> Option<&RemoteJob> {
        self.job.as_ref()
    }

    pub(crate) fn is_current_job(&self, job_id: &str) -> bool {
        self.job.as_ref().is_some_and(|job| job.job_id == job_id)
    }

    pub(crate) fn is_current_conversation(&self, conversation_id: &str) -> bool {
        self.job
            .as_ref()
            .is_some_and(|job| job.conversation_id == conversation_id)
    }

    pub fn status(&self) -> &JobStatus {
        &self.status
    }

    /// Overwrites the status and returns the previous one.
    pub(crate) fn replace_status(&mut self, status: JobStatus) -> JobStatus {
        if status.is_terminal() {
            self.submission = SubmissionState::Idle;
        }
        let previous = std::mem::replace(&mut self.status, status);
        if previous != self.status {
            self.mark_dirty();
        }
        previous
    }

    pub(crate) fn is_polling(&self) -> bool {
        self.polling
    }

    pub(crate) fn set_polling(&mut self, polling: bool) {
        self.polling = polling;
        if !polling {
            self.status_query_in_flight = false;
        }
        self.mark_dirty();
    }

    /// Claims the single status-query slot; false if a query is already out.
    pub(crate) fn try_begin_status_query(&mut self) -> bool {
        if self.status_query_in_flight {
            return false;
        }
        self.status_query_in_flight = true;
        self.status_queries += 1;
        true
    }

    pub(crate) fn finish_status_query(&mut self) {
        self.status_query_in_flight = false;
    }

    pub(crate) fn is_transcript_in_flight(&self) -> bool {
        self.transcript_in_flight
    }

    pub(crate) fn begin_transcript_fetch(&mut self) {
        self.transcript_in_flight = true;
        self.mark_dirty();
    }

    pub(crate) fn replace_messages(&mut self, messages: Vec<TranscriptMessage>) {
        self.transcript_in_flight = false;
        self.messages = messages;
        self.clear_failure(FailureKind::Fetch);
        self.mark_dirty();
    }

    pub(crate) fn fail_transcript_fetch(&mut self, message: String) {
        self.transcript_in_flight = false;
        self.record_failure(FailureKind::Fetch, message);
    }
}
