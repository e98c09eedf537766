use crate::{ConversationId, JobId, MediaFile};

/// Side effects requested by `update`; the application executes them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    SubmitJob { file: MediaFile },
    StartPolling { job_id: JobId },
    StopPolling,
    QueryStatus { job_id: JobId },
    FetchTranscript { conversation_id: ConversationId },
}
