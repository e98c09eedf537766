use crate::{ConversationId, JobId, MediaFile, TranscriptMessage};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User picked the media file to process.
    FileSelected(MediaFile),
    /// User asked to submit the selected file.
    SubmitClicked,
    /// The processing endpoint accepted the file.
    SubmitSucceeded {
        job_id: JobId,
        conversation_id: ConversationId,
    },
    /// The submission could not be completed.
    SubmitFailed { message: String },
    /// Poll timer fired for a job.
    PollTick { job_id: JobId },
    /// Remote status for a job, as reported by the service.
    StatusReceived { job_id: JobId, status: String },
    /// A status query failed; the next tick retries.
    StatusQueryFailed { job_id: JobId, message: String },
    /// Transcript for a conversation.
    TranscriptReceived {
        conversation_id: ConversationId,
        messages: Vec<TranscriptMessage>,
    },
    /// Transcript retrieval failed.
    TranscriptFailed {
        conversation_id: ConversationId,
        message: String,
    },
    /// User asked to fetch the transcript again.
    RefetchTranscriptClicked,
}
