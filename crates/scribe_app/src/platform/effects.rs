use bytes::Bytes;
use scribe_core::{
    Effect, Failure, FailureKind, MediaFile, MediaKind, Msg, StartTime, TranscriptMessage,
};
use scribe_engine::{ApiError, EngineEvent, EngineHandle, MediaUpload};
use scribe_logging::{scribe_debug, scribe_info, scribe_warn};

use super::credentials::CredentialHolder;

const NOT_LOGGED_IN: &str = "no access token available";

/// Executes core effects on the engine and turns engine events back into messages.
pub struct EffectRunner {
    engine: EngineHandle,
    credentials: CredentialHolder,
}

impl EffectRunner {
    pub fn new(engine: EngineHandle, credentials: CredentialHolder) -> Self {
        Self {
            engine,
            credentials,
        }
    }

    pub fn credentials_mut(&mut self) -> &mut CredentialHolder {
        &mut self.credentials
    }

    /// Starts every effect. Effects that cannot run produce a message right away.
    pub fn enqueue(&self, effects: Vec<Effect>) -> Vec<Msg> {
        let mut immediate = Vec::new();
        for effect in effects {
            match effect {
                Effect::SubmitJob { file } => {
                    scribe_info!(
                        "SubmitJob file={} content_type={} bytes={}",
                        file.name,
                        file.content_type,
                        file.bytes.len()
                    );
                    match self.credentials.token() {
                        Some(token) => self.engine.submit(map_upload(file), token),
                        None => immediate.push(Msg::SubmitFailed {
                            message: NOT_LOGGED_IN.to_string(),
                        }),
                    }
                }
                Effect::StartPolling { job_id } => self.engine.start_polling(job_id),
                Effect::StopPolling => self.engine.stop_polling(),
                Effect::QueryStatus { job_id } => match self.credentials.token() {
                    Some(token) => self.engine.query_status(job_id, token),
                    None => immediate.push(Msg::StatusQueryFailed {
                        job_id,
                        message: NOT_LOGGED_IN.to_string(),
                    }),
                },
                Effect::FetchTranscript { conversation_id } => {
                    scribe_info!("FetchTranscript conversation_id={}", conversation_id);
                    match self.credentials.token() {
                        Some(token) => self.engine.fetch_transcript(conversation_id, token),
                        None => immediate.push(Msg::TranscriptFailed {
                            conversation_id,
                            message: NOT_LOGGED_IN.to_string(),
                        }),
                    }
                }
            }
        }
        immediate
    }

    /// Waits for the next engine event. `None` once the engine has shut down.
    pub async fn next_msg(&mut self) -> Option<Msg> {
        self.engine.recv().await.map(map_event)
    }
}

/// Logs a failed request under its failure kind and returns the message for the core.
fn log_failure(kind: FailureKind, subject: &str, err: ApiError) -> String {
    let failure = Failure {
        kind,
        message: err.to_string(),
    };
    scribe_warn!("{} ({})", failure, subject);
    failure.message
}

fn map_event(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::JobSubmitted { result } => match result {
            Ok(job) => {
                scribe_info!(
                    "Job accepted job_id={} conversation_id={}",
                    job.job_id,
                    job.conversation_id
                );
                Msg::SubmitSucceeded {
                    job_id: job.job_id,
                    conversation_id: job.conversation_id,
                }
            }
            Err(err) => Msg::SubmitFailed {
                message: log_failure(FailureKind::Submission, "file", err),
            },
        },
        EngineEvent::PollTick { job_id } => Msg::PollTick { job_id },
        EngineEvent::StatusQueried { job_id, result } => match result {
            Ok(report) => {
                scribe_debug!("Job {} reported status {}", job_id, report.status);
                Msg::StatusReceived {
                    job_id,
                    status: report.status,
                }
            }
            Err(err) => {
                let message = log_failure(FailureKind::Poll, &job_id, err);
                Msg::StatusQueryFailed { job_id, message }
            }
        },
        EngineEvent::TranscriptFetched {
            conversation_id,
            result,
        } => match result {
            Ok(messages) => {
                scribe_info!(
                    "Fetched {} transcript messages for {}",
                    messages.len(),
                    conversation_id
                );
                Msg::TranscriptReceived {
                    conversation_id,
                    messages: messages.into_iter().map(map_message).collect(),
                }
            }
            Err(err) => {
                let message = log_failure(FailureKind::Fetch, &conversation_id, err);
                Msg::TranscriptFailed {
                    conversation_id,
                    message,
                }
            }
        },
    }
}

fn map_upload(file: MediaFile) -> MediaUpload {
    MediaUpload {
        kind: match file.kind {
            MediaKind::Audio => scribe_engine::MediaKind::Audio,
            MediaKind::Video => scribe_engine::MediaKind::Video,
        },
        content_type: file.content_type,
        bytes: Bytes::from(file.bytes),
    }
}

fn map_message(message: scribe_engine::TranscriptMessage) -> TranscriptMessage {
    TranscriptMessage {
        text: message.text,
        start_time: match message.start_time {
            scribe_engine::StartTime::EpochMillis(millis) => StartTime::EpochMillis(millis),
            scribe_engine::StartTime::Text(text) => StartTime::Text(text),
        },
    }
}
