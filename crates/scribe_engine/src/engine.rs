use std::sync::Arc;
use std::time::Duration;

use scribe_logging::{scribe_debug, scribe_info, scribe_warn};
use tokio::sync::mpsc;

use crate::api::{ApiSettings, ProcessingApi, ReqwestApi};
use crate::poller::StatusPoller;
use crate::{AccessToken, ApiError, EngineEvent, MediaUpload};

#[derive(Debug, Clone)]
pub struct EngineSettings {
    pub api: ApiSettings,
    pub poll_interval: Duration,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            api: ApiSettings::default(),
            poll_interval: Duration::from_millis(1000),
        }
    }
}

enum ApiRequest {
    Submit {
        upload: MediaUpload,
        token: AccessToken,
    },
    QueryStatus {
        job_id: String,
        token: AccessToken,
    },
    FetchTranscript {
        conversation_id: String,
        token: AccessToken,
    },
}

enum EngineCommand {
    Request(ApiRequest),
    StartPolling { job_id: String },
    StopPolling,
}

/// Front end of the IO task: commands go in, `EngineEvent`s come out.
pub struct EngineHandle {
    cmd_tx: mpsc::UnboundedSender<EngineCommand>,
    event_rx: mpsc::UnboundedReceiver<EngineEvent>,
}

impl EngineHandle {
    /// Spawns the command loop on the current tokio runtime.
    pub fn new(api: Arc<dyn ProcessingApi>, poll_interval: Duration) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let (event_tx, event_rx) = mpsc::unbounded_channel();

        tokio::spawn(run_commands(api, poll_interval, cmd_rx, event_tx));

        Self { cmd_tx, event_rx }
    }

    /// Builds a handle talking to the real service.
    pub fn connect(settings: EngineSettings) -> Result<Self, ApiError> {
        let api = ReqwestApi::new(settings.api)?;
        Ok(Self::new(Arc::new(api), settings.poll_interval))
    }

    pub fn submit(&self, upload: MediaUpload, token: AccessToken) {
        self.send(EngineCommand::Request(ApiRequest::Submit { upload, token }));
    }

    pub fn query_status(&self, job_id: impl Into<String>, token: AccessToken) {
        self.send(EngineCommand::Request(ApiRequest::QueryStatus {
            job_id: job_id.into(),
            token,
        }));
    }

    pub fn fetch_transcript(&self, conversation_id: impl Into<String>, token: AccessToken) {
        self.send(EngineCommand::Request(ApiRequest::FetchTranscript {
            conversation_id: conversation_id.into(),
            token,
        }));
    }

    pub fn start_polling(&self, job_id: impl Into<String>) {
        self.send(EngineCommand::StartPolling {
            job_id: job_id.into(),
        });
    }

    pub fn stop_polling(&self) {
        self.send(EngineCommand::StopPolling);
    }

    pub async fn recv(&mut self) -> Option<EngineEvent> {
        self.event_rx.recv().await
    }

    pub fn try_recv(&mut self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    fn send(&self, command: EngineCommand) {
        if self.cmd_tx.send(command).is_err() {
            scribe_warn!("Engine command loop has stopped; command dropped");
        }
    }
}

async fn run_commands(
    api: Arc<dyn ProcessingApi>,
    poll_interval: Duration,
    mut cmd_rx: mpsc::UnboundedReceiver<EngineCommand>,
    event_tx: mpsc::UnboundedSender<EngineEvent>,
) {
    let mut poller = StatusPoller::new(poll_interval);

    while let Some(command) = cmd_rx.recv().await {
        match command {
            EngineCommand::StartPolling { job_id } => poller.start(job_id, event_tx.clone()),
            EngineCommand::StopPolling => poller.stop(),
            EngineCommand::Request(request) => {
                let api = api.clone();
                let event_tx = event_tx.clone();
                tokio::spawn(async move {
                    let event = handle_request(api.as_ref(), request).await;
                    let _ = event_tx.send(event);
                });
            }
        }
    }

    poller.stop();
    scribe_debug!("Engine command loop finished");
}

async fn handle_request(api: &dyn ProcessingApi, request: ApiRequest) -> EngineEvent {
    match request {
        ApiRequest::Submit { upload, token } => {
            scribe_info!(
                "Submitting {} bytes ({})",
                upload.bytes.len(),
                upload.content_type
            );
            EngineEvent::JobSubmitted {
                result: api.submit_job(upload, &token).await,
            }
        }
        ApiRequest::QueryStatus { job_id, token } => {
            let result = api.job_status(&job_id, &token).await;
            EngineEvent::StatusQueried { job_id, result }
        }
        ApiRequest::FetchTranscript {
            conversation_id,
            token,
        } => {
            let result = api.conversation_messages(&conversation_id, &token).await;
            EngineEvent::TranscriptFetched {
                conversation_id,
                result,
            }
        }
    }
}
