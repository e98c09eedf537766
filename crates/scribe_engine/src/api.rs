use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use reqwest::{RequestBuilder, Url};
use scribe_logging::{scribe_debug, scribe_info};
use serde::de::DeserializeOwned;

use crate::types::{MessagesResponse, TokenRequest, TokenResponse};
use crate::{
    AccessToken, ApiError, FailureKind, JobStatusReport, MediaUpload, SubmittedJob,
    TranscriptMessage,
};

const API_KEY_HEADER: &str = "x-api-key";

#[derive(Debug, Clone)]
pub struct ApiSettings {
    pub base_url: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: "https://api.symbl.ai".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// The three calls the job lifecycle depends on. The credential is passed per call.
#[async_trait::async_trait]
pub trait ProcessingApi: Send + Sync {
    async fn submit_job(
        &self,
        upload: MediaUpload,
        token: &AccessToken,
    ) -> Result<SubmittedJob, ApiError>;

    async fn job_status(
        &self,
        job_id: &str,
        token: &AccessToken,
    ) -> Result<JobStatusReport, ApiError>;

    async fn conversation_messages(
        &self,
        conversation_id: &str,
        token: &AccessToken,
    ) -> Result<Vec<TranscriptMessage>, ApiError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestApi {
    settings: ApiSettings,
    client: reqwest::Client,
}

impl ReqwestApi {
    pub fn new(settings: ApiSettings) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| ApiError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self { settings, client })
    }

    /// Exchanges application credentials for an access token.
    pub async fn generate_token(
        &self,
        app_id: &str,
        app_secret: &str,
    ) -> Result<AccessToken, ApiError> {
        let url = self.endpoint(&["oauth2", "token:generate"])?;
        let body = serde_json::to_vec(&TokenRequest {
            kind: "application",
            app_id,
            app_secret,
        })
        .map_err(|err| ApiError::new(FailureKind::Decode, err.to_string()))?;

        let response: TokenResponse = send_json(
            self.client
                .post(url)
                .header(CONTENT_TYPE, "application/json")
                .body(body),
        )
        .await?;
        scribe_info!("Obtained access token for app_id={}", app_id);
        Ok(AccessToken::new(response.access_token))
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = Url::parse(&self.settings.base_url)
            .map_err(|err| ApiError::new(FailureKind::InvalidUrl, err.to_string()))?;
        url.path_segments_mut()
            .map_err(|()| ApiError::new(FailureKind::InvalidUrl, "base url cannot have a path"))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

#[async_trait::async_trait]
impl ProcessingApi for ReqwestApi {
    async fn submit_job(
        &self,
        upload: MediaUpload,
        token: &AccessToken,
    ) -> Result<SubmittedJob, ApiError> {
        let url = self.endpoint(&["v1", "process", upload.kind.endpoint_segment()])?;
        scribe_debug!(
            "POST {} content_type={} bytes={}",
            url,
            upload.content_type,
            upload.bytes.len()
        );
        send_json(
            self.client
                .post(url)
                .header(API_KEY_HEADER, token.expose())
                .header(CONTENT_TYPE, upload.content_type)
                .body(upload.bytes),
        )
        .await
    }

    async fn job_status(
        &self,
        job_id: &str,
        token: &AccessToken,
    ) -> Result<JobStatusReport, ApiError> {
        let url = self.endpoint(&["v1", "job", job_id])?;
        scribe_debug!("GET {}", url);
        send_json(self.client.get(url).header(API_KEY_HEADER, token.expose())).await
    }

    async fn conversation_messages(
        &self,
        conversation_id: &str,
        token: &AccessToken,
    ) -> Result<Vec<TranscriptMessage>, ApiError> {
        let url = self.endpoint(&["v1", "conversations", conversation_id, "messages"])?;
        scribe_debug!("GET {}", url);
        let response: MessagesResponse = send_json(
            self.client
                .get(url)
                .header(API_KEY_HEADER, token.expose())
                .header(CONTENT_TYPE, "application/json"),
        )
        .await?;
        Ok(response.messages)
    }
}

async fn send_json<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, ApiError> {
    let response = request.send().await.map_err(map_reqwest_error)?;

    let status = response.status();
    if !status.is_success() {
        return Err(ApiError::new(
            FailureKind::HttpStatus(status.as_u16()),
            status.to_string(),
        ));
    }

    let body = response.bytes().await.map_err(map_reqwest_error)?;
    serde_json::from_slice(&body).map_err(|err| ApiError::new(FailureKind::Decode, err.to_string()))
}

fn map_reqwest_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        return ApiError::new(FailureKind::Timeout, err.to_string());
    }
    ApiError::new(FailureKind::Network, err.to_string())
}
