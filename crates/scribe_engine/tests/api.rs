use std::time::Duration;

use bytes::Bytes;
use pretty_assertions::assert_eq;
use scribe_engine::{
    AccessToken, ApiSettings, FailureKind, JobStatusReport, MediaKind, MediaUpload, ProcessingApi,
    ReqwestApi, StartTime, SubmittedJob, TranscriptMessage,
};
use wiremock::matchers::{body_bytes, body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn api_for(server: &MockServer) -> ReqwestApi {
    ReqwestApi::new(ApiSettings {
        base_url: server.uri(),
        ..ApiSettings::default()
    })
    .unwrap()
}

fn token() -> AccessToken {
    AccessToken::new("tok-123")
}

fn video(bytes: &'static [u8]) -> MediaUpload {
    MediaUpload {
        kind: MediaKind::Video,
        content_type: "video/mp4".to_string(),
        bytes: Bytes::from_static(bytes),
    }
}

#[tokio::test]
async fn submit_posts_payload_with_credential() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/process/video"))
        .and(header("x-api-key", "tok-123"))
        .and(header("content-type", "video/mp4"))
        .and(body_bytes(b"frames".to_vec()))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_json(serde_json::json!({"jobId": "j1", "conversationId": "c1"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let job = api_for(&server)
        .submit_job(video(b"frames"), &token())
        .await
        .expect("submit ok");
    assert_eq!(
        job,
        SubmittedJob {
            job_id: "j1".to_string(),
            conversation_id: "c1".to_string(),
        }
    );
}

#[tokio::test]
async fn audio_uploads_use_audio_endpoint() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/process/audio"))
        .and(header("content-type", "audio/wav"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"jobId": "j2", "conversationId": "c2"})),
        )
        .mount(&server)
        .await;

    let upload = MediaUpload {
        kind: MediaKind::Audio,
        content_type: "audio/wav".to_string(),
        bytes: Bytes::from_static(b"RIFF"),
    };
    let job = api_for(&server).submit_job(upload, &token()).await.unwrap();
    assert_eq!(job.job_id, "j2");
}

#[tokio::test]
async fn submit_fails_on_http_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/process/video"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let err = api_for(&server)
        .submit_job(video(b"frames"), &token())
        .await
        .unwrap_err();
    assert_eq!(err.kind, FailureKind::HttpStatus(401));
}

#[tokio::test]
async fn submit_without_ids_is_a_decode_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/process/video"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"jobId": "j1"})))
        .mount(&server)
        .await;

    let err = api_for(&server)
        .submit_job(video(b"frames"), &token())
        .await
        .unwrap_err();
    assert_eq!(err.kind, FailureKind::Decode);
}

#[tokio::test]
async fn job_status_returns_remote_value() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/job/j1"))
        .and(header("x-api-key", "tok-123"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"id": "j1", "status": "in_progress"})),
        )
        .mount(&server)
        .await;

    let report = api_for(&server).job_status("j1", &token()).await.unwrap();
    assert_eq!(
        report,
        JobStatusReport {
            status: "in_progress".to_string()
        }
    );
}

#[tokio::test]
async fn messages_keep_service_order() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/conversations/c1/messages"))
        .and(header("x-api-key", "tok-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "messages": [
                {"id": "m2", "text": "later", "startTime": "2020-07-10T11:16:22.000Z"},
                {"id": "m1", "text": "hi", "startTime": 1000}
            ]
        })))
        .mount(&server)
        .await;

    let messages = api_for(&server)
        .conversation_messages("c1", &token())
        .await
        .unwrap();
    assert_eq!(
        messages,
        vec![
            TranscriptMessage {
                text: "later".to_string(),
                start_time: StartTime::Text("2020-07-10T11:16:22.000Z".to_string()),
            },
            TranscriptMessage {
                text: "hi".to_string(),
                start_time: StartTime::EpochMillis(1000),
            },
        ]
    );
}

#[tokio::test]
async fn status_query_times_out_on_slow_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/job/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(250))
                .set_body_json(serde_json::json!({"status": "completed"})),
        )
        .mount(&server)
        .await;

    let api = ReqwestApi::new(ApiSettings {
        base_url: server.uri(),
        request_timeout: Duration::from_millis(50),
        ..ApiSettings::default()
    })
    .unwrap();

    let err = api.job_status("slow", &token()).await.unwrap_err();
    assert_eq!(err.kind, FailureKind::Timeout);
}

#[tokio::test]
async fn generate_token_exchanges_app_credentials() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth2/token:generate"))
        .and(body_json(serde_json::json!({
            "type": "application",
            "appId": "app",
            "appSecret": "secret"
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"accessToken": "fresh", "expiresIn": 3600})),
        )
        .mount(&server)
        .await;

    let token = api_for(&server)
        .generate_token("app", "secret")
        .await
        .unwrap();
    assert_eq!(token.expose(), "fresh");
}
