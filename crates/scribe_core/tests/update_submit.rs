use std::sync::Once;

use scribe_core::{
    update, AppState, Effect, FailureKind, JobStatus, MediaFile, MediaKind, Msg, RemoteJob,
    SubmissionState,
};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(scribe_logging::initialize_for_tests);
}

fn video(bytes: &[u8]) -> MediaFile {
    MediaFile {
        name: "meeting.mp4".to_string(),
        kind: MediaKind::Video,
        content_type: "video/mp4".to_string(),
        bytes: bytes.to_vec(),
    }
}

fn select_and_submit(state: AppState, file: MediaFile) -> (AppState, Vec<Effect>) {
    let (state, _) = update(state, Msg::FileSelected(file));
    update(state, Msg::SubmitClicked)
}

#[test]
fn submit_emits_job_and_guards_against_second_click() {
    init_logging();
    let (mut state, effects) = select_and_submit(AppState::new(), video(b"frames"));

    assert_eq!(
        effects,
        vec![Effect::SubmitJob {
            file: video(b"frames")
        }]
    );
    let view = state.view();
    assert_eq!(view.submission, SubmissionState::InFlight);
    assert!(!view.submit_enabled);
    assert_eq!(view.status, JobStatus::NotStarted);
    assert!(state.consume_dirty());

    let (state, effects) = update(state, Msg::SubmitClicked);
    assert!(effects.is_empty());
    assert_eq!(state.view().submission, SubmissionState::InFlight);
}

#[test]
fn successful_submission_sets_ids_and_starts_polling() {
    init_logging();
    let (state, _) = select_and_submit(AppState::new(), video(b"frames"));

    let (state, effects) = update(
        state,
        Msg::SubmitSucceeded {
            job_id: "j1".to_string(),
            conversation_id: "c1".to_string(),
        },
    );

    assert_eq!(
        effects,
        vec![Effect::StartPolling {
            job_id: "j1".to_string()
        }]
    );
    let view = state.view();
    assert_eq!(view.status, JobStatus::InProgress);
    assert_eq!(view.status_label, "processing");
    assert_eq!(
        view.job,
        Some(RemoteJob {
            job_id: "j1".to_string(),
            conversation_id: "c1".to_string(),
        })
    );
    assert!(view.polling);
    assert_eq!(view.status_queries, 0);
}

#[test]
fn failed_submission_keeps_not_started_and_releases_guard() {
    init_logging();
    let (state, _) = select_and_submit(AppState::new(), video(b"frames"));

    let (state, effects) = update(
        state,
        Msg::SubmitFailed {
            message: "network error".to_string(),
        },
    );

    assert!(effects.is_empty());
    let view = state.view();
    assert_eq!(view.status, JobStatus::NotStarted);
    assert_eq!(view.status_label, "");
    assert!(view.job.is_none());
    assert!(!view.polling);
    assert!(view.submit_enabled);
    assert!(view.settled);
    assert_eq!(view.last_failure.as_ref().unwrap().kind, FailureKind::Submission);

    // A tick can never reach the service without a job id.
    let (state, effects) = update(
        state,
        Msg::PollTick {
            job_id: "j1".to_string(),
        },
    );
    assert!(effects.is_empty());

    // The guard is released, so the user can retry.
    let (_, effects) = update(state, Msg::SubmitClicked);
    assert_eq!(effects.len(), 1);
}

#[test]
fn submit_without_file_records_failure() {
    init_logging();
    let (state, effects) = update(AppState::new(), Msg::SubmitClicked);
    assert!(effects.is_empty());
    assert_eq!(state.view().submission, SubmissionState::Idle);
    assert_eq!(
        state.view().last_failure.unwrap().kind,
        FailureKind::Submission
    );

    let (state, effects) = select_and_submit(state, video(b""));
    assert!(effects.is_empty());
    assert!(state.view().submit_enabled);
}

#[test]
fn late_success_after_failure_is_ignored() {
    init_logging();
    let (state, _) = select_and_submit(AppState::new(), video(b"frames"));
    let (state, _) = update(
        state,
        Msg::SubmitFailed {
            message: "http status 500".to_string(),
        },
    );

    let (state, effects) = update(
        state,
        Msg::SubmitSucceeded {
            job_id: "j1".to_string(),
            conversation_id: "c1".to_string(),
        },
    );

    assert!(effects.is_empty());
    assert!(state.view().job.is_none());
    assert_eq!(state.view().status, JobStatus::NotStarted);
}
