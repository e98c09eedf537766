use scribe_core::{update, AppState, Effect, JobStatus, MediaFile, MediaKind, Msg};

fn running_job() -> AppState {
    let file = MediaFile {
        name: "talk.wav".to_string(),
        kind: MediaKind::Audio,
        content_type: "audio/wav".to_string(),
        bytes: vec![1, 2, 3],
    };
    let (state, _) = update(AppState::new(), Msg::FileSelected(file));
    let (state, _) = update(state, Msg::SubmitClicked);
    let (state, _) = update(
        state,
        Msg::SubmitSucceeded {
            job_id: "j1".to_string(),
            conversation_id: "c1".to_string(),
        },
    );
    state
}

fn tick(state: AppState) -> (AppState, Vec<Effect>) {
    update(
        state,
        Msg::PollTick {
            job_id: "j1".to_string(),
        },
    )
}

fn status(state: AppState, status: &str) -> (AppState, Vec<Effect>) {
    update(
        state,
        Msg::StatusReceived {
            job_id: "j1".to_string(),
            status: status.to_string(),
        },
    )
}

#[test]
fn tick_queries_status_for_current_job() {
    let (state, effects) = tick(running_job());
    assert_eq!(
        effects,
        vec![Effect::QueryStatus {
            job_id: "j1".to_string()
        }]
    );
    assert_eq!(state.view().status_queries, 1);
}

#[test]
fn tick_while_query_in_flight_is_skipped() {
    let (state, _) = tick(running_job());
    let (state, effects) = tick(state);
    assert!(effects.is_empty());
    assert_eq!(state.view().status_queries, 1);

    let (state, _) = status(state, "in_progress");
    let (_, effects) = tick(state);
    assert_eq!(effects.len(), 1);
}

#[test]
fn tick_for_other_job_is_ignored() {
    let (state, effects) = update(
        running_job(),
        Msg::PollTick {
            job_id: "stale".to_string(),
        },
    );
    assert!(effects.is_empty());
    assert_eq!(state.view().status_queries, 0);
}

#[test]
fn completion_fetches_transcript_exactly_once() {
    let mut state = running_job();
    let mut fetches = Vec::new();

    for remote in ["in_progress", "in_progress", "in_progress", "completed"] {
        let (next, effects) = tick(state);
        assert_eq!(effects.len(), 1);
        let (next, effects) = status(next, remote);
        fetches.extend(effects);
        state = next;
    }

    assert_eq!(
        fetches,
        vec![
            Effect::FetchTranscript {
                conversation_id: "c1".to_string()
            },
            Effect::StopPolling,
        ]
    );
    let view = state.view();
    assert_eq!(view.status, JobStatus::Completed);
    assert!(!view.polling);
    assert!(view.transcript_pending);
    assert!(view.submit_enabled);

    // Repeated observation of `completed` does not re-trigger anything.
    let (state, effects) = status(state, "completed");
    assert!(effects.is_empty());
    let (state, effects) = tick(state);
    assert!(effects.is_empty());
    assert_eq!(state.view().status_queries, 4);
}

#[test]
fn failed_poll_leaves_status_and_next_poll_recovers() {
    let (state, _) = tick(running_job());
    let (state, effects) = update(
        state,
        Msg::StatusQueryFailed {
            job_id: "j1".to_string(),
            message: "timeout".to_string(),
        },
    );
    assert!(effects.is_empty());
    assert_eq!(state.view().status, JobStatus::InProgress);
    assert!(state.view().last_failure.is_none());
    assert!(state.view().polling);

    let (state, _) = tick(state);
    let (state, effects) = status(state, "completed");
    assert_eq!(state.view().status, JobStatus::Completed);
    assert_eq!(
        effects,
        vec![
            Effect::FetchTranscript {
                conversation_id: "c1".to_string()
            },
            Effect::StopPolling,
        ]
    );
}

#[test]
fn failed_job_stops_polling_without_fetch() {
    let (state, _) = tick(running_job());
    let (state, effects) = status(state, "failed");

    assert_eq!(effects, vec![Effect::StopPolling]);
    let view = state.view();
    assert_eq!(view.status_label, "failed");
    assert!(view.settled);
    assert!(view.submit_enabled);
}

#[test]
fn unknown_status_keeps_polling() {
    let (state, _) = tick(running_job());
    let (state, effects) = status(state, "scheduled");

    assert!(effects.is_empty());
    let view = state.view();
    assert_eq!(view.status, JobStatus::Other("scheduled".to_string()));
    assert_eq!(view.status_label, "scheduled");
    assert!(view.polling);
    assert!(!view.submit_enabled);
}
