use crate::{
    polling_should_stop, AppState, Effect, FailureKind, JobStatus, Msg, RemoteJob, SubmissionState,
};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let mut effects = match msg {
        Msg::FileSelected(file) => {
            state.select_file(file);
            Vec::new()
        }
        Msg::SubmitClicked => {
            // One job per client: a click while a job is being submitted or processed is dropped.
            if state.submission() != SubmissionState::Idle {
                return (state, Vec::new());
            }
            match state.submittable_file().cloned() {
                Some(file) => {
                    state.begin_submission();
                    vec![Effect::SubmitJob { file }]
                }
                None => {
                    state.record_failure(
                        FailureKind::Submission,
                        "no media file selected".to_string(),
                    );
                    Vec::new()
                }
            }
        }
        Msg::SubmitSucceeded {
            job_id,
            conversation_id,
        } => {
            if state.submission() == SubmissionState::InFlight {
                state.accept_submission(RemoteJob {
                    job_id,
                    conversation_id,
                });
            }
            Vec::new()
        }
        Msg::SubmitFailed { message } => {
            if state.submission() == SubmissionState::InFlight {
                state.reject_submission(message);
            }
            Vec::new()
        }
        Msg::PollTick { job_id } => {
            if state.is_polling() && state.is_current_job(&job_id) && state.try_begin_status_query()
            {
                vec![Effect::QueryStatus { job_id }]
            } else {
                Vec::new()
            }
        }
        Msg::StatusReceived { job_id, status } => {
            if !state.is_current_job(&job_id) {
                return (state, Vec::new());
            }
            state.finish_status_query();
            if state.status().is_terminal() {
                Vec::new()
            } else {
                let previous = state.replace_status(JobStatus::from_remote(&status));
                completion_reaction(&mut state, &previous)
            }
        }
        Msg::StatusQueryFailed { job_id, .. } => {
            // Not surfaced: status stays as is and the next tick retries.
            if state.is_current_job(&job_id) {
                state.finish_status_query();
            }
            Vec::new()
        }
        Msg::TranscriptReceived {
            conversation_id,
            messages,
        } => {
            if state.is_current_conversation(&conversation_id) {
                state.replace_messages(messages);
            }
            Vec::new()
        }
        Msg::TranscriptFailed {
            conversation_id,
            message,
        } => {
            if state.is_current_conversation(&conversation_id) {
                state.fail_transcript_fetch(message);
            }
            Vec::new()
        }
        Msg::RefetchTranscriptClicked => {
            if *state.status() == JobStatus::Completed && !state.is_transcript_in_flight() {
                fetch_transcript(&mut state)
            } else {
                Vec::new()
            }
        }
    };

    reconcile_polling(&mut state, &mut effects);
    (state, effects)
}

/// Fires on the transition into `completed` only, never on a repeated observation.
fn completion_reaction(state: &mut AppState, previous: &JobStatus) -> Vec<Effect> {
    if *previous != JobStatus::Completed && *state.status() == JobStatus::Completed {
        fetch_transcript(state)
    } else {
        Vec::new()
    }
}

fn fetch_transcript(state: &mut AppState) -> Vec<Effect> {
    match state.job().map(|job| job.conversation_id.clone()) {
        Some(conversation_id) => {
            state.begin_transcript_fetch();
            vec![Effect::FetchTranscript { conversation_id }]
        }
        None => Vec::new(),
    }
}

/// Starts or stops the poll timer when the stop condition flips.
fn reconcile_polling(state: &mut AppState, effects: &mut Vec<Effect>) {
    let wanted = match state.job() {
        Some(job) if !polling_should_stop(state.status(), Some(job)) => Some(job.job_id.clone()),
        _ => None,
    };

    match (wanted, state.is_polling()) {
        (Some(job_id), false) => {
            state.set_polling(true);
            effects.push(Effect::StartPolling { job_id });
        }
        (None, true) => {
            state.set_polling(false);
            effects.push(Effect::StopPolling);
        }
        _ => {}
    }
}
