use std::collections::VecDeque;

use scribe_core::{update, AppState, AppViewModel, MediaFile, Msg};
use scribe_logging::{scribe_debug, scribe_info};

use super::effects::EffectRunner;
use super::ui::render::ViewSink;

/// Single-writer message pump: every state change goes through `update` here.
pub struct Session {
    state: AppState,
    runner: EffectRunner,
    sink: Box<dyn ViewSink>,
}

impl Session {
    pub fn new(runner: EffectRunner, sink: Box<dyn ViewSink>) -> Self {
        Self {
            state: AppState::new(),
            runner,
            sink,
        }
    }

    pub fn view(&self) -> AppViewModel {
        self.state.view()
    }

    pub fn runner_mut(&mut self) -> &mut EffectRunner {
        &mut self.runner
    }

    /// Applies `msg` plus any messages produced synchronously by its effects.
    pub fn dispatch(&mut self, msg: Msg) {
        let mut inbox = VecDeque::from([msg]);
        while let Some(msg) = inbox.pop_front() {
            let before = self.state.status().clone();
            let state = std::mem::take(&mut self.state);
            let (mut state, effects) = update(state, msg);
            let was_dirty = state.consume_dirty();
            self.state = state;

            if was_dirty {
                let view = self.state.view();
                if view.status != before {
                    scribe_info!(
                        "Job status {} -> {}",
                        before.as_str(),
                        view.status.as_str()
                    );
                }
                self.sink.render(&view);
            }
            if !effects.is_empty() {
                scribe_debug!("Running {} effects", effects.len());
            }
            inbox.extend(self.runner.enqueue(effects));
        }
    }

    /// Pumps engine events until no submission, poll or transcript fetch is outstanding.
    pub async fn run_until_settled(&mut self) -> AppViewModel {
        while !self.state.is_settled() {
            match self.runner.next_msg().await {
                Some(msg) => self.dispatch(msg),
                None => break,
            }
        }
        self.state.view()
    }

    /// Selects `file`, submits it and waits for the job and transcript to finish.
    pub async fn transcribe(&mut self, file: MediaFile) -> AppViewModel {
        self.dispatch(Msg::FileSelected(file));
        self.dispatch(Msg::SubmitClicked);
        self.run_until_settled().await
    }

    /// Fetches the transcript of the completed job again.
    pub async fn refetch_transcript(&mut self) -> AppViewModel {
        self.dispatch(Msg::RefetchTranscriptClicked);
        self.run_until_settled().await
    }
}
