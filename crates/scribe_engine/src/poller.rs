use std::time::Duration;

use scribe_logging::{scribe_debug, scribe_info};
use tokio::sync::mpsc::UnboundedSender;

use crate::schedule::IntervalScheduler;
use crate::EngineEvent;

/// Poll timer for one job at a time. Each tick is reported as `EngineEvent::PollTick`.
pub struct StatusPoller {
    scheduler: IntervalScheduler,
    job_id: Option<String>,
}

impl StatusPoller {
    pub fn new(period: Duration) -> Self {
        Self {
            scheduler: IntervalScheduler::new(period),
            job_id: None,
        }
    }

    /// Starts ticking for `job_id`, replacing any timer that was running.
    pub fn start(&mut self, job_id: String, events: UnboundedSender<EngineEvent>) {
        scribe_info!(
            "Polling job {} every {} ms",
            job_id,
            self.scheduler.period().as_millis()
        );
        let tick_job = job_id.clone();
        self.scheduler.reconfigure(false, move || {
            scribe_debug!("Poll tick for job {}", tick_job);
            let _ = events.send(EngineEvent::PollTick {
                job_id: tick_job.clone(),
            });
        });
        self.job_id = Some(job_id);
    }

    pub fn stop(&mut self) {
        if let Some(job_id) = self.job_id.take() {
            scribe_info!("Stopped polling job {}", job_id);
        }
        self.scheduler.cancel();
    }

    pub fn current_job(&self) -> Option<&str> {
        self.job_id.as_deref()
    }

    pub fn is_running(&self) -> bool {
        self.scheduler.is_active()
    }
}
