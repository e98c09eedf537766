//! Repeating timer used by the status poller.
//!
//! A timer is a tokio task driving a [`tokio::time::Interval`]; the callback runs
//! on that task, so invocations never overlap. Every timer is owned by an
//! [`IntervalHandle`] and stops when the handle is cancelled or dropped.

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

const MIN_PERIOD: Duration = Duration::from_millis(1);

#[derive(Debug)]
pub struct IntervalHandle {
    cancel: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl IntervalHandle {
    fn inert() -> Self {
        Self {
            cancel: CancellationToken::new(),
            task: None,
        }
    }

    /// Stops the timer. Calling this more than once is harmless.
    pub fn cancel(&mut self) {
        self.cancel.cancel();
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }

    pub fn is_active(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }
}

impl Drop for IntervalHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Calls `callback` every `period`, starting one period from now, unless `stop` is set.
///
/// Must be called from within a tokio runtime.
pub fn schedule<F>(period: Duration, stop: bool, mut callback: F) -> IntervalHandle
where
    F: FnMut() + Send + 'static,
{
    if stop {
        return IntervalHandle::inert();
    }

    let period = period.max(MIN_PERIOD);
    let cancel = CancellationToken::new();
    let cancelled = cancel.clone();
    let task = tokio::spawn(async move {
        let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            tokio::select! {
                _ = cancelled.cancelled() => break,
                _ = ticker.tick() => callback(),
            }
        }
    });

    IntervalHandle {
        cancel,
        task: Some(task),
    }
}

/// Owns at most one timer; each reconfiguration releases the previous one first.
#[derive(Debug)]
pub struct IntervalScheduler {
    period: Duration,
    current: Option<IntervalHandle>,
}

impl IntervalScheduler {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            current: None,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn reconfigure<F>(&mut self, stop: bool, callback: F)
    where
        F: FnMut() + Send + 'static,
    {
        self.cancel();
        if !stop {
            self.current = Some(schedule(self.period, false, callback));
        }
    }

    pub fn cancel(&mut self) {
        if let Some(mut handle) = self.current.take() {
            handle.cancel();
        }
    }

    pub fn is_active(&self) -> bool {
        self.current.as_ref().is_some_and(IntervalHandle::is_active)
    }
}
