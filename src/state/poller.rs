//! Fixed-interval refresh task
//!
//! A `Poller` owns one spawned task that calls a tick function every period.
//! Each tick is awaited before the next one is scheduled, so ticks never
//! overlap even when a refresh takes longer than the period. The task is
//! aborted on `stop()` and on drop.

use std::future::Future;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

#[derive(Debug)]
pub struct Poller {
    label: String,
    period: Duration,
    handle: Option<JoinHandle<()>>,
}

impl Poller {
    pub fn new(label: impl Into<String>, period: Duration) -> Self {
        Self {
            label: label.into(),
            period,
            handle: None,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Start ticking; the first tick fires one period from now
    ///
    /// `tick` returns `None` when its target is gone, which ends the task.
    /// A zero period starts nothing.
    pub fn start<F, Fut>(&mut self, mut tick: F)
    where
        F: FnMut() -> Option<Fut> + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        if self.is_running() {
            warn!(poller = %self.label, "Poller is already running");
            return;
        }
        if self.period.is_zero() {
            warn!(poller = %self.label, "Refusing to poll with a zero period");
            return;
        }

        let period = self.period;
        let label = self.label.clone();

        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                interval.tick().await;
                match tick() {
                    Some(work) => work.await,
                    None => {
                        debug!(poller = %label, "Poll target dropped, stopping");
                        break;
                    }
                }
            }
        });

        self.handle = Some(handle);
        info!(poller = %self.label, period_ms = self.period.as_millis() as u64, "Started polling");
    }

    /// Stop ticking; a tick in progress is cancelled at its next await point
    pub fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
            info!(poller = %self.label, "Stopped polling");
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().map(|h| !h.is_finished()).unwrap_or(false)
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        self.stop();
    }
}
