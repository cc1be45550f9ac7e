//! Poll Scheduler
//!
//! Two independent repeating timers drive the weather dashboard:
//!
//! ```text
//! every 5 min ─────────────► PollKind::CurrentConditions
//! next :00, then every 60 min ─► PollKind::Forecast
//! ```
//!
//! Timers never fetch anything themselves; they only push a tick into the
//! owning view's channel. Every timer is a [`ScheduledTask`] handle that is
//! aborted on [`PollScheduler::shutdown`] or when dropped.

use std::time::Duration;

use chrono::Local;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval_at, sleep};

use crate::domain::config::PollConfig;
use crate::utils::time::until_next_hour;

/// What a tick asks the owner to refresh
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollKind {
    CurrentConditions,
    Forecast,
}

/// Handle to a spawned repeating timer
pub struct ScheduledTask {
    name: &'static str,
    handle: JoinHandle<()>,
}

impl ScheduledTask {
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Stop the timer; no tick is delivered afterwards
    pub fn cancel(self) {
        tracing::debug!("Cancelling timer: {}", self.name);
        self.handle.abort();
    }
}

impl Drop for ScheduledTask {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

impl std::fmt::Debug for ScheduledTask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScheduledTask")
            .field("name", &self.name)
            .field("finished", &self.is_finished())
            .finish()
    }
}

/// Tick every `period`, first tick one period from now
pub fn spawn_every(
    name: &'static str,
    period: Duration,
    kind: PollKind,
    tx: UnboundedSender<PollKind>,
) -> ScheduledTask {
    tracing::debug!("Spawning timer: {} every {:?}", name, period);
    let handle = tokio::spawn(async move {
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            if tx.send(kind).is_err() {
                break;
            }
        }
        tracing::debug!("Timer finished: {}", name);
    });
    ScheduledTask { name, handle }
}

/// Tick once after `first_delay`, then every `period`
pub fn spawn_aligned(
    name: &'static str,
    first_delay: Duration,
    period: Duration,
    kind: PollKind,
    tx: UnboundedSender<PollKind>,
) -> ScheduledTask {
    tracing::debug!("Spawning timer: {} in {:?}, then every {:?}", name, first_delay, period);
    let handle = tokio::spawn(async move {
        sleep(first_delay).await;
        if tx.send(kind).is_err() {
            return;
        }

        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            if tx.send(kind).is_err() {
                break;
            }
        }
        tracing::debug!("Timer finished: {}", name);
    });
    ScheduledTask { name, handle }
}

/// Both dashboard timers
#[derive(Debug, Default)]
pub struct PollScheduler {
    tasks: Vec<ScheduledTask>,
}

impl PollScheduler {
    /// Start the current-conditions and the hour-aligned forecast timers
    pub fn start(config: &PollConfig, tx: UnboundedSender<PollKind>) -> Self {
        let to_next_hour = until_next_hour(Local::now());
        tracing::info!(
            "Polling: current conditions every {:?}, next forecast fetch in {}s",
            config.current_interval(),
            to_next_hour.as_secs()
        );

        let current = spawn_every(
            "current-conditions",
            config.current_interval(),
            PollKind::CurrentConditions,
            tx.clone(),
        );
        let forecast = spawn_aligned(
            "hourly-forecast",
            to_next_hour,
            config.forecast_interval(),
            PollKind::Forecast,
            tx,
        );

        Self {
            tasks: vec![current, forecast],
        }
    }

    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }

    /// Cancel every timer; call on view exit
    pub fn shutdown(&mut self) {
        for task in self.tasks.drain(..) {
            task.cancel();
        }
    }
}
