use std::time::Duration;

use tokio::time::{interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::cycle::runner::dump;
use crate::cycle::Cycle;
use crate::notify::{NotificationFormatter, Notifier};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Running,
    /// Terminal. Reached once the termination token is cancelled.
    Stopped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchedulerReport {
    pub cycles_run: u64,
    pub final_state: SchedulerState,
}

/// Runs one cycle immediately, then one per interval tick, until the
/// termination token is cancelled. Cycles never overlap: the next tick is not
/// awaited until the current cycle has returned.
pub struct Scheduler<C, N> {
    cycle: C,
    notifier: N,
    formatter: NotificationFormatter,
    poll_interval: Duration,
    termination: CancellationToken,
    state: SchedulerState,
    cycles_run: u64,
}

impl<C: Cycle, N: Notifier> Scheduler<C, N> {
    pub fn new(
        cycle: C,
        notifier: N,
        formatter: NotificationFormatter,
        poll_interval: Duration,
        termination: CancellationToken,
    ) -> Self {
        Self {
            cycle,
            notifier,
            formatter,
            poll_interval,
            termination,
            state: SchedulerState::Running,
            cycles_run: 0,
        }
    }

    pub async fn run(mut self) -> SchedulerReport {
        let mut ticker = interval(self.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately, so the initial cycle is not delayed.

        info!(interval_secs = self.poll_interval.as_secs_f64(), "Scheduler started");

        while self.state == SchedulerState::Running {
            let stop = tokio::select! {
                biased;
                _ = self.termination.cancelled() => true,
                _ = ticker.tick() => false,
            };
            if stop {
                self.state = SchedulerState::Stopped;
            } else {
                self.run_once().await;
            }
        }

        info!(cycles = self.cycles_run, "Scheduler stopped");
        SchedulerReport {
            cycles_run: self.cycles_run,
            final_state: self.state,
        }
    }

    async fn run_once(&mut self) {
        self.cycles_run += 1;

        let result = match self.cycle.run_cycle().await {
            Ok(result) => result,
            Err(e) => {
                error!(cycle = self.cycles_run, "Cycle failed, stopping: {e}");
                self.termination.cancel();
                return;
            }
        };

        dump(&result);

        let payload = match self.formatter.format(&result) {
            Ok(payload) => payload,
            Err(e) => {
                warn!(cycle = self.cycles_run, "Skipping notification: {e}");
                return;
            }
        };

        if let Err(e) = self.notifier.deliver(&payload).await {
            warn!(cycle = self.cycles_run, "Notification delivery failed: {e}");
        }
    }
}
