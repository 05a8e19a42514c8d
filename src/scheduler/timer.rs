//! Periodic trigger task.

use std::time::Duration;

use log::debug;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use super::ReconciliationScheduler;

/// A running timer task. Cancelling stops future ticks only; a pass the
/// task is already executing finishes.
pub(super) struct TimerHandle {
    cancel: CancellationToken,
    warmup_until: Option<Instant>,
    _task: JoinHandle<()>,
}

impl TimerHandle {
    pub(super) fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Time left before the warm-up pass, if it has not fired yet.
    pub(super) fn remaining_warmup(&self) -> Option<Duration> {
        self.warmup_until
            .map(|deadline| deadline.saturating_duration_since(Instant::now()))
            .filter(|remaining| !remaining.is_zero())
    }
}

/// Spawns a task that calls `scheduler.start()` every `interval`.
///
/// With a `warmup`, one pass runs after the warm-up delay and the periodic
/// ticks follow from there; without one, the first tick is one interval away.
pub(super) fn spawn(
    scheduler: ReconciliationScheduler,
    interval: Duration,
    warmup: Option<Duration>,
) -> TimerHandle {
    let cancel = CancellationToken::new();
    let token = cancel.clone();
    let warmup_until = warmup.map(|delay| Instant::now() + delay);

    let task = tokio::spawn(async move {
        if let Some(deadline) = warmup_until {
            tokio::select! {
                biased;
                _ = token.cancelled() => return,
                _ = tokio::time::sleep_until(deadline) => {}
            }
            scheduler.start().await;
        }

        let mut ticker = interval_at(Instant::now() + interval, interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;
                _ = token.cancelled() => break,
                _ = ticker.tick() => {}
            }
            scheduler.start().await;
        }
        debug!("Reconciliation timer stopped");
    });

    TimerHandle {
        cancel,
        warmup_until,
        _task: task,
    }
}
