//! Periodic booking expiry on a tokio runtime.
//!
//! The sweeper calls [`ParkingLot::sweep_expired`], which takes the same
//! store mutex as request-driven mutations.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Notify;
use tokio::task::JoinHandle;

use crate::runtime::ParkingLot;
use crate::util::clock::now_ms;

/// Handle to a running expiry sweeper.
pub struct SweeperHandle {
    stop: Arc<Notify>,
    task: JoinHandle<()>,
}

impl SweeperHandle {
    /// Stop the sweeper and wait for it to exit.
    pub async fn shutdown(self) {
        self.stop.notify_one();
        if let Err(e) = self.task.await {
            tracing::warn!(error = %e, "expiry sweeper ended abnormally");
        }
    }

    /// Whether the task has exited.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

/// Spawn a task on the current tokio runtime that sweeps every `period`.
/// The first sweep runs immediately. Periods below one millisecond are
/// raised to one millisecond.
pub fn spawn_expiry_sweeper(lot: Arc<ParkingLot>, period: Duration) -> SweeperHandle {
    let period = period.max(Duration::from_millis(1));
    let stop = Arc::new(Notify::new());
    let signal = Arc::clone(&stop);
    let task = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        tracing::info!(?period, "expiry sweeper started");
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    match lot.sweep_expired(now_ms()) {
                        Ok(freed) if !freed.is_empty() => {
                            tracing::debug!(count = freed.len(), "sweep released slots");
                        }
                        Ok(_) => {}
                        Err(e) => tracing::error!(error = %e, "expiry sweep failed"),
                    }
                }
                () = signal.notified() => break,
            }
        }
        tracing::info!("expiry sweeper stopped");
    });
    SweeperHandle { stop, task }
}
