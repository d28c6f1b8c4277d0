//! Polling refresh loop.
//!
//! Ticks on a Tokio interval; the first tick fires immediately so the initial
//! load happens as soon as the loop starts. A failed fetch is recorded in the
//! session and retried on the next tick.

use crate::session::ShelterSession;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Default interval against a remote shelter API.
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(10);

/// Interval used with the simulated source.
pub const SIMULATED_INTERVAL: Duration = Duration::from_secs(3);

/// Handle to a running refresh loop.
///
/// Dropping the handle aborts the task.
pub struct RefreshHandle {
    stop_tx: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl RefreshHandle {
    /// Spawn the loop for `session`, fetching every `period`.
    pub fn spawn(session: ShelterSession, period: Duration) -> Self {
        let (stop_tx, mut stop_rx) = oneshot::channel::<()>();

        let task = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            tracing::debug!("Refresh loop started ({:?})", period);

            loop {
                tokio::select! {
                    biased;
                    _ = &mut stop_rx => break,
                    _ = interval.tick() => {
                        if let Err(e) = session.refresh_now().await {
                            tracing::warn!("Refresh failed: {}", e);
                        }
                    }
                }
            }

            tracing::debug!("Refresh loop stopped");
        });

        Self {
            stop_tx: Some(stop_tx),
            task: Some(task),
        }
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Signal the loop and wait for it to exit.
    pub async fn stop(mut self) {
        if let Some(tx) = self.stop_tx.take() {
            let _ = tx.send(());
        }
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                tracing::warn!("Refresh task ended abnormally: {}", e);
            }
        }
    }
}

impl Drop for RefreshHandle {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
