use chrono::Utc;
use cron::Schedule;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::{Duration, sleep};

use super::overdue::OverdueNotifier;

/// Runs the overdue scan at every upcoming time of `schedule` until a value
/// arrives on `shutdown` (or its sender is dropped).
pub fn spawn_overdue_scheduler(
    notifier: OverdueNotifier,
    schedule: Schedule,
    mut shutdown: broadcast::Receiver<()>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            let Some(next) = schedule.upcoming(Utc).next() else {
                tracing::warn!("Overdue schedule has no upcoming runs, stopping");
                return;
            };

            let wait = (next - Utc::now())
                .to_std()
                .unwrap_or(Duration::ZERO)
                .max(Duration::from_millis(100));
            tracing::debug!(next_run = %next, "Overdue scan scheduled");

            tokio::select! {
                _ = sleep(wait) => {
                    if let Err(err) = notifier.run(Utc::now()).await {
                        tracing::error!(error = ?err.error, "Overdue scan failed");
                    }
                }
                _ = shutdown.recv() => {
                    tracing::info!("Overdue scheduler shutting down");
                    return;
                }
            }
        }
    })
}
