use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use super::Queue;

/// Periodic task that returns expired leases to the pending store.
pub struct Sweeper {
    queue: Arc<Queue>,
    interval: Duration,
    shutdown: CancellationToken,
}

impl Sweeper {
    pub fn new(queue: Arc<Queue>, interval: Duration, shutdown: CancellationToken) -> Self {
        Self {
            queue,
            interval,
            shutdown,
        }
    }

    /// Run until the shutdown token is cancelled. Cancellation lands
    /// between ticks; a sweep already in flight finishes first.
    pub async fn run(self) {
        tracing::debug!(interval_ms = self.interval.as_millis() as u64, "Expiry sweeper started");
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = self.shutdown.cancelled() => break,
                _ = ticker.tick() => {
                    let expired = self.queue.sweep_expired().await;
                    if expired > 0 {
                        tracing::info!(expired, "Requeued expired leases");
                    }
                }
            }
        }

        tracing::debug!("Expiry sweeper stopped");
    }
}
