use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::config::ServerConfig;
use crate::http;
use crate::queue::{Queue, Sweeper};

/// HTTP front end plus the background expiry sweeper, sharing one queue.
pub struct Server {
    config: ServerConfig,
}

impl Server {
    pub fn new(config: ServerConfig) -> Self {
        Self { config }
    }

    /// Run until `shutdown` is cancelled.
    ///
    /// Spawns the expiry sweeper on a child token, then serves HTTP
    /// until the token fires. The sweeper is joined before returning,
    /// so a sweep in flight is never cut short.
    pub async fn run(self, shutdown: CancellationToken) -> Result<(), Box<dyn std::error::Error>> {
        let queue = Arc::new(Queue::new(self.config.queue.clone()));

        let sweeper = Sweeper::new(
            queue.clone(),
            Duration::from_secs(self.config.queue.sweep_interval_secs),
            shutdown.child_token(),
        );
        let sweeper_handle = tokio::spawn(async move {
            sweeper.run().await;
        });

        let app = http::router(queue);

        tracing::info!(addr = %self.config.listen_addr, "Starting queue server");
        let listener = tokio::net::TcpListener::bind(self.config.listen_addr).await?;

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown.cancelled_owned())
            .await?;

        if let Err(e) = sweeper_handle.await {
            tracing::error!(error = %e, "Sweeper task failed");
        }

        tracing::info!("Queue server stopped");
        Ok(())
    }
}
