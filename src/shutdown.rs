use tokio_util::sync::CancellationToken;

/// Returns a token that is cancelled when the process receives SIGINT
/// or SIGTERM. Long-running tasks watch the token and drain gracefully.
pub fn shutdown_token() -> CancellationToken {
    let token = CancellationToken::new();
    let signals = token.clone();

    tokio::spawn(async move {
        let ctrl_c = async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for SIGINT");
                std::future::pending::<()>().await;
            }
        };

        #[cfg(unix)]
        let terminate = async {
            use tokio::signal::unix::{signal, SignalKind};
            match signal(SignalKind::terminate()) {
                Ok(mut sigterm) => {
                    sigterm.recv().await;
                }
                Err(e) => {
                    tracing::error!(error = %e, "Failed to install SIGTERM handler");
                    std::future::pending::<()>().await;
                }
            }
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            _ = ctrl_c => tracing::info!("Received SIGINT, initiating graceful shutdown"),
            _ = terminate => tracing::info!("Received SIGTERM, initiating graceful shutdown"),
        }

        signals.cancel();
    });

    token
}
