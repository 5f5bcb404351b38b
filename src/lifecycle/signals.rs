//! OS termination signals.

use tokio::signal;

/// Resolves with the name of the first termination signal received:
/// `SIGINT` (Ctrl+C) or, on unix, `SIGTERM`.
///
/// A handler that cannot be installed never fires rather than triggering
/// shutdown.
pub async fn termination() -> String {
    let interrupt = async {
        if let Err(error) = signal::ctrl_c().await {
            tracing::warn!(%error, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(error) => {
                tracing::warn!(%error, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = interrupt => "SIGINT".to_string(),
        () = terminate => "SIGTERM".to_string(),
    }
}
