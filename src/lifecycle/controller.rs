//! Lifecycle controller: bind, serve, and bounded graceful shutdown.

use std::future::Future;
use std::io;
use std::time::Duration;

use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinError;

use super::{InFlight, ServerState, Shutdown};

/// Fatal lifecycle failures. Each one makes the process exit non-zero.
#[derive(Debug, thiserror::Error)]
pub enum LifecycleError {
    #[error("failed to bind {address}: {source}")]
    Bind { address: String, source: io::Error },

    #[error("serve loop failed: {0}")]
    Serve(#[source] io::Error),

    #[error("graceful shutdown exceeded {deadline:?} with {in_flight} request(s) in flight")]
    ShutdownTimeout { deadline: Duration, in_flight: u64 },

    #[error("server task failed: {0}")]
    Task(#[from] JoinError),
}

/// First message on the completion channel wins.
enum Completion {
    Served(io::Result<()>),
    Signal(String),
}

/// Drives one server through `Starting → Serving → ShuttingDown → Stopped`.
pub struct Controller {
    state: watch::Sender<ServerState>,
    shutdown_timeout: Duration,
    shutdown: Shutdown,
    in_flight: InFlight,
}

impl Controller {
    pub fn new(shutdown_timeout: Duration) -> Self {
        let (state, _) = watch::channel(ServerState::Starting);
        Self {
            state,
            shutdown_timeout,
            shutdown: Shutdown::new(),
            in_flight: InFlight::new(),
        }
    }

    /// Subscribe to state changes. Readiness probes hold one of these.
    pub fn state(&self) -> watch::Receiver<ServerState> {
        self.state.subscribe()
    }

    /// Tracker shared with the in-flight middleware.
    pub fn in_flight(&self) -> InFlight {
        self.in_flight.clone()
    }

    fn transition(&self, to: ServerState) {
        let from = self.state.send_replace(to);
        if from != to {
            tracing::info!(%from, %to, "server state changed");
        }
    }

    /// Bind the listening socket: `Serving` on success, `Stopped` on failure.
    pub async fn bind(&self, address: &str) -> Result<TcpListener, LifecycleError> {
        match TcpListener::bind(address).await {
            Ok(listener) => {
                if let Ok(local) = listener.local_addr() {
                    tracing::info!(address = %local, "Listening for connections");
                }
                self.transition(ServerState::Serving);
                Ok(listener)
            }
            Err(source) => {
                tracing::error!(address, error = %source, "Failed to bind listener");
                self.transition(ServerState::Stopped);
                Err(LifecycleError::Bind {
                    address: address.to_string(),
                    source,
                })
            }
        }
    }

    /// Serve `app` until the serve loop ends or `signal` resolves, then shut
    /// down gracefully within the configured deadline.
    ///
    /// `signal` yields the cause of termination, e.g. `"SIGTERM"`.
    pub async fn serve<F>(
        &self,
        listener: TcpListener,
        app: Router,
        signal: F,
    ) -> Result<(), LifecycleError>
    where
        F: Future<Output = String> + Send + 'static,
    {
        let (done_tx, mut done_rx) = mpsc::channel(2);

        let notified = self.shutdown.notified();
        let served = done_tx.clone();
        let mut server = tokio::spawn(async move {
            let result = axum::serve(listener, app)
                .with_graceful_shutdown(notified)
                .await;
            let _ = served.send(Completion::Served(result)).await;
        });

        let signalled = done_tx;
        let listener_task = tokio::spawn(async move {
            let cause = signal.await;
            let _ = signalled.send(Completion::Signal(cause)).await;
        });

        let serve_error = match done_rx.recv().await {
            Some(Completion::Signal(cause)) => {
                tracing::warn!(%cause, in_flight = self.in_flight.count(), "terminated");
                None
            }
            Some(Completion::Served(Ok(()))) => {
                tracing::warn!(cause = "serve loop closed", "terminated");
                None
            }
            Some(Completion::Served(Err(error))) => {
                tracing::error!(%error, "terminated");
                Some(error)
            }
            None => {
                tracing::warn!(cause = "no producer left", "terminated");
                None
            }
        };
        listener_task.abort();

        self.transition(ServerState::ShuttingDown);
        self.shutdown.trigger();

        let drained = tokio::time::timeout(self.shutdown_timeout, &mut server).await;
        let outcome = match drained {
            Err(_) => {
                server.abort();
                let in_flight = self.in_flight.count();
                tracing::error!(
                    deadline = ?self.shutdown_timeout,
                    in_flight,
                    "Graceful shutdown deadline exceeded"
                );
                Err(LifecycleError::ShutdownTimeout {
                    deadline: self.shutdown_timeout,
                    in_flight,
                })
            }
            Ok(Err(join_error)) => Err(LifecycleError::Task(join_error)),
            Ok(Ok(())) => match serve_error {
                Some(error) => Err(LifecycleError::Serve(error)),
                None => {
                    tracing::info!("Shutdown complete");
                    Ok(())
                }
            },
        };

        self.transition(ServerState::Stopped);
        outcome
    }
}
