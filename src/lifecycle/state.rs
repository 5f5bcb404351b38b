//! Server state machine.

use std::fmt;

/// `Starting → Serving → ShuttingDown → Stopped`, or `Starting → Stopped`
/// when the listener cannot be bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ServerState {
    /// Configured but not yet listening.
    #[default]
    Starting,
    /// Listening and accepting requests.
    Serving,
    /// No longer accepting; in-flight requests are draining.
    ShuttingDown,
    /// Terminal.
    Stopped,
}

impl ServerState {
    /// Whether readiness probes should report healthy.
    pub fn is_ready(self) -> bool {
        self == ServerState::Serving
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ServerState::Starting => "starting",
            ServerState::Serving => "serving",
            ServerState::ShuttingDown => "shutting_down",
            ServerState::Stopped => "stopped",
        }
    }
}

impl fmt::Display for ServerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
