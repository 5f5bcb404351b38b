//! Server lifecycle.
//!
//! # Data Flow
//! ```text
//! Controller::bind   Starting → Serving          (or → Stopped on bind failure)
//! Controller::serve  serve loop ─┐
//!                    signal ─────┴→ first completion → ShuttingDown
//!                    → Shutdown::trigger → drain (bounded) → Stopped
//! ```
//!
//! # Design Decisions
//! - The serve loop and the signal listener race to one completion channel;
//!   the loser is simply ignored
//! - Draining is cooperative: no request is aborted before the deadline
//! - A missed deadline is an error, so the process exits non-zero

pub mod controller;
pub mod in_flight;
pub mod shutdown;
pub mod signals;
pub mod state;

pub use controller::{Controller, LifecycleError};
pub use in_flight::{InFlight, InFlightGuard};
pub use shutdown::Shutdown;
pub use state::ServerState;
