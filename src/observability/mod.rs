//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! service middleware, lifecycle, tower-http TraceLayer
//!     → logging.rs (tracing-subscriber: EnvFilter + JSON or pretty output)
//! service middleware (Instrumenting)
//!     → metrics.rs (Prometheus recorder, rendered on GET /metrics)
//! ```
//!
//! # Design Decisions
//! - Structured logging (JSON) for machine parsing, pretty for development
//! - Request ID flows from tower-http into every access log span
//! - The metrics recorder is injected, never global, so tests stay isolated

pub mod logging;
pub mod metrics;
