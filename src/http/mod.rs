//! HTTP application assembly.
//!
//! # Data Flow
//! ```text
//! TCP connection (lifecycle::Controller)
//!     → request id, access log, CORS headers, content type, timeout
//!     → in-flight tracking
//!     → OPTIONS preflight (registered paths only)
//!     → domain routes (routing) | /metrics | /live | /ready
//!     → 404 fallback
//! ```

pub mod middleware;
pub mod server;

pub use server::{build_app, AppState};
