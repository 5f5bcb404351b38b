//! Domain services.
//!
//! # Data Flow
//! ```text
//! endpoint adapter
//!     → Instrumenting (counter + latency histogram per method/error)
//!     → Logging (one structured event per call)
//!     → base service (string.rs, sequence.rs, header.rs, ip.rs)
//! ```
//!
//! # Design Decisions
//! - Every operation is a request type implementing [`Call`]; a service is a
//!   `tower::Service` for each request type it supports
//! - Middleware is written once, generically over [`Call`], and therefore wraps
//!   every capability of the inner service
//! - Base services are stateless; per-call state lives in the call

pub mod header;
pub mod ip;
pub mod middleware;
pub mod sequence;
pub mod string;

use metrics::Recorder;

use crate::config::IpLookupConfig;

pub use header::{DumpHeaders, HeaderService};
pub use ip::{IpService, LookupIp};
pub use middleware::{decorate, Stack};
pub use sequence::{Fibonacci, SequenceService};
pub use string::{Count, StringService, Uppercase};

/// A single named operation on a service.
///
/// The request type carries the operation's input and names its output type,
/// which lets middleware label, log and measure any operation uniformly.
pub trait Call: Send + 'static {
    /// Method label used in logs and metrics.
    const METHOD: &'static str;

    /// Successful result of the operation.
    type Output: Send + 'static;

    /// Input rendered for the access log, if it is safe to log.
    fn input_field(&self) -> Option<String> {
        None
    }

    /// Output rendered for the access log, if it is safe to log.
    fn output_field(_output: &Self::Output) -> Option<String> {
        None
    }
}

/// Static description of a base service's capability set.
pub trait Capabilities {
    /// Service name, used as the metrics subsystem and log span name.
    const NAME: &'static str;

    /// Method labels of every [`Call`] the service supports.
    const METHODS: &'static [&'static str];
}

/// Failure reported by a domain operation.
#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    #[error("empty string")]
    EmptyString,
    #[error("ip lookup failed: {0}")]
    Lookup(#[from] reqwest::Error),
    #[error("invalid ip lookup url {0:?}")]
    InvalidUrl(String),
}

/// Every service, decorated and ready to be bound to routes.
#[derive(Clone)]
pub struct Services {
    pub string: Stack<StringService>,
    pub sequence: Stack<SequenceService>,
    pub header: Stack<HeaderService>,
    pub ip: Stack<IpService>,
}

impl Services {
    /// Build the base services and decorate each with logging and metrics
    /// registered against `recorder`.
    pub fn build(ip_lookup: &IpLookupConfig, recorder: &dyn Recorder) -> Result<Self, DomainError> {
        Ok(Self {
            string: decorate(StringService, recorder),
            sequence: decorate(SequenceService, recorder),
            header: decorate(HeaderService, recorder),
            ip: decorate(IpService::new(ip_lookup)?, recorder),
        })
    }
}
