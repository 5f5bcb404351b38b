//! Service middleware.
//!
//! - [`logging`]: one structured log event per call
//! - [`instrumenting`]: call counter and latency histogram per method/error
//!
//! Both layers are generic over the request type, so a wrapped service keeps
//! every capability of the service it wraps. Neither layer alters arguments,
//! results or errors.

pub mod instrumenting;
pub mod logging;

use metrics::Recorder;
use tower::ServiceBuilder;

use super::Capabilities;
use crate::observability::metrics::ServiceMetrics;

pub use instrumenting::{Instrumenting, InstrumentingLayer};
pub use logging::{Logging, LoggingLayer};

/// A base service with logging innermost and instrumenting outermost.
pub type Stack<S> = Instrumenting<Logging<S>>;

/// Decorate a base service.
///
/// Layer order (outermost to innermost):
/// 1. `InstrumentingLayer` -- latency includes the logging layer's cost
/// 2. `LoggingLayer` -- observes the raw call latency
///
/// The order is fixed so latency metrics stay comparable across services.
pub fn decorate<S: Capabilities>(service: S, recorder: &dyn Recorder) -> Stack<S> {
    let metrics = ServiceMetrics::register(recorder, S::NAME, S::METHODS);

    ServiceBuilder::new()
        .layer(InstrumentingLayer::new(metrics))
        .layer(LoggingLayer::new(S::NAME))
        .service(service)
}
