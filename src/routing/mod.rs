//! Route table.
//!
//! # Data Flow
//! ```text
//! (method, path)
//!     → /string/* → nested router → uppercase | count
//!     → /fib/*    → nested router → fib
//!     → /headers, /ip (exact)
//!     → Transport → Endpoint → decorated service
//! ```
//!
//! # Design Decisions
//! - Built once at startup, immutable afterwards
//! - Prefix routes own an inner router resolving the suffix
//! - Each route is a `Transport` mounted as a tower service, so the table holds
//!   no per-request state of its own

use axum::routing::{get_service, post_service};
use axum::Router;

use crate::endpoint::header::make_header_endpoint;
use crate::endpoint::ip::make_ip_endpoint;
use crate::endpoint::sequence::make_fib_endpoint;
use crate::endpoint::string::{make_count_endpoint, make_uppercase_endpoint};
use crate::service::Services;
use crate::transport::{Limits, Transport};

/// Every domain route, bound to the given services.
pub fn routes<S>(services: &Services, limits: Limits) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new()
        .nest("/string", string_routes(services, limits))
        .nest("/fib", fib_routes(services, limits))
        .route(
            "/headers",
            get_service(Transport::new(make_header_endpoint(services.header.clone())))
                .post_service(Transport::new(make_header_endpoint(services.header.clone()))),
        )
        .route(
            "/ip",
            get_service(Transport::new(make_ip_endpoint(services.ip.clone()))),
        )
}

fn string_routes<S>(services: &Services, limits: Limits) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    let uppercase = Transport::new(make_uppercase_endpoint(services.string.clone()))
        .with_limits(limits);
    let count = Transport::new(make_count_endpoint(services.string.clone()))
        .with_limits(limits);

    Router::new()
        .route("/uppercase", post_service(uppercase))
        .route("/count", post_service(count))
}

fn fib_routes<S>(services: &Services, limits: Limits) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    let fib = Transport::new(make_fib_endpoint(services.sequence.clone())).with_limits(limits);
    Router::new().route("/{n}", get_service(fib))
}
