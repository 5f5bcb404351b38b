//! `/fib/{n}` endpoint.

use std::convert::Infallible;

use num_bigint::BigUint;
use tower::{Service, ServiceExt};

use super::{endpoint, Endpoint};
use crate::service::Fibonacci;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FibRequest {
    pub n: u64,
}

/// Serialized as a bare JSON number of arbitrary length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FibResponse(pub BigUint);

pub fn make_fib_endpoint<S>(service: S) -> Endpoint<FibRequest, FibResponse>
where
    S: Service<Fibonacci, Response = BigUint, Error = Infallible> + Clone + Send + Sync + 'static,
    S::Future: Send,
{
    endpoint(move |req: FibRequest| {
        let service = service.clone();
        async move {
            let value = service
                .oneshot(Fibonacci { n: req.n })
                .await
                .unwrap_or_else(|never| match never {});
            FibResponse(value)
        }
    })
}
