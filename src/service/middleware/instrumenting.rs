//! Instrumenting middleware: call counts and latency per method and outcome.

use std::task::{Context, Poll};
use std::time::Instant;

use futures_util::future::BoxFuture;
use tower::{Layer, Service};

use crate::observability::metrics::ServiceMetrics;
use crate::service::Call;

/// Tower layer that counts calls and records their latency, labelled by
/// method and by whether the call failed.
#[derive(Clone)]
pub struct InstrumentingLayer {
    metrics: ServiceMetrics,
}

impl InstrumentingLayer {
    pub fn new(metrics: ServiceMetrics) -> Self {
        Self { metrics }
    }
}

impl<S> Layer<S> for InstrumentingLayer {
    type Service = Instrumenting<S>;

    fn layer(&self, inner: S) -> Self::Service {
        Instrumenting {
            inner,
            metrics: self.metrics.clone(),
        }
    }
}

#[derive(Clone)]
pub struct Instrumenting<S> {
    inner: S,
    metrics: ServiceMetrics,
}

impl<S, R> Service<R> for Instrumenting<S>
where
    R: Call,
    S: Service<R, Response = R::Output>,
    S::Error: Send + 'static,
    S::Future: Send + 'static,
{
    type Response = R::Output;
    type Error = S::Error;
    type Future = BoxFuture<'static, Result<R::Output, S::Error>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: R) -> Self::Future {
        // Started before the inner call: synchronous services do their work in `call`.
        let begin = Instant::now();
        let metrics = self.metrics.clone();
        let fut = self.inner.call(req);

        Box::pin(async move {
            let result = fut.await;
            metrics.observe(R::METHOD, result.is_err(), begin.elapsed());
            result
        })
    }
}
