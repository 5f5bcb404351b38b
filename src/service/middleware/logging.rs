//! Logging middleware: one structured event per service call.

use std::fmt::Display;
use std::task::{Context, Poll};
use std::time::Instant;

use futures_util::future::BoxFuture;
use tower::{Layer, Service};
use tracing::Span;

use crate::service::Call;

/// Tower layer that logs method, input, output, duration and error of every call.
///
/// Events are emitted inside a span created once per service, so the
/// service name travels with every event without being passed per call.
#[derive(Debug, Clone)]
pub struct LoggingLayer {
    span: Span,
}

impl LoggingLayer {
    pub fn new(service: &'static str) -> Self {
        Self {
            span: tracing::info_span!("service", name = service),
        }
    }
}

impl<S> Layer<S> for LoggingLayer {
    type Service = Logging<S>;

    fn layer(&self, inner: S) -> Self::Service {
        Logging {
            inner,
            span: self.span.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Logging<S> {
    inner: S,
    span: Span,
}

impl<S, R> Service<R> for Logging<S>
where
    R: Call,
    S: Service<R, Response = R::Output>,
    S::Error: Display + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = R::Output;
    type Error = S::Error;
    type Future = BoxFuture<'static, Result<R::Output, S::Error>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: R) -> Self::Future {
        let begin = Instant::now();
        let input = req.input_field();
        let span = self.span.clone();
        let fut = self.inner.call(req);

        Box::pin(async move {
            let result = fut.await;
            let took = begin.elapsed();

            match &result {
                Ok(output) => tracing::info!(
                    parent: &span,
                    method = R::METHOD,
                    input = input.as_deref(),
                    output = R::output_field(output).as_deref(),
                    took = ?took,
                    "service"
                ),
                Err(error) => tracing::info!(
                    parent: &span,
                    method = R::METHOD,
                    input = input.as_deref(),
                    took = ?took,
                    error = %error,
                    "service"
                ),
            }

            result
        })
    }
}
