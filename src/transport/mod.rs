//! HTTP transport: decode a request, run the endpoint, encode the response.
//!
//! [`Transport`] is a `tower::Service` over raw HTTP requests, so each route
//! is mounted with `Router::route_service`. Decode failures short-circuit
//! with a 400 before the endpoint (and therefore the domain service) runs.

pub mod codec;
pub mod error;

use std::convert::Infallible;
use std::task::{Context, Poll};

use axum::body::Body;
use axum::http::Request;
use axum::response::{IntoResponse, Response};
use futures_util::future::BoxFuture;
use tower::Service;

use crate::config::ServerConfig;
use crate::endpoint::Endpoint;

pub use codec::{Decode, Encode};
pub use error::TransportError;

/// Default request body limit (1 MiB).
pub const DEFAULT_BODY_LIMIT: usize = 1024 * 1024;

/// Default largest accepted Fibonacci index.
pub const DEFAULT_MAX_FIB_N: u64 = 100_000;

/// Bounds enforced while decoding, before any domain work starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    /// Request body bytes read before decoding fails.
    pub body_bytes: usize,
    /// Largest `n` accepted on `/fib/{n}`.
    pub max_fib_n: u64,
}

impl Limits {
    pub fn from_config(config: &ServerConfig) -> Self {
        Self {
            body_bytes: config.listener.max_body_bytes,
            max_fib_n: config.sequence.max_n,
        }
    }
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            body_bytes: DEFAULT_BODY_LIMIT,
            max_fib_n: DEFAULT_MAX_FIB_N,
        }
    }
}

pub struct Transport<Req, Resp> {
    endpoint: Endpoint<Req, Resp>,
    limits: Limits,
}

// Manual impl: `Req`/`Resp` need not be `Clone` for the shared endpoint to be.
impl<Req, Resp> Clone for Transport<Req, Resp> {
    fn clone(&self) -> Self {
        Self {
            endpoint: self.endpoint.clone(),
            limits: self.limits,
        }
    }
}

impl<Req, Resp> Transport<Req, Resp> {
    pub fn new(endpoint: Endpoint<Req, Resp>) -> Self {
        Self {
            endpoint,
            limits: Limits::default(),
        }
    }

    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }
}

impl<Req, Resp> Service<Request<Body>> for Transport<Req, Resp>
where
    Req: Decode,
    Resp: Encode,
{
    type Response = Response;
    type Error = Infallible;
    type Future = BoxFuture<'static, Result<Response, Infallible>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let endpoint = self.endpoint.clone();
        let decoding = Req::decode(req, self.limits);

        Box::pin(async move {
            let request = match decoding.await {
                Ok(request) => request,
                Err(e) => return Ok(e.into_response()),
            };
            let response = endpoint(request).await;
            Ok(response.encode().unwrap_or_else(IntoResponse::into_response))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::endpoint::string::{make_count_endpoint, make_uppercase_endpoint};
    use crate::service::StringService;
    use axum::http::StatusCode;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    fn post(body: &'static str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .header("content-type", "application/json")
            .body(Body::from(body))
            .unwrap()
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn domain_errors_stay_in_the_response_body() {
        let transport = Transport::new(make_uppercase_endpoint(StringService));
        let response = transport.oneshot(post(r#"{"s":""}"#)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await,
            serde_json::json!({ "v": "", "err": "empty string" })
        );
    }

    #[tokio::test]
    async fn malformed_body_is_rejected() {
        let transport = Transport::new(make_count_endpoint(StringService));
        let response = transport.oneshot(post("not json")).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(body_json(response).await["error"].is_string());
    }

    #[tokio::test]
    async fn body_limit_applies() {
        let limits = Limits {
            body_bytes: 4,
            ..Limits::default()
        };
        let transport = Transport::new(make_count_endpoint(StringService)).with_limits(limits);
        let response = transport.oneshot(post(r#"{"s":"hello"}"#)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn limits_follow_the_configuration() {
        let mut config = ServerConfig::default();
        config.listener.max_body_bytes = 64;
        config.sequence.max_n = 500;
        assert_eq!(
            Limits::from_config(&config),
            Limits {
                body_bytes: 64,
                max_fib_n: 500
            }
        );
        assert_eq!(Limits::from_config(&ServerConfig::default()), Limits::default());
    }
}
