//! Request decoders and response encoders for every route.

use axum::body::Body;
use axum::extract::{FromRequestParts, RawPathParams};
use axum::http::{header, Request};
use axum::response::{IntoResponse, Response};
use futures_util::future::BoxFuture;
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::{Limits, TransportError};
use crate::endpoint::header::HeaderText;
use crate::endpoint::ip::IpResponse;
use crate::endpoint::sequence::{FibRequest, FibResponse};
use crate::endpoint::string::{CountResponse, StringRequest, UppercaseResponse};

/// Parse an incoming HTTP request into a route's request record.
pub trait Decode: Sized + Send + 'static {
    fn decode(req: Request<Body>, limits: Limits) -> BoxFuture<'static, Result<Self, TransportError>>;
}

/// Serialize a route's response record as HTTP.
pub trait Encode: Send + 'static {
    fn encode(self) -> Result<Response, TransportError>;
}

/// Read the whole body, bounded by `limit`, and parse it as JSON.
pub async fn decode_json_body<T: DeserializeOwned>(
    req: Request<Body>,
    limit: usize,
) -> Result<T, TransportError> {
    let bytes = axum::body::to_bytes(req.into_body(), limit)
        .await
        .map_err(|e| TransportError::Decode(e.to_string()))?;
    serde_json::from_slice(&bytes).map_err(|e| TransportError::Decode(e.to_string()))
}

/// Serialize `value` as a JSON response body.
pub fn encode_json<T: Serialize>(value: &T) -> Result<Response, TransportError> {
    let body = serde_json::to_vec(value).map_err(|e| TransportError::Encode(e.to_string()))?;
    Ok(json_bytes(body))
}

fn json_bytes(body: Vec<u8>) -> Response {
    ([(header::CONTENT_TYPE, "application/json")], body).into_response()
}

impl Decode for StringRequest {
    fn decode(req: Request<Body>, limits: Limits) -> BoxFuture<'static, Result<Self, TransportError>> {
        Box::pin(decode_json_body(req, limits.body_bytes))
    }
}

impl Decode for FibRequest {
    fn decode(req: Request<Body>, limits: Limits) -> BoxFuture<'static, Result<Self, TransportError>> {
        Box::pin(async move {
            let (mut parts, _body) = req.into_parts();
            let raw = RawPathParams::from_request_parts(&mut parts, &())
                .await
                .ok()
                .and_then(|params| {
                    params
                        .iter()
                        .find(|(key, _)| *key == "n")
                        .map(|(_, value)| value.to_string())
                })
                .ok_or_else(|| TransportError::InvalidInput("missing n".into()))?;
            let n = parse_unsigned(&raw)
                .ok_or_else(|| TransportError::InvalidInput(format!("{raw:?}")))?;
            if n > limits.max_fib_n {
                return Err(TransportError::InvalidInput(format!(
                    "n must be at most {}",
                    limits.max_fib_n
                )));
            }
            Ok(FibRequest { n })
        })
    }
}

/// Plain decimal digits only: no sign, no whitespace.
fn parse_unsigned(raw: &str) -> Option<u64> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok()
}

/// Header and IP routes take the request as-is.
impl Decode for Request<Body> {
    fn decode(req: Request<Body>, _limits: Limits) -> BoxFuture<'static, Result<Self, TransportError>> {
        Box::pin(async move { Ok(req) })
    }
}

impl Encode for UppercaseResponse {
    fn encode(self) -> Result<Response, TransportError> {
        encode_json(&self)
    }
}

impl Encode for CountResponse {
    fn encode(self) -> Result<Response, TransportError> {
        encode_json(&self)
    }
}

impl Encode for IpResponse {
    fn encode(self) -> Result<Response, TransportError> {
        encode_json(&self)
    }
}

impl Encode for FibResponse {
    // Decimal digits are a valid JSON number of any length.
    fn encode(self) -> Result<Response, TransportError> {
        Ok(json_bytes(self.0.to_string().into_bytes()))
    }
}

impl Encode for HeaderText {
    fn encode(self) -> Result<Response, TransportError> {
        Ok((
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            self.0,
        )
            .into_response())
    }
}
