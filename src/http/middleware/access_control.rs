//! Cross-origin access control.
//!
//! Permissive CORS headers go on every response. `OPTIONS` requests are
//! answered before the route's transport runs, so a preflight never reaches
//! domain logic.

use axum::body::Body;
use axum::http::header::{
    HeaderName, ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
    ACCESS_CONTROL_ALLOW_ORIGIN,
};
use axum::http::{HeaderValue, Method, Request, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use tower_http::set_header::SetResponseHeaderLayer;

pub const ALLOW_ORIGIN: &str = "*";
pub const ALLOW_METHODS: &str = "GET, POST, OPTIONS";
pub const ALLOW_HEADERS: &str = "Origin, Content-Type";

/// The three access-control headers, each as a layer that overrides
/// whatever the inner service set.
pub fn cors_header(which: CorsHeader) -> SetResponseHeaderLayer<HeaderValue> {
    let (name, value): (HeaderName, &'static str) = match which {
        CorsHeader::AllowOrigin => (ACCESS_CONTROL_ALLOW_ORIGIN, ALLOW_ORIGIN),
        CorsHeader::AllowMethods => (ACCESS_CONTROL_ALLOW_METHODS, ALLOW_METHODS),
        CorsHeader::AllowHeaders => (ACCESS_CONTROL_ALLOW_HEADERS, ALLOW_HEADERS),
    };
    SetResponseHeaderLayer::overriding(name, HeaderValue::from_static(value))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CorsHeader {
    AllowOrigin,
    AllowMethods,
    AllowHeaders,
}

/// Short-circuit `OPTIONS` with an empty 200.
pub async fn preflight(req: Request<Body>, next: Next) -> Response {
    if req.method() == Method::OPTIONS {
        tracing::debug!(path = %req.uri().path(), "Preflight answered");
        return StatusCode::OK.into_response();
    }
    next.run(req).await
}
