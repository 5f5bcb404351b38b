//! Application router and HTTP middleware stack.
//!
//! # Responsibilities
//! - Mount the domain routes, `/metrics`, and the health probes
//! - Answer `OPTIONS` on registered paths without reaching a transport
//! - Wire up request id, access log, CORS headers, default content type,
//!   request timeout and in-flight tracking
//! - Answer unknown paths with a JSON 404

use axum::body::HttpBody;
use axum::extract::FromRef;
use axum::http::header::{HeaderName, CONTENT_TYPE};
use axum::http::{HeaderValue, StatusCode};
use axum::middleware::{from_fn, from_fn_with_state};
use axum::response::Response;
use axum::routing::get;
use axum::{Json, Router};
use metrics_exporter_prometheus::PrometheusHandle;
use serde_json::json;
use tokio::sync::watch;
use tower::ServiceBuilder;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use super::middleware::{cors_header, preflight, CorsHeader};
use crate::config::ServerConfig;
use crate::health;
use crate::lifecycle::in_flight::track as track_in_flight;
use crate::lifecycle::{InFlight, ServerState};
use crate::observability::metrics::metrics_handler;
use crate::routing;
use crate::service::Services;
use crate::transport::Limits;

/// State shared by the non-domain handlers.
#[derive(Clone)]
pub struct AppState {
    pub metrics: PrometheusHandle,
    pub lifecycle: watch::Receiver<ServerState>,
}

impl FromRef<AppState> for PrometheusHandle {
    fn from_ref(state: &AppState) -> Self {
        state.metrics.clone()
    }
}

impl FromRef<AppState> for watch::Receiver<ServerState> {
    fn from_ref(state: &AppState) -> Self {
        state.lifecycle.clone()
    }
}

/// Build the complete application.
///
/// **Middleware ordering (outermost to innermost):**
/// 1. `SetRequestId` -- UUID `x-request-id` on every request
/// 2. `Tracing` -- access log span per request
/// 3. `PropagateRequestId` -- copies `x-request-id` to the response
/// 4. CORS headers -- set on every response, including 404s and timeouts
/// 5. Default `Content-Type: application/json` when the handler set none and
///    the body is not empty
/// 6. `Timeout` -- 408 once `request_timeout_secs` elapses
/// 7. In-flight tracking
pub fn build_app(
    services: &Services,
    state: AppState,
    in_flight: InFlight,
    config: &ServerConfig,
) -> Router {
    let x_request_id = HeaderName::from_static("x-request-id");

    Router::new()
        .merge(routing::routes(services, Limits::from_config(config)))
        .route("/metrics", get(metrics_handler))
        .route("/live", get(health::liveness))
        .route("/ready", get(health::readiness))
        .route_layer(from_fn(preflight))
        .fallback(not_found)
        .layer(from_fn_with_state(in_flight, track_in_flight))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::new(x_request_id))
                .layer(cors_header(CorsHeader::AllowOrigin))
                .layer(cors_header(CorsHeader::AllowMethods))
                .layer(cors_header(CorsHeader::AllowHeaders))
                .layer(SetResponseHeaderLayer::if_not_present(
                    CONTENT_TYPE,
                    default_content_type,
                ))
                .layer(TimeoutLayer::with_status_code(
                    StatusCode::REQUEST_TIMEOUT,
                    config.listener.request_timeout(),
                )),
        )
        .with_state(state)
}

/// Preflight answers and timeouts carry no body, so they get no content type.
fn default_content_type(response: &Response) -> Option<HeaderValue> {
    if response.body().size_hint().exact() == Some(0) {
        None
    } else {
        Some(HeaderValue::from_static("application/json"))
    }
}

async fn not_found() -> (StatusCode, Json<serde_json::Value>) {
    (StatusCode::NOT_FOUND, Json(json!({ "error": "not found" })))
}
