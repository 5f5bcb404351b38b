//! Liveness and readiness probes.
//!
//! - `/live` answers 200 whenever the process can serve HTTP at all
//! - `/ready` answers 200 only while the lifecycle is `Serving`, so a load
//!   balancer stops routing new traffic as soon as draining begins

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde_json::{json, Value};
use tokio::sync::watch;

use crate::lifecycle::ServerState;

pub async fn liveness() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({})))
}

pub async fn readiness(
    State(state): State<watch::Receiver<ServerState>>,
) -> (StatusCode, Json<Value>) {
    let status = if state.borrow().is_ready() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(json!({})))
}
