//! Metrics collection and exposition.
//!
//! # Metrics
//! - `api_<service>_request_count` (counter): calls by method, error
//! - `api_<service>_request_latency_seconds` (histogram): latency by method, error
//!
//! # Design Decisions
//! - The Prometheus recorder is built once and injected, never installed globally
//! - Handles are registered up front for every (method, error) pair; the hot
//!   path is a map lookup plus atomic updates inside the handles

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;
use metrics::{Counter, Histogram, Recorder, Unit};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle, PrometheusRecorder};

/// Build the recorder every service registers against.
pub fn build_recorder() -> PrometheusRecorder {
    PrometheusBuilder::new().build_recorder()
}

/// `GET /metrics`: Prometheus text exposition.
pub async fn metrics_handler(State(handle): State<PrometheusHandle>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        handle.render(),
    )
}

#[derive(Clone)]
struct Instruments {
    calls: Counter,
    latency: Histogram,
}

/// Pre-registered counter and latency handles for one service.
#[derive(Clone)]
pub struct ServiceMetrics {
    instruments: Arc<HashMap<(&'static str, bool), Instruments>>,
}

impl ServiceMetrics {
    /// Register `api_<subsystem>_request_count` and
    /// `api_<subsystem>_request_latency_seconds` for every method and both
    /// values of the `error` label.
    pub fn register(recorder: &dyn Recorder, subsystem: &str, methods: &[&'static str]) -> Self {
        let count_name = format!("api_{subsystem}_request_count");
        let latency_name = format!("api_{subsystem}_request_latency_seconds");

        let instruments = metrics::with_local_recorder(recorder, || {
            metrics::describe_counter!(count_name.clone(), "Number of requests received.");
            metrics::describe_histogram!(
                latency_name.clone(),
                Unit::Seconds,
                "Total duration of requests in seconds."
            );

            let mut instruments = HashMap::new();
            for &method in methods {
                for error in [false, true] {
                    let error_label = if error { "true" } else { "false" };
                    instruments.insert(
                        (method, error),
                        Instruments {
                            calls: metrics::counter!(
                                count_name.clone(),
                                "method" => method,
                                "error" => error_label
                            ),
                            latency: metrics::histogram!(
                                latency_name.clone(),
                                "method" => method,
                                "error" => error_label
                            ),
                        },
                    );
                }
            }
            instruments
        });

        Self {
            instruments: Arc::new(instruments),
        }
    }

    /// Count one call and record its latency.
    pub fn observe(&self, method: &'static str, error: bool, elapsed: Duration) {
        match self.instruments.get(&(method, error)) {
            Some(instruments) => {
                instruments.calls.increment(1);
                instruments.latency.record(elapsed.as_secs_f64());
            }
            None => tracing::warn!(method, "No metrics registered for method"),
        }
    }
}
