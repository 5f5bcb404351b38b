//! Shared utilities for integration and load testing.

#![allow(dead_code)]

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use api_server::config::ServerConfig;
use api_server::lifecycle::{Controller, LifecycleError, ServerState};
use api_server::observability::metrics::build_recorder;
use api_server::{build_app, AppState, Services};
use metrics_exporter_prometheus::PrometheusHandle;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;

/// Start a programmable upstream on an ephemeral port.
///
/// Each connection is answered with the `(status, body)` produced by `f`
/// once the request head has been read.
pub async fn start_upstream<F, Fut>(f: F) -> SocketAddr
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let f = Arc::new(f);

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let f = f.clone();
            tokio::spawn(async move {
                read_request_head(&mut socket).await;
                let (status, body) = f().await;
                let status_text = match status {
                    200 => "200 OK",
                    404 => "404 Not Found",
                    500 => "500 Internal Server Error",
                    503 => "503 Service Unavailable",
                    _ => "200 OK",
                };

                let response = format!(
                    "HTTP/1.1 {}\r\nContent-Type: text/plain\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status_text,
                    body.len(),
                    body
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    addr
}

async fn read_request_head(socket: &mut TcpStream) {
    let mut head = Vec::new();
    let mut buf = [0u8; 1024];
    while !head.windows(4).any(|w| w == b"\r\n\r\n") {
        match socket.read(&mut buf).await {
            Ok(0) | Err(_) => return,
            Ok(n) => head.extend_from_slice(&buf[..n]),
        }
    }
}

/// A full server on an ephemeral port, stopped through a test-owned signal.
pub struct TestServer {
    pub addr: SocketAddr,
    pub metrics: PrometheusHandle,
    pub state: watch::Receiver<ServerState>,
    stop: oneshot::Sender<()>,
    handle: JoinHandle<Result<(), LifecycleError>>,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Deliver the termination signal and wait for the controller to finish.
    pub async fn stop(self) -> Result<(), LifecycleError> {
        let _ = self.stop.send(());
        tokio::time::timeout(Duration::from_secs(10), self.handle)
            .await
            .expect("controller did not finish")
            .expect("controller task panicked")
    }
}

/// Default config pointed at 127.0.0.1 with the IP lookup sent to `upstream`.
pub fn config_with_upstream(upstream: Option<SocketAddr>) -> ServerConfig {
    let mut config = ServerConfig::default();
    config.listener.bind_address = "127.0.0.1:0".to_string();
    if let Some(addr) = upstream {
        config.ip_lookup.url = format!("http://{addr}/");
    }
    config
}

pub async fn spawn_server(config: ServerConfig) -> TestServer {
    let recorder = build_recorder();
    let metrics = recorder.handle();
    let services = Services::build(&config.ip_lookup, &recorder).unwrap();

    let controller = Controller::new(config.shutdown.timeout());
    let state = controller.state();
    let app = build_app(
        &services,
        AppState {
            metrics: metrics.clone(),
            lifecycle: controller.state(),
        },
        controller.in_flight(),
        &config,
    );

    let listener = controller.bind(&config.listener.bind_address).await.unwrap();
    let addr = listener.local_addr().unwrap();

    let (stop, stopped) = oneshot::channel::<()>();
    let signal = async move {
        let _ = stopped.await;
        "test".to_string()
    };
    let handle = tokio::spawn(async move { controller.serve(listener, app, signal).await });

    TestServer {
        addr,
        metrics,
        state,
        stop,
        handle,
    }
}

/// HTTP client that never routes through an environment proxy.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}

/// Value of one counter series in a Prometheus rendering, 0 when absent.
pub fn counter(rendered: &str, service: &str, method: &str, error: bool) -> u64 {
    let name = format!("api_{service}_request_count");
    rendered
        .lines()
        .filter(|line| line.starts_with(&name))
        .filter(|line| line.contains(&format!("method=\"{method}\"")))
        .find(|line| line.contains(&format!("error=\"{error}\"")))
        .and_then(|line| line.rsplit(' ').next())
        .and_then(|value| value.parse().ok())
        .unwrap_or(0)
}
