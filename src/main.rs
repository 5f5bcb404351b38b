//! API server.
//!
//! # Architecture Overview
//!
//! ```text
//!                 ┌────────────────────────────────────────────────────────────┐
//!                 │                         API SERVER                          │
//!                 │                                                             │
//!   Request       │  ┌───────────┐   ┌──────────┐   ┌───────────┐   ┌────────┐ │
//!   ──────────────┼─▶│ lifecycle │──▶│   http   │──▶│  routing  │──▶│transport│ │
//!                 │  │ listener  │   │  layers  │   │   table   │   │ decode │ │
//!                 │  └───────────┘   └──────────┘   └───────────┘   └───┬────┘ │
//!                 │                                                     ▼      │
//!                 │                 ┌────────────────────┐        ┌─────────┐  │
//!                 │                 │ service middleware │◀───────│endpoint │  │
//!                 │                 │ instrumenting      │        └─────────┘  │
//!                 │                 │  └ logging         │                     │
//!                 │                 │     └ base service │                     │
//!                 │                 └────────────────────┘                     │
//!                 │                                                             │
//!                 │  Cross-cutting: config, observability (logs + /metrics),    │
//!                 │  health probes (/live, /ready), graceful shutdown           │
//!                 └────────────────────────────────────────────────────────────┘
//! ```

use std::error::Error;

use api_server::config::Args;
use api_server::lifecycle::{signals, Controller};
use api_server::observability::{logging, metrics};
use api_server::{build_app, AppState, Services};

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::from_env();
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    let outcome = runtime.block_on(run(args));

    // Blocking computations cut off by the shutdown deadline must not hold
    // the process open.
    runtime.shutdown_background();
    outcome
}

async fn run(args: Args) -> Result<(), Box<dyn Error>> {
    let config = args.resolve()?;

    logging::init(&config.observability)?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        bind_address = %config.listener.bind_address,
        request_timeout_secs = config.listener.request_timeout_secs,
        shutdown_timeout_ms = config.shutdown.timeout_ms,
        fib_max_n = config.sequence.max_n,
        "Configuration loaded"
    );

    let recorder = metrics::build_recorder();
    let services = Services::build(&config.ip_lookup, &recorder)?;

    let controller = Controller::new(config.shutdown.timeout());
    let state = AppState {
        metrics: recorder.handle(),
        lifecycle: controller.state(),
    };
    let app = build_app(&services, state, controller.in_flight(), &config);

    let listener = controller.bind(&config.listener.bind_address).await?;
    controller
        .serve(listener, app, signals::termination())
        .await?;

    Ok(())
}
