//! String, sequence, header and IP lookup API server library.

pub mod config;
pub mod endpoint;
pub mod health;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;
pub mod service;
pub mod transport;

pub use config::schema::ServerConfig;
pub use http::{build_app, AppState};
pub use lifecycle::{Controller, LifecycleError, ServerState};
pub use service::Services;
