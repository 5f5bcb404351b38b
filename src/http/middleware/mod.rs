//! HTTP-level middleware.

pub mod access_control;

pub use access_control::{cors_header, preflight, CorsHeader};
