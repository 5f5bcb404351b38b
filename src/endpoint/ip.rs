//! `/ip` endpoint.

use axum::body::Body;
use axum::http::Request;
use serde::{Deserialize, Serialize};
use tower::{Service, ServiceExt};

use super::{endpoint, Endpoint};
use crate::service::{DomainError, LookupIp};

/// Either the address or the lookup failure, never both.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum IpResponse {
    Found { ip: String },
    Failed { error: String },
}

pub fn make_ip_endpoint<S>(service: S) -> Endpoint<Request<Body>, IpResponse>
where
    S: Service<LookupIp, Response = String, Error = DomainError> + Clone + Send + Sync + 'static,
    S::Future: Send,
{
    endpoint(move |_req: Request<Body>| {
        let service = service.clone();
        async move {
            match service.oneshot(LookupIp).await {
                Ok(ip) => IpResponse::Found { ip },
                Err(e) => IpResponse::Failed {
                    error: e.to_string(),
                },
            }
        }
    })
}
