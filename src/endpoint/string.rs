//! `/string/uppercase` and `/string/count` endpoints.

use std::convert::Infallible;

use serde::{Deserialize, Serialize};
use tower::{Service, ServiceExt};

use super::{endpoint, Endpoint};
use crate::service::{Count, DomainError, Uppercase};

/// Body of both string routes.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct StringRequest {
    pub s: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct UppercaseResponse {
    pub v: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub err: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CountResponse {
    pub v: usize,
}

pub fn make_uppercase_endpoint<S>(service: S) -> Endpoint<StringRequest, UppercaseResponse>
where
    S: Service<Uppercase, Response = String, Error = DomainError> + Clone + Send + Sync + 'static,
    S::Future: Send,
{
    endpoint(move |req: StringRequest| {
        let service = service.clone();
        async move {
            match service.oneshot(Uppercase { s: req.s }).await {
                Ok(v) => UppercaseResponse { v, err: None },
                Err(e) => UppercaseResponse {
                    v: String::new(),
                    err: Some(e.to_string()),
                },
            }
        }
    })
}

pub fn make_count_endpoint<S>(service: S) -> Endpoint<StringRequest, CountResponse>
where
    S: Service<Count, Response = usize, Error = Infallible> + Clone + Send + Sync + 'static,
    S::Future: Send,
{
    endpoint(move |req: StringRequest| {
        let service = service.clone();
        async move {
            let v = service
                .oneshot(Count { s: req.s })
                .await
                .unwrap_or_else(|never| match never {});
            CountResponse { v }
        }
    })
}
