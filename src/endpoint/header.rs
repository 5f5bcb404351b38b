//! `/headers` endpoint.

use std::convert::Infallible;

use axum::body::Body;
use axum::http::Request;
use tower::{Service, ServiceExt};

use super::{endpoint, Endpoint};
use crate::service::DumpHeaders;

/// Plain-text header listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderText(pub String);

pub fn make_header_endpoint<S>(service: S) -> Endpoint<Request<Body>, HeaderText>
where
    S: Service<DumpHeaders, Response = String, Error = Infallible> + Clone + Send + Sync + 'static,
    S::Future: Send,
{
    endpoint(move |req: Request<Body>| {
        let service = service.clone();
        let (parts, _body) = req.into_parts();
        async move {
            let text = service
                .oneshot(DumpHeaders {
                    headers: parts.headers,
                })
                .await
                .unwrap_or_else(|never| match never {});
            HeaderText(text)
        }
    })
}
