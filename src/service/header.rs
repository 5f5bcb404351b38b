//! Request header introspection.

use std::convert::Infallible;
use std::fmt::Write as _;
use std::future::{ready, Ready};
use std::task::{Context, Poll};

use axum::http::{header, HeaderMap};
use tower::Service;

use super::{Call, Capabilities};

/// Render one `Key: v1,v2` line per distinct header name. `Host` names the
/// target rather than describing the request, so it is left out.
pub fn dump_headers(headers: &HeaderMap) -> String {
    let mut out = String::new();
    for name in headers.keys().filter(|name| **name != header::HOST) {
        let values = headers
            .get_all(name)
            .iter()
            .map(|value| String::from_utf8_lossy(value.as_bytes()).into_owned())
            .collect::<Vec<_>>()
            .join(",");
        let _ = writeln!(out, "{}: {}", canonical_key(name.as_str()), values);
    }
    out
}

/// Canonical MIME form of a header name: `x-request-id` → `X-Request-Id`.
pub fn canonical_key(name: &str) -> String {
    name.split('-')
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join("-")
}

#[derive(Debug, Clone, Default)]
pub struct DumpHeaders {
    pub headers: HeaderMap,
}

impl Call for DumpHeaders {
    const METHOD: &'static str = "headers";
    type Output = String;

    // Header values can carry credentials; only the count is logged.
    fn input_field(&self) -> Option<String> {
        Some(format!("{} headers", self.headers.len()))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct HeaderService;

impl Capabilities for HeaderService {
    const NAME: &'static str = "header";
    const METHODS: &'static [&'static str] = &[DumpHeaders::METHOD];
}

impl Service<DumpHeaders> for HeaderService {
    type Response = String;
    type Error = Infallible;
    type Future = Ready<Result<String, Infallible>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: DumpHeaders) -> Self::Future {
        ready(Ok(dump_headers(&req.headers)))
    }
}
