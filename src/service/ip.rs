//! Outbound public IP lookup.

use std::task::{Context, Poll};
use std::time::Duration;

use futures_util::future::BoxFuture;
use reqwest::{Client, Url};
use tower::Service;

use super::{Call, Capabilities, DomainError};
use crate::config::IpLookupConfig;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LookupIp;

impl Call for LookupIp {
    const METHOD: &'static str = "getip";
    type Output = String;
}

/// Asks an external endpoint for this host's public address.
///
/// The client is shared by all calls; each call is one independent request,
/// so concurrent lookups never wait on each other.
#[derive(Debug, Clone)]
pub struct IpService {
    client: Client,
    url: Url,
}

impl IpService {
    pub fn new(config: &IpLookupConfig) -> Result<Self, DomainError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        let url =
            Url::parse(&config.url).map_err(|_| DomainError::InvalidUrl(config.url.clone()))?;
        Ok(Self { client, url })
    }
}

impl Capabilities for IpService {
    const NAME: &'static str = "ip";
    const METHODS: &'static [&'static str] = &[LookupIp::METHOD];
}

impl Service<LookupIp> for IpService {
    type Response = String;
    type Error = DomainError;
    type Future = BoxFuture<'static, Result<String, DomainError>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, _req: LookupIp) -> Self::Future {
        let client = self.client.clone();
        let url = self.url.clone();
        Box::pin(async move {
            let response = client.get(url).send().await?.error_for_status()?;
            let body = response.text().await?;
            Ok(body.trim().to_string())
        })
    }
}
