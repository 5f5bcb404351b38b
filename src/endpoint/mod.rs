//! Endpoint adapters.
//!
//! An endpoint turns one route's request record into exactly one service call
//! and packages the result as that route's response record. Domain failures
//! become an error field in the response, never a failed endpoint.

pub mod header;
pub mod ip;
pub mod sequence;
pub mod string;

use std::future::Future;
use std::sync::Arc;

use futures_util::future::BoxFuture;

/// A shareable async function from a route's request to its response.
pub type Endpoint<Req, Resp> = Arc<dyn Fn(Req) -> BoxFuture<'static, Resp> + Send + Sync>;

/// Box a closure into an [`Endpoint`].
pub fn endpoint<Req, Resp, F, Fut>(f: F) -> Endpoint<Req, Resp>
where
    F: Fn(Req) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Resp> + Send + 'static,
{
    Arc::new(move |req| Box::pin(f(req)))
}
