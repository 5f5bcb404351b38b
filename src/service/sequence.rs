//! Fibonacci sequence over arbitrary-precision integers.

use std::convert::Infallible;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::task::{Context, Poll};

use futures_util::future::BoxFuture;
use num_bigint::BigUint;
use tower::Service;

use super::{Call, Capabilities};

/// The `n`th Fibonacci number, with `fibonacci(0) == 0`.
pub fn fibonacci(n: u64) -> BigUint {
    fibonacci_until(n, &AtomicBool::new(false)).unwrap_or_default()
}

/// Like [`fibonacci`], but gives up with `None` once `cancelled` is set.
pub fn fibonacci_until(n: u64, cancelled: &AtomicBool) -> Option<BigUint> {
    let mut current = BigUint::from(0u8);
    let mut next = BigUint::from(1u8);
    for _ in 0..n {
        if cancelled.load(Ordering::Relaxed) {
            return None;
        }
        let sum = &current + &next;
        current = std::mem::replace(&mut next, sum);
    }
    Some(current)
}

/// Sets the flag when the awaiting future is dropped (request timeout,
/// client gone, shutdown deadline), so the blocking loop stops early.
struct CancelOnDrop(Arc<AtomicBool>);

impl Drop for CancelOnDrop {
    fn drop(&mut self) {
        self.0.store(true, Ordering::Relaxed);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fibonacci {
    pub n: u64,
}

impl Call for Fibonacci {
    const METHOD: &'static str = "fib";
    type Output = BigUint;

    fn input_field(&self) -> Option<String> {
        Some(self.n.to_string())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SequenceService;

impl Capabilities for SequenceService {
    const NAME: &'static str = "fib";
    const METHODS: &'static [&'static str] = &[Fibonacci::METHOD];
}

impl Service<Fibonacci> for SequenceService {
    type Response = BigUint;
    type Error = Infallible;
    type Future = BoxFuture<'static, Result<BigUint, Infallible>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    /// Runs on the blocking pool; runtime workers stay free for other requests.
    fn call(&mut self, req: Fibonacci) -> Self::Future {
        let cancelled = Arc::new(AtomicBool::new(false));
        let guard = CancelOnDrop(cancelled.clone());
        let task = tokio::task::spawn_blocking(move || fibonacci_until(req.n, &cancelled));

        Box::pin(async move {
            let _guard = guard;
            match task.await {
                Ok(Some(value)) => Ok(value),
                Err(error) if error.is_panic() => std::panic::resume_unwind(error.into_panic()),
                // Only dropping `_guard` cancels, and a task is only cancelled
                // while the runtime shuts down. Neither resolves this future.
                Ok(None) | Err(_) => std::future::pending().await,
            }
        })
    }
}
