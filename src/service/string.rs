//! String operations: uppercase and count.

use std::convert::Infallible;
use std::future::{ready, Ready};
use std::task::{Context, Poll};

use tower::Service;

use super::{Call, Capabilities, DomainError};

/// Uppercase `s`. Fails on empty input.
pub fn uppercase(s: &str) -> Result<String, DomainError> {
    if s.is_empty() {
        return Err(DomainError::EmptyString);
    }
    Ok(s.to_uppercase())
}

/// Length of `s` in bytes.
pub fn count(s: &str) -> usize {
    s.len()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Uppercase {
    pub s: String,
}

impl Call for Uppercase {
    const METHOD: &'static str = "uppercase";
    type Output = String;

    fn input_field(&self) -> Option<String> {
        Some(self.s.clone())
    }

    fn output_field(output: &String) -> Option<String> {
        Some(output.clone())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Count {
    pub s: String,
}

impl Call for Count {
    const METHOD: &'static str = "count";
    type Output = usize;

    fn input_field(&self) -> Option<String> {
        Some(self.s.clone())
    }

    fn output_field(output: &usize) -> Option<String> {
        Some(output.to_string())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct StringService;

impl Capabilities for StringService {
    const NAME: &'static str = "string";
    const METHODS: &'static [&'static str] = &[Uppercase::METHOD, Count::METHOD];
}

impl Service<Uppercase> for StringService {
    type Response = String;
    type Error = DomainError;
    type Future = Ready<Result<String, DomainError>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Uppercase) -> Self::Future {
        ready(uppercase(&req.s))
    }
}

impl Service<Count> for StringService {
    type Response = usize;
    type Error = Infallible;
    type Future = Ready<Result<usize, Infallible>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Count) -> Self::Future {
        ready(Ok(count(&req.s)))
    }
}
