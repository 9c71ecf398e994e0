//! Trait abstraction for the submission endpoint to enable mocking in tests

use super::payload::SubmissionPayload;
use crate::error::SubmissionError;
use async_trait::async_trait;

/// Accepts a completed form. `Ok` means the endpoint answered 2xx.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SubmissionEndpoint: Send + Sync {
    async fn submit(&self, payload: &SubmissionPayload) -> Result<(), SubmissionError>;
}
