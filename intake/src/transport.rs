use std::future::Future;
use std::time::Duration;

use crate::wire::SubmitRequest;

/// Status and body of an HTTP response, whatever the status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    /// Reason phrase of the status, e.g. `Service Unavailable`.
    pub reason: Option<String>,
    pub body: String,
}

impl TransportResponse {
    /// Create a new response without a reason phrase.
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            reason: None,
            body: body.into(),
        }
    }

    /// Set the reason phrase.
    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Check for a 2xx status.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// No response was received.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    #[error("{0}")]
    Network(String),

    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Could not encode request: {0}")]
    Encode(String),
}

/// Delivers a submission to the backend.
///
/// Any status code is an `Ok` response; `Err` means nothing came back.
pub trait Transport: Send + Sync {
    fn post_submission(
        &self,
        request: &SubmitRequest,
    ) -> impl Future<Output = Result<TransportResponse, TransportError>> + Send;
}
