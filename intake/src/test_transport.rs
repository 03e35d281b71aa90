//! Scripted transport for exercising the submission pipeline without a server.
//!
//! `ScriptedTransport` answers each request with the next queued reply and
//! records what it was sent.
//!
//! # Example
//!
//! ```rust,ignore
//! use intake::{ScriptedTransport, TransportError};
//!
//! let transport = ScriptedTransport::new()
//!     .with_network_error("connection reset")
//!     .with_response(201, r#"{"data": { ... }}"#);
//! ```

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use crate::transport::{Transport, TransportError, TransportResponse};
use crate::wire::SubmitRequest;

/// A transport that replays pre-configured replies.
///
/// Each call yields to the runtime once before answering, so concurrent
/// submissions really overlap.
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    replies: Mutex<VecDeque<Result<TransportResponse, TransportError>>>,
    requests: Mutex<Vec<SubmitRequest>>,
    calls: AtomicUsize,
}

impl ScriptedTransport {
    /// Create a transport with no replies queued.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a reply.
    pub fn with_reply(self, reply: Result<TransportResponse, TransportError>) -> Self {
        self.replies
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(reply);
        self
    }

    /// Queue an HTTP response.
    pub fn with_response(self, status: u16, body: impl Into<String>) -> Self {
        self.with_reply(Ok(TransportResponse::new(status, body)))
    }

    /// Queue a network error.
    pub fn with_network_error(self, message: impl Into<String>) -> Self {
        self.with_reply(Err(TransportError::Network(message.into())))
    }

    /// Number of requests received.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::Acquire)
    }

    /// Every request received, in order.
    pub fn requests(&self) -> Vec<SubmitRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// The most recent request.
    pub fn last_request(&self) -> Option<SubmitRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .cloned()
    }
}

impl Transport for ScriptedTransport {
    async fn post_submission(
        &self,
        request: &SubmitRequest,
    ) -> Result<TransportResponse, TransportError> {
        self.calls.fetch_add(1, Ordering::AcqRel);
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request.clone());

        tokio::task::yield_now().await;

        self.replies
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::Network("no scripted reply left".into())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn replays_in_order() {
        let transport = ScriptedTransport::new()
            .with_network_error("connection reset")
            .with_response(201, "{}");
        let request: SubmitRequest = serde_json::from_value(serde_json::json!({
            "fullName": "Ada Okafor",
            "email": "ada@example.com",
            "phone": "+2348000000000",
            "gender": "Female",
            "dateOfBirth": "1985-03-14",
            "occupation": "Engineer",
            "address": "Lagos",
            "maritalStatus": "Single",
            "dependantsCount": 0,
            "answers": {}
        }))
        .unwrap();

        let first = transport.post_submission(&request).await;
        assert_eq!(first, Err(TransportError::Network("connection reset".into())));

        let second = transport.post_submission(&request).await.unwrap();
        assert!(second.is_success());

        assert!(transport.post_submission(&request).await.is_err());
        assert_eq!(transport.calls(), 3);
        assert_eq!(transport.last_request(), Some(request));
    }
}
