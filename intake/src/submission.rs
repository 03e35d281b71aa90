//! Submission pipeline.
//!
//! `NotSubmitted -> Submitting -> {Succeeded | Failed}`, with `Failed ->
//! Submitting` on retry. A latch guarantees at most one request in flight and
//! none after a success.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use intake_types::{AnswerNormalizer, AnswerStore, UserInfo};
use tracing::{debug, info, warn};

use crate::transport::{Transport, TransportError, TransportResponse};
use crate::wire::{SubmissionReceipt, SubmitRequest, error_message, parse_receipt};

/// Shown when the backend reports the email as already registered.
pub const DUPLICATE_ACCOUNT_MESSAGE: &str = "An account with this email already exists. \
    Please use a different email address or contact support if this is your account.";

/// Shown for a 400 response without a message.
pub const VALIDATION_FALLBACK_MESSAGE: &str =
    "Validation error. Please check your input and try again.";

const DUPLICATE_NEEDLES: [&str; 3] = ["already exists", "email already", "user with email"];

/// A failed submission attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionFailure {
    /// Message for the respondent; never blank.
    pub message: String,

    /// The email is already registered; the respondent may correct it.
    pub is_duplicate_conflict: bool,

    /// HTTP status, if a response was received.
    pub status: Option<u16>,
}

/// Where the submission currently stands.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmissionOutcome {
    NotSubmitted,
    Submitting,
    Succeeded { receipt: Option<SubmissionReceipt> },
    Failed(SubmissionFailure),
}

impl SubmissionOutcome {
    /// Check for a successful submission.
    pub fn is_succeeded(&self) -> bool {
        matches!(self, Self::Succeeded { .. })
    }

    /// The failure, if the last attempt failed.
    pub fn failure(&self) -> Option<&SubmissionFailure> {
        match self {
            Self::Failed(failure) => Some(failure),
            _ => None,
        }
    }

    /// The receipt of a successful submission.
    pub fn receipt(&self) -> Option<&SubmissionReceipt> {
        match self {
            Self::Succeeded { receipt } => receipt.as_ref(),
            _ => None,
        }
    }
}

/// Normalizes answers, sends them and classifies the result.
pub struct SubmissionPipeline<T> {
    transport: T,
    normalizer: Box<dyn AnswerNormalizer>,
    docs_url: String,
    latch: AtomicBool,
    outcome: Mutex<SubmissionOutcome>,
    attempts: AtomicUsize,
}

impl<T: Transport> SubmissionPipeline<T> {
    /// Create a pipeline; `docs_url` is named in fallback error messages.
    pub fn new(
        transport: T,
        normalizer: Box<dyn AnswerNormalizer>,
        docs_url: impl Into<String>,
    ) -> Self {
        Self {
            transport,
            normalizer,
            docs_url: docs_url.into(),
            latch: AtomicBool::new(false),
            outcome: Mutex::new(SubmissionOutcome::NotSubmitted),
            attempts: AtomicUsize::new(0),
        }
    }

    /// Get the transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Name of the active normalizer.
    pub fn normalizer_name(&self) -> &'static str {
        self.normalizer.name()
    }

    /// Number of requests actually sent.
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::Acquire)
    }

    /// The current outcome.
    pub fn outcome(&self) -> SubmissionOutcome {
        self.lock_outcome().clone()
    }

    /// Send the answers, unless a request is in flight or already succeeded.
    ///
    /// In that case the current outcome is returned and nothing is sent.
    /// Failures release the latch so the caller can retry.
    pub async fn submit(&self, user_info: &UserInfo, answers: &AnswerStore) -> SubmissionOutcome {
        let mut in_flight = {
            let mut current = self.lock_outcome();
            if self
                .latch
                .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
                .is_err()
            {
                debug!(current = ?*current, "submission ignored: already in flight or done");
                return current.clone();
            }
            *current = SubmissionOutcome::Submitting;
            InFlight {
                latch: &self.latch,
                outcome: &self.outcome,
                finished: false,
            }
        };

        let request = SubmitRequest::new(user_info, self.normalizer.normalize(answers));
        let attempt = self.attempts.fetch_add(1, Ordering::AcqRel) + 1;
        info!(
            attempt,
            normalizer = self.normalizer.name(),
            answers = request.answers.len(),
            "submitting questionnaire"
        );

        let result = self.transport.post_submission(&request).await;
        let outcome = classify(result, &self.docs_url);
        match &outcome {
            SubmissionOutcome::Succeeded { receipt } => {
                info!(
                    submission_id = receipt.as_ref().map(|r| r.submission.id.as_str()),
                    "questionnaire submitted"
                );
            }
            SubmissionOutcome::Failed(failure) => {
                warn!(
                    status = failure.status,
                    duplicate = failure.is_duplicate_conflict,
                    message = %failure.message,
                    "questionnaire submission failed"
                );
            }
            _ => {}
        }

        in_flight.finish(outcome.clone());
        outcome
    }

    /// Forget any previous submission, e.g. when the respondent starts over.
    ///
    /// Refused while a request is in flight; returns whether the reset happened.
    pub fn reset(&self) -> bool {
        let mut current = self.lock_outcome();
        if *current == SubmissionOutcome::Submitting {
            debug!("reset ignored: submission in flight");
            return false;
        }
        *current = SubmissionOutcome::NotSubmitted;
        self.latch.store(false, Ordering::Release);
        true
    }

    fn lock_outcome(&self) -> MutexGuard<'_, SubmissionOutcome> {
        self.outcome.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Holds the latch for one request.
///
/// Dropping it before `finish` (the submit future was cancelled) puts the
/// pipeline back to `NotSubmitted`.
struct InFlight<'a> {
    latch: &'a AtomicBool,
    outcome: &'a Mutex<SubmissionOutcome>,
    finished: bool,
}

impl InFlight<'_> {
    fn finish(&mut self, outcome: SubmissionOutcome) {
        self.settle(outcome);
        self.finished = true;
    }

    /// The outcome and the latch change under the same lock `reset` takes.
    fn settle(&self, outcome: SubmissionOutcome) {
        let mut current = self.outcome.lock().unwrap_or_else(PoisonError::into_inner);
        let release = !outcome.is_succeeded();
        *current = outcome;
        if release {
            self.latch.store(false, Ordering::Release);
        }
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if !self.finished {
            debug!("submission dropped before it finished");
            self.settle(SubmissionOutcome::NotSubmitted);
        }
    }
}

/// Turn a transport result into an outcome.
pub fn classify(
    result: Result<TransportResponse, TransportError>,
    docs_url: &str,
) -> SubmissionOutcome {
    let response = match result {
        Ok(response) => response,
        Err(err) => return failed(err.to_string(), false, None, docs_url),
    };

    if response.is_success() {
        let receipt = parse_receipt(&response.body);
        if receipt.is_none() {
            warn!(status = response.status, "success response carried no receipt");
        }
        return SubmissionOutcome::Succeeded { receipt };
    }

    let message = error_message(&response.body);
    let status = Some(response.status);
    if response.status == 400 {
        if let Some(message) = &message
            && is_duplicate_account(message)
        {
            return failed(DUPLICATE_ACCOUNT_MESSAGE.to_string(), true, status, docs_url);
        }
        let message = message.unwrap_or_else(|| VALIDATION_FALLBACK_MESSAGE.to_string());
        return failed(message, false, status, docs_url);
    }

    let message = message.unwrap_or_else(|| status_line(&response));
    failed(message, false, status, docs_url)
}

/// `HTTP 503: Service Unavailable`, or `HTTP 503` without a reason phrase.
fn status_line(response: &TransportResponse) -> String {
    match response.reason.as_deref().map(str::trim) {
        Some(reason) if !reason.is_empty() => format!("HTTP {}: {reason}", response.status),
        _ => format!("HTTP {}", response.status),
    }
}

fn is_duplicate_account(message: &str) -> bool {
    let message = message.to_lowercase();
    DUPLICATE_NEEDLES
        .iter()
        .any(|needle| message.contains(needle))
}

fn failed(
    message: String,
    is_duplicate_conflict: bool,
    status: Option<u16>,
    docs_url: &str,
) -> SubmissionOutcome {
    let message = if message.trim().is_empty() {
        format!(
            "Unable to submit your answers. The API endpoint may not be configured correctly. \
             Please check the API documentation at {docs_url}."
        )
    } else {
        message
    };
    SubmissionOutcome::Failed(SubmissionFailure {
        message,
        is_duplicate_conflict,
        status,
    })
}
