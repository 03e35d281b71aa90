//! # intake
//!
//! Client intake questionnaire. Front-end and transport agnostic.
//!
//! A respondent moves through personal details, then the questions of a
//! [`Catalog`], one at a time. Once every question is answered the answers are
//! normalized for the backend contract in use and submitted exactly once.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use intake::{Intake, NormalizationPolicy, Session, SubmissionPipeline, wealth};
//!
//! let catalog = wealth::wealth_catalog()?;
//! let normalizer = NormalizationPolicy::OtherExtraction
//!     .build(&catalog, Some(&wealth::advisor_notes_id()));
//! let pipeline = SubmissionPipeline::new(transport, normalizer, docs_url);
//! let mut session = Session::new(Intake::new(catalog), pipeline);
//!
//! frontend.fill(session.intake_mut())?;
//! if let Some(outcome) = session.auto_submit().await {
//!     // show the outcome, offer a retry on failure
//! }
//! ```
//!
//! ## Parts
//! - [`Intake`] - Step flow controller and input handlers
//! - [`EnumeratedRemap`] / [`OtherExtraction`] - Answer normalizers
//! - [`SubmissionPipeline`] - Latch, transport call and outcome classification
//! - [`Session`] - Auto-submit, retry, email correction, restart and export
//! - [`ExportBundle`] / [`restore_answers`] - JSON export and resuming from it
//!
//! ## Front ends
//!
//! Front ends are separate crates that implement [`IntakeFrontend`]:
//! - `intake-wizard-dialoguer` - CLI prompts via dialoguer

// Re-export all types from intake-types
pub use intake_types::*;

mod flow;
pub use flow::{FlowError, Intake, Step, SubmissionInput, Transition};

mod normalize;
pub use normalize::{
    CodeTable, EnumeratedRemap, NormalizationPolicy, OtherExtraction, UnknownPolicy,
};

mod wire;
pub use wire::{
    Analysis, Portfolio, SUBMIT_PATH, SubmissionMeta, SubmissionReceipt, SubmitRequest,
    error_message, parse_receipt,
};

mod transport;
pub use transport::{Transport, TransportError, TransportResponse};

mod submission;
pub use submission::{
    DUPLICATE_ACCOUNT_MESSAGE, SubmissionFailure, SubmissionOutcome, SubmissionPipeline,
    VALIDATION_FALLBACK_MESSAGE, classify,
};

mod session;
pub use session::{Session, SessionError};

mod export;
pub use export::{ExportBundle, ExportError, legacy_answers, restore_answers};

mod frontend;
pub use frontend::IntakeFrontend;

pub mod wealth;

// Scripted transport for testing submissions without a server
mod test_transport;
pub use test_transport::ScriptedTransport;
