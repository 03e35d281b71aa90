//! One respondent's session: the flow controller plus its submission pipeline.

use intake_types::QuestionId;
use tracing::info;

use crate::export::ExportBundle;
use crate::flow::{FlowError, Intake, Transition};
use crate::submission::{SubmissionOutcome, SubmissionPipeline};
use crate::transport::Transport;

/// Misuse of a session.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Flow(#[from] FlowError),

    #[error("The intake is not complete yet")]
    NotComplete,

    #[error("The email can only be changed after the backend reported it as already registered")]
    EmailLocked,
}

/// Owns an [`Intake`] and the [`SubmissionPipeline`] that sends it.
pub struct Session<T> {
    intake: Intake,
    pipeline: SubmissionPipeline<T>,
}

impl<T: Transport> Session<T> {
    /// Create a new session.
    pub fn new(intake: Intake, pipeline: SubmissionPipeline<T>) -> Self {
        Self { intake, pipeline }
    }

    /// Get the flow controller.
    pub fn intake(&self) -> &Intake {
        &self.intake
    }

    /// Get a mutable reference to the flow controller, for front ends.
    pub fn intake_mut(&mut self) -> &mut Intake {
        &mut self.intake
    }

    /// Get the submission pipeline.
    pub fn pipeline(&self) -> &SubmissionPipeline<T> {
        &self.pipeline
    }

    /// The current submission outcome.
    pub fn outcome(&self) -> SubmissionOutcome {
        self.pipeline.outcome()
    }

    /// Submit once after entering `Complete`.
    ///
    /// Returns `None` when this entry into `Complete` was already handled, so
    /// calling it on every redraw is safe.
    pub async fn auto_submit(&mut self) -> Option<SubmissionOutcome> {
        let input = self.intake.begin_submission_once()?;
        Some(self.pipeline.submit(input.user_info, input.answers).await)
    }

    /// Submit again with a fresh read of personal details and answers.
    pub async fn retry(&self) -> Result<SubmissionOutcome, SessionError> {
        let input = self
            .intake
            .submission_input()
            .ok_or(SessionError::NotComplete)?;
        Ok(self.pipeline.submit(input.user_info, input.answers).await)
    }

    /// Replace the email after a duplicate-account conflict.
    pub fn correct_email(&mut self, email: &str) -> Result<(), SessionError> {
        let conflict = self
            .pipeline
            .outcome()
            .failure()
            .is_some_and(|failure| failure.is_duplicate_conflict);
        if !conflict {
            return Err(SessionError::EmailLocked);
        }
        self.intake.correct_email(email)?;
        info!("email corrected after duplicate-account conflict");
        Ok(())
    }

    /// Drop everything and go back to the personal-details step.
    ///
    /// Stays put while a submission is in flight.
    pub fn restart(&mut self) -> Transition {
        if !self.pipeline.reset() {
            return Transition::Stayed(self.intake.step());
        }
        self.intake.restart()
    }

    /// Export bundle of the completed intake, once it was submitted.
    pub fn export(&self) -> Option<ExportBundle> {
        let outcome = self.pipeline.outcome();
        if !outcome.is_succeeded() {
            return None;
        }
        let input = self.intake.submission_input()?;
        Some(ExportBundle::new(
            self.intake.catalog(),
            input.user_info,
            input.answers,
            outcome.receipt(),
        ))
    }

    /// Display labels of every answered question, in catalog order.
    pub fn answer_summary(&self) -> Vec<(QuestionId, String)> {
        let catalog = self.intake.catalog();
        let store = self.intake.store();
        catalog
            .questions()
            .iter()
            .filter_map(|question| {
                let answer = store.get(question.id())?;
                let label = match answer.as_text() {
                    Some(text) if text.trim().is_empty() => return None,
                    Some(text) => text.trim().to_string(),
                    None => answer
                        .selections()
                        .iter()
                        .map(|s| question.label_for(s))
                        .collect::<Vec<_>>()
                        .join(", "),
                };
                Some((question.id().clone(), label))
            })
            .collect()
    }
}
