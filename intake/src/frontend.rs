use crate::flow::Intake;
use crate::submission::SubmissionFailure;

/// Trait for front ends that collect intake answers from a respondent.
///
/// A front end drives an [`Intake`] through its input handlers and
/// navigation; the flow controller enforces every rule, so a front end only
/// has to render the current step and forward input.
pub trait IntakeFrontend {
    /// The error type for this front end.
    type Error: Into<anyhow::Error>;

    /// Drive `intake` from its current step until it reaches `Complete`.
    ///
    /// Returns `Err` on cancellation or front-end failure.
    fn fill(&self, intake: &mut Intake) -> Result<(), Self::Error>;

    /// Ask for a replacement email after the backend reported `current` as
    /// already registered. `None` means the respondent keeps it.
    fn ask_new_email(
        &self,
        current: &str,
        failure: &SubmissionFailure,
    ) -> Result<Option<String>, Self::Error>;

    /// Show a failed attempt and ask whether to try again.
    fn confirm_retry(&self, failure: &SubmissionFailure) -> Result<bool, Self::Error>;

    /// Ask whether to start a fresh intake after a finished one.
    fn confirm_restart(&self) -> Result<bool, Self::Error>;
}
