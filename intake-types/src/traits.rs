use crate::{AnswerStore, NormalizedAnswers};

/// Translates stored answers into the codes a backend contract accepts.
///
/// Implementations are pure: no I/O and no mutation of the store. They must
/// produce a value for every well-formed store, whatever the answer shapes.
/// A front end never sees which implementation is active; the submission
/// pipeline holds one behind `Box<dyn AnswerNormalizer>`.
pub trait AnswerNormalizer: Send + Sync {
    /// Short name of the policy, for logs.
    fn name(&self) -> &'static str;

    /// Build the `answers` object of a submission request.
    fn normalize(&self, answers: &AnswerStore) -> NormalizedAnswers;
}
