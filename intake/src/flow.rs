//! Step flow controller.
//!
//! `Intake` walks a respondent through `UserInfo -> Question(0..N) -> Complete`
//! and owns the `AnswerStore`. Input handlers only ever touch the answer of the
//! question currently on screen.

use chrono::NaiveDate;
use intake_types::{
    Answer, AnswerStore, Catalog, Multiplicity, Question, QuestionId, Selection, UserInfo,
    UserInfoErrors,
};
use tracing::debug;

/// Where the respondent currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Collecting personal details.
    UserInfo,

    /// Showing the question at this catalog index.
    Question(usize),

    /// All questions answered; submission happens here.
    Complete,
}

/// Result of a navigation request.
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// The flow moved to a new step.
    Moved(Step),

    /// The request was not allowed; the flow is still at this step.
    Stayed(Step),
}

impl Transition {
    /// The step after the request.
    pub fn step(&self) -> Step {
        match self {
            Self::Moved(step) | Self::Stayed(step) => *step,
        }
    }

    /// Check if the flow moved.
    pub fn moved(&self) -> bool {
        matches!(self, Self::Moved(_))
    }
}

/// Misuse of the flow controller.
#[derive(Debug, thiserror::Error)]
pub enum FlowError {
    #[error("Expected the {expected} step, but the intake is at {actual:?}")]
    WrongStep { expected: &'static str, actual: Step },

    #[error(transparent)]
    InvalidUserInfo(#[from] UserInfoErrors),

    #[error("Question '{id}' is {actual}, but this input needs a {expected} question")]
    MultiplicityMismatch {
        id: QuestionId,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("Question '{id}' has no option '{value}'")]
    UnknownOption { id: QuestionId, value: String },

    #[error("Question '{0}' has no OTHER option")]
    NoOtherOption(QuestionId),
}

/// What the submission pipeline reads: personal details plus answers.
#[derive(Debug, Clone, Copy)]
pub struct SubmissionInput<'a> {
    pub user_info: &'a UserInfo,
    pub answers: &'a AnswerStore,
}

/// The questionnaire state machine for one session.
#[derive(Debug, Clone)]
pub struct Intake {
    catalog: Catalog,
    store: AnswerStore,
    step: Step,
    /// Free text shown in the OTHER box of the current question.
    other_draft: String,
    /// Set on entering `Complete`, consumed by `begin_submission_once`.
    submission_armed: bool,
}

impl Intake {
    /// Start a new intake at the personal-details step.
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog,
            store: AnswerStore::new(),
            step: Step::UserInfo,
            other_draft: String::new(),
            submission_armed: false,
        }
    }

    /// Pick up a previously exported intake.
    ///
    /// The flow starts at the personal-details step with `user_info` as the
    /// prefill. Every step is still checked again on the way to `Complete`.
    pub fn resume(catalog: Catalog, user_info: UserInfo, answers: AnswerStore) -> Self {
        let mut store = answers;
        store.set_user_info(user_info);
        Self {
            catalog,
            store,
            step: Step::UserInfo,
            other_draft: String::new(),
            submission_armed: false,
        }
    }

    /// Get the catalog.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Get the answer store.
    pub fn store(&self) -> &AnswerStore {
        &self.store
    }

    /// Check if answers changed since they were last handed to submission.
    pub fn has_unsubmitted_changes(&self) -> bool {
        self.store.is_dirty()
    }

    /// Get the current step.
    pub fn step(&self) -> Step {
        self.step
    }

    /// The personal details collected so far (also used as prefill).
    pub fn user_info(&self) -> Option<&UserInfo> {
        self.store.user_info()
    }

    /// The question on screen, if the flow is at a question step.
    pub fn current_question(&self) -> Option<&Question> {
        match self.step {
            Step::Question(index) => Some(self.catalog.question_at(index)),
            _ => None,
        }
    }

    /// The stored answer of the question on screen.
    pub fn current_answer(&self) -> Option<&Answer> {
        self.current_question()
            .and_then(|question| self.store.get(question.id()))
    }

    /// One-based position and total, e.g. `(3, 16)` for "Question 3 of 16".
    pub fn progress(&self) -> Option<(usize, usize)> {
        match self.step {
            Step::Question(index) => Some((index + 1, self.catalog.question_count())),
            _ => None,
        }
    }

    /// Free text to display in the OTHER box of the current question.
    pub fn other_text(&self) -> &str {
        &self.other_draft
    }

    /// Store personal details and move on to the first question.
    pub fn submit_user_info(&mut self, info: UserInfo) -> Result<Transition, FlowError> {
        self.submit_user_info_on(info, chrono::Local::now().date_naive())
    }

    /// Like [`Intake::submit_user_info`], with an explicit date for the age check.
    pub fn submit_user_info_on(
        &mut self,
        info: UserInfo,
        today: NaiveDate,
    ) -> Result<Transition, FlowError> {
        if self.step != Step::UserInfo {
            return Err(FlowError::WrongStep {
                expected: "personal details",
                actual: self.step,
            });
        }
        info.validate_on(today)?;
        self.store.set_user_info(info);

        let next = if self.catalog.is_empty() {
            Step::Complete
        } else {
            Step::Question(0)
        };
        Ok(self.move_to(next))
    }

    /// Pick an option of the current SINGLE question.
    ///
    /// Picking the OTHER option keeps any text already typed for it; picking
    /// a regular option drops it.
    pub fn select(&mut self, value: &str) -> Result<(), FlowError> {
        let question = self.active_question(Multiplicity::Single)?;
        let id = question.id().clone();
        let selection = match checked_selection(question, value)? {
            Selection::Other(_) => match self.store.get(&id) {
                Some(Answer::Single(Selection::Other(text))) => Selection::Other(text.clone()),
                _ => Selection::Other(String::new()),
            },
            plain => plain,
        };

        self.other_draft = selection.other_text().unwrap_or_default().to_string();
        self.store.set(id, Answer::Single(selection));
        Ok(())
    }

    /// Toggle an option of the current MULTI question.
    ///
    /// Toggling OTHER on reattaches the text currently in the OTHER box, so
    /// toggling any option twice restores the previous selection set.
    pub fn toggle(&mut self, value: &str) -> Result<(), FlowError> {
        let question = self.active_question(Multiplicity::Multi)?;
        let id = question.id().clone();
        let toggled = checked_selection(question, value)?;
        let mut selections = match self.store.get(&id) {
            Some(Answer::Multi(selections)) => selections.clone(),
            _ => Vec::new(),
        };

        let existing = selections.iter().position(|s| match (&toggled, s) {
            (Selection::Other(_), Selection::Other(_)) => true,
            (Selection::Plain(wanted), Selection::Plain(have)) => wanted == have,
            _ => false,
        });
        match (existing, toggled) {
            (Some(position), _) => {
                selections.remove(position);
            }
            (None, Selection::Other(_)) => {
                selections.push(Selection::Other(self.other_draft.clone()));
            }
            (None, plain) => selections.push(plain),
        }

        self.store.set(id, Answer::Multi(selections));
        Ok(())
    }

    /// Type into the OTHER box of the current question.
    ///
    /// This also selects OTHER if it was not selected yet.
    pub fn enter_other_text(&mut self, text: &str) -> Result<(), FlowError> {
        let question = self.current_question_or_err()?;
        let id = question.id().clone();
        if question.other_marker().is_none() {
            return Err(FlowError::NoOtherOption(id));
        }

        let answer = match question.multiplicity() {
            Multiplicity::Multi => {
                let mut selections = match self.store.get(&id) {
                    Some(Answer::Multi(selections)) => selections.clone(),
                    _ => Vec::new(),
                };
                match selections.iter_mut().find(|s| s.is_other()) {
                    Some(other) => *other = Selection::other(text),
                    None => selections.push(Selection::other(text)),
                }
                Answer::Multi(selections)
            }
            _ => Answer::Single(Selection::other(text)),
        };

        self.other_draft = text.to_string();
        self.store.set(id, answer);
        Ok(())
    }

    /// Answer the current TEXT question.
    pub fn enter_text(&mut self, text: &str) -> Result<(), FlowError> {
        let id = self.active_question(Multiplicity::Text)?.id().clone();
        self.store.set(id, Answer::Text(text.to_string()));
        Ok(())
    }

    /// Check the completion predicate of the question on screen.
    pub fn is_current_complete(&self) -> bool {
        self.current_question()
            .is_some_and(|question| question.is_satisfied_by(self.store.get(question.id())))
    }

    /// Move to the next question, or to `Complete` after the last one.
    ///
    /// Does nothing unless the current answer satisfies its completion predicate.
    pub fn advance(&mut self) -> Transition {
        let Step::Question(index) = self.step else {
            return Transition::Stayed(self.step);
        };
        if !self.is_current_complete() {
            debug!(index, "advance blocked: answer incomplete");
            return Transition::Stayed(self.step);
        }

        let next = if index + 1 >= self.catalog.question_count() {
            Step::Complete
        } else {
            Step::Question(index + 1)
        };
        self.move_to(next)
    }

    /// Go back one question, or to the personal details from the first one.
    ///
    /// Answers are kept.
    pub fn back(&mut self) -> Transition {
        match self.step {
            Step::Question(0) => self.move_to(Step::UserInfo),
            Step::Question(index) => self.move_to(Step::Question(index - 1)),
            other => Transition::Stayed(other),
        }
    }

    /// Throw away all answers and personal details and start again.
    pub fn restart(&mut self) -> Transition {
        self.store.reset();
        self.submission_armed = false;
        self.move_to(Step::UserInfo)
    }

    /// Hand out the submission input exactly once per entry into `Complete`.
    ///
    /// The flag is checked and cleared in this one call, so repeated redraws
    /// of the completion screen cannot trigger a second automatic submission.
    pub fn begin_submission_once(&mut self) -> Option<SubmissionInput<'_>> {
        if self.step != Step::Complete || !self.submission_armed {
            return None;
        }
        self.submission_armed = false;
        self.store.mark_clean();
        self.submission_input()
    }

    /// Fresh read of personal details and answers, available at `Complete`.
    pub fn submission_input(&self) -> Option<SubmissionInput<'_>> {
        if self.step != Step::Complete {
            return None;
        }
        self.store.user_info().map(|user_info| SubmissionInput {
            user_info,
            answers: &self.store,
        })
    }

    /// Replace the email after the backend reported it as already registered.
    pub(crate) fn correct_email(&mut self, email: &str) -> Result<(), FlowError> {
        if self.step != Step::Complete {
            return Err(FlowError::WrongStep {
                expected: "complete",
                actual: self.step,
            });
        }
        let Some(current) = self.store.user_info() else {
            return Err(FlowError::WrongStep {
                expected: "personal details",
                actual: self.step,
            });
        };
        let corrected = UserInfo {
            email: email.trim().to_string(),
            ..current.clone()
        };
        corrected.validate()?;
        self.store.set_user_info(corrected);
        Ok(())
    }

    fn move_to(&mut self, step: Step) -> Transition {
        debug!(from = ?self.step, to = ?step, "intake transition");
        self.step = step;
        match step {
            Step::Question(index) => {
                // Rehydrate the OTHER box from the stored answer.
                let id = self.catalog.question_at(index).id();
                self.other_draft = self
                    .store
                    .get(id)
                    .and_then(Answer::other_text)
                    .unwrap_or_default()
                    .to_string();
            }
            Step::Complete => self.submission_armed = true,
            Step::UserInfo => self.other_draft.clear(),
        }
        Transition::Moved(step)
    }

    fn current_question_or_err(&self) -> Result<&Question, FlowError> {
        match self.step {
            Step::Question(index) => Ok(self.catalog.question_at(index)),
            actual => Err(FlowError::WrongStep {
                expected: "question",
                actual,
            }),
        }
    }

    fn active_question(&self, expected: Multiplicity) -> Result<&Question, FlowError> {
        let question = self.current_question_or_err()?;
        if question.multiplicity() != expected {
            return Err(FlowError::MultiplicityMismatch {
                id: question.id().clone(),
                expected: expected.name(),
                actual: question.multiplicity().name(),
            });
        }
        Ok(question)
    }
}

fn checked_selection(question: &Question, value: &str) -> Result<Selection, FlowError> {
    if question.option(value).is_none() {
        return Err(FlowError::UnknownOption {
            id: question.id().clone(),
            value: value.to_string(),
        });
    }
    Ok(question.selection_for(value))
}
