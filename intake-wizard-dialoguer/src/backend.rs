//! Dialoguer front end implementation for the IntakeFrontend trait.

use chrono::NaiveDate;
use dialoguer::theme::{ColorfulTheme, SimpleTheme, Theme};
use dialoguer::{Confirm, Input, MultiSelect, Select};
use intake::{
    Answer, FlowError, Gender, Intake, IntakeFrontend, MaritalStatus, Multiplicity, Question,
    Step, SubmissionFailure, UserInfo,
};
use thiserror::Error;

const BACK_LABEL: &str = "← Back";
const BACK_TEXT: &str = "<";
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Error type for the Dialoguer front end.
#[derive(Debug, Error)]
pub enum WizardError {
    /// User cancelled the intake (e.g., pressed Ctrl+C or Escape).
    #[error("Intake cancelled by user")]
    Cancelled,

    /// An I/O error occurred during prompting.
    #[error("Dialoguer error: {0}")]
    Dialoguer(#[from] dialoguer::Error),

    /// The flow controller rejected an input the wizard produced.
    #[error("Flow error: {0}")]
    Flow(#[from] FlowError),
}

/// Helper to check if a dialoguer error is a cancellation (Ctrl+C / Escape)
fn is_cancelled(err: &dialoguer::Error) -> bool {
    matches!(err, dialoguer::Error::IO(io_err) if io_err.kind() == std::io::ErrorKind::Interrupted)
}

fn prompt_error(err: dialoguer::Error) -> WizardError {
    if is_cancelled(&err) {
        WizardError::Cancelled
    } else {
        WizardError::Dialoguer(err)
    }
}

/// Dialoguer wizard for interactive CLI prompts.
///
/// Shows one question at a time; every choice list ends with a "Back" entry
/// and text prompts accept `<` to go back.
#[derive(Debug, Default, Clone)]
pub struct DialoguerWizard {
    /// Use colorful theme for prompts.
    colorful: bool,
}

impl DialoguerWizard {
    /// Create a new wizard with default (colorful) theme.
    pub fn new() -> Self {
        Self { colorful: true }
    }

    /// Create a wizard with plain (no color) theme.
    pub fn plain() -> Self {
        Self { colorful: false }
    }

    fn theme(&self) -> Box<dyn Theme> {
        if self.colorful {
            Box::new(ColorfulTheme::default())
        } else {
            Box::new(SimpleTheme)
        }
    }

    fn ask_text(
        &self,
        prompt: &str,
        default: &str,
        allow_empty: bool,
    ) -> Result<String, WizardError> {
        let theme = self.theme();
        let mut builder = Input::<String>::with_theme(theme.as_ref())
            .with_prompt(prompt)
            .allow_empty(allow_empty);
        if !default.is_empty() {
            builder = builder.default(default.to_string());
        }
        builder.interact_text().map_err(prompt_error)
    }

    fn ask_date(&self, prompt: &str, default: Option<NaiveDate>) -> Result<NaiveDate, WizardError> {
        loop {
            let theme = self.theme();
            let mut builder = Input::<String>::with_theme(theme.as_ref()).with_prompt(prompt);
            if let Some(date) = default {
                builder = builder.default(date.format(DATE_FORMAT).to_string());
            }
            let raw = builder.interact_text().map_err(prompt_error)?;
            match parse_date(&raw) {
                Ok(date) => return Ok(date),
                Err(msg) => println!("Error: {msg}"),
            }
        }
    }

    fn ask_choice(
        &self,
        prompt: &str,
        items: &[&str],
        default: Option<usize>,
    ) -> Result<usize, WizardError> {
        let theme = self.theme();
        let mut builder = Select::with_theme(theme.as_ref())
            .with_prompt(prompt)
            .items(items);
        if let Some(index) = default {
            builder = builder.default(index);
        }
        builder.interact().map_err(prompt_error)
    }

    fn confirm(&self, prompt: &str, default: bool) -> Result<bool, WizardError> {
        let theme = self.theme();
        Confirm::with_theme(theme.as_ref())
            .with_prompt(prompt)
            .default(default)
            .interact()
            .map_err(prompt_error)
    }

    /// Collect personal details until they pass validation.
    fn ask_user_info(&self, intake: &mut Intake) -> Result<(), WizardError> {
        let mut draft = intake.user_info().cloned();

        loop {
            println!();
            println!("Personal details");

            let prev = draft.as_ref();
            let prefill = |field: fn(&UserInfo) -> &str| prev.map_or("", field);

            let full_name = self.ask_text("Full name", prefill(|u| u.full_name.as_str()), false)?;
            let email = self.ask_text("Email address", prefill(|u| u.email.as_str()), false)?;
            let phone = self.ask_text("Phone number", prefill(|u| u.phone.as_str()), false)?;
            let date_of_birth =
                self.ask_date("Date of birth (YYYY-MM-DD)", prev.map(|u| u.date_of_birth))?;

            let genders: Vec<&str> = Gender::ALL.iter().map(Gender::as_str).collect();
            let gender_default =
                prev.and_then(|u| Gender::ALL.iter().position(|g| *g == u.gender));
            let gender = Gender::ALL[self.ask_choice("Gender", &genders, gender_default)?];

            let occupation =
                self.ask_text("Occupation", prefill(|u| u.occupation.as_str()), false)?;
            let nationality =
                self.ask_text("Nationality", prefill(|u| u.nationality.as_str()), false)?;
            let state_of_residence = self.ask_text(
                "State of residence",
                prefill(|u| u.state_of_residence.as_str()),
                false,
            )?;

            let statuses: Vec<&str> =
                MaritalStatus::ALL.iter().map(MaritalStatus::as_str).collect();
            let status_default = prev.and_then(|u| {
                MaritalStatus::ALL
                    .iter()
                    .position(|s| *s == u.marital_status)
            });
            let marital_status =
                MaritalStatus::ALL[self.ask_choice("Marital status", &statuses, status_default)?];

            let info = UserInfo {
                full_name,
                email,
                phone,
                date_of_birth,
                gender,
                occupation,
                nationality,
                state_of_residence,
                marital_status,
            };

            match intake.submit_user_info(info.clone()) {
                Ok(_) => return Ok(()),
                Err(FlowError::InvalidUserInfo(errors)) => {
                    for error in &errors.errors {
                        println!("Error: {}: {}", error.field.name(), error.message);
                    }
                    draft = Some(info);
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// Show the question at `index` and apply the answer.
    fn ask_question(&self, intake: &mut Intake, index: usize) -> Result<(), WizardError> {
        let catalog = intake.catalog();
        let section = catalog.section_of(index);
        if section.position == 0 {
            let count = catalog.questions_in_section(section.number).len();
            let heading = match section.title {
                Some(title) => format!("Section {}: {title}", section.number),
                None => format!("Section {}", section.number),
            };
            println!();
            println!("{heading} ({count} questions)");
        }

        let question = catalog.question_at(index).clone();
        let prompt = match intake.progress() {
            Some((position, total)) => {
                format!("[{position}/{total}] {}", question.prompt())
            }
            None => question.prompt().to_string(),
        };

        let went_back = match question.multiplicity() {
            Multiplicity::Single => self.ask_single(intake, &question, &prompt)?,
            Multiplicity::Multi => self.ask_multi(intake, &question, &prompt)?,
            Multiplicity::Text => self.ask_free_text(intake, &question, &prompt)?,
        };

        let transition = if went_back {
            intake.back()
        } else {
            intake.advance()
        };
        if !transition.moved() {
            println!("Error: Please complete this question before continuing.");
        }
        Ok(())
    }

    /// Returns `true` when the respondent chose to go back.
    fn ask_single(
        &self,
        intake: &mut Intake,
        question: &Question,
        prompt: &str,
    ) -> Result<bool, WizardError> {
        let mut items: Vec<&str> = question.options().iter().map(|o| o.label.as_str()).collect();
        items.push(BACK_LABEL);

        let default = intake.current_answer().and_then(|answer| {
            question.options().iter().position(|o| match answer {
                Answer::Single(selection) if selection.is_other() => {
                    question.is_other_value(&o.value)
                }
                other => other.has_plain(&o.value),
            })
        });

        let choice = self.ask_choice(prompt, &items, default)?;
        let Some(option) = question.options().get(choice) else {
            return Ok(true);
        };

        intake.select(&option.value)?;
        if question.is_other_value(&option.value) {
            self.ask_other_text(intake)?;
        }
        Ok(false)
    }

    /// Returns `true` when the respondent chose to go back.
    fn ask_multi(
        &self,
        intake: &mut Intake,
        question: &Question,
        prompt: &str,
    ) -> Result<bool, WizardError> {
        let mut items: Vec<&str> = question.options().iter().map(|o| o.label.as_str()).collect();
        items.push(BACK_LABEL);

        let mut defaults = selected_flags(question, intake.current_answer());
        defaults.push(false);

        let theme = self.theme();
        let chosen = MultiSelect::with_theme(theme.as_ref())
            .with_prompt(format!("{prompt} (space to toggle, enter to confirm)"))
            .items(&items)
            .defaults(&defaults)
            .interact()
            .map_err(prompt_error)?;

        if chosen.contains(&question.options().len()) {
            return Ok(true);
        }

        for value in toggles_for(question, intake.current_answer(), &chosen) {
            intake.toggle(&value)?;
        }
        if intake.current_answer().and_then(Answer::other).is_some() {
            self.ask_other_text(intake)?;
        }
        Ok(false)
    }

    /// Returns `true` when the respondent typed `<`.
    fn ask_free_text(
        &self,
        intake: &mut Intake,
        question: &Question,
        prompt: &str,
    ) -> Result<bool, WizardError> {
        let current = intake
            .current_answer()
            .and_then(Answer::as_text)
            .unwrap_or_default()
            .to_string();
        let hint = if question.is_optional() {
            format!("{prompt} (optional, '{BACK_TEXT}' to go back)")
        } else {
            format!("{prompt} ('{BACK_TEXT}' to go back)")
        };

        let text = self.ask_text(&hint, &current, question.is_optional())?;
        if text.trim() == BACK_TEXT {
            return Ok(true);
        }
        intake.enter_text(&text)?;
        Ok(false)
    }

    fn ask_other_text(&self, intake: &mut Intake) -> Result<(), WizardError> {
        let draft = intake.other_text().to_string();
        let text = self.ask_text("Please specify", &draft, false)?;
        intake.enter_other_text(text.trim())?;
        Ok(())
    }
}

/// Which options of `question` the stored answer currently selects.
fn selected_flags(question: &Question, answer: Option<&Answer>) -> Vec<bool> {
    question
        .options()
        .iter()
        .map(|o| match answer {
            Some(answer) if question.is_other_value(&o.value) => answer.other().is_some(),
            Some(answer) => answer.has_plain(&o.value),
            None => false,
        })
        .collect()
}

/// Option values to toggle so the answer matches the `chosen` option indices.
fn toggles_for(question: &Question, answer: Option<&Answer>, chosen: &[usize]) -> Vec<String> {
    selected_flags(question, answer)
        .into_iter()
        .zip(question.options())
        .enumerate()
        .filter(|(index, (selected, _))| *selected != chosen.contains(index))
        .map(|(_, (_, option))| option.value.clone())
        .collect()
}

fn parse_date(input: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(input.trim(), DATE_FORMAT)
        .map_err(|_| "Please enter a date as YYYY-MM-DD".to_string())
}

impl IntakeFrontend for DialoguerWizard {
    type Error = WizardError;

    fn fill(&self, intake: &mut Intake) -> Result<(), Self::Error> {
        // Show prelude if present
        if intake.step() == Step::UserInfo
            && let Some(prelude) = &intake.catalog().prelude
        {
            println!("{prelude}");
        }

        loop {
            match intake.step() {
                Step::UserInfo => self.ask_user_info(intake)?,
                Step::Question(index) => self.ask_question(intake, index)?,
                Step::Complete => break,
            }
        }

        // Show epilogue if present
        if let Some(epilogue) = &intake.catalog().epilogue {
            println!();
            println!("{epilogue}");
        }
        Ok(())
    }

    fn ask_new_email(
        &self,
        current: &str,
        failure: &SubmissionFailure,
    ) -> Result<Option<String>, Self::Error> {
        println!();
        println!("Account already exists: {}", failure.message);
        if !self.confirm("Use a different email address?", true)? {
            return Ok(None);
        }
        let email = self.ask_text("New email address", current, false)?;
        let email = email.trim();
        Ok((email != current).then(|| email.to_string()))
    }

    fn confirm_retry(&self, failure: &SubmissionFailure) -> Result<bool, Self::Error> {
        println!();
        println!("Submission failed: {}", failure.message);
        self.confirm("Try again?", true)
    }

    fn confirm_restart(&self) -> Result<bool, Self::Error> {
        println!();
        self.confirm("Start a new intake?", false)
    }
}

#[cfg(test)]
mod tests {
    use intake::Selection;

    use super::*;

    fn funds() -> Question {
        Question::multi("funds", "Source of funds?", 1)
            .with_option("salary", "Salary")
            .with_option("rental", "Rental income")
            .with_other("other", "Other")
    }

    #[test]
    fn wizard_creation() {
        let _wizard = DialoguerWizard::new();
        let _plain = DialoguerWizard::plain();
    }

    #[test]
    fn error_types() {
        let err = WizardError::Cancelled;
        assert_eq!(err.to_string(), "Intake cancelled by user");

        let err = WizardError::Flow(FlowError::NoOtherOption("Q1".into()));
        assert_eq!(err.to_string(), "Flow error: Question 'Q1' has no OTHER option");
    }

    #[test]
    fn flags_follow_stored_answer() {
        let answer = Answer::Multi(vec![Selection::plain("rental"), Selection::other("gifts")]);
        assert_eq!(selected_flags(&funds(), Some(&answer)), [false, true, true]);
        assert_eq!(selected_flags(&funds(), None), [false, false, false]);
    }

    #[test]
    fn toggles_only_changed_options() {
        let answer = Answer::Multi(vec![Selection::plain("rental"), Selection::other("gifts")]);
        assert_eq!(
            toggles_for(&funds(), Some(&answer), &[0, 1]),
            ["salary".to_string(), "other".to_string()]
        );
        assert!(toggles_for(&funds(), Some(&answer), &[1, 2]).is_empty());
    }

    #[test]
    fn dates_parse() {
        assert_eq!(
            parse_date(" 1985-03-14 "),
            Ok(NaiveDate::from_ymd_opt(1985, 3, 14).unwrap())
        );
        assert!(parse_date("14/03/1985").is_err());
    }
}
