use crate::{Answer, NormalizedValue, QuestionId, Selection};

/// How many answers a question accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Multiplicity {
    /// Pick exactly one option.
    Single,

    /// Pick any number of options.
    Multi,

    /// Free-form text, no options.
    Text,
}

impl Multiplicity {
    /// Check if questions of this multiplicity are answered by picking options.
    pub fn has_options(&self) -> bool {
        matches!(self, Self::Single | Self::Multi)
    }

    /// Get the name of this multiplicity for error messages.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Single => "Single",
            Self::Multi => "Multi",
            Self::Text => "Text",
        }
    }
}

/// One option of a SINGLE or MULTI question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionChoice {
    /// The code stored in answers and sent to the backend.
    pub value: String,

    /// The label shown to the respondent.
    pub label: String,
}

impl OptionChoice {
    /// Create a new option.
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// A single question in the intake catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct Question {
    /// Unique id, also the key in the answer store.
    id: QuestionId,

    /// The prompt text shown to the user.
    prompt: String,

    /// Section this question belongs to (1-based).
    section: u32,

    /// Options to choose from; empty for text questions.
    options: Vec<OptionChoice>,

    /// Whether one, many or free text is accepted.
    multiplicity: Multiplicity,

    /// Whether the respondent may move on without answering.
    optional: bool,

    /// Value of the option that requires accompanying free text.
    other: Option<String>,
}

impl Question {
    /// Create a new question with no options.
    pub fn new(
        id: impl Into<QuestionId>,
        prompt: impl Into<String>,
        section: u32,
        multiplicity: Multiplicity,
    ) -> Self {
        Self {
            id: id.into(),
            prompt: prompt.into(),
            section,
            options: Vec::new(),
            multiplicity,
            optional: false,
            other: None,
        }
    }

    /// Create a single-select question.
    pub fn single(id: impl Into<QuestionId>, prompt: impl Into<String>, section: u32) -> Self {
        Self::new(id, prompt, section, Multiplicity::Single)
    }

    /// Create a multi-select question.
    pub fn multi(id: impl Into<QuestionId>, prompt: impl Into<String>, section: u32) -> Self {
        Self::new(id, prompt, section, Multiplicity::Multi)
    }

    /// Create a free-text question.
    pub fn text(id: impl Into<QuestionId>, prompt: impl Into<String>, section: u32) -> Self {
        Self::new(id, prompt, section, Multiplicity::Text)
    }

    /// Append an option.
    pub fn with_option(mut self, value: impl Into<String>, label: impl Into<String>) -> Self {
        self.options.push(OptionChoice::new(value, label));
        self
    }

    /// Append the OTHER option and designate it as such.
    pub fn with_other(mut self, value: impl Into<String>, label: impl Into<String>) -> Self {
        let value = value.into();
        self.other = Some(value.clone());
        self.options.push(OptionChoice::new(value, label));
        self
    }

    /// Mark the question as optional.
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Get the question id.
    pub fn id(&self) -> &QuestionId {
        &self.id
    }

    /// Get the prompt text.
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// Get the section number.
    pub fn section(&self) -> u32 {
        self.section
    }

    /// Get the options.
    pub fn options(&self) -> &[OptionChoice] {
        &self.options
    }

    /// Get the multiplicity.
    pub fn multiplicity(&self) -> Multiplicity {
        self.multiplicity
    }

    /// Check if the question may be skipped.
    pub fn is_optional(&self) -> bool {
        self.optional
    }

    /// The OTHER marker value, if this question has one.
    pub fn other_marker(&self) -> Option<&str> {
        self.other.as_deref()
    }

    /// Find an option by value.
    pub fn option(&self, value: &str) -> Option<&OptionChoice> {
        self.options.iter().find(|o| o.value == value)
    }

    /// Check if `value` is this question's OTHER marker.
    pub fn is_other_value(&self, value: &str) -> bool {
        self.other.as_deref() == Some(value)
    }

    /// Turn a raw option value into a selection (the OTHER marker starts with no text).
    pub fn selection_for(&self, value: &str) -> Selection {
        if self.is_other_value(value) {
            Selection::Other(String::new())
        } else {
            Selection::Plain(value.to_string())
        }
    }

    /// Check if `selection` names one of this question's options.
    pub fn accepts(&self, selection: &Selection) -> bool {
        match selection {
            Selection::Plain(value) => self.option(value).is_some() && !self.is_other_value(value),
            Selection::Other(_) => self.other.is_some(),
        }
    }

    /// Read back an answer written in the legacy string encoding.
    ///
    /// Returns `None` when the value does not fit this question: the wrong
    /// shape, an unknown option, a repeated option, or OTHER text on a
    /// question without an OTHER option.
    pub fn decode_answer(&self, value: &NormalizedValue) -> Option<Answer> {
        let decode = |raw: &str| match self.other_marker() {
            Some(marker) => Selection::decode(raw, marker),
            None => Selection::plain(raw),
        };
        let answer = match self.multiplicity {
            Multiplicity::Single => Answer::Single(decode(value.as_one()?)),
            Multiplicity::Multi => Answer::Multi(
                value
                    .as_many()?
                    .iter()
                    .map(|raw| decode(raw.as_str()))
                    .collect(),
            ),
            Multiplicity::Text => return Some(Answer::Text(value.as_one()?.to_string())),
        };

        let selections = answer.selections();
        let distinct = selections
            .iter()
            .enumerate()
            .all(|(i, s)| !selections[..i].contains(s))
            && selections.iter().filter(|s| s.is_other()).count() <= 1;
        (distinct && selections.iter().all(|s| self.accepts(s))).then_some(answer)
    }

    /// Completion predicate: may the respondent move past this question?
    pub fn is_satisfied_by(&self, answer: Option<&Answer>) -> bool {
        if self.optional {
            return true;
        }
        let other_filled = |selection: &Selection| match selection {
            Selection::Other(text) => !text.trim().is_empty(),
            Selection::Plain(_) => true,
        };
        match (self.multiplicity, answer) {
            (Multiplicity::Single, Some(Answer::Single(selection))) => other_filled(selection),
            (Multiplicity::Multi, Some(Answer::Multi(selections))) => {
                !selections.is_empty() && selections.iter().all(other_filled)
            }
            (Multiplicity::Text, Some(Answer::Text(text))) => !text.trim().is_empty(),
            _ => false,
        }
    }

    /// Display label for a selection, e.g. `"Salary"` or `"Other: crypto gains"`.
    pub fn label_for(&self, selection: &Selection) -> String {
        match selection {
            Selection::Plain(value) => self
                .option(value)
                .map(|o| o.label.clone())
                .unwrap_or_else(|| value.clone()),
            Selection::Other(text) if text.trim().is_empty() => {
                "Other: (not specified)".to_string()
            }
            Selection::Other(text) => format!("Other: {}", text.trim()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source_of_funds() -> Question {
        Question::multi("Q15", "Source of funds", 3)
            .with_option("salary", "Salary")
            .with_option("business", "Business income")
            .with_other("other", "Other (free text)")
    }

    #[test]
    fn with_other_designates_marker() {
        let q = source_of_funds();
        assert_eq!(q.other_marker(), Some("other"));
        assert_eq!(q.options().len(), 3);
        assert_eq!(q.selection_for("other"), Selection::other(""));
        assert_eq!(q.selection_for("salary"), Selection::plain("salary"));
    }

    #[test]
    fn optional_is_always_satisfied() {
        let q = Question::text("Q16", "Notes", 3).optional();
        assert!(q.is_satisfied_by(None));
    }

    #[test]
    fn single_requires_other_text() {
        let q = Question::single("Q1", "Pick", 1)
            .with_option("A", "a")
            .with_other("other", "Other");
        assert!(!q.is_satisfied_by(None));
        assert!(q.is_satisfied_by(Some(&Answer::Single(Selection::plain("A")))));
        assert!(!q.is_satisfied_by(Some(&Answer::Single(Selection::other(" ")))));
        assert!(q.is_satisfied_by(Some(&Answer::Single(Selection::other("x")))));
    }

    #[test]
    fn empty_multi_is_not_satisfied() {
        let q = source_of_funds();
        assert!(!q.is_satisfied_by(Some(&Answer::Multi(vec![]))));
        assert!(!q.is_satisfied_by(Some(&Answer::Multi(vec![Selection::other("")]))));
        assert!(q.is_satisfied_by(Some(&Answer::Multi(vec![
            Selection::plain("salary"),
            Selection::other("gift"),
        ]))));
    }

    #[test]
    fn text_requires_non_blank() {
        let q = Question::text("Q16", "Notes", 3);
        assert!(!q.is_satisfied_by(Some(&Answer::Text("   ".into()))));
        assert!(q.is_satisfied_by(Some(&Answer::Text("hello".into()))));
    }

    #[test]
    fn answer_of_wrong_kind_is_not_satisfied() {
        let q = source_of_funds();
        assert!(!q.is_satisfied_by(Some(&Answer::Single(Selection::plain("salary")))));
    }

    #[test]
    fn labels() {
        let q = source_of_funds();
        assert_eq!(q.label_for(&Selection::plain("salary")), "Salary");
        assert_eq!(q.label_for(&Selection::plain("unknown")), "unknown");
        assert_eq!(q.label_for(&Selection::other("")), "Other: (not specified)");
        assert_eq!(q.label_for(&Selection::other(" gift ")), "Other: gift");
    }

    #[test]
    fn decode_answer_restores_other_text() {
        let q = source_of_funds();
        let value = NormalizedValue::Many(vec!["salary".into(), "other: crypto gains".into()]);
        assert_eq!(
            q.decode_answer(&value),
            Some(Answer::Multi(vec![
                Selection::plain("salary"),
                Selection::other(" crypto gains")
            ]))
        );
        assert_eq!(
            q.decode_answer(&NormalizedValue::Many(vec![])),
            Some(Answer::Multi(vec![]))
        );
    }

    #[test]
    fn decode_answer_rejects_what_the_question_cannot_hold() {
        let q = source_of_funds();
        assert_eq!(q.decode_answer(&"salary".into()), None);
        assert_eq!(
            q.decode_answer(&NormalizedValue::Many(vec!["ZZZ".into()])),
            None
        );
        assert_eq!(
            q.decode_answer(&NormalizedValue::Many(vec!["salary".into(), "salary".into()])),
            None
        );
        assert_eq!(
            q.decode_answer(&NormalizedValue::Many(vec!["other:a".into(), "other:b".into()])),
            None
        );

        let single = Question::single("Q1", "Pick", 1).with_option("A", "a");
        assert_eq!(
            single.decode_answer(&"A".into()),
            Some(Answer::Single(Selection::plain("A")))
        );
        assert_eq!(single.decode_answer(&"other:x".into()), None);

        let notes = Question::text("Q16", "Notes", 3);
        assert_eq!(
            notes.decode_answer(&" call after 5pm ".into()),
            Some(Answer::Text(" call after 5pm ".into()))
        );
    }
}
