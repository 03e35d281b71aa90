/// Separator between the OTHER marker and its free text in the legacy string
/// encoding, e.g. `"other:crypto gains"`.
pub const OTHER_SEPARATOR: char = ':';

/// One chosen option of a SINGLE or MULTI question.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Selection {
    /// A regular option, identified by its option value.
    Plain(String),

    /// The question's OTHER option together with the respondent's free text.
    /// The text is empty until the respondent types something.
    Other(String),
}

impl Selection {
    /// Create a plain selection.
    pub fn plain(value: impl Into<String>) -> Self {
        Self::Plain(value.into())
    }

    /// Create an OTHER selection with the given free text.
    pub fn other(text: impl Into<String>) -> Self {
        Self::Other(text.into())
    }

    /// Check if this is the OTHER selection.
    pub fn is_other(&self) -> bool {
        matches!(self, Self::Other(_))
    }

    /// The free text of an OTHER selection.
    pub fn other_text(&self) -> Option<&str> {
        match self {
            Self::Other(text) => Some(text),
            Self::Plain(_) => None,
        }
    }

    /// Encode into the legacy single-string form.
    ///
    /// `Plain(c)` becomes `c`, `Other("")` becomes the bare marker and
    /// `Other(t)` becomes `marker:t`.
    pub fn encode(&self, other_marker: &str) -> String {
        match self {
            Self::Plain(value) => value.clone(),
            Self::Other(text) if text.is_empty() => other_marker.to_string(),
            Self::Other(text) => format!("{other_marker}{OTHER_SEPARATOR}{text}"),
        }
    }

    /// Decode the legacy single-string form produced by [`Selection::encode`].
    ///
    /// The text after the separator is kept verbatim, whitespace included.
    pub fn decode(raw: &str, other_marker: &str) -> Self {
        if raw == other_marker {
            return Self::Other(String::new());
        }
        match raw
            .strip_prefix(other_marker)
            .and_then(|rest| rest.strip_prefix(OTHER_SEPARATOR))
        {
            Some(text) => Self::Other(text.to_string()),
            None => Self::Plain(raw.to_string()),
        }
    }
}

/// A stored answer for one question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    /// The answer to a SINGLE question.
    Single(Selection),

    /// The answers to a MULTI question, in the order they were picked.
    Multi(Vec<Selection>),

    /// The answer to a TEXT question.
    Text(String),
}

impl Answer {
    /// All selections of this answer (empty for text answers).
    pub fn selections(&self) -> &[Selection] {
        match self {
            Self::Single(selection) => std::slice::from_ref(selection),
            Self::Multi(selections) => selections,
            Self::Text(_) => &[],
        }
    }

    /// The OTHER selection of this answer, if any.
    pub fn other(&self) -> Option<&Selection> {
        self.selections().iter().find(|s| s.is_other())
    }

    /// The free text attached to the OTHER selection, if any.
    pub fn other_text(&self) -> Option<&str> {
        self.other().and_then(Selection::other_text)
    }

    /// Check if a plain option with the given value is selected.
    pub fn has_plain(&self, value: &str) -> bool {
        self.selections()
            .iter()
            .any(|s| matches!(s, Selection::Plain(v) if v == value))
    }

    /// Try to get this answer as text.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Check if the answer carries nothing (no selection or blank text).
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Single(_) => false,
            Self::Multi(selections) => selections.is_empty(),
            Self::Text(text) => text.trim().is_empty(),
        }
    }

    /// Encode every selection (or the text) into the legacy string form.
    pub fn encode(&self, other_marker: &str) -> Vec<String> {
        match self {
            Self::Text(text) => vec![text.clone()],
            _ => self
                .selections()
                .iter()
                .map(|s| s.encode(other_marker))
                .collect(),
        }
    }
}

impl From<Selection> for Answer {
    fn from(selection: Selection) -> Self {
        Self::Single(selection)
    }
}

impl From<Vec<Selection>> for Answer {
    fn from(selections: Vec<Selection>) -> Self {
        Self::Multi(selections)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_other_without_text_is_bare_marker() {
        assert_eq!(Selection::other("").encode("other"), "other");
    }

    #[test]
    fn encode_other_with_text() {
        assert_eq!(
            Selection::other("crypto gains").encode("other"),
            "other:crypto gains"
        );
    }

    #[test]
    fn decode_round_trips_encode() {
        for selection in [
            Selection::plain("salary"),
            Selection::other(""),
            Selection::other("crypto gains"),
            Selection::other(" crypto gains"),
            Selection::other("gains  "),
            Selection::other(" "),
            Selection::other("a: b"),
        ] {
            let raw = selection.encode("other");
            assert_eq!(Selection::decode(&raw, "other"), selection);
        }
    }

    #[test]
    fn decode_keeps_text_verbatim() {
        assert_eq!(
            Selection::decode("other: inheritance", "other"),
            Selection::other(" inheritance")
        );
    }

    #[test]
    fn decode_does_not_treat_prefix_lookalikes_as_other() {
        assert_eq!(
            Selection::decode("otherwise", "other"),
            Selection::plain("otherwise")
        );
    }

    #[test]
    fn multi_answer_other_text() {
        let answer = Answer::Multi(vec![Selection::plain("salary"), Selection::other("gift")]);
        assert_eq!(answer.other_text(), Some("gift"));
        assert!(answer.has_plain("salary"));
        assert!(!answer.has_plain("rental"));
    }

    #[test]
    fn blank_answers() {
        assert!(Answer::Multi(vec![]).is_blank());
        assert!(Answer::Text("   ".into()).is_blank());
        assert!(!Answer::Single(Selection::plain("A")).is_blank());
    }
}
