use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a catalog question, e.g. `"Q15"`.
///
/// Used as the key in the `AnswerStore` and in the normalized wire answers.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestionId {
    id: String,
}

impl QuestionId {
    /// Create a new question id.
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }

    /// Get the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.id
    }

    /// Check if the id is empty.
    pub fn is_empty(&self) -> bool {
        self.id.is_empty()
    }
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

impl From<&str> for QuestionId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for QuestionId {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&String> for QuestionId {
    fn from(s: &String) -> Self {
        Self::new(s.clone())
    }
}

impl From<&QuestionId> for QuestionId {
    fn from(id: &QuestionId) -> Self {
        id.clone()
    }
}

impl AsRef<str> for QuestionId {
    fn as_ref(&self) -> &str {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new() {
        let id = QuestionId::new("Q1");
        assert_eq!(id.as_str(), "Q1");
    }

    #[test]
    fn display() {
        let id = QuestionId::new("Q15");
        assert_eq!(format!("{id}"), "Q15");
    }

    #[test]
    fn from_str() {
        let id: QuestionId = "Q3".into();
        assert_eq!(id.as_str(), "Q3");
    }

    #[test]
    fn serializes_as_plain_string() {
        let id = QuestionId::new("Q7");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"Q7\"");
    }
}
