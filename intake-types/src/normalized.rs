use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::QuestionId;

/// One answer in the backend's answer alphabet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NormalizedValue {
    /// A single code or a free-text answer.
    One(String),

    /// Several codes, in selection order.
    Many(Vec<String>),
}

impl NormalizedValue {
    /// Try to get this value as a single string.
    pub fn as_one(&self) -> Option<&str> {
        match self {
            Self::One(value) => Some(value),
            Self::Many(_) => None,
        }
    }

    /// Try to get this value as a list of codes.
    pub fn as_many(&self) -> Option<&[String]> {
        match self {
            Self::Many(values) => Some(values),
            Self::One(_) => None,
        }
    }
}

impl From<&str> for NormalizedValue {
    fn from(s: &str) -> Self {
        Self::One(s.to_string())
    }
}

impl From<String> for NormalizedValue {
    fn from(s: String) -> Self {
        Self::One(s)
    }
}

impl From<Vec<String>> for NormalizedValue {
    fn from(values: Vec<String>) -> Self {
        Self::Many(values)
    }
}

/// The `answers` object of a submission request, keyed by question id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NormalizedAnswers {
    values: BTreeMap<QuestionId, NormalizedValue>,
}

impl NormalizedAnswers {
    /// Create an empty answer set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value.
    pub fn insert(&mut self, id: impl Into<QuestionId>, value: impl Into<NormalizedValue>) {
        self.values.insert(id.into(), value.into());
    }

    /// Get the value for a question.
    pub fn get(&self, id: &QuestionId) -> Option<&NormalizedValue> {
        self.values.get(id)
    }

    /// Check if a question has a value.
    pub fn contains(&self, id: &QuestionId) -> bool {
        self.values.contains_key(id)
    }

    /// Get an iterator over all id-value pairs, ordered by id.
    pub fn iter(&self) -> impl Iterator<Item = (&QuestionId, &NormalizedValue)> {
        self.values.iter()
    }

    /// Get the number of values.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if there are no values.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_as_flat_object() {
        let mut answers = NormalizedAnswers::new();
        answers.insert("Q1", "A");
        answers.insert("Q15", vec!["salary".to_string(), "other".to_string()]);

        let json = serde_json::to_value(&answers).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "Q1": "A", "Q15": ["salary", "other"] })
        );
    }
}
