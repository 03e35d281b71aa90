use std::collections::HashMap;

use crate::{Answer, QuestionId, UserInfo};

/// Answers and personal details collected during one intake session.
///
/// The store is owned by the flow controller. Every change marks it dirty
/// until the answers are next handed to submission. Nothing in here has
/// cross-question effects.
#[derive(Debug, Clone, Default)]
pub struct AnswerStore {
    answers: HashMap<QuestionId, Answer>,
    user_info: Option<UserInfo>,
    dirty: bool,
}

impl AnswerStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the answer for a question.
    pub fn get(&self, id: &QuestionId) -> Option<&Answer> {
        self.answers.get(id)
    }

    /// Overwrite the answer for a question.
    pub fn set(&mut self, id: impl Into<QuestionId>, answer: impl Into<Answer>) {
        self.answers.insert(id.into(), answer.into());
        self.dirty = true;
    }

    /// Clear every answer and the user info.
    pub fn reset(&mut self) {
        self.answers.clear();
        self.user_info = None;
        self.dirty = true;
    }

    /// The personal details, once collected.
    pub fn user_info(&self) -> Option<&UserInfo> {
        self.user_info.as_ref()
    }

    /// Store the personal details.
    pub fn set_user_info(&mut self, info: UserInfo) {
        self.user_info = Some(info);
        self.dirty = true;
    }

    /// Check if the store changed since the last `mark_clean`.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Acknowledge all changes so far.
    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }

    /// Get an iterator over all id-answer pairs (unordered).
    pub fn iter(&self) -> impl Iterator<Item = (&QuestionId, &Answer)> {
        self.answers.iter()
    }

    /// Get the number of answered questions.
    pub fn len(&self) -> usize {
        self.answers.len()
    }

    /// Check if no question has been answered.
    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }
}

impl<'a> IntoIterator for &'a AnswerStore {
    type Item = (&'a QuestionId, &'a Answer);
    type IntoIter = std::collections::hash_map::Iter<'a, QuestionId, Answer>;

    fn into_iter(self) -> Self::IntoIter {
        self.answers.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Selection;

    #[test]
    fn set_and_get() {
        let mut store = AnswerStore::new();
        store.set("Q1", Selection::plain("B"));
        store.set("Q16", Answer::Text("call me".into()));

        assert_eq!(
            store.get(&QuestionId::new("Q1")),
            Some(&Answer::Single(Selection::plain("B")))
        );
        assert_eq!(
            store.get(&QuestionId::new("Q16")).and_then(Answer::as_text),
            Some("call me")
        );
        assert!(store.get(&QuestionId::new("Q9")).is_none());
    }

    #[test]
    fn set_overwrites() {
        let mut store = AnswerStore::new();
        store.set("Q1", Selection::plain("A"));
        store.set("Q1", Selection::plain("C"));
        assert_eq!(store.len(), 1);
        assert_eq!(
            store.get(&QuestionId::new("Q1")),
            Some(&Answer::Single(Selection::plain("C")))
        );
    }

    #[test]
    fn set_marks_dirty() {
        let mut store = AnswerStore::new();
        assert!(!store.is_dirty());
        store.set("Q2", Selection::plain("A"));
        assert!(store.is_dirty());
        store.mark_clean();
        assert!(!store.is_dirty());
    }

    #[test]
    fn reset_clears_answers_and_user_info() {
        let mut store = AnswerStore::new();
        store.set("Q1", Selection::plain("A"));
        store.mark_clean();
        store.reset();
        assert!(store.is_empty());
        assert!(store.user_info().is_none());
        assert!(store.is_dirty());
    }
}
