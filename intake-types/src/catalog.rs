use std::collections::{BTreeMap, HashSet};
use std::ops::Range;

use crate::{CatalogError, Multiplicity, Question, QuestionId};

/// Where a question sits within its section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionInfo<'a> {
    /// The section number.
    pub number: u32,

    /// The section title, if one was set.
    pub title: Option<&'a str>,

    /// Catalog indices covered by this section.
    pub range: Range<usize>,

    /// Zero-based position of the queried question inside the section.
    pub position: usize,
}

/// The ordered, validated list of questions for an intake.
///
/// Catalog order defines display order and section membership. Construction
/// checks the invariants, so every accessor is infallible.
#[derive(Debug, Clone)]
pub struct Catalog {
    /// Optional message shown before the first question.
    pub prelude: Option<String>,

    questions: Vec<Question>,

    section_titles: BTreeMap<u32, String>,

    /// Optional message shown after the last question.
    pub epilogue: Option<String>,
}

impl Catalog {
    /// Create a catalog, checking ids, sections and option sets.
    pub fn new(questions: Vec<Question>) -> Result<Self, CatalogError> {
        validate(&questions)?;
        Ok(Self {
            prelude: None,
            questions,
            section_titles: BTreeMap::new(),
            epilogue: None,
        })
    }

    /// Create an empty catalog.
    pub fn empty() -> Self {
        Self {
            prelude: None,
            questions: Vec::new(),
            section_titles: BTreeMap::new(),
            epilogue: None,
        }
    }

    /// Set the prelude message.
    pub fn with_prelude(mut self, prelude: impl Into<String>) -> Self {
        self.prelude = Some(prelude.into());
        self
    }

    /// Set the epilogue message.
    pub fn with_epilogue(mut self, epilogue: impl Into<String>) -> Self {
        self.epilogue = Some(epilogue.into());
        self
    }

    /// Name a section.
    pub fn with_section_title(mut self, section: u32, title: impl Into<String>) -> Self {
        self.section_titles.insert(section, title.into());
        self
    }

    /// Get the questions.
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// Get the number of questions.
    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    /// Check if the catalog has any questions.
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Get the question at `index`.
    ///
    /// # Panics
    /// If `index` is out of range.
    pub fn question_at(&self, index: usize) -> &Question {
        &self.questions[index]
    }

    /// Find a question by id.
    pub fn question(&self, id: &QuestionId) -> Option<&Question> {
        self.questions.iter().find(|q| q.id() == id)
    }

    /// Section information for the question at `index`.
    ///
    /// # Panics
    /// If `index` is out of range.
    pub fn section_of(&self, index: usize) -> SectionInfo<'_> {
        let number = self.questions[index].section();
        let range = self.section_range(number);
        SectionInfo {
            number,
            title: self.section_title(number),
            position: index - range.start,
            range,
        }
    }

    /// The questions of a section, in catalog order (empty if unknown).
    pub fn questions_in_section(&self, section: u32) -> &[Question] {
        &self.questions[self.section_range(section)]
    }

    fn section_title(&self, section: u32) -> Option<&str> {
        self.section_titles.get(&section).map(String::as_str)
    }

    fn section_range(&self, section: u32) -> Range<usize> {
        // Sections are contiguous, so the first and last match bound the range.
        let start = self.questions.iter().position(|q| q.section() == section);
        let end = self.questions.iter().rposition(|q| q.section() == section);
        match (start, end) {
            (Some(start), Some(end)) => start..end + 1,
            _ => 0..0,
        }
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::empty()
    }
}

fn validate(questions: &[Question]) -> Result<(), CatalogError> {
    let mut ids = HashSet::new();
    let mut closed_sections = HashSet::new();
    let mut current_section = None;

    for question in questions {
        let id = question.id();
        if id.is_empty() {
            return Err(CatalogError::EmptyId);
        }
        if !ids.insert(id.clone()) {
            return Err(CatalogError::DuplicateId(id.clone()));
        }

        let section = question.section();
        if section == 0 {
            return Err(CatalogError::ZeroSection(id.clone()));
        }
        if current_section != Some(section) {
            if closed_sections.contains(&section) {
                return Err(CatalogError::InterleavedSection {
                    id: id.clone(),
                    section,
                });
            }
            if let Some(previous) = current_section {
                closed_sections.insert(previous);
            }
            current_section = Some(section);
        }

        match question.multiplicity() {
            Multiplicity::Single | Multiplicity::Multi if question.options().is_empty() => {
                return Err(CatalogError::MissingOptions(id.clone()));
            }
            Multiplicity::Text if !question.options().is_empty() => {
                return Err(CatalogError::UnexpectedOptions(id.clone()));
            }
            _ => {}
        }

        let mut values = HashSet::new();
        for option in question.options() {
            if !values.insert(option.value.as_str()) {
                return Err(CatalogError::DuplicateOption {
                    id: id.clone(),
                    value: option.value.clone(),
                });
            }
        }

        if let Some(marker) = question.other_marker()
            && question.option(marker).is_none()
        {
            return Err(CatalogError::UnknownOtherMarker {
                id: id.clone(),
                value: marker.to_string(),
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn yes_no(id: &str, section: u32) -> Question {
        Question::single(id, id, section)
            .with_option("Y", "Yes")
            .with_option("N", "No")
    }

    fn sample() -> Catalog {
        Catalog::new(vec![
            yes_no("Q1", 1),
            yes_no("Q2", 1),
            yes_no("Q3", 2),
            Question::text("Q4", "Notes", 3).optional(),
        ])
        .unwrap()
        .with_section_title(1, "Basics")
    }

    #[test]
    fn counts_and_lookup() {
        let catalog = sample();
        assert_eq!(catalog.question_count(), 4);
        assert_eq!(catalog.question_at(2).id().as_str(), "Q3");
        assert_eq!(
            catalog.question(&QuestionId::new("Q4")).map(Question::is_optional),
            Some(true)
        );
        assert!(catalog.question(&QuestionId::new("Q9")).is_none());
    }

    #[test]
    fn section_of() {
        let catalog = sample();
        let info = catalog.section_of(1);
        assert_eq!(info.number, 1);
        assert_eq!(info.title, Some("Basics"));
        assert_eq!(info.range, 0..2);
        assert_eq!(info.position, 1);
        assert_eq!(catalog.section_of(2).title, None);
    }

    #[test]
    fn questions_in_section() {
        let catalog = sample();
        let ids: Vec<_> = catalog
            .questions_in_section(1)
            .iter()
            .map(|q| q.id().as_str())
            .collect();
        assert_eq!(ids, vec!["Q1", "Q2"]);
        assert!(catalog.questions_in_section(7).is_empty());
    }

    #[test]
    #[should_panic]
    fn question_at_out_of_range_panics() {
        sample().question_at(10);
    }

    #[test]
    fn rejects_duplicate_ids() {
        let result = Catalog::new(vec![yes_no("Q1", 1), yes_no("Q1", 1)]);
        assert!(matches!(result, Err(CatalogError::DuplicateId(_))));
    }

    #[test]
    fn rejects_interleaved_sections() {
        let result = Catalog::new(vec![yes_no("Q1", 1), yes_no("Q2", 2), yes_no("Q3", 1)]);
        assert!(matches!(
            result,
            Err(CatalogError::InterleavedSection { section: 1, .. })
        ));
    }

    #[test]
    fn rejects_option_shape_mismatch() {
        let result = Catalog::new(vec![Question::single("Q1", "x", 1)]);
        assert!(matches!(result, Err(CatalogError::MissingOptions(_))));

        let result = Catalog::new(vec![Question::text("Q1", "x", 1).with_option("A", "a")]);
        assert!(matches!(result, Err(CatalogError::UnexpectedOptions(_))));
    }

    #[test]
    fn rejects_zero_section() {
        let result = Catalog::new(vec![yes_no("Q1", 0)]);
        assert!(matches!(result, Err(CatalogError::ZeroSection(_))));
    }
}
