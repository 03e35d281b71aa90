//! Answer normalizers, one per backend contract version.
//!
//! - [`EnumeratedRemap`] squeezes every choice into a fixed code alphabet
//!   (the four-letter `A`-`D` contract).
//! - [`OtherExtraction`] keeps the answer structure and moves OTHER free text
//!   into a commentary question.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use intake_types::{
    Answer, AnswerNormalizer, AnswerStore, Catalog, Multiplicity, NormalizedAnswers,
    NormalizedValue, QuestionId, Selection,
};

/// Option value to code lookup for one question. Keys are lowercase.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeTable {
    codes: HashMap<String, String>,
}

impl CodeTable {
    /// Map option `i` of `values` to `alphabet[min(i, last)]`.
    pub fn positional<'a>(values: impl IntoIterator<Item = &'a str>, alphabet: &[String]) -> Self {
        let Some(last) = alphabet.len().checked_sub(1) else {
            return Self::default();
        };
        let codes = values
            .into_iter()
            .enumerate()
            .map(|(i, value)| (value.to_lowercase(), alphabet[i.min(last)].clone()))
            .collect();
        Self { codes }
    }

    /// Look up an option value, ignoring case.
    pub fn get(&self, value: &str) -> Option<&str> {
        self.codes.get(&value.to_lowercase()).map(String::as_str)
    }
}

/// Normalizer for backends that accept only a fixed code alphabet.
#[derive(Debug, Clone)]
pub struct EnumeratedRemap {
    alphabet: Vec<String>,
    fallback: String,
    tables: HashMap<QuestionId, CodeTable>,
}

impl EnumeratedRemap {
    /// Build code tables for every SINGLE and MULTI question of `catalog`.
    ///
    /// OTHER options get no entry; OTHER selections always take `fallback`.
    pub fn from_catalog(catalog: &Catalog, alphabet: &[&str], fallback: &str) -> Self {
        let alphabet: Vec<String> = alphabet.iter().map(|code| code.to_uppercase()).collect();
        let tables = catalog
            .questions()
            .iter()
            .filter(|q| q.multiplicity().has_options())
            .map(|q| {
                let values = q
                    .options()
                    .iter()
                    .map(|o| o.value.as_str())
                    .filter(|value| !q.is_other_value(value));
                (q.id().clone(), CodeTable::positional(values, &alphabet))
            })
            .collect();

        Self {
            alphabet,
            fallback: fallback.to_uppercase(),
            tables,
        }
    }

    /// The `A`-`D` contract: unknown codes and OTHER both become `D`.
    pub fn four_letter(catalog: &Catalog) -> Self {
        Self::from_catalog(catalog, &["A", "B", "C", "D"], "D")
    }

    /// Code used for OTHER selections and anything unrecognised.
    pub fn fallback(&self) -> &str {
        &self.fallback
    }

    /// Code for one selection of question `id`.
    pub fn code_for(&self, id: &QuestionId, selection: &Selection) -> String {
        let Selection::Plain(value) = selection else {
            return self.fallback.clone();
        };
        if let Some(code) = self.tables.get(id).and_then(|table| table.get(value)) {
            return code.to_string();
        }
        let upper = value.to_uppercase();
        if self.alphabet.contains(&upper) {
            upper
        } else {
            self.fallback.clone()
        }
    }
}

impl AnswerNormalizer for EnumeratedRemap {
    fn name(&self) -> &'static str {
        "enumerated-remap"
    }

    fn normalize(&self, answers: &AnswerStore) -> NormalizedAnswers {
        let mut normalized = NormalizedAnswers::new();
        for (id, answer) in answers {
            let value = match answer {
                Answer::Single(selection) => self.code_for(id, selection),
                Answer::Multi(selections) => match selections.first() {
                    Some(first) => self.code_for(id, first),
                    None => self.fallback.clone(),
                },
                Answer::Text(text) => text.clone(),
            };
            normalized.insert(id, value);
        }
        normalized
    }
}

/// Normalizer for backends that accept option values as-is but no inline
/// OTHER text.
#[derive(Debug, Clone)]
pub struct OtherExtraction {
    /// Catalog order with each question's OTHER marker.
    order: Vec<(QuestionId, Option<String>)>,
    commentary: Option<QuestionId>,
}

impl OtherExtraction {
    /// Follow the question order of `catalog`; extracted text is dropped
    /// until a commentary question is set.
    pub fn from_catalog(catalog: &Catalog) -> Self {
        let order = catalog
            .questions()
            .iter()
            .map(|q| (q.id().clone(), q.other_marker().map(str::to_string)))
            .collect();
        Self {
            order,
            commentary: None,
        }
    }

    /// Put extracted OTHER text into question `id` when it has no answer of its own.
    pub fn with_commentary(mut self, id: impl Into<QuestionId>) -> Self {
        self.commentary = Some(id.into());
        self
    }

    fn marker_for<'a>(&'a self, marker: Option<&'a str>) -> &'a str {
        marker.unwrap_or(DEFAULT_OTHER_MARKER)
    }
}

/// Marker emitted for OTHER answers of questions the catalog does not know.
const DEFAULT_OTHER_MARKER: &str = "other";

impl AnswerNormalizer for OtherExtraction {
    fn name(&self) -> &'static str {
        "other-extraction"
    }

    fn normalize(&self, answers: &AnswerStore) -> NormalizedAnswers {
        let mut normalized = NormalizedAnswers::new();
        let mut extracted = Vec::new();

        let known = self
            .order
            .iter()
            .map(|(id, marker)| (id, marker.as_deref()));
        let unknown = answers
            .iter()
            .filter(|(id, _)| !self.order.iter().any(|(k, _)| k == *id))
            .map(|(id, _)| (id, None));

        for (id, marker) in known.chain(unknown) {
            let Some(answer) = answers.get(id) else {
                continue;
            };
            let marker = self.marker_for(marker);
            let mut code = |selection: &Selection| match selection {
                Selection::Plain(value) => value.clone(),
                Selection::Other(text) => {
                    if !text.trim().is_empty() {
                        extracted.push(text.trim().to_string());
                    }
                    marker.to_string()
                }
            };
            let value = match answer {
                Answer::Single(selection) => NormalizedValue::One(code(selection)),
                Answer::Multi(selections) => {
                    NormalizedValue::Many(selections.iter().map(&mut code).collect())
                }
                Answer::Text(text) => NormalizedValue::One(text.clone()),
            };
            normalized.insert(id, value);
        }

        if let Some(commentary) = &self.commentary
            && !extracted.is_empty()
            && !answers.get(commentary).is_some_and(|a| !a.is_blank())
        {
            normalized.insert(commentary, extracted.join("; "));
        }
        normalized
    }
}

/// Which backend contract the submission pipeline talks to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NormalizationPolicy {
    /// Everything squeezed into `A`-`D`.
    EnumeratedRemap,

    /// Option values kept, OTHER text moved to the commentary question.
    #[default]
    OtherExtraction,
}

impl NormalizationPolicy {
    pub const ALL: [NormalizationPolicy; 2] = [Self::EnumeratedRemap, Self::OtherExtraction];

    /// The command-line name of this policy.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EnumeratedRemap => "enumerated-remap",
            Self::OtherExtraction => "other-extraction",
        }
    }

    /// Build the normalizer for `catalog`.
    ///
    /// `commentary` only matters for [`NormalizationPolicy::OtherExtraction`].
    pub fn build(
        &self,
        catalog: &Catalog,
        commentary: Option<&QuestionId>,
    ) -> Box<dyn AnswerNormalizer> {
        match self {
            Self::EnumeratedRemap => Box::new(EnumeratedRemap::four_letter(catalog)),
            Self::OtherExtraction => {
                let normalizer = OtherExtraction::from_catalog(catalog);
                match commentary.and_then(|id| catalog.question(id)) {
                    Some(q) if q.multiplicity() == Multiplicity::Text => {
                        Box::new(normalizer.with_commentary(q.id()))
                    }
                    _ => Box::new(normalizer),
                }
            }
        }
    }
}

impl fmt::Display for NormalizationPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unrecognised contract name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown contract '{0}', expected 'enumerated-remap' or 'other-extraction'")]
pub struct UnknownPolicy(pub String);

impl FromStr for NormalizationPolicy {
    type Err = UnknownPolicy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|policy| policy.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownPolicy(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wealth::{ADVISOR_NOTES, SOURCE_OF_FUNDS, advisor_notes_id, wealth_catalog};

    fn store_with(q15: Vec<Selection>) -> AnswerStore {
        let mut store = AnswerStore::new();
        store.set("Q1", Selection::plain("B"));
        store.set(SOURCE_OF_FUNDS, q15);
        store
    }

    #[test]
    fn remap_source_of_funds_positions() {
        let remap = EnumeratedRemap::four_letter(&wealth_catalog().unwrap());
        let id = QuestionId::new(SOURCE_OF_FUNDS);
        let codes: Vec<_> = ["salary", "business", "investments", "rental"]
            .into_iter()
            .map(|v| remap.code_for(&id, &Selection::plain(v)))
            .collect();
        assert_eq!(codes, ["A", "B", "C", "D"]);
    }

    #[test]
    fn remap_is_case_insensitive_and_passes_codes_through() {
        let remap = EnumeratedRemap::four_letter(&wealth_catalog().unwrap());
        let id = QuestionId::new(SOURCE_OF_FUNDS);
        assert_eq!(remap.code_for(&id, &Selection::plain("Business")), "B");
        assert_eq!(remap.code_for(&id, &Selection::plain("c")), "C");
    }

    #[test]
    fn remap_unknown_and_other_share_fallback() {
        let remap = EnumeratedRemap::four_letter(&wealth_catalog().unwrap());
        let id = QuestionId::new(SOURCE_OF_FUNDS);
        let unknown = remap.code_for(&id, &Selection::plain("lottery"));
        let other = remap.code_for(&id, &Selection::other("crypto gains"));
        assert_eq!(unknown, other);
        assert_eq!(other, remap.fallback());
        assert_eq!(other, "D");
    }

    #[test]
    fn remap_collapses_multi_to_first_selection() {
        let remap = EnumeratedRemap::four_letter(&wealth_catalog().unwrap());
        let store = store_with(vec![Selection::plain("investments"), Selection::plain("salary")]);
        let normalized = remap.normalize(&store);
        assert_eq!(normalized.get(&"Q15".into()), Some(&"C".into()));
        assert_eq!(normalized.get(&"Q1".into()), Some(&"B".into()));

        let empty = remap.normalize(&store_with(Vec::new()));
        assert_eq!(empty.get(&"Q15".into()), Some(&"D".into()));
    }

    #[test]
    fn extraction_keeps_structure_and_moves_text() {
        let catalog = wealth_catalog().unwrap();
        let normalizer = OtherExtraction::from_catalog(&catalog).with_commentary(ADVISOR_NOTES);
        let store = store_with(vec![
            Selection::plain("salary"),
            Selection::other("  crypto gains "),
        ]);

        let normalized = normalizer.normalize(&store);
        assert_eq!(
            normalized.get(&"Q15".into()),
            Some(&NormalizedValue::Many(vec![
                "salary".to_string(),
                "other".to_string()
            ]))
        );
        assert_eq!(
            normalized.get(&advisor_notes_id()),
            Some(&"crypto gains".into())
        );
    }

    #[test]
    fn extraction_does_not_overwrite_commentary() {
        let catalog = wealth_catalog().unwrap();
        let normalizer = OtherExtraction::from_catalog(&catalog).with_commentary(ADVISOR_NOTES);
        let mut store = store_with(vec![Selection::other("crypto gains")]);
        store.set(ADVISOR_NOTES, Answer::Text("Prefers quarterly calls".into()));

        let normalized = normalizer.normalize(&store);
        assert_eq!(
            normalized.get(&advisor_notes_id()),
            Some(&"Prefers quarterly calls".into())
        );
    }

    #[test]
    fn extraction_fills_blank_commentary() {
        let catalog = wealth_catalog().unwrap();
        let normalizer = OtherExtraction::from_catalog(&catalog).with_commentary(ADVISOR_NOTES);
        let mut store = store_with(vec![Selection::other("crypto gains")]);
        store.set(ADVISOR_NOTES, Answer::Text("   ".into()));

        let normalized = normalizer.normalize(&store);
        assert_eq!(
            normalized.get(&advisor_notes_id()),
            Some(&"crypto gains".into())
        );
    }

    #[test]
    fn both_policies_are_total_over_the_catalog() {
        let catalog = wealth_catalog().unwrap();
        let mut store = AnswerStore::new();
        for question in catalog.questions() {
            let answer = match question.multiplicity() {
                Multiplicity::Single => Answer::Single(Selection::plain("A")),
                Multiplicity::Multi => Answer::Multi(vec![Selection::other("")]),
                Multiplicity::Text => Answer::Text(String::new()),
            };
            store.set(question.id(), answer);
        }

        for policy in NormalizationPolicy::ALL {
            let normalizer = policy.build(&catalog, Some(&advisor_notes_id()));
            let normalized = normalizer.normalize(&store);
            assert_eq!(normalized.len(), catalog.question_count(), "{policy}");
        }
    }

    #[test]
    fn policy_names_parse() {
        assert_eq!(
            "enumerated-remap".parse::<NormalizationPolicy>(),
            Ok(NormalizationPolicy::EnumeratedRemap)
        );
        assert_eq!(
            "Other-Extraction".parse::<NormalizationPolicy>(),
            Ok(NormalizationPolicy::OtherExtraction)
        );
        assert!("legacy".parse::<NormalizationPolicy>().is_err());
        assert_eq!(NormalizationPolicy::default().as_str(), "other-extraction");
    }
}
