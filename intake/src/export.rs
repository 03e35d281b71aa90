//! JSON export of a completed intake.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use intake_types::{Answer, AnswerStore, Catalog, NormalizedAnswers, NormalizedValue, UserInfo};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::wire::{Analysis, SubmissionMeta, SubmissionReceipt};

/// Marker used in the legacy encoding when a question has none of its own.
const FALLBACK_OTHER_MARKER: &str = "other";

/// Errors writing or reading an export file.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("Invalid export JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Could not read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Everything the respondent can take away after submitting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportBundle {
    pub user: UserInfo,
    /// Answers in the legacy string encoding (`"other:text"`).
    pub questionnaire: NormalizedAnswers,
    pub analysis: Option<Analysis>,
    pub submission: Option<SubmissionMeta>,
}

impl ExportBundle {
    /// Assemble the bundle from the session state.
    pub fn new(
        catalog: &Catalog,
        user: &UserInfo,
        answers: &AnswerStore,
        receipt: Option<&SubmissionReceipt>,
    ) -> Self {
        Self {
            user: user.clone(),
            questionnaire: legacy_answers(catalog, answers),
            analysis: receipt.map(|r| r.analysis.clone()),
            submission: receipt.map(|r| r.submission.clone()),
        }
    }

    /// `intake-<name-with-dashes>-<unix-millis>.json`.
    pub fn file_name(&self, now: DateTime<Utc>) -> String {
        let name = self.user.full_name.split_whitespace().collect::<Vec<_>>().join("-");
        format!("intake-{name}-{}.json", now.timestamp_millis())
    }

    /// Pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, ExportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the bundle into `dir` and return the file path.
    pub fn write_to_dir(&self, dir: &Path, now: DateTime<Utc>) -> Result<PathBuf, ExportError> {
        let path = dir.join(self.file_name(now));
        std::fs::write(&path, self.to_json()?).map_err(|source| ExportError::Io {
            path: path.clone(),
            source,
        })?;
        Ok(path)
    }

    /// Load a bundle written by [`ExportBundle::write_to_dir`].
    pub fn read_from(path: &Path) -> Result<Self, ExportError> {
        let json = std::fs::read_to_string(path).map_err(|source| ExportError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(serde_json::from_str(&json)?)
    }
}

/// Encode stored answers the way earlier exports did.
pub fn legacy_answers(catalog: &Catalog, answers: &AnswerStore) -> NormalizedAnswers {
    let mut encoded = NormalizedAnswers::new();
    for (id, answer) in answers {
        let marker = catalog
            .question(id)
            .and_then(|q| q.other_marker())
            .unwrap_or(FALLBACK_OTHER_MARKER);
        let mut values = answer.encode(marker);
        let value = match answer {
            Answer::Multi(_) => NormalizedValue::Many(values),
            _ => NormalizedValue::One(values.pop().unwrap_or_default()),
        };
        encoded.insert(id, value);
    }
    encoded
}

/// Turn legacy-encoded answers back into a store for re-editing.
///
/// Entries for unknown questions, and values the question cannot hold, are
/// dropped so the respondent answers them again.
pub fn restore_answers(catalog: &Catalog, encoded: &NormalizedAnswers) -> AnswerStore {
    let mut store = AnswerStore::new();
    for (id, value) in encoded.iter() {
        let Some(question) = catalog.question(id) else {
            warn!(%id, "Dropping answer to unknown question");
            continue;
        };
        match question.decode_answer(value) {
            Some(answer) => store.set(id, answer),
            None => warn!(%id, "Dropping answer the question cannot hold"),
        }
    }
    store
}
