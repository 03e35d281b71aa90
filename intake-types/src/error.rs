use crate::QuestionId;

/// Error type for catalog construction.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// A question has an empty id.
    #[error("Question id must not be empty")]
    EmptyId,

    /// Two questions share an id.
    #[error("Duplicate question id: {0}")]
    DuplicateId(QuestionId),

    /// Section numbers start at 1.
    #[error("Question '{0}' has section 0; sections start at 1")]
    ZeroSection(QuestionId),

    /// A section reappears after another section started.
    #[error("Question '{id}' reopens section {section}; sections must be contiguous")]
    InterleavedSection { id: QuestionId, section: u32 },

    /// A single- or multi-select question without options.
    #[error("Question '{0}' needs at least one option")]
    MissingOptions(QuestionId),

    /// A text question with options.
    #[error("Text question '{0}' must not have options")]
    UnexpectedOptions(QuestionId),

    /// Two options of one question share a value.
    #[error("Question '{id}' has duplicate option value '{value}'")]
    DuplicateOption { id: QuestionId, value: String },

    /// The OTHER marker is not among the question's options.
    #[error("Question '{id}' designates '{value}' as OTHER but has no such option")]
    UnknownOtherMarker { id: QuestionId, value: String },
}
