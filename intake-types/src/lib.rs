//! Core types for the intake questionnaire.
//!
//! This crate provides the data model the flow controller and submission
//! pipeline work on:
//! - `Catalog`, `Question` and `Multiplicity` - The ordered question set
//! - `Answer` and `Selection` - Tagged answers, including OTHER-with-text
//! - `AnswerStore` - Answers and personal details for one session
//! - `UserInfo` - Personal details and their field validation
//! - `NormalizedAnswers` and `AnswerNormalizer` - The backend answer format

mod question_id;
pub use question_id::QuestionId;

mod answer;
pub use answer::{Answer, OTHER_SEPARATOR, Selection};

mod answer_store;
pub use answer_store::AnswerStore;

mod question;
pub use question::{Multiplicity, OptionChoice, Question};

mod catalog;
pub use catalog::{Catalog, SectionInfo};

mod user_info;
pub use user_info::{
    FieldError, Gender, MINIMUM_AGE, MaritalStatus, UnknownChoice, UserField, UserInfo,
    UserInfoErrors,
};

mod normalized;
pub use normalized::{NormalizedAnswers, NormalizedValue};

mod error;
pub use error::CatalogError;

mod traits;
pub use traits::AnswerNormalizer;
