//! Lung-cancer risk screening: question catalog, answer reconciliation, scoring,
//! clinical flags, and the submission service that persists authoritative results.

pub mod answers;
pub mod assembler;
pub mod catalog;
pub mod contact;
pub(crate) mod cors;
pub mod error;
pub mod exposure;
pub mod flags;
pub mod postgrest;
pub mod repository;
pub mod router;
pub mod scoring;
pub mod service;
pub mod submission;

#[cfg(test)]
mod tests;

pub use answers::{CanonicalAnswerMap, KeyReconciler, RawAnswers, TriState};
pub use assembler::{
    AnswerDetails, AnswerEntry, ClinicalFindings, PayloadAssembler, ScreeningEvaluation,
    ScreeningResult,
};
pub use catalog::{Question, QuestionCatalog, QuestionId, QuestionKind};
pub use contact::ContactOptIn;
pub use cors::CorsPolicy;
pub use error::ScreeningError;
pub use exposure::{ExposureInputs, ExposureProfile};
pub use flags::ClinicalFlags;
pub use postgrest::PostgrestStore;
pub use repository::{
    ContactRequestRow, RespondentRow, RowId, ScreeningRow, ScreeningStore, StoreError,
};
pub use router::screening_router;
pub use scoring::{RiskAssessment, RiskLevel, ScoringEngine};
pub use service::{OptInReceipt, ScreeningService, SubmissionReceipt};
pub use submission::{Identification, ScreeningSubmission};
