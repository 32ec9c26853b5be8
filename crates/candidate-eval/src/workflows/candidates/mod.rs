//! Candidate intake, storage, and reviewer workflow.

pub mod domain;
pub mod intake;
pub mod repository;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    BadgeTone, Candidate, CandidateId, CandidateStatus, Publication, PublicationId,
    PublicationType, ReviewerScore, ReviewerScoreOutOfRange, UnknownVariant,
};
pub use intake::{CandidateSubmission, IntakeError, IntakeGuard, PersonalInfo, PublicationDraft};
pub use repository::{CandidateRepository, CandidateStore, RepositoryError};
pub use service::{
    CandidateService, CandidateServiceError, Reconciliation, ReviewUpdate, SourceReassignment,
};
