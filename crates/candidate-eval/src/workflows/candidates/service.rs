use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use super::domain::{
    Candidate, CandidateId, CandidateStatus, Publication, PublicationId, ReviewerScore,
};
use super::intake::{CandidateSubmission, IntakeError, IntakeGuard};
use super::repository::{CandidateRepository, RepositoryError};
use crate::workflows::scoring::{self, ScoreBreakdown};
use crate::workflows::sources::{SourceId, SourceLookup};

/// Reviewer edits from the details screen. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReviewUpdate {
    pub status: Option<CandidateStatus>,
    /// A blank note clears the stored one.
    pub reviewer_notes: Option<String>,
    /// `Some(None)` clears the stored score.
    pub reviewer_score: Option<Option<ReviewerScore>>,
}

impl ReviewUpdate {
    pub fn is_empty(&self) -> bool {
        self.status.is_none() && self.reviewer_notes.is_none() && self.reviewer_score.is_none()
    }
}

/// Outcome of re-pointing a publication at another source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceReassignment {
    pub publication_id: PublicationId,
    pub previous_source: SourceId,
    pub previous_score: u32,
    pub source: SourceId,
    pub score: u32,
    /// Candidate total after the change. It is not recomputed here.
    pub total_score: u64,
    pub drift: i64,
}

/// Outcome of an explicit total-score reconciliation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Reconciliation {
    pub previous_total: u64,
    pub total_score: u64,
}

impl Reconciliation {
    pub fn changed(&self) -> bool {
        self.previous_total != self.total_score
    }
}

/// Service composing the intake guard, repository, and scoring engine.
pub struct CandidateService<R> {
    guard: IntakeGuard,
    repository: Arc<R>,
}

impl<R> CandidateService<R>
where
    R: CandidateRepository + 'static,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self {
            guard: IntakeGuard,
            repository,
        }
    }

    pub fn repository(&self) -> &Arc<R> {
        &self.repository
    }

    /// Submit a new candidate stamped with the current time.
    pub fn submit<L>(
        &self,
        submission: CandidateSubmission,
        sources: &L,
    ) -> Result<Candidate, CandidateServiceError>
    where
        L: SourceLookup + ?Sized,
    {
        self.submit_at(submission, sources, Utc::now())
    }

    /// Validate, score every publication against `sources`, and store as pending.
    pub fn submit_at<L>(
        &self,
        submission: CandidateSubmission,
        sources: &L,
        submitted_at: DateTime<Utc>,
    ) -> Result<Candidate, CandidateServiceError>
    where
        L: SourceLookup + ?Sized,
    {
        let validated = self.guard.validate(submission)?;

        let publications: Vec<Publication> = validated
            .publications
            .into_iter()
            .map(|draft| {
                let mut publication = Publication {
                    id: draft.id,
                    title: draft.title,
                    kind: draft.kind,
                    source: SourceId(String::new()),
                    doi: draft.doi,
                    url: draft.url,
                    publication_date: draft.publication_date,
                    score: 0,
                };
                scoring::assign_source(&mut publication, draft.source, sources);
                publication
            })
            .collect();

        let total_score = scoring::total_score(&publications);
        let personal = validated.personal;
        let candidate = Candidate {
            id: CandidateId::generate(),
            name: personal.name,
            email: personal.email,
            institution: personal.institution,
            department: personal.department,
            position: personal.position,
            phone: personal.phone,
            orcid: personal.orcid,
            submission_date: submitted_at,
            status: CandidateStatus::Pending,
            total_score,
            publications,
            reviewer_notes: None,
            reviewer_score: None,
        };

        let stored = self.repository.create(candidate)?;
        info!(
            candidate_id = %stored.id,
            publications = stored.publication_count(),
            total_score = stored.total_score,
            "submission accepted"
        );
        Ok(stored)
    }

    /// Fetch a candidate, failing when it does not exist.
    pub fn get(&self, id: &CandidateId) -> Result<Candidate, CandidateServiceError> {
        let candidate = self
            .repository
            .get_by_id(id)?
            .ok_or_else(|| RepositoryError::NotFound(id.clone()))?;
        Ok(candidate)
    }

    pub fn list(&self) -> Result<Vec<Candidate>, CandidateServiceError> {
        Ok(self.repository.list()?)
    }

    /// Apply reviewer edits. Status changes are unconstrained.
    pub fn review(
        &self,
        id: &CandidateId,
        update: ReviewUpdate,
    ) -> Result<Candidate, CandidateServiceError> {
        let mut candidate = self.get(id)?;

        if let Some(status) = update.status {
            if status != candidate.status {
                info!(candidate_id = %id, from = %candidate.status, to = %status, "status changed");
            }
            candidate.status = status;
        }
        if let Some(notes) = update.reviewer_notes {
            let trimmed = notes.trim();
            candidate.reviewer_notes = if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            };
        }
        if let Some(score) = update.reviewer_score {
            candidate.reviewer_score = score;
        }

        self.repository.update(candidate.clone())?;
        Ok(candidate)
    }

    /// Point a publication at another source and refresh its score snapshot. The
    /// candidate's `total_score` is deliberately left as it was; use
    /// [`CandidateService::reconcile_total`] to bring it back in line.
    pub fn reassign_publication_source<L>(
        &self,
        id: &CandidateId,
        publication_id: &PublicationId,
        source: SourceId,
        sources: &L,
    ) -> Result<SourceReassignment, CandidateServiceError>
    where
        L: SourceLookup + ?Sized,
    {
        let mut candidate = self.get(id)?;
        let publication = candidate.publication_mut(publication_id).ok_or_else(|| {
            CandidateServiceError::PublicationNotFound {
                candidate: id.clone(),
                publication: publication_id.clone(),
            }
        })?;

        let previous_source = publication.source.clone();
        let previous_score = publication.score;
        let score = scoring::assign_source(publication, source.clone(), sources);

        let drift = candidate.score_drift();
        let total_score = candidate.total_score;
        self.repository.update(candidate)?;

        if drift != 0 {
            warn!(candidate_id = %id, drift, "total score no longer matches publication scores");
        }

        Ok(SourceReassignment {
            publication_id: publication_id.clone(),
            previous_source,
            previous_score,
            source,
            score,
            total_score,
            drift,
        })
    }

    /// Set `total_score` to the sum of the stored publication scores.
    pub fn reconcile_total(
        &self,
        id: &CandidateId,
    ) -> Result<Reconciliation, CandidateServiceError> {
        let mut candidate = self.get(id)?;
        let reconciliation = Reconciliation {
            previous_total: candidate.total_score,
            total_score: scoring::total_score(&candidate.publications),
        };

        if reconciliation.changed() {
            candidate.total_score = reconciliation.total_score;
            self.repository.update(candidate)?;
            info!(
                candidate_id = %id,
                previous_total = reconciliation.previous_total,
                total_score = reconciliation.total_score,
                "total score reconciled"
            );
        }
        Ok(reconciliation)
    }

    pub fn breakdown<L>(
        &self,
        id: &CandidateId,
        sources: &L,
    ) -> Result<ScoreBreakdown, CandidateServiceError>
    where
        L: SourceLookup + ?Sized,
    {
        let candidate = self.get(id)?;
        Ok(scoring::breakdown(&candidate, sources))
    }

    /// Remove a candidate. Unknown ids are ignored.
    pub fn delete(&self, id: &CandidateId) -> Result<(), CandidateServiceError> {
        self.repository.delete(id)?;
        Ok(())
    }
}

/// Error raised by the candidate service.
#[derive(Debug, thiserror::Error)]
pub enum CandidateServiceError {
    #[error(transparent)]
    Intake(#[from] IntakeError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error("candidate `{candidate}` has no publication `{publication}`")]
    PublicationNotFound {
        candidate: CandidateId,
        publication: PublicationId,
    },
}
