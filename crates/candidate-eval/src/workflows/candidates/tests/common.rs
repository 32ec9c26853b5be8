use std::sync::Arc;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};

use crate::storage::{MemoryStore, StorageError, StoreKey};
use crate::workflows::candidates::domain::{
    Candidate, CandidateId, CandidateStatus, Publication, PublicationId, PublicationType,
};
use crate::workflows::candidates::intake::{CandidateSubmission, PersonalInfo, PublicationDraft};
use crate::workflows::candidates::repository::{
    CandidateRepository, CandidateStore, RepositoryError,
};
use crate::workflows::candidates::service::CandidateService;
use crate::workflows::sources::{PublicationSource, SourceId, SourceTable};

pub(super) fn sources() -> SourceTable {
    SourceTable::new(vec![
        source("1", "Nature", "Top-tier Journal", 25),
        source("11", "Communications of the ACM", "ACM Tier 1", 19),
        source("35", "ArXiv Preprint", "Preprint", 2),
    ])
}

pub(super) fn source(id: &str, name: &str, category: &str, points: u32) -> PublicationSource {
    PublicationSource {
        id: SourceId::from(id),
        name: name.to_string(),
        category: category.to_string(),
        points,
        description: None,
    }
}

pub(super) fn submitted_at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 2, 14, 9, 30, 0)
        .single()
        .expect("valid timestamp")
}

pub(super) fn personal_info() -> PersonalInfo {
    PersonalInfo {
        name: "Grace Hopper".to_string(),
        email: "grace.hopper@navy.example.edu".to_string(),
        institution: "Yale University".to_string(),
        department: Some("Mathematics".to_string()),
        position: Some("Research Fellow".to_string()),
        phone: Some("".to_string()),
        orcid: Some("0000-0002-1825-0097".to_string()),
    }
}

pub(super) fn draft(title: &str, source: &str) -> PublicationDraft {
    PublicationDraft {
        id: None,
        title: title.to_string(),
        kind: PublicationType::Journal,
        source: SourceId::from(source),
        doi: Some("10.1000/xyz123".to_string()),
        url: Some("https://example.org/paper".to_string()),
        publication_date: NaiveDate::from_ymd_opt(2024, 5, 17).expect("valid date"),
    }
}

pub(super) fn submission() -> CandidateSubmission {
    CandidateSubmission {
        personal: personal_info(),
        publications: vec![
            draft("Compilers for everyone", "1"),
            draft("A-0 System retrospective", "11"),
            draft("Nanoseconds explained", "unlisted-venue"),
        ],
    }
}

pub(super) fn candidate(id: &str, name: &str, status: CandidateStatus, total: u32) -> Candidate {
    Candidate {
        id: CandidateId::from(id),
        name: name.to_string(),
        email: format!("{}@example.edu", name.to_lowercase().replace(' ', ".")),
        institution: "Example University".to_string(),
        department: None,
        position: None,
        phone: None,
        orcid: None,
        submission_date: submitted_at(),
        status,
        total_score: u64::from(total),
        publications: vec![Publication {
            id: PublicationId::from(format!("{id}-p1").as_str()),
            title: "Only paper".to_string(),
            kind: PublicationType::Conference,
            source: SourceId::from("1"),
            doi: None,
            url: None,
            publication_date: NaiveDate::from_ymd_opt(2023, 11, 2).expect("valid date"),
            score: total,
        }],
        reviewer_notes: None,
        reviewer_score: None,
    }
}

pub(super) fn memory_repository() -> (Arc<CandidateStore<MemoryStore>>, MemoryStore) {
    let store = MemoryStore::default();
    let repository = CandidateStore::open(store.clone())
        .expect("empty store opens");
    (Arc::new(repository), store)
}

pub(super) fn build_service() -> (
    CandidateService<CandidateStore<MemoryStore>>,
    Arc<CandidateStore<MemoryStore>>,
    MemoryStore,
) {
    let (repository, store) = memory_repository();
    (CandidateService::new(repository.clone()), repository, store)
}

pub(super) struct UnavailableRepository;

impl CandidateRepository for UnavailableRepository {
    fn create(&self, _candidate: Candidate) -> Result<Candidate, RepositoryError> {
        Err(RepositoryError::Storage(StorageError::QuotaExceeded {
            key: StoreKey::Candidates,
            needed: 1,
            available: 0,
        }))
    }

    fn update(&self, _candidate: Candidate) -> Result<(), RepositoryError> {
        Err(RepositoryError::Storage(StorageError::QuotaExceeded {
            key: StoreKey::Candidates,
            needed: 1,
            available: 0,
        }))
    }

    fn delete(&self, _id: &CandidateId) -> Result<(), RepositoryError> {
        Ok(())
    }

    fn get_by_id(&self, _id: &CandidateId) -> Result<Option<Candidate>, RepositoryError> {
        Ok(None)
    }

    fn list(&self) -> Result<Vec<Candidate>, RepositoryError> {
        Ok(Vec::new())
    }
}
