use std::sync::{Mutex, MutexGuard};

use tracing::{debug, info};

use super::domain::{Candidate, CandidateId};
use crate::storage::{load_collection, save_collection, KeyValueStore, StorageError, StoreKey};

/// Storage abstraction so the service module can be exercised in isolation.
///
/// `update` and `delete` of an unknown id are silent no-ops; callers that need
/// confirmation check `get_by_id` first.
pub trait CandidateRepository: Send + Sync {
    fn create(&self, candidate: Candidate) -> Result<Candidate, RepositoryError>;
    fn update(&self, candidate: Candidate) -> Result<(), RepositoryError>;
    fn delete(&self, id: &CandidateId) -> Result<(), RepositoryError>;
    fn get_by_id(&self, id: &CandidateId) -> Result<Option<Candidate>, RepositoryError>;
    fn list(&self) -> Result<Vec<Candidate>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("candidate `{0}` already exists")]
    Conflict(CandidateId),
    #[error("candidate `{0}` not found")]
    NotFound(CandidateId),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Repository persisting the whole `candidates` collection on every mutation.
///
/// The held collection is replaced only after the store accepted the new snapshot.
pub struct CandidateStore<S> {
    store: S,
    records: Mutex<Vec<Candidate>>,
}

impl<S: KeyValueStore> CandidateStore<S> {
    pub fn open(store: S) -> Result<Self, StorageError> {
        let records =
            load_collection::<Candidate, _>(&store, StoreKey::Candidates)?.unwrap_or_default();
        debug!(count = records.len(), "loaded candidates");
        Ok(Self {
            store,
            records: Mutex::new(records),
        })
    }

    fn records(&self) -> MutexGuard<'_, Vec<Candidate>> {
        self.records
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Apply `change` to a copy of the collection and persist it when it reports a change.
    fn mutate<F>(&self, change: F) -> Result<bool, RepositoryError>
    where
        F: FnOnce(&mut Vec<Candidate>) -> Result<bool, RepositoryError>,
    {
        let mut records = self.records();
        let mut next = records.clone();
        if !change(&mut next)? {
            return Ok(false);
        }
        save_collection(&self.store, StoreKey::Candidates, &next)?;
        *records = next;
        Ok(true)
    }
}

impl<S: KeyValueStore> CandidateRepository for CandidateStore<S> {
    fn create(&self, candidate: Candidate) -> Result<Candidate, RepositoryError> {
        let stored = candidate.clone();
        self.mutate(move |records| {
            if records.iter().any(|existing| existing.id == candidate.id) {
                return Err(RepositoryError::Conflict(candidate.id));
            }
            records.push(candidate);
            Ok(true)
        })?;

        info!(candidate_id = %stored.id, total_score = stored.total_score, "candidate created");
        Ok(stored)
    }

    fn update(&self, candidate: Candidate) -> Result<(), RepositoryError> {
        let id = candidate.id.clone();
        let changed = self.mutate(move |records| {
            match records
                .iter_mut()
                .find(|existing| existing.id == candidate.id)
            {
                Some(existing) => {
                    *existing = candidate;
                    Ok(true)
                }
                None => Ok(false),
            }
        })?;

        if changed {
            info!(candidate_id = %id, "candidate updated");
        } else {
            debug!(candidate_id = %id, "update ignored, candidate not present");
        }
        Ok(())
    }

    fn delete(&self, id: &CandidateId) -> Result<(), RepositoryError> {
        let changed = self.mutate(|records| {
            let before = records.len();
            records.retain(|candidate| &candidate.id != id);
            Ok(records.len() != before)
        })?;

        if changed {
            info!(candidate_id = %id, "candidate deleted");
        } else {
            debug!(candidate_id = %id, "delete ignored, candidate not present");
        }
        Ok(())
    }

    fn get_by_id(&self, id: &CandidateId) -> Result<Option<Candidate>, RepositoryError> {
        Ok(self
            .records()
            .iter()
            .find(|candidate| &candidate.id == id)
            .cloned())
    }

    fn list(&self) -> Result<Vec<Candidate>, RepositoryError> {
        Ok(self.records().clone())
    }
}
