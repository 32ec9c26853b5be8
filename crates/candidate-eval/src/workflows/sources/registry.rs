use tracing::{debug, info};

use crate::storage::{load_collection, save_collection, KeyValueStore, StorageError, StoreKey};

use super::domain::{PublicationSource, SourceDraft, SourceId, SourceValidationError};
use super::filter::SourceFilter;
use super::seed::default_sources;

/// Read access to source metadata. An absent entry is an ordinary outcome: callers
/// treat it as "unknown source".
pub trait SourceLookup {
    fn source(&self, id: &SourceId) -> Option<&PublicationSource>;
}

/// Ordered, storage-free collection of sources.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceTable {
    sources: Vec<PublicationSource>,
}

impl SourceTable {
    pub fn new(sources: Vec<PublicationSource>) -> Self {
        Self { sources }
    }

    pub fn defaults() -> Self {
        Self::new(default_sources())
    }

    /// Entries in insertion order.
    pub fn list(&self) -> &[PublicationSource] {
        &self.sources
    }

    pub fn get_by_id(&self, id: &SourceId) -> Option<&PublicationSource> {
        self.sources.iter().find(|source| &source.id == id)
    }

    /// Distinct categories in first-seen order.
    pub fn categories(&self) -> Vec<&str> {
        let mut categories: Vec<&str> = Vec::new();
        for source in &self.sources {
            if !categories.contains(&source.category.as_str()) {
                categories.push(source.category.as_str());
            }
        }
        categories
    }

    /// Sources grouped under their category. Groups follow first-seen category order and
    /// members keep list order.
    pub fn group_by_category(&self) -> Vec<(&str, Vec<&PublicationSource>)> {
        let mut groups: Vec<(&str, Vec<&PublicationSource>)> = Vec::new();
        for source in &self.sources {
            match groups
                .iter_mut()
                .find(|(category, _)| *category == source.category.as_str())
            {
                Some((_, members)) => members.push(source),
                None => groups.push((source.category.as_str(), vec![source])),
            }
        }
        groups
    }

    pub fn filter(&self, filter: &SourceFilter) -> Vec<&PublicationSource> {
        self.sources
            .iter()
            .filter(|source| filter.matches(source))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Insert or replace in place. Returns `true` when the id was new.
    fn apply_upsert(&mut self, source: PublicationSource) -> bool {
        match self
            .sources
            .iter_mut()
            .find(|existing| existing.id == source.id)
        {
            Some(existing) => {
                *existing = source;
                false
            }
            None => {
                self.sources.push(source);
                true
            }
        }
    }

    fn apply_delete(&mut self, id: &SourceId) -> Option<PublicationSource> {
        let index = self.sources.iter().position(|source| &source.id == id)?;
        Some(self.sources.remove(index))
    }
}

impl SourceLookup for SourceTable {
    fn source(&self, id: &SourceId) -> Option<&PublicationSource> {
        self.get_by_id(id)
    }
}

/// Error raised by registry mutations.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error(transparent)]
    Validation(#[from] SourceValidationError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Persisted prestige table. Mutations are written through to the store before the held
/// table changes, so a failed write leaves the registry as it was.
pub struct SourceRegistry<S> {
    store: S,
    table: SourceTable,
}

impl<S: KeyValueStore> SourceRegistry<S> {
    /// Hydrate from `publicationSources`, falling back to the built-in table when the key
    /// has never been written. Every persisted entry must still pass validation.
    pub fn open(store: S) -> Result<Self, RegistryError> {
        let persisted =
            load_collection::<PublicationSource, _>(&store, StoreKey::PublicationSources)?;
        let table = match persisted {
            Some(sources) => {
                let sources = sources
                    .into_iter()
                    .map(PublicationSource::revalidate)
                    .collect::<Result<Vec<_>, _>>()?;
                debug!(count = sources.len(), "loaded persisted publication sources");
                SourceTable::new(sources)
            }
            None => {
                debug!("no persisted publication sources, using defaults");
                SourceTable::defaults()
            }
        };
        Ok(Self { store, table })
    }

    pub fn table(&self) -> &SourceTable {
        &self.table
    }

    pub fn list(&self) -> &[PublicationSource] {
        self.table.list()
    }

    pub fn get_by_id(&self, id: &SourceId) -> Option<&PublicationSource> {
        self.table.get_by_id(id)
    }

    pub fn group_by_category(&self) -> Vec<(&str, Vec<&PublicationSource>)> {
        self.table.group_by_category()
    }

    pub fn categories(&self) -> Vec<&str> {
        self.table.categories()
    }

    pub fn filter(&self, filter: &SourceFilter) -> Vec<&PublicationSource> {
        self.table.filter(filter)
    }

    /// Validate and insert (unseen id) or replace in place (known id).
    pub fn upsert(&mut self, draft: SourceDraft) -> Result<PublicationSource, RegistryError> {
        let id = match &draft.id {
            Some(id) if id.as_str().trim().is_empty() => {
                return Err(SourceValidationError::EmptyId.into())
            }
            Some(id) => SourceId(id.as_str().trim().to_string()),
            None => SourceId(uuid::Uuid::new_v4().to_string()),
        };
        let source = draft.validate(id)?;

        let mut next = self.table.clone();
        let inserted = next.apply_upsert(source.clone());
        self.commit(next)?;

        info!(
            source_id = %source.id,
            category = %source.category,
            points = source.points,
            inserted,
            "publication source saved"
        );
        Ok(source)
    }

    /// Remove an entry. Publications that reference it keep their frozen score.
    pub fn delete(&mut self, id: &SourceId) -> Result<Option<PublicationSource>, RegistryError> {
        let mut next = self.table.clone();
        let Some(removed) = next.apply_delete(id) else {
            debug!(source_id = %id, "delete ignored, source not present");
            return Ok(None);
        };
        self.commit(next)?;

        info!(source_id = %id, "publication source deleted");
        Ok(Some(removed))
    }

    /// Replace the whole table with the built-in defaults and persist it.
    pub fn reset_to_defaults(&mut self) -> Result<(), RegistryError> {
        self.commit(SourceTable::defaults())?;
        info!(count = self.table.len(), "publication sources reset to defaults");
        Ok(())
    }

    fn commit(&mut self, next: SourceTable) -> Result<(), RegistryError> {
        save_collection(&self.store, StoreKey::PublicationSources, next.list())?;
        self.table = next;
        Ok(())
    }
}

impl<S> SourceLookup for SourceRegistry<S> {
    fn source(&self, id: &SourceId) -> Option<&PublicationSource> {
        self.table.get_by_id(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use crate::workflows::sources::CategoryFilter;

    fn seeded_registry() -> SourceRegistry<MemoryStore> {
        SourceRegistry::open(MemoryStore::default()).expect("registry opens")
    }

    fn small_registry() -> (SourceRegistry<MemoryStore>, MemoryStore) {
        let store = MemoryStore::default();
        save_collection(
            &store,
            StoreKey::PublicationSources,
            &[
                source("a", "Alpha Journal", "Journal", 10),
                source("b", "Beta Conf", "Conference", 8),
                source("c", "Gamma Journal", "Journal", 6),
            ],
        )
        .expect("seed store");
        let registry = SourceRegistry::open(store.clone()).expect("registry opens");
        (registry, store)
    }

    fn source(id: &str, name: &str, category: &str, points: u32) -> PublicationSource {
        PublicationSource {
            id: SourceId::from(id),
            name: name.to_string(),
            category: category.to_string(),
            points,
            description: None,
        }
    }

    #[test]
    fn open_without_persisted_table_uses_defaults() {
        let registry = seeded_registry();
        assert_eq!(registry.list().len(), 39);
        assert_eq!(
            registry
                .get_by_id(&SourceId::from("12"))
                .map(|s| s.name.as_str()),
            Some("NeurIPS")
        );
    }

    #[test]
    fn get_by_id_returns_none_for_unknown_source() {
        let registry = seeded_registry();
        assert!(registry.get_by_id(&SourceId::from("does-not-exist")).is_none());
    }

    #[test]
    fn open_rejects_persisted_entries_that_break_invariants() {
        let store = MemoryStore::default();
        save_collection(
            &store,
            StoreKey::PublicationSources,
            &[
                source("a", "Alpha Journal", "Journal", 10),
                source("b", "   ", "Conference", 8),
            ],
        )
        .expect("seed store");
        match SourceRegistry::open(store) {
            Err(RegistryError::Validation(SourceValidationError::EmptyName)) => {}
            Err(other) => panic!("expected empty name error, got {other:?}"),
            Ok(_) => panic!("expected blank name to be rejected"),
        }

        let store = MemoryStore::default();
        save_collection(
            &store,
            StoreKey::PublicationSources,
            &[source("c", "Gamma Journal", "", 6)],
        )
        .expect("seed store");
        match SourceRegistry::open(store) {
            Err(RegistryError::Validation(SourceValidationError::EmptyCategory)) => {}
            Err(other) => panic!("expected empty category error, got {other:?}"),
            Ok(_) => panic!("expected blank category to be rejected"),
        }
    }

    #[test]
    fn upsert_replaces_in_place_and_preserves_position() {
        let (mut registry, _) = small_registry();
        registry
            .upsert(SourceDraft::new("Beta Conference", "Conference", 9).with_id("b"))
            .expect("upsert succeeds");

        let ids: Vec<&str> = registry.list().iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
        assert_eq!(registry.list()[1].name, "Beta Conference");
        assert_eq!(registry.list()[1].points, 9);
    }

    #[test]
    fn upsert_appends_unseen_ids_and_generates_missing_ones() {
        let (mut registry, _) = small_registry();
        registry
            .upsert(SourceDraft::new("Delta", "Workshop", 3).with_id("d"))
            .expect("insert with id");
        let generated = registry
            .upsert(SourceDraft::new("Epsilon", "Workshop", 2))
            .expect("insert without id");

        assert_eq!(registry.list().len(), 5);
        assert_eq!(registry.list()[3].id.as_str(), "d");
        assert_eq!(registry.list()[4].id, generated.id);
        assert!(!generated.id.as_str().is_empty());
    }

    #[test]
    fn invalid_upsert_writes_nothing() {
        let (mut registry, store) = small_registry();
        let before = store.raw(StoreKey::PublicationSources);

        match registry.upsert(SourceDraft::new("Broken", "Journal", -5).with_id("a")) {
            Err(RegistryError::Validation(SourceValidationError::NegativePoints(-5))) => {}
            other => panic!("expected validation error, got {other:?}"),
        }
        match registry.upsert(SourceDraft::new("Blank id", "Journal", 1).with_id("  ")) {
            Err(RegistryError::Validation(SourceValidationError::EmptyId)) => {}
            other => panic!("expected empty id error, got {other:?}"),
        }

        assert_eq!(store.raw(StoreKey::PublicationSources), before);
        assert_eq!(registry.list()[0].points, 10);
    }

    #[test]
    fn failed_write_keeps_held_table() {
        let store = MemoryStore::with_quota(16);
        let mut registry = SourceRegistry::open(store).expect("opens with defaults");

        match registry.upsert(SourceDraft::new("Nature", "Top-tier Journal", 30).with_id("1")) {
            Err(RegistryError::Storage(StorageError::QuotaExceeded { .. })) => {}
            other => panic!("expected quota error, got {other:?}"),
        }
        assert_eq!(
            registry.get_by_id(&SourceId::from("1")).map(|s| s.points),
            Some(25)
        );
    }

    #[test]
    fn delete_removes_entry_and_ignores_unknown_ids() {
        let (mut registry, store) = small_registry();
        let removed = registry
            .delete(&SourceId::from("b"))
            .expect("delete succeeds");
        assert_eq!(removed.map(|s| s.name), Some("Beta Conf".to_string()));
        assert!(registry
            .delete(&SourceId::from("missing"))
            .expect("no-op")
            .is_none());

        let reopened = SourceRegistry::open(store).expect("reopen");
        let ids: Vec<&str> = reopened.list().iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c"]);
    }

    #[test]
    fn group_by_category_uses_first_seen_order() {
        let (registry, _) = small_registry();
        let groups = registry.group_by_category();

        let keys: Vec<&str> = groups.iter().map(|(category, _)| *category).collect();
        assert_eq!(keys, vec!["Journal", "Conference"]);
        let journal: Vec<&str> = groups[0].1.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(journal, vec!["a", "c"]);
        assert_eq!(registry.categories(), vec!["Journal", "Conference"]);
    }

    #[test]
    fn default_groups_start_with_top_tier_journals() {
        let registry = seeded_registry();
        let groups = registry.group_by_category();
        assert_eq!(groups[0].0, "Top-tier Journal");
        assert_eq!(groups[0].1.len(), 4);
        assert_eq!(groups.last().map(|(category, _)| *category), Some("Other"));
    }

    #[test]
    fn filter_matches_name_or_category() {
        let (registry, _) = small_registry();

        let by_name = registry.filter(&SourceFilter::search("gamma"));
        assert_eq!(by_name.len(), 1);

        let by_category = registry.filter(&SourceFilter::search("JOURNAL"));
        assert_eq!(by_category.len(), 2);

        let scoped = registry.filter(&SourceFilter {
            search: "journal".to_string(),
            category: CategoryFilter::Only("Conference".to_string()),
        });
        assert!(scoped.is_empty());
    }

    #[test]
    fn reset_restores_defaults() {
        let (mut registry, store) = small_registry();
        registry.reset_to_defaults().expect("reset succeeds");
        assert_eq!(registry.list().len(), 39);

        let persisted: Vec<PublicationSource> =
            load_collection(&store, StoreKey::PublicationSources)
                .expect("read")
                .expect("written");
        assert_eq!(persisted.len(), 39);
    }
}
