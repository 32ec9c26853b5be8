use std::path::PathBuf;
use std::sync::Arc;

use candidate_eval::config::AppConfig;
use candidate_eval::error::AppError;
use candidate_eval::storage::JsonFileStore;
use candidate_eval::workflows::candidates::{CandidateService, CandidateStore, ReviewerScore};
use candidate_eval::workflows::sources::SourceRegistry;
use serde::Serialize;

pub(crate) type Registry = SourceRegistry<JsonFileStore>;
pub(crate) type Service = CandidateService<CandidateStore<JsonFileStore>>;

/// Resolved directories for one invocation.
#[derive(Debug, Clone)]
pub(crate) struct Workspace {
    pub(crate) data_dir: PathBuf,
    pub(crate) export_dir: PathBuf,
}

impl Workspace {
    pub(crate) fn from_config(config: &AppConfig) -> Self {
        Self {
            data_dir: config.storage.data_dir.clone(),
            export_dir: config.export.output_dir.clone(),
        }
    }

    fn store(&self) -> JsonFileStore {
        JsonFileStore::new(self.data_dir.clone())
    }

    pub(crate) fn registry(&self) -> Result<Registry, AppError> {
        Ok(SourceRegistry::open(self.store())?)
    }

    pub(crate) fn candidates(&self) -> Result<Service, AppError> {
        let store = CandidateStore::open(self.store())?;
        Ok(CandidateService::new(Arc::new(store)))
    }
}

pub(crate) fn parse_reviewer_score(raw: &str) -> Result<ReviewerScore, String> {
    let value: u8 = raw
        .trim()
        .parse()
        .map_err(|err| format!("failed to parse '{raw}' as a number ({err})"))?;
    ReviewerScore::new(value).map_err(|err| err.to_string())
}

pub(crate) fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), AppError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
