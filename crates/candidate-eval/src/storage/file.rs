use std::fs::{self, File};
use std::io::{BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use super::{KeyValueStore, StorageError, StoreKey};

/// Directory-backed store: one `<key>.json` file per key.
///
/// Writes land in a sibling temp file that is synced and then renamed over the target,
/// so readers observe either the previous snapshot or the new one.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    root: PathBuf,
}

impl JsonFileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, key: StoreKey) -> PathBuf {
        self.root.join(format!("{}.json", key.as_str()))
    }

    fn tmp_path_for(&self, key: StoreKey) -> PathBuf {
        self.root
            .join(format!(".{}.json.tmp-{}", key.as_str(), std::process::id()))
    }
}

impl KeyValueStore for JsonFileStore {
    fn read(&self, key: StoreKey) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(raw) => Ok(Some(raw)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Io { key, source }),
        }
    }

    fn write(&self, key: StoreKey, value: &str) -> Result<(), StorageError> {
        fs::create_dir_all(&self.root).map_err(|source| StorageError::Io { key, source })?;

        let tmp_path = self.tmp_path_for(key);
        let write_result = (|| -> std::io::Result<()> {
            let file = File::create(&tmp_path)?;
            let mut writer = BufWriter::new(file);
            writer.write_all(value.as_bytes())?;
            writer.flush()?;
            let file = writer.into_inner().map_err(|err| err.into_error())?;
            file.sync_all()
        })();

        if let Err(source) = write_result {
            let _ = fs::remove_file(&tmp_path);
            return Err(StorageError::Io { key, source });
        }

        let target = self.path_for(key);
        fs::rename(&tmp_path, &target).map_err(|source| {
            let _ = fs::remove_file(&tmp_path);
            StorageError::Io { key, source }
        })?;

        debug!(
            key = key.as_str(),
            bytes = value.len(),
            path = %target.display(),
            "collection persisted"
        );
        Ok(())
    }
}
