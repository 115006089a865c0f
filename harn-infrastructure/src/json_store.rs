use crate::memory_store::{InMemoryStore, StoreSnapshot};
use std::{
    fs, io,
    path::{Path, PathBuf},
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreFileError {
    #[error("failed to read store file {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to write store file {}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("store file {} is not valid", .path.display())]
    Format {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// A JSON file holding a [`StoreSnapshot`].
#[derive(Clone, Debug)]
pub struct JsonStoreFile {
    path: PathBuf,
}

impl JsonStoreFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the store; a missing file yields an empty store.
    pub fn load(&self) -> Result<InMemoryStore, StoreFileError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "Store file missing, starting empty");
                return Ok(InMemoryStore::new());
            }
            Err(source) => {
                return Err(StoreFileError::Read {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        let snapshot: StoreSnapshot =
            serde_json::from_slice(&bytes).map_err(|source| StoreFileError::Format {
                path: self.path.clone(),
                source,
            })?;
        tracing::debug!(
            path = %self.path.display(),
            bills = snapshot.bills.len(),
            bank_accounts = snapshot.bank_accounts.len(),
            "Store loaded"
        );
        Ok(InMemoryStore::from_snapshot(snapshot))
    }

    /// Writes the store next to its final path, then renames it into place.
    pub fn save(&self, store: &InMemoryStore) -> Result<(), StoreFileError> {
        let snapshot = store.snapshot();
        let bytes =
            serde_json::to_vec_pretty(&snapshot).map_err(|source| StoreFileError::Format {
                path: self.path.clone(),
                source,
            })?;

        let write_err = |source: io::Error| StoreFileError::Write {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(write_err)?;
        }
        let staging = self.path.with_extension("json.tmp");
        fs::write(&staging, bytes).map_err(write_err)?;
        fs::rename(&staging, &self.path).map_err(write_err)?;

        tracing::debug!(path = %self.path.display(), bills = snapshot.bills.len(), "Store saved");
        Ok(())
    }
}
