//! Ledger persistence.
//!
//! The ledger is a single JSON document on disk. Loading never fails: a
//! missing or damaged file yields the default ledger.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::models::Ledger;

/// Store error types.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Durable holder of the single ledger record.
pub trait LedgerStore: Send + Sync {
    /// Read the stored ledger, or a default ledger if none is usable.
    fn load(&self) -> Ledger;

    /// Persist the ledger.
    fn save(&self, ledger: &Ledger) -> Result<(), StoreError>;
}

/// Ledger stored as pretty-printed JSON in a file.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "ledger".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl LedgerStore for FileStore {
    fn load(&self) -> Ledger {
        let contents = match fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!("No ledger at {}, starting fresh", self.path.display());
                return Ledger::default();
            }
            Err(e) => {
                tracing::warn!("Failed to read ledger {}: {}", self.path.display(), e);
                return Ledger::default();
            }
        };

        match serde_json::from_str::<Ledger>(&contents) {
            Ok(ledger) => ledger.sanitized(),
            Err(e) => {
                tracing::warn!(
                    "Ledger {} is corrupt, starting fresh: {}",
                    self.path.display(),
                    e
                );
                Ledger::default()
            }
        }
    }

    fn save(&self, ledger: &Ledger) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let json = serde_json::to_string_pretty(ledger)?;

        // Write then rename so readers never see a partial file
        let tmp = self.temp_path();
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

#[cfg(test)]
pub(crate) use memory::MemoryStore;
