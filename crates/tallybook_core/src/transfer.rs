//! Transactional import/export/backup/restore controller.
//!
//! # Responsibility
//! - Move complete snapshots in and out of the active backend.
//! - Guard every destructive operation with a timestamped safety backup.
//!
//! # Invariants
//! - Malformed input is rejected before any mutation (fail fast).
//! - The safety backup is written before the backend is overwritten; a
//!   write failure after that point leaves the backup on disk as the
//!   manual recovery path. No automatic rollback is attempted.
//! - Export never mutates state.

use crate::backend::BackendError;
use crate::snapshot::{validate_snapshot_value, Snapshot};
use crate::store::LedgerStore;
use crate::sync::Ledger;
use log::{info, warn};
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::fs;
use std::path::{Path, PathBuf};

pub type TransferResult<T> = Result<T, TransferError>;

/// Error for snapshot transfer operations.
#[derive(Debug)]
pub enum TransferError {
    /// The incoming snapshot failed shape validation; nothing was changed.
    InvalidImportFormat(String),
    Backend(BackendError),
    /// Reading or writing a backup file failed.
    Io(std::io::Error),
    Serde(serde_json::Error),
}

impl Display for TransferError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidImportFormat(message) => {
                write!(f, "invalid import format: {message}")
            }
            Self::Backend(err) => write!(f, "{err}"),
            Self::Io(err) => write!(f, "{err}"),
            Self::Serde(err) => write!(f, "{err}"),
        }
    }
}

impl Error for TransferError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidImportFormat(_) => None,
            Self::Backend(err) => Some(err),
            Self::Io(err) => Some(err),
            Self::Serde(err) => Some(err),
        }
    }
}

impl From<BackendError> for TransferError {
    fn from(value: BackendError) -> Self {
        Self::Backend(value)
    }
}

impl From<std::io::Error> for TransferError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for TransferError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serde(value)
    }
}

impl Ledger {
    /// Reads the full dataset from the active backend, stamped with the
    /// export time and format version. Never mutates state.
    pub fn export(&mut self) -> TransferResult<Snapshot> {
        let mut snapshot = self.backend.load_snapshot()?;
        snapshot.stamp();
        Ok(snapshot)
    }

    /// Exports the current dataset to a timestamped file under `dir`.
    ///
    /// The primary store is unaffected by a backup write failure.
    pub fn backup(&mut self, dir: &Path) -> TransferResult<PathBuf> {
        let snapshot = self.export()?;
        let path = write_backup_file(&snapshot, dir)?;
        info!(
            "event=backup module=transfer status=ok path={} entities={}",
            path.display(),
            snapshot.entity_count()
        );
        Ok(path)
    }

    /// Validates and imports a full snapshot, returning the path of the
    /// safety backup taken beforehand.
    ///
    /// Order of operations: shape validation (no mutation on failure),
    /// safety backup of current data, backend overwrite, store reload.
    pub fn import(&mut self, value: Value, backup_dir: &Path) -> TransferResult<PathBuf> {
        validate_snapshot_value(&value).map_err(TransferError::InvalidImportFormat)?;
        let snapshot: Snapshot = serde_json::from_value(value)
            .map_err(|err| TransferError::InvalidImportFormat(err.to_string()))?;
        self.replace_dataset(snapshot, backup_dir)
    }

    /// Reads a snapshot file (typically a prior backup) and imports it.
    pub fn restore(&mut self, path: &Path, backup_dir: &Path) -> TransferResult<PathBuf> {
        let raw = fs::read_to_string(path)?;
        let value: Value = serde_json::from_str(&raw)
            .map_err(|err| TransferError::InvalidImportFormat(err.to_string()))?;
        self.import(value, backup_dir)
    }

    /// Replaces every collection with empty ones and resets the company
    /// profile to its default. Equivalent to importing the canonical empty
    /// dataset, including the backup-first discipline. Idempotent.
    pub fn clear_all(&mut self, backup_dir: &Path) -> TransferResult<PathBuf> {
        self.replace_dataset(Snapshot::empty(), backup_dir)
    }

    fn replace_dataset(
        &mut self,
        snapshot: Snapshot,
        backup_dir: &Path,
    ) -> TransferResult<PathBuf> {
        let backup_path = self.backup(backup_dir)?;

        if let Err(err) = self.backend.save_snapshot(&snapshot) {
            warn!(
                "event=import module=transfer status=error error={err} recovery_backup={}",
                backup_path.display()
            );
            return Err(err.into());
        }

        // Reload through the backend so the store reflects exactly what
        // was persisted.
        let loaded = self.backend.load_snapshot()?;
        let entities = loaded.entity_count();
        self.store = LedgerStore::from_snapshot(loaded);
        info!(
            "event=import module=transfer status=ok entities={entities} safety_backup={}",
            backup_path.display()
        );
        Ok(backup_path)
    }
}

fn write_backup_file(snapshot: &Snapshot, dir: &Path) -> TransferResult<PathBuf> {
    fs::create_dir_all(dir)?;
    let stamp = chrono::Utc::now().format("%Y%m%d-%H%M%S%3f");
    let path = dir.join(format!("tallybook-backup-{stamp}.json"));
    let serialized = serde_json::to_string_pretty(snapshot)?;
    fs::write(&path, serialized)?;
    Ok(path)
}
