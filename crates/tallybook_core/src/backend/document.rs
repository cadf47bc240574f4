//! Flat document backend: the whole dataset as one JSON file.
//!
//! # Invariants
//! - Every write rewrites the whole file through a temp-file-then-rename,
//!   so a crash mid-write never leaves a partially-written primary file.
//! - A missing file is initialized with the canonical empty dataset on
//!   first use; the parent directory is created if absent.

use crate::backend::{apply_change_to_snapshot, Backend, BackendResult, Change};
use crate::snapshot::Snapshot;
use log::info;
use std::fs;
use std::path::{Path, PathBuf};

pub struct DocumentBackend {
    path: PathBuf,
}

impl DocumentBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_file(&self, snapshot: &Snapshot) -> BackendResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let serialized = serde_json::to_string_pretty(snapshot)?;
        let temp_path = self.path.with_extension("json.tmp");
        fs::write(&temp_path, serialized)?;
        fs::rename(&temp_path, &self.path)?;
        Ok(())
    }
}

impl Backend for DocumentBackend {
    fn load_snapshot(&mut self) -> BackendResult<Snapshot> {
        if !self.path.exists() {
            let snapshot = Snapshot::empty();
            self.write_file(&snapshot)?;
            info!(
                "event=document_init module=backend status=ok path={}",
                self.path.display()
            );
            return Ok(snapshot);
        }

        let raw = fs::read_to_string(&self.path)?;
        let snapshot = serde_json::from_str(&raw)?;
        Ok(snapshot)
    }

    fn save_snapshot(&mut self, snapshot: &Snapshot) -> BackendResult<()> {
        self.write_file(snapshot)
    }

    fn apply(&mut self, change: &Change) -> BackendResult<()> {
        let mut snapshot = self.load_snapshot()?;
        apply_change_to_snapshot(&mut snapshot, change);
        snapshot.stamp();
        self.write_file(&snapshot)
    }
}
