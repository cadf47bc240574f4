//! Persistence backend contract.
//!
//! # Responsibility
//! - Define the one contract both storage representations implement.
//! - Provide the tagged change type the sync bridge propagates.
//!
//! # Invariants
//! - Applying a `Change` must be observably equivalent to loading the full
//!   snapshot, mutating the relevant collection, and saving it back.
//! - `save_snapshot` fully replaces prior backend content.

use crate::db::DbError;
use crate::model::{CompanyProfile, Entity, EntityKind};
use crate::snapshot::Snapshot;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub mod document;
pub mod relational;

pub use document::DocumentBackend;
pub use relational::RelationalBackend;

pub type BackendResult<T> = Result<T, BackendError>;

/// Storage-level failure of either backend.
#[derive(Debug)]
pub enum BackendError {
    Io(std::io::Error),
    Serde(serde_json::Error),
    Db(DbError),
    /// Persisted state that does not deserialize into a valid entity.
    InvalidData(String),
}

impl Display for BackendError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "{err}"),
            Self::Serde(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for BackendError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Serde(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::InvalidData(_) => None,
        }
    }
}

impl From<std::io::Error> for BackendError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for BackendError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serde(value)
    }
}

impl From<DbError> for BackendError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for BackendError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// One repository write, tagged by entity type, for backend propagation.
#[derive(Debug, Clone, PartialEq)]
pub enum Change {
    /// Insert-or-replace one entity by id.
    Upsert(Entity),
    /// Remove one entity by id, cascading to its dependents the same way
    /// the relational schema's `ON DELETE` rules do: client removal drops
    /// its projects and invoices, project removal drops its timesheets and
    /// invoices and clears the project link on expenses and daily logs,
    /// timesheet removal drops the invoice generated from it. Removal of an
    /// absent id is a no-op at the backend level; existence is the store's
    /// concern.
    Remove(EntityKind, Uuid),
    /// Replace the singleton company profile.
    Profile(CompanyProfile),
}

/// Storage implementation moving complete or incremental state.
pub trait Backend {
    /// Reads the full dataset. A missing/empty store yields the canonical
    /// empty dataset.
    fn load_snapshot(&mut self) -> BackendResult<Snapshot>;

    /// Replaces the entire backend content with `snapshot`.
    fn save_snapshot(&mut self, snapshot: &Snapshot) -> BackendResult<()>;

    /// Applies one incremental change.
    fn apply(&mut self, change: &Change) -> BackendResult<()>;
}

/// Applies `change` to an in-memory snapshot. The document backend uses
/// this to implement read-modify-rewrite; it also serves as the reference
/// semantics the relational backend must match.
pub fn apply_change_to_snapshot(snapshot: &mut Snapshot, change: &Change) {
    match change {
        Change::Upsert(entity) => match entity {
            Entity::Client(client) => upsert_by_id(&mut snapshot.clients, client, |c| c.id),
            Entity::Project(project) => upsert_by_id(&mut snapshot.projects, project, |p| p.id),
            Entity::Timesheet(timesheet) => {
                upsert_by_id(&mut snapshot.timesheets, timesheet, |t| t.id)
            }
            Entity::Invoice(invoice) => upsert_by_id(&mut snapshot.invoices, invoice, |i| i.id),
            Entity::Expense(expense) => upsert_by_id(&mut snapshot.expenses, expense, |e| e.id),
            Entity::DailyLog(log) => upsert_by_id(&mut snapshot.daily_logs, log, |l| l.id),
        },
        Change::Remove(kind, id) => remove_with_dependents(snapshot, *kind, *id),
        Change::Profile(profile) => snapshot.company_profile = profile.clone(),
    }
}

fn remove_with_dependents(snapshot: &mut Snapshot, kind: EntityKind, id: Uuid) {
    match kind {
        EntityKind::Client => {
            snapshot.clients.retain(|c| c.id != id);
            let removed_projects: Vec<Uuid> = snapshot
                .projects
                .iter()
                .filter(|p| p.client_id == id)
                .map(|p| p.id)
                .collect();
            snapshot.projects.retain(|p| p.client_id != id);
            for project_id in removed_projects {
                detach_project(snapshot, project_id);
            }
            snapshot.invoices.retain(|i| i.client_id != id);
        }
        EntityKind::Project => {
            snapshot.projects.retain(|p| p.id != id);
            detach_project(snapshot, id);
        }
        EntityKind::Timesheet => {
            snapshot.timesheets.retain(|t| t.id != id);
            snapshot.invoices.retain(|i| i.timesheet_id != Some(id));
        }
        EntityKind::Invoice => snapshot.invoices.retain(|i| i.id != id),
        EntityKind::Expense => snapshot.expenses.retain(|e| e.id != id),
        EntityKind::DailyLog => snapshot.daily_logs.retain(|l| l.id != id),
    }
}

fn detach_project(snapshot: &mut Snapshot, project_id: Uuid) {
    let removed_timesheets: Vec<Uuid> = snapshot
        .timesheets
        .iter()
        .filter(|t| t.project_id == project_id)
        .map(|t| t.id)
        .collect();
    snapshot.timesheets.retain(|t| t.project_id != project_id);
    snapshot.invoices.retain(|i| {
        i.project_id != project_id
            && i.timesheet_id
                .map_or(true, |tid| !removed_timesheets.contains(&tid))
    });
    for expense in &mut snapshot.expenses {
        if expense.project_id == Some(project_id) {
            expense.project_id = None;
        }
    }
    for log in &mut snapshot.daily_logs {
        if log.project_id == Some(project_id) {
            log.project_id = None;
        }
    }
}

fn upsert_by_id<T: Clone>(collection: &mut Vec<T>, entity: &T, id_of: impl Fn(&T) -> Uuid) {
    let id = id_of(entity);
    match collection.iter_mut().find(|existing| id_of(existing) == id) {
        Some(existing) => *existing = entity.clone(),
        None => collection.push(entity.clone()),
    }
}
