//! Store-to-backend sync bridge.
//!
//! # Responsibility
//! - Own the in-memory store and the active persistence backend together.
//! - Propagate every repository write to the backend as a tagged change.
//!
//! # Invariants
//! - The store is the source of truth while the process runs; the backend
//!   mirrors it write-by-write and is reloaded wholesale on import/restore.
//! - Construction loads the backend snapshot; `flush` writes it back.

use crate::backend::{Backend, BackendError, Change};
use crate::model::{
    Client, ClientPatch, CompanyProfile, DailyLog, DailyLogPatch, Entity, EntityKind, Expense,
    ExpensePatch, Invoice, InvoicePatch, NewClient, NewDailyLog, NewExpense, NewInvoice,
    NewProject, NewTimesheet, Project, ProjectPatch, Timesheet, TimesheetPatch, TimesheetStatus,
};
use crate::store::{LedgerStore, StoreError};
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub type LedgerResult<T> = Result<T, LedgerError>;

/// Error surfaced by bridged write operations.
#[derive(Debug)]
pub enum LedgerError {
    Store(StoreError),
    Backend(BackendError),
}

impl Display for LedgerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Store(err) => write!(f, "{err}"),
            Self::Backend(err) => write!(f, "{err}"),
        }
    }
}

impl Error for LedgerError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            Self::Backend(err) => Some(err),
        }
    }
}

impl From<StoreError> for LedgerError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

impl From<BackendError> for LedgerError {
    fn from(value: BackendError) -> Self {
        Self::Backend(value)
    }
}

/// The application core: repository plus active backend, with an explicit
/// lifecycle (opened from a snapshot, flushed at shutdown) instead of
/// ambient global state.
pub struct Ledger {
    pub(crate) store: LedgerStore,
    pub(crate) backend: Box<dyn Backend>,
}

impl Ledger {
    /// Loads the backend's snapshot and builds the in-memory store from it.
    pub fn open(mut backend: Box<dyn Backend>) -> LedgerResult<Self> {
        let snapshot = backend.load_snapshot()?;
        info!(
            "event=ledger_open module=sync status=ok entities={}",
            snapshot.entity_count()
        );
        Ok(Self {
            store: LedgerStore::from_snapshot(snapshot),
            backend,
        })
    }

    /// Read access to the repository.
    pub fn store(&self) -> &LedgerStore {
        &self.store
    }

    /// Writes the full current state back to the backend.
    pub fn flush(&mut self) -> LedgerResult<()> {
        let mut snapshot = self.store.to_snapshot();
        snapshot.stamp();
        self.backend.save_snapshot(&snapshot)?;
        info!(
            "event=ledger_flush module=sync status=ok entities={}",
            snapshot.entity_count()
        );
        Ok(())
    }

    // ----- clients -----

    pub fn add_client(&mut self, new: NewClient) -> LedgerResult<Client> {
        let client = self.store.add_client(new)?;
        self.backend
            .apply(&Change::Upsert(Entity::Client(client.clone())))?;
        Ok(client)
    }

    pub fn update_client(&mut self, id: Uuid, patch: ClientPatch) -> LedgerResult<Client> {
        let client = self.store.update_client(id, patch)?;
        self.backend
            .apply(&Change::Upsert(Entity::Client(client.clone())))?;
        Ok(client)
    }

    pub fn remove_client(&mut self, id: Uuid) -> LedgerResult<Client> {
        let client = self.store.remove_client(id)?;
        self.backend
            .apply(&Change::Remove(EntityKind::Client, id))?;
        Ok(client)
    }

    // ----- projects -----

    pub fn add_project(&mut self, new: NewProject) -> LedgerResult<Project> {
        let project = self.store.add_project(new)?;
        self.backend
            .apply(&Change::Upsert(Entity::Project(project.clone())))?;
        Ok(project)
    }

    pub fn update_project(&mut self, id: Uuid, patch: ProjectPatch) -> LedgerResult<Project> {
        let project = self.store.update_project(id, patch)?;
        self.backend
            .apply(&Change::Upsert(Entity::Project(project.clone())))?;
        Ok(project)
    }

    pub fn remove_project(&mut self, id: Uuid) -> LedgerResult<Project> {
        let project = self.store.remove_project(id)?;
        self.backend
            .apply(&Change::Remove(EntityKind::Project, id))?;
        Ok(project)
    }

    // ----- timesheets -----

    pub fn add_timesheet(&mut self, new: NewTimesheet) -> LedgerResult<Timesheet> {
        let timesheet = self.store.add_timesheet(new)?;
        self.backend
            .apply(&Change::Upsert(Entity::Timesheet(timesheet.clone())))?;
        Ok(timesheet)
    }

    /// Applies a timesheet update. When the update transitions the sheet to
    /// `invoiced`, the generated invoice is propagated as well.
    pub fn update_timesheet(&mut self, id: Uuid, patch: TimesheetPatch) -> LedgerResult<Timesheet> {
        let timesheet = self.store.update_timesheet(id, patch)?;
        self.backend
            .apply(&Change::Upsert(Entity::Timesheet(timesheet.clone())))?;
        if timesheet.status == TimesheetStatus::Invoiced {
            if let Some(invoice) = timesheet
                .invoice_id
                .and_then(|invoice_id| self.store.invoice(invoice_id))
                .cloned()
            {
                self.backend
                    .apply(&Change::Upsert(Entity::Invoice(invoice)))?;
            }
        }
        Ok(timesheet)
    }

    pub fn remove_timesheet(&mut self, id: Uuid) -> LedgerResult<Timesheet> {
        let timesheet = self.store.remove_timesheet(id)?;
        self.backend
            .apply(&Change::Remove(EntityKind::Timesheet, id))?;
        Ok(timesheet)
    }

    // ----- invoices -----

    pub fn add_invoice(&mut self, new: NewInvoice) -> LedgerResult<Invoice> {
        let invoice = self.store.add_invoice(new)?;
        self.backend
            .apply(&Change::Upsert(Entity::Invoice(invoice.clone())))?;
        Ok(invoice)
    }

    pub fn update_invoice(&mut self, id: Uuid, patch: InvoicePatch) -> LedgerResult<Invoice> {
        let invoice = self.store.update_invoice(id, patch)?;
        self.backend
            .apply(&Change::Upsert(Entity::Invoice(invoice.clone())))?;
        Ok(invoice)
    }

    pub fn remove_invoice(&mut self, id: Uuid) -> LedgerResult<Invoice> {
        let invoice = self.store.remove_invoice(id)?;
        self.backend
            .apply(&Change::Remove(EntityKind::Invoice, id))?;
        Ok(invoice)
    }

    /// Generates an invoice from a timesheet and persists it.
    pub fn generate_invoice_from_timesheet(&mut self, timesheet_id: Uuid) -> LedgerResult<Invoice> {
        let invoice = self.store.generate_invoice_from_timesheet(timesheet_id)?;
        self.backend
            .apply(&Change::Upsert(Entity::Invoice(invoice.clone())))?;
        Ok(invoice)
    }

    // ----- expenses -----

    pub fn add_expense(&mut self, new: NewExpense) -> LedgerResult<Expense> {
        let expense = self.store.add_expense(new)?;
        self.backend
            .apply(&Change::Upsert(Entity::Expense(expense.clone())))?;
        Ok(expense)
    }

    pub fn update_expense(&mut self, id: Uuid, patch: ExpensePatch) -> LedgerResult<Expense> {
        let expense = self.store.update_expense(id, patch)?;
        self.backend
            .apply(&Change::Upsert(Entity::Expense(expense.clone())))?;
        Ok(expense)
    }

    pub fn remove_expense(&mut self, id: Uuid) -> LedgerResult<Expense> {
        let expense = self.store.remove_expense(id)?;
        self.backend
            .apply(&Change::Remove(EntityKind::Expense, id))?;
        Ok(expense)
    }

    // ----- daily logs -----

    pub fn add_daily_log(&mut self, new: NewDailyLog) -> LedgerResult<DailyLog> {
        let log = self.store.add_daily_log(new)?;
        self.backend
            .apply(&Change::Upsert(Entity::DailyLog(log.clone())))?;
        Ok(log)
    }

    pub fn update_daily_log(&mut self, id: Uuid, patch: DailyLogPatch) -> LedgerResult<DailyLog> {
        let log = self.store.update_daily_log(id, patch)?;
        self.backend
            .apply(&Change::Upsert(Entity::DailyLog(log.clone())))?;
        Ok(log)
    }

    pub fn remove_daily_log(&mut self, id: Uuid) -> LedgerResult<DailyLog> {
        let log = self.store.remove_daily_log(id)?;
        self.backend
            .apply(&Change::Remove(EntityKind::DailyLog, id))?;
        Ok(log)
    }

    // ----- company profile -----

    pub fn set_company_profile(&mut self, profile: CompanyProfile) -> LedgerResult<CompanyProfile> {
        let profile = self.store.set_company_profile(profile);
        self.backend.apply(&Change::Profile(profile.clone()))?;
        Ok(profile)
    }
}
