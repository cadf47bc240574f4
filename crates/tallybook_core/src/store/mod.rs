//! In-memory entity repository.
//!
//! # Responsibility
//! - Own every entity collection plus the company profile singleton.
//! - Enforce referential and derived-value invariants at write time.
//! - Enforce the timesheet and invoice status machines.
//!
//! # Invariants
//! - Ids and business codes are assigned at creation and never reassigned.
//! - Every write re-validates the affected entity before it is stored; a
//!   failed write leaves the store unchanged.
//! - Deletes cascade to dependents exactly like the relational schema's
//!   `ON DELETE` rules: removing a client drops its projects and invoices,
//!   removing a project drops its timesheets and invoices and detaches
//!   expenses and daily logs, removing a timesheet drops its invoice. Both
//!   backends apply the same rules, so store and backend never diverge.

use crate::codes::{self, CodeKind};
use crate::model::{
    now_ms, Client, ClientPatch, CompanyProfile, DailyLog, DailyLogPatch, EntityKind, Expense,
    ExpensePatch, Invoice, InvoicePatch, NewClient, NewDailyLog, NewExpense, NewInvoice,
    NewProject, NewTimesheet, Project, ProjectPatch, Timesheet, TimesheetPatch, TimesheetStatus,
    ValidationError,
};
use crate::model::timesheet::is_valid_month;
use crate::snapshot::Snapshot;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

mod dashboard;
mod invoice_gen;

pub use dashboard::DashboardSummary;

pub type StoreResult<T> = Result<T, StoreError>;

/// Error for repository write and lookup operations.
#[derive(Debug)]
pub enum StoreError {
    /// The id addressed by the operation does not exist.
    NotFound { kind: EntityKind, id: Uuid },
    /// A required linked entity is missing.
    DependencyNotFound { kind: EntityKind, id: Uuid },
    /// A status change that is not a legal forward transition.
    InvalidStateTransition {
        kind: EntityKind,
        from: &'static str,
        to: &'static str,
    },
    Validation(ValidationError),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound { kind, id } => write!(f, "{kind} not found: {id}"),
            Self::DependencyNotFound { kind, id } => {
                write!(f, "referenced {kind} does not exist: {id}")
            }
            Self::InvalidStateTransition { kind, from, to } => {
                write!(f, "illegal {kind} status transition {from} -> {to}")
            }
            Self::Validation(err) => write!(f, "{err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for StoreError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

/// The in-memory dataset. Constructed from a loaded snapshot, torn down by
/// flushing back through the sync bridge; never ambient global state.
#[derive(Debug, Clone, Default)]
pub struct LedgerStore {
    clients: Vec<Client>,
    projects: Vec<Project>,
    timesheets: Vec<Timesheet>,
    invoices: Vec<Invoice>,
    expenses: Vec<Expense>,
    daily_logs: Vec<DailyLog>,
    company_profile: CompanyProfile,
    dataset_created_at: i64,
}

impl LedgerStore {
    /// Builds a store from a loaded snapshot, replacing all prior content.
    pub fn from_snapshot(snapshot: Snapshot) -> Self {
        Self {
            clients: snapshot.clients,
            projects: snapshot.projects,
            timesheets: snapshot.timesheets,
            invoices: snapshot.invoices,
            expenses: snapshot.expenses,
            daily_logs: snapshot.daily_logs,
            company_profile: snapshot.company_profile,
            dataset_created_at: snapshot.created_at,
        }
    }

    /// Serializes the full current state into a snapshot.
    pub fn to_snapshot(&self) -> Snapshot {
        let mut snapshot = Snapshot::empty();
        snapshot.clients = self.clients.clone();
        snapshot.projects = self.projects.clone();
        snapshot.timesheets = self.timesheets.clone();
        snapshot.invoices = self.invoices.clone();
        snapshot.expenses = self.expenses.clone();
        snapshot.daily_logs = self.daily_logs.clone();
        snapshot.company_profile = self.company_profile.clone();
        if self.dataset_created_at > 0 {
            snapshot.created_at = self.dataset_created_at;
        }
        snapshot
    }

    // ----- clients -----

    pub fn add_client(&mut self, new: NewClient) -> StoreResult<Client> {
        let code = codes::next_code(
            CodeKind::Client,
            self.clients.iter().map(|c| c.code.as_str()),
            &codes::current_year_scope(),
        );
        let client = Client::create(new, code);
        client.validate()?;
        self.clients.push(client.clone());
        Ok(client)
    }

    pub fn update_client(&mut self, id: Uuid, patch: ClientPatch) -> StoreResult<Client> {
        let index = self.client_index(id)?;
        let mut candidate = self.clients[index].clone();
        candidate.merge(patch);
        candidate.validate()?;
        candidate.updated_at = now_ms();
        self.clients[index] = candidate.clone();
        Ok(candidate)
    }

    /// Removes a client and everything hanging off it: its projects (with
    /// their own dependents) and its invoices.
    pub fn remove_client(&mut self, id: Uuid) -> StoreResult<Client> {
        let index = self.client_index(id)?;
        let client = self.clients.remove(index);
        let removed_projects: Vec<Uuid> = self
            .projects
            .iter()
            .filter(|p| p.client_id == id)
            .map(|p| p.id)
            .collect();
        self.projects.retain(|p| p.client_id != id);
        for project_id in removed_projects {
            self.detach_project_dependents(project_id);
        }
        self.invoices.retain(|i| i.client_id != id);
        Ok(client)
    }

    pub fn client(&self, id: Uuid) -> Option<&Client> {
        self.clients.iter().find(|c| c.id == id)
    }

    pub fn clients(&self) -> &[Client] {
        &self.clients
    }

    fn client_index(&self, id: Uuid) -> StoreResult<usize> {
        self.clients
            .iter()
            .position(|c| c.id == id)
            .ok_or(StoreError::NotFound {
                kind: EntityKind::Client,
                id,
            })
    }

    fn require_client(&self, id: Uuid) -> StoreResult<&Client> {
        self.client(id).ok_or(StoreError::DependencyNotFound {
            kind: EntityKind::Client,
            id,
        })
    }

    // ----- projects -----

    pub fn add_project(&mut self, new: NewProject) -> StoreResult<Project> {
        self.require_client(new.client_id)?;
        let code = codes::next_code(
            CodeKind::Project,
            self.projects.iter().map(|p| p.code.as_str()),
            &codes::current_year_scope(),
        );
        let project = Project::create(new, code);
        project.validate()?;
        self.projects.push(project.clone());
        Ok(project)
    }

    pub fn update_project(&mut self, id: Uuid, patch: ProjectPatch) -> StoreResult<Project> {
        let index = self.project_index(id)?;
        if let Some(client_id) = patch.client_id {
            self.require_client(client_id)?;
        }
        let mut candidate = self.projects[index].clone();
        candidate.merge(patch);
        candidate.validate()?;
        candidate.updated_at = now_ms();
        self.projects[index] = candidate.clone();
        Ok(candidate)
    }

    /// Removes a project, its timesheets and invoices; expenses and daily
    /// logs survive with their project link cleared.
    pub fn remove_project(&mut self, id: Uuid) -> StoreResult<Project> {
        let index = self.project_index(id)?;
        let project = self.projects.remove(index);
        self.detach_project_dependents(id);
        Ok(project)
    }

    /// Drops timesheets and invoices of a removed project and clears the
    /// project link on expenses and daily logs. Mirrors the relational
    /// schema's `ON DELETE CASCADE` / `ON DELETE SET NULL` rules.
    fn detach_project_dependents(&mut self, project_id: Uuid) {
        let removed_timesheets: Vec<Uuid> = self
            .timesheets
            .iter()
            .filter(|t| t.project_id == project_id)
            .map(|t| t.id)
            .collect();
        self.timesheets.retain(|t| t.project_id != project_id);
        self.invoices.retain(|i| {
            i.project_id != project_id
                && i.timesheet_id
                    .map_or(true, |tid| !removed_timesheets.contains(&tid))
        });
        for expense in &mut self.expenses {
            if expense.project_id == Some(project_id) {
                expense.project_id = None;
            }
        }
        for log in &mut self.daily_logs {
            if log.project_id == Some(project_id) {
                log.project_id = None;
            }
        }
    }

    pub fn project(&self, id: Uuid) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == id)
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn projects_of_client(&self, client_id: Uuid) -> Vec<&Project> {
        self.projects
            .iter()
            .filter(|p| p.client_id == client_id)
            .collect()
    }

    fn project_index(&self, id: Uuid) -> StoreResult<usize> {
        self.projects
            .iter()
            .position(|p| p.id == id)
            .ok_or(StoreError::NotFound {
                kind: EntityKind::Project,
                id,
            })
    }

    fn require_project(&self, id: Uuid) -> StoreResult<&Project> {
        self.project(id).ok_or(StoreError::DependencyNotFound {
            kind: EntityKind::Project,
            id,
        })
    }

    // ----- timesheets -----

    pub fn add_timesheet(&mut self, new: NewTimesheet) -> StoreResult<Timesheet> {
        self.require_project(new.project_id)?;
        if !is_valid_month(&new.month) {
            return Err(ValidationError::InvalidMonth(new.month).into());
        }
        let code = codes::next_code(
            CodeKind::Timesheet,
            self.timesheets.iter().map(|t| t.code.as_str()),
            &new.month,
        );
        let timesheet = Timesheet::create(new, code);
        timesheet.validate()?;
        self.timesheets.push(timesheet.clone());
        Ok(timesheet)
    }

    /// Applies a partial update, enforcing the approval state machine.
    ///
    /// Transitioning to `invoiced` with no linked invoice generates one via
    /// [`LedgerStore::generate_invoice_from_timesheet`] and links it; a
    /// failed update never leaves an orphan invoice behind.
    pub fn update_timesheet(&mut self, id: Uuid, patch: TimesheetPatch) -> StoreResult<Timesheet> {
        let index = self.timesheet_index(id)?;
        let mut candidate = self.timesheets[index].clone();
        candidate.merge(&patch);
        if let Some(reason) = patch.rejection_reason {
            candidate.rejection_reason = Some(reason);
        }

        let mut generated_invoice = None;
        if let Some(next) = patch.status {
            if next != candidate.status {
                if !candidate.status.can_transition_to(next) {
                    return Err(StoreError::InvalidStateTransition {
                        kind: EntityKind::Timesheet,
                        from: candidate.status.as_str(),
                        to: next.as_str(),
                    });
                }
                let now = now_ms();
                match next {
                    TimesheetStatus::Submitted => candidate.submitted_at = Some(now),
                    TimesheetStatus::Approved => candidate.approved_at = Some(now),
                    TimesheetStatus::Rejected => candidate.rejected_at = Some(now),
                    TimesheetStatus::Invoiced => {
                        if candidate.invoice_id.is_none() {
                            let invoice = self.build_invoice_for(&candidate)?;
                            candidate.invoice_id = Some(invoice.id);
                            generated_invoice = Some(invoice);
                        }
                    }
                    TimesheetStatus::Draft => {}
                }
                candidate.status = next;
            }
        }

        candidate.validate()?;
        candidate.updated_at = now_ms();
        if let Some(invoice) = generated_invoice {
            self.invoices.push(invoice);
        }
        self.timesheets[index] = candidate.clone();
        Ok(candidate)
    }

    /// Removes a timesheet along with the invoice generated from it.
    pub fn remove_timesheet(&mut self, id: Uuid) -> StoreResult<Timesheet> {
        let index = self.timesheet_index(id)?;
        let timesheet = self.timesheets.remove(index);
        self.invoices.retain(|i| i.timesheet_id != Some(id));
        Ok(timesheet)
    }

    pub fn timesheet(&self, id: Uuid) -> Option<&Timesheet> {
        self.timesheets.iter().find(|t| t.id == id)
    }

    pub fn timesheets(&self) -> &[Timesheet] {
        &self.timesheets
    }

    pub fn timesheets_of_project(&self, project_id: Uuid) -> Vec<&Timesheet> {
        self.timesheets
            .iter()
            .filter(|t| t.project_id == project_id)
            .collect()
    }

    fn timesheet_index(&self, id: Uuid) -> StoreResult<usize> {
        self.timesheets
            .iter()
            .position(|t| t.id == id)
            .ok_or(StoreError::NotFound {
                kind: EntityKind::Timesheet,
                id,
            })
    }

    // ----- invoices -----

    pub fn add_invoice(&mut self, new: NewInvoice) -> StoreResult<Invoice> {
        self.require_client(new.client_id)?;
        self.require_project(new.project_id)?;
        if let Some(timesheet_id) = new.timesheet_id {
            if self.timesheet(timesheet_id).is_none() {
                return Err(StoreError::DependencyNotFound {
                    kind: EntityKind::Timesheet,
                    id: timesheet_id,
                });
            }
        }
        let number = codes::next_code(
            CodeKind::Invoice,
            self.invoices.iter().map(|i| i.number.as_str()),
            &codes::year_scope(new.issue_date),
        );
        let invoice = Invoice::create(new, number);
        invoice.validate()?;
        self.invoices.push(invoice.clone());
        Ok(invoice)
    }

    /// Applies a partial update, enforcing the forward-only payment states.
    pub fn update_invoice(&mut self, id: Uuid, patch: InvoicePatch) -> StoreResult<Invoice> {
        let index = self.invoice_index(id)?;
        let mut candidate = self.invoices[index].clone();
        candidate.merge(&patch);
        if let Some(next) = patch.status {
            if next != candidate.status {
                if !candidate.status.can_transition_to(next) {
                    return Err(StoreError::InvalidStateTransition {
                        kind: EntityKind::Invoice,
                        from: candidate.status.as_str(),
                        to: next.as_str(),
                    });
                }
                candidate.status = next;
            }
        }
        candidate.validate()?;
        candidate.updated_at = now_ms();
        self.invoices[index] = candidate.clone();
        Ok(candidate)
    }

    pub fn remove_invoice(&mut self, id: Uuid) -> StoreResult<Invoice> {
        let index = self.invoice_index(id)?;
        Ok(self.invoices.remove(index))
    }

    pub fn invoice(&self, id: Uuid) -> Option<&Invoice> {
        self.invoices.iter().find(|i| i.id == id)
    }

    pub fn invoices(&self) -> &[Invoice] {
        &self.invoices
    }

    pub fn invoices_of_client(&self, client_id: Uuid) -> Vec<&Invoice> {
        self.invoices
            .iter()
            .filter(|i| i.client_id == client_id)
            .collect()
    }

    fn invoice_index(&self, id: Uuid) -> StoreResult<usize> {
        self.invoices
            .iter()
            .position(|i| i.id == id)
            .ok_or(StoreError::NotFound {
                kind: EntityKind::Invoice,
                id,
            })
    }

    // ----- expenses -----

    pub fn add_expense(&mut self, new: NewExpense) -> StoreResult<Expense> {
        if let Some(project_id) = new.project_id {
            self.require_project(project_id)?;
        }
        let code = codes::next_code(
            CodeKind::Expense,
            self.expenses.iter().map(|e| e.code.as_str()),
            &codes::year_scope(new.date),
        );
        let expense = Expense::create(new, code);
        expense.validate()?;
        self.expenses.push(expense.clone());
        Ok(expense)
    }

    pub fn update_expense(&mut self, id: Uuid, patch: ExpensePatch) -> StoreResult<Expense> {
        let index = self.expense_index(id)?;
        if let Some(Some(project_id)) = patch.project_id {
            self.require_project(project_id)?;
        }
        let mut candidate = self.expenses[index].clone();
        candidate.merge(patch);
        candidate.validate()?;
        candidate.updated_at = now_ms();
        self.expenses[index] = candidate.clone();
        Ok(candidate)
    }

    pub fn remove_expense(&mut self, id: Uuid) -> StoreResult<Expense> {
        let index = self.expense_index(id)?;
        Ok(self.expenses.remove(index))
    }

    pub fn expense(&self, id: Uuid) -> Option<&Expense> {
        self.expenses.iter().find(|e| e.id == id)
    }

    pub fn expenses(&self) -> &[Expense] {
        &self.expenses
    }

    pub fn expenses_of_project(&self, project_id: Uuid) -> Vec<&Expense> {
        self.expenses
            .iter()
            .filter(|e| e.project_id == Some(project_id))
            .collect()
    }

    fn expense_index(&self, id: Uuid) -> StoreResult<usize> {
        self.expenses
            .iter()
            .position(|e| e.id == id)
            .ok_or(StoreError::NotFound {
                kind: EntityKind::Expense,
                id,
            })
    }

    // ----- daily logs -----

    pub fn add_daily_log(&mut self, new: NewDailyLog) -> StoreResult<DailyLog> {
        if let Some(project_id) = new.project_id {
            self.require_project(project_id)?;
        }
        let log = DailyLog::create(new);
        log.validate()?;
        self.daily_logs.push(log.clone());
        Ok(log)
    }

    pub fn update_daily_log(&mut self, id: Uuid, patch: DailyLogPatch) -> StoreResult<DailyLog> {
        let index = self.daily_log_index(id)?;
        if let Some(Some(project_id)) = patch.project_id {
            self.require_project(project_id)?;
        }
        let mut candidate = self.daily_logs[index].clone();
        candidate.merge(patch);
        candidate.validate()?;
        candidate.updated_at = now_ms();
        self.daily_logs[index] = candidate.clone();
        Ok(candidate)
    }

    pub fn remove_daily_log(&mut self, id: Uuid) -> StoreResult<DailyLog> {
        let index = self.daily_log_index(id)?;
        Ok(self.daily_logs.remove(index))
    }

    pub fn daily_log(&self, id: Uuid) -> Option<&DailyLog> {
        self.daily_logs.iter().find(|l| l.id == id)
    }

    pub fn daily_logs(&self) -> &[DailyLog] {
        &self.daily_logs
    }

    fn daily_log_index(&self, id: Uuid) -> StoreResult<usize> {
        self.daily_logs
            .iter()
            .position(|l| l.id == id)
            .ok_or(StoreError::NotFound {
                kind: EntityKind::DailyLog,
                id,
            })
    }

    // ----- company profile -----

    pub fn company_profile(&self) -> &CompanyProfile {
        &self.company_profile
    }

    /// Replaces the singleton profile, stamping its update time.
    pub fn set_company_profile(&mut self, profile: CompanyProfile) -> CompanyProfile {
        self.company_profile = profile.touched();
        self.company_profile.clone()
    }
}
