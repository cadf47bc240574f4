//! Domain model for the accounting core.
//!
//! # Responsibility
//! - Define the canonical entity structs shared by the repository and both
//!   persistence backends.
//! - Keep per-entity field validation next to the data it guards.
//!
//! # Invariants
//! - Every entity is identified by a stable `Uuid` that is never reused.
//! - Derived monetary fields are recomputed on write, never set directly.
//! - Serialized field names are camelCase to match the snapshot file format.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod client;
pub mod company;
pub mod daily_log;
pub mod expense;
pub mod invoice;
pub mod project;
pub mod timesheet;

pub use client::{Client, ClientPatch, ClientStatus, NewClient};
pub use company::CompanyProfile;
pub use daily_log::{DailyLog, DailyLogPatch, LogCategory, LogPriority, LogStatus, NewDailyLog};
pub use expense::{Expense, ExpensePatch, ExpenseStatus, NewExpense};
pub use invoice::{Invoice, InvoiceItem, InvoicePatch, InvoiceStatus, NewInvoice};
pub use project::{CostBreakdown, NewProject, Project, ProjectPatch};
pub use timesheet::{NewTimesheet, Timesheet, TimesheetPatch, TimesheetStatus};

/// Returns the current wall-clock instant in epoch milliseconds.
pub fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// The six entity families held by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Client,
    Project,
    Timesheet,
    Invoice,
    Expense,
    DailyLog,
}

impl EntityKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Client => "client",
            Self::Project => "project",
            Self::Timesheet => "timesheet",
            Self::Invoice => "invoice",
            Self::Expense => "expense",
            Self::DailyLog => "dailyLog",
        }
    }
}

impl Display for EntityKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tagged union over the six entity types, used wherever one value must
/// stand for "any entity" (backend change propagation, generic editing).
#[derive(Debug, Clone, PartialEq)]
pub enum Entity {
    Client(Client),
    Project(Project),
    Timesheet(Timesheet),
    Invoice(Invoice),
    Expense(Expense),
    DailyLog(DailyLog),
}

impl Entity {
    pub fn kind(&self) -> EntityKind {
        match self {
            Self::Client(_) => EntityKind::Client,
            Self::Project(_) => EntityKind::Project,
            Self::Timesheet(_) => EntityKind::Timesheet,
            Self::Invoice(_) => EntityKind::Invoice,
            Self::Expense(_) => EntityKind::Expense,
            Self::DailyLog(_) => EntityKind::DailyLog,
        }
    }

    pub fn id(&self) -> uuid::Uuid {
        match self {
            Self::Client(client) => client.id,
            Self::Project(project) => project.id,
            Self::Timesheet(timesheet) => timesheet.id,
            Self::Invoice(invoice) => invoice.id,
            Self::Expense(expense) => expense.id,
            Self::DailyLog(log) => log.id,
        }
    }
}

/// File attached to an entity. Owned by the parent; removed with it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    /// Display name of the file.
    pub name: String,
    /// Storage path or URI of the file contents.
    pub path: String,
    /// MIME type when known.
    pub mime_type: Option<String>,
    /// Size in bytes when known.
    pub size_bytes: Option<u64>,
}

/// Field-level validation failure for one entity write.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    EmptyField {
        entity: &'static str,
        field: &'static str,
    },
    NonPositiveAmount {
        field: &'static str,
        value: f64,
    },
    DaysExceedWorkingDays {
        days_worked: u32,
        days_leave: u32,
        total_working_days: u32,
    },
    DueBeforeIssue {
        issue_date: chrono::NaiveDate,
        due_date: chrono::NaiveDate,
    },
    InvalidMonth(String),
    MissingRejectionReason,
    MissingInvoiceLink,
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyField { entity, field } => {
                write!(f, "{entity}.{field} must not be empty")
            }
            Self::NonPositiveAmount { field, value } => {
                write!(f, "{field} must be positive, got {value}")
            }
            Self::DaysExceedWorkingDays {
                days_worked,
                days_leave,
                total_working_days,
            } => write!(
                f,
                "daysWorked ({days_worked}) + daysLeave ({days_leave}) exceeds totalWorkingDays ({total_working_days})"
            ),
            Self::DueBeforeIssue {
                issue_date,
                due_date,
            } => write!(f, "dueDate {due_date} is earlier than issueDate {issue_date}"),
            Self::InvalidMonth(value) => {
                write!(f, "month must be formatted as YYYY-MM, got `{value}`")
            }
            Self::MissingRejectionReason => {
                write!(f, "rejecting a timesheet requires a non-empty reason")
            }
            Self::MissingInvoiceLink => {
                write!(f, "an invoiced timesheet must reference an invoice")
            }
        }
    }
}

impl Error for ValidationError {}
