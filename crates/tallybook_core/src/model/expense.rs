//! Expense entity.
//!
//! # Invariants
//! - `amount` is strictly positive.
//! - `project_id`, when set, must reference an existing project (checked by
//!   the store).

use crate::model::{now_ms, Attachment, ValidationError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Reimbursement state of an expense. A plain field, not a state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpenseStatus {
    Pending,
    Approved,
    Reimbursed,
}

/// Money spent by the business, optionally attributed to a project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: Uuid,
    /// Business code scoped by year, e.g. `EXP-2026-0001`.
    pub code: String,
    pub category: String,
    pub description: String,
    pub amount: f64,
    pub date: NaiveDate,
    pub project_id: Option<Uuid>,
    pub status: ExpenseStatus,
    pub attachments: Vec<Attachment>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Fields the caller supplies when creating an expense.
#[derive(Debug, Clone, PartialEq)]
pub struct NewExpense {
    pub category: String,
    pub description: String,
    pub amount: f64,
    pub date: NaiveDate,
    pub project_id: Option<Uuid>,
    pub status: ExpenseStatus,
}

/// Partial update for one expense. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpensePatch {
    pub category: Option<String>,
    pub description: Option<String>,
    pub amount: Option<f64>,
    pub date: Option<NaiveDate>,
    pub project_id: Option<Option<Uuid>>,
    pub status: Option<ExpenseStatus>,
    pub attachments: Option<Vec<Attachment>>,
}

impl Expense {
    pub fn create(new: NewExpense, code: String) -> Self {
        let now = now_ms();
        Self {
            id: Uuid::new_v4(),
            code,
            category: new.category,
            description: new.description,
            amount: new.amount,
            date: new.date,
            project_id: new.project_id,
            status: new.status,
            attachments: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn merge(&mut self, patch: ExpensePatch) {
        if let Some(category) = patch.category {
            self.category = category;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(amount) = patch.amount {
            self.amount = amount;
        }
        if let Some(date) = patch.date {
            self.date = date;
        }
        if let Some(project_id) = patch.project_id {
            self.project_id = project_id;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(attachments) = patch.attachments {
            self.attachments = attachments;
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.category.trim().is_empty() {
            return Err(ValidationError::EmptyField {
                entity: "expense",
                field: "category",
            });
        }
        if self.amount <= 0.0 {
            return Err(ValidationError::NonPositiveAmount {
                field: "amount",
                value: self.amount,
            });
        }
        Ok(())
    }
}
