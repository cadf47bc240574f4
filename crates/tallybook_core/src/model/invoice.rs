//! Invoice entity and line items.
//!
//! # Invariants
//! - `subtotal`, `tax_amount` and `total` are derived and recomputed on write.
//! - `due_date` must not be earlier than `issue_date`.
//! - Status only moves forward: draft -> sent -> paid.

use crate::calc;
use crate::model::{now_ms, Attachment, ValidationError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Invoice payment state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    Draft,
    Sent,
    Paid,
}

impl InvoiceStatus {
    /// Returns whether moving from `self` to `next` is a legal forward step.
    pub fn can_transition_to(self, next: InvoiceStatus) -> bool {
        matches!(
            (self, next),
            (Self::Draft, Self::Sent) | (Self::Sent, Self::Paid)
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Sent => "sent",
            Self::Paid => "paid",
        }
    }
}

/// One billable line on an invoice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceItem {
    pub description: String,
    pub quantity: f64,
    pub rate: f64,
    /// Derived: `quantity * rate`.
    pub total: f64,
}

impl InvoiceItem {
    pub fn new(description: impl Into<String>, quantity: f64, rate: f64) -> Self {
        Self {
            description: description.into(),
            quantity,
            rate,
            total: quantity * rate,
        }
    }
}

/// A bill raised against a client, optionally generated from a timesheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub id: Uuid,
    /// Invoice number scoped by issue year, e.g. `INV-2026-0001`.
    pub number: String,
    pub client_id: Uuid,
    pub project_id: Uuid,
    pub timesheet_id: Option<Uuid>,
    pub issue_date: NaiveDate,
    pub due_date: NaiveDate,
    /// Derived: sum of `items[].total`.
    pub subtotal: f64,
    /// Tax percentage, e.g. 18.0.
    pub tax_rate: f64,
    /// Derived: `subtotal * tax_rate / 100`.
    pub tax_amount: f64,
    /// Derived: `subtotal + tax_amount`.
    pub total: f64,
    pub status: InvoiceStatus,
    pub items: Vec<InvoiceItem>,
    pub notes: Option<String>,
    pub attachments: Vec<Attachment>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Fields the caller supplies when creating an invoice.
#[derive(Debug, Clone, PartialEq)]
pub struct NewInvoice {
    pub client_id: Uuid,
    pub project_id: Uuid,
    pub timesheet_id: Option<Uuid>,
    pub issue_date: NaiveDate,
    pub due_date: NaiveDate,
    pub tax_rate: f64,
    pub items: Vec<InvoiceItem>,
    pub notes: Option<String>,
}

/// Partial update for one invoice. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InvoicePatch {
    pub issue_date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
    pub tax_rate: Option<f64>,
    pub status: Option<InvoiceStatus>,
    pub items: Option<Vec<InvoiceItem>>,
    pub notes: Option<Option<String>>,
    pub attachments: Option<Vec<Attachment>>,
}

impl Invoice {
    pub fn create(new: NewInvoice, number: String) -> Self {
        let now = now_ms();
        let mut invoice = Self {
            id: Uuid::new_v4(),
            number,
            client_id: new.client_id,
            project_id: new.project_id,
            timesheet_id: new.timesheet_id,
            issue_date: new.issue_date,
            due_date: new.due_date,
            subtotal: 0.0,
            tax_rate: new.tax_rate,
            tax_amount: 0.0,
            total: 0.0,
            status: InvoiceStatus::Draft,
            items: new.items,
            notes: new.notes,
            attachments: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        invoice.recalculate();
        invoice
    }

    /// Merges non-status fields of a partial update. Status transitions are
    /// handled by the store.
    pub fn merge(&mut self, patch: &InvoicePatch) {
        if let Some(issue_date) = patch.issue_date {
            self.issue_date = issue_date;
        }
        if let Some(due_date) = patch.due_date {
            self.due_date = due_date;
        }
        if let Some(tax_rate) = patch.tax_rate {
            self.tax_rate = tax_rate;
        }
        if let Some(items) = &patch.items {
            self.items = items.clone();
        }
        if let Some(notes) = &patch.notes {
            self.notes = notes.clone();
        }
        if let Some(attachments) = &patch.attachments {
            self.attachments = attachments.clone();
        }
        self.recalculate();
    }

    /// Recomputes `subtotal`, `tax_amount` and `total` from the line items.
    pub fn recalculate(&mut self) {
        for item in &mut self.items {
            item.total = item.quantity * item.rate;
        }
        self.subtotal = self.items.iter().map(|item| item.total).sum();
        self.tax_amount = calc::tax_amount(self.subtotal, self.tax_rate);
        self.total = calc::invoice_total(self.subtotal, self.tax_rate);
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.number.trim().is_empty() {
            return Err(ValidationError::EmptyField {
                entity: "invoice",
                field: "number",
            });
        }
        if self.due_date < self.issue_date {
            return Err(ValidationError::DueBeforeIssue {
                issue_date: self.issue_date,
                due_date: self.due_date,
            });
        }
        if self.tax_rate < 0.0 {
            return Err(ValidationError::NonPositiveAmount {
                field: "taxRate",
                value: self.tax_rate,
            });
        }
        Ok(())
    }
}
