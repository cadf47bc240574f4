//! Invoice-from-timesheet generator.
//!
//! # Invariants
//! - Generation never mutates the timesheet; linking the new invoice id
//!   back is the caller's job (the store does it on the `invoiced`
//!   transition).
//! - Subtotal equals the timesheet's billed amount exactly.

use crate::codes::{self, CodeKind};
use crate::model::{EntityKind, Invoice, InvoiceItem, NewInvoice, Timesheet};
use crate::store::{LedgerStore, StoreError, StoreResult};
use chrono::Duration;
use uuid::Uuid;

/// Tax rate applied to generated invoices, in percent.
pub const DEFAULT_TAX_RATE: f64 = 18.0;

/// Payment terms applied to generated invoices, in days.
pub const DEFAULT_DUE_DAYS: i64 = 30;

impl LedgerStore {
    /// Generates an invoice for the given timesheet and stores it.
    ///
    /// Fails with `NotFound` when the timesheet id is unknown and with
    /// `DependencyNotFound` when its project or client link is broken.
    pub fn generate_invoice_from_timesheet(&mut self, timesheet_id: Uuid) -> StoreResult<Invoice> {
        let timesheet = self
            .timesheet(timesheet_id)
            .cloned()
            .ok_or(StoreError::NotFound {
                kind: EntityKind::Timesheet,
                id: timesheet_id,
            })?;
        let invoice = self.build_invoice_for(&timesheet)?;
        self.invoices.push(invoice.clone());
        Ok(invoice)
    }

    /// Builds (without storing) the invoice for one timesheet.
    pub(crate) fn build_invoice_for(&self, timesheet: &Timesheet) -> StoreResult<Invoice> {
        let project = self
            .project(timesheet.project_id)
            .ok_or(StoreError::DependencyNotFound {
                kind: EntityKind::Project,
                id: timesheet.project_id,
            })?;
        let client = self
            .client(project.client_id)
            .ok_or(StoreError::DependencyNotFound {
                kind: EntityKind::Client,
                id: project.client_id,
            })?;

        let issue_date = chrono::Utc::now().date_naive();
        let due_date = issue_date + Duration::days(DEFAULT_DUE_DAYS);
        let number = codes::next_code(
            CodeKind::Invoice,
            self.invoices().iter().map(|i| i.number.as_str()),
            &codes::year_scope(issue_date),
        );

        let item = InvoiceItem::new(
            format!(
                "{} - {} ({} hours @ {})",
                project.name, timesheet.month, timesheet.total_hours, timesheet.billing_rate
            ),
            timesheet.total_hours,
            timesheet.billing_rate,
        );

        let invoice = Invoice::create(
            NewInvoice {
                client_id: client.id,
                project_id: project.id,
                timesheet_id: Some(timesheet.id),
                issue_date,
                due_date,
                tax_rate: DEFAULT_TAX_RATE,
                items: vec![item],
                notes: None,
            },
            number,
        );
        invoice.validate()?;
        Ok(invoice)
    }
}
