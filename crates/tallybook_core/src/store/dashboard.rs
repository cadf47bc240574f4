//! Read-only dashboard aggregates.
//!
//! Computed on demand from current store state; never persisted.

use crate::model::{ClientStatus, InvoiceStatus};
use crate::store::LedgerStore;
use serde::Serialize;

/// Headline numbers for the dashboard view.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    /// Sum of paid invoice totals.
    pub total_revenue: f64,
    /// Sum of all expense amounts.
    pub total_expenses: f64,
    pub net_profit: f64,
    /// Sum of sent-but-unpaid invoice totals.
    pub outstanding_amount: f64,
    pub active_clients: usize,
    pub total_projects: usize,
    pub open_invoices: usize,
}

impl LedgerStore {
    /// Computes the dashboard summary from the current dataset.
    pub fn dashboard_summary(&self) -> DashboardSummary {
        let total_revenue: f64 = self
            .invoices()
            .iter()
            .filter(|i| i.status == InvoiceStatus::Paid)
            .map(|i| i.total)
            .sum();
        let outstanding_amount: f64 = self
            .invoices()
            .iter()
            .filter(|i| i.status == InvoiceStatus::Sent)
            .map(|i| i.total)
            .sum();
        let open_invoices = self
            .invoices()
            .iter()
            .filter(|i| i.status != InvoiceStatus::Paid)
            .count();
        let total_expenses: f64 = self.expenses().iter().map(|e| e.amount).sum();

        DashboardSummary {
            total_revenue,
            total_expenses,
            net_profit: total_revenue - total_expenses,
            outstanding_amount,
            active_clients: self
                .clients()
                .iter()
                .filter(|c| c.status == ClientStatus::Active)
                .count(),
            total_projects: self.projects().len(),
            open_invoices,
        }
    }
}
