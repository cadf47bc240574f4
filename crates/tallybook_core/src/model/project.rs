//! Project entity and cost breakdown.
//!
//! # Invariants
//! - `client_id` must reference an existing client (checked by the store).
//! - `total_cost` and `cost_breakdown` are derived from `budget` and
//!   `gst_rate`; they are recomputed on every write and never set directly.

use crate::calc;
use crate::model::{now_ms, ValidationError};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// GST-expanded view of a project budget.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostBreakdown {
    pub subtotal: f64,
    pub tax_amount: f64,
    pub total: f64,
}

/// A client engagement that timesheets, invoices and expenses hang off.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: Uuid,
    /// Business code, e.g. `PRJ-2026-0001`.
    pub code: String,
    pub name: String,
    pub client_id: Uuid,
    pub description: Option<String>,
    pub budget: f64,
    /// Hourly rate used as the default for new timesheets.
    pub billing_rate: f64,
    /// Payment terms in days.
    pub billing_terms: u32,
    /// GST percentage, e.g. 18.0.
    pub gst_rate: f64,
    pub gst_inclusive: bool,
    /// Derived: `budget * (1 + gst_rate / 100)`.
    pub total_cost: f64,
    /// Derived companion of `total_cost`.
    pub cost_breakdown: CostBreakdown,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Fields the caller supplies when creating a project.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProject {
    pub name: String,
    pub client_id: Uuid,
    pub description: Option<String>,
    pub budget: f64,
    pub billing_rate: f64,
    pub billing_terms: u32,
    pub gst_rate: f64,
    pub gst_inclusive: bool,
}

/// Partial update for one project. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectPatch {
    pub name: Option<String>,
    pub client_id: Option<Uuid>,
    pub description: Option<Option<String>>,
    pub budget: Option<f64>,
    pub billing_rate: Option<f64>,
    pub billing_terms: Option<u32>,
    pub gst_rate: Option<f64>,
    pub gst_inclusive: Option<bool>,
}

impl Project {
    pub fn create(new: NewProject, code: String) -> Self {
        let now = now_ms();
        let mut project = Self {
            id: Uuid::new_v4(),
            code,
            name: new.name,
            client_id: new.client_id,
            description: new.description,
            budget: new.budget,
            billing_rate: new.billing_rate,
            billing_terms: new.billing_terms,
            gst_rate: new.gst_rate,
            gst_inclusive: new.gst_inclusive,
            total_cost: 0.0,
            cost_breakdown: CostBreakdown {
                subtotal: 0.0,
                tax_amount: 0.0,
                total: 0.0,
            },
            created_at: now,
            updated_at: now,
        };
        project.recalculate();
        project
    }

    pub fn merge(&mut self, patch: ProjectPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(client_id) = patch.client_id {
            self.client_id = client_id;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(budget) = patch.budget {
            self.budget = budget;
        }
        if let Some(billing_rate) = patch.billing_rate {
            self.billing_rate = billing_rate;
        }
        if let Some(billing_terms) = patch.billing_terms {
            self.billing_terms = billing_terms;
        }
        if let Some(gst_rate) = patch.gst_rate {
            self.gst_rate = gst_rate;
        }
        if let Some(gst_inclusive) = patch.gst_inclusive {
            self.gst_inclusive = gst_inclusive;
        }
        self.recalculate();
    }

    /// Recomputes `total_cost` and `cost_breakdown` from source fields.
    pub fn recalculate(&mut self) {
        let tax_amount = calc::tax_amount(self.budget, self.gst_rate);
        self.total_cost = calc::project_total_cost(self.budget, self.gst_rate);
        self.cost_breakdown = CostBreakdown {
            subtotal: self.budget,
            tax_amount,
            total: self.total_cost,
        };
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyField {
                entity: "project",
                field: "name",
            });
        }
        if self.budget < 0.0 {
            return Err(ValidationError::NonPositiveAmount {
                field: "budget",
                value: self.budget,
            });
        }
        if self.billing_rate < 0.0 {
            return Err(ValidationError::NonPositiveAmount {
                field: "billingRate",
                value: self.billing_rate,
            });
        }
        Ok(())
    }
}
