//! Derived-value calculation engine.
//!
//! # Responsibility
//! - Compute every monetary derived field from its source fields.
//!
//! # Invariants
//! - All functions are pure; callers re-run them on every write that
//!   touches an input.
//! - Money is computed in f64 to match the persisted data exactly; results
//!   are not rounded here.

/// Billable amount for one timesheet month.
pub fn timesheet_amount(days_worked: u32, hours_per_day: f64, billing_rate: f64) -> f64 {
    f64::from(days_worked) * hours_per_day * billing_rate
}

/// Tax portion of a subtotal at the given percentage rate.
pub fn tax_amount(subtotal: f64, tax_rate: f64) -> f64 {
    subtotal * tax_rate / 100.0
}

/// Subtotal plus tax.
pub fn invoice_total(subtotal: f64, tax_rate: f64) -> f64 {
    subtotal + tax_amount(subtotal, tax_rate)
}

/// Project budget grossed up by GST.
pub fn project_total_cost(budget: f64, gst_rate: f64) -> f64 {
    budget * (1.0 + gst_rate / 100.0)
}

#[cfg(test)]
mod tests {
    use super::{invoice_total, project_total_cost, tax_amount, timesheet_amount};

    #[test]
    fn timesheet_amount_multiplies_days_hours_rate() {
        assert_eq!(timesheet_amount(20, 8.0, 1000.0), 160_000.0);
        assert_eq!(timesheet_amount(0, 8.0, 1000.0), 0.0);
    }

    #[test]
    fn tax_and_total_follow_percentage_rate() {
        assert_eq!(tax_amount(160_000.0, 18.0), 28_800.0);
        assert_eq!(invoice_total(160_000.0, 18.0), 188_800.0);
        assert_eq!(tax_amount(100.0, 0.0), 0.0);
        assert_eq!(invoice_total(100.0, 0.0), 100.0);
    }

    #[test]
    fn project_total_cost_grosses_up_budget() {
        assert_eq!(project_total_cost(100_000.0, 18.0), 118_000.0);
        assert_eq!(project_total_cost(0.0, 18.0), 0.0);
    }
}
