//! Timesheet entity and its approval state machine.
//!
//! # Invariants
//! - `days_worked + days_leave <= total_working_days`.
//! - `total_hours` and `total_amount` are derived and recomputed on write.
//! - Status only moves forward: draft -> submitted -> {approved, rejected},
//!   approved -> invoiced. The store enforces transitions and stamps the
//!   matching approval timestamps.

use crate::calc;
use crate::model::{now_ms, Attachment, ValidationError};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Timesheet approval state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimesheetStatus {
    Draft,
    Submitted,
    Approved,
    Rejected,
    Invoiced,
}

impl TimesheetStatus {
    /// Returns whether moving from `self` to `next` is a legal forward step.
    pub fn can_transition_to(self, next: TimesheetStatus) -> bool {
        matches!(
            (self, next),
            (Self::Draft, Self::Submitted)
                | (Self::Submitted, Self::Approved)
                | (Self::Submitted, Self::Rejected)
                | (Self::Approved, Self::Invoiced)
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Submitted => "submitted",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Invoiced => "invoiced",
        }
    }
}

/// One month of work on a project for billing purposes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Timesheet {
    pub id: Uuid,
    /// Business code scoped by month, e.g. `TSH-2026-08-0001`.
    pub code: String,
    pub project_id: Uuid,
    /// Calendar month this sheet covers, formatted `YYYY-MM`.
    pub month: String,
    pub total_working_days: u32,
    pub days_worked: u32,
    pub days_leave: u32,
    pub hours_per_day: f64,
    pub billing_rate: f64,
    /// Derived: `days_worked * hours_per_day`.
    pub total_hours: f64,
    /// Derived: `total_hours * billing_rate`.
    pub total_amount: f64,
    pub status: TimesheetStatus,
    pub rejection_reason: Option<String>,
    pub submitted_at: Option<i64>,
    pub approved_at: Option<i64>,
    pub rejected_at: Option<i64>,
    /// Set when the sheet reaches `invoiced`.
    pub invoice_id: Option<Uuid>,
    pub attachments: Vec<Attachment>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Fields the caller supplies when creating a timesheet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTimesheet {
    pub project_id: Uuid,
    pub month: String,
    pub total_working_days: u32,
    pub days_worked: u32,
    pub days_leave: u32,
    pub hours_per_day: f64,
    pub billing_rate: f64,
}

/// Partial update for one timesheet. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimesheetPatch {
    pub month: Option<String>,
    pub total_working_days: Option<u32>,
    pub days_worked: Option<u32>,
    pub days_leave: Option<u32>,
    pub hours_per_day: Option<f64>,
    pub billing_rate: Option<f64>,
    pub status: Option<TimesheetStatus>,
    pub rejection_reason: Option<String>,
    pub attachments: Option<Vec<Attachment>>,
}

impl Timesheet {
    pub fn create(new: NewTimesheet, code: String) -> Self {
        let now = now_ms();
        let mut sheet = Self {
            id: Uuid::new_v4(),
            code,
            project_id: new.project_id,
            month: new.month,
            total_working_days: new.total_working_days,
            days_worked: new.days_worked,
            days_leave: new.days_leave,
            hours_per_day: new.hours_per_day,
            billing_rate: new.billing_rate,
            total_hours: 0.0,
            total_amount: 0.0,
            status: TimesheetStatus::Draft,
            rejection_reason: None,
            submitted_at: None,
            approved_at: None,
            rejected_at: None,
            invoice_id: None,
            attachments: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        sheet.recalculate();
        sheet
    }

    /// Merges non-status fields of a partial update. Status transitions are
    /// handled by the store so timestamps and invoice linkage stay correct.
    pub fn merge(&mut self, patch: &TimesheetPatch) {
        if let Some(month) = &patch.month {
            self.month = month.clone();
        }
        if let Some(total_working_days) = patch.total_working_days {
            self.total_working_days = total_working_days;
        }
        if let Some(days_worked) = patch.days_worked {
            self.days_worked = days_worked;
        }
        if let Some(days_leave) = patch.days_leave {
            self.days_leave = days_leave;
        }
        if let Some(hours_per_day) = patch.hours_per_day {
            self.hours_per_day = hours_per_day;
        }
        if let Some(billing_rate) = patch.billing_rate {
            self.billing_rate = billing_rate;
        }
        if let Some(attachments) = &patch.attachments {
            self.attachments = attachments.clone();
        }
        self.recalculate();
    }

    /// Recomputes `total_hours` and `total_amount` from source fields.
    pub fn recalculate(&mut self) {
        self.total_hours = f64::from(self.days_worked) * self.hours_per_day;
        self.total_amount =
            calc::timesheet_amount(self.days_worked, self.hours_per_day, self.billing_rate);
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if !is_valid_month(&self.month) {
            return Err(ValidationError::InvalidMonth(self.month.clone()));
        }
        if u64::from(self.days_worked) + u64::from(self.days_leave)
            > u64::from(self.total_working_days)
        {
            return Err(ValidationError::DaysExceedWorkingDays {
                days_worked: self.days_worked,
                days_leave: self.days_leave,
                total_working_days: self.total_working_days,
            });
        }
        if self.hours_per_day < 0.0 {
            return Err(ValidationError::NonPositiveAmount {
                field: "hoursPerDay",
                value: self.hours_per_day,
            });
        }
        if self.status == TimesheetStatus::Rejected
            && self
                .rejection_reason
                .as_deref()
                .map_or(true, |reason| reason.trim().is_empty())
        {
            return Err(ValidationError::MissingRejectionReason);
        }
        if self.status == TimesheetStatus::Invoiced && self.invoice_id.is_none() {
            return Err(ValidationError::MissingInvoiceLink);
        }
        Ok(())
    }
}

/// Checks the `YYYY-MM` month format with a valid month number.
pub fn is_valid_month(month: &str) -> bool {
    let Some((year, month_number)) = month.split_once('-') else {
        return false;
    };
    year.len() == 4
        && year.chars().all(|c| c.is_ascii_digit())
        && month_number.len() == 2
        && matches!(month_number.parse::<u8>(), Ok(1..=12))
}

#[cfg(test)]
mod tests {
    use super::{is_valid_month, TimesheetStatus};

    #[test]
    fn month_format_is_checked() {
        assert!(is_valid_month("2026-01"));
        assert!(is_valid_month("2026-12"));
        assert!(!is_valid_month("2026-13"));
        assert!(!is_valid_month("2026-00"));
        assert!(!is_valid_month("2026-1"));
        assert!(!is_valid_month("26-01"));
        assert!(!is_valid_month("garbage"));
    }

    #[test]
    fn only_forward_transitions_are_legal() {
        use TimesheetStatus::*;
        assert!(Draft.can_transition_to(Submitted));
        assert!(Submitted.can_transition_to(Approved));
        assert!(Submitted.can_transition_to(Rejected));
        assert!(Approved.can_transition_to(Invoiced));

        assert!(!Draft.can_transition_to(Invoiced));
        assert!(!Draft.can_transition_to(Approved));
        assert!(!Rejected.can_transition_to(Approved));
        assert!(!Invoiced.can_transition_to(Draft));
        assert!(!Approved.can_transition_to(Submitted));
    }
}
