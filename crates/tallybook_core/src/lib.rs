//! Core domain logic for Tallybook, a small-business accounting system.
//! This crate is the single source of truth for business invariants:
//! referential integrity across the six entity types, derived billing
//! amounts, the timesheet/invoice status machines, and snapshot transfer
//! between the two persistence backends.

pub mod backend;
pub mod calc;
pub mod codes;
pub mod db;
pub mod logging;
pub mod model;
pub mod snapshot;
pub mod store;
pub mod sync;
pub mod transfer;

pub use backend::{Backend, BackendError, Change, DocumentBackend, RelationalBackend};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::{
    Client, ClientStatus, CompanyProfile, DailyLog, Entity, EntityKind, Expense, Invoice,
    InvoiceStatus, Project, Timesheet, TimesheetStatus, ValidationError,
};
pub use snapshot::{Snapshot, SNAPSHOT_VERSION};
pub use store::{DashboardSummary, LedgerStore, StoreError, StoreResult};
pub use sync::{Ledger, LedgerError, LedgerResult};
pub use transfer::{TransferError, TransferResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
