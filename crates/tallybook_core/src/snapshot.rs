//! Full-dataset snapshot shape and import validation.
//!
//! # Responsibility
//! - Define the one serialized object both backends and the transfer
//!   controller exchange.
//! - Validate the shape of incoming snapshots before anything is mutated.
//!
//! # Invariants
//! - A snapshot is self-contained: loading it fully reconstructs the store.
//! - Validation never mutates; a rejected snapshot leaves no trace.

use crate::model::{
    now_ms, Client, CompanyProfile, DailyLog, Expense, Invoice, Project, Timesheet,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Format version stamped into every exported snapshot.
pub const SNAPSHOT_VERSION: &str = "1.0";

/// The collection keys every importable snapshot must carry as arrays.
pub const COLLECTION_KEYS: [&str; 6] = [
    "clients",
    "projects",
    "timesheets",
    "invoices",
    "expenses",
    "dailyLogs",
];

/// Complete serialization of every entity collection plus the profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub clients: Vec<Client>,
    pub projects: Vec<Project>,
    pub timesheets: Vec<Timesheet>,
    pub invoices: Vec<Invoice>,
    pub expenses: Vec<Expense>,
    pub daily_logs: Vec<DailyLog>,
    pub company_profile: CompanyProfile,
    pub created_at: i64,
    pub updated_at: i64,
    pub version: String,
}

impl Snapshot {
    /// The canonical empty dataset: no entities, default company profile.
    pub fn empty() -> Self {
        let now = now_ms();
        Self {
            clients: Vec::new(),
            projects: Vec::new(),
            timesheets: Vec::new(),
            invoices: Vec::new(),
            expenses: Vec::new(),
            daily_logs: Vec::new(),
            company_profile: CompanyProfile::default(),
            created_at: now,
            updated_at: now,
            version: SNAPSHOT_VERSION.to_string(),
        }
    }

    /// Refreshes the export stamp before the snapshot leaves the system.
    pub fn stamp(&mut self) {
        self.updated_at = now_ms();
        self.version = SNAPSHOT_VERSION.to_string();
    }

    /// Total number of entities across all collections.
    pub fn entity_count(&self) -> usize {
        self.clients.len()
            + self.projects.len()
            + self.timesheets.len()
            + self.invoices.len()
            + self.expenses.len()
            + self.daily_logs.len()
    }
}

/// Checks that `value` has the importable snapshot shape: every collection
/// key present as an array and `companyProfile` present as a non-array
/// object. Element shapes are enforced afterwards by deserialization.
pub fn validate_snapshot_value(value: &Value) -> Result<(), String> {
    let Some(object) = value.as_object() else {
        return Err("snapshot must be a JSON object".to_string());
    };

    for key in COLLECTION_KEYS {
        match object.get(key) {
            None => return Err(format!("missing collection `{key}`")),
            Some(entry) if !entry.is_array() => {
                return Err(format!("collection `{key}` must be an array"));
            }
            Some(_) => {}
        }
    }

    match object.get("companyProfile") {
        None => Err("missing `companyProfile`".to_string()),
        Some(profile) if !profile.is_object() => {
            Err("`companyProfile` must be an object".to_string())
        }
        Some(_) => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::{validate_snapshot_value, Snapshot};
    use serde_json::json;

    #[test]
    fn empty_snapshot_passes_its_own_validation() {
        let value = serde_json::to_value(Snapshot::empty()).unwrap();
        validate_snapshot_value(&value).unwrap();
    }

    #[test]
    fn missing_collection_key_is_rejected() {
        let mut value = serde_json::to_value(Snapshot::empty()).unwrap();
        value.as_object_mut().unwrap().remove("expenses");
        let err = validate_snapshot_value(&value).unwrap_err();
        assert!(err.contains("expenses"));
    }

    #[test]
    fn non_array_collection_is_rejected() {
        let mut value = serde_json::to_value(Snapshot::empty()).unwrap();
        value["clients"] = json!({});
        let err = validate_snapshot_value(&value).unwrap_err();
        assert!(err.contains("clients"));
    }

    #[test]
    fn array_profile_is_rejected() {
        let mut value = serde_json::to_value(Snapshot::empty()).unwrap();
        value["companyProfile"] = json!([]);
        let err = validate_snapshot_value(&value).unwrap_err();
        assert!(err.contains("companyProfile"));
    }

    #[test]
    fn non_object_root_is_rejected() {
        assert!(validate_snapshot_value(&json!([])).is_err());
        assert!(validate_snapshot_value(&json!("text")).is_err());
    }
}
