//! Company profile singleton.
//!
//! # Invariants
//! - Exactly one profile exists at all times; clear-all resets it to
//!   `CompanyProfile::default()` instead of removing it.

use crate::model::now_ms;
use serde::{Deserialize, Serialize};

/// Legal, contact and bank details of the business itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyProfile {
    pub name: String,
    pub legal_name: String,
    pub email: String,
    pub phone: String,
    pub website: String,
    pub address: String,
    /// GST registration number.
    pub gst_number: String,
    pub bank_name: String,
    pub bank_account_number: String,
    pub bank_branch_code: String,
    pub linkedin: String,
    pub twitter: String,
    pub updated_at: i64,
}

impl Default for CompanyProfile {
    fn default() -> Self {
        Self {
            name: "My Company".to_string(),
            legal_name: String::new(),
            email: String::new(),
            phone: String::new(),
            website: String::new(),
            address: String::new(),
            gst_number: String::new(),
            bank_name: String::new(),
            bank_account_number: String::new(),
            bank_branch_code: String::new(),
            linkedin: String::new(),
            twitter: String::new(),
            updated_at: 0,
        }
    }
}

impl CompanyProfile {
    /// Returns an updated copy with `updated_at` stamped to now.
    pub fn touched(mut self) -> Self {
        self.updated_at = now_ms();
        self
    }
}
