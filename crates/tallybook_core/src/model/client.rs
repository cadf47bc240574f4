//! Client entity.
//!
//! # Invariants
//! - `code` is unique across all clients (guaranteed by the store's
//!   sequential generator).
//! - `status` is one of the four lifecycle states below.

use crate::model::{now_ms, ValidationError};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Client lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClientStatus {
    Active,
    Inactive,
    Prospect,
    Lead,
}

/// A billable customer of the business.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: Uuid,
    /// Business code, e.g. `CLT-2026-0001`. Assigned at creation, never reassigned.
    pub code: String,
    pub name: String,
    pub contact_person: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub status: ClientStatus,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Fields the caller supplies when creating a client.
#[derive(Debug, Clone, PartialEq)]
pub struct NewClient {
    pub name: String,
    pub contact_person: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub status: ClientStatus,
}

/// Partial update for one client. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClientPatch {
    pub name: Option<String>,
    pub contact_person: Option<Option<String>>,
    pub email: Option<Option<String>>,
    pub phone: Option<Option<String>>,
    pub address: Option<Option<String>>,
    pub status: Option<ClientStatus>,
}

impl Client {
    /// Materializes a stored client from caller input plus generated identity.
    pub fn create(new: NewClient, code: String) -> Self {
        let now = now_ms();
        Self {
            id: Uuid::new_v4(),
            code,
            name: new.name,
            contact_person: new.contact_person,
            email: new.email,
            phone: new.phone,
            address: new.address,
            status: new.status,
            created_at: now,
            updated_at: now,
        }
    }

    /// Merges a partial update into this client. Does not touch timestamps.
    pub fn merge(&mut self, patch: ClientPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(contact_person) = patch.contact_person {
            self.contact_person = contact_person;
        }
        if let Some(email) = patch.email {
            self.email = email;
        }
        if let Some(phone) = patch.phone {
            self.phone = phone;
        }
        if let Some(address) = patch.address {
            self.address = address;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyField {
                entity: "client",
                field: "name",
            });
        }
        if self.code.trim().is_empty() {
            return Err(ValidationError::EmptyField {
                entity: "client",
                field: "code",
            });
        }
        Ok(())
    }
}
