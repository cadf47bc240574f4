//! Daily log entity for the calendar and kanban views.
//!
//! # Invariants
//! - `category` is one of the four fixed values below.

use crate::model::{now_ms, Attachment, ValidationError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogCategory {
    Accounting,
    Important,
    Reminder,
    Milestone,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogPriority {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogStatus {
    Open,
    Completed,
}

/// A dated note, reminder or milestone. Carries no business code; `title`
/// is its display key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyLog {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub date: NaiveDate,
    pub category: LogCategory,
    pub priority: LogPriority,
    pub tags: Vec<String>,
    pub status: LogStatus,
    pub project_id: Option<Uuid>,
    pub attachments: Vec<Attachment>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Fields the caller supplies when creating a daily log.
#[derive(Debug, Clone, PartialEq)]
pub struct NewDailyLog {
    pub title: String,
    pub description: String,
    pub date: NaiveDate,
    pub category: LogCategory,
    pub priority: LogPriority,
    pub tags: Vec<String>,
    pub project_id: Option<Uuid>,
}

/// Partial update for one daily log. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DailyLogPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub date: Option<NaiveDate>,
    pub category: Option<LogCategory>,
    pub priority: Option<LogPriority>,
    pub tags: Option<Vec<String>>,
    pub status: Option<LogStatus>,
    pub project_id: Option<Option<Uuid>>,
    pub attachments: Option<Vec<Attachment>>,
}

impl DailyLog {
    pub fn create(new: NewDailyLog) -> Self {
        let now = now_ms();
        Self {
            id: Uuid::new_v4(),
            title: new.title,
            description: new.description,
            date: new.date,
            category: new.category,
            priority: new.priority,
            tags: new.tags,
            status: LogStatus::Open,
            project_id: new.project_id,
            attachments: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn merge(&mut self, patch: DailyLogPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(date) = patch.date {
            self.date = date;
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
        if let Some(priority) = patch.priority {
            self.priority = priority;
        }
        if let Some(tags) = patch.tags {
            self.tags = tags;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(project_id) = patch.project_id {
            self.project_id = project_id;
        }
        if let Some(attachments) = patch.attachments {
            self.attachments = attachments;
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::EmptyField {
                entity: "dailyLog",
                field: "title",
            });
        }
        Ok(())
    }
}
