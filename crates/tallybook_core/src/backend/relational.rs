//! Relational backend: normalized SQLite tables.
//!
//! # Responsibility
//! - Map every entity collection onto its table and back.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - Upserts use `ON CONFLICT (id) DO UPDATE`, never `INSERT OR REPLACE`,
//!   so foreign-key cascades cannot fire on a row refresh.
//! - Read paths reject invalid persisted state instead of masking it.
//! - `save_snapshot` replaces all rows inside a single transaction.

use crate::backend::{Backend, BackendError, BackendResult, Change};
use crate::db::{open_db, open_db_in_memory};
use crate::model::{
    Attachment, Client, ClientStatus, CompanyProfile, DailyLog, Entity, EntityKind, Expense,
    ExpenseStatus, Invoice, InvoiceItem, InvoiceStatus, LogCategory, LogPriority, LogStatus,
    Project, CostBreakdown, Timesheet, TimesheetStatus,
};
use crate::snapshot::Snapshot;
use chrono::NaiveDate;
use rusqlite::{params, Connection, Row};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;
use uuid::Uuid;

pub struct RelationalBackend {
    conn: Connection,
}

impl RelationalBackend {
    /// Opens (and migrates) a database file.
    pub fn open(path: impl AsRef<Path>) -> BackendResult<Self> {
        Ok(Self { conn: open_db(path)? })
    }

    /// Opens (and migrates) an in-memory database.
    pub fn open_in_memory() -> BackendResult<Self> {
        Ok(Self {
            conn: open_db_in_memory()?,
        })
    }

    /// Wraps an already-migrated connection.
    pub fn from_connection(conn: Connection) -> Self {
        Self { conn }
    }

    /// Direct access for callers that need raw SQL (tests, reports).
    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl Backend for RelationalBackend {
    fn load_snapshot(&mut self) -> BackendResult<Snapshot> {
        let mut snapshot = Snapshot::empty();
        snapshot.clients = load_all(&self.conn, "clients", parse_client_row)?;
        snapshot.projects = load_all(&self.conn, "projects", parse_project_row)?;
        snapshot.timesheets = load_all(&self.conn, "timesheets", parse_timesheet_row)?;
        snapshot.invoices = load_all(&self.conn, "invoices", parse_invoice_row)?;
        snapshot.expenses = load_all(&self.conn, "expenses", parse_expense_row)?;
        snapshot.daily_logs = load_all(&self.conn, "daily_logs", parse_daily_log_row)?;
        snapshot.company_profile = load_profile(&self.conn)?;
        Ok(snapshot)
    }

    fn save_snapshot(&mut self, snapshot: &Snapshot) -> BackendResult<()> {
        let tx = self.conn.transaction()?;

        // Children first so the explicit deletes never rely on cascades.
        for table in [
            "invoices",
            "timesheets",
            "expenses",
            "daily_logs",
            "projects",
            "clients",
        ] {
            tx.execute(&format!("DELETE FROM {table};"), [])?;
        }

        for client in &snapshot.clients {
            upsert_client(&tx, client)?;
        }
        for project in &snapshot.projects {
            upsert_project(&tx, project)?;
        }
        for timesheet in &snapshot.timesheets {
            upsert_timesheet(&tx, timesheet)?;
        }
        for invoice in &snapshot.invoices {
            upsert_invoice(&tx, invoice)?;
        }
        for expense in &snapshot.expenses {
            upsert_expense(&tx, expense)?;
        }
        for log in &snapshot.daily_logs {
            upsert_daily_log(&tx, log)?;
        }
        save_profile(&tx, &snapshot.company_profile)?;

        tx.commit()?;
        Ok(())
    }

    fn apply(&mut self, change: &Change) -> BackendResult<()> {
        match change {
            Change::Upsert(entity) => match entity {
                Entity::Client(client) => upsert_client(&self.conn, client),
                Entity::Project(project) => upsert_project(&self.conn, project),
                Entity::Timesheet(timesheet) => upsert_timesheet(&self.conn, timesheet),
                Entity::Invoice(invoice) => upsert_invoice(&self.conn, invoice),
                Entity::Expense(expense) => upsert_expense(&self.conn, expense),
                Entity::DailyLog(log) => upsert_daily_log(&self.conn, log),
            },
            Change::Remove(kind, id) => {
                let table = table_for(*kind);
                self.conn.execute(
                    &format!("DELETE FROM {table} WHERE id = ?1;"),
                    [id.to_string()],
                )?;
                Ok(())
            }
            Change::Profile(profile) => save_profile(&self.conn, profile),
        }
    }
}

fn table_for(kind: EntityKind) -> &'static str {
    match kind {
        EntityKind::Client => "clients",
        EntityKind::Project => "projects",
        EntityKind::Timesheet => "timesheets",
        EntityKind::Invoice => "invoices",
        EntityKind::Expense => "expenses",
        EntityKind::DailyLog => "daily_logs",
    }
}

fn load_all<T>(
    conn: &Connection,
    table: &str,
    parse: impl Fn(&Row<'_>) -> BackendResult<T>,
) -> BackendResult<Vec<T>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT * FROM {table} ORDER BY created_at ASC, id ASC;"
    ))?;
    let mut rows = stmt.query([])?;
    let mut items = Vec::new();
    while let Some(row) = rows.next()? {
        items.push(parse(row)?);
    }
    Ok(items)
}

// ----- clients -----

fn upsert_client(conn: &Connection, client: &Client) -> BackendResult<()> {
    conn.execute(
        "INSERT INTO clients (
            id, code, name, contact_person, email, phone, address, status,
            created_at, updated_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
        ON CONFLICT (id) DO UPDATE SET
            code = excluded.code,
            name = excluded.name,
            contact_person = excluded.contact_person,
            email = excluded.email,
            phone = excluded.phone,
            address = excluded.address,
            status = excluded.status,
            updated_at = excluded.updated_at;",
        params![
            client.id.to_string(),
            client.code,
            client.name,
            client.contact_person,
            client.email,
            client.phone,
            client.address,
            client_status_to_db(client.status),
            client.created_at,
            client.updated_at,
        ],
    )?;
    Ok(())
}

fn parse_client_row(row: &Row<'_>) -> BackendResult<Client> {
    Ok(Client {
        id: parse_uuid_column(row, "id")?,
        code: row.get("code")?,
        name: row.get("name")?,
        contact_person: row.get("contact_person")?,
        email: row.get("email")?,
        phone: row.get("phone")?,
        address: row.get("address")?,
        status: parse_client_status(&row.get::<_, String>("status")?)?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

fn client_status_to_db(status: ClientStatus) -> &'static str {
    match status {
        ClientStatus::Active => "active",
        ClientStatus::Inactive => "inactive",
        ClientStatus::Prospect => "prospect",
        ClientStatus::Lead => "lead",
    }
}

fn parse_client_status(value: &str) -> BackendResult<ClientStatus> {
    match value {
        "active" => Ok(ClientStatus::Active),
        "inactive" => Ok(ClientStatus::Inactive),
        "prospect" => Ok(ClientStatus::Prospect),
        "lead" => Ok(ClientStatus::Lead),
        other => Err(BackendError::InvalidData(format!(
            "invalid client status `{other}` in clients.status"
        ))),
    }
}

// ----- projects -----

fn upsert_project(conn: &Connection, project: &Project) -> BackendResult<()> {
    conn.execute(
        "INSERT INTO projects (
            id, code, name, client_id, description, budget, billing_rate,
            billing_terms, gst_rate, gst_inclusive, total_cost, cost_subtotal,
            cost_tax_amount, cost_total, created_at, updated_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)
        ON CONFLICT (id) DO UPDATE SET
            code = excluded.code,
            name = excluded.name,
            client_id = excluded.client_id,
            description = excluded.description,
            budget = excluded.budget,
            billing_rate = excluded.billing_rate,
            billing_terms = excluded.billing_terms,
            gst_rate = excluded.gst_rate,
            gst_inclusive = excluded.gst_inclusive,
            total_cost = excluded.total_cost,
            cost_subtotal = excluded.cost_subtotal,
            cost_tax_amount = excluded.cost_tax_amount,
            cost_total = excluded.cost_total,
            updated_at = excluded.updated_at;",
        params![
            project.id.to_string(),
            project.code,
            project.name,
            project.client_id.to_string(),
            project.description,
            project.budget,
            project.billing_rate,
            project.billing_terms,
            project.gst_rate,
            project.gst_inclusive as i64,
            project.total_cost,
            project.cost_breakdown.subtotal,
            project.cost_breakdown.tax_amount,
            project.cost_breakdown.total,
            project.created_at,
            project.updated_at,
        ],
    )?;
    Ok(())
}

fn parse_project_row(row: &Row<'_>) -> BackendResult<Project> {
    Ok(Project {
        id: parse_uuid_column(row, "id")?,
        code: row.get("code")?,
        name: row.get("name")?,
        client_id: parse_uuid_column(row, "client_id")?,
        description: row.get("description")?,
        budget: row.get("budget")?,
        billing_rate: row.get("billing_rate")?,
        billing_terms: row.get("billing_terms")?,
        gst_rate: row.get("gst_rate")?,
        gst_inclusive: row.get::<_, i64>("gst_inclusive")? != 0,
        total_cost: row.get("total_cost")?,
        cost_breakdown: CostBreakdown {
            subtotal: row.get("cost_subtotal")?,
            tax_amount: row.get("cost_tax_amount")?,
            total: row.get("cost_total")?,
        },
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

// ----- timesheets -----

fn upsert_timesheet(conn: &Connection, timesheet: &Timesheet) -> BackendResult<()> {
    conn.execute(
        "INSERT INTO timesheets (
            id, code, project_id, month, total_working_days, days_worked,
            days_leave, hours_per_day, billing_rate, total_hours, total_amount,
            status, rejection_reason, submitted_at, approved_at, rejected_at,
            invoice_id, attachments, created_at, updated_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14,
                  ?15, ?16, ?17, ?18, ?19, ?20)
        ON CONFLICT (id) DO UPDATE SET
            code = excluded.code,
            project_id = excluded.project_id,
            month = excluded.month,
            total_working_days = excluded.total_working_days,
            days_worked = excluded.days_worked,
            days_leave = excluded.days_leave,
            hours_per_day = excluded.hours_per_day,
            billing_rate = excluded.billing_rate,
            total_hours = excluded.total_hours,
            total_amount = excluded.total_amount,
            status = excluded.status,
            rejection_reason = excluded.rejection_reason,
            submitted_at = excluded.submitted_at,
            approved_at = excluded.approved_at,
            rejected_at = excluded.rejected_at,
            invoice_id = excluded.invoice_id,
            attachments = excluded.attachments,
            updated_at = excluded.updated_at;",
        params![
            timesheet.id.to_string(),
            timesheet.code,
            timesheet.project_id.to_string(),
            timesheet.month,
            timesheet.total_working_days,
            timesheet.days_worked,
            timesheet.days_leave,
            timesheet.hours_per_day,
            timesheet.billing_rate,
            timesheet.total_hours,
            timesheet.total_amount,
            timesheet.status.as_str(),
            timesheet.rejection_reason,
            timesheet.submitted_at,
            timesheet.approved_at,
            timesheet.rejected_at,
            timesheet.invoice_id.map(|id| id.to_string()),
            to_json(&timesheet.attachments)?,
            timesheet.created_at,
            timesheet.updated_at,
        ],
    )?;
    Ok(())
}

fn parse_timesheet_row(row: &Row<'_>) -> BackendResult<Timesheet> {
    Ok(Timesheet {
        id: parse_uuid_column(row, "id")?,
        code: row.get("code")?,
        project_id: parse_uuid_column(row, "project_id")?,
        month: row.get("month")?,
        total_working_days: row.get("total_working_days")?,
        days_worked: row.get("days_worked")?,
        days_leave: row.get("days_leave")?,
        hours_per_day: row.get("hours_per_day")?,
        billing_rate: row.get("billing_rate")?,
        total_hours: row.get("total_hours")?,
        total_amount: row.get("total_amount")?,
        status: parse_timesheet_status(&row.get::<_, String>("status")?)?,
        rejection_reason: row.get("rejection_reason")?,
        submitted_at: row.get("submitted_at")?,
        approved_at: row.get("approved_at")?,
        rejected_at: row.get("rejected_at")?,
        invoice_id: parse_optional_uuid_column(row, "invoice_id")?,
        attachments: from_json::<Vec<Attachment>>(row, "attachments")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

fn parse_timesheet_status(value: &str) -> BackendResult<TimesheetStatus> {
    match value {
        "draft" => Ok(TimesheetStatus::Draft),
        "submitted" => Ok(TimesheetStatus::Submitted),
        "approved" => Ok(TimesheetStatus::Approved),
        "rejected" => Ok(TimesheetStatus::Rejected),
        "invoiced" => Ok(TimesheetStatus::Invoiced),
        other => Err(BackendError::InvalidData(format!(
            "invalid timesheet status `{other}` in timesheets.status"
        ))),
    }
}

// ----- invoices -----

fn upsert_invoice(conn: &Connection, invoice: &Invoice) -> BackendResult<()> {
    conn.execute(
        "INSERT INTO invoices (
            id, number, client_id, project_id, timesheet_id, issue_date,
            due_date, subtotal, tax_rate, tax_amount, total, status, items,
            notes, attachments, created_at, updated_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13,
                  ?14, ?15, ?16, ?17)
        ON CONFLICT (id) DO UPDATE SET
            number = excluded.number,
            client_id = excluded.client_id,
            project_id = excluded.project_id,
            timesheet_id = excluded.timesheet_id,
            issue_date = excluded.issue_date,
            due_date = excluded.due_date,
            subtotal = excluded.subtotal,
            tax_rate = excluded.tax_rate,
            tax_amount = excluded.tax_amount,
            total = excluded.total,
            status = excluded.status,
            items = excluded.items,
            notes = excluded.notes,
            attachments = excluded.attachments,
            updated_at = excluded.updated_at;",
        params![
            invoice.id.to_string(),
            invoice.number,
            invoice.client_id.to_string(),
            invoice.project_id.to_string(),
            invoice.timesheet_id.map(|id| id.to_string()),
            date_to_db(invoice.issue_date),
            date_to_db(invoice.due_date),
            invoice.subtotal,
            invoice.tax_rate,
            invoice.tax_amount,
            invoice.total,
            invoice.status.as_str(),
            to_json(&invoice.items)?,
            invoice.notes,
            to_json(&invoice.attachments)?,
            invoice.created_at,
            invoice.updated_at,
        ],
    )?;
    Ok(())
}

fn parse_invoice_row(row: &Row<'_>) -> BackendResult<Invoice> {
    Ok(Invoice {
        id: parse_uuid_column(row, "id")?,
        number: row.get("number")?,
        client_id: parse_uuid_column(row, "client_id")?,
        project_id: parse_uuid_column(row, "project_id")?,
        timesheet_id: parse_optional_uuid_column(row, "timesheet_id")?,
        issue_date: parse_date_column(row, "issue_date")?,
        due_date: parse_date_column(row, "due_date")?,
        subtotal: row.get("subtotal")?,
        tax_rate: row.get("tax_rate")?,
        tax_amount: row.get("tax_amount")?,
        total: row.get("total")?,
        status: parse_invoice_status(&row.get::<_, String>("status")?)?,
        items: from_json::<Vec<InvoiceItem>>(row, "items")?,
        notes: row.get("notes")?,
        attachments: from_json::<Vec<Attachment>>(row, "attachments")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

fn parse_invoice_status(value: &str) -> BackendResult<InvoiceStatus> {
    match value {
        "draft" => Ok(InvoiceStatus::Draft),
        "sent" => Ok(InvoiceStatus::Sent),
        "paid" => Ok(InvoiceStatus::Paid),
        other => Err(BackendError::InvalidData(format!(
            "invalid invoice status `{other}` in invoices.status"
        ))),
    }
}

// ----- expenses -----

fn upsert_expense(conn: &Connection, expense: &Expense) -> BackendResult<()> {
    conn.execute(
        "INSERT INTO expenses (
            id, code, category, description, amount, date, project_id, status,
            attachments, created_at, updated_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
        ON CONFLICT (id) DO UPDATE SET
            code = excluded.code,
            category = excluded.category,
            description = excluded.description,
            amount = excluded.amount,
            date = excluded.date,
            project_id = excluded.project_id,
            status = excluded.status,
            attachments = excluded.attachments,
            updated_at = excluded.updated_at;",
        params![
            expense.id.to_string(),
            expense.code,
            expense.category,
            expense.description,
            expense.amount,
            date_to_db(expense.date),
            expense.project_id.map(|id| id.to_string()),
            expense_status_to_db(expense.status),
            to_json(&expense.attachments)?,
            expense.created_at,
            expense.updated_at,
        ],
    )?;
    Ok(())
}

fn parse_expense_row(row: &Row<'_>) -> BackendResult<Expense> {
    Ok(Expense {
        id: parse_uuid_column(row, "id")?,
        code: row.get("code")?,
        category: row.get("category")?,
        description: row.get("description")?,
        amount: row.get("amount")?,
        date: parse_date_column(row, "date")?,
        project_id: parse_optional_uuid_column(row, "project_id")?,
        status: parse_expense_status(&row.get::<_, String>("status")?)?,
        attachments: from_json::<Vec<Attachment>>(row, "attachments")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

fn expense_status_to_db(status: ExpenseStatus) -> &'static str {
    match status {
        ExpenseStatus::Pending => "pending",
        ExpenseStatus::Approved => "approved",
        ExpenseStatus::Reimbursed => "reimbursed",
    }
}

fn parse_expense_status(value: &str) -> BackendResult<ExpenseStatus> {
    match value {
        "pending" => Ok(ExpenseStatus::Pending),
        "approved" => Ok(ExpenseStatus::Approved),
        "reimbursed" => Ok(ExpenseStatus::Reimbursed),
        other => Err(BackendError::InvalidData(format!(
            "invalid expense status `{other}` in expenses.status"
        ))),
    }
}

// ----- daily logs -----

fn upsert_daily_log(conn: &Connection, log: &DailyLog) -> BackendResult<()> {
    conn.execute(
        "INSERT INTO daily_logs (
            id, title, description, date, category, priority, tags, status,
            project_id, attachments, created_at, updated_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
        ON CONFLICT (id) DO UPDATE SET
            title = excluded.title,
            description = excluded.description,
            date = excluded.date,
            category = excluded.category,
            priority = excluded.priority,
            tags = excluded.tags,
            status = excluded.status,
            project_id = excluded.project_id,
            attachments = excluded.attachments,
            updated_at = excluded.updated_at;",
        params![
            log.id.to_string(),
            log.title,
            log.description,
            date_to_db(log.date),
            log_category_to_db(log.category),
            log_priority_to_db(log.priority),
            to_json(&log.tags)?,
            log_status_to_db(log.status),
            log.project_id.map(|id| id.to_string()),
            to_json(&log.attachments)?,
            log.created_at,
            log.updated_at,
        ],
    )?;
    Ok(())
}

fn parse_daily_log_row(row: &Row<'_>) -> BackendResult<DailyLog> {
    Ok(DailyLog {
        id: parse_uuid_column(row, "id")?,
        title: row.get("title")?,
        description: row.get("description")?,
        date: parse_date_column(row, "date")?,
        category: parse_log_category(&row.get::<_, String>("category")?)?,
        priority: parse_log_priority(&row.get::<_, String>("priority")?)?,
        tags: from_json::<Vec<String>>(row, "tags")?,
        status: parse_log_status(&row.get::<_, String>("status")?)?,
        project_id: parse_optional_uuid_column(row, "project_id")?,
        attachments: from_json::<Vec<Attachment>>(row, "attachments")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

fn log_category_to_db(category: LogCategory) -> &'static str {
    match category {
        LogCategory::Accounting => "accounting",
        LogCategory::Important => "important",
        LogCategory::Reminder => "reminder",
        LogCategory::Milestone => "milestone",
    }
}

fn parse_log_category(value: &str) -> BackendResult<LogCategory> {
    match value {
        "accounting" => Ok(LogCategory::Accounting),
        "important" => Ok(LogCategory::Important),
        "reminder" => Ok(LogCategory::Reminder),
        "milestone" => Ok(LogCategory::Milestone),
        other => Err(BackendError::InvalidData(format!(
            "invalid log category `{other}` in daily_logs.category"
        ))),
    }
}

fn log_priority_to_db(priority: LogPriority) -> &'static str {
    match priority {
        LogPriority::Low => "low",
        LogPriority::Medium => "medium",
        LogPriority::High => "high",
    }
}

fn parse_log_priority(value: &str) -> BackendResult<LogPriority> {
    match value {
        "low" => Ok(LogPriority::Low),
        "medium" => Ok(LogPriority::Medium),
        "high" => Ok(LogPriority::High),
        other => Err(BackendError::InvalidData(format!(
            "invalid log priority `{other}` in daily_logs.priority"
        ))),
    }
}

fn log_status_to_db(status: LogStatus) -> &'static str {
    match status {
        LogStatus::Open => "open",
        LogStatus::Completed => "completed",
    }
}

fn parse_log_status(value: &str) -> BackendResult<LogStatus> {
    match value {
        "open" => Ok(LogStatus::Open),
        "completed" => Ok(LogStatus::Completed),
        other => Err(BackendError::InvalidData(format!(
            "invalid log status `{other}` in daily_logs.status"
        ))),
    }
}

// ----- company profile -----

fn save_profile(conn: &Connection, profile: &CompanyProfile) -> BackendResult<()> {
    conn.execute(
        "UPDATE company_profile SET
            name = ?1,
            legal_name = ?2,
            email = ?3,
            phone = ?4,
            website = ?5,
            address = ?6,
            gst_number = ?7,
            bank_name = ?8,
            bank_account_number = ?9,
            bank_branch_code = ?10,
            linkedin = ?11,
            twitter = ?12,
            updated_at = ?13
         WHERE id = 1;",
        params![
            profile.name,
            profile.legal_name,
            profile.email,
            profile.phone,
            profile.website,
            profile.address,
            profile.gst_number,
            profile.bank_name,
            profile.bank_account_number,
            profile.bank_branch_code,
            profile.linkedin,
            profile.twitter,
            profile.updated_at,
        ],
    )?;
    Ok(())
}

fn load_profile(conn: &Connection) -> BackendResult<CompanyProfile> {
    let profile = conn.query_row("SELECT * FROM company_profile WHERE id = 1;", [], |row| {
        Ok(CompanyProfile {
            name: row.get("name")?,
            legal_name: row.get("legal_name")?,
            email: row.get("email")?,
            phone: row.get("phone")?,
            website: row.get("website")?,
            address: row.get("address")?,
            gst_number: row.get("gst_number")?,
            bank_name: row.get("bank_name")?,
            bank_account_number: row.get("bank_account_number")?,
            bank_branch_code: row.get("bank_branch_code")?,
            linkedin: row.get("linkedin")?,
            twitter: row.get("twitter")?,
            updated_at: row.get("updated_at")?,
        })
    })?;
    Ok(profile)
}

// ----- column helpers -----

fn parse_uuid_column(row: &Row<'_>, column: &'static str) -> BackendResult<Uuid> {
    let value: String = row.get(column)?;
    Uuid::parse_str(&value).map_err(|_| {
        BackendError::InvalidData(format!("invalid uuid value `{value}` in column {column}"))
    })
}

fn parse_optional_uuid_column(row: &Row<'_>, column: &'static str) -> BackendResult<Option<Uuid>> {
    match row.get::<_, Option<String>>(column)? {
        None => Ok(None),
        Some(value) => Uuid::parse_str(&value).map(Some).map_err(|_| {
            BackendError::InvalidData(format!("invalid uuid value `{value}` in column {column}"))
        }),
    }
}

fn date_to_db(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn parse_date_column(row: &Row<'_>, column: &'static str) -> BackendResult<NaiveDate> {
    let value: String = row.get(column)?;
    NaiveDate::parse_from_str(&value, "%Y-%m-%d").map_err(|_| {
        BackendError::InvalidData(format!("invalid date value `{value}` in column {column}"))
    })
}

fn to_json<T: Serialize>(value: &T) -> BackendResult<String> {
    Ok(serde_json::to_string(value)?)
}

fn from_json<T: DeserializeOwned>(row: &Row<'_>, column: &'static str) -> BackendResult<T> {
    let raw: String = row.get(column)?;
    serde_json::from_str(&raw).map_err(|err| {
        BackendError::InvalidData(format!("invalid json in column {column}: {err}"))
    })
}
