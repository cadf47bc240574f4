use chrono::NaiveDate;
use tallybook_core::backend::{Backend, Change, RelationalBackend};
use tallybook_core::model::{
    ClientStatus, CompanyProfile, Entity, EntityKind, ExpenseStatus, NewClient, NewExpense,
    NewProject, NewTimesheet,
};
use tallybook_core::snapshot::Snapshot;
use tallybook_core::store::LedgerStore;

fn populated_snapshot() -> Snapshot {
    let mut store = LedgerStore::default();
    let client = store
        .add_client(NewClient {
            name: "Acme".to_string(),
            contact_person: None,
            email: Some("billing@acme.example".to_string()),
            phone: None,
            address: None,
            status: ClientStatus::Active,
        })
        .unwrap();
    let project = store
        .add_project(NewProject {
            name: "Platform build".to_string(),
            client_id: client.id,
            description: Some("phase one".to_string()),
            budget: 500_000.0,
            billing_rate: 1_000.0,
            billing_terms: 30,
            gst_rate: 18.0,
            gst_inclusive: false,
        })
        .unwrap();
    let sheet = store
        .add_timesheet(NewTimesheet {
            project_id: project.id,
            month: "2026-07".to_string(),
            total_working_days: 23,
            days_worked: 20,
            days_leave: 3,
            hours_per_day: 8.0,
            billing_rate: 1_000.0,
        })
        .unwrap();
    store.generate_invoice_from_timesheet(sheet.id).unwrap();
    store
        .add_expense(NewExpense {
            category: "Travel".to_string(),
            description: "on-site week".to_string(),
            amount: 1_200.0,
            date: NaiveDate::from_ymd_opt(2026, 7, 14).unwrap(),
            project_id: Some(project.id),
            status: ExpenseStatus::Approved,
        })
        .unwrap();
    store.to_snapshot()
}

fn row_count(backend: &RelationalBackend, table: &str) -> i64 {
    backend
        .connection()
        .query_row(&format!("SELECT COUNT(*) FROM {table};"), [], |row| {
            row.get(0)
        })
        .unwrap()
}

#[test]
fn save_and_load_round_trip_every_collection() {
    let mut backend = RelationalBackend::open_in_memory().unwrap();
    let snapshot = populated_snapshot();

    backend.save_snapshot(&snapshot).unwrap();
    let loaded = backend.load_snapshot().unwrap();

    assert_eq!(loaded.clients, snapshot.clients);
    assert_eq!(loaded.projects, snapshot.projects);
    assert_eq!(loaded.timesheets, snapshot.timesheets);
    assert_eq!(loaded.invoices, snapshot.invoices);
    assert_eq!(loaded.expenses, snapshot.expenses);
    assert_eq!(loaded.daily_logs, snapshot.daily_logs);
    assert_eq!(loaded.company_profile, snapshot.company_profile);
}

#[test]
fn save_snapshot_replaces_previous_content() {
    let mut backend = RelationalBackend::open_in_memory().unwrap();
    backend.save_snapshot(&populated_snapshot()).unwrap();

    backend.save_snapshot(&Snapshot::empty()).unwrap();

    let loaded = backend.load_snapshot().unwrap();
    assert_eq!(loaded.entity_count(), 0);
    assert_eq!(row_count(&backend, "clients"), 0);
    assert_eq!(row_count(&backend, "invoices"), 0);
}

#[test]
fn apply_upsert_inserts_then_updates_in_place() {
    let mut backend = RelationalBackend::open_in_memory().unwrap();
    let snapshot = populated_snapshot();
    let mut client = snapshot.clients[0].clone();

    backend
        .apply(&Change::Upsert(Entity::Client(client.clone())))
        .unwrap();
    assert_eq!(row_count(&backend, "clients"), 1);

    client.name = "Acme International".to_string();
    backend
        .apply(&Change::Upsert(Entity::Client(client.clone())))
        .unwrap();

    assert_eq!(row_count(&backend, "clients"), 1);
    let loaded = backend.load_snapshot().unwrap();
    assert_eq!(loaded.clients[0].name, "Acme International");
}

#[test]
fn upserting_a_parent_row_does_not_cascade_to_children() {
    let mut backend = RelationalBackend::open_in_memory().unwrap();
    let snapshot = populated_snapshot();
    backend.save_snapshot(&snapshot).unwrap();

    // A row refresh must never behave like delete-then-insert.
    let mut client = snapshot.clients[0].clone();
    client.phone = Some("+65 0000 0000".to_string());
    backend
        .apply(&Change::Upsert(Entity::Client(client)))
        .unwrap();

    assert_eq!(row_count(&backend, "projects"), 1);
    assert_eq!(row_count(&backend, "timesheets"), 1);
    assert_eq!(row_count(&backend, "invoices"), 1);
}

#[test]
fn apply_remove_deletes_the_addressed_row() {
    let mut backend = RelationalBackend::open_in_memory().unwrap();
    let snapshot = populated_snapshot();
    backend.save_snapshot(&snapshot).unwrap();

    backend
        .apply(&Change::Remove(EntityKind::Expense, snapshot.expenses[0].id))
        .unwrap();

    assert_eq!(row_count(&backend, "expenses"), 0);
    assert_eq!(row_count(&backend, "projects"), 1);
}

#[test]
fn raw_sql_delete_of_a_client_cascades_through_the_schema() {
    let mut backend = RelationalBackend::open_in_memory().unwrap();
    let snapshot = populated_snapshot();
    backend.save_snapshot(&snapshot).unwrap();

    backend
        .connection()
        .execute("DELETE FROM clients;", [])
        .unwrap();

    assert_eq!(row_count(&backend, "projects"), 0);
    assert_eq!(row_count(&backend, "timesheets"), 0);
    assert_eq!(row_count(&backend, "invoices"), 0);

    // Expenses keep their row; the project link is nulled out.
    assert_eq!(row_count(&backend, "expenses"), 1);
    let orphaned: i64 = backend
        .connection()
        .query_row(
            "SELECT COUNT(*) FROM expenses WHERE project_id IS NULL;",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(orphaned, 1);
}

#[test]
fn bridge_parent_delete_keeps_store_and_backend_aligned() {
    let backend = RelationalBackend::open_in_memory().unwrap();
    let mut ledger = tallybook_core::sync::Ledger::open(Box::new(backend)).unwrap();
    let client = ledger
        .add_client(NewClient {
            name: "Acme".to_string(),
            contact_person: None,
            email: None,
            phone: None,
            address: None,
            status: ClientStatus::Active,
        })
        .unwrap();
    let project = ledger
        .add_project(NewProject {
            name: "Website".to_string(),
            client_id: client.id,
            description: None,
            budget: 100_000.0,
            billing_rate: 1_000.0,
            billing_terms: 30,
            gst_rate: 18.0,
            gst_inclusive: false,
        })
        .unwrap();

    ledger.remove_client(client.id).unwrap();

    // The project is gone on both sides of the bridge.
    assert!(ledger.store().project(project.id).is_none());
    assert!(ledger.store().clients().is_empty());
    let persisted = ledger.export().unwrap();
    assert!(persisted.clients.is_empty());
    assert!(persisted.projects.is_empty());
}

#[test]
fn apply_profile_updates_the_singleton_row() {
    let mut backend = RelationalBackend::open_in_memory().unwrap();

    let profile = CompanyProfile {
        name: "Tally Consulting".to_string(),
        bank_name: "First Bank".to_string(),
        ..CompanyProfile::default()
    }
    .touched();
    backend.apply(&Change::Profile(profile.clone())).unwrap();

    let loaded = backend.load_snapshot().unwrap();
    assert_eq!(loaded.company_profile, profile);
    assert_eq!(row_count(&backend, "company_profile"), 1);
}
