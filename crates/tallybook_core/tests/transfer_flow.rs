use chrono::NaiveDate;
use tallybook_core::backend::{DocumentBackend, RelationalBackend};
use tallybook_core::model::{
    ClientStatus, CompanyProfile, LogCategory, LogPriority, NewClient, NewDailyLog, NewExpense,
    NewProject, ExpenseStatus,
};
use tallybook_core::sync::Ledger;
use tallybook_core::transfer::TransferError;
use std::path::Path;

fn document_ledger(dir: &Path) -> Ledger {
    let backend = DocumentBackend::new(dir.join("ledger.json"));
    Ledger::open(Box::new(backend)).unwrap()
}

fn populate(ledger: &mut Ledger) {
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
    ledger
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
    ledger
        .add_expense(NewExpense {
            category: "Software".to_string(),
            description: "licenses".to_string(),
            amount: 1_500.0,
            date: NaiveDate::from_ymd_opt(2026, 2, 1).unwrap(),
            project_id: None,
            status: ExpenseStatus::Approved,
        })
        .unwrap();
    ledger
        .add_daily_log(NewDailyLog {
            title: "File GST return".to_string(),
            description: "quarterly filing".to_string(),
            date: NaiveDate::from_ymd_opt(2026, 4, 30).unwrap(),
            category: LogCategory::Accounting,
            priority: LogPriority::High,
            tags: vec!["gst".to_string()],
            project_id: None,
        })
        .unwrap();
    ledger
        .set_company_profile(CompanyProfile {
            name: "Tally Consulting".to_string(),
            ..CompanyProfile::default()
        })
        .unwrap();
}

#[test]
fn importing_an_export_reproduces_the_dataset() {
    let dir = tempfile::tempdir().unwrap();
    let mut ledger = document_ledger(dir.path());
    populate(&mut ledger);

    let exported = ledger.export().unwrap();
    let value = serde_json::to_value(&exported).unwrap();

    let other_dir = tempfile::tempdir().unwrap();
    let mut other = document_ledger(other_dir.path());
    other
        .import(value, &other_dir.path().join("backups"))
        .unwrap();

    let reimported = other.export().unwrap();
    assert_eq!(reimported.clients, exported.clients);
    assert_eq!(reimported.projects, exported.projects);
    assert_eq!(reimported.expenses, exported.expenses);
    assert_eq!(reimported.daily_logs, exported.daily_logs);
    assert_eq!(reimported.company_profile, exported.company_profile);
}

#[test]
fn import_rejects_a_snapshot_missing_a_collection() {
    let dir = tempfile::tempdir().unwrap();
    let mut ledger = document_ledger(dir.path());
    populate(&mut ledger);

    let mut value = serde_json::to_value(ledger.export().unwrap()).unwrap();
    value.as_object_mut().unwrap().remove("expenses");

    let err = ledger
        .import(value, &dir.path().join("backups"))
        .unwrap_err();
    assert!(matches!(err, TransferError::InvalidImportFormat(_)));

    // Nothing was mutated on the failed import.
    assert_eq!(ledger.store().clients().len(), 1);
    assert_eq!(ledger.store().expenses().len(), 1);
    assert_eq!(ledger.store().company_profile().name, "Tally Consulting");
}

#[test]
fn import_leaves_a_safety_backup_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let mut ledger = document_ledger(dir.path());
    populate(&mut ledger);
    let before = ledger.export().unwrap();

    let value = serde_json::to_value(&before).unwrap();
    let backup_path = ledger
        .import(value, &dir.path().join("backups"))
        .unwrap();

    assert!(backup_path.exists());
    let raw = std::fs::read_to_string(&backup_path).unwrap();
    let backed_up: tallybook_core::Snapshot = serde_json::from_str(&raw).unwrap();
    assert_eq!(backed_up.clients, before.clients);
}

#[test]
fn clear_all_resets_every_collection_and_the_profile() {
    let dir = tempfile::tempdir().unwrap();
    let backups = dir.path().join("backups");
    let mut ledger = document_ledger(dir.path());
    populate(&mut ledger);

    ledger.clear_all(&backups).unwrap();

    assert!(ledger.store().clients().is_empty());
    assert!(ledger.store().expenses().is_empty());
    assert!(ledger.store().daily_logs().is_empty());
    assert_eq!(*ledger.store().company_profile(), CompanyProfile::default());

    // Clearing an already-empty dataset is a no-op that still succeeds.
    ledger.clear_all(&backups).unwrap();
    assert!(ledger.store().clients().is_empty());
}

#[test]
fn restore_returns_to_the_backed_up_state() {
    let dir = tempfile::tempdir().unwrap();
    let backups = dir.path().join("backups");
    let mut ledger = document_ledger(dir.path());
    populate(&mut ledger);
    let before = ledger.export().unwrap();

    let backup_path = ledger.backup(&backups).unwrap();
    ledger.clear_all(&backups).unwrap();
    assert!(ledger.store().clients().is_empty());

    ledger.restore(&backup_path, &backups).unwrap();

    let after = ledger.export().unwrap();
    assert_eq!(after.clients, before.clients);
    assert_eq!(after.projects, before.projects);
    assert_eq!(after.expenses, before.expenses);
    assert_eq!(after.daily_logs, before.daily_logs);
    assert_eq!(after.company_profile, before.company_profile);
}

#[test]
fn restore_of_a_non_snapshot_file_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let mut ledger = document_ledger(dir.path());
    populate(&mut ledger);

    let bogus = dir.path().join("not-a-snapshot.json");
    std::fs::write(&bogus, "{\"clients\": 7}").unwrap();

    let err = ledger
        .restore(&bogus, &dir.path().join("backups"))
        .unwrap_err();
    assert!(matches!(err, TransferError::InvalidImportFormat(_)));
    assert_eq!(ledger.store().clients().len(), 1);
}

#[test]
fn document_export_imports_into_a_relational_ledger() {
    let doc_dir = tempfile::tempdir().unwrap();
    let mut source = document_ledger(doc_dir.path());
    populate(&mut source);
    let exported = source.export().unwrap();

    let backend = RelationalBackend::open_in_memory().unwrap();
    let mut target = Ledger::open(Box::new(backend)).unwrap();
    let value = serde_json::to_value(&exported).unwrap();
    target
        .import(value, &doc_dir.path().join("backups"))
        .unwrap();

    let migrated = target.export().unwrap();
    assert_eq!(migrated.clients, exported.clients);
    assert_eq!(migrated.projects, exported.projects);
    assert_eq!(migrated.expenses, exported.expenses);
    assert_eq!(migrated.daily_logs, exported.daily_logs);
    assert_eq!(migrated.company_profile, exported.company_profile);
}
