use chrono::NaiveDate;
use tallybook_core::backend::{Backend, Change, DocumentBackend};
use tallybook_core::model::{
    ClientStatus, CompanyProfile, Entity, EntityKind, ExpenseStatus, NewClient, NewExpense,
    NewProject,
};
use tallybook_core::snapshot::{Snapshot, SNAPSHOT_VERSION};
use tallybook_core::store::LedgerStore;

fn populated_snapshot() -> Snapshot {
    let mut store = LedgerStore::default();
    let client = store
        .add_client(NewClient {
            name: "Acme".to_string(),
            contact_person: Some("Jo Doe".to_string()),
            email: Some("jo@acme.example".to_string()),
            phone: None,
            address: None,
            status: ClientStatus::Active,
        })
        .unwrap();
    let project = store
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
    store
        .add_expense(NewExpense {
            category: "Travel".to_string(),
            description: "kickoff".to_string(),
            amount: 400.0,
            date: NaiveDate::from_ymd_opt(2026, 5, 4).unwrap(),
            project_id: Some(project.id),
            status: ExpenseStatus::Approved,
        })
        .unwrap();
    store.to_snapshot()
}

#[test]
fn missing_file_is_initialized_with_the_empty_dataset() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ledger.json");
    let mut backend = DocumentBackend::new(&path);

    let snapshot = backend.load_snapshot().unwrap();

    assert_eq!(snapshot.entity_count(), 0);
    assert_eq!(snapshot.company_profile, CompanyProfile::default());
    assert_eq!(snapshot.version, SNAPSHOT_VERSION);
    assert!(path.exists());
}

#[test]
fn save_and_load_round_trip_the_full_dataset() {
    let dir = tempfile::tempdir().unwrap();
    let mut backend = DocumentBackend::new(dir.path().join("ledger.json"));
    let snapshot = populated_snapshot();

    backend.save_snapshot(&snapshot).unwrap();
    let loaded = backend.load_snapshot().unwrap();

    assert_eq!(loaded, snapshot);
}

#[test]
fn writes_do_not_leave_a_temp_file_behind() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ledger.json");
    let mut backend = DocumentBackend::new(&path);

    backend.save_snapshot(&populated_snapshot()).unwrap();

    assert!(path.exists());
    assert!(!path.with_extension("json.tmp").exists());
}

#[test]
fn apply_upsert_matches_load_modify_save() {
    let dir = tempfile::tempdir().unwrap();
    let snapshot = populated_snapshot();
    let client = snapshot.clients[0].clone();

    // Path A: incremental apply.
    let mut applied = DocumentBackend::new(dir.path().join("applied.json"));
    applied.save_snapshot(&snapshot).unwrap();
    let mut renamed = client.clone();
    renamed.name = "Acme International".to_string();
    applied
        .apply(&Change::Upsert(Entity::Client(renamed.clone())))
        .unwrap();

    // Path B: whole-snapshot rewrite.
    let mut rewritten = DocumentBackend::new(dir.path().join("rewritten.json"));
    let mut manual = snapshot.clone();
    manual.clients[0] = renamed;
    rewritten.save_snapshot(&manual).unwrap();

    let from_apply = applied.load_snapshot().unwrap();
    let from_rewrite = rewritten.load_snapshot().unwrap();
    assert_eq!(from_apply.clients, from_rewrite.clients);
    assert_eq!(from_apply.projects, from_rewrite.projects);
}

#[test]
fn apply_remove_cascades_and_detaches_like_the_relational_schema() {
    let dir = tempfile::tempdir().unwrap();
    let mut backend = DocumentBackend::new(dir.path().join("ledger.json"));
    let snapshot = populated_snapshot();
    backend.save_snapshot(&snapshot).unwrap();

    backend
        .apply(&Change::Remove(EntityKind::Project, snapshot.projects[0].id))
        .unwrap();

    let loaded = backend.load_snapshot().unwrap();
    assert!(loaded.projects.is_empty());
    assert_eq!(loaded.clients.len(), 1);

    // The linked expense survives with its project reference cleared.
    assert_eq!(loaded.expenses.len(), 1);
    assert_eq!(loaded.expenses[0].project_id, None);
}

#[test]
fn apply_profile_replaces_the_singleton() {
    let dir = tempfile::tempdir().unwrap();
    let mut backend = DocumentBackend::new(dir.path().join("ledger.json"));
    backend.load_snapshot().unwrap();

    let profile = CompanyProfile {
        name: "Tally Consulting".to_string(),
        gst_number: "29ABCDE1234F1Z5".to_string(),
        ..CompanyProfile::default()
    }
    .touched();
    backend.apply(&Change::Profile(profile.clone())).unwrap();

    let loaded = backend.load_snapshot().unwrap();
    assert_eq!(loaded.company_profile, profile);
    assert_eq!(loaded.entity_count(), 0);
}
