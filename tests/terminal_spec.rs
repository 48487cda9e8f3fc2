mod common;

use common::*;
use feature_tags::manager::FeatureManager;
use feature_tags::terminal::{run_manager, TerminalDialogs};

async fn run(input: &'static str, store: std::sync::Arc<RecordingStore>, project_id: uuid::Uuid) -> String {
    let mut manager = FeatureManager::new(store);
    manager.activate(project_id).await;
    let mut dialogs = TerminalDialogs::new(input.as_bytes(), Vec::new());

    run_manager(&mut manager, &mut dialogs).await;

    String::from_utf8(dialogs.into_output()).expect("utf-8 output")
}

#[tokio::test]
async fn adds_a_feature_interactively() {
    let (store, db, project) = setup();

    let output = run("a\nLogin\nq\n", store.clone(), project.id).await;

    assert!(output.contains("No features yet."));
    assert!(output.contains("Create Feature"));
    assert!(output.contains("Saving..."));
    assert!(output.contains("  1  Login"));
    assert_eq!(db.get_features_by_project(project.id).unwrap()[0].name, "Login");
}

#[tokio::test]
async fn blank_name_shows_the_validation_error() {
    let (store, db, project) = setup();

    let output = run("a\n\n/cancel\nq\n", store.clone(), project.id).await;

    assert!(output.contains("! Feature name is required"));
    assert!(store.mutations().is_empty());
    assert!(db.get_features_by_project(project.id).unwrap().is_empty());
}

#[tokio::test]
async fn edits_a_row_keeping_its_name_on_enter() {
    let (store, db, project) = setup();
    let auth = create_feature(&db, project.id, "Auth");

    let output = run("e 1\n\nq\n", store.clone(), project.id).await;

    assert!(output.contains("Edit Feature"));
    assert_eq!(store.calls_of(Op::Update).len(), 1);
    assert_eq!(db.get_feature(auth.id).unwrap().unwrap().name, "Auth");
}

#[tokio::test]
async fn delete_requires_confirmation() {
    let (store, db, project) = setup();
    create_feature(&db, project.id, "Auth");

    run("d 1\nn\nq\n", store.clone(), project.id).await;
    assert!(store.calls_of(Op::Delete).is_empty());

    run("d 1\ny\nq\n", store.clone(), project.id).await;
    assert_eq!(store.calls_of(Op::Delete).len(), 1);
    assert!(db.get_features_by_project(project.id).unwrap().is_empty());
}

#[tokio::test]
async fn reports_unknown_rows_and_commands() {
    let (store, _db, project) = setup();

    let output = run("e 3\nfoo\n", store.clone(), project.id).await;

    assert!(output.contains("No feature in row 3"));
    assert!(output.contains("Unknown command: foo"));
}
