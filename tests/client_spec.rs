//! End-to-end: the HTTP client and the manager against a live API server.

mod common;

use common::*;
use feature_tags::api::{create_router_with_security, SecurityConfig};
use feature_tags::client::FeatureClient;
use feature_tags::db::Database;
use feature_tags::manager::FeatureManager;
use feature_tags::models::*;
use feature_tags::store::{FeatureStore, StoreError};
use feature_tags::workflow::EditResult;
use uuid::Uuid;

async fn spawn_server(security: SecurityConfig) -> (String, Database) {
    let db = Database::open_memory().expect("Failed to create database");
    db.migrate().expect("Failed to migrate");
    let app = create_router_with_security(db.clone(), security);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind");
    let addr = listener.local_addr().expect("No local address");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Server failed");
    });

    (format!("http://{}/api/v1", addr), db)
}

fn create_project(db: &Database) -> Project {
    db.create_project(CreateProject {
        name: "Test Project".to_string(),
    })
    .expect("Failed to create project")
}

#[tokio::test]
async fn crud_round_trip_over_http() {
    let (url, db) = spawn_server(SecurityConfig::disabled()).await;
    let project = create_project(&db);
    let client = FeatureClient::new(url, None);

    let created = client
        .create(&CreateFeature {
            project_id: project.id,
            name: "Login".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(client.list(project.id).await.unwrap(), vec![created.clone()]);

    let renamed = client
        .update(
            created.id,
            &UpdateFeature {
                name: Some("Sign in".to_string()),
            },
        )
        .await
        .unwrap();
    assert_eq!(renamed.name, "Sign in");

    client.delete(created.id).await.unwrap();
    assert!(client.list(project.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn missing_feature_maps_to_not_found() {
    let (url, _db) = spawn_server(SecurityConfig::disabled()).await;
    let client = FeatureClient::new(url, None);

    let err = client.delete(Uuid::new_v4()).await.unwrap_err();
    assert_eq!(err, StoreError::NotFound("Feature not found".to_string()));
}

#[tokio::test]
async fn blank_name_is_a_bad_request() {
    let (url, db) = spawn_server(SecurityConfig::disabled()).await;
    let project = create_project(&db);
    let client = FeatureClient::new(url, None);

    let err = client
        .create(&CreateFeature {
            project_id: project.id,
            name: " ".to_string(),
        })
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Feature name is required");
}

#[tokio::test]
async fn api_key_is_sent_as_bearer_token() {
    let (url, db) = spawn_server(SecurityConfig::with_api_key("secret")).await;
    let project = create_project(&db);

    let anonymous = FeatureClient::new(url.clone(), None);
    assert_eq!(
        anonymous.list(project.id).await.unwrap_err(),
        StoreError::Unauthorized
    );

    let authorized = FeatureClient::new(url, Some("secret".to_string()));
    assert!(authorized.list(project.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn unreachable_server_is_a_transport_error() {
    let client = FeatureClient::new("http://127.0.0.1:9/api/v1", None);
    let err = client.list(Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, StoreError::Transport(_)));
}

#[tokio::test]
async fn manager_creates_through_the_remote_store() {
    let (url, db) = spawn_server(SecurityConfig::disabled()).await;
    let project = create_project(&db);
    let mut manager = FeatureManager::new(FeatureClient::new(url, None));
    manager.activate(project.id).await;
    assert!(manager.features().is_empty());

    let mut dialogs = ScriptedDialogs::new().typed("Login").save();
    let result = manager.open_create_or_edit(&mut dialogs, None).await;

    let EditResult::Saved(created) = result else {
        panic!("expected Saved");
    };
    assert_eq!(manager.features(), &[created][..]);
    assert_eq!(db.get_features_by_project(project.id).unwrap().len(), 1);
}
