//! The feature store seam.
//!
//! Everything above this module (the edit workflow, the list manager and the
//! selector) talks to features only through [`FeatureStore`]. The store is the
//! single source of truth; callers re-fetch after each mutation instead of
//! patching their local copies.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::db::Database;
use crate::models::{CreateFeature, Feature, UpdateFeature};

/// Failures surfaced by a feature store.
///
/// The `Display` output is the human-readable message shown to users.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("Unauthorized: API key required or invalid")]
    Unauthorized,

    #[error("Request failed: {0}")]
    Transport(String),

    #[error("{0}")]
    Server(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Remote list/create/update/delete operations on features.
#[async_trait]
pub trait FeatureStore: Send + Sync {
    /// All features of a project, in the order the store returns them.
    async fn list(&self, project_id: Uuid) -> StoreResult<Vec<Feature>>;

    async fn create(&self, input: &CreateFeature) -> StoreResult<Feature>;

    async fn update(&self, id: Uuid, input: &UpdateFeature) -> StoreResult<Feature>;

    async fn delete(&self, id: Uuid) -> StoreResult<()>;
}

#[async_trait]
impl<S: FeatureStore + ?Sized> FeatureStore for Arc<S> {
    async fn list(&self, project_id: Uuid) -> StoreResult<Vec<Feature>> {
        (**self).list(project_id).await
    }

    async fn create(&self, input: &CreateFeature) -> StoreResult<Feature> {
        (**self).create(input).await
    }

    async fn update(&self, id: Uuid, input: &UpdateFeature) -> StoreResult<Feature> {
        (**self).update(id, input).await
    }

    async fn delete(&self, id: Uuid) -> StoreResult<()> {
        (**self).delete(id).await
    }
}

/// In-process store backed directly by the SQLite database.
#[derive(Clone)]
pub struct LocalStore {
    db: Database,
}

impl LocalStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

fn db_error(e: anyhow::Error) -> StoreError {
    let msg = e.to_string();
    if msg.contains("not found") {
        return StoreError::NotFound(msg);
    }
    tracing::error!("Database error: {}", msg);
    StoreError::Server(msg)
}

fn feature_not_found() -> StoreError {
    StoreError::NotFound("Feature not found".to_string())
}

#[async_trait]
impl FeatureStore for LocalStore {
    async fn list(&self, project_id: Uuid) -> StoreResult<Vec<Feature>> {
        self.db.get_features_by_project(project_id).map_err(db_error)
    }

    async fn create(&self, input: &CreateFeature) -> StoreResult<Feature> {
        self.db.create_feature(input.clone()).map_err(db_error)
    }

    async fn update(&self, id: Uuid, input: &UpdateFeature) -> StoreResult<Feature> {
        self.db
            .update_feature(id, input.clone())
            .map_err(db_error)?
            .ok_or_else(feature_not_found)
    }

    async fn delete(&self, id: Uuid) -> StoreResult<()> {
        if self.db.delete_feature(id).map_err(db_error)? {
            Ok(())
        } else {
            Err(feature_not_found())
        }
    }
}
