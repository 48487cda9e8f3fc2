use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A project task, optionally tagged with a feature.
///
/// Only the feature association is modelled here. When the referenced feature
/// is deleted, `feature_id` is cleared and the task survives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: Uuid,
    pub project_id: Uuid,
    pub feature_id: Option<Uuid>,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a task inside a project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTask {
    pub title: String,
    #[serde(default)]
    pub feature_id: Option<Uuid>,
}

/// Input for updating a task. All fields are optional for partial updates.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateTask {
    #[serde(default)]
    pub title: Option<String>,
    /// Attach the task to this feature.
    #[serde(default)]
    pub feature_id: Option<Uuid>,
    /// Detach the task from its feature. Takes precedence over `feature_id`.
    #[serde(default)]
    pub clear_feature: bool,
}
