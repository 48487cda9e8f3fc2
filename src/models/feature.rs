use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A named tag grouping tasks within a project.
///
/// Features are owned by exactly one project. Tasks reference a feature by id;
/// deleting a feature detaches those tasks rather than deleting them.
///
/// Clients never edit a `Feature` in place: every successful write hands back
/// the server's representation, which replaces the local copy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feature {
    pub id: Uuid,
    pub project_id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload for creating a feature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateFeature {
    pub project_id: Uuid,
    pub name: String,
}

/// Payload for updating a feature. `None` keeps the stored name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateFeature {
    #[serde(default)]
    pub name: Option<String>,
}

/// Query parameters for listing the features of a project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureSearchParams {
    pub project_id: Uuid,
}
