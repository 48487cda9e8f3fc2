//! Per-project feature list.
//!
//! [`FeatureManager`] owns the displayed copy of a project's features. Every
//! successful mutation is followed by a full [`refresh`](FeatureManager::refresh)
//! from the store; the list is never patched locally.
//!
//! List and delete failures are logged and otherwise swallowed: the previous
//! list stays visible. Save failures are handled inside the edit workflow.

use std::fmt::Write as _;

use uuid::Uuid;

use crate::dialog::DialogController;
use crate::models::Feature;
use crate::store::FeatureStore;
use crate::workflow::{self, EditResult};

pub const HEADER: &str = "Features";
pub const ADD_ACTION: &str = "Add Feature";
pub const EDIT_ACTION: &str = "Edit feature";
pub const DELETE_ACTION: &str = "Delete feature";
pub const EMPTY_MESSAGE: &str = "No features yet. Create one to start organizing your tasks.";
const LOADING_MESSAGE: &str = "Loading features...";

/// Confirmation prompt shown before deleting `name`.
pub fn delete_confirmation(name: &str) -> String {
    format!(
        "Are you sure you want to delete the feature \"{}\"?\n\nTasks will not be deleted, but they will no longer be associated with this feature.",
        name
    )
}

/// What the manager currently shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManagerView<'a> {
    /// Spinner; the list is suppressed.
    Loading,
    /// Call to action, no table.
    Empty,
    /// One row per feature, each with edit and delete actions.
    Table(&'a [Feature]),
}

pub struct FeatureManager<S> {
    store: S,
    project_id: Option<Uuid>,
    loading: bool,
    features: Vec<Feature>,
}

impl<S: FeatureStore> FeatureManager<S> {
    /// A manager that has not been activated yet. It reports `loading` until
    /// the first refresh completes.
    pub fn new(store: S) -> Self {
        Self {
            store,
            project_id: None,
            loading: true,
            features: Vec::new(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn project_id(&self) -> Option<Uuid> {
        self.project_id
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    /// Bind the manager to a project. Refreshes on first activation and
    /// whenever the project changes; re-activating the same project is a no-op.
    pub async fn activate(&mut self, project_id: Uuid) {
        if self.project_id == Some(project_id) {
            return;
        }
        self.project_id = Some(project_id);
        self.refresh().await;
    }

    /// Replace the list with a fresh copy from the store.
    pub async fn refresh(&mut self) {
        let Some(project_id) = self.project_id else {
            tracing::debug!("Refresh requested before activation");
            return;
        };

        self.loading = true;
        match self.store.list(project_id).await {
            Ok(features) => self.features = features,
            Err(e) => tracing::error!("Failed to fetch features: {}", e),
        }
        self.loading = false;
    }

    /// Open the edit workflow for `feature`, or in create mode when `None`.
    /// Refreshes the list when the dialog saves.
    pub async fn open_create_or_edit<D>(
        &mut self,
        dialogs: &mut D,
        feature: Option<&Feature>,
    ) -> EditResult
    where
        D: DialogController + ?Sized,
    {
        let Some(project_id) = self.project_id else {
            tracing::warn!("Feature dialog opened before the manager was activated");
            return EditResult::Canceled;
        };

        let result = workflow::open(&self.store, dialogs, feature, project_id).await;
        if let EditResult::Saved(ref saved) = result {
            tracing::info!("Saved feature {} ({})", saved.name, saved.id);
            self.refresh().await;
        }
        result
    }

    /// Delete `feature` after interactive confirmation.
    ///
    /// Returns `true` when the store accepted the delete.
    pub async fn delete<D>(&mut self, dialogs: &mut D, feature: &Feature) -> bool
    where
        D: DialogController + ?Sized,
    {
        if !dialogs.confirm(&delete_confirmation(&feature.name)).await {
            return false;
        }

        match self.store.delete(feature.id).await {
            Ok(()) => {
                tracing::info!("Deleted feature {} ({})", feature.name, feature.id);
                self.refresh().await;
                true
            }
            Err(e) => {
                tracing::error!("Failed to delete feature: {}", e);
                false
            }
        }
    }

    pub fn view(&self) -> ManagerView<'_> {
        if self.loading {
            ManagerView::Loading
        } else if self.features.is_empty() {
            ManagerView::Empty
        } else {
            ManagerView::Table(&self.features)
        }
    }

    /// Plain-text rendering of [`view`](Self::view). Rows are numbered from 1.
    ///
    /// ```text
    /// Features                        [Add Feature]
    ///   #  Name
    ///   1  Authentication             [Edit feature] [Delete feature]
    ///   2  Billing                    [Edit feature] [Delete feature]
    /// ```
    pub fn render(&self) -> String {
        let mut output = String::new();
        let _ = writeln!(output, "{:<32}[{}]", HEADER, ADD_ACTION);

        match self.view() {
            ManagerView::Loading => {
                let _ = writeln!(output, "  {}", LOADING_MESSAGE);
            }
            ManagerView::Empty => {
                let _ = writeln!(output, "  {}", EMPTY_MESSAGE);
            }
            ManagerView::Table(rows) => {
                let width = rows
                    .iter()
                    .map(|f| f.name.chars().count())
                    .max()
                    .unwrap_or(0)
                    .max(4);
                let _ = writeln!(output, "  {:>3}  {:<width$}", "#", "Name");
                for (i, feature) in rows.iter().enumerate() {
                    let _ = writeln!(
                        output,
                        "  {:>3}  {:<width$}  [{}] [{}]",
                        i + 1,
                        feature.name,
                        EDIT_ACTION,
                        DELETE_ACTION
                    );
                }
            }
        }
        output
    }
}
