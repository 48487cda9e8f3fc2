//! The create/edit feature dialog as an async workflow.
//!
//! [`open`] drives a [`FeatureEditDialog`] through an injected
//! [`DialogController`] and resolves once with [`EditResult`]. Save failures
//! stay inside the dialog as an inline message; the caller only ever sees
//! `Saved` or `Canceled`.

use uuid::Uuid;

use crate::dialog::{self, DialogController, DialogEvent, EditDialogView, Key};
use crate::models::{CreateFeature, Feature, UpdateFeature};
use crate::store::FeatureStore;

pub const NAME_REQUIRED: &str = "Feature name is required";
pub const SAVE_FAILED: &str = "Failed to save feature";

/// How the edit workflow ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditResult {
    /// Carries the entity as returned by the store.
    Saved(Feature),
    Canceled,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditMode {
    Create { project_id: Uuid },
    Edit(Feature),
}

/// What the workflow loop should do after an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Continue,
    Save,
    Cancel,
}

/// State of the edit form.
#[derive(Debug, Clone)]
pub struct FeatureEditDialog {
    mode: EditMode,
    name: String,
    saving: bool,
    error: Option<String>,
}

impl FeatureEditDialog {
    /// Edit mode when `feature` is given (name pre-filled), create mode otherwise.
    pub fn new(feature: Option<&Feature>, project_id: Uuid) -> Self {
        let (mode, name) = match feature {
            Some(f) => (EditMode::Edit(f.clone()), f.name.clone()),
            None => (EditMode::Create { project_id }, String::new()),
        };
        Self {
            mode,
            name,
            saving: false,
            error: None,
        }
    }

    pub fn mode(&self) -> &EditMode {
        &self.mode
    }

    pub fn is_edit_mode(&self) -> bool {
        matches!(self.mode, EditMode::Edit(_))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_saving(&self) -> bool {
        self.saving
    }

    pub fn view(&self) -> EditDialogView {
        let edit = self.is_edit_mode();
        EditDialogView {
            title: if edit { dialog::EDIT_TITLE } else { dialog::CREATE_TITLE },
            name_label: dialog::NAME_LABEL,
            placeholder: dialog::NAME_PLACEHOLDER,
            name: self.name.clone(),
            error: self.error.clone(),
            saving: self.saving,
            input_enabled: !self.saving,
            cancel_enabled: !self.saving,
            save_enabled: !self.saving && !self.name.trim().is_empty(),
            save_label: if edit { dialog::UPDATE_LABEL } else { dialog::CREATE_LABEL },
            cancel_label: dialog::CANCEL_LABEL,
        }
    }

    /// Apply one input event. Everything is ignored while a save is in flight,
    /// matching the disabled controls.
    pub fn handle(&mut self, event: DialogEvent) -> Step {
        if self.saving {
            return Step::Continue;
        }
        match event {
            DialogEvent::NameChanged(name) => {
                self.name = name;
                Step::Continue
            }
            DialogEvent::KeyPressed(key) if key.is_submit() => Step::Save,
            DialogEvent::KeyPressed(key) if key.key == Key::Escape => self.dismiss(),
            DialogEvent::KeyPressed(_) => Step::Continue,
            DialogEvent::SaveClicked => Step::Save,
            DialogEvent::CancelClicked => Step::Cancel,
            DialogEvent::Dismissed => self.dismiss(),
        }
    }

    fn dismiss(&mut self) -> Step {
        self.name.clear();
        self.error = None;
        Step::Cancel
    }

    /// Validate the name and enter the saving state.
    ///
    /// Returns the trimmed name, or `None` after setting the validation error.
    pub fn begin_save(&mut self) -> Option<String> {
        let trimmed = self.name.trim();
        if trimmed.is_empty() {
            self.error = Some(NAME_REQUIRED.to_string());
            return None;
        }
        let trimmed = trimmed.to_string();
        self.saving = true;
        self.error = None;
        Some(trimmed)
    }

    /// Issue the create or update call. Leaves the saving state either way and
    /// records the failure message inline.
    pub async fn submit<S>(&mut self, store: &S, name: String) -> Option<Feature>
    where
        S: FeatureStore + ?Sized,
    {
        let result = match &self.mode {
            EditMode::Edit(feature) => {
                tracing::debug!("Updating feature {}", feature.id);
                store
                    .update(feature.id, &UpdateFeature { name: Some(name) })
                    .await
            }
            EditMode::Create { project_id } => {
                tracing::debug!("Creating feature in project {}", project_id);
                store
                    .create(&CreateFeature {
                        project_id: *project_id,
                        name,
                    })
                    .await
            }
        };
        self.saving = false;

        match result {
            Ok(feature) => Some(feature),
            Err(e) => {
                tracing::warn!("Failed to save feature: {}", e);
                let msg = e.to_string();
                self.error = Some(if msg.trim().is_empty() {
                    SAVE_FAILED.to_string()
                } else {
                    msg
                });
                None
            }
        }
    }
}

/// Run the edit dialog until it is saved or canceled.
pub async fn open<S, D>(
    store: &S,
    dialogs: &mut D,
    feature: Option<&Feature>,
    project_id: Uuid,
) -> EditResult
where
    S: FeatureStore + ?Sized,
    D: DialogController + ?Sized,
{
    let mut form = FeatureEditDialog::new(feature, project_id);
    dialogs.show_edit(&form.view());

    loop {
        let step = match dialogs.next_edit_event().await {
            Some(event) => form.handle(event),
            None => form.dismiss(),
        };

        match step {
            Step::Continue => {}
            Step::Cancel => {
                dialogs.close_edit();
                return EditResult::Canceled;
            }
            Step::Save => {
                if let Some(name) = form.begin_save() {
                    dialogs.show_edit(&form.view());
                    if let Some(saved) = form.submit(store, name).await {
                        dialogs.close_edit();
                        return EditResult::Saved(saved);
                    }
                }
            }
        }

        dialogs.show_edit(&form.view());
    }
}
