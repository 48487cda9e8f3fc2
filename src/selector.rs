//! Dropdown for attaching a feature to something else (usually a task).
//!
//! The selector is a controlled widget: the feature list and the current
//! selection belong to the caller, and every choice is reported through
//! callbacks. It never fetches features itself.

use uuid::Uuid;

use crate::dialog::DialogController;
use crate::models::Feature;
use crate::store::FeatureStore;
use crate::workflow::{self, EditResult};

pub const LABEL: &str = "Feature";
pub const PLACEHOLDER: &str = "No Feature";
pub const CLEAR_ENTRY: &str = "Clear Selection";
pub const EMPTY_ENTRY: &str = "No features yet";
pub const CREATE_ENTRY: &str = "Create New Feature";
pub const TRIGGER_ARIA_LABEL: &str = "Select feature";

/// One line of the open dropdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectorEntry {
    Clear,
    Separator,
    Feature {
        id: Uuid,
        name: String,
        selected: bool,
    },
    /// Shown in place of feature entries when the list is empty.
    Empty,
    CreateNew,
}

impl SelectorEntry {
    pub fn text(&self) -> &str {
        match self {
            Self::Clear => CLEAR_ENTRY,
            Self::Separator => "",
            Self::Feature { name, .. } => name,
            Self::Empty => EMPTY_ENTRY,
            Self::CreateNew => CREATE_ENTRY,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FeatureSelector<'a> {
    pub features: &'a [Feature],
    pub selected_feature_id: Option<Uuid>,
    pub project_id: Uuid,
    pub disabled: bool,
    pub show_label: bool,
}

impl<'a> FeatureSelector<'a> {
    pub fn new(features: &'a [Feature], selected_feature_id: Option<Uuid>, project_id: Uuid) -> Self {
        Self {
            features,
            selected_feature_id,
            project_id,
            disabled: false,
            show_label: true,
        }
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    pub fn show_label(mut self, show_label: bool) -> Self {
        self.show_label = show_label;
        self
    }

    /// Label above the trigger, if shown.
    pub fn label(&self) -> Option<&'static str> {
        self.show_label.then_some(LABEL)
    }

    pub fn selected_feature(&self) -> Option<&'a Feature> {
        let id = self.selected_feature_id?;
        self.features.iter().find(|f| f.id == id)
    }

    /// Text on the trigger button.
    pub fn display_label(&self) -> &'a str {
        self.selected_feature()
            .map(|f| f.name.as_str())
            .unwrap_or(PLACEHOLDER)
    }

    /// Dropdown contents, regardless of the disabled state.
    pub fn entries(&self) -> Vec<SelectorEntry> {
        let mut entries = Vec::with_capacity(self.features.len() + 4);

        if self.selected_feature_id.is_some() {
            entries.push(SelectorEntry::Clear);
            entries.push(SelectorEntry::Separator);
        }

        if self.features.is_empty() {
            entries.push(SelectorEntry::Empty);
        } else {
            entries.extend(self.features.iter().map(|f| SelectorEntry::Feature {
                id: f.id,
                name: f.name.clone(),
                selected: self.selected_feature_id == Some(f.id),
            }));
        }

        entries.push(SelectorEntry::Separator);
        entries.push(SelectorEntry::CreateNew);
        entries
    }

    /// Open the dropdown. A disabled trigger is inert and yields nothing.
    pub fn open(&self) -> Option<Vec<SelectorEntry>> {
        (!self.disabled).then(|| self.entries())
    }

    /// Report a plain choice. Returns `true` when `on_select` was called.
    ///
    /// [`SelectorEntry::CreateNew`] needs the edit workflow; use
    /// [`create_new`](Self::create_new) for it.
    pub fn choose(&self, entry: &SelectorEntry, on_select: impl FnOnce(Option<Uuid>)) -> bool {
        if self.disabled {
            return false;
        }
        match entry {
            SelectorEntry::Feature { id, .. } => {
                on_select(Some(*id));
                true
            }
            SelectorEntry::Clear => {
                on_select(None);
                true
            }
            SelectorEntry::Separator | SelectorEntry::Empty | SelectorEntry::CreateNew => false,
        }
    }

    /// Create a feature inline and select it.
    ///
    /// On save, `on_select` receives the new id first, then
    /// `on_features_change` (if given) lets the owner refetch its list.
    pub async fn create_new<S, D>(
        &self,
        store: &S,
        dialogs: &mut D,
        on_select: impl FnOnce(Option<Uuid>),
        on_features_change: Option<impl FnOnce()>,
    ) -> EditResult
    where
        S: FeatureStore + ?Sized,
        D: DialogController + ?Sized,
    {
        if self.disabled {
            return EditResult::Canceled;
        }

        let result = workflow::open(store, dialogs, None, self.project_id).await;
        if let EditResult::Saved(ref feature) = result {
            on_select(Some(feature.id));
            if let Some(notify) = on_features_change {
                notify();
            }
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn feature(name: &str) -> Feature {
        Feature {
            id: Uuid::new_v4(),
            project_id: Uuid::nil(),
            name: name.to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn shows_placeholder_without_selection() {
        let features = vec![feature("Auth")];
        let selector = FeatureSelector::new(&features, None, Uuid::nil());

        assert_eq!(selector.display_label(), "No Feature");
        assert!(!selector.entries().contains(&SelectorEntry::Clear));
    }

    #[test]
    fn unknown_selection_falls_back_to_placeholder() {
        let features = vec![feature("Auth")];
        let selector = FeatureSelector::new(&features, Some(Uuid::new_v4()), Uuid::nil());

        assert_eq!(selector.display_label(), PLACEHOLDER);
    }

    #[test]
    fn selected_entry_is_marked() {
        let features = vec![feature("Auth"), feature("Billing")];
        let selector = FeatureSelector::new(&features, Some(features[1].id), Uuid::nil());

        let selected: Vec<_> = selector
            .entries()
            .into_iter()
            .filter_map(|e| match e {
                SelectorEntry::Feature { name, selected: true, .. } => Some(name),
                _ => None,
            })
            .collect();
        assert_eq!(selected, vec!["Billing".to_string()]);
    }

    #[test]
    fn empty_list_shows_empty_entry_and_create() {
        let selector = FeatureSelector::new(&[], None, Uuid::nil());

        assert_eq!(
            selector.entries(),
            vec![
                SelectorEntry::Empty,
                SelectorEntry::Separator,
                SelectorEntry::CreateNew
            ]
        );
    }

    #[test]
    fn choosing_a_feature_reports_its_id() {
        let features = vec![feature("Auth")];
        let selector = FeatureSelector::new(&features, None, Uuid::nil());
        let mut chosen = None;

        let entry = SelectorEntry::Feature {
            id: features[0].id,
            name: "Auth".to_string(),
            selected: false,
        };
        assert!(selector.choose(&entry, |id| chosen = Some(id)));
        assert_eq!(chosen, Some(Some(features[0].id)));
    }

    #[test]
    fn separators_do_nothing() {
        let selector = FeatureSelector::new(&[], None, Uuid::nil());
        assert!(!selector.choose(&SelectorEntry::Separator, |_| panic!("unexpected select")));
        assert!(!selector.choose(&SelectorEntry::CreateNew, |_| panic!("unexpected select")));
    }

    #[test]
    fn disabled_trigger_is_inert() {
        let features = vec![feature("Auth")];
        let selector = FeatureSelector::new(&features, Some(features[0].id), Uuid::nil())
            .disabled(true);

        assert!(selector.open().is_none());
        assert!(!selector.choose(&SelectorEntry::Clear, |_| panic!("unexpected select")));
        assert_eq!(selector.display_label(), "Auth");
    }

    #[test]
    fn label_can_be_hidden() {
        let selector = FeatureSelector::new(&[], None, Uuid::nil());
        assert_eq!(selector.label(), Some("Feature"));
        assert_eq!(selector.show_label(false).label(), None);
    }
}
