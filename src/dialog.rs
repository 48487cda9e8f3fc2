//! Dialog hosting for the feature workflows.
//!
//! Workflows never look dialogs up globally. The caller injects a
//! [`DialogController`], which renders the edit form, feeds user input back as
//! [`DialogEvent`]s and answers confirmation prompts.

use async_trait::async_trait;

pub const CREATE_TITLE: &str = "Create Feature";
pub const EDIT_TITLE: &str = "Edit Feature";
pub const NAME_LABEL: &str = "Feature Name";
pub const NAME_PLACEHOLDER: &str = "e.g., User Authentication";
pub const CREATE_LABEL: &str = "Create";
pub const UPDATE_LABEL: &str = "Update";
pub const CANCEL_LABEL: &str = "Cancel";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Enter,
    Escape,
    Char(char),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyPress {
    pub key: Key,
    pub shift: bool,
}

impl KeyPress {
    pub fn new(key: Key) -> Self {
        Self { key, shift: false }
    }

    pub fn with_shift(key: Key) -> Self {
        Self { key, shift: true }
    }

    /// Plain Enter submits the form; Shift+Enter does not.
    pub fn is_submit(&self) -> bool {
        self.key == Key::Enter && !self.shift
    }
}

/// User input delivered to the edit dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogEvent {
    /// The name field now holds this text.
    NameChanged(String),
    KeyPressed(KeyPress),
    SaveClicked,
    CancelClicked,
    /// Closed from outside the form (outside click, escape, window close).
    Dismissed,
}

/// Everything a host needs to draw the edit dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditDialogView {
    pub title: &'static str,
    pub name_label: &'static str,
    pub placeholder: &'static str,
    pub name: String,
    /// Inline validation or save error.
    pub error: Option<String>,
    pub saving: bool,
    pub input_enabled: bool,
    pub cancel_enabled: bool,
    pub save_enabled: bool,
    pub save_label: &'static str,
    pub cancel_label: &'static str,
}

/// The injected dialog host.
#[async_trait]
pub trait DialogController: Send {
    /// Show or redraw the edit dialog.
    fn show_edit(&mut self, view: &EditDialogView);

    /// Wait for the next input on the edit dialog. `None` means the host went
    /// away, which the workflow treats as a dismissal.
    async fn next_edit_event(&mut self) -> Option<DialogEvent>;

    fn close_edit(&mut self);

    /// Ask a yes/no question. Returns `true` only on explicit confirmation.
    async fn confirm(&mut self, message: &str) -> bool;
}
