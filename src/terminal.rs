//! Line-oriented terminal front end for the feature manager.
//!
//! [`TerminalDialogs`] implements [`DialogController`] over any async line
//! reader and writer. Each line typed into the edit prompt becomes a name
//! change followed by Enter; `/cancel` cancels, end of input dismisses.

use std::collections::VecDeque;
use std::io::Write;

use async_trait::async_trait;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::dialog::{DialogController, DialogEvent, EditDialogView, Key, KeyPress};
use crate::manager::FeatureManager;
use crate::store::FeatureStore;

const CANCEL_COMMAND: &str = "/cancel";

pub struct TerminalDialogs<R, W> {
    input: R,
    output: W,
    pending: VecDeque<DialogEvent>,
    view: Option<EditDialogView>,
}

impl<R, W> TerminalDialogs<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: Write + Send,
{
    pub fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            pending: VecDeque::new(),
            view: None,
        }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Print `prompt` and read one line. `None` at end of input.
    pub async fn prompt(&mut self, prompt: &str) -> Option<String> {
        let _ = write!(self.output, "{}", prompt);
        let _ = self.output.flush();
        self.read_line().await
    }

    pub fn print(&mut self, text: &str) {
        let _ = write!(self.output, "{}", text);
        let _ = self.output.flush();
    }

    async fn read_line(&mut self) -> Option<String> {
        let mut line = String::new();
        match self.input.read_line(&mut line).await {
            Ok(0) => None,
            Ok(_) => Some(line.trim_end_matches(&['\r', '\n'][..]).to_string()),
            Err(e) => {
                tracing::error!("Failed to read input: {}", e);
                None
            }
        }
    }

    fn draw_form(&mut self) {
        let Some(view) = self.view.as_ref() else {
            return;
        };
        let current = if view.name.is_empty() {
            format!("({})", view.placeholder)
        } else {
            view.name.clone()
        };
        let mut text = format!("\n{}\n{} *: {}\n", view.title, view.name_label, current);
        if let Some(error) = &view.error {
            text.push_str(&format!("! {}\n", error));
        }
        text.push_str(&format!(
            "[{}] new name, or Enter to keep; {} to {}\n> ",
            view.save_label,
            CANCEL_COMMAND,
            view.cancel_label.to_lowercase()
        ));
        self.print(&text);
    }
}

#[async_trait]
impl<R, W> DialogController for TerminalDialogs<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: Write + Send,
{
    fn show_edit(&mut self, view: &EditDialogView) {
        if view.saving {
            self.print("Saving...\n");
        }
        self.view = Some(view.clone());
    }

    async fn next_edit_event(&mut self) -> Option<DialogEvent> {
        if let Some(event) = self.pending.pop_front() {
            return Some(event);
        }

        self.draw_form();
        let line = self.read_line().await?;
        let enter = DialogEvent::KeyPressed(KeyPress::new(Key::Enter));

        if line.trim() == CANCEL_COMMAND {
            return Some(DialogEvent::CancelClicked);
        }
        if line.is_empty() {
            return Some(enter);
        }
        self.pending.push_back(enter);
        Some(DialogEvent::NameChanged(line))
    }

    fn close_edit(&mut self) {
        self.pending.clear();
        self.view = None;
    }

    async fn confirm(&mut self, message: &str) -> bool {
        let answer = self.prompt(&format!("{} [y/N] ", message)).await;
        matches!(
            answer.as_deref().map(|a| a.trim().to_ascii_lowercase()).as_deref(),
            Some("y" | "yes")
        )
    }
}

/// A command typed at the manager prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManagerCommand {
    Add,
    /// 1-based row number.
    Edit(usize),
    /// 1-based row number.
    Delete(usize),
    Refresh,
    Quit,
}

pub fn parse_command(line: &str) -> Option<ManagerCommand> {
    let mut parts = line.split_whitespace();
    let command = parts.next()?;
    let row = parts.next().and_then(|r| r.parse::<usize>().ok());
    if parts.next().is_some() {
        return None;
    }

    match (command, row) {
        ("a" | "add", None) => Some(ManagerCommand::Add),
        ("e" | "edit", Some(n)) if n > 0 => Some(ManagerCommand::Edit(n)),
        ("d" | "delete", Some(n)) if n > 0 => Some(ManagerCommand::Delete(n)),
        ("r" | "refresh", None) => Some(ManagerCommand::Refresh),
        ("q" | "quit", None) => Some(ManagerCommand::Quit),
        _ => None,
    }
}

const HELP: &str = "a = add, e <n> = edit, d <n> = delete, r = refresh, q = quit\n";

/// Interactive manager loop. Returns at `q` or end of input.
pub async fn run_manager<S, R, W>(
    manager: &mut FeatureManager<S>,
    dialogs: &mut TerminalDialogs<R, W>,
) where
    S: FeatureStore,
    R: AsyncBufRead + Unpin + Send,
    W: Write + Send,
{
    loop {
        dialogs.print(&format!("\n{}{}", manager.render(), HELP));
        let Some(line) = dialogs.prompt("> ").await else {
            return;
        };

        let Some(command) = parse_command(&line) else {
            if !line.trim().is_empty() {
                dialogs.print(&format!("Unknown command: {}\n", line.trim()));
            }
            continue;
        };

        match command {
            ManagerCommand::Add => {
                manager.open_create_or_edit(dialogs, None).await;
            }
            ManagerCommand::Edit(n) | ManagerCommand::Delete(n) => {
                let Some(feature) = manager.features().get(n - 1).cloned() else {
                    dialogs.print(&format!("No feature in row {}\n", n));
                    continue;
                };
                if matches!(command, ManagerCommand::Edit(_)) {
                    manager.open_create_or_edit(dialogs, Some(&feature)).await;
                } else {
                    manager.delete(dialogs, &feature).await;
                }
            }
            ManagerCommand::Refresh => manager.refresh().await,
            ManagerCommand::Quit => return,
        }
    }
}
