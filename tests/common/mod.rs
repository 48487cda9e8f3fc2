//! Shared fakes for the component specs.
#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use feature_tags::db::Database;
use feature_tags::dialog::{DialogController, DialogEvent, EditDialogView, Key, KeyPress};
use feature_tags::models::*;
use feature_tags::store::{FeatureStore, LocalStore, StoreError, StoreResult};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    List,
    Create,
    Update,
    Delete,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    List(Uuid),
    Create(CreateFeature),
    Update(Uuid, UpdateFeature),
    Delete(Uuid),
}

impl Call {
    pub fn op(&self) -> Op {
        match self {
            Call::List(_) => Op::List,
            Call::Create(_) => Op::Create,
            Call::Update(..) => Op::Update,
            Call::Delete(_) => Op::Delete,
        }
    }
}

/// Database-backed store that records every call and can fail on demand.
pub struct RecordingStore {
    inner: LocalStore,
    calls: Mutex<Vec<Call>>,
    failures: Mutex<Vec<(Op, StoreError)>>,
}

impl RecordingStore {
    pub fn new(db: Database) -> Self {
        Self {
            inner: LocalStore::new(db),
            calls: Mutex::new(Vec::new()),
            failures: Mutex::new(Vec::new()),
        }
    }

    /// Make the next call of kind `op` fail with `err`.
    pub fn fail_next(&self, op: Op, err: StoreError) {
        self.failures.lock().unwrap().push((op, err));
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_of(&self, op: Op) -> Vec<Call> {
        self.calls().into_iter().filter(|c| c.op() == op).collect()
    }

    pub fn mutations(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| c.op() != Op::List)
            .collect()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    fn record(&self, call: Call) -> StoreResult<()> {
        let op = call.op();
        self.calls.lock().unwrap().push(call);
        let mut failures = self.failures.lock().unwrap();
        match failures.iter().position(|(o, _)| *o == op) {
            Some(i) => Err(failures.remove(i).1),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl FeatureStore for RecordingStore {
    async fn list(&self, project_id: Uuid) -> StoreResult<Vec<Feature>> {
        self.record(Call::List(project_id))?;
        self.inner.list(project_id).await
    }

    async fn create(&self, input: &CreateFeature) -> StoreResult<Feature> {
        self.record(Call::Create(input.clone()))?;
        self.inner.create(input).await
    }

    async fn update(&self, id: Uuid, input: &UpdateFeature) -> StoreResult<Feature> {
        self.record(Call::Update(id, input.clone()))?;
        self.inner.update(id, input).await
    }

    async fn delete(&self, id: Uuid) -> StoreResult<()> {
        self.record(Call::Delete(id))?;
        self.inner.delete(id).await
    }
}

/// Dialog host that replays scripted input and records what was shown.
#[derive(Default)]
pub struct ScriptedDialogs {
    events: VecDeque<DialogEvent>,
    confirms: VecDeque<bool>,
    pub shown: Vec<EditDialogView>,
    pub closed: usize,
    pub confirm_messages: Vec<String>,
}

impl ScriptedDialogs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn event(mut self, event: DialogEvent) -> Self {
        self.events.push_back(event);
        self
    }

    /// Type `name` into the field.
    pub fn typed(self, name: &str) -> Self {
        self.event(DialogEvent::NameChanged(name.to_string()))
    }

    pub fn enter(self) -> Self {
        self.event(DialogEvent::KeyPressed(KeyPress::new(Key::Enter)))
    }

    pub fn save(self) -> Self {
        self.event(DialogEvent::SaveClicked)
    }

    pub fn cancel(self) -> Self {
        self.event(DialogEvent::CancelClicked)
    }

    pub fn confirm_with(mut self, answer: bool) -> Self {
        self.confirms.push_back(answer);
        self
    }

    pub fn remaining_events(&self) -> usize {
        self.events.len()
    }

    pub fn errors_shown(&self) -> Vec<String> {
        self.shown.iter().filter_map(|v| v.error.clone()).collect()
    }
}

#[async_trait]
impl DialogController for ScriptedDialogs {
    fn show_edit(&mut self, view: &EditDialogView) {
        self.shown.push(view.clone());
    }

    async fn next_edit_event(&mut self) -> Option<DialogEvent> {
        self.events.pop_front()
    }

    fn close_edit(&mut self) {
        self.closed += 1;
    }

    async fn confirm(&mut self, message: &str) -> bool {
        self.confirm_messages.push(message.to_string());
        self.confirms.pop_front().unwrap_or(false)
    }
}

pub fn setup() -> (Arc<RecordingStore>, Database, Project) {
    let db = Database::open_memory().expect("Failed to create database");
    db.migrate().expect("Failed to migrate");
    let project = db
        .create_project(CreateProject {
            name: "Test Project".to_string(),
        })
        .expect("Failed to create project");
    (Arc::new(RecordingStore::new(db.clone())), db, project)
}

pub fn create_feature(db: &Database, project_id: Uuid, name: &str) -> Feature {
    db.create_feature(CreateFeature {
        project_id,
        name: name.to_string(),
    })
    .expect("Failed to create feature")
}
