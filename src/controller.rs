use chrono::Utc;
use std::collections::HashSet;

use crate::error::Result;
use crate::store::{Store, TASKS_KEY};
use crate::task::{Task, TaskId, TaskStatus};

/// Source of creation timestamps, in milliseconds.
pub trait Clock {
    fn now_millis(&self) -> i64;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}

impl<F: Fn() -> i64> Clock for F {
    fn now_millis(&self) -> i64 {
        self()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftField {
    Name,
    Description,
    Status,
}

/// Form values that have not been submitted yet.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Draft {
    pub name: String,
    pub description: String,
    pub status: TaskStatus,
}

impl Draft {
    fn is_complete(&self) -> bool {
        !self.name.is_empty() && !self.description.is_empty()
    }

    pub fn field(&self, field: DraftField) -> &str {
        match field {
            DraftField::Name => &self.name,
            DraftField::Description => &self.description,
            DraftField::Status => self.status.as_str(),
        }
    }
}

/// There is deliberately no transition from `Editing` back to `Idle`
/// other than a successful submit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditMode {
    #[default]
    Idle,
    Editing(TaskId),
}

/// Owns the task list and mirrors it into the store after every mutation.
#[derive(Debug)]
pub struct TaskListController<S: Store, C: Clock = SystemClock> {
    tasks: Vec<Task>,
    draft: Draft,
    mode: EditMode,
    store: S,
    clock: C,
}

impl<S: Store> TaskListController<S, SystemClock> {
    pub fn new(store: S) -> Self {
        Self::with_clock(store, SystemClock)
    }
}

impl<S: Store, C: Clock> TaskListController<S, C> {
    /// Loads the stored list. Absent or unparsable data yields an empty list.
    pub fn with_clock(store: S, clock: C) -> Self {
        let tasks = match store.get(TASKS_KEY) {
            Some(data) => serde_json::from_str(&data).unwrap_or_else(|err| {
                tracing::warn!(%err, "stored task list is malformed, starting empty");
                Vec::new()
            }),
            None => Vec::new(),
        };
        tracing::debug!(count = tasks.len(), "task list loaded");

        Self {
            tasks,
            draft: Draft::default(),
            mode: EditMode::Idle,
            store,
            clock,
        }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    pub fn mode(&self) -> EditMode {
        self.mode
    }

    pub fn is_editing(&self) -> bool {
        matches!(self.mode, EditMode::Editing(_))
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn find(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Text fields take any value. The status field only accepts
    /// `pending` or `done`; anything else leaves it untouched.
    pub fn update_draft_field(&mut self, field: DraftField, value: &str) {
        match field {
            DraftField::Name => self.draft.name = value.to_string(),
            DraftField::Description => self.draft.description = value.to_string(),
            DraftField::Status => match value {
                "pending" => self.draft.status = TaskStatus::Pending,
                "done" => self.draft.status = TaskStatus::Done,
                other => tracing::debug!(value = other, "ignoring unknown status"),
            },
        }
    }

    /// Returns `false` without touching anything if name or description is empty.
    pub fn submit(&mut self) -> bool {
        if !self.draft.is_complete() {
            return false;
        }
        let draft = std::mem::take(&mut self.draft);

        match self.mode {
            EditMode::Editing(id) => {
                if let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) {
                    task.name = draft.name;
                    task.description = draft.description;
                    task.status = draft.status;
                }
                self.mode = EditMode::Idle;
                tracing::debug!(id, "task updated");
            }
            EditMode::Idle => {
                let id = self.next_id();
                self.tasks.push(Task {
                    id,
                    name: draft.name,
                    description: draft.description,
                    status: draft.status,
                });
                tracing::debug!(id, "task created");
            }
        }

        self.persist();
        true
    }

    pub fn delete_task(&mut self, id: TaskId) {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        if self.tasks.len() != before {
            tracing::debug!(id, "task deleted");
        }
        self.persist();
    }

    pub fn toggle_status(&mut self, id: TaskId) {
        if let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) {
            task.status = task.status.toggled();
            tracing::debug!(id, status = %task.status, "task toggled");
        }
        self.persist();
    }

    pub fn begin_edit(&mut self, id: TaskId) {
        let Some(task) = self.find(id) else {
            return;
        };
        self.draft = Draft {
            name: task.name.clone(),
            description: task.description.clone(),
            status: task.status,
        };
        self.mode = EditMode::Editing(id);
        tracing::debug!(id, "editing task");
    }

    /// Creation timestamp, bumped past the newest id on a same-tick collision.
    /// When the newest id is `TaskId::MAX`, takes the closest free id below it.
    fn next_id(&self) -> TaskId {
        let now = self.clock.now_millis();
        let Some(max) = self.tasks.iter().map(|t| t.id).max() else {
            return now;
        };
        if now > max {
            return now;
        }
        if let Some(next) = max.checked_add(1) {
            return next;
        }
        let taken: HashSet<TaskId> = self.tasks.iter().map(|t| t.id).collect();
        (TaskId::MIN..max)
            .rev()
            .find(|id| !taken.contains(id))
            .unwrap_or(TaskId::MIN)
    }

    fn write_through(&mut self) -> Result<()> {
        let data = serde_json::to_string(&self.tasks)?;
        self.store.set(TASKS_KEY, &data)
    }

    fn persist(&mut self) {
        if let Err(err) = self.write_through() {
            tracing::warn!(%err, "failed to persist task list");
        }
    }
}
