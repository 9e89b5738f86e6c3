use crate::clock::{Clock, SystemClock};
use crate::error::AppError;
use crate::ledger::HistoryLedger;
use crate::model::{HistoryRecord, Priority, Task, TaskEdit, TaskId};
use crate::repository::TaskRepository;
use crate::storage::{FileStore, KeyValueStore};
use crate::view::{self, Filter, Statistics};
use std::rc::Rc;

/// The task list together with its history.
///
/// Additions and edits are recorded in the ledger as part of the same call,
/// so callers cannot forget the history step. Toggles and deletions leave no
/// history.
pub struct TaskBook {
    tasks: TaskRepository,
    history: HistoryLedger,
    clock: Box<dyn Clock>,
}

impl TaskBook {
    pub fn open(store: Rc<dyn KeyValueStore>) -> Self {
        Self::open_with_clock(store, Box::new(SystemClock))
    }

    pub fn open_with_clock(store: Rc<dyn KeyValueStore>, clock: Box<dyn Clock>) -> Self {
        let tasks = TaskRepository::open(store.clone());
        let history = HistoryLedger::open(store);
        tracing::debug!(
            tasks = tasks.len(),
            history = history.len(),
            "task book opened"
        );
        Self {
            tasks,
            history,
            clock,
        }
    }

    /// Opens the file store in the per-user directory (or `TASKLEDGER_STORE_DIR`).
    pub fn open_default() -> Result<Self, AppError> {
        let store = FileStore::from_env()?;
        Ok(Self::open(Rc::new(store)))
    }

    pub fn add_task(&mut self, text: &str, priority: Priority) -> Option<Task> {
        let task = self.tasks.add(text, priority, self.clock.as_ref())?;
        self.history
            .record(HistoryRecord::added(&task, self.clock.timestamp()));
        Some(task)
    }

    pub fn edit_task(&mut self, id: TaskId, text: &str, priority: Priority) -> Option<TaskEdit> {
        let edit = self.tasks.update(id, text, priority)?;
        self.history
            .record(HistoryRecord::edited(&edit, self.clock.timestamp()));
        Some(edit)
    }

    pub fn toggle_task(&mut self, id: TaskId) -> Option<Task> {
        self.tasks.toggle(id)
    }

    pub fn delete_task(&mut self, id: TaskId) -> Option<Task> {
        self.tasks.delete(id)
    }

    pub fn task(&self, id: TaskId) -> Option<&Task> {
        self.tasks.get(id)
    }

    pub fn tasks(&self) -> &[Task] {
        self.tasks.tasks()
    }

    pub fn ledger(&self) -> &[HistoryRecord] {
        self.history.records()
    }

    pub fn view(&self, filter: Filter, search_term: &str) -> Vec<Task> {
        view::project(self.tasks.tasks(), filter, search_term)
    }

    pub fn history(&self, id: TaskId) -> Vec<&HistoryRecord> {
        self.history.query_by_task(id)
    }

    pub fn statistics(&self) -> Statistics {
        Statistics::of(self.tasks.tasks())
    }
}
