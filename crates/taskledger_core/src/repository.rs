use crate::clock::Clock;
use crate::model::{Priority, Task, TaskEdit, TaskId, TaskSnapshot};
use crate::storage::{KeyValueStore, TASKS_KEY, load_collection, save_collection};
use std::collections::HashSet;
use std::rc::Rc;

/// Owns the current task collection and writes it back after every change.
///
/// Every operation is lenient: blank text and unknown ids turn the call into
/// a no-op that returns `None`, and nothing is written.
pub struct TaskRepository {
    store: Rc<dyn KeyValueStore>,
    tasks: Vec<Task>,
    last_id: TaskId,
}

impl TaskRepository {
    pub fn open(store: Rc<dyn KeyValueStore>) -> Self {
        let tasks: Vec<Task> = load_collection(store.as_ref(), TASKS_KEY);
        let last_id = tasks.iter().map(|task| task.id).max().unwrap_or(0);
        Self {
            store,
            tasks,
            last_id,
        }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn add(&mut self, text: &str, priority: Priority, clock: &dyn Clock) -> Option<Task> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            tracing::debug!("ignoring add with blank text");
            return None;
        }

        let id = self.next_id(clock);
        let task = Task {
            id,
            text: trimmed.to_string(),
            completed: false,
            priority,
        };

        self.tasks.push(task.clone());
        self.persist();
        tracing::debug!(id, %priority, "task added");

        Some(task)
    }

    pub fn toggle(&mut self, id: TaskId) -> Option<Task> {
        let task = self.tasks.iter_mut().find(|task| task.id == id)?;
        task.completed = !task.completed;
        let toggled = task.clone();

        self.persist();
        tracing::debug!(id, completed = toggled.completed, "task toggled");

        Some(toggled)
    }

    pub fn update(&mut self, id: TaskId, text: &str, priority: Priority) -> Option<TaskEdit> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            tracing::debug!(id, "ignoring update with blank text");
            return None;
        }

        let task = self.tasks.iter_mut().find(|task| task.id == id)?;
        if task.text == trimmed && task.priority == priority {
            return None;
        }

        let before = task.snapshot();
        task.text = trimmed.to_string();
        task.priority = priority;
        let after = TaskSnapshot {
            text: task.text.clone(),
            priority: task.priority,
        };

        self.persist();
        tracing::debug!(id, "task updated");

        Some(TaskEdit {
            task_id: id,
            before,
            after,
        })
    }

    pub fn delete(&mut self, id: TaskId) -> Option<Task> {
        let index = self.tasks.iter().position(|task| task.id == id)?;
        let removed = self.tasks.remove(index);

        self.persist();
        tracing::debug!(id, "task deleted");

        Some(removed)
    }

    fn next_id(&mut self, clock: &dyn Clock) -> TaskId {
        let candidate = clock.unix_millis();
        let id = if candidate > self.last_id {
            candidate
        } else if let Some(next) = self.last_id.checked_add(1) {
            next
        } else {
            self.lowest_free_id()
        };
        self.last_id = self.last_id.max(id);
        id
    }

    /// Used only once the id space above the largest stored id is exhausted.
    fn lowest_free_id(&self) -> TaskId {
        let used: HashSet<TaskId> = self.tasks.iter().map(|task| task.id).collect();
        let free = (1..)
            .find(|id: &TaskId| !used.contains(id))
            .unwrap_or_default();
        tracing::warn!(id = free, "task id space exhausted, reusing lowest free id");
        free
    }

    fn persist(&self) {
        save_collection(self.store.as_ref(), TASKS_KEY, &self.tasks);
    }
}
