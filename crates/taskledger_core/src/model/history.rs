use crate::model::{Task, TaskEdit, TaskId, TaskSnapshot};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChangeKind {
    Add,
    Edit,
}

/// One immutable entry in the task history ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryRecord {
    pub task_id: TaskId,
    #[serde(rename = "type")]
    pub kind: ChangeKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_value: Option<TaskSnapshot>,
    pub new_value: TaskSnapshot,
    pub timestamp: String,
}

impl HistoryRecord {
    pub fn added(task: &Task, timestamp: String) -> Self {
        Self {
            task_id: task.id,
            kind: ChangeKind::Add,
            old_value: None,
            new_value: task.snapshot(),
            timestamp,
        }
    }

    pub fn edited(edit: &TaskEdit, timestamp: String) -> Self {
        Self {
            task_id: edit.task_id,
            kind: ChangeKind::Edit,
            old_value: Some(edit.before.clone()),
            new_value: edit.after.clone(),
            timestamp,
        }
    }

    pub fn describe(&self) -> String {
        match (self.kind, self.old_value.as_ref()) {
            (ChangeKind::Edit, Some(old)) => format!(
                "Changed from \"{}\" ({}) to \"{}\" ({})",
                old.text, old.priority, self.new_value.text, self.new_value.priority
            ),
            // An EDIT without its old value can only come from a hand-edited store.
            (ChangeKind::Edit, None) => format!(
                "Changed to \"{}\" ({})",
                self.new_value.text, self.new_value.priority
            ),
            (ChangeKind::Add, _) => format!(
                "Created with text \"{}\" and priority \"{}\"",
                self.new_value.text, self.new_value.priority
            ),
        }
    }
}
