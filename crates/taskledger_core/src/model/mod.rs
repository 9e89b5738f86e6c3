mod history;
mod task;

pub use history::{ChangeKind, HistoryRecord};
pub use task::{Priority, Task, TaskEdit, TaskId, TaskSnapshot};
