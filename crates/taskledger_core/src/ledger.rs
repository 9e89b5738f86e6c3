use crate::model::{HistoryRecord, TaskId};
use crate::storage::{HISTORY_KEY, KeyValueStore, load_collection, save_collection};
use std::rc::Rc;

/// Append-only audit trail of task additions and edits.
///
/// Records are never rewritten or removed, and the ledger does not check
/// that a record's task still exists.
pub struct HistoryLedger {
    store: Rc<dyn KeyValueStore>,
    records: Vec<HistoryRecord>,
}

impl HistoryLedger {
    pub fn open(store: Rc<dyn KeyValueStore>) -> Self {
        let records = load_collection(store.as_ref(), HISTORY_KEY);
        Self { store, records }
    }

    pub fn record(&mut self, entry: HistoryRecord) {
        tracing::debug!(task_id = entry.task_id, kind = ?entry.kind, "history recorded");
        self.records.push(entry);
        save_collection(self.store.as_ref(), HISTORY_KEY, &self.records);
    }

    /// Records for one task, newest first.
    pub fn query_by_task(&self, task_id: TaskId) -> Vec<&HistoryRecord> {
        self.records
            .iter()
            .rev()
            .filter(|record| record.task_id == task_id)
            .collect()
    }

    pub fn records(&self) -> &[HistoryRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::HistoryLedger;
    use crate::model::{ChangeKind, HistoryRecord, Priority, Task, TaskEdit, TaskSnapshot};
    use crate::storage::{HISTORY_KEY, KeyValueStore, MemoryStore};
    use std::rc::Rc;

    fn task(id: u64, text: &str) -> Task {
        Task {
            id,
            text: text.to_string(),
            completed: false,
            priority: Priority::Low,
        }
    }

    fn edit(id: u64, from: &str, to: &str) -> TaskEdit {
        TaskEdit {
            task_id: id,
            before: TaskSnapshot {
                text: from.to_string(),
                priority: Priority::Low,
            },
            after: TaskSnapshot {
                text: to.to_string(),
                priority: Priority::Low,
            },
        }
    }

    #[test]
    fn record_appends_and_persists() {
        let store = Rc::new(MemoryStore::new());
        let mut ledger = HistoryLedger::open(store.clone());

        ledger.record(HistoryRecord::added(&task(1, "a"), "t1".to_string()));
        ledger.record(HistoryRecord::edited(&edit(1, "a", "b"), "t2".to_string()));

        assert_eq!(ledger.len(), 2);
        assert_eq!(store.write_count(), 2);

        let reopened = HistoryLedger::open(store.clone());
        assert_eq!(reopened.records(), ledger.records());
    }

    #[test]
    fn record_accepts_unknown_task_ids() {
        let store = Rc::new(MemoryStore::new());
        let mut ledger = HistoryLedger::open(store);

        ledger.record(HistoryRecord::added(&task(999, "ghost"), "t1".to_string()));
        assert_eq!(ledger.query_by_task(999).len(), 1);
    }

    #[test]
    fn query_by_task_is_newest_first_and_filtered() {
        let store = Rc::new(MemoryStore::new());
        let mut ledger = HistoryLedger::open(store);

        ledger.record(HistoryRecord::added(&task(1, "a"), "t1".to_string()));
        ledger.record(HistoryRecord::added(&task(2, "x"), "t2".to_string()));
        ledger.record(HistoryRecord::edited(&edit(1, "a", "b"), "t3".to_string()));
        ledger.record(HistoryRecord::edited(&edit(2, "x", "y"), "t4".to_string()));
        ledger.record(HistoryRecord::edited(&edit(1, "b", "c"), "t5".to_string()));

        let timestamps: Vec<&str> = ledger
            .query_by_task(1)
            .iter()
            .map(|record| record.timestamp.as_str())
            .collect();
        assert_eq!(timestamps, vec!["t5", "t3", "t1"]);
        assert_eq!(ledger.query_by_task(1)[2].kind, ChangeKind::Add);
        assert!(ledger.query_by_task(3).is_empty());
        assert_eq!(ledger.len(), 5);
    }

    #[test]
    fn open_with_corrupt_history_starts_empty() {
        let store = Rc::new(MemoryStore::new());
        store.write(HISTORY_KEY, "[{\"taskId\": }").unwrap();

        let ledger = HistoryLedger::open(store);
        assert!(ledger.is_empty());
    }
}
