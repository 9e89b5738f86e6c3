use crate::model::Task;
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Filter {
    #[default]
    All,
    Active,
    Completed,
}

impl Filter {
    /// Anything other than `all` or `completed` selects active tasks.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "all" => Self::All,
            "completed" => Self::Completed,
            _ => Self::Active,
        }
    }

    fn admits(self, task: &Task) -> bool {
        match self {
            Self::All => true,
            Self::Completed => task.completed,
            Self::Active => !task.completed,
        }
    }
}

/// Tasks visible for the given filter and search term.
///
/// A non-empty search term takes precedence: the filter is ignored and every
/// task whose text contains the term (case-insensitively) is returned.
pub fn project(tasks: &[Task], filter: Filter, search_term: &str) -> Vec<Task> {
    if !search_term.is_empty() {
        let needle = search_term.to_lowercase();
        return tasks
            .iter()
            .filter(|task| task.text.to_lowercase().contains(&needle))
            .cloned()
            .collect();
    }

    tasks
        .iter()
        .filter(|task| filter.admits(task))
        .cloned()
        .collect()
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Statistics {
    pub total: usize,
    pub completed: usize,
    pub active: usize,
}

impl Statistics {
    pub fn of(tasks: &[Task]) -> Self {
        let completed = tasks.iter().filter(|task| task.completed).count();
        Self {
            total: tasks.len(),
            completed,
            active: tasks.len() - completed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Filter, Statistics, project};
    use crate::model::{Priority, Task};

    fn task(id: u64, text: &str, completed: bool) -> Task {
        Task {
            id,
            text: text.to_string(),
            completed,
            priority: Priority::Low,
        }
    }

    fn sample() -> Vec<Task> {
        vec![
            task(1, "Walk the Dog", false),
            task(2, "Buy milk", true),
            task(3, "dog food", true),
            task(4, "Call mom", false),
        ]
    }

    fn ids(tasks: &[Task]) -> Vec<u64> {
        tasks.iter().map(|task| task.id).collect()
    }

    #[test]
    fn filters_without_search() {
        let tasks = sample();
        assert_eq!(ids(&project(&tasks, Filter::All, "")), vec![1, 2, 3, 4]);
        assert_eq!(ids(&project(&tasks, Filter::Completed, "")), vec![2, 3]);
        assert_eq!(ids(&project(&tasks, Filter::Active, "")), vec![1, 4]);
    }

    #[test]
    fn search_ignores_filter_and_case() {
        let tasks = sample();
        assert_eq!(ids(&project(&tasks, Filter::All, "dog")), vec![1, 3]);
        assert_eq!(ids(&project(&tasks, Filter::Active, "DOG")), vec![1, 3]);
        assert_eq!(ids(&project(&tasks, Filter::Completed, "walk")), vec![1]);
        assert!(project(&tasks, Filter::All, "cat").is_empty());
    }

    #[test]
    fn projection_leaves_input_untouched() {
        let tasks = sample();
        let before = tasks.clone();
        let _ = project(&tasks, Filter::Completed, "");
        assert_eq!(tasks, before);
    }

    #[test]
    fn parse_treats_unknown_as_active() {
        assert_eq!(Filter::parse("all"), Filter::All);
        assert_eq!(Filter::parse(" Completed "), Filter::Completed);
        assert_eq!(Filter::parse("active"), Filter::Active);
        assert_eq!(Filter::parse("whatever"), Filter::Active);
        assert_eq!(Filter::parse(""), Filter::Active);
    }

    #[test]
    fn statistics_count_by_completion() {
        let stats = Statistics::of(&sample());
        assert_eq!(
            stats,
            Statistics {
                total: 4,
                completed: 2,
                active: 2,
            }
        );
        assert_eq!(Statistics::of(&[]), Statistics::default());
    }
}
