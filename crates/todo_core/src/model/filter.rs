//! Task visibility filter.
//!
//! The filter is total over its three variants and stable: results keep the
//! relative order of the source sequence.

use crate::model::task::Task;

/// Which tasks the list screen shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FilterType {
    #[default]
    All,
    Active,
    Completed,
}

impl FilterType {
    pub fn matches(self, task: &Task) -> bool {
        match self {
            Self::All => true,
            Self::Active => task.is_active(),
            Self::Completed => task.is_completed(),
        }
    }

    /// Stable identifier used by hosts (menus, command line).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Active => "active",
            Self::Completed => "completed",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "all" => Some(Self::All),
            "active" => Some(Self::Active),
            "completed" => Some(Self::Completed),
            _ => None,
        }
    }
}

/// Returns the tasks visible under `filter`, in source order.
pub fn filter_tasks(filter: FilterType, tasks: &[Task]) -> Vec<Task> {
    tasks
        .iter()
        .filter(|task| filter.matches(task))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{filter_tasks, FilterType};
    use crate::model::task::Task;

    fn sample() -> Vec<Task> {
        vec![
            Task::with_id("1", "a", "").unwrap(),
            Task::with_id("2", "b", "").unwrap().with_completed(true),
            Task::with_id("3", "c", "").unwrap(),
            Task::with_id("4", "d", "").unwrap().with_completed(true),
        ]
    }

    fn ids(tasks: &[Task]) -> Vec<&str> {
        tasks.iter().map(Task::id).collect()
    }

    #[test]
    fn all_is_identity() {
        let tasks = sample();
        assert_eq!(filter_tasks(FilterType::All, &tasks), tasks);
    }

    #[test]
    fn active_and_completed_partition_in_order() {
        let tasks = sample();
        assert_eq!(ids(&filter_tasks(FilterType::Active, &tasks)), ["1", "3"]);
        assert_eq!(ids(&filter_tasks(FilterType::Completed, &tasks)), ["2", "4"]);
    }

    #[test]
    fn parse_round_trips_names() {
        for filter in [FilterType::All, FilterType::Active, FilterType::Completed] {
            assert_eq!(FilterType::parse(filter.as_str()), Some(filter));
        }
        assert_eq!(FilterType::parse(" Active "), Some(FilterType::Active));
        assert_eq!(FilterType::parse("done"), None);
    }
}
