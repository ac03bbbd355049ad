//! In-memory task source.
//!
//! Stands in for the remote service: keeps tasks in insertion order and can
//! be switched to an unavailable state to exercise fallback paths.

use super::{DataNotAvailable, GetTaskCallback, LoadTasksCallback, TasksDataSource};
use crate::model::task::Task;
use log::debug;
use std::cell::{Cell, RefCell};

#[derive(Debug, Default)]
pub struct InMemoryTasksDataSource {
    tasks: RefCell<Vec<Task>>,
    unavailable: Cell<bool>,
}

impl InMemoryTasksDataSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tasks(tasks: impl IntoIterator<Item = Task>) -> Self {
        let source = Self::new();
        for task in tasks {
            source.upsert(task);
        }
        source
    }

    /// While unavailable, every read reports `DataNotAvailable`.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.set(unavailable);
    }

    pub fn snapshot(&self) -> Vec<Task> {
        self.tasks.borrow().clone()
    }

    fn upsert(&self, task: Task) {
        let mut tasks = self.tasks.borrow_mut();
        match tasks.iter_mut().find(|existing| existing.id() == task.id()) {
            Some(existing) => *existing = task,
            None => tasks.push(task),
        }
    }

    fn set_completed(&self, task_id: &str, completed: bool) {
        if let Some(task) = self
            .tasks
            .borrow_mut()
            .iter_mut()
            .find(|task| task.id() == task_id)
        {
            task.completed = completed;
        }
    }
}

impl TasksDataSource for InMemoryTasksDataSource {
    fn get_tasks(&self, mut callback: LoadTasksCallback) {
        if self.unavailable.get() {
            debug!("event=get_tasks module=source.memory status=unavailable");
            callback(Err(DataNotAvailable));
            return;
        }
        let tasks = self.snapshot();
        debug!(
            "event=get_tasks module=source.memory status=ok count={}",
            tasks.len()
        );
        callback(Ok(tasks));
    }

    fn get_task(&self, task_id: &str, mut callback: GetTaskCallback) {
        let found = if self.unavailable.get() {
            None
        } else {
            self.tasks
                .borrow()
                .iter()
                .find(|task| task.id() == task_id)
                .cloned()
        };
        callback(found.ok_or(DataNotAvailable));
    }

    fn save_task(&self, task: &Task) {
        self.upsert(task.clone());
    }

    fn complete_task(&self, task: &Task) {
        self.set_completed(task.id(), true);
    }

    fn activate_task(&self, task: &Task) {
        self.set_completed(task.id(), false);
    }

    fn delete_task(&self, task_id: &str) {
        self.tasks.borrow_mut().retain(|task| task.id() != task_id);
    }

    fn delete_all_tasks(&self) {
        self.tasks.borrow_mut().clear();
    }

    fn clear_completed_tasks(&self) {
        self.tasks.borrow_mut().retain(Task::is_active);
    }

    fn refresh_tasks(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    fn collect_tasks(source: &InMemoryTasksDataSource) -> Option<Vec<Task>> {
        let out = Rc::new(RefCell::new(None));
        let sink = Rc::clone(&out);
        source.get_tasks(Box::new(move |result| {
            *sink.borrow_mut() = result.ok();
        }));
        let result = out.borrow_mut().take();
        result
    }

    #[test]
    fn save_upserts_by_id_and_keeps_position() {
        let source = InMemoryTasksDataSource::new();
        let first = Task::new("a", "");
        let second = Task::new("b", "");
        source.save_task(&first);
        source.save_task(&second);

        let mut renamed = first.clone();
        renamed.title = "a2".to_string();
        source.save_task(&renamed);

        let titles: Vec<String> = collect_tasks(&source)
            .unwrap()
            .into_iter()
            .map(|task| task.title)
            .collect();
        assert_eq!(titles, vec!["a2", "b"]);
    }

    #[test]
    fn unavailable_source_reports_data_not_available() {
        let source = InMemoryTasksDataSource::with_tasks([Task::new("a", "")]);
        source.set_unavailable(true);
        assert!(collect_tasks(&source).is_none());
    }

    #[test]
    fn clear_completed_keeps_active_tasks() {
        let done = Task::new("done", "").with_completed(true);
        let open = Task::new("open", "");
        let source = InMemoryTasksDataSource::with_tasks([done, open.clone()]);
        source.clear_completed_tasks();
        assert_eq!(source.snapshot(), vec![open]);
    }
}
