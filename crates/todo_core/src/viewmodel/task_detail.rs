//! Task detail screen: a [`TaskViewModel`] plus navigation events.

use super::events::{EventChannel, TaskDetailEvent};
use super::task::TaskViewModel;
use crate::source::TasksDataSource;
use std::rc::Rc;

pub struct TaskDetailViewModel {
    task: TaskViewModel,
    events: EventChannel<TaskDetailEvent>,
}

impl TaskDetailViewModel {
    pub fn new(source: Rc<dyn TasksDataSource>) -> Self {
        Self {
            task: TaskViewModel::new(source),
            events: EventChannel::new(),
        }
    }

    pub fn start(&self, task_id: Option<&str>) {
        self.task.start(task_id);
    }

    /// Deletes the shown task and reports [`TaskDetailEvent::Deleted`].
    pub fn delete_task(&self) {
        self.task.delete_task();
        self.events.emit(TaskDetailEvent::Deleted);
    }

    pub fn start_edit_task(&self) {
        self.events.emit(TaskDetailEvent::EditRequested);
    }

    pub fn task(&self) -> &TaskViewModel {
        &self.task
    }

    pub fn events(&self) -> &EventChannel<TaskDetailEvent> {
        &self.events
    }
}
