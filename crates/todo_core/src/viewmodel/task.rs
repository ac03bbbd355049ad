//! View-model exposing a single task.
//!
//! `title` and `description` follow the `task` observable through an
//! internal subscription; an absent task shows the "no data" keys.

use super::messages::{UserMessage, NO_DATA, NO_DATA_DESCRIPTION};
use crate::model::task::Task;
use crate::observable::{ObservableValue, PropertyMap, PropertyValue};
use crate::source::{LoadResult, TasksDataSource};
use log::{debug, info, warn};
use std::cell::Cell;
use std::rc::{Rc, Weak};

/// Derived properties of a single-task screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum TaskProperty {
    Completed,
    DataAvailable,
    TitleForList,
    DataLoading,
}

struct TaskState {
    source: Rc<dyn TasksDataSource>,
    snackbar: ObservableValue<Option<UserMessage>>,
    title: ObservableValue<String>,
    description: ObservableValue<String>,
    task: ObservableValue<Option<Task>>,
    data_loading: Cell<bool>,
    properties: PropertyMap<TaskProperty>,
}

impl TaskState {
    fn on_task_loaded(&self, result: LoadResult<Task>) {
        match result {
            Ok(task) => {
                debug!("event=task_load module=viewmodel.task status=ok");
                self.task.set(Some(task));
            }
            Err(err) => {
                warn!("event=task_load module=viewmodel.task status=error error={err}");
                self.task.set(None);
            }
        }
        self.data_loading.set(false);
        self.refresh_properties();
    }

    fn refresh_properties(&self) {
        let task = self.task.get();
        let title_for_list = task
            .as_ref()
            .map_or(NO_DATA, Task::title_for_list)
            .to_string();
        self.properties.refresh([
            (
                TaskProperty::Completed,
                PropertyValue::Bool(task.as_ref().is_some_and(Task::is_completed)),
            ),
            (
                TaskProperty::DataAvailable,
                PropertyValue::Bool(task.is_some()),
            ),
            (TaskProperty::TitleForList, PropertyValue::Text(title_for_list)),
            (
                TaskProperty::DataLoading,
                PropertyValue::Bool(self.data_loading.get()),
            ),
        ]);
    }
}

pub struct TaskViewModel {
    state: Rc<TaskState>,
}

impl TaskViewModel {
    pub fn new(source: Rc<dyn TasksDataSource>) -> Self {
        let task = ObservableValue::new(None::<Task>);
        let title = ObservableValue::new(String::new());
        let description = ObservableValue::new(String::new());

        let (title_sink, description_sink) = (title.clone(), description.clone());
        // Lives as long as `task`; never released separately.
        task.bind_now(move |task: &Option<Task>| match task {
            Some(task) => {
                title_sink.set(task.title.clone());
                description_sink.set(task.description.clone());
            }
            None => {
                title_sink.set(NO_DATA.to_string());
                description_sink.set(NO_DATA_DESCRIPTION.to_string());
            }
        });

        let state = Rc::new(TaskState {
            source,
            snackbar: ObservableValue::new(None),
            title,
            description,
            task,
            data_loading: Cell::new(false),
            properties: PropertyMap::new(),
        });
        state.refresh_properties();
        Self { state }
    }

    /// Loads `task_id` from the data source. `None` does nothing.
    pub fn start(&self, task_id: Option<&str>) {
        let Some(task_id) = task_id else {
            return;
        };
        info!("event=task_load module=viewmodel.task status=start");
        self.state.data_loading.set(true);
        self.state.refresh_properties();

        let weak: Weak<TaskState> = Rc::downgrade(&self.state);
        self.state.source.get_task(
            task_id,
            Box::new(move |result| {
                if let Some(state) = weak.upgrade() {
                    state.on_task_loaded(result);
                }
            }),
        );
    }

    pub fn set_task(&self, task: Task) {
        self.state.task.set(Some(task));
        self.state.refresh_properties();
    }

    /// Toggles completion of the shown task. Ignored while loading or when
    /// no task is shown.
    pub fn set_completed(&self, completed: bool) {
        if self.state.data_loading.get() {
            return;
        }
        let Some(task) = self.state.task.get() else {
            debug!("event=task_set_completed module=viewmodel.task status=skipped reason=no_task");
            return;
        };
        if completed {
            self.state.source.complete_task(&task);
            self.state.snackbar.set(Some(UserMessage::TaskMarkedComplete));
        } else {
            self.state.source.activate_task(&task);
            self.state.snackbar.set(Some(UserMessage::TaskMarkedActive));
        }
        self.state.task.set(Some(task.with_completed(completed)));
        self.state.refresh_properties();
    }

    pub fn delete_task(&self) {
        if let Some(task_id) = self.task_id() {
            self.state.source.delete_task(&task_id);
        }
    }

    /// Reloads the shown task.
    pub fn on_refresh(&self) {
        if let Some(task_id) = self.task_id() {
            self.start(Some(&task_id));
        }
    }

    pub fn task_id(&self) -> Option<String> {
        self.state
            .task
            .with(|task| task.as_ref().map(|task| task.id().to_string()))
    }

    pub fn is_data_loading(&self) -> bool {
        self.state.data_loading.get()
    }

    pub fn is_completed(&self) -> bool {
        self.state
            .task
            .with(|task| task.as_ref().is_some_and(Task::is_completed))
    }

    pub fn is_data_available(&self) -> bool {
        self.state.task.with(Option::is_some)
    }

    pub fn title_for_list(&self) -> String {
        self.state.task.with(|task| {
            task.as_ref()
                .map_or(NO_DATA, Task::title_for_list)
                .to_string()
        })
    }

    pub fn snackbar(&self) -> &ObservableValue<Option<UserMessage>> {
        &self.state.snackbar
    }

    pub fn title(&self) -> &ObservableValue<String> {
        &self.state.title
    }

    pub fn description(&self) -> &ObservableValue<String> {
        &self.state.description
    }

    pub fn task(&self) -> &ObservableValue<Option<Task>> {
        &self.state.task
    }

    pub fn properties(&self) -> &PropertyMap<TaskProperty> {
        &self.state.properties
    }
}
