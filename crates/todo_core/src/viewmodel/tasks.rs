//! Task list screen view-model.
//!
//! # Responsibility
//! - Own the observables the list screen binds to.
//! - Re-derive the filtered `items` collection from the data source on each
//!   load, using the current filter.
//!
//! # Invariants
//! - `items` is replaced wholesale on a successful load, in source order.
//! - A failed load leaves `items` untouched and raises the error flag.
//! - Every issued request settles the busy counter at most once per
//!   delivered result; extra deliveries are absorbed by the counter.
//! - Data-source callbacks hold only a weak reference to view-model state.

use super::events::{EventChannel, ScreenResult, TasksEvent};
use super::messages::{
    EmptyStateIcon, UserMessage, LABEL_ACTIVE, LABEL_ALL, LABEL_COMPLETED, NO_TASKS_ACTIVE,
    NO_TASKS_ALL, NO_TASKS_COMPLETED,
};
use crate::busy::BusyCounter;
use crate::model::filter::{filter_tasks, FilterType};
use crate::model::task::Task;
use crate::observable::{ObservableCollection, ObservableValue, PropertyMap, PropertyValue};
use crate::source::{LoadResult, TasksDataSource};
use log::{debug, info, warn};
use std::cell::Cell;
use std::rc::{Rc, Weak};
use std::sync::Arc;

/// Lifecycle of the list's data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadState {
    #[default]
    Idle,
    Loading,
    Loaded,
    LoadError,
}

/// Derived properties of the list screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum TasksProperty {
    Empty,
}

struct TasksState {
    source: Rc<dyn TasksDataSource>,
    busy: Arc<BusyCounter>,
    filtering: Cell<FilterType>,
    items: ObservableCollection<Task>,
    data_loading: ObservableValue<bool>,
    load_state: ObservableValue<LoadState>,
    current_filtering_label: ObservableValue<&'static str>,
    no_tasks_label: ObservableValue<&'static str>,
    no_task_icon: ObservableValue<EmptyStateIcon>,
    tasks_add_view_visible: ObservableValue<bool>,
    snackbar: ObservableValue<Option<UserMessage>>,
    data_loading_error: ObservableValue<bool>,
    properties: PropertyMap<TasksProperty>,
    events: EventChannel<TasksEvent>,
}

impl TasksState {
    fn on_tasks_loaded(&self, result: LoadResult<Vec<Task>>, show_loading_indicator: bool) {
        match result {
            Ok(tasks) => {
                self.busy.decrement();
                let filter = self.filtering.get();
                let visible = filter_tasks(filter, &tasks);
                info!(
                    "event=tasks_load module=viewmodel.tasks status=ok filter={} total={} visible={}",
                    filter.as_str(),
                    tasks.len(),
                    visible.len()
                );
                self.items.replace_all(visible);
                if show_loading_indicator {
                    self.data_loading.set(false);
                }
                self.data_loading_error.set(false);
                self.load_state.set(LoadState::Loaded);
                self.refresh_properties();
            }
            Err(err) => {
                warn!("event=tasks_load module=viewmodel.tasks status=error error={err}");
                self.busy.decrement();
                if show_loading_indicator {
                    self.data_loading.set(false);
                }
                self.data_loading_error.set(true);
                self.load_state.set(LoadState::LoadError);
            }
        }
    }

    fn refresh_properties(&self) {
        self.properties.refresh([(
            TasksProperty::Empty,
            PropertyValue::Bool(self.items.is_empty()),
        )]);
    }
}

/// View-model of the task list screen.
pub struct TasksViewModel {
    state: Rc<TasksState>,
}

impl TasksViewModel {
    /// Builds a view-model reporting to the process-wide busy counter.
    pub fn new(source: Rc<dyn TasksDataSource>) -> Self {
        Self::with_busy_counter(source, BusyCounter::global())
    }

    pub fn with_busy_counter(source: Rc<dyn TasksDataSource>, busy: Arc<BusyCounter>) -> Self {
        let view_model = Self {
            state: Rc::new(TasksState {
                source,
                busy,
                filtering: Cell::new(FilterType::All),
                items: ObservableCollection::new(),
                data_loading: ObservableValue::new(false),
                load_state: ObservableValue::new(LoadState::Idle),
                current_filtering_label: ObservableValue::new(LABEL_ALL),
                no_tasks_label: ObservableValue::new(NO_TASKS_ALL),
                no_task_icon: ObservableValue::new(EmptyStateIcon::AssignmentTurnedIn),
                tasks_add_view_visible: ObservableValue::new(true),
                snackbar: ObservableValue::new(None),
                data_loading_error: ObservableValue::new(false),
                properties: PropertyMap::new(),
                events: EventChannel::new(),
            }),
        };
        view_model.set_filtering(FilterType::All);
        view_model.state.refresh_properties();
        view_model
    }

    pub fn start(&self) {
        self.load_tasks(false, true);
    }

    /// Pull-to-refresh: invalidates cached data and shows the indicator.
    pub fn refresh(&self) {
        self.load_tasks(true, true);
    }

    /// Stores `filter` and updates the filter-dependent labels. Call
    /// [`load_tasks`](Self::load_tasks) to re-derive `items`.
    pub fn set_filtering(&self, filter: FilterType) {
        let state = &self.state;
        state.filtering.set(filter);
        let (label, no_tasks, icon, add_visible) = match filter {
            FilterType::All => (
                LABEL_ALL,
                NO_TASKS_ALL,
                EmptyStateIcon::AssignmentTurnedIn,
                true,
            ),
            FilterType::Active => (
                LABEL_ACTIVE,
                NO_TASKS_ACTIVE,
                EmptyStateIcon::CheckCircle,
                false,
            ),
            FilterType::Completed => (
                LABEL_COMPLETED,
                NO_TASKS_COMPLETED,
                EmptyStateIcon::VerifiedUser,
                false,
            ),
        };
        state.current_filtering_label.set(label);
        state.no_tasks_label.set(no_tasks);
        state.no_task_icon.set(icon);
        state.tasks_add_view_visible.set(add_visible);
        debug!(
            "event=set_filtering module=viewmodel.tasks status=ok filter={}",
            filter.as_str()
        );
    }

    pub fn filtering(&self) -> FilterType {
        self.state.filtering.get()
    }

    /// Requests tasks from the data source and refreshes `items` with the
    /// filtered result. The callback may fire more than once.
    pub fn load_tasks(&self, force_refresh: bool, show_loading_indicator: bool) {
        let state = &self.state;
        info!(
            "event=tasks_load module=viewmodel.tasks status=start force_refresh={force_refresh} show_indicator={show_loading_indicator}"
        );
        if show_loading_indicator {
            state.data_loading.set(true);
        }
        if force_refresh {
            state.source.refresh_tasks();
        }
        state.load_state.set(LoadState::Loading);
        state.busy.increment();

        let weak: Weak<TasksState> = Rc::downgrade(state);
        let busy = Arc::clone(&state.busy);
        state.source.get_tasks(Box::new(move |result| match weak.upgrade() {
            Some(state) => state.on_tasks_loaded(result, show_loading_indicator),
            None => {
                busy.decrement();
                debug!("event=tasks_load module=viewmodel.tasks status=dropped reason=released");
            }
        }));
    }

    pub fn clear_completed_tasks(&self) {
        self.state.source.clear_completed_tasks();
        self.state
            .snackbar
            .set(Some(UserMessage::CompletedTasksCleared));
        self.load_tasks(false, false);
    }

    /// Marks `task` completed from the list checkbox.
    pub fn complete_task(&self, task: &Task) {
        self.state.source.complete_task(task);
        self.state.snackbar.set(Some(UserMessage::TaskMarkedComplete));
        self.load_tasks(false, false);
    }

    pub fn activate_task(&self, task: &Task) {
        self.state.source.activate_task(task);
        self.state.snackbar.set(Some(UserMessage::TaskMarkedActive));
        self.load_tasks(false, false);
    }

    pub fn add_new_task(&self) {
        self.state.events.emit(TasksEvent::AddNewTask);
    }

    pub fn open_task_details(&self, task: &Task) {
        self.state
            .events
            .emit(TasksEvent::OpenTask(task.id().to_string()));
    }

    /// Shows the confirmation for a result returned by another screen.
    pub fn handle_screen_result(&self, result: ScreenResult) {
        let message = match result {
            ScreenResult::Edited => UserMessage::TaskSaved,
            ScreenResult::Added => UserMessage::TaskAdded,
            ScreenResult::Deleted => UserMessage::TaskDeleted,
        };
        self.state.snackbar.set(Some(message));
    }

    pub fn is_empty(&self) -> bool {
        self.state.items.is_empty()
    }

    pub fn items(&self) -> &ObservableCollection<Task> {
        &self.state.items
    }

    pub fn data_loading(&self) -> &ObservableValue<bool> {
        &self.state.data_loading
    }

    pub fn load_state(&self) -> &ObservableValue<LoadState> {
        &self.state.load_state
    }

    pub fn current_filtering_label(&self) -> &ObservableValue<&'static str> {
        &self.state.current_filtering_label
    }

    pub fn no_tasks_label(&self) -> &ObservableValue<&'static str> {
        &self.state.no_tasks_label
    }

    pub fn no_task_icon(&self) -> &ObservableValue<EmptyStateIcon> {
        &self.state.no_task_icon
    }

    pub fn tasks_add_view_visible(&self) -> &ObservableValue<bool> {
        &self.state.tasks_add_view_visible
    }

    pub fn snackbar(&self) -> &ObservableValue<Option<UserMessage>> {
        &self.state.snackbar
    }

    pub fn data_loading_error(&self) -> &ObservableValue<bool> {
        &self.state.data_loading_error
    }

    pub fn properties(&self) -> &PropertyMap<TasksProperty> {
        &self.state.properties
    }

    pub fn events(&self) -> &EventChannel<TasksEvent> {
        &self.state.events
    }
}
