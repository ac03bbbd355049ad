//! Add/edit task screen view-model.
//!
//! # Invariants
//! - `start` is ignored while a load is in flight and after data for an
//!   existing task has been loaded once.
//! - Creating a task rejects an empty title plus empty description with a
//!   snackbar message; updating an existing task performs no such check.
//! - Saving an existing task keeps its completion state.

use super::events::{AddEditEvent, EventChannel};
use super::messages::UserMessage;
use crate::model::task::{Task, TaskValidationError};
use crate::observable::ObservableValue;
use crate::source::{LoadResult, TasksDataSource};
use log::{error, info, warn};
use std::cell::{Cell, RefCell};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::rc::{Rc, Weak};

/// Editor lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditorState {
    #[default]
    NotStarted,
    Loading,
    Loaded,
    NewTaskReady,
}

/// Misuse of the add/edit view-model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddEditError {
    /// `save` was called for an existing task without a task id, i.e.
    /// before `start`.
    IllegalState(&'static str),
    Validation(TaskValidationError),
}

impl Display for AddEditError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::IllegalState(message) => write!(f, "illegal state: {message}"),
            Self::Validation(err) => write!(f, "{err}"),
        }
    }
}

impl Error for AddEditError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::IllegalState(_) => None,
            Self::Validation(err) => Some(err),
        }
    }
}

impl From<TaskValidationError> for AddEditError {
    fn from(value: TaskValidationError) -> Self {
        Self::Validation(value)
    }
}

struct AddEditState {
    source: Rc<dyn TasksDataSource>,
    title: ObservableValue<String>,
    description: ObservableValue<String>,
    data_loading: ObservableValue<bool>,
    snackbar: ObservableValue<Option<UserMessage>>,
    editor_state: Cell<EditorState>,
    task_id: RefCell<Option<String>>,
    loaded_completed: Cell<bool>,
    events: EventChannel<AddEditEvent>,
}

impl AddEditState {
    fn on_task_loaded(&self, result: LoadResult<Task>) {
        match result {
            Ok(task) => {
                info!("event=task_edit_load module=viewmodel.add_edit status=ok");
                self.title.set(task.title.clone());
                self.description.set(task.description.clone());
                self.loaded_completed.set(task.completed);
                self.data_loading.set(false);
                self.editor_state.set(EditorState::Loaded);
            }
            Err(err) => {
                warn!("event=task_edit_load module=viewmodel.add_edit status=error error={err}");
                self.data_loading.set(false);
                self.editor_state.set(EditorState::NotStarted);
            }
        }
    }
}

pub struct AddEditTaskViewModel {
    state: Rc<AddEditState>,
}

impl AddEditTaskViewModel {
    pub fn new(source: Rc<dyn TasksDataSource>) -> Self {
        Self {
            state: Rc::new(AddEditState {
                source,
                title: ObservableValue::new(String::new()),
                description: ObservableValue::new(String::new()),
                data_loading: ObservableValue::new(false),
                snackbar: ObservableValue::new(None),
                editor_state: Cell::new(EditorState::NotStarted),
                task_id: RefCell::new(None),
                loaded_completed: Cell::new(false),
                events: EventChannel::new(),
            }),
        }
    }

    /// Prepares the editor. `None` edits a new task; `Some(id)` loads an
    /// existing one.
    pub fn start(&self, task_id: Option<&str>) {
        let state = &self.state;
        if state.data_loading.get() {
            return;
        }
        *state.task_id.borrow_mut() = task_id.map(str::to_string);
        let Some(task_id) = task_id else {
            state.editor_state.set(EditorState::NewTaskReady);
            return;
        };
        if state.editor_state.get() == EditorState::Loaded {
            return;
        }

        info!("event=task_edit_load module=viewmodel.add_edit status=start");
        state.editor_state.set(EditorState::Loading);
        state.data_loading.set(true);
        let weak: Weak<AddEditState> = Rc::downgrade(state);
        state.source.get_task(
            task_id,
            Box::new(move |result| {
                if let Some(state) = weak.upgrade() {
                    state.on_task_loaded(result);
                }
            }),
        );
    }

    /// Persists the edited task and reports [`AddEditEvent::Saved`].
    ///
    /// An empty new task only posts [`UserMessage::EmptyTask`] and returns
    /// `Ok(())`.
    ///
    /// Saving an existing task keeps the completion flag it was loaded with
    /// instead of rebuilding it as active, so editing never reopens a
    /// completed task.
    pub fn save(&self) -> Result<(), AddEditError> {
        let state = &self.state;
        let title = state.title.get();
        let description = state.description.get();

        if state.editor_state.get() == EditorState::NewTaskReady {
            let task = Task::new(title, description);
            if task.is_empty() {
                info!("event=task_save module=viewmodel.add_edit status=rejected reason=empty");
                state.snackbar.set(Some(UserMessage::EmptyTask));
                return Ok(());
            }
            state.source.save_task(&task);
            info!("event=task_save module=viewmodel.add_edit status=ok mode=create");
            state.events.emit(AddEditEvent::Saved);
            return Ok(());
        }

        let task_id = state.task_id.borrow().clone();
        let Some(task_id) = task_id else {
            error!(
                "event=task_save module=viewmodel.add_edit status=error error_code=illegal_state"
            );
            return Err(AddEditError::IllegalState(
                "save called for an existing task without a task id",
            ));
        };
        let task = Task::with_id(task_id, title, description)?
            .with_completed(state.loaded_completed.get());
        state.source.save_task(&task);
        info!("event=task_save module=viewmodel.add_edit status=ok mode=update");
        state.events.emit(AddEditEvent::Saved);
        Ok(())
    }

    pub fn editor_state(&self) -> EditorState {
        self.state.editor_state.get()
    }

    pub fn is_new_task(&self) -> bool {
        self.editor_state() == EditorState::NewTaskReady
    }

    pub fn title(&self) -> &ObservableValue<String> {
        &self.state.title
    }

    pub fn description(&self) -> &ObservableValue<String> {
        &self.state.description
    }

    pub fn data_loading(&self) -> &ObservableValue<bool> {
        &self.state.data_loading
    }

    pub fn snackbar(&self) -> &ObservableValue<Option<UserMessage>> {
        &self.state.snackbar
    }

    pub fn events(&self) -> &EventChannel<AddEditEvent> {
        &self.state.events
    }
}
