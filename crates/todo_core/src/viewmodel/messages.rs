//! Stable keys for user-visible text. Hosts map keys to localized strings.

/// Transient message shown through a screen's snackbar observable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UserMessage {
    CompletedTasksCleared,
    TaskMarkedComplete,
    TaskMarkedActive,
    TaskSaved,
    TaskAdded,
    TaskDeleted,
    EmptyTask,
}

impl UserMessage {
    pub fn key(self) -> &'static str {
        match self {
            Self::CompletedTasksCleared => "completed_tasks_cleared",
            Self::TaskMarkedComplete => "task_marked_complete",
            Self::TaskMarkedActive => "task_marked_active",
            Self::TaskSaved => "successfully_saved_task_message",
            Self::TaskAdded => "successfully_added_task_message",
            Self::TaskDeleted => "successfully_deleted_task_message",
            Self::EmptyTask => "empty_task_message",
        }
    }
}

/// Icon selector for the empty task list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EmptyStateIcon {
    AssignmentTurnedIn,
    CheckCircle,
    VerifiedUser,
}

pub const LABEL_ALL: &str = "label_all";
pub const LABEL_ACTIVE: &str = "label_active";
pub const LABEL_COMPLETED: &str = "label_completed";
pub const NO_TASKS_ALL: &str = "no_tasks_all";
pub const NO_TASKS_ACTIVE: &str = "no_tasks_active";
pub const NO_TASKS_COMPLETED: &str = "no_tasks_completed";
pub const NO_DATA: &str = "no_data";
pub const NO_DATA_DESCRIPTION: &str = "no_data_description";
