//! Task domain model.
//!
//! # Responsibility
//! - Define the record shared by the list, detail, edit and statistics screens.
//! - Provide the emptiness and completion helpers used by view-models.
//!
//! # Invariants
//! - `id` is non-empty and immutable once assigned.
//! - A task whose title and description are both zero-length is "empty" and
//!   must never be persisted by the create path.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Task validation error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskValidationError {
    EmptyId,
}

impl Display for TaskValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyId => write!(f, "task id must not be empty"),
        }
    }
}

impl Error for TaskValidationError {}

/// A single to-do item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TaskWire")]
pub struct Task {
    id: String,
    pub title: String,
    pub description: String,
    pub completed: bool,
}

/// Unvalidated wire shape; converted through `Task::try_from`.
#[derive(Deserialize)]
struct TaskWire {
    id: String,
    title: String,
    description: String,
    #[serde(default)]
    completed: bool,
}

impl TryFrom<TaskWire> for Task {
    type Error = TaskValidationError;

    fn try_from(value: TaskWire) -> Result<Self, Self::Error> {
        let mut task = Task::with_id(value.id, value.title, value.description)?;
        task.completed = value.completed;
        Ok(task)
    }
}

impl Task {
    /// Creates an active task with a generated id.
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: title.into(),
            description: description.into(),
            completed: false,
        }
    }

    /// Creates an active task with a caller-provided id.
    ///
    /// Used by the edit path and by storage read-back, where identity
    /// already exists.
    pub fn with_id(
        id: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<Self, TaskValidationError> {
        let id = id.into();
        if id.is_empty() {
            return Err(TaskValidationError::EmptyId);
        }
        Ok(Self {
            id,
            title: title.into(),
            description: description.into(),
            completed: false,
        })
    }

    /// Builder-style completion flag.
    pub fn with_completed(mut self, completed: bool) -> Self {
        self.completed = completed;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    pub fn is_active(&self) -> bool {
        !self.completed
    }

    /// True when both text fields are zero-length. Whitespace counts as content.
    pub fn is_empty(&self) -> bool {
        self.title.is_empty() && self.description.is_empty()
    }

    /// Text shown in list rows: the title, or the description when untitled.
    pub fn title_for_list(&self) -> &str {
        if self.title.is_empty() {
            &self.description
        } else {
            &self.title
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Task, TaskValidationError};

    #[test]
    fn new_generates_unique_ids() {
        let a = Task::new("a", "");
        let b = Task::new("a", "");
        assert!(!a.id().is_empty());
        assert_ne!(a.id(), b.id());
        assert!(a.is_active());
    }

    #[test]
    fn with_id_rejects_empty_id() {
        assert_eq!(
            Task::with_id("", "title", "").unwrap_err(),
            TaskValidationError::EmptyId
        );
    }

    #[test]
    fn emptiness_is_literal() {
        assert!(Task::new("", "").is_empty());
        assert!(!Task::new(" ", "").is_empty());
        assert!(!Task::new("", "details").is_empty());
    }

    #[test]
    fn title_for_list_falls_back_to_description() {
        assert_eq!(Task::new("Title", "Body").title_for_list(), "Title");
        assert_eq!(Task::new("", "Body").title_for_list(), "Body");
    }
}
