//! Screen view-models.
//!
//! # Responsibility
//! - Hold the observables each screen binds to and the behavior that
//!   mutates them in response to user actions and data-source results.
//!
//! # Invariants
//! - View-models own their observables; bindings are created and released
//!   by the consumer.
//! - Data-source callbacks capture weak view-model state, so an in-flight
//!   request never keeps a released view-model alive.
//!
//! # See also
//! - `crate::observable` for the propagation primitives.
//! - `crate::source` for the data-source contract.

pub mod add_edit;
pub mod events;
pub mod messages;
pub mod statistics;
pub mod task;
pub mod task_detail;
pub mod tasks;

pub use add_edit::{AddEditError, AddEditTaskViewModel, EditorState};
pub use events::{AddEditEvent, EventChannel, ScreenResult, TaskDetailEvent, TasksEvent};
pub use messages::{EmptyStateIcon, UserMessage};
pub use statistics::{StatisticsProperty, StatisticsViewModel};
pub use task::{TaskProperty, TaskViewModel};
pub use task_detail::TaskDetailViewModel;
pub use tasks::{LoadState, TasksProperty, TasksViewModel};
