//! Callback-based task data sources consumed by view-models.
//!
//! # Responsibility
//! - Define the contract view-models depend on (`TasksDataSource`).
//! - Provide concrete sources: SQLite-backed local storage, an in-memory
//!   source standing in for the remote service, and a caching repository
//!   composing the two.
//!
//! # Invariants
//! - Reads never return values; results arrive through callbacks, possibly
//!   more than once per request (cache hit, then network hit).
//! - Callbacks are invoked on the thread that owns the view-models.
//! - Writes are fire-and-forget; sources log failures instead of returning
//!   them.

use crate::model::task::Task;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod local;
pub mod memory;
pub mod repository;

pub use local::LocalTasksDataSource;
pub use memory::InMemoryTasksDataSource;
pub use repository::TasksRepository;

/// The source could not produce the requested data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataNotAvailable;

impl Display for DataNotAvailable {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "data not available")
    }
}

impl Error for DataNotAvailable {}

pub type LoadResult<T> = Result<T, DataNotAvailable>;

/// Receives the outcome of `get_tasks`. May be called more than once.
pub type LoadTasksCallback = Box<dyn FnMut(LoadResult<Vec<Task>>)>;

/// Receives the outcome of `get_task`. May be called more than once.
pub type GetTaskCallback = Box<dyn FnMut(LoadResult<Task>)>;

/// Data access contract used by view-models.
pub trait TasksDataSource {
    fn get_tasks(&self, callback: LoadTasksCallback);
    fn get_task(&self, task_id: &str, callback: GetTaskCallback);
    fn save_task(&self, task: &Task);
    fn complete_task(&self, task: &Task);
    fn activate_task(&self, task: &Task);
    fn delete_task(&self, task_id: &str);
    fn delete_all_tasks(&self);
    fn clear_completed_tasks(&self);
    /// Invalidates cached data so the next read goes to the backing source.
    fn refresh_tasks(&self);
}
