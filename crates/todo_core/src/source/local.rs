//! SQLite-backed local task source.
//!
//! An empty table is reported as `DataNotAvailable` so a composing
//! repository can fall back to the remote source.

use super::{DataNotAvailable, GetTaskCallback, LoadTasksCallback, TasksDataSource};
use crate::db::{open_db, open_db_in_memory, StoreResult};
use crate::model::task::Task;
use crate::repo::task_repo::{RepoResult, SqliteTaskRepository, TaskRepository};
use log::{debug, error};
use rusqlite::Connection;
use std::path::Path;

/// Local task storage over one SQLite connection.
pub struct LocalTasksDataSource {
    conn: Connection,
}

impl LocalTasksDataSource {
    /// Wraps a connection that already has migrations applied.
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }

    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        Ok(Self::new(open_db(path)?))
    }

    pub fn open_in_memory() -> StoreResult<Self> {
        Ok(Self::new(open_db_in_memory()?))
    }

    /// Every stored task in insertion order; an empty store is `Ok(vec![])`.
    pub fn stored_tasks(&self) -> RepoResult<Vec<Task>> {
        self.repo().list_tasks()
    }

    fn repo(&self) -> SqliteTaskRepository<'_> {
        SqliteTaskRepository::new(&self.conn)
    }

    fn write(
        &self,
        operation: &'static str,
        apply: impl FnOnce(&SqliteTaskRepository<'_>) -> RepoResult<()>,
    ) {
        match apply(&self.repo()) {
            Ok(()) => debug!("event={operation} module=source.local status=ok"),
            Err(err) => error!(
                "event={operation} module=source.local status=error error={err}"
            ),
        }
    }
}

impl TasksDataSource for LocalTasksDataSource {
    fn get_tasks(&self, mut callback: LoadTasksCallback) {
        match self.repo().list_tasks() {
            Ok(tasks) if tasks.is_empty() => {
                debug!("event=get_tasks module=source.local status=empty");
                callback(Err(DataNotAvailable));
            }
            Ok(tasks) => {
                debug!(
                    "event=get_tasks module=source.local status=ok count={}",
                    tasks.len()
                );
                callback(Ok(tasks));
            }
            Err(err) => {
                error!("event=get_tasks module=source.local status=error error={err}");
                callback(Err(DataNotAvailable));
            }
        }
    }

    fn get_task(&self, task_id: &str, mut callback: GetTaskCallback) {
        match self.repo().get_task(task_id) {
            Ok(Some(task)) => callback(Ok(task)),
            Ok(None) => {
                debug!("event=get_task module=source.local status=not_found");
                callback(Err(DataNotAvailable));
            }
            Err(err) => {
                error!("event=get_task module=source.local status=error error={err}");
                callback(Err(DataNotAvailable));
            }
        }
    }

    fn save_task(&self, task: &Task) {
        self.write("save_task", |repo| repo.save_task(task));
    }

    fn complete_task(&self, task: &Task) {
        self.write("complete_task", |repo| repo.set_completed(task.id(), true));
    }

    fn activate_task(&self, task: &Task) {
        self.write("activate_task", |repo| repo.set_completed(task.id(), false));
    }

    fn delete_task(&self, task_id: &str) {
        self.write("delete_task", |repo| repo.delete_task(task_id));
    }

    fn delete_all_tasks(&self) {
        self.write("delete_all_tasks", |repo| repo.delete_all().map(|_| ()));
    }

    fn clear_completed_tasks(&self) {
        self.write("clear_completed_tasks", |repo| {
            repo.delete_completed().map(|_| ())
        });
    }

    fn refresh_tasks(&self) {
        // Storage is the source of truth; nothing cached here.
    }
}
