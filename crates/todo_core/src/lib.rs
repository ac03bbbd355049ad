//! Core logic for the todo app.
//! Observable state, screen view-models and task storage live here; hosts
//! only bind to observables and forward user actions.

pub mod busy;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod observable;
pub mod repo;
pub mod source;
pub mod viewmodel;

pub use busy::BusyCounter;
pub use config::{ConfigError, CoreConfig};
pub use db::{StoreError, StoreResult};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError, LoggingStatus};
pub use model::filter::{filter_tasks, FilterType};
pub use model::task::{Task, TaskValidationError};
pub use observable::{
    bind, bind_collection, bind_property, bind_with, BindingScope, ChangeSource, ObservableCollection,
    ObservableValue, PropertyMap, PropertyValue, SubscriptionHandle,
};
pub use repo::task_repo::{RepoError, RepoResult, SqliteTaskRepository, TaskRepository};
pub use source::{
    DataNotAvailable, InMemoryTasksDataSource, LoadResult, LocalTasksDataSource, TasksDataSource,
    TasksRepository,
};
