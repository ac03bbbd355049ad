//! Caching repository composing a local and a remote task source.
//!
//! # Responsibility
//! - Serve task reads from an in-memory cache when it is clean.
//! - Fall back local -> remote on a cache miss and rewrite local storage
//!   from remote payloads.
//! - Fan writes out to both sources and keep the cache coherent.
//!
//! # Invariants
//! - `refresh_tasks` marks the cache dirty; the next `get_tasks` goes to the
//!   remote source.
//! - With revalidation enabled a clean-cache read delivers twice: cached
//!   payload first, then the remote payload.
//! - Cached task order matches the order of the payload that filled it.
//! - A remote payload is authoritative and replaces local storage, so a
//!   remote that starts empty must be seeded before it is composed; `open`
//!   does this for hosts without a real service.

use super::{
    DataNotAvailable, GetTaskCallback, InMemoryTasksDataSource, LoadResult, LoadTasksCallback,
    LocalTasksDataSource, TasksDataSource,
};
use crate::config::CoreConfig;
use crate::model::task::Task;
use crate::repo::task_repo::RepoResult;
use log::{debug, info, warn};
use std::cell::RefCell;
use std::rc::Rc;

type SharedTasksCallback = Rc<RefCell<LoadTasksCallback>>;

#[derive(Debug, Default)]
struct TaskCache {
    tasks: Option<Vec<Task>>,
    dirty: bool,
}

impl TaskCache {
    fn clean_snapshot(&self) -> Option<Vec<Task>> {
        if self.dirty {
            return None;
        }
        self.tasks.clone()
    }

    fn find(&self, task_id: &str) -> Option<Task> {
        self.tasks
            .as_ref()?
            .iter()
            .find(|task| task.id() == task_id)
            .cloned()
    }

    fn upsert(&mut self, task: &Task) {
        let Some(tasks) = self.tasks.as_mut() else {
            return;
        };
        match tasks.iter_mut().find(|existing| existing.id() == task.id()) {
            Some(existing) => *existing = task.clone(),
            None => tasks.push(task.clone()),
        }
    }

    fn set_completed(&mut self, task_id: &str, completed: bool) {
        if let Some(task) = self
            .tasks
            .as_mut()
            .and_then(|tasks| tasks.iter_mut().find(|task| task.id() == task_id))
        {
            task.completed = completed;
        }
    }

    fn retain(&mut self, keep: impl FnMut(&Task) -> bool) {
        if let Some(tasks) = self.tasks.as_mut() {
            tasks.retain(keep);
        }
    }
}

struct Sources {
    local: Rc<dyn TasksDataSource>,
    remote: Rc<dyn TasksDataSource>,
    cache: RefCell<TaskCache>,
}

impl Sources {
    fn fill_cache(&self, tasks: &[Task]) {
        let mut cache = self.cache.borrow_mut();
        cache.tasks = Some(tasks.to_vec());
        cache.dirty = false;
    }

    fn rewrite_local(&self, tasks: &[Task]) {
        self.local.delete_all_tasks();
        for task in tasks {
            self.local.save_task(task);
        }
    }
}

/// Cached repository over a local and a remote [`TasksDataSource`].
pub struct TasksRepository {
    sources: Rc<Sources>,
    revalidate: bool,
}

impl TasksRepository {
    pub fn new(local: Rc<dyn TasksDataSource>, remote: Rc<dyn TasksDataSource>) -> Self {
        Self {
            sources: Rc::new(Sources {
                local,
                remote,
                cache: RefCell::new(TaskCache::default()),
            }),
            revalidate: false,
        }
    }

    /// Composes the store at `config.db_path` with an in-memory remote
    /// seeded from the stored tasks, so revalidation and refresh round-trip
    /// the store's own rows instead of an empty payload.
    pub fn open(config: &CoreConfig) -> RepoResult<Self> {
        let local = LocalTasksDataSource::open(&config.db_path)?;
        let stored = local.stored_tasks()?;
        info!(
            "event=repository_open module=source.repository status=ok seeded={} revalidate={}",
            stored.len(),
            config.revalidate_cache
        );
        let remote = InMemoryTasksDataSource::with_tasks(stored);
        Ok(Self::new(Rc::new(local), Rc::new(remote)).with_revalidation(config.revalidate_cache))
    }

    /// Enables cache-then-remote delivery for clean-cache reads.
    pub fn with_revalidation(mut self, revalidate: bool) -> Self {
        self.revalidate = revalidate;
        self
    }

    pub fn is_cache_dirty(&self) -> bool {
        self.sources.cache.borrow().dirty
    }

    fn load_from_remote(sources: &Rc<Sources>, callback: SharedTasksCallback) {
        let captured = Rc::clone(sources);
        sources.remote.get_tasks(Box::new(move |result: LoadResult<Vec<Task>>| {
            match &result {
                Ok(tasks) => {
                    info!(
                        "event=get_tasks module=source.repository status=ok origin=remote count={}",
                        tasks.len()
                    );
                    captured.fill_cache(tasks);
                    captured.rewrite_local(tasks);
                }
                Err(_) => {
                    warn!("event=get_tasks module=source.repository status=error origin=remote");
                }
            }
            deliver(&callback, result);
        }));
    }

    fn load_from_local(sources: &Rc<Sources>, callback: SharedTasksCallback) {
        let captured = Rc::clone(sources);
        sources.local.get_tasks(Box::new(move |result: LoadResult<Vec<Task>>| {
            match result {
                Ok(tasks) => {
                    debug!(
                        "event=get_tasks module=source.repository status=ok origin=local count={}",
                        tasks.len()
                    );
                    captured.fill_cache(&tasks);
                    deliver(&callback, Ok(tasks));
                }
                Err(DataNotAvailable) => {
                    debug!("event=get_tasks module=source.repository status=fallback origin=local");
                    Self::load_from_remote(&captured, Rc::clone(&callback));
                }
            }
        }));
    }
}

fn deliver(callback: &SharedTasksCallback, result: LoadResult<Vec<Task>>) {
    let mut callback = callback.borrow_mut();
    (*callback)(result);
}

impl TasksDataSource for TasksRepository {
    fn get_tasks(&self, callback: LoadTasksCallback) {
        let callback: SharedTasksCallback = Rc::new(RefCell::new(callback));
        let (cached, dirty) = {
            let cache = self.sources.cache.borrow();
            (cache.clean_snapshot(), cache.dirty)
        };

        if let Some(tasks) = cached {
            debug!(
                "event=get_tasks module=source.repository status=ok origin=cache count={} revalidate={}",
                tasks.len(),
                self.revalidate
            );
            deliver(&callback, Ok(tasks));
            if self.revalidate {
                Self::load_from_remote(&self.sources, callback);
            }
            return;
        }

        if dirty {
            Self::load_from_remote(&self.sources, callback);
        } else {
            Self::load_from_local(&self.sources, callback);
        }
    }

    fn get_task(&self, task_id: &str, mut callback: GetTaskCallback) {
        let cached = self.sources.cache.borrow().find(task_id);
        if let Some(task) = cached {
            callback(Ok(task));
            return;
        }

        let sources = Rc::clone(&self.sources);
        let remote_id = task_id.to_string();
        let mut callback = Some(callback);
        self.sources.local.get_task(
            task_id,
            Box::new(move |result: LoadResult<Task>| {
                let Some(mut callback) = callback.take() else {
                    return;
                };
                match result {
                    Ok(task) => {
                        sources.cache.borrow_mut().upsert(&task);
                        callback(Ok(task));
                    }
                    Err(DataNotAvailable) => {
                        let cache_sources = Rc::clone(&sources);
                        sources.remote.get_task(
                            &remote_id,
                            Box::new(move |result: LoadResult<Task>| {
                                if let Ok(task) = &result {
                                    cache_sources.cache.borrow_mut().upsert(task);
                                }
                                callback(result);
                            }),
                        );
                    }
                }
            }),
        );
    }

    fn save_task(&self, task: &Task) {
        self.sources.remote.save_task(task);
        self.sources.local.save_task(task);
        self.sources.cache.borrow_mut().upsert(task);
    }

    fn complete_task(&self, task: &Task) {
        self.sources.remote.complete_task(task);
        self.sources.local.complete_task(task);
        self.sources
            .cache
            .borrow_mut()
            .set_completed(task.id(), true);
    }

    fn activate_task(&self, task: &Task) {
        self.sources.remote.activate_task(task);
        self.sources.local.activate_task(task);
        self.sources
            .cache
            .borrow_mut()
            .set_completed(task.id(), false);
    }

    fn delete_task(&self, task_id: &str) {
        self.sources.remote.delete_task(task_id);
        self.sources.local.delete_task(task_id);
        self.sources
            .cache
            .borrow_mut()
            .retain(|task| task.id() != task_id);
    }

    fn delete_all_tasks(&self) {
        self.sources.remote.delete_all_tasks();
        self.sources.local.delete_all_tasks();
        self.sources.cache.borrow_mut().retain(|_| false);
    }

    fn clear_completed_tasks(&self) {
        self.sources.remote.clear_completed_tasks();
        self.sources.local.clear_completed_tasks();
        self.sources.cache.borrow_mut().retain(Task::is_active);
    }

    fn refresh_tasks(&self) {
        debug!("event=refresh_tasks module=source.repository status=ok");
        self.sources.cache.borrow_mut().dirty = true;
    }
}
