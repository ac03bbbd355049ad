mod common;

use common::{ids, load_now, load_task_now, task};
use std::rc::Rc;
use todo_core::{
    DataNotAvailable, InMemoryTasksDataSource, LocalTasksDataSource, TasksDataSource,
    TasksRepository,
};

struct Fixture {
    local: Rc<LocalTasksDataSource>,
    remote: Rc<InMemoryTasksDataSource>,
    repository: TasksRepository,
}

fn fixture(revalidate: bool) -> Fixture {
    let local = Rc::new(LocalTasksDataSource::open_in_memory().unwrap());
    let remote = Rc::new(InMemoryTasksDataSource::new());
    let repository = TasksRepository::new(
        Rc::clone(&local) as Rc<dyn TasksDataSource>,
        Rc::clone(&remote) as Rc<dyn TasksDataSource>,
    )
    .with_revalidation(revalidate);
    Fixture {
        local,
        remote,
        repository,
    }
}

#[test]
fn local_source_reports_empty_table_as_unavailable() {
    let local = LocalTasksDataSource::open_in_memory().unwrap();
    assert_eq!(load_now(&local), vec![Err(DataNotAvailable)]);

    local.save_task(&task("a", "one", false));
    local.complete_task(&task("a", "one", false));
    assert_eq!(
        load_now(&local),
        vec![Ok(vec![task("a", "one", true)])]
    );
    assert_eq!(load_task_now(&local, "zzz"), vec![Err(DataNotAvailable)]);
}

#[test]
fn local_source_persists_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tasks.db");
    {
        let local = LocalTasksDataSource::open(&path).unwrap();
        local.save_task(&task("a", "one", false));
        local.save_task(&task("b", "two", true));
        local.clear_completed_tasks();
    }

    let reopened = LocalTasksDataSource::open(&path).unwrap();
    assert_eq!(load_now(&reopened), vec![Ok(vec![task("a", "one", false)])]);
}

#[test]
fn cache_miss_falls_back_from_local_to_remote_and_rewrites_local() {
    let fx = fixture(false);
    fx.remote.save_task(&task("r1", "remote", false));

    let results = load_now(&fx.repository);
    assert_eq!(results, vec![Ok(vec![task("r1", "remote", false)])]);
    assert_eq!(load_now(fx.local.as_ref()), results);
}

#[test]
fn clean_cache_is_served_without_touching_sources() {
    let fx = fixture(false);
    fx.repository.save_task(&task("a", "one", false));
    assert_eq!(load_now(&fx.repository).len(), 1);

    // Bypass the repository: the cache must not see this.
    fx.remote.save_task(&task("b", "two", false));

    let results = load_now(&fx.repository);
    assert_eq!(results.len(), 1);
    assert_eq!(ids(results[0].as_ref().unwrap()), vec!["a"]);
}

#[test]
fn refresh_marks_cache_dirty_and_reloads_from_remote() {
    let fx = fixture(false);
    fx.repository.save_task(&task("a", "one", false));
    load_now(&fx.repository);
    fx.remote.save_task(&task("b", "two", false));

    fx.repository.refresh_tasks();
    assert!(fx.repository.is_cache_dirty());

    let results = load_now(&fx.repository);
    assert_eq!(ids(results[0].as_ref().unwrap()), vec!["a", "b"]);
    assert!(!fx.repository.is_cache_dirty());
    assert_eq!(ids(load_now(fx.local.as_ref())[0].as_ref().unwrap()), vec!["a", "b"]);
}

#[test]
fn revalidation_delivers_cache_then_remote() {
    let fx = fixture(true);
    fx.repository.save_task(&task("a", "one", false));
    load_now(&fx.repository);
    fx.remote.save_task(&task("b", "two", false));

    let results = load_now(&fx.repository);

    assert_eq!(results.len(), 2);
    assert_eq!(ids(results[0].as_ref().unwrap()), vec!["a"]);
    assert_eq!(ids(results[1].as_ref().unwrap()), vec!["a", "b"]);
}

#[test]
fn remote_outage_with_empty_local_reports_unavailable() {
    let fx = fixture(false);
    fx.remote.set_unavailable(true);

    assert_eq!(load_now(&fx.repository), vec![Err(DataNotAvailable)]);
}

#[test]
fn writes_reach_both_sources_and_the_cache() {
    let fx = fixture(false);
    fx.repository.save_task(&task("a", "one", false));
    fx.repository.save_task(&task("b", "two", false));
    load_now(&fx.repository);

    fx.repository.complete_task(&task("a", "one", false));
    fx.repository.delete_task("b");

    let expected = vec![task("a", "one", true)];
    assert_eq!(load_now(&fx.repository), vec![Ok(expected.clone())]);
    assert_eq!(fx.remote.snapshot(), expected);
    assert_eq!(load_now(fx.local.as_ref()), vec![Ok(expected)]);

    fx.repository.clear_completed_tasks();
    assert_eq!(load_now(&fx.repository), vec![Ok(Vec::new())]);
    assert!(fx.remote.snapshot().is_empty());
}

#[test]
fn get_task_falls_back_to_remote() {
    let fx = fixture(false);
    fx.remote.save_task(&task("r1", "remote only", false));

    assert_eq!(
        load_task_now(&fx.repository, "r1"),
        vec![Ok(task("r1", "remote only", false))]
    );
    assert_eq!(
        load_task_now(&fx.repository, "missing"),
        vec![Err(DataNotAvailable)]
    );
}
