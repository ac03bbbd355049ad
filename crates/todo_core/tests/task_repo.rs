use todo_core::db::open_db_in_memory;
use todo_core::{RepoError, SqliteTaskRepository, Task, TaskRepository};

fn task(id: &str, title: &str, completed: bool) -> Task {
    Task::with_id(id, title, "notes")
        .unwrap()
        .with_completed(completed)
}

#[test]
fn save_and_get_roundtrip() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTaskRepository::new(&conn);

    let original = task("t1", "buy milk", true);
    repo.save_task(&original).unwrap();

    assert_eq!(repo.get_task("t1").unwrap(), Some(original));
    assert_eq!(repo.get_task("missing").unwrap(), None);
}

#[test]
fn resaving_updates_in_place_and_keeps_order() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTaskRepository::new(&conn);
    repo.save_task(&task("a", "first", false)).unwrap();
    repo.save_task(&task("b", "second", false)).unwrap();

    repo.save_task(&task("a", "first, edited", true)).unwrap();

    let listed = repo.list_tasks().unwrap();
    let titles: Vec<&str> = listed.iter().map(|task| task.title.as_str()).collect();
    assert_eq!(titles, vec!["first, edited", "second"]);
    assert!(listed[0].is_completed());
}

#[test]
fn set_completed_toggles_and_reports_missing_rows() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTaskRepository::new(&conn);
    repo.save_task(&task("a", "todo", false)).unwrap();

    repo.set_completed("a", true).unwrap();
    assert!(repo.get_task("a").unwrap().unwrap().is_completed());
    repo.set_completed("a", false).unwrap();
    assert!(repo.get_task("a").unwrap().unwrap().is_active());

    match repo.set_completed("nope", true) {
        Err(RepoError::NotFound(id)) => assert_eq!(id, "nope"),
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test]
fn delete_operations_report_what_they_removed() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTaskRepository::new(&conn);
    repo.save_task(&task("a", "active", false)).unwrap();
    repo.save_task(&task("b", "done", true)).unwrap();
    repo.save_task(&task("c", "done too", true)).unwrap();

    assert_eq!(repo.delete_completed().unwrap(), 2);
    assert!(matches!(
        repo.delete_task("b"),
        Err(RepoError::NotFound(_))
    ));
    repo.delete_task("a").unwrap();
    assert!(repo.list_tasks().unwrap().is_empty());
    assert_eq!(repo.delete_all().unwrap(), 0);
}
