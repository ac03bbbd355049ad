mod common;

use common::{as_source, record, task, FakeTasksDataSource};
use std::sync::Arc;
use todo_core::viewmodel::{StatisticsProperty, StatisticsViewModel};
use todo_core::{BusyCounter, DataNotAvailable};

#[test]
fn counts_active_and_completed_tasks() {
    let fake = FakeTasksDataSource::new();
    let busy = Arc::new(BusyCounter::new());
    let vm = StatisticsViewModel::with_busy_counter(as_source(&fake), Arc::clone(&busy));
    assert!(vm.is_empty());
    assert_eq!(vm.properties().get_bool(StatisticsProperty::Empty), Some(true));
    let (loading, _handle) = record(vm.data_loading());

    vm.start();
    assert_eq!(busy.count(), 1);
    fake.complete_tasks(Ok(vec![
        task("a", "", false),
        task("b", "", true),
        task("c", "", true),
    ]));

    assert_eq!(vm.number_of_active_tasks(), 1);
    assert_eq!(vm.number_of_completed_tasks(), 2);
    assert_eq!(
        vm.properties().get_count(StatisticsProperty::CompletedTasks),
        Some(2)
    );
    assert_eq!(vm.properties().get_bool(StatisticsProperty::Empty), Some(false));
    assert_eq!(*loading.borrow(), vec![true, false]);
    assert!(!vm.error().get());
    assert!(busy.is_idle());
}

#[test]
fn unavailable_data_sets_error_and_settles() {
    let fake = FakeTasksDataSource::new();
    let busy = Arc::new(BusyCounter::new());
    let vm = StatisticsViewModel::with_busy_counter(as_source(&fake), Arc::clone(&busy));

    vm.load_statistics();
    fake.complete_tasks(Err(DataNotAvailable));

    assert!(vm.error().get());
    assert!(!vm.data_loading().get());
    assert!(busy.is_idle());
    assert!(vm.is_empty());
}
