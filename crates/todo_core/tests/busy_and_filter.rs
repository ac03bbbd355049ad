use proptest::prelude::*;
use std::sync::Arc;
use std::thread;
use todo_core::{filter_tasks, BusyCounter, FilterType, Task};

fn task_strategy() -> impl Strategy<Value = Task> {
    ("[a-z]{0,6}", any::<bool>()).prop_map(|(title, completed)| {
        Task::new(title, "").with_completed(completed)
    })
}

proptest! {
    #[test]
    fn busy_counter_never_goes_negative(ops in prop::collection::vec(any::<bool>(), 0..64)) {
        let counter = BusyCounter::new();
        let mut model = 0usize;

        for increment in ops {
            if increment {
                counter.increment();
                model += 1;
            } else {
                let decremented = counter.decrement();
                prop_assert_eq!(decremented, model > 0);
                model = model.saturating_sub(1);
            }
            prop_assert_eq!(counter.count(), model);
        }
    }

    #[test]
    fn filters_partition_tasks_in_order(tasks in prop::collection::vec(task_strategy(), 0..20)) {
        prop_assert_eq!(filter_tasks(FilterType::All, &tasks), tasks.clone());

        let active = filter_tasks(FilterType::Active, &tasks);
        let completed = filter_tasks(FilterType::Completed, &tasks);
        prop_assert!(active.iter().all(Task::is_active));
        prop_assert!(completed.iter().all(Task::is_completed));
        prop_assert_eq!(active.len() + completed.len(), tasks.len());

        let expected_active: Vec<Task> = tasks.iter().filter(|task| !task.completed).cloned().collect();
        prop_assert_eq!(active, expected_active);
    }
}

#[test]
fn increment_decrement_decrement_rests_at_zero() {
    let counter = BusyCounter::new();
    counter.increment();
    counter.decrement();
    counter.decrement();
    assert_eq!(counter.count(), 0);
    assert!(counter.is_idle());
}

#[test]
fn counter_is_readable_and_settles_across_threads() {
    let counter = Arc::new(BusyCounter::new());
    let workers: Vec<_> = (0..4)
        .map(|_| {
            let counter = Arc::clone(&counter);
            thread::spawn(move || {
                for _ in 0..100 {
                    counter.increment();
                    counter.decrement();
                    counter.decrement();
                }
            })
        })
        .collect();
    for worker in workers {
        worker.join().unwrap();
    }
    assert_eq!(counter.count(), 0);
}
