#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use todo_core::source::{GetTaskCallback, LoadResult, LoadTasksCallback};
use todo_core::{ObservableValue, SubscriptionHandle, Task, TasksDataSource};

/// Call recorded by [`FakeTasksDataSource`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    GetTasks,
    GetTask(String),
    SaveTask(Task),
    CompleteTask(String),
    ActivateTask(String),
    DeleteTask(String),
    DeleteAllTasks,
    ClearCompletedTasks,
    RefreshTasks,
}

/// Data source that parks callbacks until the test completes them.
#[derive(Default)]
pub struct FakeTasksDataSource {
    calls: RefCell<Vec<Call>>,
    pending_tasks: RefCell<VecDeque<LoadTasksCallback>>,
    pending_task: RefCell<VecDeque<GetTaskCallback>>,
}

impl FakeTasksDataSource {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn saved_tasks(&self) -> Vec<Task> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|call| match call {
                Call::SaveTask(task) => Some(task.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn pending_task_loads(&self) -> usize {
        self.pending_tasks.borrow().len()
    }

    /// Removes the oldest parked `get_tasks` callback.
    pub fn take_tasks_callback(&self) -> LoadTasksCallback {
        self.pending_tasks
            .borrow_mut()
            .pop_front()
            .expect("no pending get_tasks callback")
    }

    /// Completes the oldest parked `get_tasks` request once.
    pub fn complete_tasks(&self, result: LoadResult<Vec<Task>>) {
        let mut callback = self.take_tasks_callback();
        callback(result);
    }

    pub fn complete_task(&self, result: LoadResult<Task>) {
        let mut callback = self
            .pending_task
            .borrow_mut()
            .pop_front()
            .expect("no pending get_task callback");
        callback(result);
    }

    fn record(&self, call: Call) {
        self.calls.borrow_mut().push(call);
    }
}

impl TasksDataSource for FakeTasksDataSource {
    fn get_tasks(&self, callback: LoadTasksCallback) {
        self.record(Call::GetTasks);
        self.pending_tasks.borrow_mut().push_back(callback);
    }

    fn get_task(&self, task_id: &str, callback: GetTaskCallback) {
        self.record(Call::GetTask(task_id.to_string()));
        self.pending_task.borrow_mut().push_back(callback);
    }

    fn save_task(&self, task: &Task) {
        self.record(Call::SaveTask(task.clone()));
    }

    fn complete_task(&self, task: &Task) {
        self.record(Call::CompleteTask(task.id().to_string()));
    }

    fn activate_task(&self, task: &Task) {
        self.record(Call::ActivateTask(task.id().to_string()));
    }

    fn delete_task(&self, task_id: &str) {
        self.record(Call::DeleteTask(task_id.to_string()));
    }

    fn delete_all_tasks(&self) {
        self.record(Call::DeleteAllTasks);
    }

    fn clear_completed_tasks(&self) {
        self.record(Call::ClearCompletedTasks);
    }

    fn refresh_tasks(&self) {
        self.record(Call::RefreshTasks);
    }
}

pub fn as_source(fake: &Rc<FakeTasksDataSource>) -> Rc<dyn TasksDataSource> {
    Rc::clone(fake) as Rc<dyn TasksDataSource>
}

pub fn task(id: &str, title: &str, completed: bool) -> Task {
    Task::with_id(id, title, "")
        .unwrap()
        .with_completed(completed)
}

pub fn ids(tasks: &[Task]) -> Vec<String> {
    tasks.iter().map(|task| task.id().to_string()).collect()
}

/// Records every value `observable` publishes after this call.
pub fn record<T: Clone + 'static>(
    observable: &ObservableValue<T>,
) -> (Rc<RefCell<Vec<T>>>, SubscriptionHandle) {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    let handle = observable.subscribe(move |value: &T| sink.borrow_mut().push(value.clone()));
    (seen, handle)
}

/// Collects the result of one synchronous `get_tasks` call.
pub fn load_now(source: &dyn TasksDataSource) -> Vec<LoadResult<Vec<Task>>> {
    let results = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&results);
    source.get_tasks(Box::new(move |result| sink.borrow_mut().push(result)));
    let collected = results.borrow().clone();
    collected
}

pub fn load_task_now(source: &dyn TasksDataSource, task_id: &str) -> Vec<LoadResult<Task>> {
    let results = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&results);
    source.get_task(task_id, Box::new(move |result| sink.borrow_mut().push(result)));
    let collected = results.borrow().clone();
    collected
}
