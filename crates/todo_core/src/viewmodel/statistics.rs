//! Statistics screen view-model.

use crate::busy::BusyCounter;
use crate::model::task::Task;
use crate::observable::{ObservableValue, PropertyMap, PropertyValue};
use crate::source::{LoadResult, TasksDataSource};
use log::{debug, info, warn};
use std::cell::Cell;
use std::rc::{Rc, Weak};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum StatisticsProperty {
    ActiveTasks,
    CompletedTasks,
    Empty,
}

struct StatisticsState {
    source: Rc<dyn TasksDataSource>,
    busy: Arc<BusyCounter>,
    data_loading: ObservableValue<bool>,
    error: ObservableValue<bool>,
    active: Cell<usize>,
    completed: Cell<usize>,
    properties: PropertyMap<StatisticsProperty>,
}

impl StatisticsState {
    fn on_tasks_loaded(&self, result: LoadResult<Vec<Task>>) {
        self.busy.decrement();
        match result {
            Ok(tasks) => {
                let completed = tasks.iter().filter(|task| task.is_completed()).count();
                self.active.set(tasks.len() - completed);
                self.completed.set(completed);
                info!(
                    "event=statistics_load module=viewmodel.statistics status=ok active={} completed={}",
                    tasks.len() - completed,
                    completed
                );
                self.refresh_properties();
                self.data_loading.set(false);
                self.error.set(false);
            }
            Err(err) => {
                warn!("event=statistics_load module=viewmodel.statistics status=error error={err}");
                self.error.set(true);
                self.data_loading.set(false);
            }
        }
    }

    fn refresh_properties(&self) {
        let (active, completed) = (self.active.get(), self.completed.get());
        self.properties.refresh([
            (StatisticsProperty::ActiveTasks, PropertyValue::Count(active)),
            (
                StatisticsProperty::CompletedTasks,
                PropertyValue::Count(completed),
            ),
            (
                StatisticsProperty::Empty,
                PropertyValue::Bool(active + completed == 0),
            ),
        ]);
    }
}

pub struct StatisticsViewModel {
    state: Rc<StatisticsState>,
}

impl StatisticsViewModel {
    pub fn new(source: Rc<dyn TasksDataSource>) -> Self {
        Self::with_busy_counter(source, BusyCounter::global())
    }

    pub fn with_busy_counter(source: Rc<dyn TasksDataSource>, busy: Arc<BusyCounter>) -> Self {
        let state = Rc::new(StatisticsState {
            source,
            busy,
            data_loading: ObservableValue::new(false),
            error: ObservableValue::new(false),
            active: Cell::new(0),
            completed: Cell::new(0),
            properties: PropertyMap::new(),
        });
        state.refresh_properties();
        Self { state }
    }

    pub fn start(&self) {
        self.load_statistics();
    }

    pub fn load_statistics(&self) {
        let state = &self.state;
        state.data_loading.set(true);
        state.busy.increment();

        let weak: Weak<StatisticsState> = Rc::downgrade(state);
        let busy = Arc::clone(&state.busy);
        state.source.get_tasks(Box::new(move |result| match weak.upgrade() {
            Some(state) => state.on_tasks_loaded(result),
            None => {
                busy.decrement();
                debug!("event=statistics_load module=viewmodel.statistics status=dropped reason=released");
            }
        }));
    }

    pub fn number_of_active_tasks(&self) -> usize {
        self.state.active.get()
    }

    pub fn number_of_completed_tasks(&self) -> usize {
        self.state.completed.get()
    }

    pub fn is_empty(&self) -> bool {
        self.number_of_active_tasks() + self.number_of_completed_tasks() == 0
    }

    pub fn data_loading(&self) -> &ObservableValue<bool> {
        &self.state.data_loading
    }

    pub fn error(&self) -> &ObservableValue<bool> {
        &self.state.error
    }

    pub fn properties(&self) -> &PropertyMap<StatisticsProperty> {
        &self.state.properties
    }
}
