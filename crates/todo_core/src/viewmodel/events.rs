//! One-shot screen events (navigation requests).
//!
//! # Invariants
//! - Events carry no current value: a subscriber only sees events emitted
//!   after it subscribed.
//! - An event emitted with no subscriber is dropped.

use crate::observable::{SubscriberList, SubscriptionHandle};
use log::debug;
use std::fmt::{Debug, Formatter};
use std::rc::Rc;

/// Requests raised by the task list screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TasksEvent {
    AddNewTask,
    OpenTask(String),
}

/// Requests raised by the task detail screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskDetailEvent {
    Deleted,
    EditRequested,
}

/// Requests raised by the add/edit screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddEditEvent {
    Saved,
}

/// Outcome reported back to the task list by another screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenResult {
    Edited,
    Added,
    Deleted,
}

/// Ordered event delivery for one screen.
pub struct EventChannel<E> {
    subscribers: Rc<SubscriberList<E>>,
}

impl<E> Clone for EventChannel<E> {
    fn clone(&self) -> Self {
        Self {
            subscribers: Rc::clone(&self.subscribers),
        }
    }
}

impl<E: Debug + 'static> EventChannel<E> {
    pub fn new() -> Self {
        Self {
            subscribers: SubscriberList::new(),
        }
    }

    pub fn subscribe(&self, callback: impl Fn(&E) + 'static) -> SubscriptionHandle {
        self.subscribers.add(Rc::new(callback))
    }

    pub fn unsubscribe(&self, handle: &SubscriptionHandle) -> bool {
        self.subscribers.remove_handle(handle)
    }

    pub fn emit(&self, event: E) {
        if self.subscribers.len() == 0 {
            debug!("event=screen_event module=viewmodel status=dropped kind={event:?}");
            return;
        }
        self.subscribers.notify(&event);
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

impl<E: Debug + 'static> Default for EventChannel<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Debug for EventChannel<E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventChannel").finish_non_exhaustive()
    }
}
