//! Single-value observable cell.

use super::subscribers::{ChangeSource, SubscriberList, SubscriptionHandle};
use std::cell::RefCell;
use std::fmt::{Debug, Formatter};
use std::rc::Rc;

struct ValueInner<T> {
    value: RefCell<T>,
    subscribers: Rc<SubscriberList<T>>,
}

/// Shared, change-notifying value cell.
///
/// Cloning yields another handle to the same cell. Every `set` notifies,
/// including one that stores a value equal to the current one.
pub struct ObservableValue<T> {
    inner: Rc<ValueInner<T>>,
}

impl<T> Clone for ObservableValue<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: Clone + 'static> ObservableValue<T> {
    pub fn new(value: T) -> Self {
        Self {
            inner: Rc::new(ValueInner {
                value: RefCell::new(value),
                subscribers: SubscriberList::new(),
            }),
        }
    }

    /// Returns a clone of the current value.
    #[must_use]
    pub fn get(&self) -> T {
        self.inner.value.borrow().clone()
    }

    /// Reads the current value without cloning it.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.inner.value.borrow())
    }

    /// Stores `value` and synchronously notifies every subscriber in
    /// registration order before returning.
    ///
    /// A panicking subscriber aborts the remaining notifications and the
    /// panic reaches the caller; the new value stays stored. A subscriber
    /// that calls `set` on this cell recurses synchronously.
    pub fn set(&self, value: T) {
        *self.inner.value.borrow_mut() = value.clone();
        self.inner.subscribers.notify(&value);
    }

    /// Mutates the value in place, then notifies like [`set`](Self::set).
    pub fn update(&self, f: impl FnOnce(&mut T)) {
        let snapshot = {
            let mut value = self.inner.value.borrow_mut();
            f(&mut value);
            value.clone()
        };
        self.inner.subscribers.notify(&snapshot);
    }

    /// Registers `callback` for future changes. Does not call it now.
    pub fn subscribe(&self, callback: impl Fn(&T) + 'static) -> SubscriptionHandle {
        self.inner.subscribers.add(Rc::new(callback))
    }

    /// Registers `callback` and calls it with the current value before
    /// returning.
    pub fn bind_now(&self, callback: impl Fn(&T) + 'static) -> SubscriptionHandle {
        let callback: Rc<dyn Fn(&T)> = Rc::new(callback);
        let handle = self.inner.subscribers.add(Rc::clone(&callback));
        let current = self.get();
        callback(&current);
        handle
    }

    /// Removes a callback registered on this cell. Idempotent; handles
    /// issued by other producers are ignored.
    pub fn unsubscribe(&self, handle: &SubscriptionHandle) -> bool {
        self.inner.subscribers.remove_handle(handle)
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.subscribers.len()
    }
}

impl<T: Clone + Default + 'static> Default for ObservableValue<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: Clone + 'static> ChangeSource for ObservableValue<T> {
    fn subscribe_changes(&self, callback: Rc<dyn Fn()>) -> SubscriptionHandle {
        self.subscribe(move |_| callback())
    }
}

impl<T: Debug + 'static> Debug for ObservableValue<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObservableValue")
            .field("value", &*self.inner.value.borrow())
            .field("subscribers", &self.inner.subscribers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::ObservableValue;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn recorder<T: Clone + 'static>() -> (Rc<RefCell<Vec<T>>>, impl Fn(&T) + 'static) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        (seen, move |value: &T| sink.borrow_mut().push(value.clone()))
    }

    #[test]
    fn set_notifies_even_when_value_is_unchanged() {
        let cell = ObservableValue::new(1);
        let (seen, callback) = recorder::<i32>();
        cell.subscribe(callback);

        cell.set(1);
        cell.set(1);
        cell.set(2);
        assert_eq!(*seen.borrow(), vec![1, 1, 2]);
        assert_eq!(cell.get(), 2);
    }

    #[test]
    fn subscribe_does_not_replay_but_bind_now_does() {
        let cell = ObservableValue::new("a".to_string());
        let (lazy, lazy_cb) = recorder::<String>();
        let (eager, eager_cb) = recorder::<String>();
        cell.subscribe(lazy_cb);
        cell.bind_now(eager_cb);

        assert!(lazy.borrow().is_empty());
        assert_eq!(*eager.borrow(), vec!["a".to_string()]);
    }

    #[test]
    fn unsubscribe_is_idempotent_and_scoped_to_its_producer() {
        let a = ObservableValue::new(0);
        let b = ObservableValue::new(0);
        let (seen, callback) = recorder::<i32>();
        let handle = a.subscribe(callback);

        assert!(!b.unsubscribe(&handle));
        assert!(a.unsubscribe(&handle));
        assert!(!a.unsubscribe(&handle));
        assert!(!handle.unsubscribe());

        a.set(5);
        assert!(seen.borrow().is_empty());
        assert_eq!(a.subscriber_count(), 0);
    }

    #[test]
    fn update_mutates_in_place_and_notifies_once() {
        let cell = ObservableValue::new(vec![1]);
        let (seen, callback) = recorder::<Vec<i32>>();
        cell.subscribe(callback);
        cell.update(|v| v.push(2));
        assert_eq!(*seen.borrow(), vec![vec![1, 2]]);
    }

    #[test]
    fn subscriber_may_set_the_same_cell_recursively() {
        let cell = ObservableValue::new(0);
        let inner = cell.clone();
        cell.subscribe(move |v| {
            if *v < 3 {
                inner.set(v + 1);
            }
        });
        cell.set(1);
        assert_eq!(cell.get(), 3);
    }

    #[test]
    fn handle_outliving_producer_is_harmless() {
        let handle = {
            let cell = ObservableValue::new(0);
            cell.subscribe(|_| {})
        };
        assert!(!handle.is_producer_alive());
        assert!(!handle.unsubscribe());
    }

    #[test]
    fn debug_shows_value_and_subscriber_count() {
        let cell = ObservableValue::new(String::from("draft"));
        let _handle = cell.subscribe(|_| {});

        let rendered = format!("{cell:?}");
        assert!(rendered.contains("\"draft\""));
        assert!(rendered.contains("subscribers: 1"));
    }
}
