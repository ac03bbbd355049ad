//! Replay-then-subscribe wiring from observables to consumer setters.
//!
//! Every helper calls the setter once with the current value before it
//! returns, then again after every change. Binding the same producer twice
//! yields two independent bindings that fire in registration order.
//!
//! # Usage
//!
//! ```
//! use todo_core::observable::{bind_with, BindingScope, ObservableValue};
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! let loading = ObservableValue::new(false);
//! let label = Rc::new(RefCell::new(String::new()));
//!
//! let mut scope = BindingScope::new();
//! let sink = Rc::clone(&label);
//! scope.hold(bind_with(
//!     move |text: String| *sink.borrow_mut() = text,
//!     &loading,
//!     |busy: &bool| if *busy { "Loading".to_string() } else { "Ready".to_string() },
//! ));
//! assert_eq!(*label.borrow(), "Ready");
//!
//! loading.set(true);
//! assert_eq!(*label.borrow(), "Loading");
//!
//! scope.release();
//! loading.set(false);
//! assert_eq!(*label.borrow(), "Loading");
//! ```

use super::collection::ObservableCollection;
use super::subscribers::{ChangeSource, SubscriptionHandle};
use super::value::ObservableValue;
use std::cell::RefCell;
use std::fmt::{Debug, Formatter};
use std::rc::Rc;

/// Binds `setter` to `observable`.
pub fn bind<T: Clone + 'static>(
    setter: impl Fn(T) + 'static,
    observable: &ObservableValue<T>,
) -> SubscriptionHandle {
    observable.bind_now(move |value| setter(value.clone()))
}

/// Binds `setter` to `observable` through `converter`.
pub fn bind_with<T: Clone + 'static, U>(
    setter: impl Fn(U) + 'static,
    observable: &ObservableValue<T>,
    converter: impl Fn(&T) -> U + 'static,
) -> SubscriptionHandle {
    observable.bind_now(move |value| setter(converter(value)))
}

/// Binds a shared property slot so it always mirrors `observable`.
pub fn bind_property<T: Clone + 'static>(
    target: &Rc<RefCell<T>>,
    observable: &ObservableValue<T>,
) -> SubscriptionHandle {
    let target = Rc::clone(target);
    observable.bind_now(move |value| *target.borrow_mut() = value.clone())
}

/// Binds `setter` to the whole content of `collection`.
pub fn bind_collection<T: Clone + 'static>(
    setter: impl Fn(&[T]) + 'static,
    collection: &ObservableCollection<T>,
) -> SubscriptionHandle {
    collection.bind_now(setter)
}

/// Subscription handles owned by one consumer (a screen, a row, a view).
///
/// Call [`release`](Self::release) from the consumer's teardown hook, or let
/// the scope drop; afterwards none of its callbacks fire again.
///
/// # Invariants
/// - Handles are released in reverse registration order.
/// - `len()` counts handles currently held.
#[derive(Default)]
pub struct BindingScope {
    handles: Vec<SubscriptionHandle>,
}

impl BindingScope {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes ownership of `handle` until the scope is released.
    pub fn hold(&mut self, handle: SubscriptionHandle) -> &mut Self {
        self.handles.push(handle);
        self
    }

    /// Binds `setter` to `observable` within this scope.
    pub fn bind<T: Clone + 'static>(
        &mut self,
        setter: impl Fn(T) + 'static,
        observable: &ObservableValue<T>,
    ) -> &mut Self {
        self.hold(bind(setter, observable))
    }

    /// Binds `setter` to `collection` within this scope.
    pub fn bind_collection<T: Clone + 'static>(
        &mut self,
        setter: impl Fn(&[T]) + 'static,
        collection: &ObservableCollection<T>,
    ) -> &mut Self {
        self.hold(bind_collection(setter, collection))
    }

    /// Calls `callback` whenever any of `sources` changes. Does not replay.
    pub fn watch(
        &mut self,
        sources: &[&dyn ChangeSource],
        callback: impl Fn() + 'static,
    ) -> &mut Self {
        let callback: Rc<dyn Fn()> = Rc::new(callback);
        for source in sources {
            let handle = source.subscribe_changes(Rc::clone(&callback));
            self.handles.push(handle);
        }
        self
    }

    /// Releases every held subscription. The scope can be reused afterwards.
    pub fn release(&mut self) {
        while let Some(handle) = self.handles.pop() {
            handle.unsubscribe();
        }
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }
}

impl Drop for BindingScope {
    fn drop(&mut self) {
        self.release();
    }
}

impl Debug for BindingScope {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BindingScope")
            .field("handles", &self.handles.len())
            .finish()
    }
}
