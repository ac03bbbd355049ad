//! Ordered subscriber registry shared by every observable container.
//!
//! # Invariants
//! - Callbacks run in registration order.
//! - A notification pass works on a snapshot of the registry: callbacks
//!   added or removed during the pass take effect from the next pass.
//! - No registry borrow is held while a callback runs, so callbacks may
//!   subscribe, unsubscribe or mutate the producer (recursively).

use std::cell::{Cell, RefCell};
use std::fmt::{Debug, Formatter};
use std::rc::{Rc, Weak};
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_REGISTRY_ID: AtomicU64 = AtomicU64::new(1);

/// Type-erased removal hook, so handles do not carry the producer's type.
pub(crate) trait Unsubscribe {
    fn remove(&self, subscription_id: u64) -> bool;
}

pub(crate) struct SubscriberList<A: ?Sized> {
    registry_id: u64,
    next_subscription_id: Cell<u64>,
    entries: RefCell<Vec<(u64, Rc<dyn Fn(&A)>)>>,
}

impl<A: ?Sized + 'static> SubscriberList<A> {
    pub(crate) fn new() -> Rc<Self> {
        Rc::new(Self {
            registry_id: NEXT_REGISTRY_ID.fetch_add(1, Ordering::Relaxed),
            next_subscription_id: Cell::new(1),
            entries: RefCell::new(Vec::new()),
        })
    }

    pub(crate) fn add(self: &Rc<Self>, callback: Rc<dyn Fn(&A)>) -> SubscriptionHandle {
        let subscription_id = self.next_subscription_id.get();
        self.next_subscription_id.set(subscription_id + 1);
        self.entries.borrow_mut().push((subscription_id, callback));

        let registry: Rc<dyn Unsubscribe> = self.clone();
        SubscriptionHandle {
            registry_id: self.registry_id,
            subscription_id,
            registry: Rc::downgrade(&registry),
        }
    }

    /// Removes `handle` if it was issued by this registry.
    pub(crate) fn remove_handle(&self, handle: &SubscriptionHandle) -> bool {
        handle.registry_id == self.registry_id && self.remove(handle.subscription_id)
    }

    pub(crate) fn notify(&self, arg: &A) {
        let callbacks: Vec<Rc<dyn Fn(&A)>> = self
            .entries
            .borrow()
            .iter()
            .map(|(_, callback)| Rc::clone(callback))
            .collect();
        for callback in callbacks {
            callback(arg);
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.borrow().len()
    }
}

impl<A: ?Sized> Unsubscribe for SubscriberList<A> {
    fn remove(&self, subscription_id: u64) -> bool {
        let mut entries = self.entries.borrow_mut();
        let before = entries.len();
        entries.retain(|(id, _)| *id != subscription_id);
        entries.len() != before
    }
}

/// Token for one registered callback.
///
/// Dropping a handle does not unsubscribe; release it explicitly with
/// [`SubscriptionHandle::unsubscribe`] or hand it to a
/// [`BindingScope`](super::BindingScope) that releases on teardown.
pub struct SubscriptionHandle {
    registry_id: u64,
    subscription_id: u64,
    registry: Weak<dyn Unsubscribe>,
}

impl SubscriptionHandle {
    /// Removes the callback. Returns `false` when it was already removed or
    /// the producer no longer exists. Safe to call any number of times.
    pub fn unsubscribe(&self) -> bool {
        match self.registry.upgrade() {
            Some(registry) => registry.remove(self.subscription_id),
            None => false,
        }
    }

    /// Whether the producer is still alive. Says nothing about whether the
    /// callback is still registered.
    pub fn is_producer_alive(&self) -> bool {
        self.registry.strong_count() > 0
    }
}

impl Debug for SubscriptionHandle {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubscriptionHandle")
            .field("registry_id", &self.registry_id)
            .field("subscription_id", &self.subscription_id)
            .finish()
    }
}

/// Type-erased change notification.
///
/// Lets a consumer react to "something changed" on any producer without
/// knowing its element type.
pub trait ChangeSource {
    fn subscribe_changes(&self, callback: Rc<dyn Fn()>) -> SubscriptionHandle;
}
