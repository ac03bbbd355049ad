//! Explicit derived-property map.
//!
//! A view-model enumerates its derived properties as `{key: value}` pairs and
//! calls [`PropertyMap::refresh`] after each relevant mutation. Consumers bind
//! per key; nothing is discovered by reflection.
//!
//! # Invariants
//! - `refresh` replaces the whole map and notifies once, even when no value
//!   changed.
//! - A key that was never refreshed reads as `None`.

use super::subscribers::{ChangeSource, SubscriptionHandle};
use super::value::ObservableValue;
use std::collections::BTreeMap;
use std::fmt::Debug;
use std::rc::Rc;

/// Value of one derived property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyValue {
    Bool(bool),
    Count(usize),
    Text(String),
}

impl PropertyValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_count(&self) -> Option<usize> {
        match self {
            Self::Count(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(value) => Some(value),
            _ => None,
        }
    }
}

/// Observable map of derived properties keyed by a view-model specific enum.
#[derive(Debug)]
pub struct PropertyMap<K: Ord + Copy + 'static> {
    entries: ObservableValue<BTreeMap<K, PropertyValue>>,
}

impl<K: Ord + Copy + 'static> Clone for PropertyMap<K> {
    fn clone(&self) -> Self {
        Self {
            entries: self.entries.clone(),
        }
    }
}

impl<K: Ord + Copy + Debug + 'static> PropertyMap<K> {
    pub fn new() -> Self {
        Self {
            entries: ObservableValue::new(BTreeMap::new()),
        }
    }

    /// Replaces every entry with `entries` and notifies subscribers.
    pub fn refresh(&self, entries: impl IntoIterator<Item = (K, PropertyValue)>) {
        self.entries.set(entries.into_iter().collect());
    }

    pub fn get(&self, key: K) -> Option<PropertyValue> {
        self.entries.with(|entries| entries.get(&key).cloned())
    }

    pub fn get_bool(&self, key: K) -> Option<bool> {
        self.entries
            .with(|entries| entries.get(&key).and_then(PropertyValue::as_bool))
    }

    pub fn get_count(&self, key: K) -> Option<usize> {
        self.entries
            .with(|entries| entries.get(&key).and_then(PropertyValue::as_count))
    }

    pub fn get_text(&self, key: K) -> Option<String> {
        self.entries.with(|entries| {
            entries
                .get(&key)
                .and_then(PropertyValue::as_text)
                .map(str::to_string)
        })
    }

    /// Current `{key: value}` pairs.
    pub fn snapshot(&self) -> BTreeMap<K, PropertyValue> {
        self.entries.get()
    }

    /// Replay-then-follow binding of one key.
    pub fn bind_key(
        &self,
        key: K,
        setter: impl Fn(Option<&PropertyValue>) + 'static,
    ) -> SubscriptionHandle {
        self.entries
            .bind_now(move |entries| setter(entries.get(&key)))
    }

    /// Subscribes to every refresh with the full map.
    pub fn subscribe(
        &self,
        callback: impl Fn(&BTreeMap<K, PropertyValue>) + 'static,
    ) -> SubscriptionHandle {
        self.entries.subscribe(callback)
    }

    pub fn unsubscribe(&self, handle: &SubscriptionHandle) -> bool {
        self.entries.unsubscribe(handle)
    }
}

impl<K: Ord + Copy + Debug + 'static> Default for PropertyMap<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord + Copy + Debug + 'static> ChangeSource for PropertyMap<K> {
    fn subscribe_changes(&self, callback: Rc<dyn Fn()>) -> SubscriptionHandle {
        self.entries.subscribe_changes(callback)
    }
}

#[cfg(test)]
mod tests {
    use super::{PropertyMap, PropertyValue};
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
    enum Key {
        Empty,
        Count,
    }

    #[test]
    fn refresh_replaces_all_entries() {
        let map = PropertyMap::new();
        map.refresh([
            (Key::Empty, PropertyValue::Bool(true)),
            (Key::Count, PropertyValue::Count(0)),
        ]);
        map.refresh([(Key::Count, PropertyValue::Count(3))]);

        assert_eq!(map.get_bool(Key::Empty), None);
        assert_eq!(map.get_count(Key::Count), Some(3));
        assert_eq!(map.get_text(Key::Count), None);
    }

    #[test]
    fn bind_key_replays_and_follows_every_refresh() {
        let map = PropertyMap::new();
        map.refresh([(Key::Empty, PropertyValue::Bool(true))]);

        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        map.bind_key(Key::Empty, move |value| {
            sink.borrow_mut()
                .push(value.and_then(PropertyValue::as_bool))
        });

        map.refresh([(Key::Empty, PropertyValue::Bool(true))]);
        map.refresh([(Key::Empty, PropertyValue::Bool(false))]);
        assert_eq!(*seen.borrow(), vec![Some(true), Some(true), Some(false)]);
    }
}
