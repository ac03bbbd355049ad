//! Ordered observable sequence.
//!
//! Every structural mutation (insert, remove, replace, replace-range, move,
//! clear, bulk append) produces exactly one notification carrying the whole
//! current sequence. Consumers replace their view of the data with that
//! snapshot; no diff is ever delivered. Operations that change nothing
//! (appending an empty batch, an out-of-range index) do not notify.

use super::subscribers::{ChangeSource, SubscriberList, SubscriptionHandle};
use std::cell::RefCell;
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};
use std::ops::Range;
use std::rc::Rc;

/// Index-based mutation error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CollectionError {
    IndexOutOfBounds { index: usize, len: usize },
    RangeOutOfBounds { start: usize, end: usize, len: usize },
}

impl Display for CollectionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::IndexOutOfBounds { index, len } => {
                write!(f, "index {index} out of bounds for collection of length {len}")
            }
            Self::RangeOutOfBounds { start, end, len } => write!(
                f,
                "range {start}..{end} out of bounds for collection of length {len}"
            ),
        }
    }
}

impl Error for CollectionError {}

struct CollectionInner<T> {
    items: RefCell<Vec<T>>,
    subscribers: Rc<SubscriberList<[T]>>,
}

/// Shared, change-notifying ordered sequence. Duplicates are allowed.
pub struct ObservableCollection<T> {
    inner: Rc<CollectionInner<T>>,
}

impl<T> Clone for ObservableCollection<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: Clone + 'static> ObservableCollection<T> {
    pub fn new() -> Self {
        Self::from_vec(Vec::new())
    }

    pub fn from_vec(items: Vec<T>) -> Self {
        Self {
            inner: Rc::new(CollectionInner {
                items: RefCell::new(items),
                subscribers: SubscriberList::new(),
            }),
        }
    }

    /// Returns a copy of the current sequence.
    #[must_use]
    pub fn snapshot(&self) -> Vec<T> {
        self.inner.items.borrow().clone()
    }

    pub fn with<R>(&self, f: impl FnOnce(&[T]) -> R) -> R {
        f(&self.inner.items.borrow())
    }

    pub fn get(&self, index: usize) -> Option<T> {
        self.inner.items.borrow().get(index).cloned()
    }

    pub fn len(&self) -> usize {
        self.inner.items.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.items.borrow().is_empty()
    }

    pub fn push(&self, item: T) {
        self.mutate(|items| items.push(item));
    }

    /// Appends every item in one notification. An empty batch is a no-op.
    pub fn extend(&self, batch: impl IntoIterator<Item = T>) {
        let batch: Vec<T> = batch.into_iter().collect();
        if batch.is_empty() {
            return;
        }
        self.mutate(|items| items.extend(batch));
    }

    pub fn insert(&self, index: usize, item: T) -> Result<(), CollectionError> {
        let len = self.len();
        if index > len {
            return Err(CollectionError::IndexOutOfBounds { index, len });
        }
        self.mutate(|items| items.insert(index, item));
        Ok(())
    }

    pub fn remove(&self, index: usize) -> Result<T, CollectionError> {
        self.check_index(index)?;
        Ok(self.mutate(|items| items.remove(index)))
    }

    /// Replaces the item at `index`, returning the previous one.
    pub fn replace(&self, index: usize, item: T) -> Result<T, CollectionError> {
        self.check_index(index)?;
        Ok(self.mutate(|items| std::mem::replace(&mut items[index], item)))
    }

    /// Replaces `range` with `replacement` (lengths may differ).
    pub fn replace_range(
        &self,
        range: Range<usize>,
        replacement: impl IntoIterator<Item = T>,
    ) -> Result<(), CollectionError> {
        let len = self.len();
        if range.start > range.end || range.end > len {
            return Err(CollectionError::RangeOutOfBounds {
                start: range.start,
                end: range.end,
                len,
            });
        }
        let replacement: Vec<T> = replacement.into_iter().collect();
        self.mutate(|items| {
            items.splice(range, replacement);
        });
        Ok(())
    }

    /// Moves the item at `from` so that it ends up at index `to`.
    pub fn move_item(&self, from: usize, to: usize) -> Result<(), CollectionError> {
        self.check_index(from)?;
        self.check_index(to)?;
        self.mutate(|items| {
            let item = items.remove(from);
            items.insert(to, item);
        });
        Ok(())
    }

    /// Removes every item. Notifies even when already empty.
    pub fn clear(&self) {
        self.mutate(Vec::clear);
    }

    /// Replaces the whole content in a single notification.
    pub fn replace_all(&self, items: impl IntoIterator<Item = T>) {
        let items: Vec<T> = items.into_iter().collect();
        self.mutate(|current| *current = items);
    }

    /// Registers `callback` for future changes. Does not call it now.
    pub fn subscribe(&self, callback: impl Fn(&[T]) + 'static) -> SubscriptionHandle {
        self.inner.subscribers.add(Rc::new(callback))
    }

    /// Registers `callback` and calls it with the current sequence first.
    pub fn bind_now(&self, callback: impl Fn(&[T]) + 'static) -> SubscriptionHandle {
        let callback: Rc<dyn Fn(&[T])> = Rc::new(callback);
        let handle = self.inner.subscribers.add(Rc::clone(&callback));
        let current = self.snapshot();
        callback(&current);
        handle
    }

    pub fn unsubscribe(&self, handle: &SubscriptionHandle) -> bool {
        self.inner.subscribers.remove_handle(handle)
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.subscribers.len()
    }

    fn check_index(&self, index: usize) -> Result<(), CollectionError> {
        let len = self.len();
        if index >= len {
            return Err(CollectionError::IndexOutOfBounds { index, len });
        }
        Ok(())
    }

    fn mutate<R>(&self, f: impl FnOnce(&mut Vec<T>) -> R) -> R {
        let (result, snapshot) = {
            let mut items = self.inner.items.borrow_mut();
            let result = f(&mut items);
            (result, items.clone())
        };
        self.inner.subscribers.notify(&snapshot);
        result
    }
}

impl<T: Clone + 'static> Default for ObservableCollection<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + 'static> ChangeSource for ObservableCollection<T> {
    fn subscribe_changes(&self, callback: Rc<dyn Fn()>) -> SubscriptionHandle {
        self.subscribe(move |_| callback())
    }
}

impl<T: Debug + 'static> Debug for ObservableCollection<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObservableCollection")
            .field("items", &*self.inner.items.borrow())
            .field("subscribers", &self.inner.subscribers.len())
            .finish()
    }
}
