//! Observable property propagation core.
//!
//! # Responsibility
//! - Wrap mutable values and sequences in change-notifying containers.
//! - Wire producers to consumers with replay-then-subscribe bindings.
//! - Give consumers explicit handles and scopes for deterministic teardown.
//!
//! # Invariants
//! - Containers are single-threaded (`Rc`/`RefCell`); notification is
//!   synchronous and happens before the mutating call returns.
//! - Subscribers are notified in registration order, on every mutation,
//!   with no equality short-circuit.
//! - Subscribers are removed only by explicit unsubscribe (directly or via
//!   a released [`BindingScope`]).
//! - A panicking subscriber is not caught; it aborts the rest of that
//!   notification pass.

mod binding;
mod collection;
mod properties;
mod subscribers;
mod value;

pub use binding::{bind, bind_collection, bind_property, bind_with, BindingScope};
pub use collection::{CollectionError, ObservableCollection};
pub use properties::{PropertyMap, PropertyValue};
pub(crate) use subscribers::SubscriberList;
pub use subscribers::{ChangeSource, SubscriptionHandle};
pub use value::ObservableValue;
