#![forbid(unsafe_code)]

//! Observable data model for Likeness.
//!
//! This module provides the change-propagation primitives templates bind to:
//!
//! - [`ObservableValue`]: a scalar cell that notifies listeners on every
//!   applied value.
//! - [`ObservableMap`]: a fixed set of named child observables (struct
//!   fields). It routes lookups and has no listeners of its own.
//! - [`ObservableArray`]: an append-only list of child observables whose
//!   listeners get a replay of existing elements on registration.
//! - [`Observable`]: one handle over the three kinds.
//!
//! # Architecture
//!
//! Every container is an `Rc`-shared handle for single-threaded use. Listener
//! lists are snapshotted before dispatch, so callbacks can read or mutate the
//! model without tripping `RefCell` borrow checks.
//!
//! # Invariants
//!
//! 1. All notification is synchronous: every listener for a change has run
//!    before the triggering call returns.
//! 2. Listeners are notified in registration order and never removed.
//! 3. A value listener sees only updates applied after it registered; an
//!    array listener sees every element, replayed or live, exactly once.
//! 4. Map shapes never change after construction.

pub mod array;
#[cfg(feature = "serde")]
mod json;
pub mod map;
pub mod observable;
pub mod scalar;
pub mod value;

pub use array::ObservableArray;
pub use map::ObservableMap;
pub use observable::{Observable, ObservableKind};
pub use scalar::Scalar;
pub use value::{ChangeEvent, ObservableValue};
