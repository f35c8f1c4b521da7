#![forbid(unsafe_code)]

//! In-memory DOM boundary for Likeness.
//!
//! Templates render into this tree instead of a browser document. It offers
//! exactly what the binding layer consumes from a DOM:
//!
//! - [`Node`]: element handles with id, classes, attributes, text and an input
//!   value, deep cloning and simple selector queries;
//! - ownership-checked [`Node::append_child`];
//! - [`Event`]s of kind [`EventKind::Change`] and [`EventKind::Click`], plus
//!   helpers that simulate a user committing input or clicking;
//! - deterministic HTML serialization for inspection and tests.
//!
//! Everything is single-threaded (`Rc`/`RefCell`).

pub mod error;
pub mod event;
mod html;
pub mod node;
pub mod selector;

pub use error::DomError;
pub use event::{Event, EventKind};
pub use node::{Node, WeakNode};
pub use selector::Selector;
