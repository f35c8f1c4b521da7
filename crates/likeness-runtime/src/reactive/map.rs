//! Fixed-shape aggregate of named child observables.
//!
//! A map never changes after construction and has no listeners of its own:
//! change notification happens in the children. It only routes lookups by
//! field name.

use std::fmt;
use std::rc::Rc;

use super::observable::Observable;

/// Named child observables in declaration order.
///
/// Cloning creates a new handle to the same children.
#[derive(Clone)]
pub struct ObservableMap {
    fields: Rc<[(String, Observable)]>,
}

impl ObservableMap {
    /// Build a map from `(name, observable)` pairs.
    ///
    /// Declaration order is kept. A repeated name replaces the earlier child
    /// in its original position.
    pub fn new<N: Into<String>>(fields: impl IntoIterator<Item = (N, Observable)>) -> Self {
        let mut ordered: Vec<(String, Observable)> = Vec::new();
        for (name, child) in fields {
            let name = name.into();
            if let Some(slot) = ordered.iter_mut().find(|(n, _)| *n == name) {
                slot.1 = child;
            } else {
                ordered.push((name, child));
            }
        }
        Self {
            fields: ordered.into(),
        }
    }

    /// The child registered under `name`. A miss is `None`, not an error.
    #[must_use]
    pub fn get_value(&self, name: &str) -> Option<&Observable> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, child)| child)
    }

    /// Field names in declaration order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(n, _)| n.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Observable)> {
        self.fields.iter().map(|(n, child)| (n.as_str(), child))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.fields, &other.fields)
    }
}

impl fmt::Debug for ObservableMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.fields.iter().map(|(n, child)| (n, child)))
            .finish()
    }
}
