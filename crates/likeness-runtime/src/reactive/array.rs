#![forbid(unsafe_code)]

//! Append-only list of child observables with late-join replay.
//!
//! # Invariants
//!
//! 1. The element sequence only grows; there is no removal or reordering.
//! 2. `add_element` delivers the new element to every listener registered
//!    before the call, synchronously, in registration order.
//! 3. `register` replays every existing element to the new listener, in
//!    sequence order, before adding it to the listener list. A listener
//!    therefore sees each element exactly once, whether it joined early or
//!    late.
//! 4. The declared element type is informational; elements are not checked
//!    against it.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | Listener panics during `add_element` | Listener bug | Element is already stored; later listeners skip it |
//! | Listener panics during replay | Listener bug | Listener is never registered |
//! | Element added from inside a replay | Re-entrant caller | Delivered to existing listeners only; the replaying listener misses it |

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use super::observable::Observable;
use crate::type_name::TypeName;

type ElementListener = Rc<dyn Fn(&Observable)>;

struct ArrayInner {
    element_type: TypeName,
    elements: Vec<Observable>,
    listeners: Vec<ElementListener>,
}

/// Growable ordered list of homogeneous child observables.
///
/// Cloning creates a new handle to the same list.
#[derive(Clone)]
pub struct ObservableArray {
    inner: Rc<RefCell<ArrayInner>>,
}

impl ObservableArray {
    /// Create an empty array declared to hold `element_type` observables.
    #[must_use]
    pub fn new(element_type: impl Into<TypeName>) -> Self {
        Self {
            inner: Rc::new(RefCell::new(ArrayInner {
                element_type: element_type.into(),
                elements: Vec::new(),
                listeners: Vec::new(),
            })),
        }
    }

    #[must_use]
    pub fn element_type(&self) -> TypeName {
        self.inner.borrow().element_type.clone()
    }

    /// Append `element` and notify every registered listener.
    pub fn add_element(&self, element: Observable) {
        let listeners: Vec<ElementListener> = {
            let mut inner = self.inner.borrow_mut();
            inner.elements.push(element.clone());
            inner.listeners.clone()
        };
        tracing::trace!(
            element_type = %self.element_type(),
            listeners = listeners.len(),
            "array element added"
        );
        for listener in &listeners {
            listener(&element);
        }
    }

    /// Replay existing elements to `on_update`, then keep it for future
    /// additions.
    pub fn register(&self, on_update: impl Fn(&Observable) + 'static) {
        let existing = self.elements();
        for element in &existing {
            on_update(element);
        }
        self.inner.borrow_mut().listeners.push(Rc::new(on_update));
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.borrow().elements.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.borrow().elements.is_empty()
    }

    /// The element at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<Observable> {
        self.inner.borrow().elements.get(index).cloned()
    }

    /// Handles to every element, in addition order.
    #[must_use]
    pub fn elements(&self) -> Vec<Observable> {
        self.inner.borrow().elements.clone()
    }

    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.inner.borrow().listeners.len()
    }

    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for ObservableArray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("ObservableArray")
            .field("element_type", &inner.element_type)
            .field("elements", &inner.elements)
            .field("listener_count", &inner.listeners.len())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reactive::ObservableValue;

    fn labelled(label: &str) -> Observable {
        let value = ObservableValue::new();
        value.set_value(label);
        Observable::from(value)
    }

    fn label_of(element: &Observable) -> String {
        element.as_value().unwrap().get_value().to_string()
    }

    fn recorder() -> (Rc<RefCell<Vec<String>>>, impl Fn(&Observable) + 'static) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        (log, move |e: &Observable| sink.borrow_mut().push(label_of(e)))
    }

    #[test]
    fn early_listener_gets_every_element_without_replay() {
        let array = ObservableArray::new("person");
        let (log, listener) = recorder();
        array.register(listener);
        assert!(log.borrow().is_empty());

        array.add_element(labelled("a"));
        array.add_element(labelled("b"));
        assert_eq!(*log.borrow(), ["a", "b"]);
    }

    #[test]
    fn late_listener_gets_replay_then_live() {
        let array = ObservableArray::new("person");
        array.add_element(labelled("a"));
        array.add_element(labelled("b"));

        let (log, listener) = recorder();
        array.register(listener);
        assert_eq!(*log.borrow(), ["a", "b"]);

        array.add_element(labelled("c"));
        assert_eq!(*log.borrow(), ["a", "b", "c"]);
        assert_eq!(array.len(), 3);
    }

    #[test]
    fn listeners_notified_in_registration_order() {
        let array = ObservableArray::new("x");
        let log = Rc::new(RefCell::new(Vec::new()));
        for tag in ['A', 'B'] {
            let log = Rc::clone(&log);
            array.register(move |_| log.borrow_mut().push(tag));
        }
        array.add_element(labelled("only"));
        assert_eq!(*log.borrow(), vec!['A', 'B']);
    }

    #[test]
    fn delivered_element_is_the_stored_one() {
        let array = ObservableArray::new("x");
        let added = labelled("a");
        let seen = Rc::new(RefCell::new(None));
        let seen_clone = Rc::clone(&seen);
        array.register(move |e| *seen_clone.borrow_mut() = Some(e.clone()));
        array.add_element(added.clone());

        assert!(seen.borrow().as_ref().unwrap().ptr_eq(&added));
        assert!(array.get(0).unwrap().ptr_eq(&added));
        assert!(array.get(1).is_none());
    }

    #[test]
    fn listener_may_add_during_live_notification() {
        let array = ObservableArray::new("x");
        let handle = array.clone();
        array.register(move |e| {
            if label_of(e) == "seed" {
                handle.add_element(labelled("echo"));
            }
        });
        let (log, listener) = recorder();
        array.register(listener);

        array.add_element(labelled("seed"));
        let labels: Vec<String> = array.elements().iter().map(label_of).collect();
        assert_eq!(labels, ["seed", "echo"]);
        // The nested addition is fully delivered before the outer one resumes.
        assert_eq!(*log.borrow(), ["echo", "seed"]);
    }

    #[test]
    fn element_type_is_informational() {
        let array = ObservableArray::new("person");
        array.add_element(Observable::from(ObservableArray::new("other")));
        assert_eq!(array.element_type(), "person");
        assert_eq!(array.len(), 1);
    }
}
