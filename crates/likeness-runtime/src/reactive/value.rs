#![forbid(unsafe_code)]

//! Leaf value cell with change listeners.
//!
//! # Design
//!
//! [`ObservableValue`] holds one [`Scalar`] in shared storage
//! (`Rc<RefCell<..>>`). Every applied value is stored first and then pushed
//! to each listener, in registration order. Unlike the array container, a
//! newly registered listener is not told about the current value; callers
//! that need it read [`ObservableValue::get_value`] themselves.
//!
//! # Invariants
//!
//! 1. `get_value()` returns the last value passed to `set_value`/`change`,
//!    or [`Scalar::Null`] if none was.
//! 2. Every applied value reaches every listener registered before the call
//!    exactly once, even when it equals the previous value.
//! 3. Listeners are never removed.
//! 4. `version` increments by exactly 1 per applied value.
//!
//! # Failure Modes
//!
//! - **Panicking listener**: the panic propagates to the caller of
//!   `set_value`/`change`. Listeners registered before it have already run;
//!   later ones do not run for that value. The stored value is already
//!   updated.
//! - **Re-entrant set**: the listener list is snapshotted before dispatch, so
//!   a listener may set the value again. The nested update is delivered in
//!   full before the outer dispatch continues, so later listeners then see
//!   the outer (older) value last.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use likeness_dom::Event;

use super::scalar::Scalar;

type Listener = Rc<dyn Fn(&Scalar)>;

/// Anything that looks like an input event: carries `target.value`.
pub trait ChangeEvent {
    /// The value of the event's target, if it has one.
    fn target_value(&self) -> Option<String>;
}

impl ChangeEvent for Event {
    fn target_value(&self) -> Option<String> {
        Event::target_value(self)
    }
}

struct ValueInner {
    value: Scalar,
    version: u64,
    listeners: Vec<Listener>,
}

/// A shared scalar cell that notifies listeners on every update.
///
/// Cloning creates a new handle to the **same** cell.
#[derive(Clone)]
pub struct ObservableValue {
    inner: Rc<RefCell<ValueInner>>,
}

impl ObservableValue {
    /// Create an unset cell (`Null`, version 0, no listeners).
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(ValueInner {
                value: Scalar::Null,
                version: 0,
                listeners: Vec::new(),
            })),
        }
    }

    /// Append a listener for future updates. No replay.
    pub fn register(&self, on_update: impl Fn(&Scalar) + 'static) {
        self.inner.borrow_mut().listeners.push(Rc::new(on_update));
    }

    /// Apply `event.target.value` as the new value.
    ///
    /// A target without a value applies `Null`.
    pub fn change(&self, event: &impl ChangeEvent) {
        let value = event.target_value().map_or(Scalar::Null, Scalar::Text);
        self.apply(value);
    }

    /// Apply `data` as the new value.
    pub fn set_value(&self, data: impl Into<Scalar>) {
        self.apply(data.into());
    }

    /// The last applied value, or `Null`.
    #[must_use]
    pub fn get_value(&self) -> Scalar {
        self.inner.borrow().value.clone()
    }

    /// Borrow the current value without cloning it.
    pub fn with<R>(&self, f: impl FnOnce(&Scalar) -> R) -> R {
        f(&self.inner.borrow().value)
    }

    /// Number of applied values so far.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.inner.borrow().version
    }

    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.inner.borrow().listeners.len()
    }

    /// Whether both handles refer to the same cell.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    fn apply(&self, value: Scalar) {
        let listeners: Vec<Listener> = {
            let mut inner = self.inner.borrow_mut();
            inner.value = value.clone();
            inner.version += 1;
            inner.listeners.clone()
        };
        tracing::trace!(listeners = listeners.len(), "observable value updated");
        for listener in &listeners {
            listener(&value);
        }
    }
}

impl Default for ObservableValue {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ObservableValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("ObservableValue")
            .field("value", &inner.value)
            .field("version", &inner.version)
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
    use likeness_dom::{EventKind, Node};
    use std::cell::Cell;

    struct FakeEvent(Option<&'static str>);

    impl ChangeEvent for FakeEvent {
        fn target_value(&self) -> Option<String> {
            self.0.map(str::to_string)
        }
    }

    #[test]
    fn starts_null() {
        let value = ObservableValue::new();
        assert_eq!(value.get_value(), Scalar::Null);
        assert_eq!(value.version(), 0);
    }

    #[test]
    fn set_value_stores_and_notifies() {
        let value = ObservableValue::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let seen_clone = Rc::clone(&seen);
        value.register(move |v| seen_clone.borrow_mut().push(v.clone()));

        value.set_value("Alice");
        value.set_value(7);
        assert_eq!(value.get_value(), Scalar::Int(7));
        assert_eq!(
            *seen.borrow(),
            vec![Scalar::Text("Alice".into()), Scalar::Int(7)]
        );
        assert_eq!(value.version(), 2);
    }

    #[test]
    fn register_does_not_replay() {
        let value = ObservableValue::new();
        value.set_value("before");
        let calls = Rc::new(Cell::new(0u32));
        let calls_clone = Rc::clone(&calls);
        value.register(move |_| calls_clone.set(calls_clone.get() + 1));
        assert_eq!(calls.get(), 0);

        value.set_value("after");
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn equal_values_still_notify() {
        let value = ObservableValue::new();
        let calls = Rc::new(Cell::new(0u32));
        let calls_clone = Rc::clone(&calls);
        value.register(move |_| calls_clone.set(calls_clone.get() + 1));

        value.set_value("same");
        value.set_value("same");
        assert_eq!(calls.get(), 2);
        assert_eq!(value.version(), 2);
    }

    #[test]
    fn change_reads_target_value() {
        let value = ObservableValue::new();
        value.change(&FakeEvent(Some("typed")));
        assert_eq!(value.get_value(), Scalar::Text("typed".into()));

        value.change(&FakeEvent(None));
        assert_eq!(value.get_value(), Scalar::Null);
    }

    #[test]
    fn change_accepts_dom_events() {
        let value = ObservableValue::new();
        let input = Node::element("input");
        let sink = value.clone();
        input.add_event_listener(EventKind::Change, move |event| sink.change(event));

        input.input("from the page");
        assert_eq!(value.get_value().as_text(), Some("from the page"));
    }

    #[test]
    fn listeners_see_stored_value() {
        let value = ObservableValue::new();
        let observed = Rc::new(RefCell::new(Scalar::Null));
        let observed_clone = Rc::clone(&observed);
        let handle = value.clone();
        value.register(move |_| *observed_clone.borrow_mut() = handle.get_value());

        value.set_value("fresh");
        assert_eq!(*observed.borrow(), Scalar::Text("fresh".into()));
    }

    #[test]
    fn notification_order_is_registration_order() {
        let value = ObservableValue::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        for tag in ['A', 'B', 'C'] {
            let log = Rc::clone(&log);
            value.register(move |_| log.borrow_mut().push(tag));
        }
        value.set_value(1);
        assert_eq!(*log.borrow(), vec!['A', 'B', 'C']);
    }

    #[test]
    fn listener_registered_during_dispatch_sees_only_later_values() {
        let value = ObservableValue::new();
        let late_calls = Rc::new(Cell::new(0u32));
        let handle = value.clone();
        let late_clone = Rc::clone(&late_calls);
        let armed = Rc::new(Cell::new(true));
        value.register(move |_| {
            if armed.replace(false) {
                let late = Rc::clone(&late_clone);
                handle.register(move |_| late.set(late.get() + 1));
            }
        });

        value.set_value(1);
        assert_eq!(late_calls.get(), 0);
        value.set_value(2);
        assert_eq!(late_calls.get(), 1);
        assert_eq!(value.listener_count(), 2);
    }

    #[test]
    fn panicking_listener_stops_later_ones() {
        let value = ObservableValue::new();
        let first = Rc::new(Cell::new(false));
        let last = Rc::new(Cell::new(false));
        let first_clone = Rc::clone(&first);
        let last_clone = Rc::clone(&last);
        value.register(move |_| first_clone.set(true));
        value.register(|_| panic!("listener failure"));
        value.register(move |_| last_clone.set(true));

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            value.set_value("boom");
        }));
        assert!(result.is_err());
        assert!(first.get());
        assert!(!last.get());
        assert_eq!(value.get_value().as_text(), Some("boom"));
    }

    #[test]
    fn clones_share_the_cell() {
        let a = ObservableValue::new();
        let b = a.clone();
        b.set_value("shared");
        assert_eq!(a.get_value().as_text(), Some("shared"));
        assert!(a.ptr_eq(&b));
        assert!(!a.ptr_eq(&ObservableValue::new()));
    }

    #[test]
    fn debug_format() {
        let value = ObservableValue::new();
        value.set_value(42);
        let dbg = format!("{value:?}");
        assert!(dbg.contains("ObservableValue"));
        assert!(dbg.contains("42"));
    }
}
