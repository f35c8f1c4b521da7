//! DOM events delivered to node listeners.

use crate::node::Node;

/// The event kinds the binding layer listens for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// The committed value of an input changed.
    Change,
    /// A control was activated.
    Click,
}

impl EventKind {
    /// The DOM event type string.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Change => "change",
            Self::Click => "click",
        }
    }
}

/// An event dispatched at a target node.
#[derive(Debug, Clone)]
pub struct Event {
    kind: EventKind,
    target: Node,
}

impl Event {
    /// Create an event of `kind` targeted at `target`.
    #[must_use]
    pub fn new(kind: EventKind, target: Node) -> Self {
        Self { kind, target }
    }

    /// The event kind.
    #[must_use]
    pub const fn kind(&self) -> EventKind {
        self.kind
    }

    /// The node the event was dispatched at.
    #[must_use]
    pub const fn target(&self) -> &Node {
        &self.target
    }

    /// Shorthand for `event.target.value`.
    #[must_use]
    pub fn target_value(&self) -> Option<String> {
        self.target.value()
    }
}
