#![forbid(unsafe_code)]

//! Element nodes.
//!
//! A [`Node`] is a shared handle to one element: cloning the handle does not
//! copy the element (use [`Node::clone_node`] for that). Children are owned
//! by their parent; the parent link is weak so a detached subtree is freed as
//! soon as the last handle to its root goes away.
//!
//! # Invariants
//!
//! 1. A node has at most one parent; [`Node::append_child`] refuses a node
//!    that is already attached.
//! 2. The tree is acyclic; appending a node into itself or its own subtree
//!    fails.
//! 3. [`Node::clone_node`] never copies event listeners or the parent link.
//! 4. Listeners fire in registration order. The listener list is snapshotted
//!    before dispatch, so a listener may freely mutate the node (including
//!    registering more listeners, which only see later events).

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use crate::error::DomError;
use crate::event::{Event, EventKind};
use crate::selector::Selector;

type Listener = Rc<dyn Fn(&Event)>;

pub(crate) struct NodeData {
    pub(crate) tag: String,
    pub(crate) id: Option<String>,
    pub(crate) classes: Vec<String>,
    pub(crate) attributes: Vec<(String, String)>,
    pub(crate) text: String,
    pub(crate) value: Option<String>,
    pub(crate) children: Vec<Node>,
    parent: Weak<RefCell<NodeData>>,
    listeners: Vec<(EventKind, Listener)>,
}

/// Shared handle to an element node.
#[derive(Clone)]
pub struct Node {
    pub(crate) inner: Rc<RefCell<NodeData>>,
}

/// Non-owning handle to a [`Node`].
#[derive(Clone, Default)]
pub struct WeakNode {
    inner: Weak<RefCell<NodeData>>,
}

impl WeakNode {
    /// Upgrade to a strong handle if the node is still alive.
    #[must_use]
    pub fn upgrade(&self) -> Option<Node> {
        self.inner.upgrade().map(|inner| Node { inner })
    }
}

impl fmt::Debug for WeakNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeakNode")
            .field("alive", &(self.inner.strong_count() > 0))
            .finish()
    }
}

impl Node {
    /// Create a detached element with the given tag name.
    #[must_use]
    pub fn element(tag: &str) -> Self {
        Self {
            inner: Rc::new(RefCell::new(NodeData {
                tag: tag.to_ascii_lowercase(),
                id: None,
                classes: Vec::new(),
                attributes: Vec::new(),
                text: String::new(),
                value: None,
                children: Vec::new(),
                parent: Weak::new(),
                listeners: Vec::new(),
            })),
        }
    }

    /// Lower-case tag name.
    #[must_use]
    pub fn tag(&self) -> String {
        self.inner.borrow().tag.clone()
    }

    /// Element id, if any.
    #[must_use]
    pub fn id(&self) -> Option<String> {
        self.inner.borrow().id.clone()
    }

    pub fn set_id(&self, id: impl Into<String>) {
        self.inner.borrow_mut().id = Some(id.into());
    }

    /// Class list in insertion order.
    #[must_use]
    pub fn classes(&self) -> Vec<String> {
        self.inner.borrow().classes.clone()
    }

    #[must_use]
    pub fn has_class(&self, class: &str) -> bool {
        self.inner.borrow().classes.iter().any(|c| c == class)
    }

    /// Add a class; adding one that is already present is a no-op.
    pub fn add_class(&self, class: impl Into<String>) {
        let class = class.into();
        let mut data = self.inner.borrow_mut();
        if !data.classes.contains(&class) {
            data.classes.push(class);
        }
    }

    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<String> {
        let data = self.inner.borrow();
        match name {
            "id" => data.id.clone(),
            "class" => (!data.classes.is_empty()).then(|| data.classes.join(" ")),
            _ => data
                .attributes
                .iter()
                .find(|(k, _)| k == name)
                .map(|(_, v)| v.clone()),
        }
    }

    /// Set an attribute, replacing an existing one of the same name.
    ///
    /// `id` and `class` are routed to the element's id and class list.
    pub fn set_attribute(&self, name: &str, value: impl Into<String>) {
        let value = value.into();
        let mut data = self.inner.borrow_mut();
        match name {
            "id" => data.id = Some(value),
            "class" => {
                data.classes = value.split_whitespace().map(str::to_string).collect();
            }
            _ => {
                if let Some(slot) = data.attributes.iter_mut().find(|(k, _)| k == name) {
                    slot.1 = value;
                } else {
                    data.attributes.push((name.to_string(), value));
                }
            }
        }
    }

    /// Concatenated text of this node and all descendants, in document order.
    #[must_use]
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        let data = self.inner.borrow();
        out.push_str(&data.text);
        for child in &data.children {
            child.collect_text(out);
        }
    }

    /// Replace the node's content with `text`, detaching every child.
    pub fn set_text_content(&self, text: impl Into<String>) {
        let children = {
            let mut data = self.inner.borrow_mut();
            data.text = text.into();
            std::mem::take(&mut data.children)
        };
        for child in children {
            child.inner.borrow_mut().parent = Weak::new();
        }
    }

    /// Current input value (`None` until one is assigned).
    #[must_use]
    pub fn value(&self) -> Option<String> {
        self.inner.borrow().value.clone()
    }

    /// Assign the input value. Does not fire `change`; see [`Node::input`].
    pub fn set_value(&self, value: impl Into<String>) {
        self.inner.borrow_mut().value = Some(value.into());
    }

    /// Child elements in order.
    #[must_use]
    pub fn children(&self) -> Vec<Node> {
        self.inner.borrow().children.clone()
    }

    #[must_use]
    pub fn child_count(&self) -> usize {
        self.inner.borrow().children.len()
    }

    #[must_use]
    pub fn parent(&self) -> Option<Node> {
        self.inner.borrow().parent.upgrade().map(|inner| Node { inner })
    }

    /// Append `child` as the last child of this node.
    ///
    /// # Errors
    ///
    /// [`DomError::HierarchyRequest`] if `child` is this node or one of its
    /// ancestors, [`DomError::AlreadyAttached`] if `child` has a parent.
    pub fn append_child(&self, child: &Node) -> Result<(), DomError> {
        if self.is_inclusive_descendant_of(child) {
            return Err(DomError::HierarchyRequest {
                parent: self.tag(),
                child: child.tag(),
            });
        }
        if child.parent().is_some() {
            return Err(DomError::AlreadyAttached { tag: child.tag() });
        }
        child.inner.borrow_mut().parent = Rc::downgrade(&self.inner);
        self.inner.borrow_mut().children.push(child.clone());
        Ok(())
    }

    fn is_inclusive_descendant_of(&self, other: &Node) -> bool {
        let mut cursor = Some(self.clone());
        while let Some(node) = cursor {
            if node.ptr_eq(other) {
                return true;
            }
            cursor = node.parent();
        }
        false
    }

    /// Copy this element. With `deep`, the whole subtree is copied too.
    ///
    /// The copy is detached and carries no event listeners.
    #[must_use]
    pub fn clone_node(&self, deep: bool) -> Node {
        let data = self.inner.borrow();
        let copy = Node {
            inner: Rc::new(RefCell::new(NodeData {
                tag: data.tag.clone(),
                id: data.id.clone(),
                classes: data.classes.clone(),
                attributes: data.attributes.clone(),
                text: data.text.clone(),
                value: data.value.clone(),
                children: Vec::new(),
                parent: Weak::new(),
                listeners: Vec::new(),
            })),
        };
        if deep {
            let children: Vec<Node> = data
                .children
                .iter()
                .map(|child| {
                    let child = child.clone_node(true);
                    child.inner.borrow_mut().parent = Rc::downgrade(&copy.inner);
                    child
                })
                .collect();
            copy.inner.borrow_mut().children = children;
        }
        copy
    }

    /// First descendant (document order) matching `selector`.
    ///
    /// Unsupported selectors match nothing; see [`crate::selector`].
    #[must_use]
    pub fn query_selector(&self, selector: &str) -> Option<Node> {
        let selector = Selector::parse(selector)?;
        let mut found = None;
        self.walk_descendants(&mut |node| {
            if node.matches(&selector) {
                found = Some(node.clone());
                false
            } else {
                true
            }
        });
        found
    }

    /// All descendants matching `selector`, in document order.
    #[must_use]
    pub fn query_selector_all(&self, selector: &str) -> Vec<Node> {
        let Some(selector) = Selector::parse(selector) else {
            return Vec::new();
        };
        let mut found = Vec::new();
        self.walk_descendants(&mut |node| {
            if node.matches(&selector) {
                found.push(node.clone());
            }
            true
        });
        found
    }

    fn matches(&self, selector: &Selector) -> bool {
        let data = self.inner.borrow();
        selector.matches(&data.tag, data.id.as_deref(), &data.classes)
    }

    /// Pre-order walk; the visitor returns `false` to stop.
    fn walk_descendants(&self, visit: &mut dyn FnMut(&Node) -> bool) -> bool {
        for child in self.children() {
            if !visit(&child) || !child.walk_descendants(visit) {
                return false;
            }
        }
        true
    }

    /// Register `listener` for events of `kind` dispatched at this node.
    pub fn add_event_listener(&self, kind: EventKind, listener: impl Fn(&Event) + 'static) {
        self.inner
            .borrow_mut()
            .listeners
            .push((kind, Rc::new(listener)));
    }

    #[must_use]
    pub fn listener_count(&self, kind: EventKind) -> usize {
        self.inner
            .borrow()
            .listeners
            .iter()
            .filter(|(k, _)| *k == kind)
            .count()
    }

    /// Deliver `event` to this node's listeners for its kind.
    ///
    /// Events do not bubble.
    pub fn dispatch_event(&self, event: &Event) {
        let listeners: Vec<Listener> = self
            .inner
            .borrow()
            .listeners
            .iter()
            .filter(|(k, _)| *k == event.kind())
            .map(|(_, l)| Rc::clone(l))
            .collect();
        for listener in &listeners {
            listener(event);
        }
    }

    /// Simulate a user committing `text` into this input: assigns the value,
    /// then fires `change`.
    pub fn input(&self, text: impl Into<String>) {
        self.set_value(text);
        self.dispatch_event(&Event::new(EventKind::Change, self.clone()));
    }

    /// Simulate a user activating this control.
    pub fn click(&self) {
        self.dispatch_event(&Event::new(EventKind::Click, self.clone()));
    }

    #[must_use]
    pub fn downgrade(&self) -> WeakNode {
        WeakNode {
            inner: Rc::downgrade(&self.inner),
        }
    }

    /// Whether two handles refer to the same element.
    #[must_use]
    pub fn ptr_eq(&self, other: &Node) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let data = self.inner.borrow();
        f.debug_struct("Node")
            .field("tag", &data.tag)
            .field("id", &data.id)
            .field("classes", &data.classes)
            .field("children", &data.children.len())
            .field("listeners", &data.listeners.len())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
