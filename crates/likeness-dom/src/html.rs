//! Deterministic HTML serialization.
//!
//! Attributes are written as `id`, `class`, the remaining attributes in
//! insertion order, then the input `value` when one has been assigned. Void
//! elements have no closing tag. Text and attribute values are escaped.

use std::fmt::Write as _;

use v_htmlescape::escape;

use crate::node::Node;

const VOID_ELEMENTS: &[&str] = &["br", "hr", "img", "input", "link", "meta"];

impl Node {
    /// Serialize this element and its subtree.
    #[must_use]
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        write_node(self, &mut out);
        out
    }

    /// Serialize only the children of this element.
    #[must_use]
    pub fn inner_html(&self) -> String {
        let mut out = String::new();
        let data = self.inner.borrow();
        let _ = write!(out, "{}", escape(&data.text));
        for child in &data.children {
            write_node(child, &mut out);
        }
        out
    }
}

fn write_node(node: &Node, out: &mut String) {
    let data = node.inner.borrow();
    let _ = write!(out, "<{}", data.tag);
    if let Some(id) = &data.id {
        let _ = write!(out, " id=\"{}\"", escape(id));
    }
    if !data.classes.is_empty() {
        let _ = write!(out, " class=\"{}\"", escape(&data.classes.join(" ")));
    }
    for (name, value) in &data.attributes {
        let _ = write!(out, " {name}=\"{}\"", escape(value));
    }
    if let Some(value) = &data.value {
        let _ = write!(out, " value=\"{}\"", escape(value));
    }
    out.push('>');

    if VOID_ELEMENTS.contains(&data.tag.as_str()) {
        return;
    }

    let _ = write!(out, "{}", escape(&data.text));
    for child in &data.children {
        write_node(child, out);
    }
    let _ = write!(out, "</{}>", data.tag);
}
