//! Prototype descriptors for the built-in templates.
//!
//! A prototype is plain data. Each registered type builds its fragment once at
//! registration and deep-clones it for every instantiation, so no two
//! instantiations share DOM state.
//!
//! The defaults produce Bootstrap-flavoured markup:
//!
//! ```text
//! field    div.form-group.row
//!            label#label.col-sm-2.col-form-label[for=field]
//!            div.col-sm-10 > input#field.form-control
//! card     div.card > div.card-header, div.card-body
//! action   button
//! section  div.card
//! row      div.row > div.col-sm-12
//! ```

use likeness_dom::{DomError, Node};
use likeness_runtime::TypeName;

use crate::error::TemplateError;

/// Declarative description of an element subtree.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct ElementSpec {
    pub tag: String,
    pub id: Option<String>,
    pub classes: Vec<String>,
    pub attributes: Vec<(String, String)>,
    pub text: Option<String>,
    pub children: Vec<ElementSpec>,
}

impl Default for ElementSpec {
    fn default() -> Self {
        Self::new("div")
    }
}

impl ElementSpec {
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            id: None,
            classes: Vec::new(),
            attributes: Vec::new(),
            text: None,
            children: Vec::new(),
        }
    }

    #[must_use]
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    #[must_use]
    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    #[must_use]
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    #[must_use]
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    #[must_use]
    pub fn child(mut self, child: ElementSpec) -> Self {
        self.children.push(child);
        self
    }

    /// Materialize a fresh, detached subtree.
    ///
    /// Text is written before children, so a spec carrying both renders the
    /// text followed by the children.
    ///
    /// # Errors
    ///
    /// Only if the DOM rejects an append, which a freshly built tree never
    /// triggers.
    pub fn build(&self) -> Result<Node, DomError> {
        let node = Node::element(&self.tag);
        if let Some(id) = &self.id {
            node.set_id(id.as_str());
        }
        for class in &self.classes {
            node.add_class(class.as_str());
        }
        for (name, value) in &self.attributes {
            node.set_attribute(name, value.as_str());
        }
        if let Some(text) = &self.text {
            node.set_text_content(text.as_str());
        }
        for child in &self.children {
            node.append_child(&child.build()?)?;
        }
        Ok(node)
    }
}

/// Markup for scalar fields: a fragment holding a label and an input.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct FieldPrototype {
    pub fragment: ElementSpec,
    /// Selector of the bound input inside `fragment`.
    pub input: String,
    /// Selector of the element that receives the display name.
    pub label: String,
}

impl Default for FieldPrototype {
    fn default() -> Self {
        Self {
            fragment: ElementSpec::new("div")
                .class("form-group")
                .class("row")
                .child(
                    ElementSpec::new("label")
                        .id("label")
                        .class("col-sm-2")
                        .class("col-form-label")
                        .attr("for", "field"),
                )
                .child(
                    ElementSpec::new("div")
                        .class("col-sm-10")
                        .child(ElementSpec::new("input").id("field").class("form-control")),
                ),
            input: "#field".into(),
            label: "#label".into(),
        }
    }
}

/// Markup for struct types.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct CardPrototype {
    pub fragment: ElementSpec,
    pub header: String,
    /// Selector of the element that receives field templates and actions.
    pub body: String,
    /// Control built once per action; its text is the action name.
    pub action: ElementSpec,
}

impl Default for CardPrototype {
    fn default() -> Self {
        Self {
            fragment: ElementSpec::new("div")
                .class("card")
                .child(ElementSpec::new("div").class("card-header"))
                .child(ElementSpec::new("div").class("card-body")),
            header: ".card-header".into(),
            body: ".card-body".into(),
            action: ElementSpec::new("button"),
        }
    }
}

/// Markup for array types: an outer section plus one row per element.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct SectionPrototype {
    pub fragment: ElementSpec,
    pub row: ElementSpec,
    /// Selector, inside a row, of the element type's container.
    pub slot: String,
}

impl Default for SectionPrototype {
    fn default() -> Self {
        Self {
            fragment: ElementSpec::new("div").class("card"),
            row: ElementSpec::new("div")
                .class("row")
                .child(ElementSpec::new("div").class("col-sm-12")),
            slot: ".col-sm-12".into(),
        }
    }
}

/// The prototype set a [`RegistryBuilder`](crate::registry::RegistryBuilder)
/// hands to the built-in templates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct Prototypes {
    pub field: FieldPrototype,
    pub card: CardPrototype,
    pub section: SectionPrototype,
}

/// First descendant of `root` matching `selector`.
pub(crate) fn find(root: &Node, selector: &str, type_name: &TypeName) -> Result<Node, TemplateError> {
    root.query_selector(selector)
        .ok_or_else(|| TemplateError::Prototype {
            type_name: type_name.clone(),
            selector: selector.to_owned(),
        })
}

// ----- Tests -----

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn default_field_markup() {
        let node = FieldPrototype::default().fragment.build().unwrap();
        assert_eq!(
            node.to_html(),
            "<div class=\"form-group row\">\
             <label id=\"label\" class=\"col-sm-2 col-form-label\" for=\"field\"></label>\
             <div class=\"col-sm-10\"><input id=\"field\" class=\"form-control\"></div>\
             </div>"
        );
    }

    #[test]
    fn default_card_and_row_markup() {
        let card = CardPrototype::default().fragment.build().unwrap();
        assert_eq!(
            card.to_html(),
            "<div class=\"card\"><div class=\"card-header\"></div><div class=\"card-body\"></div></div>"
        );
        let row = SectionPrototype::default().row.build().unwrap();
        assert_eq!(row.to_html(), "<div class=\"row\"><div class=\"col-sm-12\"></div></div>");
    }

    #[test]
    fn builds_are_independent() {
        let spec = ElementSpec::new("p").text("hi");
        let a = spec.build().unwrap();
        let b = spec.build().unwrap();
        a.set_text_content("changed");
        assert_eq!(b.text_content(), "hi");
    }

    #[test]
    fn text_then_children() {
        let node = ElementSpec::new("div")
            .text("lead")
            .child(ElementSpec::new("span"))
            .build()
            .unwrap();
        assert_eq!(node.to_html(), "<div>lead<span></span></div>");
    }

    #[test]
    fn missing_selector_names_type() {
        let node = ElementSpec::new("div").build().unwrap();
        let err = find(&node, "#nope", &"person".into()).unwrap_err();
        assert_eq!(
            err,
            TemplateError::Prototype {
                type_name: "person".into(),
                selector: "#nope".into(),
            }
        );
    }
}
