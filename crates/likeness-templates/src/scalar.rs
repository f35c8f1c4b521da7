//! Template for scalar fields: a labelled input bound both ways to an
//! [`ObservableValue`].

use likeness_dom::{EventKind, Node};
use likeness_runtime::{Observable, ObservableKind, ObservableValue, TypeName};

use crate::error::TemplateError;
use crate::prototype::{FieldPrototype, find};
use crate::registry::TemplateRegistry;
use crate::renderable::{Renderable, TypeShape};

/// Renders one input per instantiation.
///
/// Typing into the input (a `change` event) updates the observable; every
/// later value applied to the observable is written back into the input.
#[derive(Debug)]
pub struct ScalarTemplate {
    type_name: TypeName,
    prototype: Node,
    input: String,
    label: String,
}

impl ScalarTemplate {
    /// Build the template from `prototype`.
    ///
    /// # Errors
    ///
    /// [`TemplateError::Prototype`] when the input or label selector matches
    /// nothing in the fragment.
    pub fn new(
        type_name: impl Into<TypeName>,
        prototype: &FieldPrototype,
    ) -> Result<Self, TemplateError> {
        let type_name = type_name.into();
        let fragment = prototype.fragment.build()?;
        find(&fragment, &prototype.input, &type_name)?;
        find(&fragment, &prototype.label, &type_name)?;
        Ok(Self {
            type_name,
            prototype: fragment,
            input: prototype.input.clone(),
            label: prototype.label.clone(),
        })
    }
}

impl Renderable for ScalarTemplate {
    fn shape(&self) -> TypeShape {
        TypeShape::Scalar
    }

    fn create_observable(&self, _registry: &TemplateRegistry) -> Result<Observable, TemplateError> {
        Ok(Observable::from(ObservableValue::new()))
    }

    fn instantiate(
        &self,
        _registry: &TemplateRegistry,
        container: &Node,
        name: &str,
        observable: &Observable,
    ) -> Result<(), TemplateError> {
        let value = observable
            .as_value()
            .ok_or_else(|| TemplateError::ShapeMismatch {
                type_name: self.type_name.clone(),
                expected: ObservableKind::Value,
                found: observable.kind(),
            })?;

        let fragment = self.prototype.clone_node(true);
        let input = find(&fragment, &self.input, &self.type_name)?;
        let label = find(&fragment, &self.label, &self.type_name)?;
        label.set_text_content(name);

        let sink = value.clone();
        input.add_event_listener(EventKind::Change, move |event| sink.change(event));

        // The input is held weakly so a dropped fragment is not kept alive by
        // the observable's listener list.
        let weak = input.downgrade();
        value.register(move |current| {
            if let Some(input) = weak.upgrade() {
                input.set_value(current.to_string());
            }
        });
        // Read after registering: no update can fall between the two.
        input.set_value(value.with(ToString::to_string));

        container.append_child(&fragment)?;
        Ok(())
    }
}

// ----- Tests -----

#[cfg(test)]
mod tests {
    use super::*;
    use likeness_runtime::{ObservableArray, Scalar};

    fn registry() -> TemplateRegistry {
        let mut builder = TemplateRegistry::builder();
        builder.register_scalar("name").unwrap();
        builder.build().unwrap()
    }

    fn render(value: &ObservableValue, name: &str) -> (Node, Node) {
        let registry = registry();
        let container = Node::element("main");
        registry
            .instantiate("name", &container, name, &Observable::from(value.clone()))
            .unwrap();
        let input = container.query_selector("input").unwrap();
        (container, input)
    }

    #[test]
    fn label_shows_name_and_input_shows_current_value() {
        let value = ObservableValue::new();
        value.set_value("Alice");
        let (container, input) = render(&value, "First name");
        assert_eq!(input.value().as_deref(), Some("Alice"));
        assert_eq!(
            container.query_selector("label").unwrap().text_content(),
            "First name"
        );
    }

    #[test]
    fn uninitialized_value_renders_empty() {
        let (_container, input) = render(&ObservableValue::new(), "name");
        assert_eq!(input.value().as_deref(), Some(""));
    }

    #[test]
    fn later_values_reach_the_input() {
        let value = ObservableValue::new();
        let (_container, input) = render(&value, "name");
        value.set_value(42);
        assert_eq!(input.value().as_deref(), Some("42"));
    }

    #[test]
    fn typing_updates_the_observable() {
        let value = ObservableValue::new();
        let (_container, input) = render(&value, "name");
        input.input("Bob");
        assert_eq!(value.get_value(), Scalar::Text("Bob".into()));
    }

    #[test]
    fn two_instantiations_stay_in_sync() {
        let value = ObservableValue::new();
        let (_a, first) = render(&value, "name");
        let (_b, second) = render(&value, "name");
        first.input("shared");
        assert_eq!(second.value().as_deref(), Some("shared"));
    }

    #[test]
    fn dropped_fragment_is_not_kept_alive() {
        let value = ObservableValue::new();
        let weak = {
            let (_container, input) = render(&value, "name");
            input.downgrade()
        };
        assert!(weak.upgrade().is_none());
        value.set_value("ignored");
    }

    #[test]
    fn rejects_other_observable_kinds() {
        let registry = registry();
        let container = Node::element("main");
        let err = registry
            .instantiate(
                "name",
                &container,
                "name",
                &Observable::from(ObservableArray::new("name")),
            )
            .unwrap_err();
        assert_eq!(
            err,
            TemplateError::ShapeMismatch {
                type_name: "name".into(),
                expected: ObservableKind::Value,
                found: ObservableKind::Array,
            }
        );
        assert_eq!(container.child_count(), 0);
    }

    #[test]
    fn prototype_without_input_is_rejected() {
        let prototype = FieldPrototype {
            input: "#missing".into(),
            ..FieldPrototype::default()
        };
        let err = ScalarTemplate::new("name", &prototype).unwrap_err();
        assert!(matches!(err, TemplateError::Prototype { .. }));
    }
}
