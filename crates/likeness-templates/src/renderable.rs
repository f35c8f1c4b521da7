//! The per-type capability set the registry dispatches to.

use likeness_dom::Node;
use likeness_runtime::{Observable, ObservableKind, TypeName};

use crate::error::TemplateError;
use crate::registry::TemplateRegistry;

/// Structural description of a registered type.
///
/// The registry validates references and struct recursion over shapes, and
/// JSON seeding walks them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeShape {
    /// A single [`ObservableValue`](likeness_runtime::ObservableValue).
    Scalar,
    /// An [`ObservableMap`](likeness_runtime::ObservableMap) with these
    /// fields, in declaration order, and these action names.
    Struct {
        fields: Vec<(String, TypeName)>,
        actions: Vec<String>,
    },
    /// An [`ObservableArray`](likeness_runtime::ObservableArray) of `element`.
    Array { element: TypeName },
}

impl TypeShape {
    /// Kind of observable this shape's factory produces.
    #[must_use]
    pub const fn observable_kind(&self) -> ObservableKind {
        match self {
            Self::Scalar => ObservableKind::Value,
            Self::Struct { .. } => ObservableKind::Map,
            Self::Array { .. } => ObservableKind::Array,
        }
    }

    /// Every type this shape refers to.
    #[must_use]
    pub fn references(&self) -> Vec<&TypeName> {
        match self {
            Self::Scalar => Vec::new(),
            Self::Struct { fields, .. } => fields.iter().map(|(_, ty)| ty).collect(),
            Self::Array { element } => vec![element],
        }
    }
}

/// A renderable type: builds its observable and renders templates bound to
/// one.
///
/// The built-in scalar, struct and array templates implement this; custom
/// implementations can be registered with
/// [`RegistryBuilder::register`](crate::registry::RegistryBuilder::register).
/// Implementations recurse into other types only through the `registry`
/// argument.
pub trait Renderable {
    /// The type's structure.
    fn shape(&self) -> TypeShape;

    /// Produce a fresh observable matching [`Renderable::shape`].
    ///
    /// # Errors
    ///
    /// Propagates lookup failures of referenced types.
    fn create_observable(&self, registry: &TemplateRegistry) -> Result<Observable, TemplateError>;

    /// Render into `container` under the display `name`, bound to
    /// `observable`.
    ///
    /// # Errors
    ///
    /// On error nothing has been appended to `container`.
    fn instantiate(
        &self,
        registry: &TemplateRegistry,
        container: &Node,
        name: &str,
        observable: &Observable,
    ) -> Result<(), TemplateError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn references_follow_fields_and_elements() {
        let shape = TypeShape::Struct {
            fields: vec![("name".into(), "name".into()), ("tags".into(), "tags".into())],
            actions: vec!["save".into()],
        };
        let refs: Vec<&str> = shape.references().into_iter().map(TypeName::as_str).collect();
        assert_eq!(refs, ["name", "tags"]);
        assert_eq!(shape.observable_kind(), ObservableKind::Map);

        let array = TypeShape::Array {
            element: "person".into(),
        };
        assert_eq!(array.references(), [&TypeName::from("person")]);
        assert!(TypeShape::Scalar.references().is_empty());
    }
}
