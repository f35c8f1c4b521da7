//! Type registry: maps each type name to its template and observable factory.
//!
//! A [`RegistryBuilder`] collects registrations; [`RegistryBuilder::build`]
//! validates the whole set and freezes it into a [`TemplateRegistry`].
//!
//! # Invariants
//!
//! 1. Type names are unique within a registry.
//! 2. After `build()`, every type named by a struct field or array element is
//!    registered, so registration order is irrelevant.
//! 3. No struct reaches itself through struct fields alone. Recursion through
//!    an array is allowed because a fresh array is empty.
//! 4. A built registry is read-only. Clones share the same entries.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Error |
//! |---------|-------|-------|
//! | Lookup miss | type never registered | `UnknownType` |
//! | Re-registration | name already taken | `DuplicateType` |
//! | Dangling reference | field/element type missing at build | `UnresolvedReference` |
//! | Struct recursion | factory would never terminate | `RecursiveType` |

use std::fmt;
use std::rc::Rc;

use ahash::AHashMap;
use likeness_dom::Node;
use likeness_runtime::{Observable, TypeName};
use tracing::{debug, debug_span};

use crate::card::{StructTemplate, StructType};
use crate::error::TemplateError;
use crate::prototype::Prototypes;
use crate::renderable::{Renderable, TypeShape};
use crate::scalar::ScalarTemplate;
use crate::section::ArrayTemplate;

struct RegistryInner {
    types: AHashMap<TypeName, Rc<dyn Renderable>>,
    order: Vec<TypeName>,
}

/// Frozen set of renderable types.
///
/// Cloning is cheap and shares the entries; array templates keep a clone to
/// render elements added later.
#[derive(Clone)]
pub struct TemplateRegistry {
    inner: Rc<RegistryInner>,
}

impl fmt::Debug for TemplateRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TemplateRegistry")
            .field("types", &self.inner.order)
            .finish()
    }
}

impl TemplateRegistry {
    #[must_use]
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    #[must_use]
    pub fn contains(&self, type_name: &str) -> bool {
        self.inner.types.contains_key(type_name)
    }

    /// Registered type names in registration order.
    pub fn type_names(&self) -> impl Iterator<Item = &TypeName> {
        self.inner.order.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.order.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.order.is_empty()
    }

    #[must_use]
    pub fn shape(&self, type_name: &str) -> Option<TypeShape> {
        self.inner.types.get(type_name).map(|entry| entry.shape())
    }

    /// The entry registered for `type_name`.
    ///
    /// # Errors
    ///
    /// [`TemplateError::UnknownType`] if the type was never registered.
    pub fn template(&self, type_name: &str) -> Result<Rc<dyn Renderable>, TemplateError> {
        self.inner
            .types
            .get(type_name)
            .cloned()
            .ok_or_else(|| TemplateError::UnknownType(TypeName::from(type_name)))
    }

    /// A fresh observable shaped for `type_name`.
    ///
    /// # Errors
    ///
    /// [`TemplateError::UnknownType`] if the type was never registered.
    pub fn create_observable(&self, type_name: &str) -> Result<Observable, TemplateError> {
        self.template(type_name)?.create_observable(self)
    }

    /// Render `type_name`'s template into `container`, bound to `observable`.
    ///
    /// # Errors
    ///
    /// [`TemplateError::UnknownType`] for an unregistered type, or whatever the
    /// template reports. On error `container` is left as it was.
    pub fn instantiate(
        &self,
        type_name: &str,
        container: &Node,
        name: &str,
        observable: &Observable,
    ) -> Result<(), TemplateError> {
        let _span = debug_span!("instantiate", type_name, name).entered();
        let template = self.template(type_name)?;
        debug!(kind = %observable.kind(), "rendering template");
        template.instantiate(self, container, name, observable)
    }
}

/// Collects type registrations for a [`TemplateRegistry`].
#[derive(Default)]
pub struct RegistryBuilder {
    types: AHashMap<TypeName, Rc<dyn Renderable>>,
    order: Vec<TypeName>,
    prototypes: Prototypes,
}

impl fmt::Debug for RegistryBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistryBuilder")
            .field("types", &self.order)
            .field("prototypes", &self.prototypes)
            .finish()
    }
}

impl RegistryBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `prototypes` for built-in templates registered from now on.
    #[must_use]
    pub fn with_prototypes(mut self, prototypes: Prototypes) -> Self {
        self.prototypes = prototypes;
        self
    }

    #[must_use]
    pub fn prototypes(&self) -> &Prototypes {
        &self.prototypes
    }

    #[must_use]
    pub fn contains(&self, type_name: &str) -> bool {
        self.types.contains_key(type_name)
    }

    fn ensure_free(&self, type_name: &TypeName) -> Result<(), TemplateError> {
        if self.types.contains_key(type_name) {
            return Err(TemplateError::DuplicateType(type_name.clone()));
        }
        Ok(())
    }

    fn insert(&mut self, type_name: TypeName, entry: Rc<dyn Renderable>) -> &mut Self {
        debug!(
            type_name = %type_name,
            kind = %entry.shape().observable_kind(),
            "registered type"
        );
        self.order.push(type_name.clone());
        self.types.insert(type_name, entry);
        self
    }

    /// Register a custom renderable type.
    ///
    /// # Errors
    ///
    /// [`TemplateError::DuplicateType`] if the name is taken.
    pub fn register(
        &mut self,
        type_name: impl Into<TypeName>,
        renderable: impl Renderable + 'static,
    ) -> Result<&mut Self, TemplateError> {
        let type_name = type_name.into();
        self.ensure_free(&type_name)?;
        Ok(self.insert(type_name, Rc::new(renderable)))
    }

    /// Register a scalar field type rendered as a labelled input.
    ///
    /// # Errors
    ///
    /// [`TemplateError::DuplicateType`] or a prototype selector miss.
    pub fn register_scalar(
        &mut self,
        type_name: impl Into<TypeName>,
    ) -> Result<&mut Self, TemplateError> {
        let type_name = type_name.into();
        self.ensure_free(&type_name)?;
        let template = ScalarTemplate::new(type_name.clone(), &self.prototypes.field)?;
        Ok(self.insert(type_name, Rc::new(template)))
    }

    /// Register a struct type rendered as a card.
    ///
    /// Field types may be registered later; they are checked by
    /// [`RegistryBuilder::build`].
    ///
    /// # Errors
    ///
    /// [`TemplateError::DuplicateType`] or a prototype selector miss.
    pub fn register_struct(
        &mut self,
        type_name: impl Into<TypeName>,
        definition: StructType,
    ) -> Result<&mut Self, TemplateError> {
        let type_name = type_name.into();
        self.ensure_free(&type_name)?;
        let template = StructTemplate::new(type_name.clone(), definition, &self.prototypes.card)?;
        Ok(self.insert(type_name, Rc::new(template)))
    }

    /// Register an array type whose elements are `element_type`.
    ///
    /// # Errors
    ///
    /// [`TemplateError::DuplicateType`] or a prototype selector miss.
    pub fn register_array(
        &mut self,
        type_name: impl Into<TypeName>,
        element_type: impl Into<TypeName>,
    ) -> Result<&mut Self, TemplateError> {
        let type_name = type_name.into();
        self.ensure_free(&type_name)?;
        let template =
            ArrayTemplate::new(type_name.clone(), element_type, &self.prototypes.section)?;
        Ok(self.insert(type_name, Rc::new(template)))
    }

    /// Validate and freeze the registrations.
    ///
    /// # Errors
    ///
    /// [`TemplateError::UnresolvedReference`] for a dangling field or element
    /// type, [`TemplateError::RecursiveType`] for a struct that contains
    /// itself through struct fields.
    pub fn build(self) -> Result<TemplateRegistry, TemplateError> {
        let shapes: AHashMap<TypeName, TypeShape> = self
            .order
            .iter()
            .filter_map(|ty| self.types.get(ty).map(|entry| (ty.clone(), entry.shape())))
            .collect();

        for ty in &self.order {
            let Some(shape) = shapes.get(ty) else { continue };
            let missing = shape
                .references()
                .into_iter()
                .find(|r| !shapes.contains_key(*r));
            if let Some(missing) = missing {
                return Err(TemplateError::UnresolvedReference {
                    type_name: ty.clone(),
                    referenced: missing.clone(),
                });
            }
        }

        if let Some(cycle) = find_struct_cycle(&shapes, &self.order) {
            return Err(TemplateError::RecursiveType { cycle });
        }

        debug!(types = self.order.len(), "registry built");
        Ok(TemplateRegistry {
            inner: Rc::new(RegistryInner {
                types: self.types,
                order: self.order,
            }),
        })
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Visiting,
    Done,
}

/// Depth-first search over struct-to-struct field edges. Returns the first
/// cycle found, closed by repeating its first type.
fn find_struct_cycle(
    shapes: &AHashMap<TypeName, TypeShape>,
    order: &[TypeName],
) -> Option<Vec<TypeName>> {
    let mut marks: AHashMap<TypeName, Mark> = AHashMap::new();
    let mut stack: Vec<TypeName> = Vec::new();
    order
        .iter()
        .find_map(|root| visit(root, shapes, &mut marks, &mut stack))
}

fn visit(
    ty: &TypeName,
    shapes: &AHashMap<TypeName, TypeShape>,
    marks: &mut AHashMap<TypeName, Mark>,
    stack: &mut Vec<TypeName>,
) -> Option<Vec<TypeName>> {
    match marks.get(ty) {
        Some(Mark::Done) => return None,
        Some(Mark::Visiting) => {
            let start = stack.iter().position(|t| t == ty).unwrap_or(0);
            let mut cycle = stack[start..].to_vec();
            cycle.push(ty.clone());
            return Some(cycle);
        }
        None => {}
    }
    let Some(TypeShape::Struct { fields, .. }) = shapes.get(ty) else {
        return None;
    };

    marks.insert(ty.clone(), Mark::Visiting);
    stack.push(ty.clone());
    for (_, field_type) in fields {
        if let Some(cycle) = visit(field_type, shapes, marks, stack) {
            return Some(cycle);
        }
    }
    stack.pop();
    marks.insert(ty.clone(), Mark::Done);
    None
}

// ----- Tests -----

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn unknown_type_is_an_error_and_leaves_container_alone() {
        let registry = TemplateRegistry::builder().build().unwrap();
        let container = Node::element("main");
        let placeholder = Node::element("p");
        container.append_child(&placeholder).unwrap();

        let observable = Observable::from(likeness_runtime::ObservableValue::new());
        let err = registry
            .instantiate("ghost", &container, "x", &observable)
            .unwrap_err();
        assert_eq!(err, TemplateError::UnknownType("ghost".into()));
        assert_eq!(container.child_count(), 1);

        let err = registry.create_observable("ghost").unwrap_err();
        assert_eq!(err, TemplateError::UnknownType("ghost".into()));
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let mut builder = TemplateRegistry::builder();
        builder.register_scalar("name").unwrap();
        let err = builder.register_array("name", "name").unwrap_err();
        assert_eq!(err, TemplateError::DuplicateType("name".into()));
    }

    #[test]
    fn registration_order_does_not_matter() {
        let mut builder = TemplateRegistry::builder();
        builder.register_array("people", "person").unwrap();
        builder
            .register_struct("person", StructType::new().field("name", "name"))
            .unwrap();
        builder.register_scalar("name").unwrap();
        let registry = builder.build().unwrap();

        let names: Vec<&str> = registry.type_names().map(TypeName::as_str).collect();
        assert_eq!(names, ["people", "person", "name"]);
        assert!(registry.create_observable("person").is_ok());
    }

    #[test]
    fn dangling_reference_fails_build() {
        let mut builder = TemplateRegistry::builder();
        builder
            .register_struct("person", StructType::new().field("name", "name"))
            .unwrap();
        let err = builder.build().unwrap_err();
        assert_eq!(
            err,
            TemplateError::UnresolvedReference {
                type_name: "person".into(),
                referenced: "name".into(),
            }
        );
    }

    #[test]
    fn struct_recursion_is_rejected() {
        let mut builder = TemplateRegistry::builder();
        builder
            .register_struct("a", StructType::new().field("b", "b"))
            .unwrap();
        builder
            .register_struct("b", StructType::new().field("a", "a"))
            .unwrap();
        let err = builder.build().unwrap_err();
        assert_eq!(
            err,
            TemplateError::RecursiveType {
                cycle: vec!["a".into(), "b".into(), "a".into()],
            }
        );
    }

    #[test]
    fn recursion_through_an_array_is_allowed() {
        let mut builder = TemplateRegistry::builder();
        builder.register_scalar("label").unwrap();
        builder
            .register_struct(
                "tree",
                StructType::new().field("label", "label").field("children", "forest"),
            )
            .unwrap();
        builder.register_array("forest", "tree").unwrap();
        let registry = builder.build().unwrap();

        let tree = registry.create_observable("tree").unwrap();
        let children = tree.as_map().unwrap().get_value("children").unwrap();
        assert!(children.as_array().unwrap().is_empty());
    }

    #[test]
    fn shapes_are_exposed() {
        let mut builder = TemplateRegistry::builder();
        builder.register_scalar("name").unwrap();
        builder.register_array("names", "name").unwrap();
        let registry = builder.build().unwrap();
        assert_eq!(registry.shape("name"), Some(TypeShape::Scalar));
        assert_eq!(
            registry.shape("names"),
            Some(TypeShape::Array {
                element: "name".into()
            })
        );
        assert_eq!(registry.shape("ghost"), None);
        assert_eq!(registry.len(), 2);
    }

    struct Heading;

    impl Renderable for Heading {
        fn shape(&self) -> TypeShape {
            TypeShape::Scalar
        }

        fn create_observable(&self, _: &TemplateRegistry) -> Result<Observable, TemplateError> {
            Ok(Observable::from(likeness_runtime::ObservableValue::new()))
        }

        fn instantiate(
            &self,
            _: &TemplateRegistry,
            container: &Node,
            name: &str,
            _: &Observable,
        ) -> Result<(), TemplateError> {
            let heading = Node::element("h2");
            heading.set_text_content(name);
            container.append_child(&heading)?;
            Ok(())
        }
    }

    #[test]
    fn custom_renderables_participate_in_structs() {
        let mut builder = TemplateRegistry::builder();
        builder.register("heading", Heading).unwrap();
        builder
            .register_struct("page", StructType::new().field("title", "heading"))
            .unwrap();
        let registry = builder.build().unwrap();

        let page = registry.create_observable("page").unwrap();
        let container = Node::element("main");
        registry.instantiate("page", &container, "Page", &page).unwrap();
        assert_eq!(container.query_selector("h2").unwrap().text_content(), "title");
    }
}
