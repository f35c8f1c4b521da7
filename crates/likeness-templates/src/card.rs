//! Struct types: a card with one nested template per field and one control
//! per action.

use std::fmt;
use std::rc::Rc;

use likeness_dom::{EventKind, Node};
use likeness_runtime::{Observable, ObservableKind, ObservableMap, TypeName};

use crate::error::TemplateError;
use crate::prototype::{CardPrototype, ElementSpec, find};
use crate::registry::TemplateRegistry;
use crate::renderable::{Renderable, TypeShape};

/// Application handler run when an action control is clicked. It receives the
/// struct's own map.
pub type Action = Rc<dyn Fn(&ObservableMap)>;

/// Declaration of a struct type: ordered fields and ordered actions.
///
/// ```
/// use likeness_templates::StructType;
///
/// let person = StructType::new()
///     .field("name", "name")
///     .field("age", "age")
///     .action("greet", |map| {
///         let _ = map.get_value("name");
///     });
/// assert_eq!(person.fields().len(), 2);
/// ```
#[derive(Clone, Default)]
pub struct StructType {
    fields: Vec<(String, TypeName)>,
    actions: Vec<(String, Action)>,
}

impl StructType {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field. Redeclaring a name replaces its type and keeps its
    /// position.
    #[must_use]
    pub fn field(mut self, name: impl Into<String>, type_name: impl Into<TypeName>) -> Self {
        let name = name.into();
        let type_name = type_name.into();
        match self.fields.iter_mut().find(|(existing, _)| *existing == name) {
            Some(slot) => slot.1 = type_name,
            None => self.fields.push((name, type_name)),
        }
        self
    }

    #[must_use]
    pub fn action(self, name: impl Into<String>, handler: impl Fn(&ObservableMap) + 'static) -> Self {
        self.action_rc(name, Rc::new(handler))
    }

    /// Add an action from a shared handler.
    #[must_use]
    pub fn action_rc(mut self, name: impl Into<String>, handler: Action) -> Self {
        self.actions.push((name.into(), handler));
        self
    }

    #[must_use]
    pub fn fields(&self) -> &[(String, TypeName)] {
        &self.fields
    }

    pub fn action_names(&self) -> impl Iterator<Item = &str> {
        self.actions.iter().map(|(name, _)| name.as_str())
    }
}

impl fmt::Debug for StructType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StructType")
            .field("fields", &self.fields)
            .field("actions", &self.action_names().collect::<Vec<_>>())
            .finish()
    }
}

/// Renders a [`StructType`] bound to an [`ObservableMap`].
#[derive(Debug)]
pub struct StructTemplate {
    type_name: TypeName,
    definition: StructType,
    prototype: Node,
    header: String,
    body: String,
    action: ElementSpec,
}

impl StructTemplate {
    /// # Errors
    ///
    /// [`TemplateError::Prototype`] when the header or body selector matches
    /// nothing in the card fragment.
    pub fn new(
        type_name: impl Into<TypeName>,
        definition: StructType,
        prototype: &CardPrototype,
    ) -> Result<Self, TemplateError> {
        let type_name = type_name.into();
        let fragment = prototype.fragment.build()?;
        find(&fragment, &prototype.header, &type_name)?;
        find(&fragment, &prototype.body, &type_name)?;
        Ok(Self {
            type_name,
            definition,
            prototype: fragment,
            header: prototype.header.clone(),
            body: prototype.body.clone(),
            action: prototype.action.clone(),
        })
    }

    #[must_use]
    pub fn definition(&self) -> &StructType {
        &self.definition
    }
}

impl Renderable for StructTemplate {
    fn shape(&self) -> TypeShape {
        TypeShape::Struct {
            fields: self.definition.fields.clone(),
            actions: self.definition.action_names().map(str::to_owned).collect(),
        }
    }

    fn create_observable(&self, registry: &TemplateRegistry) -> Result<Observable, TemplateError> {
        let fields = self
            .definition
            .fields
            .iter()
            .map(|(name, ty)| Ok((name.clone(), registry.create_observable(ty.as_str())?)))
            .collect::<Result<Vec<_>, TemplateError>>()?;
        Ok(Observable::from(ObservableMap::new(fields)))
    }

    fn instantiate(
        &self,
        registry: &TemplateRegistry,
        container: &Node,
        name: &str,
        observable: &Observable,
    ) -> Result<(), TemplateError> {
        let map = observable
            .as_map()
            .ok_or_else(|| TemplateError::ShapeMismatch {
                type_name: self.type_name.clone(),
                expected: ObservableKind::Map,
                found: observable.kind(),
            })?;

        let card = self.prototype.clone_node(true);
        find(&card, &self.header, &self.type_name)?.set_text_content(name);
        let body = find(&card, &self.body, &self.type_name)?;

        for (field, field_type) in &self.definition.fields {
            let child = map
                .get_value(field)
                .ok_or_else(|| TemplateError::MissingField {
                    type_name: self.type_name.clone(),
                    field: field.clone(),
                })?;
            registry.instantiate(field_type.as_str(), &body, field, child)?;
        }

        for (label, handler) in &self.definition.actions {
            let control = self.action.build()?;
            control.set_text_content(label.as_str());
            let handler = Rc::clone(handler);
            let target = map.clone();
            control.add_event_listener(EventKind::Click, move |_| handler(&target));
            body.append_child(&control)?;
        }

        container.append_child(&card)?;
        Ok(())
    }
}

// ----- Tests -----
