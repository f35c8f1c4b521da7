//! Array types: a section that grows one row per element.
//!
//! # Failure Modes
//!
//! | Failure | When | Effect |
//! |---------|------|--------|
//! | Element template error | replay during `instantiate` | First error returned, section never attached |
//! | Element template error | live `add_element` | Logged at `error`, row skipped |
//! | Section dropped | live `add_element` | Element ignored |

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use likeness_dom::Node;
use likeness_runtime::{Observable, ObservableArray, ObservableKind, TypeName};
use tracing::error;

use crate::error::TemplateError;
use crate::prototype::{ElementSpec, SectionPrototype, find};
use crate::registry::TemplateRegistry;
use crate::renderable::{Renderable, TypeShape};

/// Renders an [`ObservableArray`] whose elements are of one registered type.
#[derive(Debug)]
pub struct ArrayTemplate {
    type_name: TypeName,
    element_type: TypeName,
    prototype: Node,
    row: ElementSpec,
    slot: String,
}

impl ArrayTemplate {
    /// # Errors
    ///
    /// [`TemplateError::Prototype`] when the slot selector matches nothing
    /// inside the row.
    pub fn new(
        type_name: impl Into<TypeName>,
        element_type: impl Into<TypeName>,
        prototype: &SectionPrototype,
    ) -> Result<Self, TemplateError> {
        let type_name = type_name.into();
        let fragment = prototype.fragment.build()?;
        find(&prototype.row.build()?, &prototype.slot, &type_name)?;
        Ok(Self {
            type_name,
            element_type: element_type.into(),
            prototype: fragment,
            row: prototype.row.clone(),
            slot: prototype.slot.clone(),
        })
    }

    #[must_use]
    pub fn element_type(&self) -> &TypeName {
        &self.element_type
    }
}

/// Build one row for `element` and append it to `section`.
fn render_row(
    registry: &TemplateRegistry,
    section: &Node,
    row: &ElementSpec,
    slot: &str,
    type_name: &TypeName,
    element_type: &TypeName,
    element: &Observable,
) -> Result<(), TemplateError> {
    let row = row.build()?;
    let inner = find(&row, slot, type_name)?;
    registry.instantiate(element_type.as_str(), &inner, "", element)?;
    section.append_child(&row)?;
    Ok(())
}

impl Renderable for ArrayTemplate {
    fn shape(&self) -> TypeShape {
        TypeShape::Array {
            element: self.element_type.clone(),
        }
    }

    fn create_observable(&self, _registry: &TemplateRegistry) -> Result<Observable, TemplateError> {
        Ok(Observable::from(ObservableArray::new(self.element_type.clone())))
    }

    fn instantiate(
        &self,
        registry: &TemplateRegistry,
        container: &Node,
        _name: &str,
        observable: &Observable,
    ) -> Result<(), TemplateError> {
        let array = observable
            .as_array()
            .ok_or_else(|| TemplateError::ShapeMismatch {
                type_name: self.type_name.clone(),
                expected: ObservableKind::Array,
                found: observable.kind(),
            })?;
        if !registry.contains(self.element_type.as_str()) {
            return Err(TemplateError::UnknownType(self.element_type.clone()));
        }

        let section = self.prototype.clone_node(true);
        let replaying = Rc::new(Cell::new(true));
        let replay_error: Rc<RefCell<Option<TemplateError>>> = Rc::new(RefCell::new(None));

        {
            let registry = registry.clone();
            let weak = section.downgrade();
            let row = self.row.clone();
            let slot = self.slot.clone();
            let type_name = self.type_name.clone();
            let element_type = self.element_type.clone();
            let replaying = Rc::clone(&replaying);
            let replay_error = Rc::clone(&replay_error);

            array.register(move |element| {
                let Some(section) = weak.upgrade() else {
                    return;
                };
                if replaying.get() {
                    if replay_error.borrow().is_some() {
                        return;
                    }
                    if let Err(err) = render_row(
                        &registry,
                        &section,
                        &row,
                        &slot,
                        &type_name,
                        &element_type,
                        element,
                    ) {
                        *replay_error.borrow_mut() = Some(err);
                    }
                } else if let Err(err) = render_row(
                    &registry,
                    &section,
                    &row,
                    &slot,
                    &type_name,
                    &element_type,
                    element,
                ) {
                    error!(
                        array = %type_name,
                        element = %element_type,
                        error = %err,
                        "dropping row for added element"
                    );
                }
            });
        }
        replaying.set(false);

        if let Some(err) = replay_error.borrow_mut().take() {
            return Err(err);
        }
        container.append_child(&section)?;
        Ok(())
    }
}

// ----- Tests -----
