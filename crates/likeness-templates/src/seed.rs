//! Seeding observables from JSON (feature `serde`).

use likeness_runtime::{Observable, Scalar, TypeName};
use serde_json::Value;

use crate::error::TemplateError;
use crate::registry::TemplateRegistry;
use crate::renderable::TypeShape;

impl TemplateRegistry {
    /// Create `type_name`'s observable and fill it from `data`.
    ///
    /// Struct fields are matched by name: unknown keys are ignored and
    /// missing keys keep their fresh value. Array items become elements in
    /// order. A `null` for a struct or array leaves it empty.
    ///
    /// # Errors
    ///
    /// [`TemplateError::DataShape`] when `data` does not fit the type, and
    /// the usual lookup errors.
    pub fn observable_from_json(
        &self,
        type_name: &str,
        data: &Value,
    ) -> Result<Observable, TemplateError> {
        let observable = self.create_observable(type_name)?;
        self.fill(type_name, &observable, data)?;
        Ok(observable)
    }

    fn fill(&self, type_name: &str, observable: &Observable, data: &Value) -> Result<(), TemplateError> {
        let shape = self
            .shape(type_name)
            .ok_or_else(|| TemplateError::UnknownType(TypeName::from(type_name)))?;
        let mismatch = |reason: String| TemplateError::DataShape {
            type_name: TypeName::from(type_name),
            reason,
        };

        match (shape, observable) {
            (TypeShape::Scalar, Observable::Value(value)) => {
                let scalar = Scalar::from_json(data)
                    .ok_or_else(|| mismatch(format!("expected a scalar, found {}", describe(data))))?;
                value.set_value(scalar);
            }
            (TypeShape::Struct { .. } | TypeShape::Array { .. }, _) if data.is_null() => {}
            (TypeShape::Struct { fields, .. }, Observable::Map(map)) => {
                let Value::Object(object) = data else {
                    return Err(mismatch(format!("expected an object, found {}", describe(data))));
                };
                for (field, field_type) in &fields {
                    let Some(item) = object.get(field) else {
                        continue;
                    };
                    let child = map.get_value(field).ok_or_else(|| TemplateError::MissingField {
                        type_name: TypeName::from(type_name),
                        field: field.clone(),
                    })?;
                    self.fill(field_type.as_str(), child, item)?;
                }
            }
            (TypeShape::Array { element }, Observable::Array(array)) => {
                let Value::Array(items) = data else {
                    return Err(mismatch(format!("expected an array, found {}", describe(data))));
                };
                for item in items {
                    let child = self.create_observable(element.as_str())?;
                    self.fill(element.as_str(), &child, item)?;
                    array.add_element(child);
                }
            }
            (shape, observable) => {
                return Err(TemplateError::ShapeMismatch {
                    type_name: TypeName::from(type_name),
                    expected: shape.observable_kind(),
                    found: observable.kind(),
                });
            }
        }
        Ok(())
    }
}

fn describe(data: &Value) -> &'static str {
    match data {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

// ----- Tests -----
