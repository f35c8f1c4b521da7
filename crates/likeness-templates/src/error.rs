//! Registry and template errors.
//!
//! # Failure Modes
//!
//! | Failure | Raised by | Meaning |
//! |---------|-----------|---------|
//! | `UnknownType` | lookups | Type was never registered |
//! | `DuplicateType` | registration | Type name already taken |
//! | `UnresolvedReference` | `build()` | A struct field or array element names a missing type |
//! | `RecursiveType` | `build()` | A struct contains itself through struct fields only |
//! | `MissingField` | struct template | Observable map lacks a declared field |
//! | `ShapeMismatch` | every template | Observable kind differs from the type's |
//! | `Prototype` | registration, instantiation | A selector matches nothing in a prototype |
//! | `UnknownAction` | schema config | An action name has no handler |
//! | `DataShape` | JSON seeding | Input JSON does not fit the type |

use likeness_dom::DomError;
use likeness_runtime::{ObservableKind, TypeName};
use thiserror::Error;

/// Failure of a registration, validation or instantiation step.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    #[error("unknown type `{0}`")]
    UnknownType(TypeName),

    #[error("type `{0}` is already registered")]
    DuplicateType(TypeName),

    #[error("type `{type_name}` references unregistered type `{referenced}`")]
    UnresolvedReference {
        type_name: TypeName,
        referenced: TypeName,
    },

    #[error("struct type contains itself through its fields: {}", join_cycle(.cycle))]
    RecursiveType { cycle: Vec<TypeName> },

    #[error("struct `{type_name}` has no observable for field `{field}`")]
    MissingField { type_name: TypeName, field: String },

    #[error("type `{type_name}` expected {expected} observable, found {found}")]
    ShapeMismatch {
        type_name: TypeName,
        expected: ObservableKind,
        found: ObservableKind,
    },

    #[error("prototype for `{type_name}` has no element matching `{selector}`")]
    Prototype {
        type_name: TypeName,
        selector: String,
    },

    #[error("struct `{type_name}` declares action `{action}` with no handler")]
    UnknownAction { type_name: TypeName, action: String },

    #[error("data for `{type_name}` does not fit: {reason}")]
    DataShape { type_name: TypeName, reason: String },

    #[error(transparent)]
    Dom(#[from] DomError),
}

fn join_cycle(cycle: &[TypeName]) -> String {
    cycle
        .iter()
        .map(TypeName::as_str)
        .collect::<Vec<_>>()
        .join(" -> ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_types() {
        let err = TemplateError::UnknownType("ghost".into());
        assert_eq!(err.to_string(), "unknown type `ghost`");

        let err = TemplateError::RecursiveType {
            cycle: vec!["a".into(), "b".into(), "a".into()],
        };
        assert_eq!(
            err.to_string(),
            "struct type contains itself through its fields: a -> b -> a"
        );

        let err = TemplateError::ShapeMismatch {
            type_name: "name".into(),
            expected: ObservableKind::Value,
            found: ObservableKind::Array,
        };
        assert_eq!(
            err.to_string(),
            "type `name` expected value observable, found array"
        );
    }
}
