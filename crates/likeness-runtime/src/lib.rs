#![forbid(unsafe_code)]

//! Runtime data model for Likeness: type identifiers and observables.

pub mod reactive;
pub mod type_name;

pub use reactive::{
    ChangeEvent, Observable, ObservableArray, ObservableKind, ObservableMap, ObservableValue,
    Scalar,
};
pub use type_name::TypeName;
