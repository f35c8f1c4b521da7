#![forbid(unsafe_code)]

//! Likeness public facade crate.
//!
//! Declarative data binding: register types once, create observables for
//! them, and instantiate templates that keep DOM and data in sync.

pub use likeness_dom as dom;
pub use likeness_runtime as runtime;
pub use likeness_templates as templates;

pub mod prelude {
    pub use likeness_dom::{Event, EventKind, Node};
    pub use likeness_runtime::{
        Observable, ObservableArray, ObservableKind, ObservableMap, ObservableValue, Scalar,
        TypeName,
    };
    #[cfg(feature = "schema-config")]
    pub use likeness_templates::{ActionTable, SchemaConfig};
    pub use likeness_templates::{
        ElementSpec, Prototypes, RegistryBuilder, Renderable, StructType, TemplateError,
        TemplateRegistry, TypeShape,
    };
}
