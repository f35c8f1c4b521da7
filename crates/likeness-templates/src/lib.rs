#![forbid(unsafe_code)]

//! Type registry and template instantiation for Likeness.
//!
//! A [`TemplateRegistry`] maps type names to [`Renderable`] entries. Each
//! entry knows its [`TypeShape`], builds a fresh observable for the type and
//! renders DOM bound to such an observable. Three built-in kinds cover most
//! schemas:
//!
//! | Kind | Registration | Renders | Observable |
//! |------|--------------|---------|------------|
//! | Scalar | [`RegistryBuilder::register_scalar`] | labelled input | `ObservableValue` |
//! | Struct | [`RegistryBuilder::register_struct`] | card with fields and action controls | `ObservableMap` |
//! | Array | [`RegistryBuilder::register_array`] | section with one row per element | `ObservableArray` |
//!
//! ```
//! use likeness_dom::Node;
//! use likeness_templates::{StructType, TemplateRegistry};
//!
//! let mut builder = TemplateRegistry::builder();
//! builder.register_scalar("name")?;
//! builder.register_struct("person", StructType::new().field("name", "name"))?;
//! let registry = builder.build()?;
//!
//! let person = registry.create_observable("person")?;
//! let root = Node::element("main");
//! registry.instantiate("person", &root, "Person", &person)?;
//! assert_eq!(root.query_selector(".card-header").unwrap().text_content(), "Person");
//! # Ok::<(), likeness_templates::TemplateError>(())
//! ```
//!
//! # Feature Flags
//!
//! - `serde`: JSON seeding via [`TemplateRegistry::observable_from_json`] and
//!   serializable prototypes.
//! - `schema-config`: declare types in TOML or JSON files.

pub mod card;
#[cfg(feature = "schema-config")]
pub mod config;
pub mod error;
pub mod prototype;
pub mod registry;
pub mod renderable;
pub mod scalar;
pub mod section;
#[cfg(feature = "serde")]
mod seed;

pub use card::{Action, StructTemplate, StructType};
#[cfg(feature = "schema-config")]
pub use config::{ActionTable, ConfigError, FieldConfig, SchemaConfig, TypeConfig};
pub use error::TemplateError;
pub use prototype::{CardPrototype, ElementSpec, FieldPrototype, Prototypes, SectionPrototype};
pub use registry::{RegistryBuilder, TemplateRegistry};
pub use renderable::{Renderable, TypeShape};
pub use scalar::ScalarTemplate;
pub use section::ArrayTemplate;
