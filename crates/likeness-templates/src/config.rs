//! Type declarations loaded from TOML or JSON (feature `schema-config`).
//!
//! ```toml
//! [types.name]
//! kind = "scalar"
//!
//! [types.person]
//! kind = "struct"
//! fields = [{ name = "name", type = "name" }]
//! actions = ["save"]
//!
//! [types.people]
//! kind = "array"
//! element = "person"
//! ```
//!
//! Action names resolve against an [`ActionTable`] supplied by the
//! application. An optional `[prototypes]` table overrides the default markup.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use ahash::AHashMap;
use likeness_runtime::{ObservableMap, TypeName};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::card::{Action, StructType};
use crate::error::TemplateError;
use crate::prototype::Prototypes;
use crate::registry::RegistryBuilder;

/// Failure to read or parse a schema file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid TOML schema: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid JSON schema: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported schema format: {} (expected .toml or .json)", .0.display())]
    UnsupportedFormat(PathBuf),
}

/// A set of type declarations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaConfig {
    #[serde(default)]
    pub types: BTreeMap<String, TypeConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prototypes: Option<Prototypes>,
}

/// Declaration of one type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum TypeConfig {
    Scalar,
    Struct {
        #[serde(default)]
        fields: Vec<FieldConfig>,
        #[serde(default)]
        actions: Vec<String>,
    },
    Array {
        element: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldConfig {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
}

impl SchemaConfig {
    /// # Errors
    ///
    /// [`ConfigError::Toml`] on malformed input.
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(input)?)
    }

    /// # Errors
    ///
    /// [`ConfigError::Json`] on malformed input.
    pub fn from_json_str(input: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(input)?)
    }

    /// Load a schema file, choosing the format by extension.
    ///
    /// # Errors
    ///
    /// [`ConfigError::UnsupportedFormat`] for an extension other than
    /// `.toml`/`.json`, [`ConfigError::Io`] if the file cannot be read, or a
    /// parse error.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);
        let parse: fn(&str) -> Result<Self, ConfigError> = match extension.as_deref() {
            Some("toml") => Self::from_toml_str,
            Some("json") => Self::from_json_str,
            _ => return Err(ConfigError::UnsupportedFormat(path.to_path_buf())),
        };
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        parse(&contents)
    }

    /// Register every declared type on `builder`.
    ///
    /// # Errors
    ///
    /// [`TemplateError::UnknownAction`] when an action has no handler in
    /// `actions`, plus any registration error.
    pub fn apply(
        &self,
        builder: &mut RegistryBuilder,
        actions: &ActionTable,
    ) -> Result<(), TemplateError> {
        for (name, declaration) in &self.types {
            match declaration {
                TypeConfig::Scalar => {
                    builder.register_scalar(name.as_str())?;
                }
                TypeConfig::Struct {
                    fields,
                    actions: names,
                } => {
                    let mut definition = StructType::new();
                    for field in fields {
                        definition = definition.field(field.name.as_str(), field.type_name.as_str());
                    }
                    for action in names {
                        let handler =
                            actions
                                .get(action)
                                .ok_or_else(|| TemplateError::UnknownAction {
                                    type_name: TypeName::from(name.as_str()),
                                    action: action.clone(),
                                })?;
                        definition = definition.action_rc(action.as_str(), Rc::clone(handler));
                    }
                    builder.register_struct(name.as_str(), definition)?;
                }
                TypeConfig::Array { element } => {
                    builder.register_array(name.as_str(), element.as_str())?;
                }
            }
        }
        Ok(())
    }

    /// A builder carrying this schema's prototypes with every type
    /// registered.
    ///
    /// # Errors
    ///
    /// See [`SchemaConfig::apply`].
    pub fn builder(&self, actions: &ActionTable) -> Result<RegistryBuilder, TemplateError> {
        let mut builder =
            RegistryBuilder::new().with_prototypes(self.prototypes.clone().unwrap_or_default());
        self.apply(&mut builder, actions)?;
        Ok(builder)
    }
}

/// Application-supplied action handlers, by name.
#[derive(Clone, Default)]
pub struct ActionTable {
    handlers: AHashMap<String, Action>,
}

impl fmt::Debug for ActionTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        names.sort_unstable();
        f.debug_struct("ActionTable").field("handlers", &names).finish()
    }
}

impl ActionTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a handler, replacing any earlier one of the same name.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, handler: impl Fn(&ObservableMap) + 'static) -> Self {
        self.insert(name, handler);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, handler: impl Fn(&ObservableMap) + 'static) {
        self.handlers.insert(name.into(), Rc::new(handler));
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Action> {
        self.handlers.get(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

// ----- Tests -----

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::io::Write as _;

    use super::*;
    use likeness_dom::Node;
    use pretty_assertions::assert_eq;

    const PEOPLE: &str = r#"
        [types.name]
        kind = "scalar"

        [types.people]
        kind = "array"
        element = "person"

        [types.person]
        kind = "struct"
        fields = [
            { name = "name", type = "name" },
            { name = "age", type = "name" },
        ]
        actions = ["save"]
    "#;

    #[test]
    fn parses_toml_declarations() {
        let schema = SchemaConfig::from_toml_str(PEOPLE).unwrap();
        assert_eq!(schema.types.len(), 3);
        assert_eq!(schema.types["name"], TypeConfig::Scalar);
        assert_eq!(
            schema.types["people"],
            TypeConfig::Array {
                element: "person".into()
            }
        );
        let TypeConfig::Struct { fields, actions } = &schema.types["person"] else {
            panic!("person should be a struct");
        };
        assert_eq!(fields[1].type_name, "name");
        assert_eq!(actions, &["save"]);
    }

    #[test]
    fn json_and_toml_agree() {
        let json = r#"{
            "types": {
                "name": { "kind": "scalar" },
                "people": { "kind": "array", "element": "person" },
                "person": {
                    "kind": "struct",
                    "fields": [
                        { "name": "name", "type": "name" },
                        { "name": "age", "type": "name" }
                    ],
                    "actions": ["save"]
                }
            }
        }"#;
        assert_eq!(
            SchemaConfig::from_json_str(json).unwrap(),
            SchemaConfig::from_toml_str(PEOPLE).unwrap()
        );
    }

    #[test]
    fn applied_schema_renders_with_actions() {
        let clicks = Rc::new(Cell::new(0));
        let counter = Rc::clone(&clicks);
        let actions = ActionTable::new().with("save", move |_| counter.set(counter.get() + 1));

        let schema = SchemaConfig::from_toml_str(PEOPLE).unwrap();
        let registry = schema.builder(&actions).unwrap().build().unwrap();
        let person = registry.create_observable("person").unwrap();
        let container = Node::element("main");
        registry.instantiate("person", &container, "P", &person).unwrap();

        container.query_selector("button").unwrap().click();
        assert_eq!(clicks.get(), 1);
    }

    #[test]
    fn unknown_action_is_reported() {
        let schema = SchemaConfig::from_toml_str(PEOPLE).unwrap();
        let err = schema.builder(&ActionTable::new()).unwrap_err();
        assert_eq!(
            err,
            TemplateError::UnknownAction {
                type_name: "person".into(),
                action: "save".into(),
            }
        );
    }

    #[test]
    fn prototypes_override_markup() {
        let schema = SchemaConfig::from_toml_str(
            r#"
            [types.name]
            kind = "scalar"

            [prototypes.field]
            input = "input"
            label = "span"

            [prototypes.field.fragment]
            tag = "p"
            children = [{ tag = "span" }, { tag = "input" }]
            "#,
        )
        .unwrap();
        let registry = schema.builder(&ActionTable::new()).unwrap().build().unwrap();
        let value = registry.create_observable("name").unwrap();
        let container = Node::element("main");
        registry.instantiate("name", &container, "Name", &value).unwrap();
        assert_eq!(
            container.inner_html(),
            "<p><span>Name</span><input value=\"\"></p>"
        );
    }

    #[test]
    fn load_picks_format_by_extension() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(PEOPLE.as_bytes()).unwrap();
        let schema = SchemaConfig::load(file.path()).unwrap();
        assert_eq!(schema.types.len(), 3);

        let err = SchemaConfig::load("schema.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedFormat(_)));

        let dir = tempfile::tempdir().unwrap();
        let err = SchemaConfig::load(dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
        assert!(err.to_string().starts_with("failed to read"));
    }

    #[test]
    fn malformed_input_is_a_parse_error() {
        let err = SchemaConfig::from_toml_str("[types.x]\nkind = \"tuple\"").unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
        let err = SchemaConfig::from_json_str("{").unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }
}
