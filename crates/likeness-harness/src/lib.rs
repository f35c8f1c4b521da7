#![forbid(unsafe_code)]

//! Test harness and reference fixtures for Likeness.
//!
//! - [`fixtures`]: the `people` schema used across end-to-end tests, and
//!   helpers to seed it.
//! - [`Rendered`]: a rendered root plus accessors for what tests inspect.
//! - [`strategies`]: proptest strategies for field values and edit scripts.

use std::cell::RefCell;
use std::rc::Rc;

use likeness_dom::Node;
use likeness_runtime::{Observable, Scalar};
use likeness_templates::{TemplateError, TemplateRegistry};

pub mod fixtures {
    //! The `people` schema: `name` and `age` scalars, a `person` struct and a
    //! `people` array of persons.

    use likeness_runtime::{Observable, ObservableValue, Scalar};
    use likeness_templates::{
        ActionTable, RegistryBuilder, SchemaConfig, StructType, TemplateError, TemplateRegistry,
    };

    /// TOML declaration of the `people` schema.
    pub const PEOPLE_SCHEMA: &str = r#"
[types.name]
kind = "scalar"

[types.age]
kind = "scalar"

[types.person]
kind = "struct"
fields = [
    { name = "name", type = "name" },
    { name = "age", type = "age" },
]

[types.people]
kind = "array"
element = "person"
"#;

    #[must_use]
    pub fn person_type() -> StructType {
        StructType::new().field("name", "name").field("age", "age")
    }

    /// Register the `people` schema with `person` declared as given.
    ///
    /// # Errors
    ///
    /// Propagates registration errors.
    pub fn register_people(
        builder: &mut RegistryBuilder,
        person: StructType,
    ) -> Result<(), TemplateError> {
        builder
            .register_scalar("name")?
            .register_scalar("age")?
            .register_struct("person", person)?
            .register_array("people", "person")?;
        Ok(())
    }

    /// The `people` registry with action-free persons.
    ///
    /// # Panics
    ///
    /// Never for the fixed schema.
    #[must_use]
    pub fn people_registry() -> TemplateRegistry {
        people_registry_with(person_type())
    }

    /// # Panics
    ///
    /// If `person` references types outside the schema.
    #[must_use]
    pub fn people_registry_with(person: StructType) -> TemplateRegistry {
        let mut builder = TemplateRegistry::builder();
        register_people(&mut builder, person).expect("people schema registers");
        builder.build().expect("people schema validates")
    }

    /// The `people` registry loaded from [`PEOPLE_SCHEMA`].
    ///
    /// # Panics
    ///
    /// If the embedded schema stops parsing.
    #[must_use]
    pub fn people_registry_from_schema(actions: &ActionTable) -> TemplateRegistry {
        SchemaConfig::from_toml_str(PEOPLE_SCHEMA)
            .expect("embedded schema parses")
            .builder(actions)
            .expect("embedded schema registers")
            .build()
            .expect("embedded schema validates")
    }

    /// A fresh `person` observable with both fields set.
    ///
    /// # Panics
    ///
    /// If `registry` has no `person` map type.
    #[must_use]
    pub fn person(registry: &TemplateRegistry, name: &str, age: i64) -> Observable {
        let person = registry.create_observable("person").expect("person type");
        set_field(&person, "name", name);
        set_field(&person, "age", age);
        person
    }

    /// Set a scalar field of a struct observable.
    ///
    /// # Panics
    ///
    /// If `observable` is not a map or the field is not a value.
    pub fn set_field(observable: &Observable, field: &str, value: impl Into<Scalar>) {
        field_value(observable, field).set_value(value);
    }

    /// # Panics
    ///
    /// If `observable` is not a map or the field is not a value.
    #[must_use]
    pub fn field_value(observable: &Observable, field: &str) -> ObservableValue {
        observable
            .as_map()
            .and_then(|map| map.get_value(field))
            .and_then(Observable::as_value)
            .cloned()
            .unwrap_or_else(|| panic!("no scalar field `{field}`"))
    }
}

/// A detached `main` element that templates were rendered into.
#[derive(Debug, Clone)]
pub struct Rendered {
    root: Node,
}

impl Rendered {
    #[must_use]
    pub fn empty() -> Self {
        Self {
            root: Node::element("main"),
        }
    }

    /// Instantiate `type_name` into a fresh root.
    ///
    /// # Errors
    ///
    /// Whatever the registry reports.
    pub fn render(
        registry: &TemplateRegistry,
        type_name: &str,
        name: &str,
        observable: &Observable,
    ) -> Result<Self, TemplateError> {
        let rendered = Self::empty();
        rendered.render_into(registry, type_name, name, observable)?;
        Ok(rendered)
    }

    /// Instantiate another template into this root.
    ///
    /// # Errors
    ///
    /// Whatever the registry reports.
    pub fn render_into(
        &self,
        registry: &TemplateRegistry,
        type_name: &str,
        name: &str,
        observable: &Observable,
    ) -> Result<(), TemplateError> {
        registry.instantiate(type_name, &self.root, name, observable)
    }

    #[must_use]
    pub fn root(&self) -> &Node {
        &self.root
    }

    #[must_use]
    pub fn html(&self) -> String {
        self.root.inner_html()
    }

    #[must_use]
    pub fn inputs(&self) -> Vec<Node> {
        self.root.query_selector_all("input")
    }

    /// Current input values in document order; unset inputs read as "".
    #[must_use]
    pub fn input_values(&self) -> Vec<String> {
        self.inputs()
            .iter()
            .map(|input| input.value().unwrap_or_default())
            .collect()
    }

    #[must_use]
    pub fn labels(&self) -> Vec<String> {
        self.texts("label")
    }

    #[must_use]
    pub fn headers(&self) -> Vec<String> {
        self.texts(".card-header")
    }

    /// Number of array rows under the root.
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.root.query_selector_all(".col-sm-12").len()
    }

    fn texts(&self, selector: &str) -> Vec<String> {
        self.root
            .query_selector_all(selector)
            .iter()
            .map(Node::text_content)
            .collect()
    }
}

/// Markup the default field prototype renders for `label` holding `value`.
#[must_use]
pub fn field_html(label: &str, value: &str) -> String {
    format!(
        "<div class=\"form-group row\">\
         <label id=\"label\" class=\"col-sm-2 col-form-label\" for=\"field\">{label}</label>\
         <div class=\"col-sm-10\"><input id=\"field\" class=\"form-control\" value=\"{value}\"></div>\
         </div>"
    )
}

/// Markup the default card prototype renders around `body`.
#[must_use]
pub fn card_html(header: &str, body: &str) -> String {
    format!(
        "<div class=\"card\"><div class=\"card-header\">{header}</div>\
         <div class=\"card-body\">{body}</div></div>"
    )
}

/// Markup of one default array row holding `inner`.
#[must_use]
pub fn row_html(inner: &str) -> String {
    format!("<div class=\"row\"><div class=\"col-sm-12\">{inner}</div></div>")
}

/// A listener that records every value it is called with.
#[must_use]
pub fn recorder() -> (Rc<RefCell<Vec<Scalar>>>, impl Fn(&Scalar) + 'static) {
    let log = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&log);
    (log, move |value: &Scalar| sink.borrow_mut().push(value.clone()))
}

pub mod strategies {
    //! Proptest strategies shared by the property suites.

    use proptest::prelude::*;

    /// Text a user might type into a field.
    pub fn field_text() -> impl Strategy<Value = String> {
        "[A-Za-z][a-z]{0,7}"
    }

    /// `(name, age)` pairs for seeding persons.
    pub fn person_data() -> impl Strategy<Value = (String, i64)> {
        (field_text(), 0i64..120)
    }

    /// A split of `n` additions into before/after instantiation.
    pub fn addition_split(max: usize) -> impl Strategy<Value = (usize, usize)> {
        (0..=max, 0..=max)
    }
}
