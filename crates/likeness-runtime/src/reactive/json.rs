//! JSON views of the observable tree (feature `serde`).

use serde_json::{Map, Number, Value};

use super::observable::Observable;
use super::scalar::Scalar;

impl Scalar {
    /// Convert to a JSON value. Non-finite floats become `null`.
    #[must_use]
    pub fn to_json(&self) -> Value {
        match self {
            Self::Null => Value::Null,
            Self::Bool(b) => Value::Bool(*b),
            Self::Int(i) => Value::Number((*i).into()),
            Self::Float(x) => Number::from_f64(*x).map_or(Value::Null, Value::Number),
            Self::Text(s) => Value::String(s.clone()),
        }
    }

    /// Convert a JSON scalar. Arrays and objects are not scalars.
    #[must_use]
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Null => Some(Self::Null),
            Value::Bool(b) => Some(Self::Bool(*b)),
            Value::Number(n) => n
                .as_i64()
                .map(Self::Int)
                .or_else(|| n.as_f64().map(Self::Float)),
            Value::String(s) => Some(Self::Text(s.clone())),
            Value::Array(_) | Value::Object(_) => None,
        }
    }
}

impl Observable {
    /// Snapshot the current state: values as scalars, maps as objects,
    /// arrays as lists.
    #[must_use]
    pub fn to_json(&self) -> Value {
        match self {
            Self::Value(value) => value.with(Scalar::to_json),
            Self::Map(map) => {
                let mut object = Map::new();
                for (name, child) in map.iter() {
                    object.insert(name.to_string(), child.to_json());
                }
                Value::Object(object)
            }
            Self::Array(array) => {
                Value::Array(array.elements().iter().map(Observable::to_json).collect())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reactive::{ObservableArray, ObservableMap, ObservableValue};
    use serde_json::json;

    #[test]
    fn snapshot_mirrors_tree() {
        let name = ObservableValue::new();
        name.set_value("Ada");
        let age = ObservableValue::new();
        age.set_value(36);
        let person = ObservableMap::new([
            ("name", Observable::from(name)),
            ("age", Observable::from(age)),
        ]);
        let people = ObservableArray::new("person");
        people.add_element(Observable::from(person));

        assert_eq!(
            Observable::from(people).to_json(),
            json!([{ "name": "Ada", "age": 36 }])
        );
    }

    #[test]
    fn scalar_conversions() {
        assert_eq!(Scalar::from_json(&json!(3)), Some(Scalar::Int(3)));
        assert_eq!(Scalar::from_json(&json!(2.5)), Some(Scalar::Float(2.5)));
        assert_eq!(Scalar::from_json(&json!(null)), Some(Scalar::Null));
        assert_eq!(Scalar::from_json(&json!([1])), None);
        assert_eq!(Scalar::Float(f64::NAN).to_json(), Value::Null);
        assert_eq!(Scalar::from("x").to_json(), json!("x"));
    }

    #[test]
    fn scalar_serde_is_untagged() {
        let encoded = serde_json::to_string(&Scalar::from("x")).unwrap();
        assert_eq!(encoded, "\"x\"");
        let decoded: Scalar = serde_json::from_str("12").unwrap();
        assert_eq!(decoded, Scalar::Int(12));
    }
}
