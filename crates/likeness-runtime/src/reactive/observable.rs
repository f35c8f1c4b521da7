//! The three observable kinds behind one handle.

use std::fmt;

use super::array::ObservableArray;
use super::map::ObservableMap;
use super::value::ObservableValue;

/// Which container kind an [`Observable`] is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObservableKind {
    Value,
    Map,
    Array,
}

impl fmt::Display for ObservableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Value => "value",
            Self::Map => "map",
            Self::Array => "array",
        })
    }
}

/// A node of the observable data tree.
///
/// Cloning clones the handle; the underlying cell, map or array is shared.
#[derive(Debug, Clone)]
pub enum Observable {
    Value(ObservableValue),
    Map(ObservableMap),
    Array(ObservableArray),
}

impl Observable {
    #[must_use]
    pub const fn kind(&self) -> ObservableKind {
        match self {
            Self::Value(_) => ObservableKind::Value,
            Self::Map(_) => ObservableKind::Map,
            Self::Array(_) => ObservableKind::Array,
        }
    }

    #[must_use]
    pub const fn as_value(&self) -> Option<&ObservableValue> {
        match self {
            Self::Value(value) => Some(value),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_map(&self) -> Option<&ObservableMap> {
        match self {
            Self::Map(map) => Some(map),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_array(&self) -> Option<&ObservableArray> {
        match self {
            Self::Array(array) => Some(array),
            _ => None,
        }
    }

    /// Whether both handles refer to the same underlying observable.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Value(a), Self::Value(b)) => a.ptr_eq(b),
            (Self::Map(a), Self::Map(b)) => a.ptr_eq(b),
            (Self::Array(a), Self::Array(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

impl From<ObservableValue> for Observable {
    fn from(value: ObservableValue) -> Self {
        Self::Value(value)
    }
}

impl From<ObservableMap> for Observable {
    fn from(map: ObservableMap) -> Self {
        Self::Map(map)
    }
}

impl From<ObservableArray> for Observable {
    fn from(array: ObservableArray) -> Self {
        Self::Array(array)
    }
}
