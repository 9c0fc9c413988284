//! Converted Value Types
//!
//! A converted value is a string, a nested map, or the list a key turns into
//! once it has been set more than once.

use super::multimap::OrderedMultiMap;
use serde::ser::{Serialize, SerializeSeq, Serializer};

/// Value stored under a key of an `OrderedMultiMap`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// Text
    Scalar(String),
    /// Nested map
    Object(OrderedMultiMap),
    /// Values set under one key, in insertion order (two or more)
    List(Vec<Value>),
}

impl Value {
    /// Get as string, or None
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Scalar(s) => Some(s),
            _ => None,
        }
    }

    /// Get as map, or None
    pub fn as_map(&self) -> Option<&OrderedMultiMap> {
        match self {
            Value::Object(map) => Some(map),
            _ => None,
        }
    }

    /// Get as list, or None
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    /// Check if this is a list of repeated values
    pub fn is_list(&self) -> bool {
        matches!(self, Value::List(_))
    }

    /// Look up a key, when this is a map
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_map().and_then(|map| map.get(key))
    }

    /// Item of a list. A non-list value is its own item 0, so code written
    /// for the repeated case also reads a singleton.
    pub fn at(&self, index: usize) -> Option<&Value> {
        match self {
            Value::List(items) => items.get(index),
            other if index == 0 => Some(other),
            _ => None,
        }
    }

    /// Number of values held: list length, otherwise 1
    pub fn count(&self) -> usize {
        match self {
            Value::List(items) => items.len(),
            _ => 1,
        }
    }

    /// `__body__` of a converted element
    pub fn body(&self) -> Option<&Value> {
        self.as_map().and_then(OrderedMultiMap::body)
    }

    /// `__ns__` of a converted element
    pub fn ns(&self) -> Option<&str> {
        self.as_map().and_then(OrderedMultiMap::ns)
    }

    /// Attribute of a converted element
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.as_map().and_then(|map| map.attr(name))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Scalar(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Scalar(s.to_string())
    }
}

impl From<OrderedMultiMap> for Value {
    fn from(map: OrderedMultiMap) -> Self {
        Value::Object(map)
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Scalar(s) => serializer.serialize_str(s),
            Value::Object(map) => map.serialize(serializer),
            Value::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessors() {
        let v = Value::from("x");
        assert_eq!(v.as_str(), Some("x"));
        assert!(v.as_map().is_none());
        assert!(v.body().is_none());
        assert_eq!(v.count(), 1);
        assert_eq!(v.at(0), Some(&v));
        assert!(v.at(1).is_none());
    }

    #[test]
    fn test_list_at() {
        let v = Value::List(vec![Value::from("a"), Value::from("b")]);
        assert!(v.is_list());
        assert_eq!(v.count(), 2);
        assert_eq!(v.at(1).and_then(Value::as_str), Some("b"));
        assert!(v.at(2).is_none());
    }

    #[test]
    fn test_serialize_list() {
        let v = Value::List(vec![Value::from("a"), Value::from("b")]);
        assert_eq!(serde_json::to_string(&v).unwrap(), r#"["a","b"]"#);
    }
}
