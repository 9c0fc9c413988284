//! Ordered Multi-Map
//!
//! Insertion-ordered map where setting an existing key keeps both values:
//! the first repeat turns the entry into a two-item list and later repeats
//! append to it.

use super::value::Value;
use indexmap::map::Entry;
use indexmap::IndexMap;
use serde::ser::{Serialize, SerializeMap, Serializer};

/// Key holding a converted element's namespace URI
pub const NS_KEY: &str = "__ns__";
/// Key holding a converted element's attributes
pub const ATTR_KEY: &str = "__attr__";
/// Key holding a converted element's text or children
pub const BODY_KEY: &str = "__body__";
/// Key standing in for the default (unprefixed) namespace in `nsmap`
pub const DEFAULT_NS_KEY: &str = "__default__";

/// Insertion-ordered, promote-on-repeat map
#[derive(Debug, Clone, Default)]
pub struct OrderedMultiMap(IndexMap<String, Value>);

impl OrderedMultiMap {
    pub fn new() -> Self {
        Self(IndexMap::new())
    }

    /// Set a key.
    ///
    /// Absent keys are appended. A present list gets `value` appended; any
    /// other present value becomes `[old, value]`.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        let value = value.into();
        match self.0.entry(key.into()) {
            Entry::Vacant(entry) => {
                entry.insert(value);
            }
            Entry::Occupied(mut entry) => {
                let slot = entry.get_mut();
                match slot {
                    Value::List(items) => items.push(value),
                    _ => {
                        let old = std::mem::replace(slot, Value::List(Vec::new()));
                        *slot = Value::List(vec![old, value]);
                    }
                }
            }
        }
    }

    /// Get a key's value, or None when missing
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Get a key's value as a string
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    /// Check whether a key is present
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Number of distinct keys
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Keys in insertion order
    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.0.keys().map(String::as_str)
    }

    /// Entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> + '_ {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Attribute value from the `__attr__` entry
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.get(ATTR_KEY).and_then(|attrs| attrs.get(name)).and_then(Value::as_str)
    }

    /// Namespace URI from the `__ns__` entry
    pub fn ns(&self) -> Option<&str> {
        self.get_str(NS_KEY)
    }

    /// Text or children from the `__body__` entry
    pub fn body(&self) -> Option<&Value> {
        self.get(BODY_KEY)
    }

    /// Compact JSON, keys in insertion order
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

// Key order is part of the output, so equality is positional.
impl PartialEq for OrderedMultiMap {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.0.iter().eq(other.0.iter())
    }
}

impl Eq for OrderedMultiMap {}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for OrderedMultiMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = OrderedMultiMap::new();
        for (k, v) in iter {
            map.set(k, v);
        }
        map
    }
}

impl Serialize for OrderedMultiMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (k, v) in &self.0 {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_preserves_order() {
        let mut map = OrderedMultiMap::new();
        map.set("z", "1");
        map.set("a", "2");
        map.set("m", "3");
        assert_eq!(map.keys().collect::<Vec<_>>(), vec!["z", "a", "m"]);
        assert_eq!(map.len(), 3);
    }

    #[test]
    fn test_second_set_promotes_to_list() {
        let mut map = OrderedMultiMap::new();
        map.set("b", "L1");
        assert!(!map.get("b").unwrap().is_list());

        map.set("b", "L2");
        let items = map.get("b").and_then(Value::as_list).unwrap();
        assert_eq!(items, &[Value::from("L1"), Value::from("L2")]);

        map.set("b", "L3");
        assert_eq!(map.get("b").unwrap().count(), 3);
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_promotion_keeps_position() {
        let mut map = OrderedMultiMap::new();
        map.set("a", "1");
        map.set("b", "2");
        map.set("a", "3");
        assert_eq!(map.keys().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(map.to_json().unwrap(), r#"{"a":["1","3"],"b":"2"}"#);
    }

    #[test]
    fn test_missing_key() {
        let map = OrderedMultiMap::new();
        assert!(map.get("nope").is_none());
        assert!(map.attr("x").is_none());
        assert!(map.ns().is_none());
        assert!(map.body().is_none());
        assert!(map.is_empty());
    }

    #[test]
    fn test_reserved_accessors() {
        let attrs: OrderedMultiMap = [("a", "1"), ("b", "2")].into_iter().collect();
        let mut map = OrderedMultiMap::new();
        map.set(NS_KEY, "urn:a");
        map.set(ATTR_KEY, attrs);
        map.set(BODY_KEY, "text");

        assert_eq!(map.ns(), Some("urn:a"));
        assert_eq!(map.attr("b"), Some("2"));
        assert_eq!(map.attr("a"), Some("1"));
        assert!(map.attr("c").is_none());
        assert_eq!(map.body().and_then(Value::as_str), Some("text"));
    }

    #[test]
    fn test_equality_compares_entries() {
        let a: OrderedMultiMap = [("x", "1")].into_iter().collect();
        let b: OrderedMultiMap = [("x", "1")].into_iter().collect();
        let c: OrderedMultiMap = [("x", "2")].into_iter().collect();
        assert_eq!(a, b);
        assert_ne!(a, c);

        let ab: OrderedMultiMap = [("a", "1"), ("b", "2")].into_iter().collect();
        let ba: OrderedMultiMap = [("b", "2"), ("a", "1")].into_iter().collect();
        assert_ne!(ab, ba);
    }
}
