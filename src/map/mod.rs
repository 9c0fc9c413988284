//! Output Containers
//!
//! `OrderedMultiMap` and its `Value` type are the shape every conversion
//! produces. Both serialize to JSON with keys in insertion order.

pub mod multimap;
pub mod value;

pub use multimap::{OrderedMultiMap, ATTR_KEY, BODY_KEY, DEFAULT_NS_KEY, NS_KEY};
pub use value::Value;
