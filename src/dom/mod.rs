//! Element Subtree Module
//!
//! Owned element trees built for each matched slice. Only the subtree being
//! delivered is ever materialized.

pub mod node;

pub use node::{Element, NsDeclaration};
