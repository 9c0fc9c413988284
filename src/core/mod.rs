//! Core naming primitives
//!
//! - QName: qualified name (local name + optional namespace URI) and the
//!   `{uri}local` spec parser
//! - Namespace: scope stack mapping prefixes to URIs

pub mod namespace;
pub mod qname;

pub use namespace::NamespaceResolver;
pub use qname::QName;
