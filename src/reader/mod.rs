//! XML Reader Module
//!
//! - Events: namespace-resolving pull reader over quick-xml
//! - Buffered: lookahead window used by the root parser
//! - Entities: general entities declared in the DOCTYPE internal subset

pub mod buffered;
pub mod entities;
pub mod events;

pub use events::{EventReader, StartElement, XmlEvent};
