//! xmlslice - Streaming XML to ordered, JSON-shaped maps
//!
//! Strategies:
//! A: Root metadata (parse_root) - name, namespace, nsmap and attributes of
//!    the document element, without scanning the rest of a large document
//! B: Element slices (parse_element, Slices) - every occurrence of one
//!    qualified element name, converted and delivered in document order
//! C: Parallel batches (strategy::parallel) - independent sources on Rayon
//!
//! Converted elements use reserved keys:
//!
//! ```text
//! <a xmlns="urn:x" id="1"><b>L1</b><b>L2</b></a>
//!   => { "a": { "__ns__": "urn:x",
//!               "__attr__": { "id": "1" },
//!               "__body__": { "b": [ { "__ns__": "urn:x", "__body__": "L1" },
//!                                    { "__ns__": "urn:x", "__body__": "L2" } ] } } }
//! ```
//!
//! ```rust
//! use xmlslice::{parse_element, Options, Value};
//!
//! let xml = "<r><a>TEST</a></r>";
//! let mut bodies = Vec::new();
//! let count = parse_element(xml.as_bytes(), "a", &Options::default(), |slice| {
//!     bodies.push(slice.get("a").and_then(Value::body).and_then(Value::as_str).map(str::to_string));
//!     Ok::<_, std::convert::Infallible>(())
//! })
//! .unwrap();
//! assert_eq!(count, 1);
//! assert_eq!(bodies, vec![Some("TEST".to_string())]);
//! ```

pub mod convert;
pub mod core;
pub mod dom;
pub mod error;
pub mod map;
pub mod options;
pub mod reader;
pub mod strategy;

pub use crate::convert::{convert_element, Converter, ElementConverter};
pub use crate::core::QName;
pub use crate::dom::Element;
pub use crate::error::{Error, Result, SliceError};
pub use crate::map::{OrderedMultiMap, Value};
pub use crate::options::Options;
pub use crate::strategy::{parse_element, parse_element_file, parse_element_with, parse_root, parse_root_file, Slices};

/// Resolve a `{uri}local` or `local` name specification
pub fn resolve(spec: &str) -> Result<QName> {
    QName::parse(spec)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::convert::Infallible;

    #[test]
    fn test_resolve() {
        assert_eq!(resolve("{urn:a}b").unwrap(), QName::namespaced("urn:a", "b"));
        assert!(matches!(resolve("{x").unwrap_err(), Error::MalformedFilterSpec { .. }));
    }

    #[test]
    fn test_root_and_slices_of_same_document() {
        let xml = r#"<feed xmlns="urn:feed" xmlns:m="urn:meta" lang="en">
  <entry id="1"><title>First</title><m:tag>a</m:tag><m:tag>b</m:tag></entry>
  <entry id="2"><title>Second</title></entry>
</feed>"#;

        let root = parse_root(xml.as_bytes(), &Options::default()).unwrap();
        assert_eq!(
            root.to_json().unwrap(),
            r#"{"root":"feed","feed":{"schema":"urn:feed","nsmap":{"__default__":"urn:feed","m":"urn:meta"},"attr":{"lang":"en"}}}"#
        );

        let mut slices = Vec::new();
        let count = parse_element(xml.as_bytes(), "{urn:feed}entry", &Options::default(), |slice| {
            slices.push(slice.to_json().unwrap());
            Ok::<_, Infallible>(())
        })
        .unwrap();
        assert_eq!(count, 2);
        assert_eq!(
            slices[0],
            concat!(
                r#"{"entry":{"__ns__":"urn:feed","__attr__":{"id":"1"},"__body__":{"#,
                r#""title":{"__ns__":"urn:feed","__body__":"First"},"#,
                r#""tag":[{"__ns__":"urn:meta","__body__":"a"},{"__ns__":"urn:meta","__body__":"b"}]}}}"#
            )
        );
        assert_eq!(
            slices[1],
            r#"{"entry":{"__ns__":"urn:feed","__attr__":{"id":"2"},"__body__":{"title":{"__ns__":"urn:feed","__body__":"Second"}}}}"#
        );
    }

    #[test]
    fn test_independent_parses_are_equal() {
        let xml = "<r><a><b>1</b><b>2</b></a></r>";
        let run = || {
            let mut out = Vec::new();
            parse_element(xml.as_bytes(), "a", &Options::default(), |s| {
                out.push(s);
                Ok::<_, Infallible>(())
            })
            .unwrap();
            out
        };
        assert_eq!(run(), run());
    }
}
