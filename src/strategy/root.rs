//! Root Element Parser
//!
//! Reads a document up to the start of its outer element and describes that
//! element:
//!
//! ```text
//! <r xmlns="urn:a" xmlns:b="urn:b" id="1">...
//!   => { "root": "r",
//!        "r": { "schema": "urn:a",
//!               "nsmap": { "__default__": "urn:a", "b": "urn:b" },
//!               "attr": { "id": "1" } } }
//! ```

use crate::error::{Error, Result};
use crate::map::{OrderedMultiMap, DEFAULT_NS_KEY};
use crate::options::Options;
use crate::reader::buffered::LookaheadReader;
use crate::reader::{EventReader, StartElement, XmlEvent};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::debug;

/// Parse the root element of the document in `source`.
///
/// Only the root start is needed for the record. When the document fits in
/// `options.lookahead` it is also read to the end, so truncated or otherwise
/// malformed small documents fail; larger ones are not scanned past the root
/// start.
pub fn parse_root<R: Read>(source: R, options: &Options) -> Result<OrderedMultiMap> {
    let lookahead = LookaheadReader::fill(source, options.lookahead)?;
    let validate_rest = lookahead.is_eof();
    let source = BufReader::with_capacity(options.buffer_size, lookahead.into_reader());
    let mut events = EventReader::new(source).with_max_depth(options.max_depth);

    let start = loop {
        match events.next_event()? {
            Some(XmlEvent::Start(start)) => break start,
            Some(_) => continue,
            None => return Err(Error::IncompleteDocument),
        }
    };

    let record = root_record(&start);

    if validate_rest {
        while events.next_event()?.is_some() {}
    }

    debug!(root = %start.name, validated = validate_rest, "parsed root element");
    Ok(record)
}

/// Parse the root element of the document at `path`.
pub fn parse_root_file(path: impl AsRef<Path>, options: &Options) -> Result<OrderedMultiMap> {
    let file = File::open(path.as_ref())?;
    parse_root(file, options)
}

/// Build the `{ "root": name, name: { schema, nsmap, attr } }` record.
fn root_record(start: &StartElement) -> OrderedMultiMap {
    let local = start.name.local_name.as_str();

    let mut body = OrderedMultiMap::new();

    if let Some(ns) = &start.name.namespace {
        body.set("schema", ns.as_str());
    }

    // The default namespace has no prefix; it is keyed as __default__.
    let nsmap: OrderedMultiMap = start
        .namespaces
        .iter()
        .filter(|(_, uri)| !uri.is_empty())
        .map(|(prefix, uri)| (prefix.as_deref().unwrap_or(DEFAULT_NS_KEY), uri.as_str()))
        .collect();
    if !nsmap.is_empty() {
        body.set("nsmap", nsmap);
    }

    if !start.attributes.is_empty() {
        let attrs: OrderedMultiMap = start
            .attributes
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        body.set("attr", attrs);
    }

    let mut doc = OrderedMultiMap::new();
    doc.set("root", local);
    doc.set(local, body);
    doc
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::Value;
    use std::io::Write;

    fn root(xml: &str) -> Result<OrderedMultiMap> {
        parse_root(xml.as_bytes(), &Options::default())
    }

    #[test]
    fn test_non_xml() {
        assert!(root("This is not XML").unwrap_err().is_malformed());
    }

    #[test]
    fn test_malformed_xml() {
        assert!(root("<r>").unwrap_err().is_malformed());
    }

    #[test]
    fn test_deep_document_is_malformed() {
        let xml = format!("{}{}", "<a>".repeat(300), "</a>".repeat(300));
        assert!(root(&xml).unwrap_err().is_malformed());
    }

    #[test]
    fn test_empty_input() {
        assert!(root("").unwrap_err().is_malformed());
    }

    #[test]
    fn test_prolog_without_root() {
        let err = root("<?xml version=\"1.0\"?>\n<!-- no element -->\n").unwrap_err();
        assert!(matches!(err, Error::IncompleteDocument));
    }

    #[test]
    fn test_simple_root() {
        let doc = root("<r></r>").unwrap();
        assert_eq!(doc.get_str("root"), Some("r"));
        assert_eq!(doc.len(), 2);

        let body = doc.get("r").and_then(Value::as_map).unwrap();
        assert!(body.is_empty());
        assert_eq!(doc.to_json().unwrap(), r#"{"root":"r","r":{}}"#);
    }

    #[test]
    fn test_root_with_namespace() {
        let doc = root(r#"<r xmlns="urn:a"></r>"#).unwrap();
        let name = doc.get_str("root").unwrap();
        assert_eq!(doc.get(name).and_then(|b| b.get("schema")).and_then(Value::as_str), Some("urn:a"));
    }

    #[test]
    fn test_root_with_nsmap() {
        let doc = root(r#"<r xmlns="urn:a" xmlns:b="urn:b"><a/><b:b><b:c/></b:b></r>"#).unwrap();
        let nsmap = doc.get("r").and_then(|b| b.get("nsmap")).unwrap();
        assert_eq!(nsmap.get("__default__").and_then(Value::as_str), Some("urn:a"));
        assert_eq!(nsmap.get("b").and_then(Value::as_str), Some("urn:b"));
    }

    #[test]
    fn test_root_attributes() {
        let doc = root(r#"<p:doc xmlns:p="urn:p" version="2" p:kind="x"/>"#).unwrap();
        assert_eq!(
            doc.to_json().unwrap(),
            r#"{"root":"doc","doc":{"schema":"urn:p","nsmap":{"p":"urn:p"},"attr":{"version":"2","{urn:p}kind":"x"}}}"#
        );
    }

    #[test]
    fn test_undeclared_default_namespace_omitted() {
        let doc = root(r#"<r xmlns=""/>"#).unwrap();
        assert_eq!(doc.to_json().unwrap(), r#"{"root":"r","r":{}}"#);
    }

    #[test]
    fn test_root_named_root_promotes() {
        let doc = root("<root/>").unwrap();
        assert_eq!(doc.len(), 1);
        assert_eq!(doc.get("root").unwrap().count(), 2);
    }

    #[test]
    fn test_large_document_not_scanned_past_root() {
        // Truncated after the lookahead window: the record is still built.
        let mut xml = String::from("<r>");
        xml.push_str(&"<item>x</item>".repeat(100));
        let options = Options::default().with_lookahead(32);
        let doc = parse_root(xml.as_bytes(), &options).unwrap();
        assert_eq!(doc.get_str("root"), Some("r"));

        // A small document with the same truncation is rejected.
        assert!(root(&xml).unwrap_err().is_malformed());
    }

    #[test]
    fn test_parse_root_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"<catalog xmlns="urn:cat"><book/></catalog>"#).unwrap();
        let doc = parse_root_file(file.path(), &Options::default()).unwrap();
        assert_eq!(doc.get_str("root"), Some("catalog"));
    }

    #[test]
    fn test_missing_file() {
        let err = parse_root_file("/nonexistent/doc.xml", &Options::default()).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
