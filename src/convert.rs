//! Element Conversion
//!
//! Turns an element subtree into one entry of an `OrderedMultiMap`, keyed by
//! the element's local name:
//!
//! ```text
//! <c xmlns="urn:x" att="val">LINE</c>
//!   => "c": { "__ns__": "urn:x", "__attr__": { "att": "val" }, "__body__": "LINE" }
//! ```
//!
//! Repeated siblings share one key and become a list through the map's
//! promotion rule.

use crate::dom::Element;
use crate::map::{OrderedMultiMap, ATTR_KEY, BODY_KEY, NS_KEY};
use tracing::warn;

/// Hook that turns a matched element into its output fragment.
///
/// The hook must insert exactly one top-level entry into `out`.
pub trait Converter {
    fn convert(&self, element: &Element, out: &mut OrderedMultiMap, include_namespace: bool);
}

/// Default converter
#[derive(Debug, Clone, Copy, Default)]
pub struct ElementConverter;

impl Converter for ElementConverter {
    fn convert(&self, element: &Element, out: &mut OrderedMultiMap, include_namespace: bool) {
        convert_element(element, out, include_namespace);
    }
}

impl<F> Converter for F
where
    F: Fn(&Element, &mut OrderedMultiMap, bool),
{
    fn convert(&self, element: &Element, out: &mut OrderedMultiMap, include_namespace: bool) {
        self(element, out, include_namespace)
    }
}

/// Convert `element` and its descendants into `out[local_name]`.
///
/// Body selection:
/// - non-blank text, no children: `__body__` is the text
/// - children, blank text: `__body__` is a map of converted children
/// - neither: no `__body__`
/// - both: no `__body__` (mixed content is dropped)
///
/// `include_namespace` applies to the whole subtree, so `false` also leaves
/// `__ns__` out of every descendant.
pub fn convert_element(element: &Element, out: &mut OrderedMultiMap, include_namespace: bool) {
    let mut entry = OrderedMultiMap::new();

    if include_namespace {
        if let Some(ns) = &element.name.namespace {
            entry.set(NS_KEY, ns.as_str());
        }
    }

    if !element.attributes.is_empty() {
        let attrs: OrderedMultiMap = element
            .attributes
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        entry.set(ATTR_KEY, attrs);
    }

    let has_text = !element.text_is_blank();
    let has_children = !element.children.is_empty();

    match (has_text, has_children) {
        (true, false) => entry.set(BODY_KEY, element.text.as_str()),
        (false, true) => {
            let mut body = OrderedMultiMap::new();
            for child in &element.children {
                convert_element(child, &mut body, include_namespace);
            }
            entry.set(BODY_KEY, body);
        }
        (false, false) => {}
        (true, true) => {
            warn!(
                element = %element.name,
                children = element.children.len(),
                "dropping mixed text and element content"
            );
        }
    }

    out.set(element.name.local_name.as_str(), entry);
}
