//! Element Subtree
//!
//! Owned, fully materialized element as handed to a converter.

use crate::core::QName;

/// Namespace declaration made on an element: `None` prefix is the default
/// namespace, an empty URI undeclares it.
pub type NsDeclaration = (Option<String>, String);

/// An XML element with everything below it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    /// Resolved name
    pub name: QName,
    /// Attributes in source order. Prefixed names are in `{uri}local` form.
    pub attributes: Vec<(String, String)>,
    /// Character data and CDATA before the first child node (element,
    /// comment or processing instruction). Tail text after a child is not kept.
    pub text: String,
    /// Child elements in document order
    pub children: Vec<Element>,
    /// Namespace declarations made on this element
    pub namespaces: Vec<NsDeclaration>,
}

impl Element {
    /// Create an element with no content
    pub fn new(name: QName) -> Self {
        Element {
            name,
            attributes: Vec::new(),
            text: String::new(),
            children: Vec::new(),
            namespaces: Vec::new(),
        }
    }

    /// Check whether the text is empty or only whitespace
    pub fn text_is_blank(&self) -> bool {
        self.text.chars().all(char::is_whitespace)
    }

    /// Get an attribute value by name
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Builder-style child append
    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    /// Builder-style attribute append
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    /// Builder-style text append
    pub fn with_text(mut self, text: &str) -> Self {
        self.text.push_str(text);
        self
    }
}
