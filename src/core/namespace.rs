//! Namespace Resolution
//!
//! Stack-based namespace resolver for XML namespace handling.

/// Well-known namespace URIs
pub mod ns {
    pub const XML: &str = "http://www.w3.org/XML/1998/namespace";
    pub const XMLNS: &str = "http://www.w3.org/2000/xmlns/";
}

/// Namespace binding (prefix -> URI). `prefix: None` is the default namespace,
/// `uri: None` undeclares it (`xmlns=""`).
#[derive(Debug, Clone)]
struct NsBinding {
    prefix: Option<String>,
    uri: Option<String>,
    depth: u32,
}

/// Stack-based namespace resolver
#[derive(Debug)]
pub struct NamespaceResolver {
    /// Stack of namespace bindings
    bindings: Vec<NsBinding>,
    /// Current element depth
    depth: u32,
}

impl NamespaceResolver {
    /// Create a new namespace resolver with the `xml` prefix pre-declared
    pub fn new() -> Self {
        let mut bindings = Vec::with_capacity(16);
        bindings.push(NsBinding {
            prefix: Some("xml".to_string()),
            uri: Some(ns::XML.to_string()),
            depth: 0,
        });
        NamespaceResolver { bindings, depth: 0 }
    }

    /// Enter a new element scope
    pub fn push_scope(&mut self) {
        self.depth += 1;
    }

    /// Leave an element scope, removing any bindings declared in it
    pub fn pop_scope(&mut self) {
        while let Some(binding) = self.bindings.last() {
            if binding.depth < self.depth {
                break;
            }
            self.bindings.pop();
        }
        self.depth = self.depth.saturating_sub(1);
    }

    /// Declare a prefixed binding for the current scope.
    ///
    /// Returns false for reserved or empty declarations, which are malformed.
    pub fn declare(&mut self, prefix: &str, uri: &str) -> bool {
        if prefix == "xmlns" || uri == ns::XMLNS || uri.is_empty() {
            return false;
        }
        if (prefix == "xml") != (uri == ns::XML) {
            return false;
        }
        if prefix == "xml" {
            return true;
        }
        self.bindings.push(NsBinding {
            prefix: Some(prefix.to_string()),
            uri: Some(uri.to_string()),
            depth: self.depth,
        });
        true
    }

    /// Declare the default namespace for current scope; empty undeclares it
    pub fn declare_default(&mut self, uri: &str) {
        self.bindings.push(NsBinding {
            prefix: None,
            uri: (!uri.is_empty()).then(|| uri.to_string()),
            depth: self.depth,
        });
    }

    /// Resolve a prefix to a namespace URI.
    ///
    /// The outer `Option` says whether the prefix is bound at all.
    fn lookup(&self, prefix: Option<&str>) -> Option<Option<&str>> {
        // Search from most recent to oldest
        self.bindings
            .iter()
            .rev()
            .find(|b| b.prefix.as_deref() == prefix)
            .map(|b| b.uri.as_deref())
    }

    /// Resolve a declared prefix
    pub fn resolve(&self, prefix: &str) -> Option<&str> {
        self.lookup(Some(prefix)).flatten()
    }

    /// Resolve the default namespace
    pub fn resolve_default(&self) -> Option<&str> {
        self.lookup(None).flatten()
    }

    /// Get current depth
    pub fn depth(&self) -> u32 {
        self.depth
    }
}

impl Default for NamespaceResolver {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_namespaces() {
        let resolver = NamespaceResolver::new();
        assert_eq!(resolver.resolve("xml"), Some(ns::XML));
        assert_eq!(resolver.resolve_default(), None);
    }

    #[test]
    fn test_declare_and_resolve() {
        let mut resolver = NamespaceResolver::new();

        resolver.push_scope();
        assert!(resolver.declare("svg", "http://www.w3.org/2000/svg"));

        assert_eq!(resolver.resolve("svg"), Some("http://www.w3.org/2000/svg"));
    }

    #[test]
    fn test_scope_pop() {
        let mut resolver = NamespaceResolver::new();

        resolver.push_scope();
        resolver.declare("foo", "http://example.com/foo");
        resolver.declare_default("urn:d");
        assert_eq!(resolver.resolve("foo"), Some("http://example.com/foo"));

        resolver.pop_scope();
        assert_eq!(resolver.resolve("foo"), None);
        assert_eq!(resolver.resolve_default(), None);
        assert_eq!(resolver.depth(), 0);
    }

    #[test]
    fn test_shadow_binding() {
        let mut resolver = NamespaceResolver::new();

        resolver.push_scope();
        resolver.declare("ns", "http://example.com/ns1");

        resolver.push_scope();
        resolver.declare("ns", "http://example.com/ns2");
        assert_eq!(resolver.resolve("ns"), Some("http://example.com/ns2"));

        resolver.pop_scope();
        assert_eq!(resolver.resolve("ns"), Some("http://example.com/ns1"));
    }

    #[test]
    fn test_default_undeclared() {
        let mut resolver = NamespaceResolver::new();

        resolver.push_scope();
        resolver.declare_default("urn:a");
        resolver.push_scope();
        resolver.declare_default("");
        assert_eq!(resolver.resolve_default(), None);

        resolver.pop_scope();
        assert_eq!(resolver.resolve_default(), Some("urn:a"));
    }

    #[test]
    fn test_reserved_declarations_rejected() {
        let mut resolver = NamespaceResolver::new();
        resolver.push_scope();
        assert!(!resolver.declare("xmlns", "urn:x"));
        assert!(!resolver.declare("p", ""));
        assert!(!resolver.declare("p", ns::XML));
        assert!(resolver.declare("xml", ns::XML));
    }
}
