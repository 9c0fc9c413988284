//! Qualified Names
//!
//! A qualified name is a local name plus an optional namespace URI. The
//! prefix used in markup is never part of the identity.

use crate::error::{Error, Result};
use memchr::memchr;
use std::fmt;

/// Resolved element identity
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QName {
    /// Local name (after colon)
    pub local_name: String,
    /// Namespace URI, `None` when the element is not in a namespace
    pub namespace: Option<String>,
}

impl QName {
    /// Create a name in no namespace
    pub fn local(local_name: impl Into<String>) -> Self {
        QName {
            local_name: local_name.into(),
            namespace: None,
        }
    }

    /// Create a namespaced name
    pub fn namespaced(namespace: impl Into<String>, local_name: impl Into<String>) -> Self {
        QName {
            local_name: local_name.into(),
            namespace: Some(namespace.into()),
        }
    }

    /// Parse a `{uri}local` or bare `local` specification.
    ///
    /// An empty `{}` namespace means "no namespace", so `{}a` and `a` are the
    /// same name.
    pub fn parse(spec: &str) -> Result<Self> {
        let invalid = |reason| Error::MalformedFilterSpec {
            spec: spec.to_string(),
            reason,
        };

        let (namespace, local) = match spec.strip_prefix('{') {
            Some(rest) => {
                let close = memchr(b'}', rest.as_bytes()).ok_or_else(|| invalid("unterminated namespace"))?;
                let uri = &rest[..close];
                if uri.contains('{') {
                    return Err(invalid("nested '{' in namespace"));
                }
                let uri = if uri.is_empty() { None } else { Some(uri.to_string()) };
                (uri, &rest[close + 1..])
            }
            None => (None, spec),
        };

        if local.is_empty() {
            return Err(invalid("empty local name"));
        }
        if !is_ncname(local) {
            return Err(invalid("local name is not a valid XML name"));
        }

        Ok(QName {
            local_name: local.to_string(),
            namespace,
        })
    }

    /// Clark notation: `{uri}local`, or `local` without a namespace
    pub fn clark(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for QName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.namespace {
            Some(ns) => write!(f, "{{{}}}{}", ns, self.local_name),
            None => f.write_str(&self.local_name),
        }
    }
}

impl std::str::FromStr for QName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        QName::parse(s)
    }
}

/// Split a raw tag into prefix and local name at the colon
pub fn split_name(name: &[u8]) -> (Option<&[u8]>, &[u8]) {
    if let Some(pos) = memchr(b':', name) {
        (Some(&name[..pos]), &name[pos + 1..])
    } else {
        (None, name)
    }
}

/// XML name without colons
pub fn is_ncname(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c == '_' || c.is_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c == '_' || c == '-' || c == '.' || c == '\u{B7}' || c.is_alphanumeric())
}
