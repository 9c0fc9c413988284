//! Resolved XML Events
//!
//! Pull reader over `quick_xml::Reader` that reports element starts and ends
//! with names already resolved against in-scope namespace declarations, plus
//! the character data in between. It enforces document-level
//! well-formedness quick-xml leaves to the caller: a single root, no text
//! outside it, bound prefixes, unique expanded attribute names, bounded
//! nesting, and no unclosed elements at end of input. Entities declared in
//! the DOCTYPE internal subset are expanded.

use crate::core::qname::split_name;
use crate::core::{NamespaceResolver, QName};
use crate::dom::{Element, NsDeclaration};
use crate::error::{Error, Result};
use crate::options::DEFAULT_MAX_DEPTH;
use crate::reader::entities::InternalEntities;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::io::BufRead;

/// Element start with everything the converters need
#[derive(Debug, Clone)]
pub struct StartElement {
    /// Resolved element name
    pub name: QName,
    /// Attributes in source order, prefixed names as `{uri}local`
    pub attributes: Vec<(String, String)>,
    /// Namespace declarations made on this element
    pub namespaces: Vec<NsDeclaration>,
}

impl StartElement {
    /// Begin an element subtree from this start
    pub fn into_element(self) -> Element {
        let mut element = Element::new(self.name);
        element.attributes = self.attributes;
        element.namespaces = self.namespaces;
        element
    }
}

/// XML parsing event
#[derive(Debug, Clone)]
pub enum XmlEvent {
    /// `<name ...>`, also reported for `<name/>`
    Start(StartElement),
    /// `</name>`, also reported right after a `<name/>` start
    End(QName),
    /// Character data or CDATA inside the root element
    Text(String),
    /// Comment or processing instruction inside the root element
    Markup,
}

/// Namespace-resolving pull reader
pub struct EventReader<R: BufRead> {
    reader: Reader<R>,
    buf: Vec<u8>,
    resolver: NamespaceResolver,
    entities: InternalEntities,
    max_depth: usize,
    /// Names of currently open elements
    open: Vec<QName>,
    seen_root: bool,
    /// Prolog markup (declaration, comment, PI, DOCTYPE) was read
    seen_prolog: bool,
    /// The last start was `<name/>` and its end is still owed
    pending_end: bool,
    finished: bool,
}

impl<R: BufRead> EventReader<R> {
    /// Create a reader over a buffered source
    pub fn new(source: R) -> Self {
        let mut reader = Reader::from_reader(source);
        let config = reader.config_mut();
        config.trim_text(false);
        config.check_end_names = true;

        EventReader {
            reader,
            buf: Vec::with_capacity(1024),
            resolver: NamespaceResolver::new(),
            entities: InternalEntities::default(),
            max_depth: DEFAULT_MAX_DEPTH,
            open: Vec::with_capacity(16),
            seen_root: false,
            seen_prolog: false,
            pending_end: false,
            finished: false,
        }
    }

    /// Reject elements nested deeper than `depth`
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// Current element depth (0 outside the root)
    pub fn depth(&self) -> usize {
        self.open.len()
    }

    /// Get the next event, `None` once a complete document has been read
    pub fn next_event(&mut self) -> Result<Option<XmlEvent>> {
        if self.finished {
            return Ok(None);
        }
        if self.pending_end {
            self.pending_end = false;
            return Ok(Some(XmlEvent::End(self.close_element()?)));
        }

        loop {
            self.buf.clear();
            let event = match self.reader.read_event_into(&mut self.buf) {
                Ok(event) => event,
                Err(err) => {
                    return Err(Error::malformed(err.to_string(), Some(self.reader.error_position())));
                }
            };

            match event {
                Event::Start(start) => {
                    let start = start.into_owned();
                    return self.handle_start(&start).map(|s| Some(XmlEvent::Start(s)));
                }

                Event::Empty(start) => {
                    let start = start.into_owned();
                    let start = self.handle_start(&start)?;
                    self.pending_end = true;
                    return Ok(Some(XmlEvent::Start(start)));
                }

                Event::End(_) => {
                    return Ok(Some(XmlEvent::End(self.close_element()?)));
                }

                Event::Text(text) => {
                    let text = text
                        .unescape_with(|name| self.entities.resolve(name))
                        .map_err(|err| Error::malformed(err.to_string(), Some(self.reader.buffer_position())))?
                        .into_owned();
                    if self.open.is_empty() {
                        if !text.chars().all(char::is_whitespace) {
                            return Err(Error::malformed(
                                "text content outside the root element",
                                Some(self.reader.buffer_position()),
                            ));
                        }
                        continue;
                    }
                    return Ok(Some(XmlEvent::Text(text)));
                }

                Event::CData(cdata) => {
                    if self.open.is_empty() {
                        return Err(Error::malformed(
                            "CDATA section outside the root element",
                            Some(self.reader.buffer_position()),
                        ));
                    }
                    let text = String::from_utf8(cdata.into_inner().into_owned())
                        .map_err(|_| Error::malformed("CDATA is not valid UTF-8", Some(self.reader.buffer_position())))?;
                    return Ok(Some(XmlEvent::Text(text)));
                }

                Event::Comment(_) | Event::PI(_) => {
                    if !self.open.is_empty() {
                        return Ok(Some(XmlEvent::Markup));
                    }
                    self.seen_prolog = true;
                }

                Event::Decl(_) => {
                    self.seen_prolog = true;
                }

                Event::DocType(doctype) => {
                    let position = Some(self.reader.buffer_position());
                    if self.seen_root {
                        return Err(Error::malformed("DOCTYPE after the root element", position));
                    }
                    self.entities =
                        InternalEntities::parse(&doctype).map_err(|message| Error::malformed(message, position))?;
                    self.seen_prolog = true;
                }

                Event::Eof => {
                    self.finished = true;
                    if let Some(name) = self.open.last() {
                        return Err(Error::malformed(
                            format!("unexpected end of input, expected closing tag for {}", name),
                            Some(self.reader.buffer_position()),
                        ));
                    }
                    if !self.seen_root {
                        return Err(if self.seen_prolog {
                            Error::IncompleteDocument
                        } else {
                            Error::malformed("document is empty", Some(self.reader.buffer_position()))
                        });
                    }
                    return Ok(None);
                }
            }
        }
    }

    fn close_element(&mut self) -> Result<QName> {
        let name = self
            .open
            .pop()
            .ok_or_else(|| Error::malformed("unexpected closing tag", Some(self.reader.buffer_position())))?;
        self.resolver.pop_scope();
        Ok(name)
    }

    fn handle_start(&mut self, start: &BytesStart<'_>) -> Result<StartElement> {
        let position = Some(self.reader.buffer_position());
        if self.open.is_empty() && self.seen_root {
            return Err(Error::malformed("multiple root elements", position));
        }
        if self.open.len() >= self.max_depth {
            return Err(Error::malformed(
                format!("element nesting exceeds the maximum depth of {}", self.max_depth),
                position,
            ));
        }

        self.resolver.push_scope();

        // Declarations first: they are in scope for the element's own name
        // and for all of its attributes regardless of attribute order.
        let mut namespaces = Vec::new();
        let mut raw_attributes = Vec::new();
        for attr in start.attributes() {
            let attr = attr?;
            let key = utf8(attr.key.as_ref(), position)?;
            let value = attr
                .unescape_value_with(|name| self.entities.resolve(name))
                .map_err(|err| Error::malformed(format!("invalid attribute value: {}", err), position))?
                .into_owned();

            if key == "xmlns" {
                self.resolver.declare_default(&value);
                namespaces.push((None, value));
            } else if let Some(prefix) = key.strip_prefix("xmlns:") {
                if !self.resolver.declare(prefix, &value) {
                    return Err(Error::malformed(
                        format!("invalid namespace declaration for prefix {}", prefix),
                        position,
                    ));
                }
                namespaces.push((Some(prefix.to_string()), value));
            } else {
                raw_attributes.push((key.to_string(), value));
            }
        }

        let name = self.resolve_element(start.name().as_ref(), position)?;

        let mut attributes = Vec::with_capacity(raw_attributes.len());
        for (key, value) in raw_attributes {
            let key = match split_name(key.as_bytes()) {
                (Some(prefix), local) => {
                    let prefix = utf8(prefix, position)?;
                    let uri = self.resolver.resolve(prefix).ok_or_else(|| {
                        Error::malformed(format!("namespace prefix {} is not defined", prefix), position)
                    })?;
                    format!("{{{}}}{}", uri, utf8(local, position)?)
                }
                (None, _) => key,
            };
            // p:x and q:x collide when both prefixes are bound to one URI.
            if attributes.iter().any(|(existing, _)| *existing == key) {
                return Err(Error::malformed(format!("duplicate attribute {}", key), position));
            }
            attributes.push((key, value));
        }

        self.seen_root = true;
        self.open.push(name.clone());

        Ok(StartElement {
            name,
            attributes,
            namespaces,
        })
    }

    fn resolve_element(&self, raw: &[u8], position: Option<u64>) -> Result<QName> {
        let (prefix, local) = split_name(raw);
        let local = utf8(local, position)?.to_string();
        let namespace = match prefix {
            Some(prefix) => {
                let prefix = utf8(prefix, position)?;
                let uri = self.resolver.resolve(prefix).ok_or_else(|| {
                    Error::malformed(format!("namespace prefix {} is not defined", prefix), position)
                })?;
                Some(uri.to_string())
            }
            None => self.resolver.resolve_default().map(str::to_string),
        };
        Ok(QName {
            local_name: local,
            namespace,
        })
    }
}

fn utf8(bytes: &[u8], position: Option<u64>) -> Result<&str> {
    std::str::from_utf8(bytes).map_err(|_| Error::malformed("name is not valid UTF-8", position))
}
