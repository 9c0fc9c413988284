//! Element Slice Parser
//!
//! Scans a document for every occurrence of one qualified element name and
//! converts each occurrence, in end-tag order, into a single-entry
//! `OrderedMultiMap`. Only the subtree of the occurrence being built is held
//! in memory; everything outside a match is tracked by the reader's depth.

use crate::convert::{Converter, ElementConverter};
use crate::core::QName;
use crate::dom::Element;
use crate::error::{Error, Result, SliceError};
use crate::map::OrderedMultiMap;
use crate::options::Options;
use crate::reader::{EventReader, XmlEvent};
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;
use tracing::{debug, error, trace};

/// Pull-style iterator over the converted slices of one document.
///
/// Dropping it abandons the scan. After an error the iterator is fused.
pub struct Slices<R: BufRead, C: Converter = ElementConverter> {
    events: EventReader<R>,
    target: QName,
    converter: C,
    include_namespace: bool,
    /// Open elements from the outermost match down to the current element
    stack: Vec<OpenElement>,
    done: bool,
}

/// Element under construction
struct OpenElement {
    element: Element,
    /// A child node was seen; later character data is tail text
    text_closed: bool,
}

impl<R: BufRead> Slices<R, ElementConverter> {
    /// Create a slice iterator with the default converter
    pub fn new(source: R, target: QName, options: &Options) -> Self {
        Self::with_converter(source, target, options, ElementConverter)
    }
}

impl<R: BufRead, C: Converter> Slices<R, C> {
    /// Create a slice iterator with a custom converter hook
    pub fn with_converter(source: R, target: QName, options: &Options, converter: C) -> Self {
        Slices {
            events: EventReader::new(source).with_max_depth(options.max_depth),
            target,
            converter,
            include_namespace: options.include_namespace,
            stack: Vec::new(),
            done: false,
        }
    }

    /// Target element name
    pub fn target(&self) -> &QName {
        &self.target
    }

    fn advance(&mut self) -> Result<Option<OrderedMultiMap>> {
        while let Some(event) = self.events.next_event()? {
            match event {
                XmlEvent::Start(start) => {
                    if let Some(parent) = self.stack.last_mut() {
                        parent.text_closed = true;
                    } else if start.name != self.target {
                        continue;
                    }
                    self.stack.push(OpenElement {
                        element: start.into_element(),
                        text_closed: false,
                    });
                }

                XmlEvent::Text(text) => {
                    if let Some(current) = self.stack.last_mut().filter(|open| !open.text_closed) {
                        current.element.text.push_str(&text);
                    }
                }

                XmlEvent::Markup => {
                    if let Some(current) = self.stack.last_mut() {
                        current.text_closed = true;
                    }
                }

                XmlEvent::End(_) => {
                    // Outside any match the stack is empty and ends are skipped.
                    let Some(OpenElement { element, .. }) = self.stack.pop() else {
                        continue;
                    };

                    let fragment = if element.name == self.target {
                        Some(self.convert(&element)?)
                    } else {
                        None
                    };

                    // Nested matches stay part of the enclosing match.
                    if let Some(parent) = self.stack.last_mut() {
                        parent.element.children.push(element);
                    }

                    if fragment.is_some() {
                        return Ok(fragment);
                    }
                }
            }
        }
        Ok(None)
    }

    fn convert(&self, element: &Element) -> Result<OrderedMultiMap> {
        let mut doc = OrderedMultiMap::new();
        self.converter.convert(element, &mut doc, self.include_namespace);

        if doc.len() != 1 {
            let callback = std::any::type_name::<C>();
            error!(callback, keys = doc.len(), target = %self.target, "converter is not usable");
            return Err(Error::CallbackMisuse {
                callback,
                keys: doc.len(),
            });
        }
        Ok(doc)
    }
}

impl<R: BufRead, C: Converter> Iterator for Slices<R, C> {
    type Item = Result<OrderedMultiMap>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.advance() {
            Ok(Some(fragment)) => Some(Ok(fragment)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(err) => {
                self.done = true;
                Some(Err(err))
            }
        }
    }
}

/// Deliver every `target` element in `source` to `callback`, in document
/// order, and return how many were delivered.
///
/// `target` is `{uri}local` or `local`. A callback error stops the scan and
/// is returned unchanged as `SliceError::Callback`.
pub fn parse_element<R, F, E>(
    source: R,
    target: &str,
    options: &Options,
    callback: F,
) -> std::result::Result<usize, SliceError<E>>
where
    R: Read,
    F: FnMut(OrderedMultiMap) -> std::result::Result<(), E>,
{
    parse_element_with(source, target, options, ElementConverter, callback)
}

/// `parse_element` with a custom converter hook.
pub fn parse_element_with<R, C, F, E>(
    source: R,
    target: &str,
    options: &Options,
    converter: C,
    mut callback: F,
) -> std::result::Result<usize, SliceError<E>>
where
    R: Read,
    C: Converter,
    F: FnMut(OrderedMultiMap) -> std::result::Result<(), E>,
{
    let target = QName::parse(target)?;
    debug!(target = %target, "slicing document");

    let source = BufReader::with_capacity(options.buffer_size, source);
    let mut slices = Slices::with_converter(source, target, options, converter);

    let mut count = 0;
    for fragment in &mut slices {
        callback(fragment?).map_err(SliceError::Callback)?;
        count += 1;
        trace!(count, "delivered slice");
    }

    debug!(target = %slices.target(), count, "slicing finished");
    Ok(count)
}

/// `parse_element` over the file at `path`.
pub fn parse_element_file<F, E>(
    path: impl AsRef<Path>,
    target: &str,
    options: &Options,
    callback: F,
) -> std::result::Result<usize, SliceError<E>>
where
    F: FnMut(OrderedMultiMap) -> std::result::Result<(), E>,
{
    let file = File::open(path.as_ref()).map_err(Error::from)?;
    parse_element(file, target, options, callback)
}
