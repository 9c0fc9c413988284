//! Error Types
//!
//! Document-level failures share one `Error` enum. Slicing adds the
//! callback-side kinds in `SliceError`, which keeps the caller's own error
//! type untouched.

use std::fmt;
use thiserror::Error;

/// Result type alias for xmlslice operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while reading or scanning a document.
#[derive(Debug, Error)]
pub enum Error {
    /// The input is not well-formed XML.
    #[error("malformed XML document: {message}{}", .position.map(|p| format!(" at byte {}", p)).unwrap_or_default())]
    MalformedDocument {
        message: String,
        /// Byte offset where the problem was detected, when known.
        position: Option<u64>,
    },

    /// The event stream ended before any element started.
    #[error("incomplete XML document: no root element found")]
    IncompleteDocument,

    /// A slice target is not a valid `{uri}local` / `local` expression.
    #[error("malformed filter spec {spec:?}: {reason}")]
    MalformedFilterSpec { spec: String, reason: &'static str },

    /// A converter hook produced a fragment without exactly one top-level
    /// key. This is a caller bug, kept apart from the callback's own errors.
    #[error("converter {callback} is not usable: produced {keys} top-level keys, expected 1")]
    CallbackMisuse { callback: &'static str, keys: usize },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn malformed(message: impl Into<String>, position: Option<u64>) -> Self {
        Error::MalformedDocument {
            message: message.into(),
            position,
        }
    }

    /// True for `MalformedDocument`.
    pub fn is_malformed(&self) -> bool {
        matches!(self, Error::MalformedDocument { .. })
    }
}

impl From<quick_xml::events::attributes::AttrError> for Error {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        Error::malformed(format!("attribute error: {}", err), None)
    }
}

/// Errors from a slice scan.
///
/// `Callback` carries the callback's own failure unchanged; everything the
/// scan itself detects is a `Document` error.
#[derive(Debug)]
pub enum SliceError<E> {
    Document(Error),
    Callback(E),
}

impl<E> SliceError<E> {
    /// The scan's error, if this is one.
    pub fn as_document(&self) -> Option<&Error> {
        match self {
            SliceError::Document(err) => Some(err),
            SliceError::Callback(_) => None,
        }
    }

    /// The callback's error, if this is one.
    pub fn into_callback(self) -> Option<E> {
        match self {
            SliceError::Callback(err) => Some(err),
            SliceError::Document(_) => None,
        }
    }
}

impl<E> From<Error> for SliceError<E> {
    fn from(err: Error) -> Self {
        SliceError::Document(err)
    }
}

impl<E: fmt::Display> fmt::Display for SliceError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SliceError::Document(err) => err.fmt(f),
            SliceError::Callback(err) => write!(f, "slice callback failed: {}", err),
        }
    }
}

impl<E> std::error::Error for SliceError<E>
where
    E: std::error::Error + 'static,
{
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SliceError::Document(err) => Some(err),
            SliceError::Callback(err) => Some(err),
        }
    }
}
