//! Parse Options

use crate::reader::buffered::DEFAULT_BUFFER_SIZE;

/// Element nesting allowed by default, the same bound libxml2 applies
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Settings shared by the root and slice parsers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Options {
    /// Emit `__ns__` for namespaced elements (slice parser)
    pub include_namespace: bool,
    /// Read buffer capacity for stream sources
    pub buffer_size: usize,
    /// Documents no longer than this are fully validated by the root parser;
    /// longer ones are read only up to the root start
    pub lookahead: usize,
    /// Deepest element nesting accepted; deeper documents are malformed
    pub max_depth: usize,
}

impl Options {
    pub fn new() -> Self {
        Options {
            include_namespace: true,
            buffer_size: DEFAULT_BUFFER_SIZE,
            lookahead: DEFAULT_BUFFER_SIZE,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    pub fn with_namespace(mut self, include: bool) -> Self {
        self.include_namespace = include;
        self
    }

    pub fn with_buffer_size(mut self, size: usize) -> Self {
        self.buffer_size = size.max(1);
        self
    }

    pub fn with_lookahead(mut self, bytes: usize) -> Self {
        self.lookahead = bytes;
        self
    }

    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth.max(1);
        self
    }
}

impl Default for Options {
    fn default() -> Self {
        Self::new()
    }
}
