//! Lookahead Reader
//!
//! Reads the head of a source into memory so a caller can tell whether the
//! whole document is small enough to validate cheaply, then hands the bytes
//! back as a reader that replays the head before the rest of the stream.

use std::io::{self, Cursor, Read};

/// Buffer size for reading chunks
pub const DEFAULT_BUFFER_SIZE: usize = 8192;

/// Source with its first bytes already read
pub struct LookaheadReader<R: Read> {
    head: Vec<u8>,
    rest: R,
    eof: bool,
}

impl<R: Read> LookaheadReader<R> {
    /// Read up to `limit` bytes from `reader`
    pub fn fill(mut reader: R, limit: usize) -> io::Result<Self> {
        let mut head = Vec::with_capacity(limit.min(DEFAULT_BUFFER_SIZE) + 1);
        // One byte past the limit tells "exactly limit bytes" from "more".
        let read = reader.by_ref().take(limit as u64 + 1).read_to_end(&mut head)?;
        Ok(LookaheadReader {
            head,
            rest: reader,
            eof: read <= limit,
        })
    }

    /// Bytes read ahead
    pub fn buffered(&self) -> &[u8] {
        &self.head
    }

    /// Check if the whole source fit in the lookahead
    pub fn is_eof(&self) -> bool {
        self.eof
    }

    /// Reader over the full source, head first
    pub fn into_reader(self) -> io::Chain<Cursor<Vec<u8>>, R> {
        Cursor::new(self.head).chain(self.rest)
    }
}
