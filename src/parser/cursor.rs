//! Byte cursor
//!
//! Forward-only reader over a captured byte buffer.

/// Sequential, single-pass reader over an immutable byte slice.
#[derive(Debug, Clone)]
pub struct ByteCursor<'a> {
    buffer: &'a [u8],
    position: usize,
    /// Last byte returned by `next_byte`
    last: Option<u8>,
}

impl<'a> ByteCursor<'a> {
    pub fn new(buffer: &'a [u8]) -> Self {
        Self {
            buffer,
            position: 0,
            last: None,
        }
    }

    /// True once every byte has been read
    pub fn at_end(&self) -> bool {
        self.position >= self.buffer.len()
    }

    /// Read the next byte, or `None` at the end of the buffer
    pub fn next_byte(&mut self) -> Option<u8> {
        let byte = *self.buffer.get(self.position)?;
        self.position += 1;
        self.last = Some(byte);
        Some(byte)
    }

    /// The byte most recently returned by `next_byte`
    pub fn last(&self) -> Option<u8> {
        self.last
    }

    /// Number of bytes consumed so far
    pub fn position(&self) -> usize {
        self.position
    }

    /// Bytes consumed since `start`
    pub fn consumed_since(&self, start: usize) -> &'a [u8] {
        &self.buffer[start.min(self.position)..self.position]
    }
}
