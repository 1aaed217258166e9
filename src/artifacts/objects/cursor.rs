//! Bounds-checked reader over an in-memory byte buffer
//!
//! Object headers and tree entries are delimited by single bytes (space and
//! NUL) or have a fixed width (raw object ids). The cursor never reads past the
//! end of its buffer: a missing delimiter or a short read yields `None` and
//! leaves the position untouched, so callers can turn it into a structured
//! parse failure.

#[derive(Debug, Clone)]
pub struct ByteCursor<'b> {
    buffer: &'b [u8],
    position: usize,
}

impl<'b> ByteCursor<'b> {
    pub fn new(buffer: &'b [u8]) -> Self {
        ByteCursor {
            buffer,
            position: 0,
        }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn remaining(&self) -> &'b [u8] {
        &self.buffer[self.position..]
    }

    pub fn is_exhausted(&self) -> bool {
        self.position >= self.buffer.len()
    }

    /// Read up to (not including) `delimiter` and step over the delimiter
    pub fn read_until(&mut self, delimiter: u8) -> Option<&'b [u8]> {
        let remaining = self.remaining();
        let offset = remaining.iter().position(|&b| b == delimiter)?;

        self.position += offset + 1;
        Some(&remaining[..offset])
    }

    pub fn read_exact(&mut self, len: usize) -> Option<&'b [u8]> {
        let remaining = self.remaining();
        if remaining.len() < len {
            return None;
        }

        self.position += len;
        Some(&remaining[..len])
    }
}
