use byteorder::{ByteOrder, LittleEndian};

use crate::error::{GlbError, Result};

/// Sequential reader over an in-memory GLB byte buffer.
///
/// `ByteReader` borrows the buffer and hands out sub-slices of it, so chunk
/// payloads are never copied while the container is being split. Every read
/// is bounds-checked and fails with [`GlbError::MalformedContainer`] instead
/// of panicking on truncated input.
///
/// # Example
///
/// ```
/// use glb_core::ByteReader;
///
/// let data = b"glTF\x02\x00\x00\x00";
/// let mut reader = ByteReader::new(data);
///
/// assert_eq!(reader.decode_slice(4).unwrap(), b"glTF");
/// assert_eq!(reader.decode_u32().unwrap(), 2);
/// assert_eq!(reader.remaining_size(), 0);
/// ```
pub struct ByteReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    /// Creates a new `ByteReader` from a byte slice.
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Returns the current read position in bytes.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Returns the total length of the underlying buffer.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if the underlying buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns the number of bytes remaining in the buffer.
    pub fn remaining_size(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    /// Decodes a little-endian u32.
    pub fn decode_u32(&mut self) -> Result<u32> {
        let bytes = self.decode_slice(4)?;
        Ok(LittleEndian::read_u32(bytes))
    }

    /// Decodes and returns a slice of the specified size.
    ///
    /// # Errors
    ///
    /// Returns `GlbError::MalformedContainer` if not enough bytes remain.
    pub fn decode_slice(&mut self, size: usize) -> Result<&'a [u8]> {
        if size > self.remaining_size() {
            return Err(GlbError::malformed(format!(
                "Unexpected end of buffer at offset {}: need {} bytes, have {}",
                self.pos,
                size,
                self.remaining_size()
            )));
        }
        let slice = &self.data[self.pos..self.pos + size];
        self.pos += size;
        Ok(slice)
    }
}
