//! GLB binary container reader.
//!
//! Splits a GLB byte buffer into its 12-byte header and chunk sequence:
//!
//! ```text
//! magic "glTF" | version u32 LE | length u32 LE
//! chunkLength u32 LE | chunkType u32 LE | chunkData (padded to 4 bytes)
//! ...
//! ```
//!
//! The first chunk must be `JSON`; an optional second chunk must be `BIN`.
//! Later chunks are skipped and recorded as `UnsupportedExtraChunk`.

use glb_core::{ByteReader, Diagnostic, Diagnostics, GlbError, Result};
use log::{debug, trace};

pub const GLB_MAGIC: u32 = 0x46546C67; // "glTF" in little-endian
pub const GLB_VERSION: u32 = 2;
pub const GLB_HEADER_LENGTH: usize = 12;
pub const GLB_CHUNK_HEADER_LENGTH: usize = 8;
pub const GLB_CHUNK_JSON: u32 = 0x4E4F534A; // "JSON"
pub const GLB_CHUNK_BIN: u32 = 0x004E4942; // "BIN\0"

/// One chunk of the container, without its padding.
#[derive(Debug, Clone, Copy)]
pub struct Chunk<'a> {
    pub chunk_type: u32,
    /// Byte offset of the payload inside the container.
    pub offset: usize,
    pub data: &'a [u8],
}

/// A structurally valid GLB container.
#[derive(Debug)]
pub struct Container<'a> {
    pub version: u32,
    pub length: u32,
    /// Text of the JSON chunk with trailing space padding removed.
    pub json: &'a str,
    /// Payload of the BIN chunk, if the container has one.
    pub bin: Option<&'a [u8]>,
    pub chunks: Vec<Chunk<'a>>,
    pub diagnostics: Diagnostics,
}

/// Number of padding bytes that follow a payload of `length` bytes.
pub fn padding_for(length: usize) -> usize {
    (4 - length % 4) % 4
}

/// Decode the container header and chunk table.
///
/// Fails with [`GlbError::MalformedContainer`] on any header or chunk
/// structure violation; no partial container is returned.
pub fn decode_container(data: &[u8]) -> Result<Container<'_>> {
    if data.len() < GLB_HEADER_LENGTH {
        return Err(GlbError::malformed(format!(
            "File too small for GLB header ({} bytes)",
            data.len()
        )));
    }

    let mut reader = ByteReader::new(data);
    let magic = reader.decode_u32()?;
    let version = reader.decode_u32()?;
    let length = reader.decode_u32()?;

    if magic != GLB_MAGIC {
        return Err(GlbError::malformed(format!(
            "Invalid GLB magic {:02X?}",
            &data[0..4]
        )));
    }
    if version != GLB_VERSION {
        return Err(GlbError::malformed(format!(
            "Unsupported GLB version: {}",
            version
        )));
    }
    if length as usize != data.len() {
        return Err(GlbError::malformed(format!(
            "Declared length {} does not match buffer length {}",
            length,
            data.len()
        )));
    }
    debug!("GLB header: version {}, {} bytes", version, length);

    let chunks = read_chunks(&mut reader)?;

    let json_chunk = match chunks.first() {
        Some(chunk) if chunk.chunk_type == GLB_CHUNK_JSON => chunk,
        Some(chunk) => {
            return Err(GlbError::malformed(format!(
                "First chunk must be JSON, found type 0x{:08X}",
                chunk.chunk_type
            )))
        }
        None => return Err(GlbError::malformed("No JSON chunk")),
    };
    let json = std::str::from_utf8(json_chunk.data)
        .map_err(|e| GlbError::malformed(format!("JSON chunk is not valid UTF-8: {}", e)))?
        .trim_end_matches(' ');

    let bin = match chunks.get(1) {
        Some(chunk) if chunk.chunk_type == GLB_CHUNK_BIN => Some(chunk.data),
        Some(chunk) => {
            return Err(GlbError::malformed(format!(
                "Second chunk must be BIN, found type 0x{:08X}",
                chunk.chunk_type
            )))
        }
        None => None,
    };

    let mut diagnostics = Diagnostics::new();
    for (position, chunk) in chunks.iter().enumerate().skip(2) {
        diagnostics.push(Diagnostic::unsupported_extra_chunk(
            position,
            chunk.chunk_type,
            chunk.data.len() as u32,
        ));
    }

    Ok(Container {
        version,
        length,
        json,
        bin,
        chunks,
        diagnostics,
    })
}

fn read_chunks<'a>(reader: &mut ByteReader<'a>) -> Result<Vec<Chunk<'a>>> {
    let mut chunks = Vec::new();

    while reader.remaining_size() > 0 {
        let index = chunks.len();
        if reader.remaining_size() < GLB_CHUNK_HEADER_LENGTH {
            return Err(GlbError::malformed(format!(
                "{} trailing bytes after chunk {} are too short for a chunk header",
                reader.remaining_size(),
                index.saturating_sub(1)
            )));
        }

        let chunk_length = reader.decode_u32()? as usize;
        let chunk_type = reader.decode_u32()?;
        let offset = reader.position();

        let data = reader.decode_slice(chunk_length).map_err(|_| {
            GlbError::malformed(format!(
                "Chunk {} ({} bytes at offset {}) extends past container end",
                index, chunk_length, offset
            ))
        })?;

        let padding = padding_for(chunk_length);
        let pad_bytes = reader.decode_slice(padding).map_err(|_| {
            GlbError::malformed(format!(
                "Chunk {} padding extends past container end",
                index
            ))
        })?;
        let expected_pad = if chunk_type == GLB_CHUNK_JSON { b' ' } else { 0 };
        if pad_bytes.iter().any(|&b| b != expected_pad) {
            debug!("Chunk {} has unexpected padding bytes {:02X?}", index, pad_bytes);
        }

        trace!(
            "Chunk {}: type 0x{:08X}, {} bytes at offset {} (+{} padding)",
            index,
            chunk_type,
            chunk_length,
            offset,
            padding
        );
        chunks.push(Chunk {
            chunk_type,
            offset,
            data,
        });
    }

    Ok(chunks)
}
