//! Chunk walking for RIFF and IFF/FORM containers
//!
//! Both container families are a flat sequence of `id(4) size(4) body`
//! records after a 12-byte header. They differ only in the byte order of the
//! size field and in whether bodies are padded to an even length.

use std::fmt;
use std::io::{self, Read, Seek, SeekFrom};

use byteorder::{BigEndian, LittleEndian, ReadBytesExt};
use log::{debug, trace};

use crate::error::{Result, WaveError};

/// Size of a chunk header: 4-byte id + 4-byte length
pub const CHUNK_HEADER_SIZE: u64 = 8;

/// Offset of the first sub-chunk after a `RIFF`/`FORM` header
pub const FIRST_CHUNK_OFFSET: u64 = 12;

/// Four-character chunk tag
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct FourCC(pub [u8; 4]);

impl FourCC {
    pub const RIFF: FourCC = FourCC(*b"RIFF");
    pub const WAVE: FourCC = FourCC(*b"WAVE");
    pub const FMT: FourCC = FourCC(*b"fmt ");
    pub const DATA: FourCC = FourCC(*b"data");
    pub const FORM: FourCC = FourCC(*b"FORM");
    pub const AIFF: FourCC = FourCC(*b"AIFF");
    pub const AIFC: FourCC = FourCC(*b"AIFC");
    pub const COMM: FourCC = FourCC(*b"COMM");
    pub const SSND: FourCC = FourCC(*b"SSND");
    pub const OGGS: FourCC = FourCC(*b"OggS");

    /// Read a tag from the stream
    pub fn read_from<R: Read>(reader: &mut R) -> io::Result<Self> {
        let mut id = [0u8; 4];
        reader.read_exact(&mut id)?;
        Ok(FourCC(id))
    }

    /// Raw tag bytes
    pub fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }
}

impl fmt::Display for FourCC {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &b in &self.0 {
            if b.is_ascii_graphic() || b == b' ' {
                write!(f, "{}", b as char)?;
            } else {
                write!(f, "\\x{:02x}", b)?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for FourCC {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FourCC(\"{}\")", self)
    }
}

/// Byte order of chunk size fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeOrder {
    /// RIFF
    Little,
    /// IFF / AIFF
    Big,
}

/// How far to advance past a chunk body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkAlignment {
    /// Round odd sizes up to the next even byte (RIFF)
    Word,
    /// Advance by the exact declared size
    Exact,
}

impl ChunkAlignment {
    /// Bytes occupied by a body of `size` bytes
    #[inline]
    pub fn padded(&self, size: u32) -> u64 {
        match self {
            ChunkAlignment::Word => (size as u64 + 1) & !1,
            ChunkAlignment::Exact => size as u64,
        }
    }
}

/// A located chunk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkHeader {
    pub id: FourCC,
    pub size: u32,
    /// Stream offset of the first body byte
    pub body_offset: u64,
}

/// Read a chunk size field in the given byte order
pub fn read_size<R: Read>(reader: &mut R, order: SizeOrder) -> io::Result<u32> {
    match order {
        SizeOrder::Little => reader.read_u32::<LittleEndian>(),
        SizeOrder::Big => reader.read_u32::<BigEndian>(),
    }
}

/// Total stream length, leaving the position unchanged
pub fn stream_len<S: Seek>(stream: &mut S) -> io::Result<u64> {
    let pos = stream.stream_position()?;
    let len = stream.seek(SeekFrom::End(0))?;
    if pos != len {
        stream.seek(SeekFrom::Start(pos))?;
    }
    Ok(len)
}

/// Check that `wanted` bytes exist from `offset` in a stream of `len` bytes
///
/// # Errors
/// * `SizeMismatch` - carrying the wanted and available byte counts
pub fn ensure_available(offset: u64, wanted: u64, len: u64) -> Result<()> {
    let available = len.saturating_sub(offset);
    if wanted > available {
        return Err(WaveError::SizeMismatch {
            expected: wanted,
            actual: available,
        });
    }
    Ok(())
}

/// Walks the sub-chunks of a container
pub struct ChunkScanner {
    order: SizeOrder,
    alignment: ChunkAlignment,
}

impl ChunkScanner {
    /// Scanner for RIFF containers
    pub fn riff() -> Self {
        Self {
            order: SizeOrder::Little,
            alignment: ChunkAlignment::Word,
        }
    }

    /// Scanner for IFF/FORM containers
    pub fn iff() -> Self {
        Self {
            order: SizeOrder::Big,
            alignment: ChunkAlignment::Exact,
        }
    }

    /// Find the first chunk tagged `wanted`, starting at the first sub-chunk
    ///
    /// On success the stream is positioned at the start of the chunk body.
    ///
    /// # Errors
    /// * `MissingChunk` - if the end of the stream is reached first
    pub fn find<R: Read + Seek>(&self, reader: &mut R, wanted: FourCC) -> Result<ChunkHeader> {
        let len = stream_len(reader)?;
        let mut pos = FIRST_CHUNK_OFFSET;

        while pos + CHUNK_HEADER_SIZE <= len {
            reader.seek(SeekFrom::Start(pos))?;
            let id = FourCC::read_from(reader)?;
            let size = read_size(reader, self.order)?;
            let body_offset = pos + CHUNK_HEADER_SIZE;

            if id == wanted {
                debug!("found '{}' chunk at {} ({} bytes)", id, pos, size);
                return Ok(ChunkHeader {
                    id,
                    size,
                    body_offset,
                });
            }

            trace!("skipping '{}' chunk at {} ({} bytes)", id, pos, size);
            pos = body_offset + self.alignment.padded(size);
        }

        Err(WaveError::MissingChunk {
            id: wanted.to_string(),
        })
    }
}
