//! RIFF/WAVE codec
//!
//! Reads and writes canonical PCM wave files:
//!
//! ```text
//! "RIFF" size:u32le "WAVE"
//!   "fmt " 16 WaveFormatRecord
//!   "data" n  PCM bytes [pad byte if n is odd]
//! ```
//!
//! Unknown chunks (`LIST`, `fact`, ...) are skipped on read using RIFF word
//! alignment. PCM bytes are copied verbatim in both directions.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Seek, SeekFrom, Write};
use std::path::Path;

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use log::{debug, warn};

use crate::codec::chunk::{
    ensure_available, stream_len, ChunkScanner, FourCC, CHUNK_HEADER_SIZE,
};
use crate::config::CodecConfig;
use crate::engine::buffer::WaveBuffer;
use crate::engine::format::{
    WaveBufferFormat, WaveFormatRecord, WAVE_FORMAT_PCM, WAVE_FORMAT_RECORD_SIZE,
};
use crate::error::{Result, WaveError};

/// Smallest RIFF size field accepted on read and produced on write
const MIN_RIFF_SIZE: u32 = 16;

// ============================================================================
// Reader
// ============================================================================

/// Reads PCM wave files into a `WaveBuffer`
#[derive(Debug, Clone, Default)]
pub struct WavReader {
    config: CodecConfig,
}

impl WavReader {
    /// Create a reader with default limits
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a reader with explicit limits
    pub fn with_config(config: CodecConfig) -> Self {
        Self { config }
    }

    /// Parse a complete RIFF/WAVE stream
    ///
    /// The container is read from offset 0 regardless of the current
    /// position.
    ///
    /// # Errors
    /// * `BadMagic` - if the stream does not start with `RIFF`
    /// * `BadFormType` - if the RIFF form is not `WAVE`
    /// * `UndersizedChunk` - if the RIFF size or `fmt ` chunk is too small
    /// * `UnsupportedFormat` - if the format tag is not PCM
    /// * `MissingChunk` - if `fmt ` or `data` is absent
    /// * `SizeMismatch` - if a chunk runs past the end of the stream
    pub fn read<R: Read + Seek>(&self, reader: &mut R) -> Result<WaveBuffer> {
        let len = stream_len(reader)?;
        reader.seek(SeekFrom::Start(0))?;

        if len >= 4 {
            let magic = FourCC::read_from(reader)?;
            if magic != FourCC::RIFF {
                return Err(WaveError::BadMagic {
                    expected: FourCC::RIFF.to_string(),
                    found: magic.to_string(),
                });
            }
        }
        if len < 12 {
            return Err(WaveError::UndersizedChunk {
                id: FourCC::RIFF.to_string(),
                size: len,
            });
        }

        let riff_size = reader.read_u32::<LittleEndian>()?;
        if riff_size <= MIN_RIFF_SIZE {
            return Err(WaveError::UndersizedChunk {
                id: FourCC::RIFF.to_string(),
                size: riff_size as u64,
            });
        }
        let declared_len = riff_size as u64 + CHUNK_HEADER_SIZE;
        if declared_len > len {
            if self.config.strict_riff_size {
                return Err(WaveError::SizeMismatch {
                    expected: declared_len,
                    actual: len,
                });
            }
            warn!(
                "RIFF header declares {} bytes but stream holds {}",
                declared_len, len
            );
        }

        let form = FourCC::read_from(reader)?;
        if form != FourCC::WAVE {
            return Err(WaveError::BadFormType {
                found: form.to_string(),
            });
        }

        let scanner = ChunkScanner::riff();

        let fmt = scanner.find(reader, FourCC::FMT)?;
        if (fmt.size as usize) < WAVE_FORMAT_RECORD_SIZE {
            return Err(WaveError::UndersizedChunk {
                id: FourCC::FMT.to_string(),
                size: fmt.size as u64,
            });
        }
        ensure_available(fmt.body_offset, WAVE_FORMAT_RECORD_SIZE as u64, len)?;
        let record = WaveFormatRecord::read_from(reader)?;
        if record.format_tag != WAVE_FORMAT_PCM {
            return Err(WaveError::UnsupportedFormat {
                format: format!("WAVE format tag 0x{:04x}", record.format_tag),
            });
        }
        let format = WaveBufferFormat::from(&record);
        if record.block_align as u32 != format.block_align() {
            warn!(
                "fmt block align {} disagrees with derived {}",
                record.block_align,
                format.block_align()
            );
        }

        let data = scanner.find(reader, FourCC::DATA)?;
        self.config.check_data_size(data.size as u64)?;
        ensure_available(data.body_offset, data.size as u64, len)?;

        let mut pcm = vec![0u8; data.size as usize];
        reader.read_exact(&mut pcm)?;

        let align = format.block_align() as usize;
        if align > 0 && pcm.len() % align != 0 {
            warn!(
                "data chunk size {} is not a multiple of block align {}",
                pcm.len(),
                align
            );
        }

        debug!(
            "read WAVE: {} Hz, {} bit, {} ch, {} bytes",
            format.sample_rate,
            format.bits_per_sample,
            format.channels,
            pcm.len()
        );
        Ok(WaveBuffer::from_bytes(format, pcm))
    }
}

// ============================================================================
// Writer
// ============================================================================

/// Writes a `WaveBuffer` as a canonical PCM wave file
#[derive(Debug, Clone, Copy, Default)]
pub struct WavWriter;

impl WavWriter {
    pub fn new() -> Self {
        WavWriter
    }

    /// Value of the RIFF size field for `pcm_len` bytes of PCM
    ///
    /// `WAVE` tag + two chunk headers + format record + PCM + pad byte.
    pub fn riff_size(pcm_len: usize) -> u64 {
        4 + 2 * CHUNK_HEADER_SIZE
            + WAVE_FORMAT_RECORD_SIZE as u64
            + pcm_len as u64
            + (pcm_len as u64 & 1)
    }

    /// Serialize `buffer`, returning the number of bytes written
    ///
    /// # Errors
    /// * `DataTooLarge` - if the file would exceed the 4 GiB RIFF limit
    /// * `UndersizedChunk` - if the computed RIFF size is degenerate
    /// * `UnsupportedFormat` - if the block align does not fit the `fmt ` record
    pub fn write<W: Write>(&self, writer: &mut W, buffer: &WaveBuffer) -> Result<u64> {
        let block_align = buffer.format.block_align();
        if block_align > u16::MAX as u32 {
            return Err(WaveError::UnsupportedFormat {
                format: format!(
                    "{} channels at {} bits (block align {} exceeds {})",
                    buffer.format.channels,
                    buffer.format.bits_per_sample,
                    block_align,
                    u16::MAX
                ),
            });
        }
        let riff_size = Self::riff_size(buffer.data.len());
        if riff_size > u32::MAX as u64 {
            return Err(WaveError::DataTooLarge {
                size: riff_size,
                limit: u32::MAX as u64,
            });
        }
        if riff_size <= MIN_RIFF_SIZE as u64 {
            return Err(WaveError::UndersizedChunk {
                id: FourCC::RIFF.to_string(),
                size: riff_size,
            });
        }

        writer.write_all(FourCC::RIFF.as_bytes())?;
        writer.write_u32::<LittleEndian>(riff_size as u32)?;
        writer.write_all(FourCC::WAVE.as_bytes())?;

        writer.write_all(FourCC::FMT.as_bytes())?;
        writer.write_u32::<LittleEndian>(WAVE_FORMAT_RECORD_SIZE as u32)?;
        WaveFormatRecord::from(&buffer.format).write_to(writer)?;

        writer.write_all(FourCC::DATA.as_bytes())?;
        writer.write_u32::<LittleEndian>(buffer.data.len() as u32)?;
        writer.write_all(&buffer.data)?;
        if buffer.data.len() % 2 == 1 {
            writer.write_u8(0)?;
        }

        Ok(riff_size + CHUNK_HEADER_SIZE)
    }
}

// ============================================================================
// Convenience functions
// ============================================================================

/// Read a wave stream with default limits
pub fn read_wav<R: Read + Seek>(reader: &mut R) -> Result<WaveBuffer> {
    WavReader::new().read(reader)
}

/// Write a wave stream
pub fn write_wav<W: Write>(writer: &mut W, buffer: &WaveBuffer) -> Result<u64> {
    WavWriter::new().write(writer, buffer)
}

/// Read a wave file from disk
///
/// # Errors
/// * `FileNotFound` - if the file does not exist
/// * any error from [`WavReader::read`]
pub fn read_wav_file(path: &Path) -> Result<WaveBuffer> {
    if !path.exists() {
        return Err(WaveError::FileNotFound {
            path: path.display().to_string(),
        });
    }
    let mut reader = BufReader::new(File::open(path)?);
    read_wav(&mut reader)
}

/// Write a wave file to disk, replacing any existing file
pub fn write_wav_file(path: &Path, buffer: &WaveBuffer) -> Result<u64> {
    let mut writer = BufWriter::new(File::create(path)?);
    let written = write_wav(&mut writer, buffer)?;
    writer.flush()?;
    Ok(written)
}

// ============================================================================
// Tests
// ============================================================================
