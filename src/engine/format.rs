//! Sample format descriptors
//!
//! `WaveBufferFormat` is the in-memory description of a PCM stream.
//! `WaveFormatRecord` is the 16-byte `fmt ` chunk body as it appears on disk;
//! it is always serialized field by field, never through struct layout.

use std::io::{Read, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

use crate::engine::pcm::SampleWidth;

/// Format tag for uncompressed integer PCM
pub const WAVE_FORMAT_PCM: u16 = 0x0001;

/// Size in bytes of the serialized `WaveFormatRecord`
pub const WAVE_FORMAT_RECORD_SIZE: usize = 16;

// ============================================================================
// WaveBufferFormat
// ============================================================================

/// Sample rate, bit depth and channel count of a PCM buffer
///
/// # Example
/// ```
/// use wavekit::engine::format::WaveBufferFormat;
///
/// let format = WaveBufferFormat::new(44100, 16, 2);
/// assert_eq!(format.block_align(), 4);
/// assert_eq!(format.bytes_per_second(), 176400);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WaveBufferFormat {
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Bits per individual sample (commonly 8, 16, 24 or 32)
    pub bits_per_sample: u16,
    /// Number of interleaved channels
    pub channels: u16,
}

impl WaveBufferFormat {
    /// Create a new format descriptor
    pub fn new(sample_rate: u32, bits_per_sample: u16, channels: u16) -> Self {
        Self {
            sample_rate,
            bits_per_sample,
            channels,
        }
    }

    /// CD audio: 44.1kHz, 16-bit, stereo
    pub fn cd_quality() -> Self {
        Self::new(44100, 16, 2)
    }

    /// Bytes per sample frame across all channels
    #[inline]
    pub fn block_align(&self) -> u32 {
        self.channels as u32 * self.bits_per_sample as u32 / 8
    }

    /// Bytes consumed per second of audio
    #[inline]
    pub fn bytes_per_second(&self) -> u64 {
        self.sample_rate as u64 * self.block_align() as u64
    }

    /// Duration in seconds of `byte_count` bytes of PCM in this format
    ///
    /// Returns 0.0 for a degenerate format instead of dividing by zero.
    pub fn total_time(&self, byte_count: usize) -> f64 {
        let bps = self.bytes_per_second();
        if bps == 0 {
            return 0.0;
        }
        byte_count as f64 / bps as f64
    }

    /// Whether samples are signed (everything wider than 8 bits)
    #[inline]
    pub fn is_signed(&self) -> bool {
        self.bits_per_sample > 8
    }

    /// Sample width, if the bit depth is one the engine can scale
    pub fn sample_width(&self) -> Option<SampleWidth> {
        SampleWidth::from_bits(self.bits_per_sample)
    }
}

impl Default for WaveBufferFormat {
    fn default() -> Self {
        Self::cd_quality()
    }
}

impl From<&WaveFormatRecord> for WaveBufferFormat {
    fn from(record: &WaveFormatRecord) -> Self {
        Self::new(record.sample_rate, record.bits_per_sample, record.channels)
    }
}

// ============================================================================
// On-disk wave format record
// ============================================================================

/// Body of a RIFF `fmt ` chunk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaveFormatRecord {
    pub format_tag: u16,
    pub channels: u16,
    pub sample_rate: u32,
    pub bytes_per_second: u32,
    pub block_align: u16,
    pub bits_per_sample: u16,
}

impl WaveFormatRecord {
    /// Build a PCM record with derived block align and byte rate
    pub fn pcm(channels: u16, sample_rate: u32, bits_per_sample: u16) -> Self {
        let block_align = (channels as u32 * bits_per_sample as u32 / 8) as u16;
        Self {
            format_tag: WAVE_FORMAT_PCM,
            channels,
            sample_rate,
            bytes_per_second: sample_rate.wrapping_mul(block_align as u32),
            block_align,
            bits_per_sample,
        }
    }

    /// Read the record in little-endian field order
    pub fn read_from<R: Read>(reader: &mut R) -> std::io::Result<Self> {
        Ok(Self {
            format_tag: reader.read_u16::<LittleEndian>()?,
            channels: reader.read_u16::<LittleEndian>()?,
            sample_rate: reader.read_u32::<LittleEndian>()?,
            bytes_per_second: reader.read_u32::<LittleEndian>()?,
            block_align: reader.read_u16::<LittleEndian>()?,
            bits_per_sample: reader.read_u16::<LittleEndian>()?,
        })
    }

    /// Write the record in little-endian field order
    pub fn write_to<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        writer.write_u16::<LittleEndian>(self.format_tag)?;
        writer.write_u16::<LittleEndian>(self.channels)?;
        writer.write_u32::<LittleEndian>(self.sample_rate)?;
        writer.write_u32::<LittleEndian>(self.bytes_per_second)?;
        writer.write_u16::<LittleEndian>(self.block_align)?;
        writer.write_u16::<LittleEndian>(self.bits_per_sample)?;
        Ok(())
    }

    /// Serialize into a fixed 16-byte array
    pub fn to_bytes(&self) -> [u8; WAVE_FORMAT_RECORD_SIZE] {
        let mut out = [0u8; WAVE_FORMAT_RECORD_SIZE];
        let mut cursor = &mut out[..];
        // Writing 16 bytes into a 16-byte slice cannot fail
        let _ = self.write_to(&mut cursor);
        out
    }
}

impl From<&WaveBufferFormat> for WaveFormatRecord {
    fn from(format: &WaveBufferFormat) -> Self {
        Self::pcm(format.channels, format.sample_rate, format.bits_per_sample)
    }
}
