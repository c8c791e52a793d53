//! AIFF / AIFF-C reader
//!
//! ```text
//! "FORM" size:i32be "AIFF"|"AIFC"
//!   "COMM" channels:i16 frames:u32 bits:i16 rate:extended80 [AIFC: type:4 name:pstring]
//!   "SSND" offset:u32 block_size:u32 [offset bytes] PCM (big-endian)
//! ```
//!
//! IFF chunks are walked by their exact size with no pad byte. Only
//! uncompressed PCM is decoded; AIFF-C compression types are parsed and
//! anything other than plain PCM is rejected.

use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

use byteorder::{BigEndian, ReadBytesExt};
use log::{debug, warn};

use crate::codec::chunk::{
    ensure_available, stream_len, ChunkScanner, FourCC, CHUNK_HEADER_SIZE,
};
use crate::codec::extended::{decode_extended, sample_rate_hz, EXTENDED_SIZE};
use crate::config::CodecConfig;
use crate::engine::buffer::WaveBuffer;
use crate::engine::endian::swap_samples_in_place;
use crate::engine::format::WaveBufferFormat;
use crate::error::{Result, WaveError};

/// COMM body size for plain AIFF
const COMM_SIZE: u32 = 18;
/// COMM body size for AIFF-C up to and including the compression type
const AIFC_COMM_SIZE: u32 = 22;
/// SSND fields preceding the sound data
const SSND_HEADER_SIZE: u64 = 8;

const COMPRESSION_NONE: FourCC = FourCC(*b"NONE");
const COMPRESSION_TWOS: FourCC = FourCC(*b"twos");
const COMPRESSION_SOWT: FourCC = FourCC(*b"sowt");

// ============================================================================
// Chunk records
// ============================================================================

/// The 12-byte `FORM` header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AiffHeader {
    pub id: FourCC,
    pub size: i32,
    pub form_type: FourCC,
}

/// AIFF-C compression descriptor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AifcCompression {
    pub compression_type: FourCC,
    pub name: String,
}

/// Body of the `COMM` chunk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AiffCommonChunk {
    pub channels: i16,
    pub sample_frames: u32,
    pub bits_per_sample: i16,
    /// Big-endian 80-bit extended float
    pub sample_rate: [u8; EXTENDED_SIZE],
    /// Present only in AIFF-C files
    pub compression: Option<AifcCompression>,
}

impl AiffCommonChunk {
    /// Sample rate decoded from its extended representation
    pub fn sample_rate_hz(&self) -> u32 {
        sample_rate_hz(decode_extended(&self.sample_rate))
    }
}

/// Fixed fields at the start of the `SSND` chunk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AiffSoundChunk {
    pub offset: u32,
    pub block_size: u32,
}

/// Byte order of the sample data, derived from the compression type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PcmOrder {
    Big,
    Little,
}

impl PcmOrder {
    fn for_compression(compression: Option<&AifcCompression>) -> Result<Self> {
        let Some(compression) = compression else {
            return Ok(PcmOrder::Big);
        };
        match compression.compression_type {
            COMPRESSION_NONE | COMPRESSION_TWOS => Ok(PcmOrder::Big),
            COMPRESSION_SOWT => Ok(PcmOrder::Little),
            other => Err(WaveError::UnsupportedFormat {
                format: format!("AIFF-C compression '{}' ({})", other, compression.name),
            }),
        }
    }
}

// ============================================================================
// Reader
// ============================================================================

/// Reads AIFF and AIFF-C files into a `WaveBuffer`
#[derive(Debug, Clone, Default)]
pub struct AiffReader {
    config: CodecConfig,
}

impl AiffReader {
    /// Create a reader with default limits
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a reader with explicit limits
    pub fn with_config(config: CodecConfig) -> Self {
        Self { config }
    }

    /// Parse a complete AIFF or AIFF-C stream
    ///
    /// # Errors
    /// * `BadMagic` / `BadFormType` - if the header is not `FORM`/`AIFF|AIFC`
    /// * `MissingChunk` - if `COMM` or `SSND` is absent
    /// * `UndersizedChunk` - if `COMM` is too short
    /// * `UnsupportedFormat` - for compressed AIFF-C or nonsensical formats
    /// * `SizeMismatch` - if the declared frame count disagrees with the
    ///   format or runs past the end of the stream
    pub fn read<R: Read + Seek>(&self, reader: &mut R) -> Result<WaveBuffer> {
        let len = stream_len(reader)?;
        let header = read_header(reader, len)?;
        let is_aifc = header.form_type == FourCC::AIFC;

        let scanner = ChunkScanner::iff();
        let comm = scanner.find(reader, FourCC::COMM)?;
        if comm.size < COMM_SIZE {
            return Err(WaveError::UndersizedChunk {
                id: FourCC::COMM.to_string(),
                size: comm.size as u64,
            });
        }
        ensure_available(comm.body_offset, comm.size as u64, len)?;
        let common = read_common(reader, comm.size, is_aifc)?;

        let order = PcmOrder::for_compression(common.compression.as_ref())?;
        if common.channels < 1 || common.bits_per_sample < 1 {
            return Err(WaveError::UnsupportedFormat {
                format: format!(
                    "{} channels at {} bits",
                    common.channels, common.bits_per_sample
                ),
            });
        }

        let format = WaveBufferFormat::new(
            common.sample_rate_hz(),
            common.bits_per_sample as u16,
            common.channels as u16,
        );
        let frames = common.sample_frames as u64;
        let expected = frames * common.channels as u64 * common.bits_per_sample as u64 / 8;
        let buffer_len = frames * format.block_align() as u64;
        if expected != buffer_len {
            return Err(WaveError::SizeMismatch {
                expected,
                actual: buffer_len,
            });
        }
        self.config.check_data_size(expected)?;

        let ssnd = scanner.find(reader, FourCC::SSND)?;
        ensure_available(ssnd.body_offset, SSND_HEADER_SIZE, len)?;
        let sound = AiffSoundChunk {
            offset: reader.read_u32::<BigEndian>()?,
            block_size: reader.read_u32::<BigEndian>()?,
        };
        let data_start = ssnd.body_offset + SSND_HEADER_SIZE + sound.offset as u64;
        let chunk_room = (ssnd.size as u64).saturating_sub(SSND_HEADER_SIZE + sound.offset as u64);
        if expected > chunk_room {
            warn!(
                "SSND chunk holds {} bytes but COMM declares {}",
                chunk_room, expected
            );
        }
        ensure_available(data_start, expected, len)?;

        reader.seek(SeekFrom::Start(data_start))?;
        let mut data = vec![0u8; expected as usize];
        reader.read_exact(&mut data)?;

        let width = (common.bits_per_sample as usize + 7) / 8;
        if order == PcmOrder::Big {
            swap_samples_in_place(&mut data, width);
        }
        if format.bits_per_sample == 8 {
            // AIFF 8-bit is signed; WaveBuffer 8-bit is unsigned
            for b in data.iter_mut() {
                *b ^= 0x80;
            }
        }

        debug!(
            "read {}: {} Hz, {} bit, {} ch, {} frames",
            header.form_type, format.sample_rate, format.bits_per_sample, format.channels, frames
        );
        Ok(WaveBuffer::from_bytes(format, data))
    }
}

fn read_header<R: Read + Seek>(reader: &mut R, len: u64) -> Result<AiffHeader> {
    if len < 12 {
        return Err(WaveError::UndersizedChunk {
            id: FourCC::FORM.to_string(),
            size: len,
        });
    }
    reader.seek(SeekFrom::Start(0))?;

    let id = FourCC::read_from(reader)?;
    if id != FourCC::FORM {
        return Err(WaveError::BadMagic {
            expected: FourCC::FORM.to_string(),
            found: id.to_string(),
        });
    }
    let size = reader.read_i32::<BigEndian>()?;
    let form_type = FourCC::read_from(reader)?;
    if form_type != FourCC::AIFF && form_type != FourCC::AIFC {
        return Err(WaveError::BadFormType {
            found: form_type.to_string(),
        });
    }

    let declared_len = size as i64 + CHUNK_HEADER_SIZE as i64;
    if size < 4 || declared_len as u64 > len {
        warn!(
            "FORM header declares {} bytes but stream holds {}",
            declared_len, len
        );
    }

    Ok(AiffHeader {
        id,
        size,
        form_type,
    })
}

fn read_common<R: Read>(reader: &mut R, size: u32, is_aifc: bool) -> Result<AiffCommonChunk> {
    let channels = reader.read_i16::<BigEndian>()?;
    let sample_frames = reader.read_u32::<BigEndian>()?;
    let bits_per_sample = reader.read_i16::<BigEndian>()?;
    let mut sample_rate = [0u8; EXTENDED_SIZE];
    reader.read_exact(&mut sample_rate)?;

    let compression = if is_aifc && size >= AIFC_COMM_SIZE {
        let compression_type = FourCC::read_from(reader)?;
        let name = read_pascal_string(reader, size - AIFC_COMM_SIZE)?;
        Some(AifcCompression {
            compression_type,
            name,
        })
    } else {
        None
    };

    Ok(AiffCommonChunk {
        channels,
        sample_frames,
        bits_per_sample,
        sample_rate,
        compression,
    })
}

/// Read a Pascal string of at most `room` bytes (length byte included)
fn read_pascal_string<R: Read>(reader: &mut R, room: u32) -> Result<String> {
    if room == 0 {
        return Ok(String::new());
    }
    let len = reader.read_u8()? as u32;
    let len = len.min(room - 1);
    let mut raw = vec![0u8; len as usize];
    reader.read_exact(&mut raw)?;
    Ok(String::from_utf8_lossy(&raw).into_owned())
}

/// Read an AIFF stream with default limits
pub fn read_aiff<R: Read + Seek>(reader: &mut R) -> Result<WaveBuffer> {
    AiffReader::new().read(reader)
}

/// Read an AIFF file from disk
pub fn read_aiff_file(path: &Path) -> Result<WaveBuffer> {
    if !path.exists() {
        return Err(WaveError::FileNotFound {
            path: path.display().to_string(),
        });
    }
    let mut reader = std::io::BufReader::new(std::fs::File::open(path)?);
    read_aiff(&mut reader)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::extended::encode_extended;
    use std::io::Cursor;

    struct Fixture {
        form_type: &'static [u8; 4],
        channels: i16,
        bits: i16,
        rate: f64,
        compression: Option<(&'static [u8; 4], &'static str)>,
        ssnd_offset: u32,
        extra_chunk: bool,
    }

    impl Default for Fixture {
        fn default() -> Self {
            Self {
                form_type: b"AIFF",
                channels: 2,
                bits: 16,
                rate: 44100.0,
                compression: None,
                ssnd_offset: 0,
                extra_chunk: false,
            }
        }
    }

    impl Fixture {
        fn build(&self, frames: u32, pcm: &[u8]) -> Vec<u8> {
            let mut comm = Vec::new();
            comm.extend_from_slice(&self.channels.to_be_bytes());
            comm.extend_from_slice(&frames.to_be_bytes());
            comm.extend_from_slice(&self.bits.to_be_bytes());
            comm.extend_from_slice(&encode_extended(self.rate));
            if let Some((kind, name)) = self.compression {
                comm.extend_from_slice(kind);
                comm.push(name.len() as u8);
                comm.extend_from_slice(name.as_bytes());
                if (name.len() + 1) % 2 == 1 {
                    comm.push(0);
                }
            }

            let mut ssnd = Vec::new();
            ssnd.extend_from_slice(&self.ssnd_offset.to_be_bytes());
            ssnd.extend_from_slice(&0u32.to_be_bytes());
            ssnd.extend(std::iter::repeat(0xEE).take(self.ssnd_offset as usize));
            ssnd.extend_from_slice(pcm);

            let mut body = self.form_type.to_vec();
            if self.extra_chunk {
                push_chunk(&mut body, b"ANNO", b"odd");
            }
            push_chunk(&mut body, b"COMM", &comm);
            push_chunk(&mut body, b"SSND", &ssnd);

            let mut out = b"FORM".to_vec();
            out.extend_from_slice(&(body.len() as i32).to_be_bytes());
            out.extend_from_slice(&body);
            out
        }
    }

    fn push_chunk(out: &mut Vec<u8>, id: &[u8; 4], body: &[u8]) {
        out.extend_from_slice(id);
        out.extend_from_slice(&(body.len() as u32).to_be_bytes());
        out.extend_from_slice(body);
    }

    fn decode(bytes: Vec<u8>) -> Result<WaveBuffer> {
        read_aiff(&mut Cursor::new(bytes))
    }

    #[test]
    fn test_stereo_16bit() {
        // Two frames, big-endian: (1, -2), (0x0102, 0x7FFF)
        let pcm = [0x00, 0x01, 0xFF, 0xFE, 0x01, 0x02, 0x7F, 0xFF];
        let buffer = decode(Fixture::default().build(2, &pcm)).unwrap();

        assert_eq!(buffer.format, WaveBufferFormat::new(44100, 16, 2));
        assert_eq!(buffer.num_samples(), 2);
        assert_eq!(
            buffer.data,
            vec![0x01, 0x00, 0xFE, 0xFF, 0x02, 0x01, 0xFF, 0x7F]
        );
    }

    #[test]
    fn test_mono_8bit_converts_to_unsigned() {
        let fixture = Fixture {
            channels: 1,
            bits: 8,
            rate: 22050.0,
            ..Fixture::default()
        };
        // signed: 0, -128, 127
        let buffer = decode(fixture.build(3, &[0x00, 0x80, 0x7F])).unwrap();
        assert_eq!(buffer.format, WaveBufferFormat::new(22050, 8, 1));
        assert_eq!(buffer.data, vec![0x80, 0x00, 0xFF]);
    }

    #[test]
    fn test_24bit_swaps_three_byte_samples() {
        let fixture = Fixture {
            channels: 1,
            bits: 24,
            ..Fixture::default()
        };
        let buffer = decode(fixture.build(1, &[0x12, 0x34, 0x56])).unwrap();
        assert_eq!(buffer.data, vec![0x56, 0x34, 0x12]);
    }

    #[test]
    fn test_skips_unknown_odd_chunk_without_padding() {
        let fixture = Fixture {
            extra_chunk: true,
            ..Fixture::default()
        };
        let buffer = decode(fixture.build(1, &[0, 1, 0, 2])).unwrap();
        assert_eq!(buffer.data, vec![1, 0, 2, 0]);
    }

    #[test]
    fn test_ssnd_offset_is_honoured() {
        let fixture = Fixture {
            channels: 1,
            ssnd_offset: 4,
            ..Fixture::default()
        };
        let buffer = decode(fixture.build(2, &[0, 1, 0, 2])).unwrap();
        assert_eq!(buffer.data, vec![1, 0, 2, 0]);
    }

    #[test]
    fn test_aifc_none_and_sowt() {
        let none = Fixture {
            form_type: b"AIFC",
            channels: 1,
            compression: Some((b"NONE", "not compressed")),
            ..Fixture::default()
        };
        assert_eq!(decode(none.build(1, &[0x12, 0x34])).unwrap().data, vec![0x34, 0x12]);

        let sowt = Fixture {
            form_type: b"AIFC",
            channels: 1,
            compression: Some((b"sowt", "")),
            ..Fixture::default()
        };
        assert_eq!(decode(sowt.build(1, &[0x12, 0x34])).unwrap().data, vec![0x12, 0x34]);
    }

    #[test]
    fn test_aifc_compressed_is_unsupported() {
        let fixture = Fixture {
            form_type: b"AIFC",
            compression: Some((b"ima4", "IMA 4:1")),
            ..Fixture::default()
        };
        match decode(fixture.build(1, &[0; 4])).unwrap_err() {
            WaveError::UnsupportedFormat { format } => assert!(format.contains("ima4")),
            other => panic!("Expected UnsupportedFormat, got: {:?}", other),
        }
    }

    #[test]
    fn test_bad_magic_and_form() {
        let mut bytes = Fixture::default().build(1, &[0; 4]);
        bytes[0..4].copy_from_slice(b"RIFF");
        assert!(matches!(decode(bytes), Err(WaveError::BadMagic { .. })));

        let mut bytes = Fixture::default().build(1, &[0; 4]);
        bytes[8..12].copy_from_slice(b"8SVX");
        assert!(matches!(decode(bytes), Err(WaveError::BadFormType { .. })));
    }

    #[test]
    fn test_missing_comm_names_chunk() {
        let mut bytes = b"FORM".to_vec();
        bytes.extend_from_slice(&4i32.to_be_bytes());
        bytes.extend_from_slice(b"AIFF");
        match decode(bytes).unwrap_err() {
            WaveError::MissingChunk { id } => assert_eq!(id, "COMM"),
            other => panic!("Expected MissingChunk, got: {:?}", other),
        }
    }

    #[test]
    fn test_missing_ssnd() {
        let bytes = Fixture::default().build(0, &[]);
        // Cut the SSND chunk off entirely
        let truncated = bytes[..bytes.len() - 16].to_vec();
        match decode(truncated).unwrap_err() {
            WaveError::MissingChunk { id } => assert_eq!(id, "SSND"),
            other => panic!("Expected MissingChunk, got: {:?}", other),
        }
    }

    #[test]
    fn test_truncated_ssnd_header() {
        let mut bytes = Fixture::default().build(0, &[]);
        // Keep 2 of the 8 offset/block-size bytes
        bytes.truncate(bytes.len() - 6);
        match decode(bytes).unwrap_err() {
            WaveError::SizeMismatch { expected, actual } => {
                assert_eq!(expected, 8);
                assert_eq!(actual, 2);
            }
            other => panic!("Expected SizeMismatch, got: {:?}", other),
        }
    }

    #[test]
    fn test_frame_count_past_end_of_stream() {
        let bytes = Fixture::default().build(100, &[0; 8]);
        assert!(matches!(
            decode(bytes),
            Err(WaveError::SizeMismatch {
                expected: 400,
                actual: 8
            })
        ));
    }

    #[test]
    fn test_non_byte_aligned_frames_are_inconsistent() {
        let fixture = Fixture {
            channels: 1,
            bits: 12,
            ..Fixture::default()
        };
        assert!(matches!(
            decode(fixture.build(3, &[0; 6])),
            Err(WaveError::SizeMismatch { .. })
        ));
    }

    #[test]
    fn test_undersized_comm() {
        let mut body = b"AIFF".to_vec();
        push_chunk(&mut body, b"COMM", &[0; 10]);
        let mut bytes = b"FORM".to_vec();
        bytes.extend_from_slice(&(body.len() as i32).to_be_bytes());
        bytes.extend_from_slice(&body);
        assert!(matches!(
            decode(bytes),
            Err(WaveError::UndersizedChunk { size: 10, .. })
        ));
    }

    #[test]
    fn test_zero_channels_rejected() {
        let fixture = Fixture {
            channels: 0,
            ..Fixture::default()
        };
        assert!(matches!(
            decode(fixture.build(1, &[0; 4])),
            Err(WaveError::UnsupportedFormat { .. })
        ));
    }

    #[test]
    fn test_common_chunk_rate() {
        let common = AiffCommonChunk {
            channels: 1,
            sample_frames: 0,
            bits_per_sample: 16,
            sample_rate: encode_extended(11025.5),
            compression: None,
        };
        assert_eq!(common.sample_rate_hz(), 11025);
    }
}
