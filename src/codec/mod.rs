//! Container codecs
//!
//! A stream is classified by [`sniff::classify_stream`], the matching
//! [`Decoder`] turns it into a [`WaveBuffer`], and [`wav::WavWriter`]
//! serializes buffers back out.

pub mod aiff;
pub mod chunk;
pub mod extended;
pub mod sniff;
pub mod wav;

use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

use log::info;

use crate::config::CodecConfig;
use crate::engine::buffer::WaveBuffer;
use crate::error::{Result, WaveError};

pub use aiff::AiffReader;
pub use chunk::FourCC;
pub use sniff::{classify_stream, FileType};
pub use wav::{WavReader, WavWriter};

/// Decode strategy for a detected container type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decoder {
    Wav,
    Aiff,
    AmigaModule,
    OggVorbis,
}

impl Decoder {
    /// Pick the decoder for a sniffed file type, if one exists
    pub fn for_file_type(file_type: FileType) -> Option<Decoder> {
        match file_type {
            FileType::Wave => Some(Decoder::Wav),
            FileType::Aiff | FileType::Aifc => Some(Decoder::Aiff),
            FileType::AmigaModule => Some(Decoder::AmigaModule),
            FileType::OggVorbis => Some(Decoder::OggVorbis),
            FileType::Unknown => None,
        }
    }

    /// Decode a stream into a wave buffer
    ///
    /// # Errors
    /// * `UnsupportedFormat` - for Amiga modules and Ogg Vorbis, which are
    ///   recognized but not decoded
    /// * any error from the selected reader
    pub fn read_wave_buffer<R: Read + Seek>(
        &self,
        reader: &mut R,
        config: &CodecConfig,
    ) -> Result<WaveBuffer> {
        match self {
            Decoder::Wav => WavReader::with_config(config.clone()).read(reader),
            Decoder::Aiff => AiffReader::with_config(config.clone()).read(reader),
            Decoder::AmigaModule => Err(WaveError::UnsupportedFormat {
                format: "Amiga module (tracker playback is not supported)".to_string(),
            }),
            Decoder::OggVorbis => Err(WaveError::UnsupportedFormat {
                format: "Ogg Vorbis (compressed audio is not supported)".to_string(),
            }),
        }
    }
}

fn decoder_for(file_type: FileType) -> Result<Decoder> {
    Decoder::for_file_type(file_type).ok_or_else(|| WaveError::UnsupportedFormat {
        format: "unrecognized container".to_string(),
    })
}

/// Sniff a stream and decode it with the matching decoder
///
/// # Errors
/// * `UnsupportedFormat` - if the container type is unknown or not decodable
pub fn read_wave_buffer<R: Read + Seek>(
    reader: &mut R,
    config: &CodecConfig,
) -> Result<WaveBuffer> {
    let file_type = classify_stream(reader)?;
    decoder_for(file_type)?.read_wave_buffer(reader, config)
}

/// Open a file, detect its container type and decode it
///
/// # Errors
/// * `FileNotFound` - if the file does not exist
/// * any error from [`read_wave_buffer`]
pub fn load_file(path: &Path, config: &CodecConfig) -> Result<WaveBuffer> {
    load_file_with_type(path, config).map(|(_, buffer)| buffer)
}

/// Like [`load_file`], also returning the detected container type
///
/// The file is opened and sniffed once.
pub fn load_file_with_type(
    path: &Path,
    config: &CodecConfig,
) -> Result<(FileType, WaveBuffer)> {
    if !path.exists() {
        return Err(WaveError::FileNotFound {
            path: path.display().to_string(),
        });
    }
    let mut reader = BufReader::new(File::open(path)?);
    let file_type = classify_stream(&mut reader)?;
    let buffer = decoder_for(file_type)?.read_wave_buffer(&mut reader, config)?;
    info!(
        "loaded {} ({}): {} frames, {:.3}s",
        path.display(),
        file_type,
        buffer.num_samples(),
        buffer.total_time()
    );
    Ok((file_type, buffer))
}

/// Classify a file on disk without decoding it
pub fn sniff_file(path: &Path) -> Result<FileType> {
    if !path.exists() {
        return Err(WaveError::FileNotFound {
            path: path.display().to_string(),
        });
    }
    let mut reader = BufReader::new(File::open(path)?);
    classify_stream(&mut reader)
}
