//! Container type detection
//!
//! Classifies a stream by its magic bytes without consuming it: the read
//! position is restored on every return path.

use std::fmt;
use std::io::{self, Read, Seek, SeekFrom};
use std::ops::{Deref, DerefMut};
use std::path::Path;

use log::{debug, warn};

use crate::codec::chunk::FourCC;
use crate::error::Result;

/// Offset of the 4-byte format tag in a 31-instrument ProTracker module
pub const MOD_TAG_OFFSET: u64 = 1080;

/// Format tags identifying Amiga modules
pub const MOD_TAGS: [&[u8; 4]; 6] = [b"M.K.", b"4CHN", b"6CHN", b"8CHN", b"4FLT", b"8FLT"];

/// Detected container type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileType {
    Wave,
    Aiff,
    Aifc,
    OggVorbis,
    AmigaModule,
    Unknown,
}

impl FileType {
    /// Guess a type from a file extension (case-insensitive)
    ///
    /// This is only a hint for display; decoding always sniffs contents.
    pub fn from_extension(path: &Path) -> FileType {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match ext.as_deref() {
            Some("wav") | Some("wave") => FileType::Wave,
            Some("aif") | Some("aiff") => FileType::Aiff,
            Some("aifc") => FileType::Aifc,
            Some("ogg") => FileType::OggVorbis,
            Some("mod") => FileType::AmigaModule,
            _ => FileType::Unknown,
        }
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FileType::Wave => "WAVE",
            FileType::Aiff => "AIFF",
            FileType::Aifc => "AIFF-C",
            FileType::OggVorbis => "Ogg Vorbis",
            FileType::AmigaModule => "Amiga module",
            FileType::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

/// Restores a stream's read position when dropped
pub struct StreamPositionGuard<'a, S: Seek> {
    stream: &'a mut S,
    position: u64,
}

impl<'a, S: Seek> StreamPositionGuard<'a, S> {
    /// Remember the current position of `stream`
    pub fn new(stream: &'a mut S) -> io::Result<Self> {
        let position = stream.stream_position()?;
        Ok(Self { stream, position })
    }

    /// The saved position
    pub fn saved_position(&self) -> u64 {
        self.position
    }
}

impl<S: Seek> Deref for StreamPositionGuard<'_, S> {
    type Target = S;

    fn deref(&self) -> &S {
        self.stream
    }
}

impl<S: Seek> DerefMut for StreamPositionGuard<'_, S> {
    fn deref_mut(&mut self) -> &mut S {
        self.stream
    }
}

impl<S: Seek> Drop for StreamPositionGuard<'_, S> {
    fn drop(&mut self) {
        if let Err(e) = self.stream.seek(SeekFrom::Start(self.position)) {
            warn!("failed to restore stream position {}: {}", self.position, e);
        }
    }
}

/// Read a 4-byte tag at `offset`, or None if the stream is too short
fn tag_at<R: Read + Seek>(reader: &mut R, offset: u64) -> io::Result<Option<FourCC>> {
    reader.seek(SeekFrom::Start(offset))?;
    match FourCC::read_from(reader) {
        Ok(tag) => Ok(Some(tag)),
        Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => Ok(None),
        Err(e) => Err(e),
    }
}

/// Classify a stream by its leading magic bytes
///
/// Offsets are absolute from the start of the stream. The read position is
/// unchanged when this returns, whether it succeeds or fails.
///
/// # Errors
/// * `Io` - if the stream cannot be read or repositioned
pub fn classify_stream<R: Read + Seek>(stream: &mut R) -> Result<FileType> {
    let mut guard = StreamPositionGuard::new(stream)?;
    let file_type = classify_inner(&mut *guard)?;
    debug!("classified stream as {}", file_type);
    Ok(file_type)
}

fn classify_inner<R: Read + Seek>(reader: &mut R) -> io::Result<FileType> {
    let Some(magic) = tag_at(reader, 0)? else {
        return Ok(FileType::Unknown);
    };

    if magic == FourCC::RIFF {
        if tag_at(reader, 8)? == Some(FourCC::WAVE) {
            return Ok(FileType::Wave);
        }
    } else if magic == FourCC::FORM {
        match tag_at(reader, 8)? {
            Some(FourCC::AIFF) => return Ok(FileType::Aiff),
            Some(FourCC::AIFC) => return Ok(FileType::Aifc),
            _ => {}
        }
    } else if magic == FourCC::OGGS {
        return Ok(FileType::OggVorbis);
    }

    if let Some(tag) = tag_at(reader, MOD_TAG_OFFSET)? {
        if MOD_TAGS.iter().any(|t| **t == tag.0) {
            return Ok(FileType::AmigaModule);
        }
    }

    Ok(FileType::Unknown)
}
