//! wavekit - Wave-buffer PCM engine and audio container codecs
//!
//! wavekit provides:
//! 1. `WaveBuffer` - raw interleaved PCM with its format, plus in-place
//!    transforms (reverse, mono/stereo conversion) and duration math
//! 2. Container codecs - RIFF/WAVE read/write, AIFF/AIFF-C read, and
//!    magic-byte sniffing for WAVE, AIFF, Ogg and Amiga modules
//!
//! # Architecture
//!
//! - `engine`: buffer, format descriptors, PCM scaling, byte-order helpers
//! - `codec`: chunk walking, sniffing, readers/writers, 80-bit floats
//! - `config`: reader limits loaded from JSON
//! - `cli`: the `wavekit-cli` commands

pub mod cli;
pub mod codec;
pub mod config;
pub mod engine;
pub mod error;

pub use codec::{classify_stream, load_file, read_wave_buffer, FileType};
pub use config::CodecConfig;
pub use engine::{WaveBuffer, WaveBufferFormat};
pub use error::{Result, WaveError};
