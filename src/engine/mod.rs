//! Wave-buffer engine
//!
//! In-memory PCM representation and the format-aware transforms that operate
//! on it.

pub mod buffer;
pub mod endian;
pub mod format;
pub mod pcm;

pub use buffer::WaveBuffer;
pub use format::{WaveBufferFormat, WaveFormatRecord, WAVE_FORMAT_PCM};
pub use pcm::SampleWidth;
