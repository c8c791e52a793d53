//! Wave buffer management
//!
//! `WaveBuffer` is the canonical in-memory PCM container: a format descriptor
//! plus raw interleaved little-endian sample bytes, frame-major. Codecs fill
//! it, transforms rewrite it in place, and writers serialize it verbatim.

use crate::engine::format::{WaveBufferFormat, WaveFormatRecord};
use crate::engine::pcm::{self, SampleWidth};
use crate::error::{Result, WaveError};

// ============================================================================
// Transform width dispatch
// ============================================================================

/// Sample widths the in-place transforms operate on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TransformWidth {
    Eight,
    Sixteen,
}

impl TransformWidth {
    fn for_format(format: &WaveBufferFormat, operation: &'static str) -> Result<Self> {
        match format.bits_per_sample {
            8 => Ok(TransformWidth::Eight),
            16 => Ok(TransformWidth::Sixteen),
            bits => Err(WaveError::UnsupportedTransform {
                operation,
                bits_per_sample: bits,
            }),
        }
    }

    fn bytes(&self) -> usize {
        match self {
            TransformWidth::Eight => 1,
            TransformWidth::Sixteen => 2,
        }
    }
}

// ============================================================================
// Wave Buffer
// ============================================================================

/// PCM audio with its format
///
/// # Invariant
/// `data.len()` is a multiple of `format.block_align()` after every
/// transform. A buffer whose data violates this (for example one built from
/// corrupt input) is never indexed past its end; trailing partial frames are
/// dropped by transforms.
///
/// # Example
/// ```
/// use wavekit::engine::buffer::WaveBuffer;
/// use wavekit::engine::format::WaveBufferFormat;
///
/// let mut buffer = WaveBuffer::new(WaveBufferFormat::new(8000, 16, 1));
/// buffer.data = vec![0x01, 0x00, 0x02, 0x00];
/// buffer.make_stereo().unwrap();
/// assert_eq!(buffer.format.channels, 2);
/// assert_eq!(buffer.num_samples(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WaveBuffer {
    /// Sample format of `data`
    pub format: WaveBufferFormat,
    /// Raw interleaved PCM bytes
    pub data: Vec<u8>,
}

impl WaveBuffer {
    /// Create an empty buffer with the given format
    pub fn new(format: WaveBufferFormat) -> Self {
        Self {
            format,
            data: Vec::new(),
        }
    }

    /// Create a buffer that takes ownership of existing PCM bytes
    pub fn from_bytes(format: WaveBufferFormat, data: Vec<u8>) -> Self {
        Self { format, data }
    }

    /// Create a zero-filled (silent) buffer holding `frames` sample frames
    pub fn silence(format: WaveBufferFormat, frames: usize) -> Self {
        let fill = if format.is_signed() { 0u8 } else { 0x80 };
        let len = frames * format.block_align() as usize;
        Self {
            format,
            data: vec![fill; len],
        }
    }

    /// Quantize interleaved normalized samples into a new buffer
    ///
    /// # Errors
    /// * `UnsupportedFormat` - if the format's bit depth cannot be scaled
    pub fn from_normalized(format: WaveBufferFormat, samples: &[f64]) -> Result<Self> {
        let width = format
            .sample_width()
            .ok_or_else(|| WaveError::UnsupportedFormat {
                format: format!("{}-bit PCM", format.bits_per_sample),
            })?;
        Ok(Self {
            format,
            data: pcm::encode_samples(samples, width),
        })
    }

    /// Decode the buffer into interleaved normalized samples
    ///
    /// # Errors
    /// * `UnsupportedFormat` - if the format's bit depth cannot be scaled
    pub fn to_normalized(&self) -> Result<Vec<f64>> {
        let width = self.sample_width_or_err()?;
        Ok(pcm::decode_samples(&self.data, width))
    }

    /// Generate a sine tone, identical on every channel
    ///
    /// Amplitude is 0.5 of full scale.
    pub fn generate_tone(
        format: WaveBufferFormat,
        frequency: f64,
        duration_secs: f64,
    ) -> Result<Self> {
        let frames = (duration_secs * format.sample_rate as f64) as usize;
        let channels = format.channels as usize;
        let angular_freq = 2.0 * std::f64::consts::PI * frequency / format.sample_rate as f64;

        let mut samples = Vec::with_capacity(frames * channels);
        for i in 0..frames {
            let value = 0.5 * (angular_freq * i as f64).sin();
            samples.extend(std::iter::repeat(value).take(channels));
        }
        Self::from_normalized(format, &samples)
    }

    /// Number of sample frames (independent of channel count)
    #[inline]
    pub fn num_samples(&self) -> usize {
        match self.format.block_align() {
            0 => 0,
            align => self.data.len() / align as usize,
        }
    }

    /// Check if the buffer holds no PCM data
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Duration in seconds
    #[inline]
    pub fn total_time(&self) -> f64 {
        self.format.total_time(self.data.len())
    }

    /// Duration of `buffer_size` bytes for a format given as raw parameters
    pub fn total_time_for(
        buffer_size: usize,
        sample_rate: u32,
        channels: u16,
        bits_per_sample: u16,
    ) -> f64 {
        WaveBufferFormat::new(sample_rate, bits_per_sample, channels).total_time(buffer_size)
    }

    /// Build the on-disk PCM format record for the given parameters
    pub fn make_wave_format_pcm(
        channels: u16,
        sample_rate: u32,
        bits_per_sample: u16,
    ) -> WaveFormatRecord {
        WaveFormatRecord::pcm(channels, sample_rate, bits_per_sample)
    }

    /// Raw bytes of sample frame `index`, or None when out of range
    pub fn frame(&self, index: usize) -> Option<&[u8]> {
        let align = self.format.block_align() as usize;
        if align == 0 {
            return None;
        }
        let start = index.checked_mul(align)?;
        self.data.get(start..start + align)
    }

    /// Reverse the order of sample frames
    ///
    /// Each frame keeps its channel order; only frame positions are mirrored.
    ///
    /// # Errors
    /// * `UnsupportedTransform` - for bit depths other than 8 and 16
    pub fn reverse(&mut self) -> Result<()> {
        let align = self.format.block_align() as usize;
        if align == 0 || self.data.is_empty() {
            return Ok(());
        }
        TransformWidth::for_format(&self.format, "reverse")?;

        let whole = self.data.len() - self.data.len() % align;
        self.data.truncate(whole);

        let frames = whole / align;
        for i in 0..frames / 2 {
            let mirror = frames - 1 - i;
            let (head, tail) = self.data.split_at_mut(mirror * align);
            head[i * align..(i + 1) * align].swap_with_slice(&mut tail[..align]);
        }
        Ok(())
    }

    /// Downmix stereo to mono by averaging left and right
    ///
    /// The average truncates toward zero in the sample's own numeric domain
    /// (unsigned for 8-bit, signed for 16-bit). Mono or empty buffers are left
    /// untouched.
    ///
    /// # Errors
    /// * `UnsupportedTransform` - for bit depths other than 8 and 16
    pub fn make_mono(&mut self) -> Result<()> {
        if self.format.channels != 2 || self.data.is_empty() {
            return Ok(());
        }
        let width = TransformWidth::for_format(&self.format, "make_mono")?;
        let frame = width.bytes() * 2;

        let mut mono = Vec::with_capacity(self.data.len() / 2);
        for pair in self.data.chunks_exact(frame) {
            match width {
                TransformWidth::Eight => {
                    mono.push(((pair[0] as u16 + pair[1] as u16) / 2) as u8);
                }
                TransformWidth::Sixteen => {
                    let left = i16::from_le_bytes([pair[0], pair[1]]) as i32;
                    let right = i16::from_le_bytes([pair[2], pair[3]]) as i32;
                    mono.extend_from_slice(&(((left + right) / 2) as i16).to_le_bytes());
                }
            }
        }

        self.data = mono;
        self.format.channels = 1;
        Ok(())
    }

    /// Expand mono to stereo by duplicating every sample into both channels
    ///
    /// Stereo or empty buffers are left untouched.
    ///
    /// # Errors
    /// * `UnsupportedTransform` - for bit depths other than 8 and 16
    pub fn make_stereo(&mut self) -> Result<()> {
        if self.format.channels != 1 || self.data.is_empty() {
            return Ok(());
        }
        let width = TransformWidth::for_format(&self.format, "make_stereo")?;

        let mut stereo = Vec::with_capacity(self.data.len() * 2);
        for sample in self.data.chunks_exact(width.bytes()) {
            stereo.extend_from_slice(sample);
            stereo.extend_from_slice(sample);
        }

        self.data = stereo;
        self.format.channels = 2;
        Ok(())
    }

    fn sample_width_or_err(&self) -> Result<SampleWidth> {
        self.format
            .sample_width()
            .ok_or_else(|| WaveError::UnsupportedFormat {
                format: format!("{}-bit PCM", self.format.bits_per_sample),
            })
    }
}

// ============================================================================
// Tests
// ============================================================================
