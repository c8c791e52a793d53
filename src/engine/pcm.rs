//! PCM sample scaling
//!
//! Converts between normalized `[-1.0, 1.0]` samples and fixed-width integer
//! PCM codes. 8-bit PCM is unsigned with a bias of 128; wider widths are
//! signed two's complement. All byte-level helpers here use little-endian
//! order, which is what `WaveBuffer` stores.
//!
//! Positive values scale by the maximum code and negative values by the
//! magnitude of the minimum code, so both full-scale ends are reachable and
//! every integer code survives a round trip through `f64` unchanged.

/// Supported PCM sample widths
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SampleWidth {
    /// 8-bit unsigned
    Eight,
    /// 16-bit signed
    Sixteen,
    /// 24-bit signed, packed in 3 bytes
    TwentyFour,
    /// 32-bit signed
    ThirtyTwo,
}

impl SampleWidth {
    /// Map a bits-per-sample value to a width, if supported
    pub fn from_bits(bits_per_sample: u16) -> Option<Self> {
        match bits_per_sample {
            8 => Some(SampleWidth::Eight),
            16 => Some(SampleWidth::Sixteen),
            24 => Some(SampleWidth::TwentyFour),
            32 => Some(SampleWidth::ThirtyTwo),
            _ => None,
        }
    }

    /// Bits per sample
    pub fn bits(&self) -> u16 {
        match self {
            SampleWidth::Eight => 8,
            SampleWidth::Sixteen => 16,
            SampleWidth::TwentyFour => 24,
            SampleWidth::ThirtyTwo => 32,
        }
    }

    /// Bytes per sample
    #[inline]
    pub fn bytes(&self) -> usize {
        self.bits() as usize / 8
    }

    /// Largest centered code
    #[inline]
    pub fn max_code(&self) -> i32 {
        match self {
            SampleWidth::ThirtyTwo => i32::MAX,
            _ => (1i32 << (self.bits() - 1)) - 1,
        }
    }

    /// Smallest centered code
    #[inline]
    pub fn min_code(&self) -> i32 {
        match self {
            SampleWidth::ThirtyTwo => i32::MIN,
            _ => -(1i32 << (self.bits() - 1)),
        }
    }
}

/// Convert a centered integer code to a normalized sample
#[inline]
pub fn to_normalized(code: i32, width: SampleWidth) -> f64 {
    if code >= 0 {
        code as f64 / width.max_code() as f64
    } else {
        code as f64 / -(width.min_code() as f64)
    }
}

/// Convert a normalized sample to a centered integer code
///
/// Input is clamped to `[-1.0, 1.0]`; NaN maps to silence.
#[inline]
pub fn from_normalized(value: f64, width: SampleWidth) -> i32 {
    if value.is_nan() {
        return 0;
    }
    let v = value.clamp(-1.0, 1.0);
    let scaled = if v >= 0.0 {
        (v * width.max_code() as f64).round()
    } else {
        (v * -(width.min_code() as f64)).round()
    };
    scaled.clamp(width.min_code() as f64, width.max_code() as f64) as i32
}

/// Read one little-endian sample and return its centered code
///
/// `bytes` must hold at least `width.bytes()` bytes.
#[inline]
pub fn read_sample(bytes: &[u8], width: SampleWidth) -> i32 {
    match width {
        SampleWidth::Eight => bytes[0] as i32 - 128,
        SampleWidth::Sixteen => i16::from_le_bytes([bytes[0], bytes[1]]) as i32,
        SampleWidth::TwentyFour => {
            // Sign-extend by placing the 24 bits at the top of an i32
            i32::from_le_bytes([0, bytes[0], bytes[1], bytes[2]]) >> 8
        }
        SampleWidth::ThirtyTwo => i32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]),
    }
}

/// Append one centered code as a little-endian sample
#[inline]
pub fn write_sample(code: i32, width: SampleWidth, out: &mut Vec<u8>) {
    let code = code.clamp(width.min_code(), width.max_code());
    match width {
        SampleWidth::Eight => out.push((code + 128) as u8),
        SampleWidth::Sixteen => out.extend_from_slice(&(code as i16).to_le_bytes()),
        SampleWidth::TwentyFour => out.extend_from_slice(&code.to_le_bytes()[..3]),
        SampleWidth::ThirtyTwo => out.extend_from_slice(&code.to_le_bytes()),
    }
}

/// Decode a little-endian PCM byte stream into normalized samples
///
/// A trailing partial sample is ignored.
pub fn decode_samples(bytes: &[u8], width: SampleWidth) -> Vec<f64> {
    bytes
        .chunks_exact(width.bytes())
        .map(|s| to_normalized(read_sample(s, width), width))
        .collect()
}

/// Encode normalized samples as a little-endian PCM byte stream
pub fn encode_samples(samples: &[f64], width: SampleWidth) -> Vec<u8> {
    let mut out = Vec::with_capacity(samples.len() * width.bytes());
    for &s in samples {
        write_sample(from_normalized(s, width), width, &mut out);
    }
    out
}
