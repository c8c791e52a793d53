//! 80-bit IEEE-754 extended precision conversion
//!
//! AIFF stores its sample rate as a big-endian 80-bit extended float:
//!
//! ```text
//! byte 0..2   sign (1 bit) | biased exponent (15 bits, bias 16383)
//! byte 2..10  64-bit significand with an explicit integer bit
//! ```
//!
//! Decoding rounds to the nearest double (ties to even), saturates to
//! infinity on overflow and to signed zero or a subnormal on underflow.

/// Size of an encoded extended float
pub const EXTENDED_SIZE: usize = 10;

const EXTENDED_BIAS: i32 = 16383;
const EXTENDED_MAX_EXP: u16 = 0x7FFF;
const DOUBLE_BIAS: i32 = 1023;
const DOUBLE_FRACTION_MASK: u64 = (1 << 52) - 1;

/// Decode a big-endian 80-bit extended float to `f64`
pub fn decode_extended(bytes: &[u8; EXTENDED_SIZE]) -> f64 {
    let sign_exp = u16::from_be_bytes([bytes[0], bytes[1]]);
    let mut mantissa_bytes = [0u8; 8];
    mantissa_bytes.copy_from_slice(&bytes[2..]);
    let mantissa = u64::from_be_bytes(mantissa_bytes);

    let negative = sign_exp & 0x8000 != 0;
    let exponent = sign_exp & 0x7FFF;
    let sign_bit = (negative as u64) << 63;

    if exponent == EXTENDED_MAX_EXP {
        // Integer bit is ignored; any fraction bit makes it a NaN
        return if mantissa & !(1u64 << 63) == 0 {
            f64::from_bits(sign_bit | 0x7FF0_0000_0000_0000)
        } else {
            f64::NAN
        };
    }
    if mantissa == 0 {
        return f64::from_bits(sign_bit);
    }

    // Normalize so the leading one sits at bit 63. Extended denormals
    // (exponent 0) share the exponent of the smallest normal.
    let leading = mantissa.leading_zeros() as i32;
    let normalized = mantissa << leading;
    let effective_exp = if exponent == 0 { 1 } else { exponent as i32 };
    let unbiased = effective_exp - EXTENDED_BIAS - leading;

    if unbiased > DOUBLE_BIAS {
        return f64::from_bits(sign_bit | 0x7FF0_0000_0000_0000);
    }

    if unbiased >= 1 - DOUBLE_BIAS {
        let kept = round_shift(normalized, 11);
        let (kept, unbiased) = if kept == 1 << 53 {
            (kept >> 1, unbiased + 1)
        } else {
            (kept, unbiased)
        };
        if unbiased > DOUBLE_BIAS {
            return f64::from_bits(sign_bit | 0x7FF0_0000_0000_0000);
        }
        let biased = (unbiased + DOUBLE_BIAS) as u64;
        return f64::from_bits(sign_bit | (biased << 52) | (kept & DOUBLE_FRACTION_MASK));
    }

    // Subnormal double: value = fraction * 2^-1074
    let shift = (63 - 1074 - unbiased) as u32;
    if shift > 64 {
        return f64::from_bits(sign_bit);
    }
    // A carry into bit 52 yields the smallest normal, which the bit layout
    // encodes correctly without special handling.
    let fraction = round_shift(normalized, shift);
    f64::from_bits(sign_bit | fraction)
}

/// Shift right by `shift` bits rounding to nearest, ties to even
fn round_shift(value: u64, shift: u32) -> u64 {
    if shift == 0 {
        return value;
    }
    let wide = value as u128;
    let kept = wide >> shift;
    let remainder = wide & ((1u128 << shift) - 1);
    let half = 1u128 << (shift - 1);
    let round_up = remainder > half || (remainder == half && kept & 1 == 1);
    (kept + round_up as u128) as u64
}

/// Encode an `f64` as a big-endian 80-bit extended float
///
/// Every finite double is represented exactly.
pub fn encode_extended(value: f64) -> [u8; EXTENDED_SIZE] {
    let bits = value.to_bits();
    let sign: u16 = if bits >> 63 == 1 { 0x8000 } else { 0 };
    let biased = ((bits >> 52) & 0x7FF) as i32;
    let fraction = bits & DOUBLE_FRACTION_MASK;

    let (exponent, mantissa): (u16, u64) = if biased == 0x7FF {
        if fraction == 0 {
            (EXTENDED_MAX_EXP, 1 << 63)
        } else {
            (EXTENDED_MAX_EXP, 0xC000_0000_0000_0000)
        }
    } else if biased == 0 {
        if fraction == 0 {
            (0, 0)
        } else {
            let leading = fraction.leading_zeros() as i32;
            let unbiased = -1011 - leading;
            ((unbiased + EXTENDED_BIAS) as u16, fraction << leading)
        }
    } else {
        let unbiased = biased - DOUBLE_BIAS;
        (
            (unbiased + EXTENDED_BIAS) as u16,
            (1 << 63) | (fraction << 11),
        )
    };

    let mut out = [0u8; EXTENDED_SIZE];
    out[..2].copy_from_slice(&(sign | exponent).to_be_bytes());
    out[2..].copy_from_slice(&mantissa.to_be_bytes());
    out
}

/// Convert a decoded sample rate to whole Hz
///
/// Truncates toward zero. NaN and negative rates become 0; rates beyond
/// `u32::MAX` saturate.
pub fn sample_rate_hz(rate: f64) -> u32 {
    // Float-to-int `as` casts saturate and map NaN to 0
    rate as u32
}
