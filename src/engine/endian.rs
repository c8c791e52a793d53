//! Byte-order utilities
//!
//! The host byte order is irrelevant here: every swap is an explicit reversal
//! of the value's byte representation, never a reinterpretation through a
//! union or pointer cast.

/// Reverse a fixed-size byte array in place
#[inline]
pub fn swap_bytes<const N: usize>(bytes: &mut [u8; N]) {
    bytes.reverse();
}

/// Values whose byte order can be reversed
pub trait ByteSwap: Sized {
    /// Return the value with its byte order reversed
    fn byte_swapped(self) -> Self;
}

macro_rules! impl_byte_swap {
    ($($t:ty),*) => {
        $(
            impl ByteSwap for $t {
                #[inline]
                fn byte_swapped(self) -> Self {
                    let mut bytes = self.to_ne_bytes();
                    swap_bytes(&mut bytes);
                    <$t>::from_ne_bytes(bytes)
                }
            }
        )*
    };
}

impl_byte_swap!(u16, i16, u32, i32, u64, i64, f32, f64);

impl ByteSwap for u8 {
    #[inline]
    fn byte_swapped(self) -> Self {
        self
    }
}

impl<const N: usize> ByteSwap for [u8; N] {
    #[inline]
    fn byte_swapped(mut self) -> Self {
        swap_bytes(&mut self);
        self
    }
}

/// Swap every element of a slice in place
pub fn swap_slice<T: ByteSwap + Copy>(values: &mut [T]) {
    for v in values.iter_mut() {
        *v = v.byte_swapped();
    }
}

/// Reverse the byte order of each `width`-byte sample in a PCM byte slice
///
/// Widths of 0 or 1 leave the data unchanged. A trailing partial sample is
/// left as-is.
pub fn swap_samples_in_place(data: &mut [u8], width: usize) {
    if width <= 1 {
        return;
    }
    for sample in data.chunks_exact_mut(width) {
        sample.reverse();
    }
}
