//! Bit-counting primitives shared by the bit-vector types.
//!
//! Population count goes through an 8-bit lookup table so the code stays
//! portable to targets without a hardware popcount instruction.

#[rustfmt::skip]
pub const POPCOUNT_TAB: [u8; 256] = [
    0,1,1,2,1,2,2,3,1,2,2,3,2,3,3,4,1,2,2,3,2,3,3,4,2,3,3,4,3,4,4,5,
    1,2,2,3,2,3,3,4,2,3,3,4,3,4,4,5,2,3,3,4,3,4,4,5,3,4,4,5,4,5,5,6,
    1,2,2,3,2,3,3,4,2,3,3,4,3,4,4,5,2,3,3,4,3,4,4,5,3,4,4,5,4,5,5,6,
    2,3,3,4,3,4,4,5,3,4,4,5,4,5,5,6,3,4,4,5,4,5,5,6,4,5,5,6,5,6,6,7,
    1,2,2,3,2,3,3,4,2,3,3,4,3,4,4,5,2,3,3,4,3,4,4,5,3,4,4,5,4,5,5,6,
    2,3,3,4,3,4,4,5,3,4,4,5,4,5,5,6,3,4,4,5,4,5,5,6,4,5,5,6,5,6,6,7,
    2,3,3,4,3,4,4,5,3,4,4,5,4,5,5,6,3,4,4,5,4,5,5,6,4,5,5,6,5,6,6,7,
    3,4,4,5,4,5,5,6,4,5,5,6,5,6,6,7,4,5,5,6,5,6,6,7,5,6,6,7,6,7,7,8,
];

/// Number of set bits in a 64-bit word.
#[inline]
pub fn popcount(x: u64) -> u32 {
    (POPCOUNT_TAB[(x & 0xff) as usize]
        + POPCOUNT_TAB[(x >> 8 & 0xff) as usize]
        + POPCOUNT_TAB[(x >> 16 & 0xff) as usize]
        + POPCOUNT_TAB[(x >> 24 & 0xff) as usize]
        + POPCOUNT_TAB[(x >> 32 & 0xff) as usize]
        + POPCOUNT_TAB[(x >> 40 & 0xff) as usize]
        + POPCOUNT_TAB[(x >> 48 & 0xff) as usize]
        + POPCOUNT_TAB[(x >> 56 & 0xff) as usize]) as u32
}

/// Number of set bits in the low byte of `x`.
#[inline]
pub fn popcount8(x: u64) -> u32 {
    POPCOUNT_TAB[(x & 0xff) as usize] as u32
}

/// Bits needed to represent a number between 0 and n, i.e. ceil(log2(n+1)).
/// `bits_needed(0) == 0`.
#[inline]
pub fn bits_needed(n: u64) -> u32 {
    64 - n.leading_zeros()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_popcount_matches_native() {
        let samples = [
            0u64,
            1,
            0xff,
            0xdead_beef_dead_beef,
            u64::MAX,
            0x8000_0000_0000_0000,
            0x0123_4567_89ab_cdef,
        ];
        for &w in &samples {
            assert_eq!(popcount(w), w.count_ones(), "word {w:#x}");
        }
    }

    #[test]
    fn test_popcount8() {
        assert_eq!(popcount8(0), 0);
        assert_eq!(popcount8(0xff), 8);
        assert_eq!(popcount8(0x1_01), 1); // only the low byte counts
    }

    #[test]
    fn test_bits_needed() {
        assert_eq!(bits_needed(0), 0);
        assert_eq!(bits_needed(1), 1);
        assert_eq!(bits_needed(2), 2);
        assert_eq!(bits_needed(3), 2);
        assert_eq!(bits_needed(255), 8);
        assert_eq!(bits_needed(256), 9);
    }
}
