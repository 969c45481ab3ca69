//! Plain bit vector with constant-time rank and logarithmic select.
//!
//! Rank is answered from a two-level directory: `rs` holds the cumulative
//! popcount at every superblock boundary (256 bits), `rb` the popcount since
//! the enclosing superblock at every word boundary. With four words per
//! superblock the `rb` counters top out at 192 and fit in a byte.
//!
//! The vector is build-once: construct it, then only query it.

use std::borrow::Cow;
use std::io::{self, Read, Write};

use crate::bits::{popcount, popcount8};
use crate::error::{Error, Result};
use crate::utils::{BinaryRead, BinaryWrite};

const WORD_BITS: u64 = 64;
const SUPER_FACTOR: u64 = 4;
const SUPER_BITS: u64 = WORD_BITS * SUPER_FACTOR; // 256

#[cfg(test)]
#[path = "bitrank_test.rs"]
mod bitrank_test;

pub struct BitRank<'a> {
    data: Cow<'a, [u64]>,
    /// Length of the bit sequence.
    n: u64,
    /// Cumulative popcount at each superblock boundary; `n/256 + 1` entries.
    rs: Vec<u64>,
    /// Popcount from the enclosing superblock start to each word boundary;
    /// `n/64 + 1` entries.
    rb: Vec<u8>,
}

impl BitRank<'static> {
    /// Build from an owned word array; bit `i` lives at `words[i/64]`,
    /// position `i%64` (LSB first). Bits at positions `>= n` must be zero.
    pub fn from_words(words: Vec<u64>, n: u64) -> Self {
        Self::build(Cow::Owned(words), n)
    }

    /// Read a vector previously written with [`BitRank::save`].
    pub fn load<R: Read>(r: &mut R) -> Result<Self> {
        let op = "bitrank: read header";
        let n = r.read_u64_le().map_err(|e| Error::io(op, e))?;
        let word_count = r.read_u64_le().map_err(|e| Error::io(op, e))?;
        let block_bits = r.read_u32_le().map_err(|e| Error::io(op, e))?;
        let super_bits = r.read_u32_le().map_err(|e| Error::io(op, e))?;
        if block_bits as u64 != WORD_BITS || super_bits as u64 != SUPER_BITS {
            return Err(Error::io(
                op,
                io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("unsupported block layout {block_bits}/{super_bits}"),
                ),
            ));
        }
        let data = r
            .read_u64_vec_le(word_count as usize)
            .map_err(|e| Error::io("bitrank: read words", e))?;
        let rs = r
            .read_u64_vec_le((n / SUPER_BITS + 1) as usize)
            .map_err(|e| Error::io("bitrank: read superblock directory", e))?;
        let mut rb = vec![0u8; (n / WORD_BITS + 1) as usize];
        r.read_exact(&mut rb)
            .map_err(|e| Error::io("bitrank: read block directory", e))?;
        Ok(BitRank {
            data: Cow::Owned(data),
            n,
            rs,
            rb,
        })
    }
}

impl<'a> BitRank<'a> {
    /// Build from a borrowed word array; the caller keeps ownership and the
    /// vector borrows for its lifetime.
    pub fn from_slice(words: &'a [u64], n: u64) -> Self {
        Self::build(Cow::Borrowed(words), n)
    }

    fn build(data: Cow<'a, [u64]>, n: u64) -> Self {
        debug_assert!(data.len() as u64 * WORD_BITS >= n);
        let num_sblock = (n / SUPER_BITS) as usize;
        let num_block = (n / WORD_BITS) as usize;
        let words = &data[..];

        let sub = |start: usize, count: usize| -> u64 {
            let mut rank = 0u64;
            for i in start..start + count {
                if i < words.len() {
                    rank += popcount(words[i]) as u64;
                }
            }
            rank
        };

        let mut rs = vec![0u64; num_sblock + 1];
        for j in 1..=num_sblock {
            rs[j] = rs[j - 1] + sub((j - 1) * SUPER_FACTOR as usize, SUPER_FACTOR as usize);
        }
        let mut rb = vec![0u8; num_block + 1];
        for k in 1..=num_block {
            let j = k / SUPER_FACTOR as usize;
            rb[k] = sub(j * SUPER_FACTOR as usize, k % SUPER_FACTOR as usize) as u8;
        }

        BitRank { data, n, rs, rb }
    }

    pub fn len(&self) -> u64 {
        self.n
    }

    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    pub fn count_ones(&self) -> u64 {
        if self.n == 0 {
            0
        } else {
            self.rank1(self.n - 1)
        }
    }

    /// Number of set bits in positions `[0, i]`. `i` must be `< len()`.
    #[inline]
    pub fn rank1(&self, i: u64) -> u64 {
        debug_assert!(i < self.n);
        let p = i + 1;
        let mut r = self.rs[(p / SUPER_BITS) as usize] + self.rb[(p / WORD_BITS) as usize] as u64;
        let rem = p % WORD_BITS;
        if rem != 0 {
            r += popcount(self.data[(p / WORD_BITS) as usize] & ((1u64 << rem) - 1)) as u64;
        }
        r
    }

    /// Number of clear bits in positions `[0, i]`.
    #[inline]
    pub fn rank0(&self, i: u64) -> u64 {
        i + 1 - self.rank1(i)
    }

    /// Position of the x-th set bit (1-indexed); `select1(0) == 0` and the
    /// result is `len()` when fewer than `x` bits are set.
    pub fn select1(&self, x: u64) -> u64 {
        if x == 0 {
            return 0;
        }
        if x > self.count_ones() {
            return self.n;
        }
        // Largest superblock whose cumulative count is still below x.
        let mut l = 0usize;
        let mut r = self.rs.len() - 1;
        while l < r {
            let mid = (l + r + 1) / 2;
            if self.rs[mid] < x {
                l = mid;
            } else {
                r = mid - 1;
            }
        }
        let mut x = x - self.rs[l];
        // Word scan.
        let mut left = l * SUPER_FACTOR as usize;
        let mut w = self.data[left];
        let mut ones = popcount(w) as u64;
        while ones < x {
            x -= ones;
            left += 1;
            w = self.data[left];
            ones = popcount(w) as u64;
        }
        // Byte windows, then bits.
        let mut pos = left as u64 * WORD_BITS;
        let mut pc = popcount8(w) as u64;
        while pc < x {
            x -= pc;
            w >>= 8;
            pos += 8;
            pc = popcount8(w) as u64;
        }
        while x > 0 {
            if w & 1 == 1 {
                x -= 1;
            }
            w >>= 1;
            pos += 1;
        }
        pos - 1
    }

    /// Position of the x-th clear bit (1-indexed); mirrors [`select1`].
    ///
    /// [`select1`]: BitRank::select1
    pub fn select0(&self, x: u64) -> u64 {
        if x == 0 {
            return 0;
        }
        if x > self.n - self.count_ones() {
            return self.n;
        }
        let mut l = 0usize;
        let mut r = self.rs.len() - 1;
        while l < r {
            let mid = (l + r + 1) / 2;
            if mid as u64 * SUPER_BITS - self.rs[mid] < x {
                l = mid;
            } else {
                r = mid - 1;
            }
        }
        let mut x = x - (l as u64 * SUPER_BITS - self.rs[l]);
        let mut left = l * SUPER_FACTOR as usize;
        let mut w = self.data[left];
        let mut zeros = WORD_BITS - popcount(w) as u64;
        while zeros < x {
            x -= zeros;
            left += 1;
            w = self.data[left];
            zeros = WORD_BITS - popcount(w) as u64;
        }
        let mut pos = left as u64 * WORD_BITS;
        let mut zc = 8 - popcount8(w) as u64;
        while zc < x {
            x -= zc;
            w >>= 8;
            pos += 8;
            zc = 8 - popcount8(w) as u64;
        }
        while x > 0 {
            if w & 1 == 0 {
                x -= 1;
            }
            w >>= 1;
            pos += 1;
        }
        pos - 1
    }

    /// The i-th bit.
    #[inline]
    pub fn bit(&self, i: u64) -> bool {
        debug_assert!(i < self.n);
        self.data[(i / WORD_BITS) as usize] >> (i % WORD_BITS) & 1 == 1
    }

    /// Serialize: length, word count, block/superblock widths, words, both
    /// directories. Everything little-endian and fixed width.
    pub fn save<W: Write>(&self, w: &mut W) -> Result<()> {
        let op = "bitrank: write";
        w.write_u64_le(self.n).map_err(|e| Error::io(op, e))?;
        w.write_u64_le(self.data.len() as u64)
            .map_err(|e| Error::io(op, e))?;
        w.write_u32_le(WORD_BITS as u32)
            .map_err(|e| Error::io(op, e))?;
        w.write_u32_le(SUPER_BITS as u32)
            .map_err(|e| Error::io(op, e))?;
        w.write_u64_array_le(&self.data)
            .map_err(|e| Error::io(op, e))?;
        w.write_u64_array_le(&self.rs)
            .map_err(|e| Error::io(op, e))?;
        w.write_all(&self.rb).map_err(|e| Error::io(op, e))?;
        Ok(())
    }
}
