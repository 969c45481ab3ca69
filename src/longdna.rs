//! Transposed packed DNA storage.
//!
//! One `LongDna` holds a single column of the transposed input: cell `k` is
//! the base of sequence `k` at that column. Columns are chunked to `1 << 20`
//! cells and chunks are allocated on first write, so short tails of a mostly
//! short read set cost nothing.
//!
//! Cells are 3 bits wide (21 per word) to make room for code 4 (= N); the
//! stored value is `symbol - 1`, i.e. `0..=4` for A, C, G, T, N. Cells are
//! write-once: `set` ORs into the word and never clears.

use std::io::{Read, Write};

use crate::error::{Error, Result};
use crate::utils::{BinaryRead, BinaryWrite};

pub const LD_SHIFT: u32 = 20;
const LD_MASK: u64 = (1 << LD_SHIFT) - 1;
const CELLS_PER_WORD: u64 = 21;
const CHUNK_WORDS: usize = ((1usize << LD_SHIFT) + CELLS_PER_WORD as usize - 1)
    / CELLS_PER_WORD as usize;

#[derive(Default)]
pub struct LongDna {
    chunks: Vec<Option<Vec<u64>>>,
}

impl LongDna {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `c` (already `symbol - 1`) at cell `x`.
    pub fn set(&mut self, x: u64, c: u8) {
        let k = (x >> LD_SHIFT) as usize;
        if k >= self.chunks.len() {
            self.chunks.resize_with(k + 1, || None);
        }
        let chunk = self.chunks[k].get_or_insert_with(|| vec![0u64; CHUNK_WORDS]);
        let l = x & LD_MASK;
        let word = (l / CELLS_PER_WORD) as usize;
        let shift = (l % CELLS_PER_WORD) * 3;
        chunk[word] |= ((c & 7) as u64) << shift;
    }

    pub fn get(&self, x: u64) -> u8 {
        let k = (x >> LD_SHIFT) as usize;
        match self.chunks.get(k).and_then(|c| c.as_ref()) {
            Some(chunk) => {
                let l = x & LD_MASK;
                let word = (l / CELLS_PER_WORD) as usize;
                let shift = (l % CELLS_PER_WORD) * 3;
                (chunk[word] >> shift & 7) as u8
            }
            None => 0,
        }
    }

    /// Spill the column: chunk count, then per chunk its word count (0 for
    /// an absent chunk) and the raw words.
    pub fn dump<W: Write>(&self, w: &mut W) -> Result<()> {
        let op = "column dump: write";
        w.write_i32_le(self.chunks.len() as i32)
            .map_err(|e| Error::io(op, e))?;
        for chunk in &self.chunks {
            match chunk {
                Some(words) => {
                    w.write_i32_le(words.len() as i32)
                        .map_err(|e| Error::io(op, e))?;
                    w.write_u64_array_le(words).map_err(|e| Error::io(op, e))?;
                }
                None => w.write_i32_le(0).map_err(|e| Error::io(op, e))?,
            }
        }
        Ok(())
    }

    /// Read back a column written by [`dump`].
    ///
    /// [`dump`]: LongDna::dump
    pub fn restore<R: Read>(r: &mut R) -> Result<Self> {
        let op = "column dump: read";
        let n_chunks = r.read_i32_le().map_err(|e| Error::io(op, e))?;
        let mut chunks = Vec::with_capacity(n_chunks.max(0) as usize);
        for _ in 0..n_chunks {
            let words = r.read_i32_le().map_err(|e| Error::io(op, e))?;
            if words == 0 {
                chunks.push(None);
            } else {
                chunks.push(Some(
                    r.read_u64_vec_le(words as usize)
                        .map_err(|e| Error::io(op, e))?,
                ));
            }
        }
        Ok(LongDna { chunks })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::prelude::*;

    #[test]
    fn test_set_get() {
        let mut ld = LongDna::new();
        ld.set(0, 3);
        ld.set(20, 4); // last cell of the first word
        ld.set(21, 1); // first cell of the second word
        assert_eq!(ld.get(0), 3);
        assert_eq!(ld.get(20), 4);
        assert_eq!(ld.get(21), 1);
        assert_eq!(ld.get(5), 0); // untouched cell in an allocated chunk
    }

    #[test]
    fn test_sparse_chunks() {
        let mut ld = LongDna::new();
        let far = 5u64 << LD_SHIFT;
        ld.set(far + 7, 2);
        assert_eq!(ld.get(far + 7), 2);
        assert_eq!(ld.get(3), 0); // chunk never allocated
        assert_eq!(ld.chunks.len(), 6);
        assert!(ld.chunks[0].is_none());
        assert!(ld.chunks[5].is_some());
    }

    #[test]
    fn test_random_write_once() {
        let mut rng = StdRng::seed_from_u64(31);
        let mut ld = LongDna::new();
        let mut expect = std::collections::HashMap::new();
        for _ in 0..5000 {
            let x = rng.gen_range(0..3u64 << LD_SHIFT);
            if expect.contains_key(&x) {
                continue; // cells are write-once
            }
            let c = rng.gen_range(0..5u8);
            ld.set(x, c);
            expect.insert(x, c);
        }
        for (&x, &c) in &expect {
            assert_eq!(ld.get(x), c, "cell {x}");
        }
    }

    #[test]
    fn test_dump_restore() {
        let mut rng = StdRng::seed_from_u64(32);
        let mut ld = LongDna::new();
        for _ in 0..2000 {
            let x = rng.gen_range(0..2u64 << LD_SHIFT);
            ld.set(x, rng.gen_range(0..5u8));
        }
        let mut buf: Vec<u8> = Vec::new();
        ld.dump(&mut buf).unwrap();
        let ld2 = LongDna::restore(&mut buf.as_slice()).unwrap();
        for x in (0..2u64 << LD_SHIFT).step_by(999) {
            assert_eq!(ld.get(x), ld2.get(x));
        }
    }
}
