//! Run-length encoded bit vector with delta-coded gaps.
//!
//! Set bits are stored as maximal 1-runs. Each run costs two delta codes:
//! the gap from the previous run's end and the run length. Codes are packed
//! into fixed-size blocks; the first set bit of every block is represented
//! by a sample pair `(rank_before, position)` instead of a code, and a
//! higher-level index over the samples (one entry per `INDEX_RATE` blocks
//! worth of values/items) starts rank and select descents near the right
//! block.
//!
//! The iterator keeps streaming state between calls, so `select_next` and
//! `next_value` continue from the previous position without re-descending.

use std::io::{Read, Write};

use crate::bitbuf::{delta_code_len, BitReader, BitWriter, PackedInts};
use crate::bits::bits_needed;
use crate::error::{Error, Result};
use crate::utils::{BinaryRead, BinaryWrite};

pub const INDEX_RATE: u64 = 5;
pub const DEFAULT_BLOCK_BYTES: usize = 32;

/// Streaming encoder. Runs must be fed with strictly increasing start
/// positions and never overlap.
pub struct RleEncoder {
    block_words: usize,
    w: BitWriter,
    samples: Vec<(u64, u64)>,
    /// Universe covered so far: one past the last set bit.
    size: u64,
    items: u64,
    blocks: u64,
    block_open: bool,
    block_end_word: usize,
}

impl RleEncoder {
    pub fn new(block_bytes: usize) -> Self {
        assert!(
            block_bytes >= 16 && block_bytes % 8 == 0,
            "block size must be a multiple of 8, at least 16 bytes"
        );
        RleEncoder {
            block_words: block_bytes / 8,
            w: BitWriter::new(),
            samples: Vec::new(),
            size: 0,
            items: 0,
            blocks: 0,
            block_open: false,
            block_end_word: 0,
        }
    }

    pub fn items(&self) -> u64 {
        self.items
    }

    /// One past the last set bit so far.
    pub fn covered(&self) -> u64 {
        self.size
    }

    pub fn set_bit(&mut self, value: u64) {
        self.set_run(value, 1);
    }

    /// Append a run of `len` set bits starting at `start`.
    pub fn set_run(&mut self, start: u64, len: u64) {
        assert!(len > 0, "empty run");
        assert!(
            self.items == 0 || start >= self.size,
            "runs must be strictly increasing"
        );
        if !self.block_open {
            self.open_block(start, len);
            return;
        }
        let diff = start + 1 - self.size;
        let needed = delta_code_len(diff) + delta_code_len(len);
        let left = self.block_end_word as u64 * 64 - self.w.bit_pos();
        if needed <= left {
            self.w.write_delta(diff);
            self.w.write_delta(len);
            self.size = start + len;
            self.items += len;
        } else {
            self.open_block(start, len);
        }
    }

    /// Start a new block whose first set bit is carried by the sample; the
    /// rest of the run (if any) becomes an adjacent (gap 1) code pair.
    fn open_block(&mut self, start: u64, len: u64) {
        self.w.grow(self.block_words);
        let start_word = self.w.word_len() - self.block_words;
        self.w.seek_to_word(start_word);
        self.block_end_word = start_word + self.block_words;
        self.blocks += 1;
        self.block_open = true;

        self.samples.push((self.items, start));
        self.size = start + 1;
        self.items += 1;
        if len > 1 {
            self.w.write_delta(1);
            self.w.write_delta(len - 1);
            self.size += len - 1;
            self.items += len - 1;
        }
    }
}

/// The finished, immutable vector.
pub struct RleVector {
    size: u64,
    items: u64,
    block_words: usize,
    n_blocks: usize,
    data: Vec<u64>,
    /// Sample pairs, `2 * (n_blocks + 1)` packed values; the final pair is
    /// the `(items, size)` terminator.
    samples: PackedInts,
    rank_rate: u64,
    rank_index: PackedInts,
    select_rate: u64,
    select_index: PackedInts,
}

impl RleVector {
    /// Freeze an encoder into a queryable vector over `universe_size` bits.
    pub fn new(enc: RleEncoder, universe_size: u64) -> Self {
        assert!(
            universe_size >= enc.size,
            "universe smaller than the encoded runs"
        );
        let n_blocks = enc.blocks as usize;
        let size = universe_size;
        let items = enc.items;

        let integer_bits = bits_needed(size.max(items)).max(1);
        let mut samples = PackedInts::new(integer_bits, 2 * (n_blocks + 1));
        for (b, &(first, value)) in enc.samples.iter().enumerate() {
            samples.set(2 * b, first);
            samples.set(2 * b + 1, value);
        }
        samples.set(2 * n_blocks, items);
        samples.set(2 * n_blocks + 1, size);

        let mut v = RleVector {
            size,
            items,
            block_words: enc.block_words,
            n_blocks,
            data: enc.w.into_words(),
            samples,
            rank_rate: 0,
            rank_index: PackedInts::new(1, 0),
            select_rate: 0,
            select_index: PackedInts::new(1, 0),
        };
        if n_blocks > 0 {
            v.index_for_rank();
            v.index_for_select();
        }
        v
    }

    pub fn len(&self) -> u64 {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    pub fn count_items(&self) -> u64 {
        self.items
    }

    pub fn iter(&self) -> RleIter<'_> {
        RleIter::new(self)
    }

    #[inline]
    fn sample(&self, b: usize) -> (u64, u64) {
        (self.samples.get(2 * b), self.samples.get(2 * b + 1))
    }

    fn index_width(&self) -> u32 {
        bits_needed(self.n_blocks as u64 - 1).max(1)
    }

    /// One pointer per `rank_rate` values: the last block whose first value
    /// is at or before the pointer's value.
    fn index_for_rank(&mut self) {
        let value_samples = (self.n_blocks as u64).div_ceil(INDEX_RATE);
        self.rank_rate = self.size.div_ceil(value_samples).max(1);
        let entries = (self.size / self.rank_rate) as usize + 1;
        let mut idx = PackedInts::new(self.index_width(), entries);
        let mut b = 0usize;
        for t in 0..entries {
            let target = t as u64 * self.rank_rate;
            while b + 1 < self.n_blocks && self.sample(b + 1).1 <= target {
                b += 1;
            }
            idx.set(t, b as u64);
        }
        self.rank_index = idx;
    }

    /// One pointer per `select_rate` items, symmetric to the rank index.
    fn index_for_select(&mut self) {
        let value_samples = (self.n_blocks as u64).div_ceil(INDEX_RATE);
        self.select_rate = self.items.div_ceil(value_samples).max(1);
        let entries = (self.items / self.select_rate) as usize + 1;
        let mut idx = PackedInts::new(self.index_width(), entries);
        let mut b = 0usize;
        for t in 0..entries {
            let target = t as u64 * self.select_rate;
            while b + 1 < self.n_blocks && self.sample(b + 1).0 <= target {
                b += 1;
            }
            idx.set(t, b as u64);
        }
        self.select_index = idx;
    }

    /// Block that may contain `value`; `value < size`.
    fn sample_for_value(&self, value: u64) -> usize {
        let mut b = self.rank_index.get((value / self.rank_rate) as usize) as usize;
        while b + 1 < self.n_blocks && self.sample(b + 1).1 <= value {
            b += 1;
        }
        b
    }

    /// Block containing the `index`-th set bit; `index < items`.
    fn sample_for_index(&self, index: u64) -> usize {
        let mut b = self.select_index.get((index / self.select_rate) as usize) as usize;
        while b + 1 < self.n_blocks && self.sample(b + 1).0 <= index {
            b += 1;
        }
        b
    }

    pub fn save<W: Write>(&self, w: &mut W) -> Result<()> {
        let op = "rlevector: write";
        let e = |e| Error::io(op, e);
        w.write_u64_le(self.size).map_err(e)?;
        w.write_u64_le(self.items).map_err(e)?;
        w.write_u64_le(self.block_words as u64).map_err(e)?;
        w.write_u64_le(self.n_blocks as u64).map_err(e)?;
        w.write_u32_le(self.samples.width()).map_err(e)?;
        w.write_u64_array_le(&self.data).map_err(e)?;
        w.write_u64_le(self.samples.words().len() as u64).map_err(e)?;
        w.write_u64_array_le(self.samples.words()).map_err(e)?;
        for (rate, idx) in [
            (self.rank_rate, &self.rank_index),
            (self.select_rate, &self.select_index),
        ] {
            w.write_u64_le(rate).map_err(e)?;
            w.write_u32_le(idx.width()).map_err(e)?;
            w.write_u64_le(idx.len() as u64).map_err(e)?;
            w.write_u64_le(idx.words().len() as u64).map_err(e)?;
            w.write_u64_array_le(idx.words()).map_err(e)?;
        }
        Ok(())
    }

    pub fn load<R: Read>(r: &mut R) -> Result<Self> {
        let op = "rlevector: read";
        let e = |e| Error::io(op, e);
        let size = r.read_u64_le().map_err(e)?;
        let items = r.read_u64_le().map_err(e)?;
        let block_words = r.read_u64_le().map_err(e)? as usize;
        let n_blocks = r.read_u64_le().map_err(e)? as usize;
        let integer_bits = r.read_u32_le().map_err(e)?;
        let data = r.read_u64_vec_le(n_blocks * block_words).map_err(e)?;
        let sample_words = r.read_u64_le().map_err(e)? as usize;
        let samples = PackedInts::from_parts(
            integer_bits,
            2 * (n_blocks + 1),
            r.read_u64_vec_le(sample_words).map_err(e)?,
        );
        let mut rates = [0u64; 2];
        let mut indexes = Vec::with_capacity(2);
        for rate in rates.iter_mut() {
            *rate = r.read_u64_le().map_err(e)?;
            let width = r.read_u32_le().map_err(e)?;
            let len = r.read_u64_le().map_err(e)? as usize;
            let words = r.read_u64_le().map_err(e)? as usize;
            indexes.push(PackedInts::from_parts(
                width,
                len,
                r.read_u64_vec_le(words).map_err(e)?,
            ));
        }
        let select_index = indexes.pop().unwrap_or_else(|| PackedInts::new(1, 0));
        let rank_index = indexes.pop().unwrap_or_else(|| PackedInts::new(1, 0));
        Ok(RleVector {
            size,
            items,
            block_words,
            n_blocks,
            data,
            samples,
            rank_rate: rates[0],
            rank_index,
            select_rate: rates[1],
            select_index,
        })
    }
}

/// Streaming iterator over an [`RleVector`].
pub struct RleIter<'a> {
    parent: &'a RleVector,
    r: BitReader<'a>,
    block: usize,
    /// rank-1 of the block's first set bit.
    sample_first: u64,
    /// Items consumed within the block beyond the sample bit.
    cur: u64,
    /// Current value (a set bit position once positioned).
    val: u64,
    /// Set bits remaining in the currently decoded run past `val`.
    run: u64,
    /// Items in the block beyond the sample bit.
    block_items: u64,
    fresh: bool,
}

impl<'a> RleIter<'a> {
    pub fn new(parent: &'a RleVector) -> Self {
        RleIter {
            parent,
            r: BitReader::new(&parent.data),
            block: 0,
            sample_first: 0,
            cur: 0,
            val: 0,
            run: 0,
            block_items: 0,
            fresh: true,
        }
    }

    fn get_sample(&mut self, b: usize) {
        let (first, value) = self.parent.sample(b);
        let (next_first, _) = self.parent.sample(b + 1);
        self.block = b;
        self.sample_first = first;
        self.cur = 0;
        self.val = value;
        self.run = 0;
        self.block_items = next_first - first - 1;
        self.r.seek_to_word(b * self.parent.block_words);
        self.fresh = false;
    }

    /// Advance within the current block until `val >= value` or the block is
    /// exhausted. Whole runs are skipped without touching every position;
    /// when the target lands inside a run, `val` is clamped onto it and
    /// `run` keeps the remainder.
    fn value_loop(&mut self, value: u64) {
        let b = self.parent.sample_for_value(value);
        self.get_sample(b);
        if self.val >= value {
            return;
        }
        while self.cur < self.block_items {
            self.val += self.r.read_delta();
            self.cur += 1;
            self.run = self.r.read_delta() - 1;
            if self.val >= value {
                break;
            }
            self.cur += self.run;
            self.val += self.run;
            if self.val >= value {
                self.run = self.val - value;
                self.val = value;
                self.cur -= self.run;
                break;
            }
            self.run = 0;
        }
    }

    /// `rank(value)`: set bits in `[0, value]`. In `at_least` mode this is
    /// `1 + rank(value - 1)`, i.e. the 1-based index of the first set bit at
    /// or after `value`. Invalidates streaming state.
    pub fn rank(&mut self, value: u64, at_least: bool) -> u64 {
        let items = self.parent.items;
        if value >= self.parent.size || items == 0 {
            let below = if value >= self.parent.size { items } else { 0 };
            return if at_least { below + 1 } else { below };
        }
        self.value_loop(value);
        let r = self.sample_first + self.cur;
        if self.val == value {
            r + 1
        } else if self.val > value {
            if at_least {
                r + 1
            } else {
                r
            }
        } else {
            // Block exhausted below the target: every item in it counts.
            if at_least {
                r + 2
            } else {
                r + 1
            }
        }
    }

    /// Position of the `index`-th set bit (0-based); `size` when out of
    /// range. Positions the streaming state on the returned bit.
    pub fn select(&mut self, index: u64) -> u64 {
        if index >= self.parent.items {
            return self.parent.size;
        }
        let b = self.parent.sample_for_index(index);
        self.get_sample(b);
        let lim = index - self.sample_first;
        while self.cur < lim {
            self.val += self.r.read_delta();
            self.cur += 1;
            self.run = self.r.read_delta() - 1;
            if self.cur + self.run < lim {
                self.cur += self.run;
                self.val += self.run;
                self.run = 0;
            } else {
                let need = lim - self.cur;
                self.cur += need;
                self.val += need;
                self.run -= need;
                break;
            }
        }
        self.val
    }

    /// Position of the next set bit after the current one; `size` when
    /// exhausted.
    pub fn select_next(&mut self) -> u64 {
        if self.fresh {
            return self.select(0);
        }
        if self.run > 0 {
            self.run -= 1;
            self.cur += 1;
            self.val += 1;
            return self.val;
        }
        if self.cur >= self.block_items {
            if self.block + 1 >= self.parent.n_blocks {
                return self.parent.size;
            }
            self.get_sample(self.block + 1);
            return self.val;
        }
        self.val += self.r.read_delta();
        self.cur += 1;
        self.run = self.r.read_delta() - 1;
        self.val
    }

    /// First set bit at or after `value` together with its 0-based rank;
    /// `(size, items)` when none exists.
    pub fn value_after(&mut self, value: u64) -> (u64, u64) {
        if value >= self.parent.size || self.parent.items == 0 {
            return (self.parent.size, self.parent.items);
        }
        self.value_loop(value);
        if self.val < value {
            if self.block + 1 >= self.parent.n_blocks {
                return (self.parent.size, self.parent.items);
            }
            self.get_sample(self.block + 1);
        }
        (self.val, self.sample_first + self.cur)
    }

    /// Next set bit after the current one with its 0-based rank.
    pub fn next_value(&mut self) -> (u64, u64) {
        let v = self.select_next();
        if v >= self.parent.size {
            return (self.parent.size, self.parent.items);
        }
        (v, self.sample_first + self.cur)
    }

    /// `select(index)` plus up to `max_length` additional set bits known to
    /// follow it consecutively. The reported extra count can be short of the
    /// true run even below `max_length`; callers must re-query.
    pub fn select_run(&mut self, index: u64, max_length: u64) -> (u64, u64) {
        let value = self.select(index);
        if value >= self.parent.size {
            return (self.parent.size, 0);
        }
        let len = self.run.min(max_length);
        self.run -= len;
        self.cur += len;
        self.val += len;
        (value, len)
    }

    /// Like [`select_run`] but continuing from the current position.
    ///
    /// [`select_run`]: RleIter::select_run
    pub fn select_next_run(&mut self, max_length: u64) -> (u64, u64) {
        let value = self.select_next();
        if value >= self.parent.size {
            return (self.parent.size, 0);
        }
        let len = self.run.min(max_length);
        self.run -= len;
        self.cur += len;
        self.val += len;
        (value, len)
    }

    /// Single-bit probe. Invalidates streaming state.
    pub fn is_set(&mut self, value: u64) -> bool {
        if value >= self.parent.size || self.parent.items == 0 {
            return false;
        }
        self.value_loop(value);
        self.val == value
    }

    /// Number of maximal 1-runs in the whole vector.
    pub fn count_runs(&mut self) -> u64 {
        if self.parent.items == 0 {
            return 0;
        }
        let mut runs = 0u64;
        let mut have_prev = false;
        let mut prev_end = 0u64;
        for b in 0..self.parent.n_blocks {
            self.get_sample(b);
            if !have_prev || self.val != prev_end + 1 {
                runs += 1;
            }
            have_prev = true;
            let mut end = self.val;
            let mut consumed = 0u64;
            while consumed < self.block_items {
                let d = self.r.read_delta();
                let l = self.r.read_delta();
                if d > 1 {
                    runs += 1;
                }
                end = end + d + l - 1;
                consumed += l;
            }
            prev_end = end;
        }
        runs
    }
}
