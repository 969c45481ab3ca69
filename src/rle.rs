//! Run-length symbol stream for the partial BWTs.
//!
//! One byte per cell, `count << 3 | symbol`, counts in `1..=31` (longer runs
//! are split across cells). The byte value 7 (count 0, symbol 7) terminates
//! the stream; a terminator slot is always available because a fresh block is
//! allocated the moment the current one fills. Blocks are 1 MiB so growth is
//! rare and per-block cursors stay cheap.

pub const BLOCK_SIZE: usize = 1 << 20;
pub const TERMINATOR: u8 = 7;

/// Symbols are `0..6`: `$`, A, C, G, T, N.
pub const SYM_COUNT: usize = 6;

const MAX_CELL_COUNT: u64 = 31;
const SYM_NONE: u8 = 0xff;

/// A finished, immutable stream.
pub struct RunStream {
    blocks: Vec<Vec<u8>>,
    len: u64,
    mc: [u64; SYM_COUNT],
}

impl Default for RunStream {
    fn default() -> Self {
        let mut block = vec![0u8; BLOCK_SIZE];
        block[0] = TERMINATOR;
        RunStream {
            blocks: vec![block],
            len: 0,
            mc: [0; SYM_COUNT],
        }
    }
}

impl RunStream {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of symbols.
    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Marginal counts: occurrences per symbol across the whole stream.
    pub fn marginal_counts(&self) -> &[u64; SYM_COUNT] {
        &self.mc
    }

    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// Raw bytes of block `i`; the last block runs up to its terminator.
    pub fn block(&self, i: usize) -> &[u8] {
        &self.blocks[i]
    }

    /// Cells in order.
    pub fn iter(&self) -> RunIter<'_> {
        RunIter {
            stream: self,
            block: 0,
            pos: 0,
        }
    }

    /// Turn into a consuming reader that frees each block once drained.
    pub fn into_drain(self) -> RunDrain {
        let len = self.len;
        RunDrain {
            blocks: self.blocks.into_iter().map(Some).collect(),
            block: 0,
            pos: 0,
            pending_len: 0,
            pending_sym: SYM_NONE,
            remaining: len,
        }
    }
}

/// Borrowing cell iterator.
pub struct RunIter<'a> {
    stream: &'a RunStream,
    block: usize,
    pos: usize,
}

impl Iterator for RunIter<'_> {
    /// `(count, symbol)`
    type Item = (u64, u8);

    fn next(&mut self) -> Option<(u64, u8)> {
        let byte = self.stream.blocks[self.block][self.pos];
        if byte == TERMINATOR {
            return None;
        }
        self.pos += 1;
        if self.pos == BLOCK_SIZE {
            self.block += 1;
            self.pos = 0;
        }
        Some(((byte >> 3) as u64, byte & 7))
    }
}

/// Streaming writer. Runs are merged while open and flushed in `<= 31`
/// chunks; `finalize` writes the terminator and freezes the stream.
pub struct RunEncoder {
    blocks: Vec<Vec<u8>>,
    pos: usize,
    mc: [u64; SYM_COUNT],
    pending_len: u64,
    pending_sym: u8,
}

impl RunEncoder {
    pub fn new() -> Self {
        RunEncoder {
            blocks: vec![vec![0u8; BLOCK_SIZE]],
            pos: 0,
            mc: [0; SYM_COUNT],
            pending_len: 0,
            pending_sym: SYM_NONE,
        }
    }

    /// Occurrences of `sym` so far, the open run included.
    #[inline]
    pub fn occ(&self, sym: u8) -> u64 {
        self.mc[sym as usize]
            + if self.pending_sym == sym {
                self.pending_len
            } else {
                0
            }
    }

    #[inline]
    fn push_cell(&mut self, count: u64, sym: u8) {
        debug_assert!((1..=MAX_CELL_COUNT).contains(&count));
        let last = self.blocks.len() - 1;
        self.blocks[last][self.pos] = (count << 3) as u8 | sym;
        self.mc[sym as usize] += count;
        self.pos += 1;
        if self.pos == BLOCK_SIZE {
            self.blocks.push(vec![0u8; BLOCK_SIZE]);
            self.pos = 0;
        }
    }

    fn flush_pending(&mut self) {
        let sym = self.pending_sym;
        while self.pending_len > MAX_CELL_COUNT {
            self.push_cell(MAX_CELL_COUNT, sym);
            self.pending_len -= MAX_CELL_COUNT;
        }
        if self.pending_len > 0 {
            let count = self.pending_len;
            self.push_cell(count, sym);
            self.pending_len = 0;
        }
    }

    /// Append `count` copies of `sym`, extending the open run when possible.
    pub fn enc(&mut self, count: u64, sym: u8) {
        if self.pending_sym == sym {
            self.pending_len += count;
        } else {
            self.flush_pending();
            self.pending_sym = sym;
            self.pending_len = count;
        }
    }

    /// Transfer the next `count` symbols from `src`, preserving run
    /// boundaries where possible. The partially consumed source run is kept
    /// pending in `src` for the next call.
    pub fn copy(&mut self, src: &mut RunDrain, mut count: u64) {
        debug_assert!(count <= src.remaining);
        src.remaining -= count;
        if src.pending_len >= count {
            self.enc(count, src.pending_sym);
            src.pending_len -= count;
            return;
        }
        if src.pending_len > 0 {
            self.enc(src.pending_len, src.pending_sym);
            count -= src.pending_len;
            src.pending_len = 0;
        }
        while count > 0 {
            let Some((len, sym)) = src.dec() else { break };
            if len >= count {
                self.enc(count, sym);
                src.pending_len = len - count;
                src.pending_sym = sym;
                return;
            }
            self.enc(len, sym);
            count -= len;
        }
    }

    /// Flush the open run, write the terminator, freeze.
    pub fn finalize(mut self) -> RunStream {
        self.flush_pending();
        let pos = self.pos;
        if let Some(block) = self.blocks.last_mut() {
            block[pos] = TERMINATOR;
        }
        let len = self.mc.iter().sum();
        RunStream {
            blocks: self.blocks,
            len,
            mc: self.mc,
        }
    }
}

impl Default for RunEncoder {
    fn default() -> Self {
        Self::new()
    }
}

/// Consuming reader used while re-encoding a stream: each source block is
/// dropped as soon as it has been fully read, so peak memory holds at most
/// one extra block per bucket.
pub struct RunDrain {
    blocks: Vec<Option<Vec<u8>>>,
    block: usize,
    pos: usize,
    pending_len: u64,
    pending_sym: u8,
    remaining: u64,
}

impl RunDrain {
    /// Symbols not yet copied out (the pending run included).
    pub fn remaining(&self) -> u64 {
        self.remaining
    }

    fn dec(&mut self) -> Option<(u64, u8)> {
        let byte = match &self.blocks[self.block] {
            Some(b) => b[self.pos],
            None => return None,
        };
        if byte == TERMINATOR {
            return None;
        }
        self.pos += 1;
        if self.pos == BLOCK_SIZE {
            self.blocks[self.block] = None;
            self.block += 1;
            self.pos = 0;
        }
        Some(((byte >> 3) as u64, byte & 7))
    }
}
