//! Incremental multi-string BWT construction (Bauer-Cox-Rosone).
//!
//! Strings are ingested column-transposed; a virtual sentinel (symbol 0) is
//! appended to each. The builder then runs one cycle per column, inserting
//! the column's characters into six per-symbol run-length partial BWTs. Per
//! cycle, `set_bwt` turns the carried positions into absolute insertion
//! positions in the new concatenated BWT and partitions the live strings
//! into the six buckets; `next_bwt` then rewrites each bucket's stream with
//! the fresh symbols merged in. Buckets touch disjoint state, so the six
//! `next_bwt` calls of a cycle can run on a worker pool; every write of
//! cycle `p` is visible to cycle `p+1` through the pool's join barrier.
//!
//! The concatenation of the six streams in `$,A,C,G,T,N` order is a valid
//! partial BWT after every cycle, and the final BWT once all strings have
//! reached their sentinel.

use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write as _};
use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::error::{Error, Result};
use crate::longdna::LongDna;
use crate::radix;
use crate::rle::{RunEncoder, RunStream, SYM_COUNT, TERMINATOR};

/// String lengths are carried in 16 bits of the packed tuple.
pub const MAX_SEQ_LEN: usize = 65535;
/// Sequence ids are carried in the remaining 45 bits.
const MAX_SEQS: u64 = 1 << 45;
/// One worker per base bucket; the sentinel and N buckets ride along.
const N_WORKERS: usize = 4;

const SYM_NONE: u8 = 0xff;

/// Maps ASCII to the six-letter alphabet: `$=0, A=1, C=2, G=3, T=4`,
/// everything else (N included) to 5. Whether code 5 is fed to the builder
/// as-is or rewritten to a random base is the caller's choice; the builder
/// accepts both and never rewrites.
#[rustfmt::skip]
pub const SEQ_NT6_TABLE: [u8; 256] = [
    5, 5, 5, 5,  5, 5, 5, 5,  5, 5, 5, 5,  5, 5, 5, 5,
    5, 5, 5, 5,  5, 5, 5, 5,  5, 5, 5, 5,  5, 5, 5, 5,
    5, 5, 5, 5,  5, 5, 5, 5,  5, 5, 5, 5,  5, 5, 5, 5,
    5, 5, 5, 5,  5, 5, 5, 5,  5, 5, 5, 5,  5, 5, 5, 5,
    5, 1, 5, 2,  5, 5, 5, 3,  5, 5, 5, 5,  5, 5, 5, 5,
    5, 5, 5, 5,  4, 5, 5, 5,  5, 5, 5, 5,  5, 5, 5, 5,
    5, 1, 5, 2,  5, 5, 5, 3,  5, 5, 5, 5,  5, 5, 5, 5,
    5, 5, 5, 5,  4, 5, 5, 5,  5, 5, 5, 5,  5, 5, 5, 5,
    5, 5, 5, 5,  5, 5, 5, 5,  5, 5, 5, 5,  5, 5, 5, 5,
    5, 5, 5, 5,  5, 5, 5, 5,  5, 5, 5, 5,  5, 5, 5, 5,
    5, 5, 5, 5,  5, 5, 5, 5,  5, 5, 5, 5,  5, 5, 5, 5,
    5, 5, 5, 5,  5, 5, 5, 5,  5, 5, 5, 5,  5, 5, 5, 5,
    5, 5, 5, 5,  5, 5, 5, 5,  5, 5, 5, 5,  5, 5, 5, 5,
    5, 5, 5, 5,  5, 5, 5, 5,  5, 5, 5, 5,  5, 5, 5, 5,
    5, 5, 5, 5,  5, 5, 5, 5,  5, 5, 5, 5,  5, 5, 5, 5,
    5, 5, 5, 5,  5, 5, 5, 5,  5, 5, 5, 5,  5, 5, 5, 5,
];

/// Characters for printing a BWT, indexed by symbol code.
pub const SYM_CHARS: [u8; SYM_COUNT] = *b"$ACGTN";

/// One live string: `u` is its insertion position, `v` packs
/// `id:45 | length:16 | symbol:3`.
#[derive(Copy, Clone, Default, Debug, PartialEq, Eq)]
pub struct Pair64 {
    pub u: u64,
    pub v: u64,
}

impl Pair64 {
    fn pack(seq_id: u64, seq_len: u16) -> Self {
        Pair64 {
            u: 0,
            v: seq_id << 19 | (seq_len as u64) << 3,
        }
    }

    #[inline]
    pub fn seq_id(&self) -> u64 {
        self.v >> 19
    }

    #[inline]
    pub fn seq_len(&self) -> usize {
        (self.v >> 3 & 0xffff) as usize
    }

    #[inline]
    pub fn symbol(&self) -> u8 {
        (self.v & 7) as u8
    }

    #[inline]
    fn set_symbol(&mut self, sym: u8) {
        self.v = self.v & !7 | sym as u64;
    }
}

/// One per-symbol partial BWT.
#[derive(Default)]
struct Bucket {
    /// The bucket's run-length stream.
    e: RunStream,
    /// Entries classified into this bucket for the current cycle.
    n: u64,
    /// Per-symbol totals of all streams left of this bucket, captured at the
    /// start of the cycle.
    c: [u64; SYM_COUNT],
}

/// Construction switches; all default to off.
#[derive(Clone, Copy, Default, Debug)]
pub struct BuildOpts {
    /// Classify with a stable counting sort through an auxiliary array
    /// instead of in-place cyclic swaps: more memory, less time.
    pub fast: bool,
    /// Sort the strings into reverse lexicographic order while building.
    /// The relative order of identical strings is unspecified.
    pub rlo: bool,
    /// Run the per-bucket inner step on a 4-thread pool. Output is
    /// bit-identical to the serial build.
    pub threaded: bool,
}

/// Per-cycle progress report for [`Bcr::build_with`].
#[derive(Clone, Copy, Debug)]
pub struct Progress {
    /// Finished cycle, counted from 0.
    pub cycle: usize,
    /// Total number of cycles (longest string length).
    pub cycles_total: usize,
    /// Strings that inserted a symbol this cycle; finished strings drop out
    /// one cycle after inserting their sentinel.
    pub live: u64,
}

/// The BCR builder. `append` all strings, `build` once, then iterate.
pub struct Bcr {
    max_len: usize,
    n_seqs: u64,
    lens: Vec<u16>,
    /// Transposed input: `seq[p]` holds column `p`, which is character
    /// `len-1-p` of every string (columns are filled back to front).
    seq: Vec<LongDna>,
    buckets: [Bucket; SYM_COUNT],
    /// Start offset of each bucket in the concatenated BWT being built.
    c: [u64; SYM_COUNT],
    built: bool,
}

impl Default for Bcr {
    fn default() -> Self {
        Self::new()
    }
}

impl Bcr {
    pub fn new() -> Self {
        Bcr {
            max_len: 0,
            n_seqs: 0,
            lens: Vec::new(),
            seq: Vec::new(),
            buckets: Default::default(),
            c: [0; SYM_COUNT],
            built: false,
        }
    }

    pub fn n_seqs(&self) -> u64 {
        self.n_seqs
    }

    /// Length of the finished BWT (only meaningful after `build`).
    pub fn len(&self) -> u64 {
        self.buckets.iter().map(|b| b.e.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Per-symbol totals over the whole BWT.
    pub fn marginal_counts(&self) -> [u64; SYM_COUNT] {
        let mut mc = [0u64; SYM_COUNT];
        for b in &self.buckets {
            for (j, m) in b.e.marginal_counts().iter().enumerate() {
                mc[j] += m;
            }
        }
        mc
    }

    /// Add one string; symbols must be `1..=5` and the length in
    /// `1..=65535`.
    pub fn append(&mut self, seq: &[u8]) -> Result<()> {
        if self.built {
            return Err(Error::Usage("append after build"));
        }
        let len = seq.len();
        if len == 0 || len > MAX_SEQ_LEN {
            return Err(Error::InputInvalid(format!(
                "sequence length {len} out of range 1..={MAX_SEQ_LEN}"
            )));
        }
        if let Some(&bad) = seq.iter().find(|&&c| !(1..=5).contains(&c)) {
            return Err(Error::InputInvalid(format!(
                "symbol {bad} outside 1..=5"
            )));
        }
        if self.n_seqs >= MAX_SEQS {
            return Err(Error::InputInvalid(
                "too many sequences for the 45-bit id field".to_string(),
            ));
        }
        if len > self.max_len {
            self.seq.resize_with(len, LongDna::new);
            self.max_len = len;
        }
        for (i, &ch) in seq.iter().rev().enumerate() {
            self.seq[i].set(self.n_seqs, ch - 1);
        }
        self.lens.push(len as u16);
        self.n_seqs += 1;
        Ok(())
    }

    /// Run the construction; progress goes to the debug log.
    pub fn build(&mut self, opts: BuildOpts, tmp: Option<&Path>) -> Result<()> {
        self.build_with(opts, tmp, |p: Progress| {
            log::debug!(
                "cycle {}/{}: {} live sequences",
                p.cycle,
                p.cycles_total,
                p.live
            );
        })
    }

    /// Like [`build`] but with an injected per-cycle observer.
    ///
    /// With `tmp` set, the transposed columns are spilled to that file up
    /// front and read back one per cycle, trading sequential I/O for peak
    /// memory.
    ///
    /// [`build`]: Bcr::build
    pub fn build_with<F>(&mut self, opts: BuildOpts, tmp: Option<&Path>, mut progress: F) -> Result<()>
    where
        F: FnMut(Progress),
    {
        if self.built {
            return Err(Error::Usage("build called twice"));
        }
        self.built = true;
        if self.n_seqs == 0 {
            return Ok(());
        }

        let mut spill = match tmp {
            Some(path) => Some(self.spill_columns(path)?),
            None => None,
        };

        let pool = if opts.threaded {
            Some(
                rayon::ThreadPoolBuilder::new()
                    .num_threads(N_WORKERS)
                    .build()
                    .map_err(|e| Error::io("worker pool", io::Error::other(e)))?,
            )
        } else {
            None
        };

        let mut a: Vec<Pair64> = (0..self.n_seqs)
            .map(|k| Pair64::pack(k, self.lens[k as usize]))
            .collect();

        for pos in 0..=self.max_len {
            if let Some((_, r)) = spill.as_mut() {
                if pos < self.max_len {
                    self.seq[pos] = LongDna::restore(r)?;
                }
            }

            let sizes = self.set_bwt(&mut a, pos, opts);

            let col = if pos < self.max_len {
                Some(&self.seq[pos])
            } else {
                None
            };
            let c = self.c;
            let rlo = opts.rlo;

            // Hand each bucket its disjoint region of the position array.
            let mut slices: Vec<&mut [Pair64]> = Vec::with_capacity(SYM_COUNT);
            let mut rest: &mut [Pair64] = &mut a;
            for &size in &sizes {
                let (head, tail) = rest.split_at_mut(size);
                slices.push(head);
                rest = tail;
            }

            let buckets: &mut [Bucket] = &mut self.buckets;
            match &pool {
                Some(pool) => pool.install(|| {
                    buckets
                        .par_iter_mut()
                        .zip(slices.into_par_iter())
                        .enumerate()
                        .for_each(|(s, (bucket, slice))| {
                            next_bwt(s, bucket, slice, &c, col, pos, rlo)
                        })
                }),
                None => {
                    for (s, (bucket, slice)) in buckets.iter_mut().zip(slices).enumerate() {
                        next_bwt(s, bucket, slice, &c, col, pos, rlo);
                    }
                }
            }

            if pos < self.max_len {
                // The column has been consumed; release it.
                self.seq[pos] = LongDna::new();
            }
            progress(Progress {
                cycle: pos,
                cycles_total: self.max_len,
                live: a.len() as u64,
            });
        }

        if let Some((path, _)) = spill.take() {
            if let Err(e) = fs::remove_file(&path) {
                log::warn!("could not remove column spill {}: {}", path.display(), e);
            }
        }
        Ok(())
    }

    /// Dump every column to `path` in cycle order and release the in-memory
    /// copies; the build loop restores one column per cycle.
    fn spill_columns(&mut self, path: &Path) -> Result<(PathBuf, BufReader<File>)> {
        let mut w = BufWriter::new(
            File::create(path).map_err(|e| Error::io("column spill: create", e))?,
        );
        for col in &self.seq {
            col.dump(&mut w)?;
        }
        w.flush().map_err(|e| Error::io("column spill: flush", e))?;
        for col in &mut self.seq {
            *col = LongDna::new();
        }
        let r = BufReader::new(File::open(path).map_err(|e| Error::io("column spill: open", e))?);
        Ok((path.to_path_buf(), r))
    }

    /// First half of a cycle. Turns the positions carried from the previous
    /// cycle into absolute insertion positions in this cycle's BWT, drops
    /// finished strings, and partitions the survivors into the six bucket
    /// regions. Returns the region sizes.
    fn set_bwt(&mut self, a: &mut Vec<Pair64>, pos: usize, opts: BuildOpts) -> [usize; SYM_COUNT] {
        let mut counts = [0u64; SYM_COUNT];
        if pos == 0 {
            if opts.rlo {
                // Leave every position 0: all strings tie, and the tie-break
                // by next symbol in each cycle yields reverse-lex order.
                for p in a.iter() {
                    counts[p.symbol() as usize] += 1;
                }
            } else {
                for p in a.iter_mut() {
                    let s = p.symbol() as usize;
                    p.u += counts[s];
                    counts[s] += 1;
                }
            }
        } else {
            // Walk the six regions of the previous cycle left to right. A
            // carried position is missing the symbols inserted into earlier
            // buckets last cycle; `pc`, snapshotted at each region start,
            // supplies exactly that count. Entries that inserted their
            // sentinel are dropped, survivors are compacted to the front.
            let mut w = 0usize;
            let mut idx = 0usize;
            for b in 0..SYM_COUNT {
                let pc = counts;
                for _ in 0..self.buckets[b].n {
                    let mut p = a[idx];
                    idx += 1;
                    let s = p.symbol() as usize;
                    if s == 0 {
                        continue;
                    }
                    p.u += pc[s];
                    counts[s] += 1;
                    a[w] = p;
                    w += 1;
                }
            }
            debug_assert_eq!(idx, a.len());
            a.truncate(w);
        }

        let mut ac = [0u64; SYM_COUNT];
        for s in 1..SYM_COUNT {
            ac[s] = ac[s - 1] + counts[s - 1];
        }
        for p in a.iter_mut() {
            p.u += ac[p.symbol() as usize];
        }
        for s in 0..SYM_COUNT {
            self.c[s] += ac[s];
            self.buckets[s].n = counts[s];
        }

        // Per-symbol totals of everything left of each bucket, from the
        // streams as they stand before this cycle's insertions.
        self.buckets[0].c = [0; SYM_COUNT];
        for s in 1..SYM_COUNT {
            let prev = *self.buckets[s - 1].e.marginal_counts();
            for j in 0..SYM_COUNT {
                self.buckets[s].c[j] = self.buckets[s - 1].c[j] + prev[j];
            }
        }

        // The streams' marginal counts must agree with the bucket offsets:
        // symbols written under j through the last cycle are exactly the
        // entries bucket j will absorb.
        #[cfg(debug_assertions)]
        if pos > 0 {
            for j in 1..SYM_COUNT - 1 {
                let written: u64 = self.buckets.iter().map(|b| b.e.marginal_counts()[j]).sum();
                debug_assert_eq!(
                    written,
                    self.c[j + 1] - self.c[j],
                    "marginal counts out of sync for symbol {j} at cycle {pos}"
                );
            }
        }

        let sizes = counts.map(|x| x as usize);
        if opts.fast {
            radix::classify_by_symbol_stable(a, &counts);
        } else {
            radix::classify_by_symbol(a, &counts);
        }
        sizes
    }

    /// Iterate the finished BWT as raw run-length chunks.
    pub fn iter(&self) -> BwtIter<'_> {
        BwtIter {
            bcr: self,
            class: 0,
            block: 0,
        }
    }

    /// Iterate the finished BWT as `(count, symbol)` cells.
    pub fn cells(&self) -> impl Iterator<Item = (u64, u8)> + '_ {
        self.buckets.iter().flat_map(|b| b.e.iter())
    }
}

/// Second half of a cycle, independent per bucket: merge this cycle's
/// symbols into the bucket's stream and compute each entry's incomplete
/// position for the next cycle.
fn next_bwt(
    class: usize,
    bucket: &mut Bucket,
    slice: &mut [Pair64],
    c_global: &[u64; SYM_COUNT],
    col: Option<&LongDna>,
    pos: usize,
    rlo: bool,
) {
    let n = slice.len();
    if n == 0 {
        return;
    }
    // Bucket 0 only ever holds the first cycle's entries, already in
    // position order.
    if class != 0 && n > 1 {
        radix::sort_by_pos(slice);
    }

    for p in slice.iter_mut() {
        let sym = if pos >= p.seq_len() {
            0 // past the end: insert the sentinel
        } else {
            match col {
                Some(col) => col.get(p.seq_id()) + 1,
                None => 0,
            }
        };
        p.set_symbol(sym);
        // Make the position relative to this bucket.
        p.u -= c_global[class];
    }

    if rlo {
        rlo_tie_break(slice);
    }

    let old = std::mem::take(&mut bucket.e);
    let mut drain = old.into_drain();
    let mut ew = RunEncoder::new();
    let mut write_pos = 0u64;
    let mut last_key = (u64::MAX, SYM_NONE);
    let mut last_assigned = 0u64;
    for p in slice.iter_mut() {
        let old_u = p.u;
        let sym = p.symbol();
        if old_u > write_pos {
            ew.copy(&mut drain, old_u - write_pos);
            write_pos = old_u;
        }
        ew.enc(1, sym);
        write_pos += 1;
        // Incomplete position in the next cycle's BWT: rank of the inserted
        // symbol here, plus the start of its destination bucket, plus that
        // symbol's total in the streams left of this one. The symbols other
        // buckets insert this cycle are unknown here; set_bwt adds them next
        // cycle. Tied equal-symbol entries (RLO) share one position.
        let assigned = if rlo && (old_u, sym) == last_key {
            last_assigned
        } else {
            ew.occ(sym) - 1 + c_global[sym as usize] + bucket.c[sym as usize]
        };
        last_key = (old_u, sym);
        last_assigned = assigned;
        p.u = assigned;
    }
    let rest = drain.remaining();
    if rest > 0 {
        ew.copy(&mut drain, rest);
    }
    bucket.e = ew.finalize();
}

/// Counting-sort every group of position-tied entries by their fresh
/// symbol, so ties resolve toward reverse-lexicographic order.
fn rlo_tie_break(slice: &mut [Pair64]) {
    let mut scratch: Vec<Pair64> = Vec::new();
    let mut i = 0usize;
    while i < slice.len() {
        let mut j = i + 1;
        while j < slice.len() && slice[j].u == slice[i].u {
            j += 1;
        }
        if j - i > 1 {
            let group = &mut slice[i..j];
            let mut cnt = [0usize; 8];
            for p in group.iter() {
                cnt[(p.v & 7) as usize] += 1;
            }
            let mut at = [0usize; 8];
            let mut sum = 0usize;
            for s in 0..8 {
                at[s] = sum;
                sum += cnt[s];
            }
            scratch.clear();
            scratch.resize(group.len(), Pair64::default());
            for &p in group.iter() {
                let s = (p.v & 7) as usize;
                scratch[at[s]] = p;
                at[s] += 1;
            }
            group.copy_from_slice(&scratch);
        }
        i = j;
    }
}

/// Streams the final BWT bucket by bucket as raw RLE byte chunks. Full
/// blocks come out whole; the tail block stops at the terminator. Empty
/// buckets are skipped, so an empty build yields `None` immediately.
pub struct BwtIter<'a> {
    bcr: &'a Bcr,
    class: usize,
    block: usize,
}

impl<'a> BwtIter<'a> {
    pub fn next_chunk(&mut self) -> Option<&'a [u8]> {
        loop {
            if self.class == SYM_COUNT {
                return None;
            }
            let e = &self.bcr.buckets[self.class].e;
            if self.block >= e.block_count() {
                self.class += 1;
                self.block = 0;
                continue;
            }
            let block = e.block(self.block);
            let last = self.block + 1 == e.block_count();
            self.block += 1;
            let len = if last {
                block
                    .iter()
                    .position(|&b| b == TERMINATOR)
                    .unwrap_or(block.len())
            } else {
                block.len()
            };
            if len == 0 {
                continue;
            }
            return Some(&block[..len]);
        }
    }
}

impl<'a> Iterator for BwtIter<'a> {
    type Item = &'a [u8];

    fn next(&mut self) -> Option<&'a [u8]> {
        self.next_chunk()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bwt_symbols(bcr: &Bcr) -> Vec<u8> {
        let mut out = Vec::new();
        for (count, sym) in bcr.cells() {
            for _ in 0..count {
                out.push(sym);
            }
        }
        out
    }

    #[test]
    fn test_pack_accessors() {
        let p = Pair64::pack(12345, 678);
        assert_eq!(p.seq_id(), 12345);
        assert_eq!(p.seq_len(), 678);
        assert_eq!(p.symbol(), 0);
        let mut p = p;
        p.set_symbol(5);
        assert_eq!(p.symbol(), 5);
        assert_eq!(p.seq_id(), 12345);
        assert_eq!(p.seq_len(), 678);
    }

    #[test]
    fn test_single_string() {
        let mut bcr = Bcr::new();
        bcr.append(&[1, 2, 3, 4]).unwrap(); // ACGT
        bcr.build(BuildOpts::default(), None).unwrap();
        // Rotations of ACGT$ sorted: $ACGT, ACGT$, CGT$A, GT$AC, T$ACG.
        assert_eq!(bwt_symbols(&bcr), vec![4, 0, 1, 2, 3]); // T$ACG
        assert_eq!(bcr.len(), 5);
        assert_eq!(bcr.marginal_counts(), [1, 1, 1, 1, 1, 0]);
    }

    #[test]
    fn test_append_validation() {
        let mut bcr = Bcr::new();
        assert!(matches!(
            bcr.append(&[]),
            Err(Error::InputInvalid(_))
        ));
        assert!(matches!(
            bcr.append(&[1, 6, 2]),
            Err(Error::InputInvalid(_))
        ));
        assert!(matches!(
            bcr.append(&[1, 0, 2]),
            Err(Error::InputInvalid(_))
        ));
        assert!(matches!(
            bcr.append(&vec![1u8; MAX_SEQ_LEN + 1]),
            Err(Error::InputInvalid(_))
        ));
        bcr.append(&[1]).unwrap();
        bcr.build(BuildOpts::default(), None).unwrap();
        assert!(matches!(bcr.append(&[1]), Err(Error::Usage(_))));
        assert!(matches!(
            bcr.build(BuildOpts::default(), None),
            Err(Error::Usage(_))
        ));
    }

    #[test]
    fn test_empty_build_iterates_nothing() {
        let mut bcr = Bcr::new();
        bcr.build(BuildOpts::default(), None).unwrap();
        assert!(bcr.iter().next_chunk().is_none());
        assert_eq!(bcr.cells().count(), 0);
        assert_eq!(bcr.len(), 0);
    }

    #[test]
    fn test_all_n_string_lands_in_bucket_five() {
        let mut bcr = Bcr::new();
        bcr.append(&vec![5u8; 1000]).unwrap();
        bcr.build(BuildOpts::default(), None).unwrap();
        // BWT of N...N$ is N^k followed by the sentinel.
        let syms = bwt_symbols(&bcr);
        assert_eq!(syms.len(), 1001);
        assert_eq!(syms[..1000], vec![5u8; 1000][..]);
        assert_eq!(syms[1000], 0);
        // Only the sentinel bucket and the N bucket hold anything.
        assert_eq!(bcr.buckets[0].e.len(), 1);
        for s in 1..5 {
            assert_eq!(bcr.buckets[s].e.len(), 0, "bucket {s}");
        }
        assert_eq!(bcr.buckets[5].e.len(), 1000);
    }

    #[test]
    fn test_progress_callback() {
        let mut bcr = Bcr::new();
        bcr.append(&[1, 2, 3]).unwrap();
        bcr.append(&[4, 3]).unwrap();
        let mut cycles = Vec::new();
        bcr.build_with(BuildOpts::default(), None, |p: Progress| {
            cycles.push((p.cycle, p.live));
        })
        .unwrap();
        assert_eq!(cycles.len(), 4); // cycles 0..=3 for max_len 3
        assert_eq!(cycles[0], (0, 2));
        // The shorter string finished its sentinel at cycle 2 and dropped
        // out of cycle 3; the longer one inserted its sentinel there.
        assert_eq!(cycles.last().copied(), Some((3, 1)));
    }
}
