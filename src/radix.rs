//! Sorting primitives for the position array.
//!
//! `sort_by_pos` is a top-down radix sort on the 64-bit position key: 8-bit
//! digits, in-place cyclic classification per digit, insertion sort once a
//! partition drops under the threshold. The symbol classifiers radix on the
//! low 3 bits of the packed tuple; the in-place one trades stability for
//! zero scratch memory, the stable one is the fast-mode path.

use crate::bcr::Pair64;
use crate::bits::bits_needed;
use crate::rle::SYM_COUNT;

const RS_MIN_SIZE: usize = 64;
const DIGITS: usize = 256;

/// Sort by the position key `u`. Ties keep no particular order.
pub fn sort_by_pos(a: &mut [Pair64]) {
    if a.len() < 2 {
        return;
    }
    if a.len() <= RS_MIN_SIZE {
        insertion_sort(a);
        return;
    }
    let max = a.iter().map(|p| p.u).max().unwrap_or(0);
    if max == 0 {
        return;
    }
    let top_shift = (bits_needed(max) - 1) / 8 * 8;
    radix_pass(a, top_shift);
}

fn insertion_sort(a: &mut [Pair64]) {
    for i in 1..a.len() {
        let x = a[i];
        let mut j = i;
        while j > 0 && a[j - 1].u > x.u {
            a[j] = a[j - 1];
            j -= 1;
        }
        a[j] = x;
    }
}

fn radix_pass(a: &mut [Pair64], shift: u32) {
    let digit = |p: &Pair64| (p.u >> shift & 0xff) as usize;

    let mut count = [0usize; DIGITS];
    for p in a.iter() {
        count[digit(p)] += 1;
    }
    let mut start = [0usize; DIGITS];
    let mut sum = 0usize;
    for d in 0..DIGITS {
        start[d] = sum;
        sum += count[d];
    }

    // Cyclic in-place classification: keep swapping the head of bucket d
    // toward its home until the slot holds a native element.
    let mut next = start;
    for d in 0..DIGITS {
        let end = start[d] + count[d];
        while next[d] < end {
            let home = digit(&a[next[d]]);
            if home == d {
                next[d] += 1;
            } else {
                a.swap(next[d], next[home]);
                next[home] += 1;
            }
        }
    }

    if shift == 0 {
        return;
    }
    for d in 0..DIGITS {
        let lo = start[d];
        let hi = start[d] + count[d];
        if hi - lo > RS_MIN_SIZE {
            radix_pass(&mut a[lo..hi], shift - 8);
        } else if hi - lo > 1 {
            insertion_sort(&mut a[lo..hi]);
        }
    }
}

/// Partition into the six symbol regions in place (cyclic swaps, not
/// stable). `counts[s]` must hold the number of entries with symbol `s`.
pub fn classify_by_symbol(a: &mut [Pair64], counts: &[u64; SYM_COUNT]) {
    let mut start = [0usize; SYM_COUNT];
    let mut sum = 0usize;
    for s in 0..SYM_COUNT {
        start[s] = sum;
        sum += counts[s] as usize;
    }
    debug_assert_eq!(sum, a.len());

    let mut next = start;
    for s in 0..SYM_COUNT {
        let end = start[s] + counts[s] as usize;
        while next[s] < end {
            let home = (a[next[s]].v & 7) as usize;
            if home == s {
                next[s] += 1;
            } else {
                a.swap(next[s], next[home]);
                next[home] += 1;
            }
        }
    }
}

/// Stable counting-sort partition through an auxiliary array: more memory,
/// less time. The fast-mode path.
pub fn classify_by_symbol_stable(a: &mut Vec<Pair64>, counts: &[u64; SYM_COUNT]) {
    let mut pos = [0usize; SYM_COUNT];
    let mut sum = 0usize;
    for s in 0..SYM_COUNT {
        pos[s] = sum;
        sum += counts[s] as usize;
    }
    debug_assert_eq!(sum, a.len());

    let mut out = vec![Pair64::default(); a.len()];
    for &p in a.iter() {
        let s = (p.v & 7) as usize;
        out[pos[s]] = p;
        pos[s] += 1;
    }
    *a = out;
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::prelude::*;

    fn random_pairs(n: usize, key_bits: u32, seed: u64) -> Vec<Pair64> {
        let mut rng = StdRng::seed_from_u64(seed);
        (0..n)
            .map(|i| Pair64 {
                u: rng.gen_range(0..1u64 << key_bits),
                v: (i as u64) << 19 | rng.gen_range(0..6u64),
            })
            .collect()
    }

    #[test]
    fn test_sort_by_pos() {
        for &(n, bits) in &[(0usize, 8u32), (1, 8), (50, 8), (100, 1), (5000, 40), (3000, 63)] {
            let mut a = random_pairs(n, bits, n as u64);
            let mut expect: Vec<u64> = a.iter().map(|p| p.u).collect();
            expect.sort_unstable();
            sort_by_pos(&mut a);
            let got: Vec<u64> = a.iter().map(|p| p.u).collect();
            assert_eq!(got, expect, "n={n} bits={bits}");
        }
    }

    #[test]
    fn test_sort_many_duplicates() {
        let mut rng = StdRng::seed_from_u64(77);
        let mut a: Vec<Pair64> = (0..4000)
            .map(|i| Pair64 {
                u: rng.gen_range(0..5u64),
                v: i,
            })
            .collect();
        sort_by_pos(&mut a);
        for w in a.windows(2) {
            assert!(w[0].u <= w[1].u);
        }
    }

    #[test]
    fn test_classify_regions() {
        let a0 = random_pairs(2000, 30, 9);
        let mut counts = [0u64; SYM_COUNT];
        for p in &a0 {
            counts[(p.v & 7) as usize] += 1;
        }

        let mut inplace = a0.clone();
        classify_by_symbol(&mut inplace, &counts);
        let mut stable = a0.clone();
        classify_by_symbol_stable(&mut stable, &counts);

        // Both produce the same region boundaries.
        let mut off = 0usize;
        for s in 0..SYM_COUNT {
            let n = counts[s] as usize;
            for p in &inplace[off..off + n] {
                assert_eq!((p.v & 7) as usize, s);
            }
            for p in &stable[off..off + n] {
                assert_eq!((p.v & 7) as usize, s);
            }
            off += n;
        }

        // The stable variant preserves input order inside each region.
        let mut expect_stable: Vec<Pair64> = Vec::new();
        for s in 0..SYM_COUNT as u64 {
            expect_stable.extend(a0.iter().filter(|p| p.v & 7 == s));
        }
        assert_eq!(stable, expect_stable);

        // The in-place variant holds the same multiset per region.
        let mut x: Vec<u64> = inplace.iter().map(|p| p.v).collect();
        let mut y: Vec<u64> = expect_stable.iter().map(|p| p.v).collect();
        x.sort_unstable();
        y.sort_unstable();
        assert_eq!(x, y);
    }
}
