use super::BitRank;
use rand::prelude::*;

/// Pack bits given most-significant-position-first as a bool slice,
/// bit `i` of the vector being `bits[i]`.
fn pack(bits: &[bool]) -> (Vec<u64>, u64) {
    let mut words = vec![0u64; bits.len().div_ceil(64)];
    for (i, &b) in bits.iter().enumerate() {
        if b {
            words[i / 64] |= 1u64 << (i % 64);
        }
    }
    (words, bits.len() as u64)
}

fn from_pattern(pattern: &str) -> BitRank<'static> {
    let bits: Vec<bool> = pattern
        .chars()
        .filter(|c| *c == '0' || *c == '1')
        .map(|c| c == '1')
        .collect();
    let (words, n) = pack(&bits);
    BitRank::from_words(words, n)
}

#[test]
fn test_rank_select_fixed_pattern() {
    // 1011_0010_0000_0001 read left to right: bits set at 0, 2, 3, 6, 15.
    let b = from_pattern("1011_0010_0000_0001");
    let expected_rank1 = [1u64, 1, 2, 3, 3, 3, 4, 4, 4, 4, 4, 4, 4, 4, 4, 5];
    for (i, &r) in expected_rank1.iter().enumerate() {
        assert_eq!(b.rank1(i as u64), r, "rank1({i})");
        assert_eq!(b.rank0(i as u64), i as u64 + 1 - r, "rank0({i})");
    }
    assert_eq!(b.select1(0), 0);
    assert_eq!(b.select1(3), 3);
    assert_eq!(b.select1(5), 15);
    assert_eq!(b.select1(6), 16); // past the last set bit -> n
    assert!(b.bit(0) && b.bit(2) && b.bit(3) && b.bit(6) && b.bit(15));
    assert!(!b.bit(1) && !b.bit(4) && !b.bit(14));
}

#[test]
fn test_rank_monotone_and_complement() {
    let mut rng = StdRng::seed_from_u64(1);
    let bits: Vec<bool> = (0..3000).map(|_| rng.gen_bool(0.37)).collect();
    let (words, n) = pack(&bits);
    let b = BitRank::from_words(words, n);
    let mut prev = 0u64;
    for i in 0..n {
        let r = b.rank1(i);
        assert!(r == prev || r == prev + 1);
        assert_eq!(b.rank1(i) + b.rank0(i), i + 1);
        prev = r;
    }
}

#[test]
fn test_against_naive() {
    let mut rng = StdRng::seed_from_u64(2);
    for &density in &[0.02f64, 0.5, 0.93] {
        for &n in &[1usize, 63, 64, 65, 255, 256, 257, 1025, 4100] {
            let bits: Vec<bool> = (0..n).map(|_| rng.gen_bool(density)).collect();
            let (words, nb) = pack(&bits);
            let b = BitRank::from_words(words, nb);

            let mut ones = 0u64;
            let mut zeros = 0u64;
            for i in 0..n {
                if bits[i] {
                    ones += 1;
                    assert_eq!(b.select1(ones), i as u64, "select1 n={n}");
                } else {
                    zeros += 1;
                    assert_eq!(b.select0(zeros), i as u64, "select0 n={n}");
                }
                assert_eq!(b.rank1(i as u64), ones, "rank1 n={n} i={i}");
                assert_eq!(b.bit(i as u64), bits[i]);
            }
            assert_eq!(b.count_ones(), ones);
            assert_eq!(b.select1(ones + 1), nb);
            assert_eq!(b.select0(zeros + 1), nb);
        }
    }
}

#[test]
fn test_rank_select_roundtrip() {
    let mut rng = StdRng::seed_from_u64(3);
    let bits: Vec<bool> = (0..2048).map(|_| rng.gen_bool(0.1)).collect();
    let (words, n) = pack(&bits);
    let b = BitRank::from_words(words, n);
    for x in 1..=b.count_ones() {
        let pos = b.select1(x);
        assert_eq!(b.rank1(pos), x);
        assert!(b.bit(pos));
    }
}

#[test]
fn test_borrowed_words() {
    let bits: Vec<bool> = (0..600).map(|i| i % 7 == 0).collect();
    let (words, n) = pack(&bits);
    let b = BitRank::from_slice(&words, n);
    assert_eq!(b.count_ones(), bits.iter().filter(|&&x| x).count() as u64);
    assert_eq!(b.select1(2), 7);
}

#[test]
fn test_save_load() {
    let mut rng = StdRng::seed_from_u64(4);
    let bits: Vec<bool> = (0..1333).map(|_| rng.gen_bool(0.25)).collect();
    let (words, n) = pack(&bits);
    let b = BitRank::from_words(words, n);

    let mut buf: Vec<u8> = Vec::new();
    b.save(&mut buf).unwrap();
    let b2 = BitRank::load(&mut buf.as_slice()).unwrap();

    assert_eq!(b2.len(), b.len());
    for i in 0..n {
        assert_eq!(b2.rank1(i), b.rank1(i));
    }
    for x in 0..=b.count_ones() + 1 {
        assert_eq!(b2.select1(x), b.select1(x));
    }
}

#[test]
fn test_load_truncated_fails() {
    let b = from_pattern("1100_1010");
    let mut buf: Vec<u8> = Vec::new();
    b.save(&mut buf).unwrap();
    buf.truncate(buf.len() - 3);
    assert!(BitRank::load(&mut buf.as_slice()).is_err());
}
