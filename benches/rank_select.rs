use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::prelude::*;
use rlebwt::{BitRank, RleEncoder, RleVector};

const N: u64 = 1 << 22;

fn build_plain(density: f64, seed: u64) -> BitRank<'static> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut words = vec![0u64; (N as usize).div_ceil(64)];
    for i in 0..N {
        if rng.gen_bool(density) {
            words[(i / 64) as usize] |= 1 << (i % 64);
        }
    }
    BitRank::from_words(words, N)
}

fn build_rle(density: f64, seed: u64) -> RleVector {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut enc = RleEncoder::new(rlebwt::rlevector::DEFAULT_BLOCK_BYTES);
    let mut i = 0u64;
    while i < N {
        if rng.gen_bool(density) {
            let len = rng.gen_range(1..64).min(N - i);
            enc.set_run(i, len);
            i += len + 1;
        } else {
            i += 1;
        }
    }
    RleVector::new(enc, N)
}

fn bench_rank(c: &mut Criterion) {
    let plain = build_plain(0.5, 1);
    let rle = build_rle(0.05, 2);
    let mut rng = StdRng::seed_from_u64(3);
    let queries: Vec<u64> = (0..1024).map(|_| rng.gen_range(0..N)).collect();

    c.bench_function("plain_rank1", |b| {
        b.iter(|| {
            let mut acc = 0u64;
            for &q in &queries {
                acc += plain.rank1(black_box(q));
            }
            acc
        })
    });
    c.bench_function("rle_rank", |b| {
        b.iter(|| {
            let mut acc = 0u64;
            let mut it = rle.iter();
            for &q in &queries {
                acc += it.rank(black_box(q), false);
            }
            acc
        })
    });
}

fn bench_select(c: &mut Criterion) {
    let plain = build_plain(0.5, 4);
    let rle = build_rle(0.05, 5);
    let mut rng = StdRng::seed_from_u64(6);
    let ones = plain.count_ones();
    let items = rle.count_items();
    let q_plain: Vec<u64> = (0..1024).map(|_| rng.gen_range(1..=ones)).collect();
    let q_rle: Vec<u64> = (0..1024).map(|_| rng.gen_range(0..items)).collect();

    c.bench_function("plain_select1", |b| {
        b.iter(|| {
            let mut acc = 0u64;
            for &q in &q_plain {
                acc += plain.select1(black_box(q));
            }
            acc
        })
    });
    c.bench_function("rle_select", |b| {
        b.iter(|| {
            let mut acc = 0u64;
            let mut it = rle.iter();
            for &q in &q_rle {
                acc += it.select(black_box(q));
            }
            acc
        })
    });
}

criterion_group!(benches, bench_rank, bench_select);
criterion_main!(benches);
