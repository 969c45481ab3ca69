//! Succinct building blocks for run-length compressed full-text indexes of
//! DNA read collections.
//!
//! The two halves of the crate:
//!
//! * [`bcr`] — incremental multi-string BWT construction: each cycle
//!   inserts one transposed column of the input into six per-symbol
//!   run-length partial BWTs ([`rle`]), reading bases from the packed
//!   column store ([`longdna`]) and optionally running the per-bucket
//!   inner step on a worker pool.
//! * [`bitrank`] / [`rlevector`] — the rank/select bit vectors an index
//!   layer builds on top of such a BWT: a plain vector with a two-level
//!   rank directory, and a run-length delta-coded vector for sparse or
//!   runny bit sets.
//!
//! Bit vectors are build-once, read-many; concurrent readers are safe.

pub mod bcr;
pub mod bitbuf;
pub mod bitrank;
pub mod bits;
pub mod error;
pub mod fastx;
pub mod longdna;
pub mod radix;
pub mod rle;
pub mod rlevector;
pub mod utils;

pub use bcr::{Bcr, BuildOpts};
pub use bitrank::BitRank;
pub use error::{Error, Result};
pub use rlevector::{RleEncoder, RleIter, RleVector};
