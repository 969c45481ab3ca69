//! Error types for the crate.
//!
//! Allocation failure has no variant here: the global allocator aborts the
//! process, which is the intended behavior for an out-of-memory build.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Rejected input: length out of range, symbol outside `1..=5`, or more
    /// sequences than the 45-bit id field can address.
    #[error("invalid input: {0}")]
    InputInvalid(String),

    /// An I/O operation failed; `op` names what was being done.
    #[error("{op}: {source}")]
    Io {
        op: &'static str,
        #[source]
        source: std::io::Error,
    },

    /// The API was driven out of order (e.g. `build` called twice).
    #[error("usage: {0}")]
    Usage(&'static str),
}

impl Error {
    pub fn io(op: &'static str, source: std::io::Error) -> Self {
        Error::Io { op, source }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
