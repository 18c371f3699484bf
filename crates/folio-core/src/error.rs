//! Reader error handling
//!
//! Expected outcomes such as a missing source file, an out-of-range page or
//! an absent bookmark are not errors: operations report them through
//! `Option`/`bool` returns. What remains here are faults the caller has to
//! see: cache failures (passed through unchanged), source I/O failures and
//! input that is not text.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::cache::CacheError;

/// Errors surfaced by the reading core
#[derive(Error, Debug)]
pub enum ReaderError {
    /// The cache backend failed
    #[error(transparent)]
    Cache(#[from] CacheError),

    /// Failed to read a user's source text
    #[error("Failed to read source '{path}': {source}")]
    ReadSource {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Failed to write a user's source text
    #[error("Failed to write source '{path}': {source}")]
    WriteSource {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The source file is not valid UTF-8 text
    #[error("Source '{path}' is not valid UTF-8 text")]
    MalformedSource { path: PathBuf },

    /// Page size must be at least one character
    #[error("Invalid page size {0}: pages must hold at least one character")]
    InvalidPageSize(usize),
}

impl ReaderError {
    /// Check if this error came from the cache backend
    pub fn is_cache_failure(&self) -> bool {
        matches!(self, ReaderError::Cache(_))
    }
}

/// Result type for reader operations
pub type ReaderResult<T> = Result<T, ReaderError>;
