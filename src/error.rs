//! Error handling for the famut library.
//!
//! This module defines all error types that can occur while encoding a FASTA
//! source into the binary store or while mutating a stored sequence. Every
//! structural failure aborts the operation that hit it; the one recoverable
//! condition (an invalid edit inside a batch) is logged and skipped by the
//! mutation engine and never surfaces here.

use std::path::PathBuf;

use thiserror::Error;

/// A specialized `Result` type for famut operations.
///
/// Used throughout the library for any operation that can fail. Equivalent
/// to `std::result::Result<T, FamutError>`.
pub type Result<T> = std::result::Result<T, FamutError>;

/// Error types for encode and mutate operations.
///
/// Each variant corresponds to one structural failure kind: the operation
/// that produced it has been aborted and no retry is attempted internally.
/// Variants carry the offending path where one exists so callers can report
/// actionable messages.
#[derive(Error, Debug)]
pub enum FamutError {
    /// The FASTA source could not be opened for reading.
    #[error("could not read source file {path:?}")]
    SourceUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An output file could not be created or written.
    ///
    /// Covers both encoder outputs (data file, index file) and the mutation
    /// engine's rewrapped text output.
    #[error("could not write output file {path:?}")]
    OutputUnwritable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The index file could not be opened or read.
    #[error("could not read index file {path:?}")]
    IndexUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The index file was read but does not parse as an index document.
    #[error("malformed index document {path:?}")]
    MalformedIndex {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The requested sequence name has no entry in the index.
    #[error("sequence '{0}' not found in index")]
    SequenceNotFound(String),

    /// The data file could not be opened or memory-mapped.
    #[error("could not map data file {path:?}")]
    DataUnmappable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An index entry's byte range extends past the end of the data file.
    ///
    /// Indicates a stale or inconsistent index/data pairing, e.g. after an
    /// interrupted encode.
    #[error("byte range [{start}, {end}) exceeds data file size ({size})")]
    RangeOutOfBounds { start: u64, end: u64, size: u64 },

    /// I/O error from an underlying reader or writer.
    #[error("I/O error")]
    Io(#[from] std::io::Error),

    /// Compression/decompression error from niffler.
    ///
    /// Occurs when a compressed FASTA source cannot be decoded, with the
    /// `niffler` feature enabled.
    #[cfg(feature = "niffler")]
    #[error("Niffler error")]
    Niffler(#[from] niffler::Error),
}
