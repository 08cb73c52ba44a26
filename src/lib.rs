//! # famut - Compact Storage and Positional Mutation of FASTA Sequences
//!
//! `famut` converts a multi-sequence FASTA source into a compact,
//! randomly-accessible binary representation, and applies positional edits
//! (substitutions, insertions, deletions) to a chosen sequence, producing a
//! re-wrapped text output. It serves two phases of a sequence-processing
//! pipeline:
//!
//! 1. A one-time [`encode`] pass extracts a subset of named sequences from
//!    a large flat-text source into a dense binary blob plus a lightweight
//!    offset index, without ever holding the whole source in memory.
//! 2. Repeated [`mutate`] passes use the index to locate a sequence without
//!    rescanning the source, apply a batch of edits with correct position
//!    accounting across length-changing operations, and emit the result.
//!
//! ## On-Disk Layout
//!
//! An encode run writes two files into its output directory:
//!
//! - `chromosomes.dat` - raw binary, no header, no padding: the
//!   concatenation of every retained record's uppercased bases in source
//!   order.
//! - `chromosomes.idx` - a JSON document mapping each retained name to its
//!   `[offset, length]` byte range in the data file. Ranges are disjoint
//!   and contiguous from zero.
//!
//! Both files are fully rewritten on every encode; the index is the sole
//! coupling between the two phases. An encode must not run concurrently
//! with another encode or mutate against the same directory (the rewrite is
//! not atomic); any number of mutate calls may share a directory.
//!
//! ## Basic Usage
//!
//! ```rust,no_run
//! use std::collections::HashSet;
//! use famut::Edit;
//!
//! # fn main() -> famut::Result<()> {
//! // Extract chromosomes 1 and X from a primary assembly.
//! let names: HashSet<String> = ["1", "X"].iter().map(|s| s.to_string()).collect();
//! famut::encode(&names, "Homo_sapiens.GRCh38.fa", "store")?;
//!
//! // Apply a batch of edits to chromosome 1 and write the result
//! // rewrapped at 60 bases per line.
//! let edits = vec![
//!     Edit::substitute(0, "G"),
//!     Edit::insert(1500, "ACT"),
//!     Edit::delete(2000, "NN"),
//! ];
//! famut::mutate("1", &edits, "store", "chr1_edited.txt")?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Edit Semantics
//!
//! Edit positions are 0-based indices into the *original* sequence. The
//! engine sorts a batch by position (ties keep input order) and walks the
//! original once, copying unedited spans verbatim, so earlier
//! length-changing edits never shift the meaning of later positions:
//!
//! ```rust
//! use famut::{apply_edits, Edit};
//!
//! let edits = vec![Edit::insert(0, "G"), Edit::delete(5, "C")];
//! assert_eq!(apply_edits(b"ACGTACGT", &edits), b"GACGTAGT");
//! ```
//!
//! Substitution payloads are exactly one base. An edit that fails
//! validation (out-of-bounds position, oversized substitution payload, or a
//! target already consumed by a preceding edit) is logged at warning level
//! and skipped; the rest of the batch still applies.
//!
//! ## Error Handling
//!
//! All structural failures return `Result<T, FamutError>` with the
//! offending path attached:
//!
//! ```rust,no_run
//! use famut::FamutError;
//!
//! match famut::mutate("17", &[], "store", "out.txt") {
//!     Err(FamutError::SequenceNotFound(name)) => {
//!         eprintln!("'{}' was not retained at encode time", name);
//!     }
//!     Err(e) => eprintln!("mutation failed: {}", e),
//!     Ok(_) => {}
//! }
//! ```

mod constructs;
mod error;
mod io;

pub use constructs::{Edit, EditKind, Index, IndexEntry, DATA_FILE_NAME, INDEX_FILE_NAME};
pub use error::{FamutError, Result};
pub use io::{apply_edits, encode, mutate, MmapData, LINE_WIDTH};
