//! Mutation engine.
//!
//! Locates a stored sequence through the index, applies a batch of
//! positional edits against the immutable original bytes, and renders the
//! result as fixed-width text. Edits are never applied to a partially
//! mutated buffer: a cursor over the original sequence tracks what has
//! already been consumed, so positions stay valid across length-changing
//! edits.

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use crate::{Edit, EditKind, FamutError, Index, MmapData, Result, DATA_FILE_NAME};

/// Output line width in bytes, matching FASTA convention.
pub const LINE_WIDTH: usize = 60;

/// Applies a batch of edits to a named sequence and writes the rewrapped
/// result.
///
/// Loads the index from `data_dir`, resolves the byte range for `name`,
/// maps the data file read-only for the duration of this call, applies
/// `edits` (see [`apply_edits`] for the batch semantics), and writes the
/// edited sequence to `output_path` wrapped at [`LINE_WIDTH`] bytes per
/// line, every line newline-terminated.
///
/// Invalid edits within the batch are skipped with a warning; all other
/// failure conditions abort the call and the output file must not be
/// considered usable.
///
/// # Errors
///
/// Returns [`FamutError::IndexUnreadable`] or [`FamutError::MalformedIndex`]
/// if the index cannot be loaded, [`FamutError::SequenceNotFound`] if
/// `name` has no entry, [`FamutError::DataUnmappable`] if the data file
/// cannot be mapped, and [`FamutError::OutputUnwritable`] if the output
/// cannot be written.
///
/// # Examples
///
/// ```rust,no_run
/// use famut::Edit;
///
/// # fn main() -> famut::Result<()> {
/// let edits = vec![Edit::substitute(0, "G"), Edit::insert(5, "AT")];
/// famut::mutate("1", &edits, "store", "chr1_edited.txt")?;
/// # Ok(())
/// # }
/// ```
pub fn mutate<P, Q>(name: &str, edits: &[Edit], data_dir: P, output_path: Q) -> Result<()>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let data_dir = data_dir.as_ref();

    let index = Index::from_dir(data_dir)?;
    let entry = index
        .get(name)
        .ok_or_else(|| FamutError::SequenceNotFound(name.to_string()))?;

    // The map lives until the end of this call and is dropped on every
    // exit path; it must not be cached across calls, since a later encode
    // rewrites the data file.
    let data = MmapData::open(data_dir.join(DATA_FILE_NAME))?;
    let seq = data.slice(entry.offset, entry.length)?;

    let edited = apply_edits(seq, edits);
    log::debug!(
        "mutated '{}': {} bases in, {} bases out",
        name,
        seq.len(),
        edited.len()
    );

    write_wrapped(&edited, output_path.as_ref())
}

/// Applies a batch of edits to a sequence, returning the edited bytes.
///
/// Edits may arrive in any order; they are stable-sorted by ascending
/// position (ties keep their input order) and applied left-to-right against
/// the original sequence, never against a partially edited buffer. Payload
/// bytes are uppercased on the way into the output.
///
/// Per-edit validation failures are logged at warning level and skipped
/// while the rest of the batch still applies:
/// - a negative position, or one past the valid bound (`> length` for
///   inserts, `>= length` for substitutions and deletions);
/// - a substitution payload that is not exactly one byte;
/// - a substitution or deletion whose target was already consumed by a
///   preceding edit.
///
/// A deletion running past the end of the sequence is clamped there. An
/// insertion at a position already consumed emits its payload at the
/// current output point without rewinding.
pub fn apply_edits(seq: &[u8], edits: &[Edit]) -> Vec<u8> {
    let mut sorted: Vec<&Edit> = edits.iter().collect();
    sorted.sort_by_key(|edit| edit.position);

    let (valid, out_len) = validate_edits(seq.len(), &sorted);

    let mut out = Vec::with_capacity(out_len);
    let mut last_pos = 0usize;
    for edit in valid {
        let pos = edit.position as usize;
        if pos > last_pos {
            out.extend_from_slice(&seq[last_pos..pos]);
            last_pos = pos;
        }
        match edit.kind {
            EditKind::Substitute => {
                out.extend(edit.payload.bytes().map(|b| b.to_ascii_uppercase()));
                last_pos = pos + 1;
            }
            EditKind::Insert => {
                out.extend(edit.payload.bytes().map(|b| b.to_ascii_uppercase()));
            }
            EditKind::Delete => {
                last_pos = (pos + edit.payload.len()).min(seq.len());
            }
        }
    }
    out.extend_from_slice(&seq[last_pos..]);
    out
}

/// Walks the sorted edits once without copying, dropping invalid ones and
/// computing the exact output length so the output buffer can be allocated
/// in one go.
fn validate_edits<'a>(seq_len: usize, sorted: &[&'a Edit]) -> (Vec<&'a Edit>, usize) {
    let len = seq_len as i64;
    let mut last_pos = 0i64;
    let mut out_len = len;
    let mut valid = Vec::with_capacity(sorted.len());

    for edit in sorted {
        let pos = edit.position;
        let bound = match edit.kind {
            EditKind::Insert => len,
            EditKind::Substitute | EditKind::Delete => len - 1,
        };
        if pos < 0 || pos > bound {
            log::warn!(
                "edit position {} is out of bounds for sequence of length {}, skipping",
                pos,
                seq_len
            );
            continue;
        }
        match edit.kind {
            EditKind::Substitute => {
                if edit.payload.len() != 1 {
                    log::warn!(
                        "substitution payload {:?} is not a single base, skipping",
                        edit.payload
                    );
                    continue;
                }
                if pos < last_pos {
                    log::warn!(
                        "edit position {} was already consumed by a preceding edit, skipping",
                        pos
                    );
                    continue;
                }
                last_pos = pos + 1;
            }
            EditKind::Insert => {
                last_pos = last_pos.max(pos);
                out_len += edit.payload.len() as i64;
            }
            EditKind::Delete => {
                if pos < last_pos {
                    log::warn!(
                        "edit position {} was already consumed by a preceding edit, skipping",
                        pos
                    );
                    continue;
                }
                let span = (edit.payload.len() as i64).min(len - pos);
                last_pos = pos + span;
                out_len -= span;
            }
        }
        valid.push(*edit);
    }

    (valid, out_len as usize)
}

/// Renders sequence bytes as fixed-width newline-terminated lines.
fn write_wrapped(seq: &[u8], path: &Path) -> Result<()> {
    let err = |source| FamutError::OutputUnwritable {
        path: path.to_path_buf(),
        source,
    };

    let file = File::create(path).map_err(err)?;
    let mut writer = BufWriter::new(file);
    for line in seq.chunks(LINE_WIDTH) {
        writer.write_all(line).map_err(err)?;
        writer.write_all(b"\n").map_err(err)?;
    }
    writer.flush().map_err(err)
}
