//! Streaming FASTA encoder.
//!
//! Reads a FASTA source line by line, keeps only records whose name is in
//! the caller's filter set, and writes their uppercased bodies back-to-back
//! into a single data file alongside an offset index. The source is never
//! held in memory as a whole, and unwanted record bodies are discarded as
//! they stream past.

use std::{
    collections::HashSet,
    fs::File,
    io::{BufRead, BufReader, BufWriter, Write},
    path::Path,
};

use crate::{FamutError, Index, IndexEntry, Result, DATA_FILE_NAME};

/// A record currently being accumulated from the source.
struct PendingRecord {
    name: String,
    /// Whether the name is in the filter set, checked once per header.
    wanted: bool,
    seq: Vec<u8>,
}

/// Extracts the named records from a FASTA source into a binary store.
///
/// Streams `source_path` a line at a time. Records whose header name (the
/// token between `>` and the first whitespace) is in `names` have their
/// payload lines concatenated, uppercased, and appended to
/// `<output_dir>/chromosomes.dat`; every retained record gets an
/// `[offset, length]` entry in `<output_dir>/chromosomes.idx`. Both output
/// files are fully rewritten on every call.
///
/// With the `niffler` feature (default), compressed sources (e.g. gzip) are
/// decompressed transparently.
///
/// Zero-length records are never indexed. Empty lines and stray carriage
/// returns in the source are ignored.
///
/// Returns the freshly built [`Index`] on success.
///
/// # Errors
///
/// Returns [`FamutError::SourceUnreadable`] if the source cannot be opened
/// or read, and [`FamutError::OutputUnwritable`] if either output file
/// cannot be created or written.
///
/// # Examples
///
/// ```rust,no_run
/// use std::collections::HashSet;
///
/// # fn main() -> famut::Result<()> {
/// let names: HashSet<String> = ["1", "X"].iter().map(|s| s.to_string()).collect();
/// let index = famut::encode(&names, "genome.fa", "store")?;
/// println!("retained {} sequences", index.len());
/// # Ok(())
/// # }
/// ```
pub fn encode<P, Q>(names: &HashSet<String>, source_path: P, output_dir: Q) -> Result<Index>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let source_path = source_path.as_ref();
    let output_dir = output_dir.as_ref();

    let mut reader = open_source(source_path)?;

    let data_path = output_dir.join(DATA_FILE_NAME);
    let data_file = File::create(&data_path).map_err(|source| FamutError::OutputUnwritable {
        path: data_path.clone(),
        source,
    })?;
    let mut data_writer = BufWriter::new(data_file);

    let mut index = Index::new();
    let mut offset: u64 = 0;
    let mut current: Option<PendingRecord> = None;

    let mut line = String::new();
    loop {
        line.clear();
        let read = reader
            .read_line(&mut line)
            .map_err(|source| FamutError::SourceUnreadable {
                path: source_path.to_path_buf(),
                source,
            })?;
        if read == 0 {
            break;
        }
        let content = line.trim_end_matches(['\n', '\r']);
        if content.is_empty() {
            continue;
        }

        if let Some(header) = content.strip_prefix('>') {
            flush_record(
                current.take(),
                &mut data_writer,
                &data_path,
                &mut index,
                &mut offset,
            )?;
            current = header.split_whitespace().next().map(|name| PendingRecord {
                name: name.to_string(),
                wanted: names.contains(name),
                seq: Vec::new(),
            });
        } else if let Some(record) = current.as_mut() {
            if record.wanted {
                record
                    .seq
                    .extend(content.bytes().map(|b| b.to_ascii_uppercase()));
            }
        }
    }

    // No trailing header triggers the last transition.
    flush_record(
        current.take(),
        &mut data_writer,
        &data_path,
        &mut index,
        &mut offset,
    )?;

    data_writer
        .flush()
        .map_err(|source| FamutError::OutputUnwritable {
            path: data_path,
            source,
        })?;
    index.write_dir(output_dir)?;
    Ok(index)
}

/// Writes a just-ended record to the data file and records its index entry,
/// if it was retained and accumulated any bases.
fn flush_record(
    record: Option<PendingRecord>,
    data_writer: &mut BufWriter<File>,
    data_path: &Path,
    index: &mut Index,
    offset: &mut u64,
) -> Result<()> {
    let Some(record) = record else {
        return Ok(());
    };
    if !record.wanted || record.seq.is_empty() {
        return Ok(());
    }

    data_writer
        .write_all(&record.seq)
        .map_err(|source| FamutError::OutputUnwritable {
            path: data_path.to_path_buf(),
            source,
        })?;

    let length = record.seq.len() as u64;
    log::debug!(
        "encoded '{}': {} bases at offset {}",
        record.name,
        length,
        offset
    );
    index.insert(record.name, IndexEntry::new(*offset, length));
    *offset += length;
    Ok(())
}

#[cfg(feature = "niffler")]
fn open_source(path: &Path) -> Result<Box<dyn BufRead + Send>> {
    let file = File::open(path).map_err(|source| FamutError::SourceUnreadable {
        path: path.to_path_buf(),
        source,
    })?;
    let (reader, _format) = niffler::send::get_reader(Box::new(BufReader::new(file)))?;
    Ok(Box::new(BufReader::new(reader)))
}

#[cfg(not(feature = "niffler"))]
fn open_source(path: &Path) -> Result<Box<dyn BufRead + Send>> {
    let file = File::open(path).map_err(|source| FamutError::SourceUnreadable {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Box::new(BufReader::new(file)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn name_set(names: &[&str]) -> HashSet<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn write_source(dir: &Path, content: &str) -> PathBuf {
        let path = dir.join("source.fa");
        std::fs::write(&path, content).unwrap();
        path
    }

    fn read_data(dir: &Path) -> Vec<u8> {
        std::fs::read(dir.join(DATA_FILE_NAME)).unwrap()
    }

    #[test]
    fn test_roundtrip_uppercase() {
        let dir = tempfile::tempdir().unwrap();
        let source = write_source(dir.path(), ">1\nacgt\nACGT\n");

        let index = encode(&name_set(&["1"]), &source, dir.path()).unwrap();

        let entry = index.get("1").unwrap();
        assert_eq!((entry.offset, entry.length), (0, 8));

        let data = read_data(dir.path());
        assert_eq!(&data[entry.offset as usize..entry.end() as usize], b"ACGTACGT");
    }

    #[test]
    fn test_filtering() {
        let dir = tempfile::tempdir().unwrap();
        let source = write_source(dir.path(), ">1\nacgt\n>2\ngggggg\n>X\ntt\n");

        let index = encode(&name_set(&["1", "X"]), &source, dir.path()).unwrap();

        assert_eq!(index.len(), 2);
        assert!(index.contains("1"));
        assert!(index.contains("X"));
        assert!(!index.contains("2"));

        let data = read_data(dir.path());
        assert_eq!(data, b"ACGTTT");
    }

    #[test]
    fn test_offsets_contiguous_and_disjoint() {
        let dir = tempfile::tempdir().unwrap();
        let source = write_source(dir.path(), ">a\nacgtac\n>b\ngg\n>c\ntttt\n");

        let index = encode(&name_set(&["a", "b", "c"]), &source, dir.path()).unwrap();

        let mut entries: Vec<IndexEntry> = index.iter().map(|(_, e)| *e).collect();
        entries.sort_by_key(|e| e.offset);

        let mut expected_offset = 0;
        for entry in &entries {
            assert_eq!(entry.offset, expected_offset);
            expected_offset = entry.end();
        }
        assert_eq!(expected_offset, read_data(dir.path()).len() as u64);
    }

    #[test]
    fn test_final_record_flushed_without_trailing_newline() {
        let dir = tempfile::tempdir().unwrap();
        let source = write_source(dir.path(), ">1\nacgt\n>2\ntgca");

        let index = encode(&name_set(&["2"]), &source, dir.path()).unwrap();

        let entry = index.get("2").unwrap();
        assert_eq!((entry.offset, entry.length), (0, 4));
        assert_eq!(read_data(dir.path()), b"TGCA");
    }

    #[test]
    fn test_blank_and_carriage_return_lines_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let source = write_source(dir.path(), ">1 primary assembly\r\nac\r\n\r\n\ngt\r\n");

        let index = encode(&name_set(&["1"]), &source, dir.path()).unwrap();

        assert_eq!(index.get("1").unwrap().length, 4);
        assert_eq!(read_data(dir.path()), b"ACGT");
    }

    #[test]
    fn test_name_is_token_before_whitespace() {
        let dir = tempfile::tempdir().unwrap();
        let source = write_source(dir.path(), ">X dna:chromosome chromosome:GRCh38\nacgt\n");

        let index = encode(&name_set(&["X"]), &source, dir.path()).unwrap();
        assert!(index.contains("X"));
    }

    #[test]
    fn test_empty_record_not_indexed() {
        let dir = tempfile::tempdir().unwrap();
        let source = write_source(dir.path(), ">1\n>2\nacgt\n");

        let index = encode(&name_set(&["1", "2"]), &source, dir.path()).unwrap();

        assert_eq!(index.len(), 1);
        assert!(index.contains("2"));
    }

    #[test]
    fn test_reencode_replaces_previous_output() {
        let dir = tempfile::tempdir().unwrap();

        let first = write_source(dir.path(), ">1\nacgtacgtacgt\n");
        encode(&name_set(&["1"]), &first, dir.path()).unwrap();

        let second = write_source(dir.path(), ">2\ngg\n");
        let index = encode(&name_set(&["2"]), &second, dir.path()).unwrap();

        assert_eq!(index.len(), 1);
        assert!(!index.contains("1"));
        assert_eq!(read_data(dir.path()), b"GG");

        let reloaded = Index::from_dir(dir.path()).unwrap();
        assert_eq!(reloaded, index);
    }

    #[test]
    fn test_missing_source() {
        let dir = tempfile::tempdir().unwrap();
        let result = encode(
            &name_set(&["1"]),
            dir.path().join("no_such.fa"),
            dir.path(),
        );
        assert!(matches!(result, Err(FamutError::SourceUnreadable { .. })));
    }

    #[test]
    fn test_unwritable_output_dir() {
        let dir = tempfile::tempdir().unwrap();
        let source = write_source(dir.path(), ">1\nacgt\n");

        let result = encode(&name_set(&["1"]), &source, dir.path().join("missing/nested"));
        assert!(matches!(result, Err(FamutError::OutputUnwritable { .. })));
    }
}
