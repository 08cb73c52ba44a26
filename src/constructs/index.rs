use std::{
    collections::BTreeMap,
    fs::File,
    io::{BufReader, BufWriter, Write},
    path::Path,
};

use serde::{Deserialize, Serialize};

use crate::{FamutError, Result};

/// File name of the binary sequence data within an output directory.
pub const DATA_FILE_NAME: &str = "chromosomes.dat";
/// File name of the index document within an output directory.
pub const INDEX_FILE_NAME: &str = "chromosomes.idx";

/// Byte range of one stored sequence within the data file.
///
/// Serialized in the index document as the two-element array
/// `[offset, length]`. `offset + length` never exceeds the data file size,
/// and the ranges of distinct entries from one encode run are disjoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "(u64, u64)", into = "(u64, u64)")]
pub struct IndexEntry {
    /// Byte position of the first base within the data file.
    pub offset: u64,
    /// Length of the sequence in bytes.
    pub length: u64,
}

impl IndexEntry {
    pub fn new(offset: u64, length: u64) -> Self {
        Self { offset, length }
    }

    /// One past the last byte of the range.
    pub fn end(&self) -> u64 {
        self.offset + self.length
    }
}

impl From<(u64, u64)> for IndexEntry {
    fn from((offset, length): (u64, u64)) -> Self {
        Self { offset, length }
    }
}

impl From<IndexEntry> for (u64, u64) {
    fn from(entry: IndexEntry) -> Self {
        (entry.offset, entry.length)
    }
}

/// Mapping from sequence name to its byte range in the data file.
///
/// One index document is produced per encode run and fully replaces any
/// previous document in the output directory; there are no incremental
/// append semantics. The document is the sole coupling between the encoder
/// and the mutation engine.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Index {
    entries: BTreeMap<String, IndexEntry>,
}

impl Index {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts an entry, returning the previous entry for the name if any.
    ///
    /// Names are unique; a record that appears twice in one source keeps
    /// only its last occurrence.
    pub fn insert<S: Into<String>>(&mut self, name: S, entry: IndexEntry) -> Option<IndexEntry> {
        self.entries.insert(name.into(), entry)
    }

    pub fn get(&self, name: &str) -> Option<IndexEntry> {
        self.entries.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &IndexEntry)> {
        self.entries.iter()
    }

    /// Loads the index document from an encode output directory.
    ///
    /// # Errors
    ///
    /// Returns [`FamutError::IndexUnreadable`] if the file cannot be opened
    /// and [`FamutError::MalformedIndex`] if it does not parse.
    pub fn from_dir<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let path = dir.as_ref().join(INDEX_FILE_NAME);
        let file = File::open(&path).map_err(|source| FamutError::IndexUnreadable {
            path: path.clone(),
            source,
        })?;
        serde_json::from_reader(BufReader::new(file))
            .map_err(|source| FamutError::MalformedIndex { path, source })
    }

    /// Writes the index document into an output directory, replacing any
    /// previous document.
    pub fn write_dir<P: AsRef<Path>>(&self, dir: P) -> Result<()> {
        let path = dir.as_ref().join(INDEX_FILE_NAME);
        let file = File::create(&path).map_err(|source| FamutError::OutputUnwritable {
            path: path.clone(),
            source,
        })?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, self).map_err(|source| {
            FamutError::OutputUnwritable {
                path: path.clone(),
                source: std::io::Error::other(source),
            }
        })?;
        writer
            .flush()
            .map_err(|source| FamutError::OutputUnwritable { path, source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_wire_format() {
        let entry = IndexEntry::new(128, 64);
        let json = serde_json::to_string(&entry).unwrap();
        assert_eq!(json, "[128,64]");

        let parsed: IndexEntry = serde_json::from_str("[128,64]").unwrap();
        assert_eq!(parsed, entry);
    }

    #[test]
    fn test_index_wire_format() {
        let mut index = Index::new();
        index.insert("1", IndexEntry::new(0, 8));
        index.insert("X", IndexEntry::new(8, 4));

        let json = serde_json::to_string(&index).unwrap();
        assert_eq!(json, r#"{"1":[0,8],"X":[8,4]}"#);
    }

    #[test]
    fn test_entry_end() {
        let entry = IndexEntry::new(100, 28);
        assert_eq!(entry.end(), 128);
    }

    #[test]
    fn test_insert_replaces_duplicate_name() {
        let mut index = Index::new();
        assert!(index.insert("1", IndexEntry::new(0, 8)).is_none());
        let previous = index.insert("1", IndexEntry::new(8, 4)).unwrap();
        assert_eq!(previous, IndexEntry::new(0, 8));
        assert_eq!(index.len(), 1);
        assert_eq!(index.get("1"), Some(IndexEntry::new(8, 4)));
    }

    #[test]
    fn test_dir_roundtrip() {
        let dir = tempfile::tempdir().unwrap();

        let mut index = Index::new();
        index.insert("1", IndexEntry::new(0, 248));
        index.insert("X", IndexEntry::new(248, 96));
        index.write_dir(dir.path()).unwrap();

        let loaded = Index::from_dir(dir.path()).unwrap();
        assert_eq!(loaded, index);
    }

    #[test]
    fn test_missing_index_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = Index::from_dir(dir.path());
        assert!(matches!(result, Err(FamutError::IndexUnreadable { .. })));
    }

    #[test]
    fn test_malformed_index_document() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(INDEX_FILE_NAME), b"not json at all").unwrap();

        let result = Index::from_dir(dir.path());
        assert!(matches!(result, Err(FamutError::MalformedIndex { .. })));
    }
}
