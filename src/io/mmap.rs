use std::{fs::File, path::Path};

use memmap2::Mmap;

use crate::{FamutError, Result};

/// Read-only memory-mapped view of a data file.
///
/// The map is a scoped resource: it is acquired inside one mutate call and
/// released when the value drops, on every exit path. It is never cached
/// across calls, since a later encode rewrites the data file in place and a
/// retained map could observe torn state.
pub struct MmapData {
    map: Mmap,
}

#[allow(clippy::len_without_is_empty)]
impl MmapData {
    /// Opens the file at `path` read-only and maps it in full.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| FamutError::DataUnmappable {
            path: path.to_path_buf(),
            source,
        })?;
        let map = unsafe { Mmap::map(&file) }.map_err(|source| FamutError::DataUnmappable {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self { map })
    }

    /// Size of the mapped file in bytes.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Zero-copy view of the byte range `[offset, offset + length)`.
    ///
    /// # Errors
    ///
    /// Returns [`FamutError::RangeOutOfBounds`] if the range extends past
    /// the end of the mapped file.
    pub fn slice(&self, offset: u64, length: u64) -> Result<&[u8]> {
        let end = offset.saturating_add(length);
        if end > self.map.len() as u64 {
            return Err(FamutError::RangeOutOfBounds {
                start: offset,
                end,
                size: self.map.len() as u64,
            });
        }
        Ok(&self.map[offset as usize..end as usize])
    }
}
