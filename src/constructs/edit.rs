/// Kind of a positional edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditKind {
    /// Replace the single base at the edit position.
    Substitute,
    /// Insert the payload before the base at the edit position.
    Insert,
    /// Remove `payload.len()` bases starting at the edit position.
    Delete,
}

/// One positional change to apply to a stored sequence.
///
/// Positions are 0-based indices into the original, pre-edit sequence.
/// Payload bytes are case-normalized before they reach the output; for
/// deletions only the payload length is used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    pub position: i64,
    pub kind: EditKind,
    pub payload: String,
}

impl Edit {
    pub fn new<S: Into<String>>(position: i64, kind: EditKind, payload: S) -> Self {
        Self {
            position,
            kind,
            payload: payload.into(),
        }
    }

    pub fn substitute<S: Into<String>>(position: i64, payload: S) -> Self {
        Self::new(position, EditKind::Substitute, payload)
    }

    pub fn insert<S: Into<String>>(position: i64, payload: S) -> Self {
        Self::new(position, EditKind::Insert, payload)
    }

    pub fn delete<S: Into<String>>(position: i64, payload: S) -> Self {
        Self::new(position, EditKind::Delete, payload)
    }
}
