mod edit;
mod index;

pub use edit::{Edit, EditKind};
pub use index::{Index, IndexEntry, DATA_FILE_NAME, INDEX_FILE_NAME};
