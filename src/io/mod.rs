mod encoder;
mod mmap;
mod mutator;

pub use encoder::encode;
pub use mmap::MmapData;
pub use mutator::{apply_edits, mutate, LINE_WIDTH};
