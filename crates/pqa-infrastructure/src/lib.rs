//! Infrastructure for the PaperQA desktop core: key-value store backends and
//! path resolution.

pub mod json_file_store;
pub mod memory_store;
pub mod paths;
pub mod storage;

pub use crate::json_file_store::JsonFileStore;
pub use crate::memory_store::MemoryStore;
pub use crate::paths::PqaPaths;
