pub mod model;

pub use model::{History, HistoryEntry, TIMESTAMP_FIELD};
