//! Domain layer for the PaperQA desktop core.
//!
//! Holds the settings and history models, the error taxonomy, the reference
//! list parser and the two boundary traits ([`transport::Transport`] and
//! [`storage::KeyValueStore`]) the outer crates implement or consume.

pub mod config;
pub mod error;
pub mod history;
pub mod references;
pub mod settings;
pub mod storage;
pub mod transport;

// Re-export common error type
pub use error::{PqaError, Result};
