//! Application layer for the PaperQA desktop core.
//!
//! Wires the RPC client and the settings/history stores together and exposes
//! the live state the UI binds to.

pub mod bootstrap;
pub mod history_store;
pub mod readiness;
pub mod settings_store;
pub mod telemetry;

pub use bootstrap::AppServices;
pub use history_store::HistoryStore;
pub use readiness::Readiness;
pub use settings_store::{SettingsRepository, SettingsStore};
