//! User settings: models and built-in defaults.

pub mod model;

pub use model::{SettingValue, Settings};

/// Model used for the main, summary and agent LLM slots.
pub const DEFAULT_LLM: &str = "gemini/gemini-2.0-flash";
pub const DEFAULT_EMBEDDING: &str = "gemini/text-embedding-004";
pub const DEFAULT_PRESET: &str = "fast";

/// Returns the built-in default settings.
///
/// Keys added here show up for users with older persisted settings, since
/// persisted values are merged on top of this mapping.
pub fn default_settings() -> Settings {
    let mut settings = Settings::new();
    settings.set("llm", DEFAULT_LLM);
    settings.set("summary_llm", DEFAULT_LLM);
    settings.set("agent_llm", DEFAULT_LLM);
    settings.set("embedding", DEFAULT_EMBEDDING);
    settings.set("temperature", 0.0);
    settings.set("evidence_k", 10);
    settings.set("max_sources", 5);
    settings.set("chunk_size", 5000);
    settings.set("use_tier1_limits", true);
    settings.set("preset", DEFAULT_PRESET);
    settings.set("paper_dir", "");
    settings.set("api_key", "");
    settings
}
