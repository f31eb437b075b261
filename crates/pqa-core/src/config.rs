use serde::{Deserialize, Serialize};

pub const SETTINGS_FILE: &str = "settings.json";
pub const SETTINGS_KEY: &str = "userSettings";
pub const HISTORY_FILE: &str = "history.json";
pub const HISTORY_KEY: &str = "history";

/// File names and keys used by the settings and history stores.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    #[serde(default = "default_settings_file")]
    pub settings_file: String,
    #[serde(default = "default_settings_key")]
    pub settings_key: String,
    #[serde(default = "default_history_file")]
    pub history_file: String,
    #[serde(default = "default_history_key")]
    pub history_key: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            settings_file: default_settings_file(),
            settings_key: default_settings_key(),
            history_file: default_history_file(),
            history_key: default_history_key(),
        }
    }
}

fn default_settings_file() -> String {
    SETTINGS_FILE.to_string()
}

fn default_settings_key() -> String {
    SETTINGS_KEY.to_string()
}

fn default_history_file() -> String {
    HISTORY_FILE.to_string()
}

fn default_history_key() -> String {
    HISTORY_KEY.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: StoreConfig = serde_json::from_str(r#"{"history_file": "qa.json"}"#).unwrap();
        assert_eq!(config.history_file, "qa.json");
        assert_eq!(config.settings_file, SETTINGS_FILE);
        assert_eq!(config.settings_key, SETTINGS_KEY);
        assert_eq!(config.history_key, HISTORY_KEY);
    }
}
