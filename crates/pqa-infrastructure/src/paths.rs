//! Unified path management for the desktop store files.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/pqa-desktop/       # Config directory (platform specific)
//! ├── settings.json            # userSettings
//! ├── history.json             # question/answer history
//! └── logs/                    # Application logs
//! ```

use pqa_core::config::StoreConfig;
use std::path::{Path, PathBuf};

/// Directory name under the platform config directory.
pub const APP_DIR_NAME: &str = "pqa-desktop";

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Config directory could not be determined.
    ConfigDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::ConfigDirNotFound => write!(f, "Cannot find config directory"),
        }
    }
}

impl std::error::Error for PathError {}

impl From<PathError> for pqa_core::PqaError {
    fn from(e: PathError) -> Self {
        pqa_core::PqaError::config(e.to_string())
    }
}

/// Resolves where the store files live.
///
/// With a base path every file is placed directly under it, which keeps tests
/// away from the real config directory.
#[derive(Debug, Clone, Default)]
pub struct PqaPaths {
    base_path: Option<PathBuf>,
}

impl PqaPaths {
    pub fn new(base_path: Option<&Path>) -> Self {
        Self {
            base_path: base_path.map(Path::to_path_buf),
        }
    }

    /// Returns the application config directory.
    pub fn config_dir(&self) -> Result<PathBuf, PathError> {
        if let Some(base) = &self.base_path {
            return Ok(base.clone());
        }
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR_NAME))
            .ok_or(PathError::ConfigDirNotFound)
    }

    pub fn settings_file(&self, config: &StoreConfig) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join(&config.settings_file))
    }

    pub fn history_file(&self, config: &StoreConfig) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join(&config.history_file))
    }

    pub fn logs_dir(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("logs"))
    }
}
