use std::path::{Component, Path, PathBuf};

use log::LevelFilter;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Configuration for the folder tidying actions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Whether to run without making changes
    pub dry_run: bool,

    /// Two-digit prefix placed before `YY` to build the year (`"20"` gives `2025`)
    pub century_prefix: String,

    /// Name of the subfolder files are moved into by the story action
    pub story_dir_name: String,

    /// Log level
    pub log_level: LogLevel,

    /// Where rolling log files go (None = platform data directory)
    pub log_dir: Option<PathBuf>,
}

/// Log level for the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dry_run: false,
            century_prefix: "20".to_string(),
            story_dir_name: "story".to_string(),
            log_level: LogLevel::Info,
            log_dir: None,
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path)
            .map_err(|e| Error::Configuration(format!("Failed to open config file: {}", e)))?;

        let config: Config = serde_json::from_reader(file)
            .map_err(|e| Error::Configuration(format!("Failed to parse config file: {}", e)))?;

        Ok(config)
    }

    /// Save configuration to a file
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let file = std::fs::File::create(path)
            .map_err(|e| Error::Configuration(format!("Failed to create config file: {}", e)))?;

        serde_json::to_writer_pretty(file, self)
            .map_err(|e| Error::Configuration(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.century_prefix.len() != 2
            || !self.century_prefix.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(Error::Configuration(format!(
                "Century prefix must be exactly two digits, got {:?}",
                self.century_prefix
            )));
        }

        // The story folder must be a plain child name of the leaf folder
        let mut components = Path::new(&self.story_dir_name).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(_)), None) => Ok(()),
            _ => Err(Error::Configuration(format!(
                "Story folder name must be a single folder name, got {:?}",
                self.story_dir_name
            ))),
        }
    }
}
