//! Configuration types for the Cognify reel feed.
//!
//! This module provides the configuration structure that controls XP
//! progression, the content catalog location, progress persistence and the
//! home screen quick picks.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{FeedError, Result};

/// The default config file name.
const CONFIG_FILE_NAME: &str = "cognify.json";

/// Default XP awarded for a correct quiz answer.
pub const XP_PER_CORRECT_ANSWER: u32 = 20;

/// Default XP needed to go from level 1 to level 2.
pub const XP_FOR_LEVEL_UP: u32 = 100;

const fn default_xp_per_correct_answer() -> u32 {
    XP_PER_CORRECT_ANSWER
}

const fn default_initial_xp_to_next_level() -> u32 {
    XP_FOR_LEVEL_UP
}

/// Default lifetime of the level-up notice in seconds.
const fn default_level_up_notice_seconds() -> u64 {
    3
}

/// Default simulated latency of the built-in catalog.
const fn default_catalog_delay_ms() -> u64 {
    300
}

/// Default progress file path.
fn default_state_file() -> String {
    ".cognify/progress.json".to_string()
}

/// Default output directory for profile reports.
fn default_output_dir() -> String {
    ".".to_string()
}

/// Default home screen quick picks.
fn default_quick_picks() -> Vec<String> {
    vec!["7".to_string(), "6".to_string()]
}

/// Main configuration for Cognify.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// XP awarded for every correct quiz answer.
    #[serde(default = "default_xp_per_correct_answer")]
    pub xp_per_correct_answer: u32,

    /// XP threshold of level 1 for a fresh profile.
    #[serde(default = "default_initial_xp_to_next_level")]
    pub initial_xp_to_next_level: u32,

    /// How long the level-up notice stays visible, in seconds.
    #[serde(default = "default_level_up_notice_seconds")]
    pub level_up_notice_seconds: u64,

    /// Path to a JSON catalog. The built-in catalog is used when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog: Option<String>,

    /// Simulated fetch latency of the built-in catalog in milliseconds.
    #[serde(default = "default_catalog_delay_ms")]
    pub catalog_delay_ms: u64,

    /// Path to the progress file.
    #[serde(default = "default_state_file")]
    pub state_file: String,

    /// Content ids shown as quick picks on the home screen, in order.
    #[serde(default = "default_quick_picks")]
    pub quick_picks: Vec<String>,

    /// Output directory for generated profile reports.
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            xp_per_correct_answer: default_xp_per_correct_answer(),
            initial_xp_to_next_level: default_initial_xp_to_next_level(),
            level_up_notice_seconds: default_level_up_notice_seconds(),
            catalog: None,
            catalog_delay_ms: default_catalog_delay_ms(),
            state_file: default_state_file(),
            quick_picks: default_quick_picks(),
            output_dir: default_output_dir(),
        }
    }
}

impl Config {
    /// Loads configuration from the current working directory.
    ///
    /// Looks for `cognify.json` in the current directory and falls back to
    /// defaults when it is missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but contains invalid JSON.
    pub fn load() -> Result<Self> {
        let current_dir = std::env::current_dir().map_err(|e| {
            FeedError::config_parse(
                "<current directory>",
                format!("cannot determine current directory: {e}"),
            )
        })?;
        Self::load_from_dir(&current_dir)
    }

    /// Loads configuration from `cognify.json` in a specific directory.
    pub fn load_from_dir(dir: &Path) -> Result<Self> {
        let config_path = dir.join(CONFIG_FILE_NAME);
        Self::load_from_file(&config_path)
    }

    /// Loads configuration from a specific file path.
    ///
    /// If the file does not exist, returns default configuration.
    ///
    /// # Errors
    ///
    /// Returns `FeedError::ConfigParseError` if the file exists but contains
    /// invalid JSON, and `FeedError::ConfigValidationError` if the values are
    /// out of range.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let config = Self::default();
                config.validate()?;
                return Ok(config);
            }
            Err(e) => {
                return Err(FeedError::config_parse(
                    path,
                    format!("failed to read file: {e}"),
                ));
            }
        };

        let config: Self = serde_json::from_str(&contents)
            .map_err(|e| FeedError::config_parse(path, e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `FeedError::ConfigValidationError` if any check fails.
    pub fn validate(&self) -> Result<()> {
        if self.xp_per_correct_answer == 0 {
            return Err(FeedError::config_validation(
                "xpPerCorrectAnswer must be greater than 0",
                "Set xpPerCorrectAnswer to at least 1 in your cognify.json",
            ));
        }

        if self.initial_xp_to_next_level == 0 {
            return Err(FeedError::config_validation(
                "initialXpToNextLevel must be greater than 0",
                "Set initialXpToNextLevel to at least 1 in your cognify.json",
            ));
        }

        if self.level_up_notice_seconds == 0 {
            return Err(FeedError::config_validation(
                "levelUpNoticeSeconds must be greater than 0",
                "Set levelUpNoticeSeconds to at least 1 in your cognify.json",
            ));
        }

        if self.catalog.as_deref().is_some_and(|c| c.trim().is_empty()) {
            return Err(FeedError::config_validation(
                "catalog path must not be empty",
                "Remove the catalog field to use the built-in catalog, or point it at a JSON file",
            ));
        }

        if self.state_file.trim().is_empty() {
            return Err(FeedError::config_validation(
                "stateFile must not be empty",
                "Provide a valid progress file path in your cognify.json",
            ));
        }

        if self.output_dir.trim().is_empty() {
            return Err(FeedError::config_validation(
                "outputDir must not be empty",
                "Provide a valid output directory path in your cognify.json (use '.' for current directory)",
            ));
        }

        Ok(())
    }

    /// Lifetime of the level-up notice.
    #[must_use]
    pub const fn level_up_notice_duration(&self) -> Duration {
        Duration::from_secs(self.level_up_notice_seconds)
    }

    /// Simulated latency of the built-in catalog.
    #[must_use]
    pub const fn catalog_delay(&self) -> Duration {
        Duration::from_millis(self.catalog_delay_ms)
    }
}
