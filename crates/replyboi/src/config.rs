//! # Configuration
//!
//! Loaded with [`confique`], layered in priority order:
//! 1. **Environment variables**: `REPLYBOI_ROLLOVER_HOUR`, `REPLYBOI_DATA`
//! 2. **Config file**: `replyboi.toml` in the OS config directory (via
//!    `directories`), or the file given with `--config`
//! 3. **Compiled defaults**
//!
//! ## Available Settings
//!
//! | Key | Default | Description |
//! |-----|---------|-------------|
//! | `rollover_hour` | `4` | Local hour (0-23) at which a new day starts |
//! | `data_dir` | OS data dir | Where the record, badge and mirrors live |

use crate::day_key::DEFAULT_ROLLOVER_HOUR;
use crate::error::{ReplyError, Result};
use confique::Config;
use directories::ProjectDirs;
use serde::Serialize;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "replyboi.toml";

#[derive(Config, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ReplyboiConfig {
    /// Local hour (0-23) at which the counter starts a new day. Replies sent
    /// before this hour count toward the previous day.
    #[config(env = "REPLYBOI_ROLLOVER_HOUR", default = 4)]
    pub rollover_hour: u8,

    /// Directory holding the counter record, badge file and mirrors.
    #[config(env = "REPLYBOI_DATA")]
    pub data_dir: Option<PathBuf>,
}

impl Default for ReplyboiConfig {
    fn default() -> Self {
        Self {
            rollover_hour: DEFAULT_ROLLOVER_HOUR,
            data_dir: None,
        }
    }
}

impl ReplyboiConfig {
    /// Load from the environment and `file`, falling back to defaults. A
    /// missing file is not an error.
    pub fn load(file: Option<&Path>) -> Result<Self> {
        let mut builder = Self::builder().env();
        if let Some(path) = file {
            builder = builder.file(path);
        }
        let config = builder
            .load()
            .map_err(|e| ReplyError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.rollover_hour > 23 {
            return Err(ReplyError::Config(format!(
                "rollover_hour must be between 0 and 23, got {}",
                self.rollover_hour
            )));
        }
        Ok(())
    }

    /// A commented TOML file listing every setting.
    pub fn template() -> String {
        confique::toml::template::<Self>(confique::toml::FormatOptions::default())
    }
}

/// `<config_dir>/replyboi.toml`, if the OS has a config directory.
pub fn default_config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "replyboi").map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    // Environment variables are process-wide, so these tests only use files.

    #[test]
    fn test_defaults() {
        let config = ReplyboiConfig::default();
        assert_eq!(config.rollover_hour, 4);
        assert!(config.data_dir.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "rollover_hour = 6\ndata_dir = \"/tmp/replies\"\n").unwrap();

        let config = ReplyboiConfig::load(Some(&path)).unwrap();

        assert_eq!(config.rollover_hour, 6);
        assert_eq!(config.data_dir, Some(PathBuf::from("/tmp/replies")));
    }

    #[test]
    fn test_rejects_hour_out_of_range() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "rollover_hour = 24\n").unwrap();

        let err = ReplyboiConfig::load(Some(&path)).unwrap_err();
        assert!(matches!(err, ReplyError::Config(msg) if msg.contains("rollover_hour")));
    }

    #[test]
    fn test_template_lists_settings() {
        let template = ReplyboiConfig::template();
        assert!(template.contains("rollover_hour"));
        assert!(template.contains("data_dir"));
    }
}
