//! # Context Setup
//!
//! Turns a loaded [`ReplyboiConfig`] into a ready-to-use [`ReplyApi`] over the
//! filesystem.
//!
//! ## Data Directory
//!
//! Resolved in order:
//! 1. An explicit override (the CLI's `--data`)
//! 2. `data_dir` from the config (which already includes `REPLYBOI_DATA`)
//! 3. The OS data directory, via `directories`
//!
//! ## Layout
//!
//! ```text
//! <data_dir>/
//! ├── replyCount.json   # the counter record
//! ├── replyCount.lock   # advisory lock held during each operation
//! ├── badge             # latest rendered badge, e.g. "7/20"
//! └── mirrors/<name>/   # dependent contexts, see FsMirror
//! ```

use crate::api::ReplyApi;
use crate::clock::Clock;
use crate::config::ReplyboiConfig;
use crate::error::{ReplyError, Result};
use crate::notify::fs_mirror::FsMirror;
use crate::notify::Notifier;
use crate::render::BadgeFile;
use crate::store::fs_backend::FsStore;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplyPaths {
    pub data_dir: PathBuf,
    pub mirrors_dir: PathBuf,
    pub badge_file: PathBuf,
}

impl ReplyPaths {
    pub fn new(data_dir: PathBuf) -> Self {
        Self {
            mirrors_dir: data_dir.join("mirrors"),
            badge_file: data_dir.join("badge"),
            data_dir,
        }
    }
}

pub struct ReplyContext {
    pub api: ReplyApi<FsStore>,
    pub config: ReplyboiConfig,
    pub paths: ReplyPaths,
}

pub fn resolve_data_dir(
    data_override: Option<PathBuf>,
    config: &ReplyboiConfig,
) -> Result<PathBuf> {
    if let Some(path) = data_override.or_else(|| config.data_dir.clone()) {
        return Ok(path);
    }
    ProjectDirs::from("", "", "replyboi")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| ReplyError::Config("Could not determine a data directory".to_string()))
}

/// Build the filesystem-backed API. Every mirror directory found under
/// `<data_dir>/mirrors` is registered as a reset target.
pub fn initialize(
    config: ReplyboiConfig,
    data_override: Option<PathBuf>,
    clock: impl Clock + 'static,
) -> Result<ReplyContext> {
    config.validate()?;
    let paths = ReplyPaths::new(resolve_data_dir(data_override, &config)?);
    debug!(data_dir = %paths.data_dir.display(), "initializing");

    let api = ReplyApi::new(FsStore::new(paths.data_dir.clone()), config.rollover_hour)
        .with_clock(clock)
        .with_renderer(BadgeFile::new(paths.badge_file.clone()))
        .with_notifier(discover_notifier(&paths.mirrors_dir));

    Ok(ReplyContext { api, config, paths })
}

fn discover_notifier(mirrors_dir: &Path) -> Notifier {
    let mut notifier = Notifier::new();
    match FsMirror::discover(mirrors_dir) {
        Ok(mirrors) => {
            for mirror in mirrors {
                notifier.register(Box::new(mirror));
            }
        }
        Err(e) => warn!(error = %e, "could not list mirrors, resets will not be broadcast"),
    }
    notifier
}
